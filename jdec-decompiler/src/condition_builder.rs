//! Reconstruction of compound `&&`/`||` conditions from groups of
//! conditional blocks.
//!
//! Every conditional block tests one simple predicate and jumps either to
//! another block of its group or to one of two exits: the guarded body and
//! the block after it (the "return" exit). Walking every path from the
//! group entry to the body exit and or-ing the path conjunctions yields the
//! condition under which the body runs.

use jdec_ir::{BlockId, CompareOperator, Condition, Instruction};
use jdec_isa::Opcode as Op;

use crate::condition_util::{inverse, simplify_condition};
use crate::context::BuildContext;
use crate::error::{DecompileError, Result};
use crate::section::BlockSection;

/// Predicate under which `block`'s terminal jump is taken.
///
/// The block's prefix (if any) and the block itself are replayed onto a
/// scratch stack; statements they produce are discarded.
pub fn build_simple_condition(ctx: &BuildContext, block: BlockId) -> Result<Condition> {
    let last = ctx.graph.last(block).ok_or(DecompileError::EmptyBlock { block })?;
    let opcode = last.opcode;
    if !opcode.is_conditional() {
        return Err(DecompileError::UnsupportedJump { block, opcode });
    }
    let op = CompareOperator::from_opcode(opcode)
        .ok_or(DecompileError::UnsupportedJump { block, opcode })?;

    let mut scratch = Vec::new();
    let mut stack = Vec::new();
    if let Some(prefix) = ctx.graph.block(block).prefix {
        BlockSection::Inline(prefix).append_to(ctx, &mut scratch, &mut stack)?;
    }
    BlockSection::Inline(block).append_to(ctx, &mut scratch, &mut stack)?;

    let (expected, _) = opcode.stack_effect();
    let shape_error = |found: usize| DecompileError::StackShape {
        block,
        opcode,
        expected,
        found,
    };
    let condition = match opcode {
        Op::Ifeq | Op::Ifne | Op::Iflt | Op::Ifle | Op::Ifgt | Op::Ifge | Op::Ifnull
        | Op::Ifnonnull => {
            let found = stack.len();
            let [value] = <[Instruction; 1]>::try_from(stack).map_err(|_| shape_error(found))?;
            match opcode {
                Op::Ifeq | Op::Ifne => Condition::boolean(value, opcode == Op::Ifeq),
                Op::Ifnull | Op::Ifnonnull => {
                    Condition::compare(value, Instruction::NullConstant, op)
                }
                _ => Condition::compare(value, Instruction::IntConstant(0), op),
            }
        }
        _ => {
            let found = stack.len();
            let [left, right] =
                <[Instruction; 2]>::try_from(stack).map_err(|_| shape_error(found))?;
            Condition::compare(left, right, op)
        }
    };
    Ok(condition)
}

/// Endpoint of a condition edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    /// The guarded body.
    Body,
    /// The exit that skips the body.
    Return,
    /// A group member, by position in the group.
    Block(usize),
}

#[derive(Debug, Clone)]
struct ConditionNode {
    block: BlockId,
    condition: Condition,
    target: NodeRef,
    else_target: NodeRef,
    partials: Vec<Condition>,
}

/// Condition nodes of one block group with the path conditions reaching
/// each of them.
#[derive(Debug, Clone)]
pub struct ConditionGraph {
    nodes: Vec<ConditionNode>,
    body_paths: Vec<Condition>,
    return_paths: Vec<Condition>,
}

enum Step {
    Enter(NodeRef),
    Else(usize),
    Leave,
}

impl ConditionGraph {
    /// Build the node graph for `group` and walk every path from its first
    /// block.
    pub fn build(
        ctx: &BuildContext,
        group: &[BlockId],
        body: BlockId,
        ret: BlockId,
    ) -> Result<Self> {
        let Some(&entry) = group.first() else {
            return Err(DecompileError::UnsupportedStructure {
                block: body,
                reason: "empty condition group".to_string(),
            });
        };

        let resolve = |from: BlockId, target: BlockId| -> Result<NodeRef> {
            if target == body {
                Ok(NodeRef::Body)
            } else if target == ret {
                Ok(NodeRef::Return)
            } else if let Some(pos) = group.iter().position(|&b| b == target) {
                Ok(NodeRef::Block(pos))
            } else {
                log::warn!(
                    "block {from}: jump to block {target} leaves the condition group {group:?}"
                );
                Err(DecompileError::UnknownTarget {
                    block: from,
                    target,
                })
            }
        };

        let mut nodes = Vec::with_capacity(group.len());
        for &block in group {
            let condition = build_simple_condition(ctx, block)?;
            let info = ctx.graph.block(block);
            let (Some(target), Some(else_target)) = (info.target, info.else_target) else {
                return Err(DecompileError::MissingTarget { block });
            };
            nodes.push(ConditionNode {
                block,
                condition,
                target: resolve(block, target)?,
                else_target: resolve(block, else_target)?,
                partials: Vec::new(),
            });
        }

        let mut graph = ConditionGraph {
            nodes,
            body_paths: Vec::new(),
            return_paths: Vec::new(),
        };
        graph.walk(entry)?;
        log::debug!(
            "group {group:?}: {} path(s) to body, {} to return",
            graph.body_paths.len(),
            graph.return_paths.len()
        );
        Ok(graph)
    }

    fn walk(&mut self, entry: BlockId) -> Result<()> {
        let mut path: Vec<Condition> = Vec::new();
        let mut work = vec![Step::Enter(NodeRef::Block(0))];

        while let Some(step) = work.pop() {
            match step {
                Step::Enter(node) => {
                    if !path.is_empty() {
                        let partial = if path.len() == 1 {
                            path[0].clone()
                        } else {
                            Condition::And(path.clone())
                        };
                        self.record(node, partial);
                    }
                    if let NodeRef::Block(i) = node {
                        if path.len() >= self.nodes.len() {
                            return Err(DecompileError::CyclicGroup { block: entry });
                        }
                        path.push(self.nodes[i].condition.clone());
                        work.push(Step::Else(i));
                        work.push(Step::Enter(self.nodes[i].target));
                    }
                }
                Step::Else(i) => {
                    path.pop();
                    path.push(inverse(&self.nodes[i].condition));
                    work.push(Step::Leave);
                    work.push(Step::Enter(self.nodes[i].else_target));
                }
                Step::Leave => {
                    path.pop();
                }
            }
        }
        Ok(())
    }

    fn record(&mut self, node: NodeRef, partial: Condition) {
        match node {
            NodeRef::Body => self.body_paths.push(partial),
            NodeRef::Return => self.return_paths.push(partial),
            NodeRef::Block(i) => self.nodes[i].partials.push(partial),
        }
    }

    /// Path conditions reaching the body, in traversal order, before
    /// simplification.
    pub fn body_paths(&self) -> &[Condition] {
        &self.body_paths
    }

    /// Path conditions reaching the return exit.
    pub fn return_paths(&self) -> &[Condition] {
        &self.return_paths
    }

    /// Simple condition of the group member at `pos`.
    pub fn condition(&self, pos: usize) -> &Condition {
        &self.nodes[pos].condition
    }

    /// Path conditions reaching the group member at `pos`.
    pub fn partials(&self, pos: usize) -> &[Condition] {
        &self.nodes[pos].partials
    }

    /// Block of the group member at `pos`.
    pub fn block(&self, pos: usize) -> BlockId {
        self.nodes[pos].block
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Condition under which control flows from the group entry to `body`.
pub fn build_condition(
    ctx: &BuildContext,
    group: &[BlockId],
    body: BlockId,
    ret: BlockId,
) -> Result<Condition> {
    let graph = ConditionGraph::build(ctx, group, body, ret)?;
    let paths = graph.body_paths();
    if paths.is_empty() {
        return Err(DecompileError::UnreachableBody { body });
    }
    Ok(simplify_condition(&Condition::Or(paths.to_vec())))
}
