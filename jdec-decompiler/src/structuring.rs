use std::collections::{BTreeSet, HashSet};

use jdec_ir::{BlockGraph, BlockId};

use crate::condition_builder::build_condition;
use crate::context::BuildContext;
use crate::error::{DecompileError, Result};
use crate::section::{BlockSection, ConditionalSection};

/// Partition a method's blocks into nested sections.
///
/// Only forward control flow is supported: runs of conditional blocks
/// guarding a body, optionally followed by an else branch.
pub fn structure_method(ctx: &BuildContext) -> Result<Vec<BlockSection>> {
    let graph = ctx.graph;
    if graph.is_empty() {
        return Ok(vec![]);
    }

    for block in &graph.blocks {
        if let Some(target) = graph.successors(block.id).find(|&s| s <= block.id) {
            return Err(DecompileError::UnsupportedStructure {
                block: block.id,
                reason: format!("backward edge to block {target}"),
            });
        }
    }

    // Sections share one stack, so a value must not depend on the edge
    // that reached a join.
    for block in &graph.blocks {
        if graph.stack_effect(block.id) <= 0 {
            continue;
        }
        if let Some(join) = graph.successors(block.id).find(|&s| graph.block(s).preds.len() > 1) {
            return Err(DecompileError::UnsupportedStructure {
                block: block.id,
                reason: format!("operands flow into join block {join}"),
            });
        }
    }

    let prefixes: HashSet<BlockId> = graph.blocks.iter().filter_map(|b| b.prefix).collect();
    let sctx = StructCtx { ctx, prefixes };
    sctx.structure_range(0, graph.len())
}

struct StructCtx<'a> {
    ctx: &'a BuildContext<'a>,
    /// Blocks replayed as part of a following condition instead of inline.
    prefixes: HashSet<BlockId>,
}

impl StructCtx<'_> {
    fn graph(&self) -> &BlockGraph {
        self.ctx.graph
    }

    /// Sections for blocks `start..end`.
    fn structure_range(&self, start: BlockId, end: BlockId) -> Result<Vec<BlockSection>> {
        let mut sections = Vec::new();
        let mut i = start;
        while i < end {
            if self.prefixes.contains(&i) {
                i += 1;
                continue;
            }
            if !self.graph().is_conditional(i) {
                sections.push(BlockSection::Inline(i));
                i += 1;
                continue;
            }

            let (group, exits) = self.grow_group(i, end);
            let body = group[group.len() - 1] + 1;
            if !exits.contains(&body) {
                return Err(self.unsupported(i, format!("no fall-through body after {group:?}")));
            }
            let Some(ret) = exits.iter().copied().find(|&b| b != body) else {
                return Err(self.unsupported(i, format!("group {group:?} has a single exit")));
            };
            if ret <= body || ret > end {
                return Err(self.unsupported(
                    i,
                    format!("exit block {ret} outside region {body}..{end}"),
                ));
            }

            let condition = build_condition(self.ctx, &group, body, ret)?;
            let then_body = self.structure_range(body, ret)?;

            // then-body ending in `goto X` past `ret` means ret..X is the else branch
            let else_end = self.else_end(body, ret, end);
            let else_body = match else_end {
                Some(else_end) => self.structure_range(ret, else_end)?,
                None => vec![],
            };

            log::debug!(
                "if at block {i}: group {group:?}, then {body}..{ret}, else {else_end:?}"
            );
            sections.push(BlockSection::Conditional(ConditionalSection {
                condition,
                body: then_body,
                else_body,
            }));
            i = else_end.unwrap_or(ret);
        }
        Ok(sections)
    }

    /// Grow a group of consecutive conditional blocks from `entry` while it
    /// keeps exactly two exits. Returns the group and its exits.
    fn grow_group(&self, entry: BlockId, end: BlockId) -> (Vec<BlockId>, BTreeSet<BlockId>) {
        let mut group = vec![entry];
        let mut exits = self.exits(&group);
        let mut next = entry + 1;
        while next < end && self.graph().is_conditional(next) && exits.contains(&next) {
            let mut candidate = group.clone();
            candidate.push(next);
            let candidate_exits = self.exits(&candidate);
            if candidate_exits.len() != 2 {
                break;
            }
            group = candidate;
            exits = candidate_exits;
            next += 1;
        }
        (group, exits)
    }

    /// Successors of `group` members that are not themselves members.
    fn exits(&self, group: &[BlockId]) -> BTreeSet<BlockId> {
        group
            .iter()
            .flat_map(|&b| self.graph().successors(b))
            .filter(|s| !group.contains(s))
            .collect()
    }

    fn else_end(&self, body: BlockId, ret: BlockId, end: BlockId) -> Option<BlockId> {
        let last = ret - 1;
        if last < body || !self.graph().is_goto(last) {
            return None;
        }
        let target = self.graph().block(last).target?;
        // A jump past the region end targets the enclosing join point.
        (target > ret).then(|| target.min(end))
    }

    fn unsupported(&self, block: BlockId, reason: String) -> DecompileError {
        log::warn!("block {block}: {reason}");
        DecompileError::UnsupportedStructure { block, reason }
    }
}
