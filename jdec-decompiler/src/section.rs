//! Composable units of a structured method body.

use jdec_ir::{BlockId, Condition, Instruction, Statement};

use crate::context::BuildContext;
use crate::error::{DecompileError, Result};
use crate::stmt_builder;

/// A region of the block graph that can replay itself into a statement
/// list and an evaluation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockSection {
    /// A single block, replayed in place.
    Inline(BlockId),
    /// An `if` over nested sections.
    Conditional(ConditionalSection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalSection {
    pub condition: Condition,
    pub body: Vec<BlockSection>,
    pub else_body: Vec<BlockSection>,
}

impl BlockSection {
    /// Append this section's statements to `stmts`, updating `stack` with
    /// the operands it leaves behind.
    pub fn append_to(
        &self,
        ctx: &BuildContext,
        stmts: &mut Vec<Statement>,
        stack: &mut Vec<Instruction>,
    ) -> Result<()> {
        match self {
            BlockSection::Inline(block) => stmt_builder::append_block(ctx, *block, stmts, stack),
            BlockSection::Conditional(section) => {
                let body = append_branch(ctx, &section.body, stack)?;
                let else_body = append_branch(ctx, &section.else_body, stack)?;
                stmts.push(Statement::If {
                    condition: section.condition.clone(),
                    body,
                    else_body,
                });
                Ok(())
            }
        }
    }

    /// Blocks covered by this section, in layout order.
    pub fn blocks(&self) -> Vec<BlockId> {
        let mut out = Vec::new();
        self.collect_blocks(&mut out);
        out
    }

    fn collect_blocks(&self, out: &mut Vec<BlockId>) {
        match self {
            BlockSection::Inline(block) => out.push(*block),
            BlockSection::Conditional(section) => {
                for nested in section.body.iter().chain(&section.else_body) {
                    nested.collect_blocks(out);
                }
            }
        }
    }
}

/// Replay `sections` into a fresh statement list against the shared stack.
pub fn append_all(
    ctx: &BuildContext,
    sections: &[BlockSection],
    stack: &mut Vec<Instruction>,
) -> Result<Vec<Statement>> {
    let mut stmts = Vec::new();
    for section in sections {
        section.append_to(ctx, &mut stmts, stack)?;
    }
    Ok(stmts)
}

/// Like [`append_all`], but the branch must leave the stack as deep as it
/// found it.
fn append_branch(
    ctx: &BuildContext,
    sections: &[BlockSection],
    stack: &mut Vec<Instruction>,
) -> Result<Vec<Statement>> {
    let depth = stack.len();
    let stmts = append_all(ctx, sections, stack)?;
    if stack.len() != depth {
        let block = sections
            .last()
            .and_then(|s| s.blocks().last().copied())
            .unwrap_or_default();
        return Err(DecompileError::UnbalancedStack {
            block,
            expected: depth,
            found: stack.len(),
        });
    }
    Ok(stmts)
}
