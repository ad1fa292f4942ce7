use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;

use jdec_isa::Insn;

/// Index of a block within the graph.
pub type BlockId = usize;

/// A basic block: a maximal run of instructions with no internal branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeBlock {
    /// Unique block index; blocks are numbered in layout order.
    pub id: BlockId,
    /// Byte offset of the first instruction.
    pub start: u32,
    /// Index range into the instruction array `[first_insn..last_insn)`.
    pub first_insn: usize,
    pub last_insn: usize,
    /// Branch-taken successor of a conditional block. For `goto` and
    /// fall-through blocks this is the only successor.
    pub target: Option<BlockId>,
    /// Fall-through successor of a conditional block.
    pub else_target: Option<BlockId>,
    /// Block whose instructions must be replayed before this block's own
    /// when evaluating its predicate in isolation.
    pub prefix: Option<BlockId>,
    /// Predecessor block IDs.
    pub preds: Vec<BlockId>,
}

impl OpcodeBlock {
    pub fn new(id: BlockId, insns: Range<usize>) -> Self {
        OpcodeBlock {
            id,
            start: 0,
            first_insn: insns.start,
            last_insn: insns.end,
            target: None,
            else_target: None,
            prefix: None,
            preds: vec![],
        }
    }

    pub fn insn_range(&self) -> Range<usize> {
        self.first_insn..self.last_insn
    }

    pub fn is_empty(&self) -> bool {
        self.first_insn >= self.last_insn
    }
}

/// Block graph for a single method. Owns the method's instructions.
#[derive(Debug, Clone)]
pub struct BlockGraph {
    insns: Vec<Insn>,
    /// Blocks, indexed by [`BlockId`].
    pub blocks: Vec<OpcodeBlock>,
}

impl BlockGraph {
    /// Assemble a graph from explicit parts. Predecessor lists are
    /// recomputed from the successor edges.
    pub fn from_blocks(insns: Vec<Insn>, mut blocks: Vec<OpcodeBlock>) -> Self {
        for block in &mut blocks {
            block.start = insns.get(block.first_insn).map_or(0, |i| i.offset);
        }
        link_preds(&mut blocks);
        BlockGraph { insns, blocks }
    }

    /// Split decoded instructions into blocks.
    ///
    /// Leaders are the first instruction, jump targets, and instructions
    /// following a jump or return. A conditional block is additionally split
    /// where its predicate computation starts (the last point at which the
    /// operand stack is empty), so the block holds only the predicate.
    pub fn build(insns: Vec<Insn>) -> Self {
        if insns.is_empty() {
            return BlockGraph {
                insns,
                blocks: vec![],
            };
        }

        // Step 1: Identify leaders (instruction indices)
        let mut leaders = BTreeSet::new();
        leaders.insert(0usize);
        for (i, insn) in insns.iter().enumerate() {
            if let Some(target) = insn.label() {
                leaders.insert(target as usize);
            }
            if insn.opcode.is_terminator() && i + 1 < insns.len() {
                leaders.insert(i + 1);
            }
        }

        // Step 2: Split conditional blocks at the start of their predicate
        let ranges = leader_ranges(&leaders, insns.len());
        for range in &ranges {
            let last = &insns[range.end - 1];
            if last.opcode.is_conditional() {
                let split = predicate_start(&insns[range.clone()]) + range.start;
                leaders.insert(split);
            }
        }

        // Step 3: Create blocks
        let ranges = leader_ranges(&leaders, insns.len());
        let block_of = |insn_idx: usize| -> BlockId {
            ranges.partition_point(|r| r.end <= insn_idx)
        };
        let mut blocks: Vec<OpcodeBlock> = ranges
            .iter()
            .enumerate()
            .map(|(id, range)| {
                let mut block = OpcodeBlock::new(id, range.clone());
                block.start = insns[range.start].offset;
                block
            })
            .collect();

        // Step 4: Add edges
        let count = blocks.len();
        for block in &mut blocks {
            let last = &insns[block.last_insn - 1];
            let next = (block.id + 1 < count).then_some(block.id + 1);
            let jump = last.label().map(|t| block_of(t as usize));
            if last.opcode.is_return() {
                // No successors
            } else if last.opcode.is_conditional() {
                block.target = jump;
                block.else_target = next;
            } else if last.opcode.is_jump() {
                block.target = jump;
            } else {
                block.target = next;
            }
        }

        link_preds(&mut blocks);

        // Step 5: A conditional block consuming values left by its
        // fall-through predecessor replays that block as its prefix. Only
        // a sole predecessor qualifies: at a join the operand depends on
        // the incoming edge.
        for id in 1..count {
            let prev = &blocks[id - 1];
            let falls_into = prev.target == Some(id) && !insns[prev.last_insn - 1].opcode.is_jump();
            let sole_pred = blocks[id].preds == [id - 1];
            if falls_into
                && sole_pred
                && net_stack_effect(&insns[prev.insn_range()]) > 0
                && insns[blocks[id].last_insn - 1].opcode.is_conditional()
            {
                blocks[id].prefix = Some(id - 1);
            }
        }

        BlockGraph { insns, blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, id: BlockId) -> &OpcodeBlock {
        &self.blocks[id]
    }

    /// Instructions of one block.
    pub fn insns(&self, id: BlockId) -> &[Insn] {
        &self.insns[self.blocks[id].insn_range()]
    }

    /// Terminal instruction of a block.
    pub fn last(&self, id: BlockId) -> Option<&Insn> {
        self.insns(id).last()
    }

    pub fn is_conditional(&self, id: BlockId) -> bool {
        self.last(id).is_some_and(|i| i.opcode.is_conditional())
    }

    /// Whether the block ends with an unconditional jump.
    pub fn is_goto(&self, id: BlockId) -> bool {
        self.last(id)
            .is_some_and(|i| i.opcode.is_jump() && !i.opcode.is_conditional())
    }

    /// Operands a block leaves on the stack, negative when it consumes
    /// values pushed before it. Jumps count their pops.
    pub fn stack_effect(&self, id: BlockId) -> i64 {
        net_stack_effect(self.insns(id))
    }

    /// Successors, branch target first.
    pub fn successors(&self, id: BlockId) -> impl Iterator<Item = BlockId> + '_ {
        let block = &self.blocks[id];
        block.target.into_iter().chain(block.else_target)
    }
}

impl fmt::Display for BlockGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            write!(f, "block {} @{:#06x}", block.id, block.start)?;
            if let Some(prefix) = block.prefix {
                write!(f, " prefix={prefix}")?;
            }
            match (block.target, block.else_target) {
                (Some(t), Some(e)) => write!(f, " target={t} else={e}")?,
                (Some(t), None) => write!(f, " next={t}")?,
                _ => {}
            }
            writeln!(f)?;
            for insn in self.insns(block.id) {
                writeln!(f, "    {:#06x}  {insn}", insn.offset)?;
            }
        }
        Ok(())
    }
}

fn leader_ranges(leaders: &BTreeSet<usize>, len: usize) -> Vec<Range<usize>> {
    let starts: Vec<usize> = leaders.iter().copied().filter(|&l| l < len).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| start..starts.get(i + 1).copied().unwrap_or(len))
        .collect()
}

/// Index (relative to `insns`) of the last instruction before which the
/// operand stack is empty.
fn predicate_start(insns: &[Insn]) -> usize {
    let mut depth: i64 = 0;
    let mut start = 0;
    for (i, insn) in insns.iter().enumerate() {
        if depth <= 0 {
            start = i;
        }
        let (pops, pushes) = insn.opcode.stack_effect();
        depth += pushes as i64 - pops as i64;
    }
    start
}

fn net_stack_effect(insns: &[Insn]) -> i64 {
    insns
        .iter()
        .map(|insn| {
            let (pops, pushes) = insn.opcode.stack_effect();
            pushes as i64 - pops as i64
        })
        .sum()
}

fn link_preds(blocks: &mut [OpcodeBlock]) {
    for block in blocks.iter_mut() {
        block.preds.clear();
    }
    for bi in 0..blocks.len() {
        let succs: Vec<BlockId> = blocks[bi].target.into_iter().chain(blocks[bi].else_target).collect();
        for s in succs {
            if s < blocks.len() && !blocks[s].preds.contains(&bi) {
                blocks[s].preds.push(bi);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdec_isa::assemble;

    #[test]
    fn test_predicate_start() {
        let insns = assemble(&["iconst_1", "istore_1", "iload_0", "iload_1", "if_icmplt x", "x:", "return"]).unwrap();
        assert_eq!(predicate_start(&insns[..5]), 2);
    }

    #[test]
    fn test_leader_ranges() {
        let leaders: BTreeSet<usize> = [0, 2, 5].into_iter().collect();
        assert_eq!(leader_ranges(&leaders, 6), vec![0..2, 2..5, 5..6]);
    }
}
