#![allow(dead_code)]

use jdec_ir::{BlockGraph, BlockId, Instruction, Locals, OpcodeBlock, TypeSignature};
use jdec_isa::{assemble, Insn, Opcode, Operand};

/// Assembles a graph block by block with explicit edges, for shapes the
/// leader analysis would never produce.
#[derive(Default)]
pub struct GraphBuilder {
    insns: Vec<Insn>,
    blocks: Vec<OpcodeBlock>,
    offset: u32,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(
        &mut self,
        code: &[(Opcode, Operand)],
        target: Option<BlockId>,
        else_target: Option<BlockId>,
    ) -> BlockId {
        let first = self.insns.len();
        for (opcode, operand) in code {
            self.insns.push(Insn::new(self.offset, *opcode, operand.clone()));
            self.offset += opcode.format().size() as u32;
        }
        let id = self.blocks.len();
        let mut block = OpcodeBlock::new(id, first..self.insns.len());
        block.target = target;
        block.else_target = else_target;
        self.blocks.push(block);
        id
    }

    pub fn set_prefix(&mut self, block: BlockId, prefix: BlockId) {
        self.blocks[block].prefix = Some(prefix);
    }

    pub fn build(self) -> BlockGraph {
        BlockGraph::from_blocks(self.insns, self.blocks)
    }
}

pub fn op(opcode: Opcode) -> (Opcode, Operand) {
    (opcode, Operand::None)
}

pub fn iload(slot: u16) -> (Opcode, Operand) {
    (Opcode::Iload, Operand::Local(slot))
}

pub fn aload(slot: u16) -> (Opcode, Operand) {
    (Opcode::Aload, Operand::Local(slot))
}

pub fn bipush(value: i32) -> (Opcode, Operand) {
    (Opcode::Bipush, Operand::Imm(value))
}

/// A branch; the label is irrelevant since edges are given explicitly.
pub fn jump(opcode: Opcode) -> (Opcode, Operand) {
    (opcode, Operand::Label(0))
}

pub fn assembled(lines: &[&str]) -> BlockGraph {
    BlockGraph::build(assemble(lines).unwrap())
}

/// Locals `names[i]` at slot `i`, all of type `ty`.
pub fn locals_of(ty: TypeSignature, names: &[&str]) -> Locals {
    let mut locals = Locals::new();
    for (slot, name) in names.iter().enumerate() {
        locals.declare(slot as u16, *name, ty.clone());
    }
    locals
}

pub fn var(locals: &Locals, slot: u16) -> Instruction {
    Instruction::local(locals.get(slot).unwrap().clone())
}
