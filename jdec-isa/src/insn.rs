use std::fmt;

use crate::opcode::Opcode;

/// Inline constant carried by an assembled `ldc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    Int(i32),
    String(String),
}

/// A decoded operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    None,
    /// Signed immediate (`bipush`, `sipush`).
    Imm(i32),
    /// Local variable slot.
    Local(u16),
    /// Constant pool index, resolved by the caller.
    PoolIndex(u16),
    /// Constant written inline by the assembler.
    Constant(Constant),
    /// `iinc` slot and increment.
    Iinc { local: u16, amount: i32 },
    /// Jump target as an index into the method's instruction list.
    Label(u32),
}

/// A single decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Insn {
    /// Byte offset within the method's code.
    pub offset: u32,
    pub opcode: Opcode,
    pub operand: Operand,
}

impl Insn {
    pub fn new(offset: u32, opcode: Opcode, operand: Operand) -> Self {
        Insn {
            offset,
            opcode,
            operand,
        }
    }

    /// Local slot accessed by a load, store or `iinc`, including the
    /// `_0`..`_3` short forms.
    pub fn local_index(&self) -> Option<u16> {
        use Opcode::*;
        match self.opcode {
            Iload0 | Aload0 | Istore0 | Astore0 => Some(0),
            Iload1 | Aload1 | Istore1 | Astore1 => Some(1),
            Iload2 | Aload2 | Istore2 | Astore2 => Some(2),
            Iload3 | Aload3 | Istore3 | Astore3 => Some(3),
            _ => match self.operand {
                Operand::Local(slot) | Operand::Iinc { local: slot, .. } => Some(slot),
                _ => None,
            },
        }
    }

    /// Jump target instruction index.
    pub fn label(&self) -> Option<u32> {
        match self.operand {
            Operand::Label(target) => Some(target),
            _ => None,
        }
    }
}

impl fmt::Display for Insn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        match &self.operand {
            Operand::None => Ok(()),
            Operand::Imm(v) => write!(f, " {v}"),
            Operand::Local(slot) => write!(f, " {slot}"),
            Operand::PoolIndex(idx) => write!(f, " #{idx}"),
            Operand::Constant(Constant::Int(v)) => write!(f, " {v}"),
            Operand::Constant(Constant::String(s)) => write!(f, " {s:?}"),
            Operand::Iinc { local, amount } => write!(f, " {local} {amount}"),
            Operand::Label(target) => write!(f, " -> #{target}"),
        }
    }
}
