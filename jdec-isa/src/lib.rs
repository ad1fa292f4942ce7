//! JVM instruction set subset used by the decompiler.
//!
//! This crate provides opcode definitions, operand formats, a decoder for raw
//! method bytecode and a small line-oriented assembler used by fixtures and
//! the command-line front end.

pub use bitflags;

pub mod asm;
pub mod decoder;
pub mod insn;
pub mod opcode;

pub use asm::{AsmError, assemble};
pub use decoder::{DecodeError, decode};
pub use insn::{Constant, Insn, Operand};
pub use opcode::{Format, Opcode, OpcodeFlags};
