//! AST and block-graph model for the decompiler.

pub mod cfg;
pub mod condition;
pub mod insn;
pub mod locals;
pub mod serialize;
pub mod stmt;
pub mod types;
pub mod visitor;

pub use cfg::{BlockGraph, BlockId, OpcodeBlock};
pub use condition::{CompareOperator, Condition};
pub use insn::{ArrayAccess, Instruction, OperatorKind};
pub use locals::{LocalInstance, Locals};
pub use stmt::Statement;
pub use types::{TypeError, TypeSignature};
pub use visitor::AstVisitor;
