use jdec_ir::BlockId;
use jdec_isa::Opcode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecompileError {
    #[error("block {block}: {opcode} expects {expected} stack operand(s), found {found}")]
    StackShape {
        block: BlockId,
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    #[error("block {block}: {opcode} at {offset:#06x} pops an empty stack")]
    StackUnderflow {
        block: BlockId,
        opcode: Opcode,
        offset: u32,
    },

    #[error("block {block}: {opcode} at {offset:#06x} has a malformed operand")]
    BadOperand {
        block: BlockId,
        opcode: Opcode,
        offset: u32,
    },

    #[error("block {block}: stack depth {found} after the block, expected {expected}")]
    UnbalancedStack {
        block: BlockId,
        expected: usize,
        found: usize,
    },

    #[error("block {block}: block has no instructions")]
    EmptyBlock { block: BlockId },

    #[error("block {block}: cannot derive a condition from {opcode}")]
    UnsupportedJump { block: BlockId, opcode: Opcode },

    #[error("block {block}: conditional block has no target")]
    MissingTarget { block: BlockId },

    #[error("block {block}: target {target} is neither in the group nor the body/return block")]
    UnknownTarget { block: BlockId, target: BlockId },

    #[error("block {block}: group contains a cycle")]
    CyclicGroup { block: BlockId },

    #[error("body block {body} is unreachable from the group entry")]
    UnreachableBody { body: BlockId },

    #[error("block {block}: constant pool index {index} out of range")]
    BadConstant { block: BlockId, index: u16 },

    #[error("block {block}: unsupported control flow: {reason}")]
    UnsupportedStructure { block: BlockId, reason: String },
}

pub type Result<T> = std::result::Result<T, DecompileError>;
