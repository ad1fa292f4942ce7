use crate::condition::Condition;
use crate::insn::Instruction;
use crate::locals::LocalInstance;

/// Statement nodes for decompiled code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    /// `local = value;`
    LocalAssignment {
        local: LocalInstance,
        value: Instruction,
    },
    /// `array[index] = value;`
    ArrayAssignment {
        array: Instruction,
        index: Instruction,
        value: Instruction,
    },
    /// `local += amount;`
    Increment { local: LocalInstance, amount: i32 },
    /// `return;` or `return value;`
    Return(Option<Instruction>),
    /// If statement. `else_body` is empty when there is no else branch.
    If {
        condition: Condition,
        body: Vec<Statement>,
        else_body: Vec<Statement>,
    },
    /// A comment (for regions that could not be decompiled).
    Comment(String),
}
