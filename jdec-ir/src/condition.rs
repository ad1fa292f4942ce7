use std::fmt;

use jdec_isa::Opcode;

use crate::insn::Instruction;

/// Boolean condition trees.
///
/// Conditions are values: rewriting one (inversion, simplification) builds a
/// new tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Truth test of a value: `value`, or `!value` when `inverse` is set.
    Boolean { value: Instruction, inverse: bool },
    /// `left op right`.
    Compare {
        left: Instruction,
        right: Instruction,
        op: CompareOperator,
    },
    /// Conjunction of the operands, in order.
    And(Vec<Condition>),
    /// Disjunction of the operands, in order.
    Or(Vec<Condition>),
    /// Logical negation of a whole sub-condition.
    Inverse(Box<Condition>),
}

impl Condition {
    pub fn boolean(value: Instruction, inverse: bool) -> Self {
        Condition::Boolean { value, inverse }
    }

    pub fn compare(left: Instruction, right: Instruction, op: CompareOperator) -> Self {
        Condition::Compare { left, right, op }
    }

    /// Binding strength when rendered; higher binds tighter.
    fn precedence(&self) -> u8 {
        match self {
            Condition::Or(_) => 3,
            Condition::And(_) => 4,
            Condition::Compare { op, .. } => op.precedence(),
            Condition::Boolean { .. } | Condition::Inverse(_) => 14,
        }
    }
}

/// Comparison operators of conditional jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOperator::Eq => "==",
            CompareOperator::Ne => "!=",
            CompareOperator::Lt => "<",
            CompareOperator::Le => "<=",
            CompareOperator::Gt => ">",
            CompareOperator::Ge => ">=",
        }
    }

    /// The operator that holds exactly when `self` does not.
    pub fn inverse(self) -> Self {
        match self {
            CompareOperator::Eq => CompareOperator::Ne,
            CompareOperator::Ne => CompareOperator::Eq,
            CompareOperator::Lt => CompareOperator::Ge,
            CompareOperator::Ge => CompareOperator::Lt,
            CompareOperator::Gt => CompareOperator::Le,
            CompareOperator::Le => CompareOperator::Gt,
        }
    }

    /// Comparison tested by a conditional jump, if it is an ordering or
    /// equality test.
    pub fn from_opcode(opcode: Opcode) -> Option<Self> {
        use Opcode::*;
        Some(match opcode {
            Ifeq | IfIcmpeq | IfAcmpeq | Ifnull => CompareOperator::Eq,
            Ifne | IfIcmpne | IfAcmpne | Ifnonnull => CompareOperator::Ne,
            Iflt | IfIcmplt => CompareOperator::Lt,
            Ifle | IfIcmple => CompareOperator::Le,
            Ifgt | IfIcmpgt => CompareOperator::Gt,
            Ifge | IfIcmpge => CompareOperator::Ge,
            _ => return None,
        })
    }

    fn precedence(self) -> u8 {
        match self {
            CompareOperator::Eq | CompareOperator::Ne => 8,
            _ => 9,
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Boolean { value, inverse } => {
                if *inverse {
                    f.write_str("!")?;
                    if value.precedence() < 14 {
                        return write!(f, "({value})");
                    }
                }
                write!(f, "{value}")
            }
            Condition::Compare { left, right, op } => {
                let prec = op.precedence();
                for (i, operand) in [left, right].into_iter().enumerate() {
                    if i != 0 {
                        write!(f, " {op} ")?;
                    }
                    if operand.precedence() <= prec {
                        write!(f, "({operand})")?;
                    } else {
                        write!(f, "{operand}")?;
                    }
                }
                Ok(())
            }
            Condition::And(operands) => write_junction(f, operands, " && ", "true", 4),
            Condition::Or(operands) => write_junction(f, operands, " || ", "false", 3),
            Condition::Inverse(inner) => write!(f, "!({inner})"),
        }
    }
}

fn write_junction(
    f: &mut fmt::Formatter<'_>,
    operands: &[Condition],
    sep: &str,
    empty: &str,
    prec: u8,
) -> fmt::Result {
    if operands.is_empty() {
        return f.write_str(empty);
    }
    for (i, operand) in operands.iter().enumerate() {
        if i != 0 {
            f.write_str(sep)?;
        }
        if operand.precedence() <= prec {
            write!(f, "({operand})")?;
        } else {
            write!(f, "{operand}")?;
        }
    }
    Ok(())
}
