//! Double-dispatch traversal over instructions, conditions and statements.
//!
//! Every `visit_*` method defaults to a no-op, so a visitor only implements
//! the node kinds it cares about. `accept` always recurses into children
//! regardless of which methods a visitor overrides.

use crate::condition::Condition;
use crate::insn::{ArrayAccess, Instruction, OperatorKind};
use crate::locals::LocalInstance;
use crate::stmt::Statement;

pub trait AstVisitor {
    fn visit_int_constant(&mut self, _value: i32) {}
    fn visit_null_constant(&mut self) {}
    fn visit_string_constant(&mut self, _value: &str) {}
    fn visit_local_access(&mut self, _local: &LocalInstance) {}
    fn visit_array_access(&mut self, _access: &ArrayAccess) {}
    fn visit_operator(&mut self, _op: OperatorKind, _left: &Instruction, _right: &Instruction) {}
    fn visit_negative(&mut self, _value: &Instruction) {}
    fn visit_condition(&mut self, _condition: &Condition) {}
    fn visit_statement(&mut self, _stmt: &Statement) {}
}

impl Instruction {
    /// Visit this node, then its children. `ArrayAccess` visits the array
    /// operand before the index; `Operator` visits left before right.
    pub fn accept(&self, visitor: &mut dyn AstVisitor) {
        match self {
            Instruction::IntConstant(v) => visitor.visit_int_constant(*v),
            Instruction::NullConstant => visitor.visit_null_constant(),
            Instruction::StringConstant(s) => visitor.visit_string_constant(s),
            Instruction::LocalAccess(local) => visitor.visit_local_access(local),
            Instruction::ArrayAccess(access) => {
                visitor.visit_array_access(access);
                access.array().accept(visitor);
                access.index().accept(visitor);
            }
            Instruction::Operator { op, left, right } => {
                visitor.visit_operator(*op, left, right);
                left.accept(visitor);
                right.accept(visitor);
            }
            Instruction::Negative(value) => {
                visitor.visit_negative(value);
                value.accept(visitor);
            }
        }
    }
}

impl Condition {
    pub fn accept(&self, visitor: &mut dyn AstVisitor) {
        visitor.visit_condition(self);
        match self {
            Condition::Boolean { value, .. } => value.accept(visitor),
            Condition::Compare { left, right, .. } => {
                left.accept(visitor);
                right.accept(visitor);
            }
            Condition::And(operands) | Condition::Or(operands) => {
                for operand in operands {
                    operand.accept(visitor);
                }
            }
            Condition::Inverse(inner) => inner.accept(visitor),
        }
    }
}

impl Statement {
    pub fn accept(&self, visitor: &mut dyn AstVisitor) {
        visitor.visit_statement(self);
        match self {
            Statement::LocalAssignment { value, .. } => value.accept(visitor),
            Statement::ArrayAssignment {
                array,
                index,
                value,
            } => {
                array.accept(visitor);
                index.accept(visitor);
                value.accept(visitor);
            }
            Statement::Increment { .. } | Statement::Comment(_) => {}
            Statement::Return(value) => {
                if let Some(value) = value {
                    value.accept(visitor);
                }
            }
            Statement::If {
                condition,
                body,
                else_body,
            } => {
                condition.accept(visitor);
                for stmt in body.iter().chain(else_body) {
                    stmt.accept(visitor);
                }
            }
        }
    }
}
