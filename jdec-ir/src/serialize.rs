//! Tagged-record serialization of the AST.
//!
//! Every node serializes as a map whose first entry is `"id"`, a numeric kind
//! tag from [`tags`], followed by one entry per owned child in the node's
//! own order. Any serde format can carry the records.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::condition::{CompareOperator, Condition};
use crate::insn::{Instruction, OperatorKind};
use crate::stmt::Statement;

pub mod tags {
    pub const STATEMENT_ID_LOCAL_ASSIGN: u32 = 0x01;
    pub const STATEMENT_ID_ARRAY_ASSIGN: u32 = 0x02;
    pub const STATEMENT_ID_INCREMENT: u32 = 0x03;
    pub const STATEMENT_ID_RETURN: u32 = 0x04;
    pub const STATEMENT_ID_IF: u32 = 0x05;
    pub const STATEMENT_ID_COMMENT: u32 = 0x06;

    pub const STATEMENT_ID_INT_CONSTANT: u32 = 0x10;
    pub const STATEMENT_ID_NULL_CONSTANT: u32 = 0x11;
    pub const STATEMENT_ID_STRING_CONSTANT: u32 = 0x12;
    pub const STATEMENT_ID_LOCAL_ACCESS: u32 = 0x13;
    pub const STATEMENT_ID_ARRAY_ACCESS: u32 = 0x14;
    pub const STATEMENT_ID_OPERATOR: u32 = 0x15;
    pub const STATEMENT_ID_NEGATIVE: u32 = 0x16;

    pub const CONDITION_ID_BOOL: u32 = 0x20;
    pub const CONDITION_ID_COMPARE: u32 = 0x21;
    pub const CONDITION_ID_AND: u32 = 0x22;
    pub const CONDITION_ID_OR: u32 = 0x23;
    pub const CONDITION_ID_INVERSE: u32 = 0x24;
}

impl Serialize for Instruction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Instruction::IntConstant(v) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("id", &tags::STATEMENT_ID_INT_CONSTANT)?;
                map.serialize_entry("cst", v)?;
                map.end()
            }
            Instruction::NullConstant => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("id", &tags::STATEMENT_ID_NULL_CONSTANT)?;
                map.end()
            }
            Instruction::StringConstant(s) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("id", &tags::STATEMENT_ID_STRING_CONSTANT)?;
                map.serialize_entry("cst", s)?;
                map.end()
            }
            Instruction::LocalAccess(local) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("id", &tags::STATEMENT_ID_LOCAL_ACCESS)?;
                map.serialize_entry("local", local)?;
                map.end()
            }
            Instruction::ArrayAccess(access) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("id", &tags::STATEMENT_ID_ARRAY_ACCESS)?;
                map.serialize_entry("array", access.array())?;
                map.serialize_entry("index", access.index())?;
                map.end()
            }
            Instruction::Operator { op, left, right } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("id", &tags::STATEMENT_ID_OPERATOR)?;
                map.serialize_entry("op", op)?;
                map.serialize_entry("left", left)?;
                map.serialize_entry("right", right)?;
                map.end()
            }
            Instruction::Negative(value) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("id", &tags::STATEMENT_ID_NEGATIVE)?;
                map.serialize_entry("val", value)?;
                map.end()
            }
        }
    }
}

impl Serialize for OperatorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl Serialize for CompareOperator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Condition::Boolean { value, inverse } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("id", &tags::CONDITION_ID_BOOL)?;
                map.serialize_entry("val", value)?;
                map.serialize_entry("inverse", inverse)?;
                map.end()
            }
            Condition::Compare { left, right, op } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("id", &tags::CONDITION_ID_COMPARE)?;
                map.serialize_entry("left", left)?;
                map.serialize_entry("right", right)?;
                map.serialize_entry("op", op)?;
                map.end()
            }
            Condition::And(operands) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("id", &tags::CONDITION_ID_AND)?;
                map.serialize_entry("args", operands)?;
                map.end()
            }
            Condition::Or(operands) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("id", &tags::CONDITION_ID_OR)?;
                map.serialize_entry("args", operands)?;
                map.end()
            }
            Condition::Inverse(inner) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("id", &tags::CONDITION_ID_INVERSE)?;
                map.serialize_entry("val", inner)?;
                map.end()
            }
        }
    }
}

impl Serialize for Statement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Statement::LocalAssignment { local, value } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("id", &tags::STATEMENT_ID_LOCAL_ASSIGN)?;
                map.serialize_entry("local", local)?;
                map.serialize_entry("val", value)?;
                map.end()
            }
            Statement::ArrayAssignment {
                array,
                index,
                value,
            } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("id", &tags::STATEMENT_ID_ARRAY_ASSIGN)?;
                map.serialize_entry("array", array)?;
                map.serialize_entry("index", index)?;
                map.serialize_entry("val", value)?;
                map.end()
            }
            Statement::Increment { local, amount } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("id", &tags::STATEMENT_ID_INCREMENT)?;
                map.serialize_entry("local", local)?;
                map.serialize_entry("val", amount)?;
                map.end()
            }
            Statement::Return(value) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("id", &tags::STATEMENT_ID_RETURN)?;
                map.serialize_entry("val", value)?;
                map.end()
            }
            Statement::If {
                condition,
                body,
                else_body,
            } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("id", &tags::STATEMENT_ID_IF)?;
                map.serialize_entry("condition", condition)?;
                map.serialize_entry("body", body)?;
                map.serialize_entry("else", else_body)?;
                map.end()
            }
            Statement::Comment(text) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("id", &tags::STATEMENT_ID_COMMENT)?;
                map.serialize_entry("text", text)?;
                map.end()
            }
        }
    }
}
