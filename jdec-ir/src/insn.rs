use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::locals::LocalInstance;
use crate::types::TypeSignature;

/// Operand-producing expression nodes.
///
/// Every node owns its children exclusively; trees have no sharing and no
/// back-edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Instruction {
    IntConstant(i32),
    NullConstant,
    StringConstant(String),
    /// Read of a local variable.
    LocalAccess(LocalInstance),
    /// Array element load: `array[index]`.
    ArrayAccess(ArrayAccess),
    /// Binary arithmetic: `left op right`.
    Operator {
        op: OperatorKind,
        left: Box<Instruction>,
        right: Box<Instruction>,
    },
    /// Arithmetic negation: `-value`.
    Negative(Box<Instruction>),
}

impl Instruction {
    pub fn local(local: LocalInstance) -> Self {
        Instruction::LocalAccess(local)
    }

    pub fn array_access(array: Instruction, index: Instruction) -> Self {
        Instruction::ArrayAccess(ArrayAccess::new(array, index))
    }

    pub fn operator(op: OperatorKind, left: Instruction, right: Instruction) -> Self {
        Instruction::Operator {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Static type of the value this node produces.
    pub fn infer_type(&self) -> TypeSignature {
        match self {
            Instruction::IntConstant(_) => TypeSignature::Int,
            Instruction::NullConstant => TypeSignature::object(),
            Instruction::StringConstant(_) => TypeSignature::string(),
            Instruction::LocalAccess(local) => local.ty.clone(),
            Instruction::ArrayAccess(access) => access.infer_type(),
            Instruction::Operator { left, .. } => left.infer_type(),
            Instruction::Negative(value) => value.infer_type(),
        }
    }

    /// Binding strength when rendered; higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            Instruction::Operator { op, .. } => op.precedence(),
            Instruction::Negative(_) => 13,
            _ => 16,
        }
    }
}

/// Loads an element from an array value.
///
/// The component type is inferred from `array` on first use and cached until
/// `array` is replaced.
#[derive(Debug, Clone)]
pub struct ArrayAccess {
    array: Box<Instruction>,
    index: Box<Instruction>,
    component: OnceCell<TypeSignature>,
}

impl ArrayAccess {
    pub fn new(array: Instruction, index: Instruction) -> Self {
        ArrayAccess {
            array: Box::new(array),
            index: Box::new(index),
            component: OnceCell::new(),
        }
    }

    /// The instruction providing the array object.
    pub fn array(&self) -> &Instruction {
        &self.array
    }

    /// Replace the array operand. Invalidates the cached component type.
    pub fn set_array(&mut self, array: Instruction) {
        self.array = Box::new(array);
        self.component = OnceCell::new();
    }

    /// The instruction providing the element index.
    pub fn index(&self) -> &Instruction {
        &self.index
    }

    pub fn set_index(&mut self, index: Instruction) {
        self.index = Box::new(index);
    }

    /// Component type of the array operand, or `Object` when the operand
    /// is not statically an array.
    pub fn infer_type(&self) -> TypeSignature {
        self.component
            .get_or_init(|| {
                self.array
                    .infer_type()
                    .array_component()
                    .cloned()
                    .unwrap_or_else(TypeSignature::object)
            })
            .clone()
    }

    /// Whether a component type is currently cached.
    pub fn has_cached_type(&self) -> bool {
        self.component.get().is_some()
    }
}

// Equality and hashing are structural; the type cache does not participate.
impl PartialEq for ArrayAccess {
    fn eq(&self, other: &Self) -> bool {
        self.array == other.array && self.index == other.index
    }
}

impl Eq for ArrayAccess {}

impl Hash for ArrayAccess {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.array.hash(state);
        self.index.hash(state);
    }
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    And,
    Or,
    Xor,
}

impl OperatorKind {
    pub fn symbol(self) -> &'static str {
        match self {
            OperatorKind::Add => "+",
            OperatorKind::Sub => "-",
            OperatorKind::Mul => "*",
            OperatorKind::Div => "/",
            OperatorKind::Rem => "%",
            OperatorKind::Shl => "<<",
            OperatorKind::Shr => ">>",
            OperatorKind::And => "&",
            OperatorKind::Or => "|",
            OperatorKind::Xor => "^",
        }
    }

    /// Java operator precedence.
    pub fn precedence(self) -> u8 {
        match self {
            OperatorKind::Mul | OperatorKind::Div | OperatorKind::Rem => 12,
            OperatorKind::Add | OperatorKind::Sub => 11,
            OperatorKind::Shl | OperatorKind::Shr => 10,
            OperatorKind::And => 7,
            OperatorKind::Xor => 6,
            OperatorKind::Or => 5,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::IntConstant(v) => write!(f, "{v}"),
            Instruction::NullConstant => f.write_str("null"),
            Instruction::StringConstant(s) => write!(f, "\"{}\"", escape_java_string(s)),
            Instruction::LocalAccess(local) => write!(f, "{local}"),
            Instruction::ArrayAccess(access) => write!(f, "{access}"),
            Instruction::Operator { op, left, right } => {
                let prec = op.precedence();
                write_operand(f, left, left.precedence() < prec)?;
                write!(f, " {} ", op.symbol())?;
                // Left-associative: equal precedence on the right needs parens.
                write_operand(f, right, right.precedence() <= prec)
            }
            Instruction::Negative(value) => {
                f.write_str("-")?;
                write_operand(f, value, value.precedence() < 13)
            }
        }
    }
}

impl fmt::Display for ArrayAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_operand(f, &self.array, self.array.precedence() < 16)?;
        write!(f, "[{}]", self.index)
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, insn: &Instruction, paren: bool) -> fmt::Result {
    if paren {
        write!(f, "({insn})")
    } else {
        write!(f, "{insn}")
    }
}

fn escape_java_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
