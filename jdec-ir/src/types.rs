use std::fmt;

use serde::{Serialize, Serializer};

/// Errors from descriptor parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("empty type descriptor")]
    Empty,
    #[error("unexpected `{found}` at position {pos} in descriptor `{descriptor}`")]
    UnexpectedChar {
        descriptor: String,
        pos: usize,
        found: char,
    },
    #[error("unterminated class name in descriptor `{0}`")]
    UnterminatedClass(String),
    #[error("trailing characters in descriptor `{0}`")]
    Trailing(String),
}

/// A JVM field type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    Void,
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    /// Class type by internal name, e.g. `java/lang/String`.
    Class(String),
    Array(Box<TypeSignature>),
}

impl TypeSignature {
    pub fn object() -> Self {
        TypeSignature::Class("java/lang/Object".into())
    }

    pub fn string() -> Self {
        TypeSignature::Class("java/lang/String".into())
    }

    pub fn array_of(component: TypeSignature) -> Self {
        TypeSignature::Array(Box::new(component))
    }

    /// Element type if this is an array type.
    pub fn array_component(&self) -> Option<&TypeSignature> {
        match self {
            TypeSignature::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Number of local variable slots a value of this type occupies.
    pub fn slot_size(&self) -> u16 {
        match self {
            TypeSignature::Long | TypeSignature::Double => 2,
            TypeSignature::Void => 0,
            _ => 1,
        }
    }

    /// JVM descriptor form, e.g. `[I`.
    pub fn descriptor(&self) -> String {
        match self {
            TypeSignature::Void => "V".into(),
            TypeSignature::Boolean => "Z".into(),
            TypeSignature::Byte => "B".into(),
            TypeSignature::Char => "C".into(),
            TypeSignature::Short => "S".into(),
            TypeSignature::Int => "I".into(),
            TypeSignature::Long => "J".into(),
            TypeSignature::Float => "F".into(),
            TypeSignature::Double => "D".into(),
            TypeSignature::Class(name) => format!("L{name};"),
            TypeSignature::Array(component) => format!("[{}", component.descriptor()),
        }
    }

    /// Parse a single field descriptor.
    pub fn parse(descriptor: &str) -> Result<Self, TypeError> {
        if descriptor.is_empty() {
            return Err(TypeError::Empty);
        }
        let (ty, end) = parse_at(descriptor, 0)?;
        if end != descriptor.len() {
            return Err(TypeError::Trailing(descriptor.to_string()));
        }
        Ok(ty)
    }

    /// Parse a method descriptor such as `(I[I)V` into parameter and return
    /// types.
    pub fn parse_method(descriptor: &str) -> Result<(Vec<TypeSignature>, TypeSignature), TypeError> {
        let unexpected = |pos: usize| TypeError::UnexpectedChar {
            descriptor: descriptor.to_string(),
            pos,
            found: descriptor[pos..].chars().next().unwrap_or('\0'),
        };
        if descriptor.is_empty() {
            return Err(TypeError::Empty);
        }
        if !descriptor.starts_with('(') {
            return Err(unexpected(0));
        }
        let mut pos = 1;
        let mut params = Vec::new();
        loop {
            match descriptor.as_bytes().get(pos) {
                Some(b')') => break,
                Some(_) => {
                    let (ty, end) = parse_at(descriptor, pos)?;
                    if ty == TypeSignature::Void {
                        return Err(unexpected(pos));
                    }
                    params.push(ty);
                    pos = end;
                }
                None => return Err(TypeError::Trailing(descriptor.to_string())),
            }
        }
        let (ret, end) = parse_at(descriptor, pos + 1)?;
        if end != descriptor.len() {
            return Err(TypeError::Trailing(descriptor.to_string()));
        }
        Ok((params, ret))
    }
}

fn parse_at(descriptor: &str, pos: usize) -> Result<(TypeSignature, usize), TypeError> {
    let Some(c) = descriptor[pos..].chars().next() else {
        return Err(TypeError::Trailing(descriptor.to_string()));
    };
    let prim = match c {
        'V' => Some(TypeSignature::Void),
        'Z' => Some(TypeSignature::Boolean),
        'B' => Some(TypeSignature::Byte),
        'C' => Some(TypeSignature::Char),
        'S' => Some(TypeSignature::Short),
        'I' => Some(TypeSignature::Int),
        'J' => Some(TypeSignature::Long),
        'F' => Some(TypeSignature::Float),
        'D' => Some(TypeSignature::Double),
        _ => None,
    };
    if let Some(ty) = prim {
        return Ok((ty, pos + 1));
    }
    match c {
        'L' => {
            let rest = &descriptor[pos + 1..];
            let end = rest
                .find(';')
                .ok_or_else(|| TypeError::UnterminatedClass(descriptor.to_string()))?;
            if end == 0 {
                return Err(TypeError::UnexpectedChar {
                    descriptor: descriptor.to_string(),
                    pos: pos + 1,
                    found: ';',
                });
            }
            Ok((
                TypeSignature::Class(rest[..end].to_string()),
                pos + 1 + end + 1,
            ))
        }
        '[' => {
            let (component, end) = parse_at(descriptor, pos + 1)?;
            if component == TypeSignature::Void {
                return Err(TypeError::UnexpectedChar {
                    descriptor: descriptor.to_string(),
                    pos: pos + 1,
                    found: 'V',
                });
            }
            Ok((TypeSignature::array_of(component), end))
        }
        found => Err(TypeError::UnexpectedChar {
            descriptor: descriptor.to_string(),
            pos,
            found,
        }),
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSignature::Void => f.write_str("void"),
            TypeSignature::Boolean => f.write_str("boolean"),
            TypeSignature::Byte => f.write_str("byte"),
            TypeSignature::Char => f.write_str("char"),
            TypeSignature::Short => f.write_str("short"),
            TypeSignature::Int => f.write_str("int"),
            TypeSignature::Long => f.write_str("long"),
            TypeSignature::Float => f.write_str("float"),
            TypeSignature::Double => f.write_str("double"),
            TypeSignature::Class(name) => {
                let name = name.strip_prefix("java/lang/").unwrap_or(name);
                f.write_str(&name.replace('/', "."))
            }
            TypeSignature::Array(component) => write!(f, "{component}[]"),
        }
    }
}

impl Serialize for TypeSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.descriptor())
    }
}
