//! Line-oriented assembler for the supported opcode subset.
//!
//! One instruction or label per line:
//!
//! ```text
//!     iload 0
//!     ifle end        // branch operands name a label
//!     ldc "text"
//!     iinc 1, -1
//! end:
//!     return
//! ```
//!
//! Instruction offsets are assigned as if the code were encoded, so the
//! output matches what [`decode`](crate::decode) would produce.

use std::collections::HashMap;

use crate::insn::{Constant, Insn, Operand};
use crate::opcode::{Format, Opcode};

/// Errors from [`assemble`]. Line numbers are 1-based.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AsmError {
    #[error("line {line}: unknown mnemonic `{mnemonic}`")]
    UnknownMnemonic { line: usize, mnemonic: String },
    #[error("line {line}: `{mnemonic}` requires an operand")]
    MissingOperand { line: usize, mnemonic: String },
    #[error("line {line}: `{mnemonic}` takes no operand")]
    UnexpectedOperand { line: usize, mnemonic: String },
    #[error("line {line}: invalid operand `{operand}`")]
    BadOperand { line: usize, operand: String },
    #[error("line {line}: undefined label `{label}`")]
    UndefinedLabel { line: usize, label: String },
    #[error("line {line}: duplicate label `{label}`")]
    DuplicateLabel { line: usize, label: String },
    #[error("label `{label}` does not precede an instruction")]
    DanglingLabel { label: String },
}

/// Assemble source lines into instructions.
pub fn assemble<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Insn>, AsmError> {
    let mut labels: HashMap<String, u32> = HashMap::new();
    // (insn_index, line, label)
    let mut fixups: Vec<(usize, usize, String)> = Vec::new();
    let mut insns: Vec<Insn> = Vec::new();
    let mut offset = 0u32;

    for (i, raw) in lines.iter().enumerate() {
        let line = i + 1;
        let text = strip_comment(raw.as_ref()).trim();
        if text.is_empty() {
            continue;
        }

        if let Some(label) = text.strip_suffix(':') {
            let label = label.trim().to_string();
            if labels.insert(label.clone(), insns.len() as u32).is_some() {
                return Err(AsmError::DuplicateLabel { line, label });
            }
            continue;
        }

        let (mnemonic, rest) = match text.split_once(char::is_whitespace) {
            Some((m, r)) => (m, r.trim()),
            None => (text, ""),
        };
        let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| AsmError::UnknownMnemonic {
            line,
            mnemonic: mnemonic.to_string(),
        })?;

        let format = opcode.format();
        if format == Format::None {
            if !rest.is_empty() {
                return Err(AsmError::UnexpectedOperand {
                    line,
                    mnemonic: mnemonic.to_string(),
                });
            }
        } else if rest.is_empty() {
            return Err(AsmError::MissingOperand {
                line,
                mnemonic: mnemonic.to_string(),
            });
        }

        let bad = || AsmError::BadOperand {
            line,
            operand: rest.to_string(),
        };
        let operand = match format {
            Format::None => Operand::None,
            Format::Byte => Operand::Imm(rest.parse::<i8>().map_err(|_| bad())? as i32),
            Format::Short => Operand::Imm(rest.parse::<i16>().map_err(|_| bad())? as i32),
            Format::Local => Operand::Local(rest.parse::<u8>().map_err(|_| bad())? as u16),
            Format::PoolIndex => parse_ldc(rest).ok_or_else(bad)?,
            Format::Iinc => {
                let mut parts = rest.split(|c: char| c == ',' || c.is_whitespace());
                let mut next = || parts.find(|p| !p.is_empty());
                let local = next().and_then(|p| p.parse::<u8>().ok()).ok_or_else(bad)?;
                let amount = next().and_then(|p| p.parse::<i8>().ok()).ok_or_else(bad)?;
                if next().is_some() {
                    return Err(bad());
                }
                Operand::Iinc {
                    local: local as u16,
                    amount: amount as i32,
                }
            }
            Format::Branch => {
                fixups.push((insns.len(), line, rest.to_string()));
                Operand::Label(0)
            }
        };

        insns.push(Insn::new(offset, opcode, operand));
        offset += format.size() as u32;
    }

    for (label, &target) in &labels {
        if target as usize >= insns.len() {
            return Err(AsmError::DanglingLabel {
                label: label.clone(),
            });
        }
    }

    for (insn_idx, line, label) in fixups {
        let target = *labels
            .get(&label)
            .ok_or(AsmError::UndefinedLabel { line, label })?;
        insns[insn_idx].operand = Operand::Label(target);
    }

    Ok(insns)
}

fn strip_comment(line: &str) -> &str {
    // `//` inside a string literal is not a comment.
    let mut in_string = false;
    let bytes = line.as_bytes();
    for i in 0..bytes.len() {
        match bytes[i] {
            b'"' => in_string = !in_string,
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_ldc(operand: &str) -> Option<Operand> {
    if let Some(quoted) = operand.strip_prefix('"') {
        let body = quoted.strip_suffix('"')?;
        return Some(Operand::Constant(Constant::String(body.to_string())));
    }
    if let Some(idx) = operand.strip_prefix('#') {
        return idx.parse::<u8>().ok().map(|i| Operand::PoolIndex(i as u16));
    }
    operand
        .parse::<i32>()
        .ok()
        .map(|v| Operand::Constant(Constant::Int(v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("iload 0 // a"), "iload 0 ");
        assert_eq!(strip_comment("ldc \"a//b\""), "ldc \"a//b\"");
    }

    #[test]
    fn test_parse_ldc() {
        assert_eq!(
            parse_ldc("42"),
            Some(Operand::Constant(Constant::Int(42)))
        );
        assert_eq!(parse_ldc("#3"), Some(Operand::PoolIndex(3)));
        assert_eq!(
            parse_ldc("\"hi\""),
            Some(Operand::Constant(Constant::String("hi".into())))
        );
        assert_eq!(parse_ldc("\"open"), None);
    }
}
