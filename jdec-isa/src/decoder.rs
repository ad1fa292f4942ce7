use crate::insn::{Insn, Operand};
use crate::opcode::{Format, Opcode};

/// Errors from [`decode`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Unknown or unsupported opcode byte at the given offset.
    #[error("invalid opcode {byte:#04x} at offset {offset}")]
    InvalidOpcode { offset: usize, byte: u8 },
    /// Bytecode truncated at the given byte offset.
    #[error("truncated instruction at offset {0}")]
    Truncated(usize),
    /// A jump at `offset` targets a byte offset that is not an instruction
    /// boundary.
    #[error("jump at offset {offset} targets invalid offset {target}")]
    InvalidJumpTarget { offset: usize, target: i64 },
}

/// Decode raw method bytecode into instructions.
///
/// Branch operands are resolved to [`Operand::Label`] values holding the
/// index of the target instruction in the returned `Vec`.
pub fn decode(bytes: &[u8]) -> Result<Vec<Insn>, DecodeError> {
    let mut insns: Vec<Insn> = Vec::new();
    // (insn_index, insn_byte_offset, raw_branch_offset)
    let mut jumps: Vec<(usize, usize, i64)> = Vec::new();
    let mut offset = 0usize;

    // Pass 1: decode instructions, record raw branch offsets.
    while offset < bytes.len() {
        let byte = bytes[offset];
        let opcode = Opcode::from_u8(byte).ok_or(DecodeError::InvalidOpcode { offset, byte })?;
        let format = opcode.format();
        let size = format.size();
        if offset + size > bytes.len() {
            return Err(DecodeError::Truncated(offset));
        }
        let body = &bytes[offset + 1..offset + size];

        let operand = match format {
            Format::None => Operand::None,
            Format::Byte => Operand::Imm(body[0] as i8 as i32),
            Format::Short => Operand::Imm(read_i16(body) as i32),
            Format::Local => Operand::Local(body[0] as u16),
            Format::PoolIndex => Operand::PoolIndex(body[0] as u16),
            Format::Iinc => Operand::Iinc {
                local: body[0] as u16,
                amount: body[1] as i8 as i32,
            },
            Format::Branch => {
                jumps.push((insns.len(), offset, read_i16(body) as i64));
                // Patched in pass 2.
                Operand::Label(0)
            }
        };

        insns.push(Insn::new(offset as u32, opcode, operand));
        offset += size;
    }

    // Pass 2: resolve branch targets to instruction indices.
    for (insn_idx, insn_offset, raw) in jumps {
        let target = insn_offset as i64 + raw;
        let target_insn = insns
            .binary_search_by_key(&target, |insn| insn.offset as i64)
            .map_err(|_| DecodeError::InvalidJumpTarget {
                offset: insn_offset,
                target,
            })?;
        insns[insn_idx].operand = Operand::Label(target_insn as u32);
    }

    Ok(insns)
}

fn read_i16(bytes: &[u8]) -> i16 {
    // JVM operands are big-endian.
    i16::from_be_bytes([bytes[0], bytes[1]])
}
