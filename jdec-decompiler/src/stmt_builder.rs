use jdec_ir::{BlockId, Instruction, OperatorKind, Statement, TypeSignature};
use jdec_isa::{Constant, Insn, Opcode as Op, Operand};

use crate::context::BuildContext;
use crate::error::{DecompileError, Result};

/// Replay one block's instructions, pushing operand nodes onto `stack` and
/// appending completed statements to `stmts`.
///
/// Jumps leave their operands on the stack so condition extraction can
/// consume them afterwards.
pub fn append_block(
    ctx: &BuildContext,
    block: BlockId,
    stmts: &mut Vec<Statement>,
    stack: &mut Vec<Instruction>,
) -> Result<()> {
    let mut state = StackState { block, stack };
    for insn in ctx.graph.insns(block) {
        process_insn(ctx, insn, &mut state, stmts)?;
    }
    Ok(())
}

struct StackState<'s> {
    block: BlockId,
    stack: &'s mut Vec<Instruction>,
}

impl StackState<'_> {
    fn pop(&mut self, insn: &Insn) -> Result<Instruction> {
        self.stack.pop().ok_or(DecompileError::StackUnderflow {
            block: self.block,
            opcode: insn.opcode,
            offset: insn.offset,
        })
    }

    fn push(&mut self, value: Instruction) {
        self.stack.push(value);
    }

    fn bad_operand(&self, insn: &Insn) -> DecompileError {
        DecompileError::BadOperand {
            block: self.block,
            opcode: insn.opcode,
            offset: insn.offset,
        }
    }

    fn local(&self, insn: &Insn) -> Result<u16> {
        insn.local_index().ok_or_else(|| self.bad_operand(insn))
    }
}

fn process_insn(
    ctx: &BuildContext,
    insn: &Insn,
    state: &mut StackState,
    stmts: &mut Vec<Statement>,
) -> Result<()> {
    match insn.opcode {
        Op::Nop | Op::Goto => {}
        op if op.is_conditional() => {}

        // Constants
        Op::AconstNull => state.push(Instruction::NullConstant),
        Op::IconstM1 => state.push(Instruction::IntConstant(-1)),
        Op::Iconst0 => state.push(Instruction::IntConstant(0)),
        Op::Iconst1 => state.push(Instruction::IntConstant(1)),
        Op::Iconst2 => state.push(Instruction::IntConstant(2)),
        Op::Iconst3 => state.push(Instruction::IntConstant(3)),
        Op::Iconst4 => state.push(Instruction::IntConstant(4)),
        Op::Iconst5 => state.push(Instruction::IntConstant(5)),
        Op::Bipush | Op::Sipush => {
            let Operand::Imm(value) = insn.operand else {
                return Err(state.bad_operand(insn));
            };
            state.push(Instruction::IntConstant(value));
        }
        Op::Ldc => {
            let constant = match &insn.operand {
                Operand::Constant(c) => c.clone(),
                Operand::PoolIndex(index) => ctx
                    .constants
                    .get(*index as usize)
                    .cloned()
                    .ok_or(DecompileError::BadConstant {
                        block: state.block,
                        index: *index,
                    })?,
                _ => return Err(state.bad_operand(insn)),
            };
            state.push(match constant {
                Constant::Int(v) => Instruction::IntConstant(v),
                Constant::String(s) => Instruction::StringConstant(s),
            });
        }

        // Locals
        Op::Iload | Op::Iload0 | Op::Iload1 | Op::Iload2 | Op::Iload3 => {
            let slot = state.local(insn)?;
            state.push(Instruction::local(ctx.locals.resolve(slot, TypeSignature::Int)));
        }
        Op::Aload | Op::Aload0 | Op::Aload1 | Op::Aload2 | Op::Aload3 => {
            let slot = state.local(insn)?;
            state.push(Instruction::local(ctx.locals.resolve(slot, TypeSignature::object())));
        }
        Op::Istore | Op::Istore0 | Op::Istore1 | Op::Istore2 | Op::Istore3 => {
            let value = state.pop(insn)?;
            let slot = state.local(insn)?;
            stmts.push(Statement::LocalAssignment {
                local: ctx.locals.resolve(slot, TypeSignature::Int),
                value,
            });
        }
        Op::Astore | Op::Astore0 | Op::Astore1 | Op::Astore2 | Op::Astore3 => {
            let value = state.pop(insn)?;
            let slot = state.local(insn)?;
            stmts.push(Statement::LocalAssignment {
                local: ctx.locals.resolve(slot, value.infer_type()),
                value,
            });
        }
        Op::Iinc => {
            let Operand::Iinc { local, amount } = insn.operand else {
                return Err(state.bad_operand(insn));
            };
            stmts.push(Statement::Increment {
                local: ctx.locals.resolve(local, TypeSignature::Int),
                amount,
            });
        }

        // Arrays
        Op::Iaload | Op::Aaload | Op::Baload | Op::Caload => {
            let index = state.pop(insn)?;
            let array = state.pop(insn)?;
            state.push(Instruction::array_access(array, index));
        }
        Op::Iastore | Op::Aastore => {
            let value = state.pop(insn)?;
            let index = state.pop(insn)?;
            let array = state.pop(insn)?;
            stmts.push(Statement::ArrayAssignment {
                array,
                index,
                value,
            });
        }

        // Arithmetic
        Op::Iadd | Op::Isub | Op::Imul | Op::Idiv | Op::Irem | Op::Ishl | Op::Ishr
        | Op::Iand | Op::Ior | Op::Ixor => {
            let right = state.pop(insn)?;
            let left = state.pop(insn)?;
            let kind = arith_op(insn.opcode).ok_or_else(|| state.bad_operand(insn))?;
            state.push(Instruction::operator(kind, left, right));
        }
        Op::Ineg => {
            let value = state.pop(insn)?;
            state.push(Instruction::Negative(Box::new(value)));
        }

        // Stack manipulation
        Op::Dup => {
            let top = state.pop(insn)?;
            state.push(top.clone());
            state.push(top);
        }
        Op::Pop => {
            state.pop(insn)?;
        }

        // Returns
        Op::Ireturn | Op::Areturn => {
            let value = state.pop(insn)?;
            stmts.push(Statement::Return(Some(value)));
        }
        Op::Return => stmts.push(Statement::Return(None)),

        _ => {
            log::debug!("block {}: ignoring {}", state.block, insn.opcode);
        }
    }
    Ok(())
}

fn arith_op(opcode: Op) -> Option<OperatorKind> {
    let kind = match opcode {
        Op::Iadd => OperatorKind::Add,
        Op::Isub => OperatorKind::Sub,
        Op::Imul => OperatorKind::Mul,
        Op::Idiv => OperatorKind::Div,
        Op::Irem => OperatorKind::Rem,
        Op::Ishl => OperatorKind::Shl,
        Op::Ishr => OperatorKind::Shr,
        Op::Iand => OperatorKind::And,
        Op::Ior => OperatorKind::Or,
        Op::Ixor => OperatorKind::Xor,
        _ => return None,
    };
    Some(kind)
}
