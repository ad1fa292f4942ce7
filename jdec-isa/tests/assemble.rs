use jdec_isa::*;

#[test]
fn assemble_resolves_labels_to_insn_indices() {
    let insns = assemble(&[
        "    iload 0",
        "    ifle end   // skip body",
        "    iinc 0, 1",
        "end:",
        "    return",
    ])
    .unwrap();
    assert_eq!(insns.len(), 4);
    assert_eq!(insns[1].opcode, Opcode::Ifle);
    assert_eq!(insns[1].operand, Operand::Label(3));
    assert_eq!(
        insns[2].operand,
        Operand::Iinc {
            local: 0,
            amount: 1
        }
    );
}

#[test]
fn assemble_assigns_encoded_offsets() {
    let insns = assemble(&["iload 0", "bipush 10", "if_icmplt done", "done:", "return"]).unwrap();
    let offsets: Vec<u32> = insns.iter().map(|i| i.offset).collect();
    assert_eq!(offsets, vec![0, 2, 4, 7]);
}

#[test]
fn assemble_inline_constants() {
    let insns = assemble(&["ldc \"hello\"", "ldc -7", "ldc #2"]).unwrap();
    assert_eq!(
        insns[0].operand,
        Operand::Constant(Constant::String("hello".into()))
    );
    assert_eq!(insns[1].operand, Operand::Constant(Constant::Int(-7)));
    assert_eq!(insns[2].operand, Operand::PoolIndex(2));
}

#[test]
fn assemble_errors() {
    assert!(matches!(
        assemble(&["iload 0", "frobnicate"]).unwrap_err(),
        AsmError::UnknownMnemonic { line: 2, .. }
    ));
    assert!(matches!(
        assemble(&["iload"]).unwrap_err(),
        AsmError::MissingOperand { line: 1, .. }
    ));
    assert!(matches!(
        assemble(&["iadd 3"]).unwrap_err(),
        AsmError::UnexpectedOperand { line: 1, .. }
    ));
    assert!(matches!(
        assemble(&["bipush 300"]).unwrap_err(),
        AsmError::BadOperand { line: 1, .. }
    ));
    assert!(matches!(
        assemble(&["goto nowhere", "return"]).unwrap_err(),
        AsmError::UndefinedLabel { line: 1, .. }
    ));
    assert!(matches!(
        assemble(&["a:", "nop", "a:", "return"]).unwrap_err(),
        AsmError::DuplicateLabel { line: 3, .. }
    ));
    assert!(matches!(
        assemble(&["goto end", "end:"]).unwrap_err(),
        AsmError::DanglingLabel { .. }
    ));
}
