use jdec_decompiler::java_emitter::{emit_condition, emit_java, emit_method};
use jdec_ir::{
    CompareOperator, Condition, Instruction, LocalInstance, Locals, OperatorKind, Statement,
    TypeSignature,
};

fn local(index: u16, name: &str, ty: TypeSignature) -> LocalInstance {
    LocalInstance::new(index, name, ty)
}

#[test]
fn increments() {
    let i = local(0, "i", TypeSignature::Int);
    let stmts: Vec<Statement> = [1, -1, 4, -4]
        .into_iter()
        .map(|amount| Statement::Increment {
            local: i.clone(),
            amount,
        })
        .collect();
    assert_eq!(emit_java(&stmts), "i++;\ni--;\ni += 4;\ni -= 4;\n");
}

#[test]
fn array_assignment_and_comment() {
    let values = Instruction::local(local(0, "values", TypeSignature::array_of(TypeSignature::Int)));
    let i = Instruction::local(local(1, "i", TypeSignature::Int));
    let stmts = vec![
        Statement::Comment("unreachable code\nremoved".to_string()),
        Statement::ArrayAssignment {
            array: values.clone(),
            index: Instruction::operator(OperatorKind::Add, i.clone(), Instruction::IntConstant(1)),
            value: Instruction::array_access(values, i),
        },
    ];
    assert_eq!(
        emit_java(&stmts),
        "// unreachable code\n// removed\nvalues[i + 1] = values[i];\n"
    );
}

#[test]
fn nested_junctions_are_parenthesised() {
    let a = Condition::boolean(Instruction::local(local(0, "a", TypeSignature::Boolean)), false);
    let b = Condition::boolean(Instruction::local(local(1, "b", TypeSignature::Boolean)), true);
    let n = Instruction::local(local(2, "n", TypeSignature::Int));
    let c = Condition::compare(n, Instruction::IntConstant(0), CompareOperator::Ge);
    let condition = Condition::And(vec![Condition::Or(vec![a, b]), c]);
    assert_eq!(emit_condition(&condition), "(a || !b) && n >= 0");
}

#[test]
fn method_signature_uses_declared_names() {
    let mut locals = Locals::new();
    locals.declare(0, "n", TypeSignature::Int);
    locals.declare(1, "values", TypeSignature::array_of(TypeSignature::Int));
    let body = vec![Statement::Return(Some(Instruction::IntConstant(0)))];

    let text = emit_method("sum", "(I[ILjava/lang/String;)I", &locals, &body).unwrap();
    assert_eq!(
        text,
        "static int sum(int n, int[] values, String local2) {\n    return 0;\n}\n"
    );
}

#[test]
fn malformed_descriptor_is_rejected() {
    assert!(emit_method("f", "(Q)V", &Locals::new(), &[]).is_err());
}
