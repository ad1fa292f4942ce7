use jdec_ir::serialize::tags;
use jdec_ir::*;

fn local(index: u16, name: &str, ty: TypeSignature) -> Instruction {
    Instruction::local(LocalInstance::new(index, name, ty))
}

#[test]
fn array_access_record_carries_tag_then_array_then_index() {
    let access = Instruction::array_access(
        local(0, "values", TypeSignature::array_of(TypeSignature::Int)),
        Instruction::IntConstant(3),
    );

    let text = serde_json::to_string(&access).unwrap();
    let id = text.find("\"id\"").unwrap();
    let array = text.find("\"array\"").unwrap();
    let index = text.find("\"index\"").unwrap();
    assert!(id < array && array < index, "unexpected field order: {text}");

    let value = serde_json::to_value(&access).unwrap();
    assert_eq!(value["id"], tags::STATEMENT_ID_ARRAY_ACCESS);
    assert_eq!(value["array"]["id"], tags::STATEMENT_ID_LOCAL_ACCESS);
    assert_eq!(value["array"]["local"]["name"], "values");
    assert_eq!(value["array"]["local"]["type"], "[I");
    assert_eq!(value["index"]["id"], tags::STATEMENT_ID_INT_CONSTANT);
    assert_eq!(value["index"]["cst"], 3);
}

#[test]
fn serialization_ignores_type_cache() {
    let access = ArrayAccess::new(
        local(0, "values", TypeSignature::array_of(TypeSignature::Int)),
        Instruction::IntConstant(0),
    );
    let cold = serde_json::to_string(&Instruction::ArrayAccess(access.clone())).unwrap();
    access.infer_type();
    let warm = serde_json::to_string(&Instruction::ArrayAccess(access)).unwrap();
    assert_eq!(cold, warm);
}

#[test]
fn condition_records() {
    let cond = Condition::Or(vec![
        Condition::compare(
            local(0, "a", TypeSignature::object()),
            Instruction::NullConstant,
            CompareOperator::Eq,
        ),
        Condition::boolean(local(1, "b", TypeSignature::Boolean), true),
    ]);
    let value = serde_json::to_value(&cond).unwrap();
    assert_eq!(value["id"], tags::CONDITION_ID_OR);
    assert_eq!(value["args"][0]["id"], tags::CONDITION_ID_COMPARE);
    assert_eq!(value["args"][0]["op"], "==");
    assert_eq!(value["args"][0]["right"]["id"], tags::STATEMENT_ID_NULL_CONSTANT);
    assert_eq!(value["args"][1]["id"], tags::CONDITION_ID_BOOL);
    assert_eq!(value["args"][1]["inverse"], true);
}

#[test]
fn statement_records() {
    let stmt = Statement::If {
        condition: Condition::boolean(local(0, "flag", TypeSignature::Boolean), false),
        body: vec![Statement::Return(None)],
        else_body: vec![],
    };
    let value = serde_json::to_value(&stmt).unwrap();
    assert_eq!(value["id"], tags::STATEMENT_ID_IF);
    assert_eq!(value["body"][0]["id"], tags::STATEMENT_ID_RETURN);
    assert!(value["body"][0]["val"].is_null());
    assert_eq!(value["else"].as_array().unwrap().len(), 0);
}
