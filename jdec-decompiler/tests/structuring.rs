mod common;

use common::*;
use jdec_decompiler::java_emitter::emit_java;
use jdec_decompiler::structuring::structure_method;
use jdec_decompiler::section::append_all;
use jdec_decompiler::{
    BlockSection, BuildContext, ConditionalSection, DecompileError, build_condition,
    decompile_graph,
};
use jdec_ir::{Instruction, Locals, Statement, TypeSignature};
use jdec_isa::Opcode;

fn int_locals() -> Locals {
    locals_of(TypeSignature::Int, &["a", "b"])
}

#[test]
fn straight_line_code_is_inline() {
    let graph = assembled(&["iconst_1", "istore_0", "return"]);
    let locals = int_locals();
    let ctx = BuildContext::new(&graph, &locals);

    assert_eq!(structure_method(&ctx).unwrap(), vec![BlockSection::Inline(0)]);
}

#[test]
fn simple_if() {
    let graph = assembled(&[
        "iload_0",
        "ifle end",
        "iinc 1, 1",
        "end:",
        "iload_1",
        "ireturn",
    ]);
    let locals = int_locals();
    let ctx = BuildContext::new(&graph, &locals);

    let sections = structure_method(&ctx).unwrap();
    assert_eq!(sections.len(), 2);
    let BlockSection::Conditional(section) = &sections[0] else {
        panic!("expected a conditional section, got {:?}", sections[0]);
    };
    assert_eq!(section.body, vec![BlockSection::Inline(1)]);
    assert!(section.else_body.is_empty());
    assert_eq!(sections[1], BlockSection::Inline(2));

    let stmts = decompile_graph(&ctx).unwrap();
    assert_eq!(stmts[1], Statement::Return(Some(var(&locals, 1))));
    assert_eq!(emit_java(&stmts), "if (a > 0) {\n    b++;\n}\nreturn b;\n");
}

#[test]
fn if_else() {
    let graph = assembled(&[
        "iload_0",
        "ifeq other",
        "iconst_1",
        "istore_1",
        "goto end",
        "other:",
        "iconst_2",
        "istore_1",
        "end:",
        "iload_1",
        "ireturn",
    ]);
    let locals = locals_of(TypeSignature::Boolean, &["flag", "b"]);
    let ctx = BuildContext::new(&graph, &locals);

    let sections = structure_method(&ctx).unwrap();
    let BlockSection::Conditional(section) = &sections[0] else {
        panic!("expected a conditional section");
    };
    assert_eq!(section.body, vec![BlockSection::Inline(1)]);
    assert_eq!(section.else_body, vec![BlockSection::Inline(2)]);
    assert_eq!(sections[1..], [BlockSection::Inline(3)]);

    let stmts = decompile_graph(&ctx).unwrap();
    assert_eq!(
        emit_java(&stmts),
        "if (flag) {\n    b = 1;\n} else {\n    b = 2;\n}\nreturn b;\n"
    );
}

#[test]
fn conjunction_groups_consecutive_tests() {
    let graph = assembled(&[
        "iload_0",
        "ifle end",
        "iload_1",
        "bipush 10",
        "if_icmpge end",
        "iinc 0, 1",
        "end:",
        "return",
    ]);
    let locals = int_locals();
    let ctx = BuildContext::new(&graph, &locals);

    let sections = structure_method(&ctx).unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].blocks(), vec![2]);

    let stmts = decompile_graph(&ctx).unwrap();
    assert_eq!(emit_java(&stmts), "if (a > 0 && b < 10) {\n    a++;\n}\nreturn;\n");
}

#[test]
fn disjunction_groups_consecutive_tests() {
    let graph = assembled(&[
        "aload_0",
        "ifnull body",
        "aload_1",
        "ifnonnull end",
        "body:",
        "iconst_0",
        "ireturn",
        "end:",
        "iconst_1",
        "ireturn",
    ]);
    let locals = locals_of(TypeSignature::string(), &["a", "b"]);
    let ctx = BuildContext::new(&graph, &locals);

    let stmts = decompile_graph(&ctx).unwrap();
    assert_eq!(stmts.len(), 2);
    assert_eq!(stmts[1], Statement::Return(Some(Instruction::IntConstant(1))));
    assert_eq!(
        emit_java(&stmts),
        "if (a == null || b == null) {\n    return 0;\n}\nreturn 1;\n"
    );
}

#[test]
fn nested_if_inside_else() {
    let graph = assembled(&[
        "iload_0",
        "ifeq other",
        "iconst_1",
        "istore_1",
        "goto end",
        "other:",
        "iload_1",
        "ifge end",
        "iinc 1, -1",
        "end:",
        "return",
    ]);
    let locals = int_locals();
    let ctx = BuildContext::new(&graph, &locals);

    let stmts = decompile_graph(&ctx).unwrap();
    assert_eq!(
        emit_java(&stmts),
        "if (a) {\n    b = 1;\n} else {\n    if (b < 0) {\n        b--;\n    }\n}\nreturn;\n"
    );
}

#[test]
fn backward_edge_is_unsupported() {
    let graph = assembled(&["top:", "iinc 0, 1", "goto top"]);
    let locals = int_locals();
    let ctx = BuildContext::new(&graph, &locals);

    assert!(matches!(
        structure_method(&ctx),
        Err(DecompileError::UnsupportedStructure { block: 0, .. })
    ));
}

#[test]
fn empty_graph_has_no_sections() {
    let graph = jdec_ir::BlockGraph::build(vec![]);
    let locals = Locals::new();
    let ctx = BuildContext::new(&graph, &locals);

    assert!(structure_method(&ctx).unwrap().is_empty());
}

#[test]
fn conditional_operand_from_ternary_join_is_unsupported() {
    // if ((c ? a : b) > 0) b++;
    let graph = assembled(&[
        "iload_0",
        "ifeq l1",
        "iload_1",
        "goto l2",
        "l1:",
        "iload_2",
        "l2:",
        "ifle end",
        "iinc 2, 1",
        "end:",
        "return",
    ]);
    let locals = locals_of(TypeSignature::Int, &["c", "a", "b"]);
    let ctx = BuildContext::new(&graph, &locals);

    assert_eq!(graph.block(3).prefix, None);
    let err = structure_method(&ctx).unwrap_err();
    let DecompileError::UnsupportedStructure { block, reason } = &err else {
        panic!("expected unsupported structure, got {err:?}");
    };
    assert_eq!(*block, 1);
    assert_eq!(reason, "operands flow into join block 3");
    assert_eq!(decompile_graph(&ctx), Err(err));
}

#[test]
fn branch_leaving_operands_is_unbalanced() {
    let mut g = GraphBuilder::new();
    g.block(&[iload(0), jump(Opcode::Ifle)], Some(2), Some(1));
    g.block(&[iload(1)], Some(2), None);
    g.block(&[op(Opcode::Return)], None, None);
    let graph = g.build();
    let locals = int_locals();
    let ctx = BuildContext::new(&graph, &locals);

    // Structure by hand so the branch is replayed as a section.
    let sections = vec![
        BlockSection::Conditional(ConditionalSection {
            condition: build_condition(&ctx, &[0], 1, 2).unwrap(),
            body: vec![BlockSection::Inline(1)],
            else_body: vec![],
        }),
        BlockSection::Inline(2),
    ];
    let mut stack = Vec::new();
    assert_eq!(
        append_all(&ctx, &sections, &mut stack),
        Err(DecompileError::UnbalancedStack {
            block: 1,
            expected: 0,
            found: 1,
        })
    );
}

#[test]
fn operands_left_at_method_end_are_an_error() {
    let graph = assembled(&["iload_0", "iconst_1", "iadd", "return"]);
    let locals = int_locals();
    let ctx = BuildContext::new(&graph, &locals);

    assert_eq!(
        decompile_graph(&ctx),
        Err(DecompileError::UnbalancedStack {
            block: 0,
            expected: 0,
            found: 1,
        })
    );
}
