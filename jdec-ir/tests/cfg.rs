use jdec_ir::BlockGraph;
use jdec_isa::assemble;

fn graph(lines: &[&str]) -> BlockGraph {
    BlockGraph::build(assemble(lines).unwrap())
}

#[test]
fn empty_method_has_no_blocks() {
    assert!(BlockGraph::build(vec![]).is_empty());
}

#[test]
fn conditional_block_has_target_and_else_target() {
    let g = graph(&[
        "iload_0",
        "ifle end",
        "iinc 0, 1",
        "end:",
        "return",
    ]);
    assert_eq!(g.len(), 3);
    assert!(g.is_conditional(0));
    assert_eq!(g.block(0).target, Some(2));
    assert_eq!(g.block(0).else_target, Some(1));
    assert_eq!(g.block(1).target, Some(2));
    assert_eq!(g.block(1).else_target, None);
    assert_eq!(g.block(2).target, None);
    assert_eq!(g.block(2).preds, vec![0, 1]);
}

#[test]
fn conditional_block_split_at_predicate_start() {
    let g = graph(&[
        "iconst_5",
        "istore_1",
        "iload_0",
        "iload_1",
        "if_icmpge end",
        "iinc 1, 1",
        "end:",
        "return",
    ]);
    // [iconst_5 istore_1] [iload_0 iload_1 if_icmpge] [iinc] [return]
    assert_eq!(g.len(), 4);
    assert_eq!(g.insns(0).len(), 2);
    assert_eq!(g.insns(1).len(), 3);
    assert!(!g.is_conditional(0));
    assert_eq!(g.block(0).target, Some(1));
    assert!(g.is_conditional(1));
    assert_eq!(g.block(1).start, 2);
}

#[test]
fn goto_block_has_single_successor() {
    let g = graph(&[
        "iload_0",
        "ifeq other",
        "iconst_1",
        "istore_1",
        "goto end",
        "other:",
        "iconst_2",
        "istore_1",
        "end:",
        "return",
    ]);
    assert_eq!(g.len(), 4);
    assert!(g.is_goto(1));
    assert_eq!(g.block(1).target, Some(3));
    assert_eq!(g.block(1).else_target, None);
    assert_eq!(g.successors(0).collect::<Vec<_>>(), vec![2, 1]);
}

#[test]
fn prefix_requires_sole_fall_through_predecessor() {
    // The value tested at `test` is pushed by the block before it.
    let g = graph(&[
        "iload_0",
        "goto test",
        "test:",
        "ifeq end",
        "return",
        "end:",
        "return",
    ]);
    // [iload_0 goto] [ifeq] [return] [return]
    assert_eq!(g.block(1).prefix, None, "goto does not fall through");

    // Ternary-shaped operand: both arms push a value, the join tests it.
    let g = graph(&[
        "iload_0",
        "ifeq zero",
        "iconst_1",
        "goto test",
        "zero:",
        "iconst_0",
        "test:",
        "ifeq end",
        "iconst_5",
        "istore_1",
        "end:",
        "return",
    ]);
    // [iload_0 ifeq] [iconst_1 goto] [iconst_0] [ifeq] [iconst_5 istore_1] [return]
    assert_eq!(g.len(), 6);
    assert!(g.is_conditional(3));
    assert_eq!(g.insns(3).len(), 1);
    assert_eq!(g.block(2).target, Some(3));
    assert_eq!(g.block(3).preds, vec![1, 2]);
    assert_eq!(g.block(3).prefix, None, "a join has no single operand source");
    assert_eq!(g.stack_effect(1), 1);
    assert_eq!(g.stack_effect(2), 1);
    assert_eq!(g.stack_effect(3), -1);
}
