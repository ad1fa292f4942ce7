pub mod condition_builder;
pub mod condition_util;
pub mod context;
pub mod error;
pub mod java_emitter;
pub mod section;
pub mod stmt_builder;
pub mod structuring;

pub use condition_builder::{ConditionGraph, NodeRef, build_condition, build_simple_condition};
pub use condition_util::{inverse, simplify_condition};
pub use context::BuildContext;
pub use error::{DecompileError, Result};
pub use section::{BlockSection, ConditionalSection};

use jdec_ir::{BlockGraph, Locals, Statement};
use jdec_isa::{Constant, Insn};
use rayon::prelude::*;

/// Decoded code of one method together with its symbol information.
#[derive(Debug, Clone, Default)]
pub struct MethodCode {
    pub name: String,
    pub descriptor: Option<String>,
    pub locals: Locals,
    pub constants: Vec<Constant>,
    pub insns: Vec<Insn>,
}

/// Structure an already-built graph and replay it into statements.
pub fn decompile_graph(ctx: &BuildContext) -> Result<Vec<Statement>> {
    let sections = structuring::structure_method(ctx)?;
    let mut stack = Vec::new();
    let stmts = section::append_all(ctx, &sections, &mut stack)?;
    if !stack.is_empty() {
        return Err(DecompileError::UnbalancedStack {
            block: ctx.graph.len().saturating_sub(1),
            expected: 0,
            found: stack.len(),
        });
    }
    Ok(stmts)
}

/// Decompile a method's instructions into structured statements.
pub fn decompile_method(
    insns: &[Insn],
    locals: &Locals,
    constants: &[Constant],
) -> Result<Vec<Statement>> {
    let graph = BlockGraph::build(insns.to_vec());
    let ctx = BuildContext::new(&graph, locals).with_constants(constants);
    decompile_graph(&ctx)
}

/// Decompile every method in parallel. Results are in input order.
pub fn decompile_methods(methods: &[MethodCode]) -> Vec<Result<Vec<Statement>>> {
    methods
        .par_iter()
        .map(|method| {
            let result = decompile_method(&method.insns, &method.locals, &method.constants);
            if let Err(e) = &result {
                log::warn!("{}: {e}", method.name);
            }
            result
        })
        .collect()
}
