use jdec_ir::{BlockGraph, Locals};
use jdec_isa::Constant;

/// Read-only state shared by every reconstruction step of one method.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub graph: &'a BlockGraph,
    pub locals: &'a Locals,
    /// Constant pool for `ldc` operands given by index.
    pub constants: &'a [Constant],
}

impl<'a> BuildContext<'a> {
    pub fn new(graph: &'a BlockGraph, locals: &'a Locals) -> Self {
        BuildContext {
            graph,
            locals,
            constants: &[],
        }
    }

    pub fn with_constants(mut self, constants: &'a [Constant]) -> Self {
        self.constants = constants;
        self
    }
}
