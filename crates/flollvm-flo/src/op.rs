//! Circuit operations.

use crate::arena::Handle;
use crate::node::Node;
use crate::opcode::Opcode;

/// One operand of an [`Operation`]: either an earlier-defined node or an
/// unsigned integer literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    /// A reference to a previously declared node.
    Node(Handle<Node>),
    /// An integer constant appearing inline in the Flo text.
    Lit(u64),
}

/// A single Flo operation: `dest = opcode sources...`.
#[derive(Clone, Debug)]
pub struct Operation {
    /// The operation code.
    pub op: Opcode,
    /// The destination node.
    pub dest: Handle<Node>,
    /// Source operands, in textual order.
    pub sources: Vec<Source>,
    /// Whether the computed value must be stored back into the emulator
    /// class after evaluation. Set iff the destination is an exported
    /// non-memory node.
    pub writeback: bool,
}

impl Operation {
    /// Returns source operand `i`.
    ///
    /// Panics if the operand does not exist; the parser has already
    /// validated operand counts against [`Opcode::num_sources`].
    pub fn src(&self, i: usize) -> Source {
        self.sources[i]
    }
}
