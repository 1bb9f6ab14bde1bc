//! The parsed circuit program.

use std::collections::HashMap;

use crate::arena::{Arena, Handle};
use crate::node::Node;
use crate::op::{Operation, Source};

/// A parsed Flo program: a circuit class name, the declared nodes, and
/// the operation stream in dataflow order.
///
/// The program is immutable once parsing finishes. Nodes iterate in
/// declaration order everywhere except [`Program::nodes_alpha`], which
/// the VCD header writer uses to group signals by module scope.
#[derive(Clone, Debug, Default)]
pub struct Program {
    class_name: String,
    nodes: Arena<Node>,
    by_name: HashMap<String, Handle<Node>>,
    operations: Vec<Operation>,
}

impl Program {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The emulator class name, derived from the first hierarchical node
    /// name (`Top::x` gives `Top`). Falls back to `Circuit` for fully
    /// flat programs.
    pub fn class_name(&self) -> &str {
        if self.class_name.is_empty() {
            "Circuit"
        } else {
            &self.class_name
        }
    }

    /// All nodes, in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = (Handle<Node>, &Node)> {
        self.nodes.iter()
    }

    /// Node handles sorted by hierarchical name.
    pub fn nodes_alpha(&self) -> Vec<Handle<Node>> {
        let mut handles: Vec<_> = self.nodes.iter().map(|(h, _)| h).collect();
        handles.sort_by(|a, b| self.nodes[*a].name.cmp(&self.nodes[*b].name));
        handles
    }

    /// Looks up a node.
    pub fn node(&self, handle: Handle<Node>) -> &Node {
        &self.nodes[handle]
    }

    /// Looks up a node by its source name.
    pub fn lookup(&self, name: &str) -> Option<Handle<Node>> {
        self.by_name.get(name).copied()
    }

    /// The operation stream, in dataflow order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Renders an operation in its Flo source form, e.g.
    /// `Top::io_out = out/8 T0`.
    pub fn describe(&self, op: &Operation) -> String {
        let dest = &self.nodes[op.dest];
        let mut text = format!("{} = {}/{}", dest.name, op.op, dest.width);
        for src in &op.sources {
            text.push(' ');
            match *src {
                Source::Node(h) => text.push_str(&self.nodes[h].name),
                Source::Lit(v) => text.push_str(&v.to_string()),
            }
        }
        text
    }

    pub(crate) fn set_class_name(&mut self, name: &str) {
        if self.class_name.is_empty() {
            self.class_name = name.to_string();
        }
    }

    pub(crate) fn declare(&mut self, node: Node) -> Handle<Node> {
        let name = node.name.clone();
        let handle = self.nodes.append(node);
        self.by_name.insert(name, handle);
        handle
    }

    pub(crate) fn next_index(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn push(&mut self, op: Operation) {
        self.operations.push(op);
    }
}
