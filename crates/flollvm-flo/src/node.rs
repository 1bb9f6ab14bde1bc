//! Circuit signals.

/// A named signal in the circuit, with a fixed bit width and (for
/// memories) a depth.
///
/// Chisel emits hierarchical names with `::` separators, e.g.
/// `Top::sub::reg`. A node is *exported* when its name is hierarchical:
/// those signals appear in the emulator header and are reachable through
/// the accessor ABI. Flat names (`T0`, `reset`) are compiler temporaries.
#[derive(Clone, Debug)]
pub struct Node {
    /// Hierarchical source name, e.g. `Top::sub::reg`.
    pub name: String,
    /// C identifier derived from the name (`::` becomes `__`).
    pub mangled_name: String,
    /// Chisel's dotted name, used as the debug-API lookup key.
    pub chisel_name: String,
    /// Compact identifier for VCD waveform output.
    pub vcd_name: String,
    /// Width in bits (>= 1).
    pub width: u64,
    /// Number of entries for memories; 1 otherwise.
    pub depth: u64,
    /// Whether this node is a memory.
    pub is_mem: bool,
    /// Whether this node appears in the emulator header.
    pub exported: bool,
    /// Whether this node is dumped to VCD output.
    pub vcd_exported: bool,
}

impl Node {
    /// Creates a wire node. `index` is the declaration index, used to
    /// derive the VCD short name.
    pub fn wire(name: &str, width: u64, index: usize) -> Self {
        Self::build(name, width, 1, false, index)
    }

    /// Creates a memory node of `depth` entries.
    pub fn memory(name: &str, width: u64, depth: u64, index: usize) -> Self {
        Self::build(name, width, depth, true, index)
    }

    fn build(name: &str, width: u64, depth: u64, is_mem: bool, index: usize) -> Self {
        let exported = name.contains("::");
        Self {
            name: name.to_string(),
            mangled_name: name.replace("::", "__"),
            chisel_name: name.replace("::", "."),
            vcd_name: format!("N{index}"),
            width,
            depth,
            is_mem,
            exported,
            vcd_exported: exported && !is_mem,
        }
    }

    /// The number of 64-bit words needed to hold one value of this node.
    pub fn words(&self) -> u64 {
        self.width.div_ceil(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchical_names_are_exported() {
        let n = Node::wire("Top::io_out", 8, 0);
        assert!(n.exported);
        assert!(n.vcd_exported);
        assert_eq!(n.mangled_name, "Top__io_out");
        assert_eq!(n.chisel_name, "Top.io_out");
        assert_eq!(n.vcd_name, "N0");
    }

    #[test]
    fn flat_names_are_private() {
        let n = Node::wire("T0", 32, 3);
        assert!(!n.exported);
        assert!(!n.vcd_exported);
        assert_eq!(n.mangled_name, "T0");
        assert_eq!(n.vcd_name, "N3");
    }

    #[test]
    fn nested_hierarchy_mangles_every_separator() {
        let n = Node::wire("Top::sub::reg", 1, 0);
        assert_eq!(n.mangled_name, "Top__sub__reg");
        assert_eq!(n.chisel_name, "Top.sub.reg");
    }

    #[test]
    fn memories_are_not_vcd_exported() {
        let n = Node::memory("Top::mem", 8, 256, 0);
        assert!(n.is_mem);
        assert!(n.exported);
        assert!(!n.vcd_exported);
        assert_eq!(n.depth, 256);
    }

    #[test]
    fn word_counts() {
        assert_eq!(Node::wire("a", 1, 0).words(), 1);
        assert_eq!(Node::wire("a", 64, 0).words(), 1);
        assert_eq!(Node::wire("a", 65, 0).words(), 2);
        assert_eq!(Node::wire("a", 128, 0).words(), 2);
        assert_eq!(Node::wire("a", 129, 0).words(), 3);
    }
}
