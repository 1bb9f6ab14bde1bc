//! Text dump of a parsed program, for debugging.

use crate::program::Program;

/// Renders a [`Program`] as human-readable text.
///
/// The format is for inspection only (`--emit-flo`); none of the
/// generators consume it.
pub fn dump_program(program: &Program) -> String {
    let mut out = String::new();

    out.push_str(&format!("class {}\n", program.class_name()));

    out.push_str("\nNodes:\n");
    for (_, node) in program.nodes() {
        let mut flags = Vec::new();
        if node.is_mem {
            flags.push("mem");
        }
        if node.exported {
            flags.push("exported");
        }
        if node.vcd_exported {
            flags.push("vcd");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", flags.join(", "))
        };
        if node.is_mem {
            out.push_str(&format!(
                "  {}: {} bits x {}{flags}\n",
                node.name, node.width, node.depth
            ));
        } else {
            out.push_str(&format!("  {}: {} bits{flags}\n", node.name, node.width));
        }
    }

    out.push_str("\nOperations:\n");
    for op in program.operations() {
        out.push_str(&format!("  {}\n", program.describe(op)));
    }

    out
}
