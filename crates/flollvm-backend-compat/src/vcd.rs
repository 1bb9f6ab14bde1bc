//! VCD dump emission.
//!
//! `dump` writes the `$scope`/`$var` header on cycle 0 and then
//! change-detected values each cycle. The header walk visits nodes in
//! alphabetical order so that signals sharing a module prefix are
//! grouped, and moves between scopes by diffing each node's module
//! path against the previous one.

use flollvm_flo::Program;

pub(crate) fn emit_dump(program: &Program, out: &mut String) {
    let class = program.class_name();

    out.push_str(&format!("void {class}_t::dump(FILE *f, int cycle)\n{{\n"));

    // On the first cycle, write the VCD header.
    out.push_str("  if (cycle == 0) {\n");
    out.push_str("    fprintf(f, \"$timescale 1ps $end\\n\");\n");

    let mut last_path = String::new();
    for handle in program.nodes_alpha() {
        let node = program.node(handle);

        // Nodes without a module prefix are not globally visible.
        let Some((module, signal)) = split_scope(&node.name) else {
            continue;
        };

        if module == last_path {
            // Same scope; nothing to move.
        } else if last_path.starts_with(module) {
            out.push_str("    fprintf(f, \"$upscope $end\\n\");\n");
        } else if module.starts_with(last_path.as_str()) {
            out.push_str(&format!(
                "    fprintf(f, \"$scope module {} $end\\n\");\n",
                last_component(module)
            ));
        } else {
            out.push_str("    fprintf(f, \"$upscope $end\\n\");\n");
            out.push_str(&format!(
                "    fprintf(f, \"$scope module {} $end\\n\");\n",
                last_component(module)
            ));
        }

        out.push_str(&format!(
            "    fprintf(f, \"$var wire {} {} {} $end\\n\");\n",
            node.width, node.vcd_name, signal
        ));

        last_path = module.to_string();
    }

    // Close every scope still open.
    let colons = last_path.matches(':').count();
    for _ in 0..=(colons / 2) {
        out.push_str("    fprintf(f, \"$upscope $end\\n\");\n");
    }

    out.push_str("  fprintf(f, \"$enddefinitions $end\\n\");\n");
    out.push_str("  fprintf(f, \"$dumpvars\\n\");\n");
    out.push_str("  fprintf(f, \"$end\\n\");\n");
    out.push_str("  }\n");

    out.push_str("  fprintf(f, \"#%lu\\n\", cycle);\n");

    // Values: dump a signal only when it changed since the last cycle.
    for (_, node) in program.nodes() {
        if !node.vcd_exported {
            continue;
        }
        let m = &node.mangled_name;
        out.push_str(&format!(
            "  if ((cycle == 0) || ({m}__prev != {m}).to_ulong()) {{\n"
        ));
        out.push_str(&format!("    dat_dump(f, {m}, \"{}\");\n", node.vcd_name));
        out.push_str(&format!("    {m}__prev = {m};\n"));
        out.push_str("  }\n");
    }

    out.push_str("}\n");
}

/// Splits `Top::sub::sig` into (`Top::sub`, `sig`). The separator can
/// be `::` or a single `:`; names with no separator are private.
fn split_scope(name: &str) -> Option<(&str, &str)> {
    if let Some(pair) = name.rsplit_once("::") {
        return Some(pair);
    }
    name.rsplit_once(':')
}

/// The last path component, which is what VCD scopes are named by.
fn last_component(module: &str) -> &str {
    module.rsplit(':').next().unwrap_or(module)
}
