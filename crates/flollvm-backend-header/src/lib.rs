//! C++ header backend for flollvm (`--header`).
//!
//! Emits the emulator class declaration that Chisel's C++ flow expects:
//! one `dat_t<w>` field (plus a `__prev` shadow for VCD change
//! detection) per exported wire, one `mem_t<w, d>` per exported memory,
//! and the virtual method set the test harness calls. The method bodies
//! come from the compat layer and the generated IR.

use flollvm_backend_core::{Backend, BackendError, BackendOutput, OutputFile};
use flollvm_flo::Program;

/// Backend generating the emulator class header.
#[derive(Debug)]
pub struct HeaderBackend;

impl Backend for HeaderBackend {
    fn name(&self) -> &str {
        "C++ header"
    }

    fn targets(&self) -> &[&str] {
        &["header"]
    }

    fn generate(&self, program: &Program) -> Result<BackendOutput, BackendError> {
        Ok(BackendOutput {
            files: vec![OutputFile {
                name: "module.h".into(),
                content: emit_header(program),
            }],
            diagnostics: vec![],
        })
    }
}

fn emit_header(program: &Program) -> String {
    let class = program.class_name();
    let mut out = String::new();

    out.push_str("#include <stdio.h>\n");
    out.push_str("#include <stdint.h>\n");
    out.push_str("#include \"emulator.h\"\n");
    out.push_str(&format!("class {class}_t: public mod_t {{\n"));
    out.push_str("  public:\n");

    // Every exported node gets storage matching Chisel's own emulator
    // layout, so the generated class is a drop-in replacement.
    for (_, node) in program.nodes() {
        if !node.exported {
            continue;
        }

        if node.is_mem {
            out.push_str(&format!(
                "    mem_t<{}, {}> {};\n",
                node.width, node.depth, node.mangled_name
            ));
        } else {
            out.push_str(&format!(
                "    dat_t<{}> {};\n",
                node.width, node.mangled_name
            ));
            out.push_str(&format!(
                "    dat_t<{}> {}__prev;\n",
                node.width, node.mangled_name
            ));
        }
    }

    // These must exactly match the Chisel-emitted signatures; they are
    // implemented by the compat layer or the generated IR.
    out.push_str("  public:\n");
    out.push_str("    void init(bool random_init = false);\n");
    out.push_str("    int clock(dat_t<1> reset);\n");
    out.push_str("    void clock_lo(dat_t<1> reset);\n");
    out.push_str("    void clock_hi(dat_t<1> reset);\n");
    out.push_str("    void dump(FILE *file, int clock);\n");
    out.push_str("};\n");

    // The debug API companion class.
    out.push_str(&format!("class {class}_api_t : public mod_api_t {{\n"));
    out.push_str("  void init_mapping_table(void);\n");
    out.push_str("};\n");

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(source: &str) -> String {
        let program = flollvm_flo::parse(source).expect("flo should parse");
        emit_header(&program)
    }

    #[test]
    fn backend_metadata() {
        assert_eq!(HeaderBackend.name(), "C++ header");
        assert!(HeaderBackend.targets().contains(&"header"));
    }

    #[test]
    fn exported_wires_get_dat_fields_with_shadows() {
        let text = generate("Top::io_in = in/8\n");
        assert!(text.contains("class Top_t: public mod_t {"));
        assert!(text.contains("    dat_t<8> Top__io_in;\n"));
        assert!(text.contains("    dat_t<8> Top__io_in__prev;\n"));
    }

    #[test]
    fn temporaries_are_not_declared() {
        let text = generate(
            "Top::a = in/8\n\
             T0 = not/8 Top::a\n",
        );
        assert!(!text.contains("T0"));
    }

    #[test]
    fn memories_get_mem_fields_without_shadows() {
        let text = generate("Top::m = mem/16 1024\n");
        assert!(text.contains("    mem_t<16, 1024> Top__m;\n"));
        assert!(!text.contains("Top__m__prev"));
    }

    #[test]
    fn method_set_matches_the_chisel_contract() {
        let text = generate("Top::a = in/1\n");
        assert!(text.contains("    void init(bool random_init = false);\n"));
        assert!(text.contains("    int clock(dat_t<1> reset);\n"));
        assert!(text.contains("    void clock_lo(dat_t<1> reset);\n"));
        assert!(text.contains("    void clock_hi(dat_t<1> reset);\n"));
        assert!(text.contains("    void dump(FILE *file, int clock);\n"));
    }

    #[test]
    fn api_class_is_declared() {
        let text = generate("Top::a = in/1\n");
        assert!(text.contains("class Top_api_t : public mod_api_t {"));
        assert!(text.contains("  void init_mapping_table(void);\n"));
    }
}
