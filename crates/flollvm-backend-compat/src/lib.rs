//! C++ compat backend for flollvm (`--compat`).
//!
//! Emits the thin native shim between the generated IR and Chisel's
//! C++ emulator interface: `extern "C"` accessor functions that step
//! around C++ name mangling, the `clock`/`clock_lo` bridges into the IR
//! symbols, zero-initialization, the register-copy `clock_hi`, VCD
//! dumping, and the debug-API mapping table.

use flollvm_backend_core::{
    Backend, BackendError, BackendOutput, Diagnostic, DiagnosticLevel, OutputFile,
};
use flollvm_flo::{Opcode, Program, Source};

mod vcd;

/// Backend generating the C++ compatibility layer.
#[derive(Debug)]
pub struct CompatBackend;

impl Backend for CompatBackend {
    fn name(&self) -> &str {
        "C++ compat"
    }

    fn targets(&self) -> &[&str] {
        &["compat"]
    }

    fn generate(&self, program: &Program) -> Result<BackendOutput, BackendError> {
        let mut diagnostics = Vec::new();
        let text = emit_compat(program, &mut diagnostics);
        Ok(BackendOutput {
            files: vec![OutputFile {
                name: "module.cpp".into(),
                content: text,
            }],
            diagnostics,
        })
    }
}

fn emit_compat(program: &Program, diagnostics: &mut Vec<Diagnostic>) -> String {
    let class = program.class_name();
    let mut out = String::new();

    emit_accessors(program, &mut out, diagnostics);
    emit_clock_bridges(class, &mut out);
    emit_init(program, &mut out);
    emit_clock_hi(program, &mut out);
    vcd::emit_dump(program, &mut out);
    emit_mapping_table(program, &mut out);

    out
}

/// The whole point of this layer: export C-named accessors so the IR
/// can reach `dat_t` fields without knowing C++ name mangling.
fn emit_accessors(program: &Program, out: &mut String, diagnostics: &mut Vec<Diagnostic>) {
    let class = program.class_name();

    out.push_str("extern \"C\" {\n");

    for (_, node) in program.nodes() {
        if !node.exported {
            continue;
        }

        if node.is_mem {
            // Memory accessors are not part of the ABI yet; the IR
            // generator rejects memory opcodes anyway.
            diagnostics.push(Diagnostic {
                level: DiagnosticLevel::Warning,
                message: format!("memory '{}': accessors not emitted", node.name),
            });
            continue;
        }

        let m = &node.mangled_name;

        out.push_str(&format!(
            "  void _llvmflo_{m}_get({class}_t *d, uint64_t *a) {{\n"
        ));
        for i in 0..node.words() {
            out.push_str(&format!("    a[{i}] = d->{m}.values[{i}];\n"));
        }
        out.push_str("  }\n");

        out.push_str(&format!(
            "  void _llvmflo_{m}_set({class}_t *d, uint64_t *a) {{\n"
        ));
        for i in 0..node.words() {
            out.push_str(&format!("    d->{m}.values[{i}] = a[{i}];\n"));
        }
        out.push_str("  }\n");
    }

    // The clock functions are defined in the generated IR (or below)
    // under non-mangled names; declare them for the bridges.
    out.push_str(&format!("  void _llvmflo_{class}_init({class}_t *p, bool r);\n"));
    out.push_str(&format!(
        "  void _llvmflo_{class}_clock_lo({class}_t *p, bool r);\n"
    ));
    out.push_str(&format!(
        "  void _llvmflo_{class}_clock_hi({class}_t *p, bool r);\n"
    ));

    out.push_str("};\n");
}

fn emit_clock_bridges(class: &str, out: &mut String) {
    out.push_str(&format!("int {class}_t::clock(dat_t<1> rd)\n"));
    out.push_str("  { clock_lo(rd); clock_hi(rd); return 0; }\n");

    out.push_str(&format!("void {class}_t::clock_lo(dat_t<1> rd)\n"));
    out.push_str(&format!(
        "  {{ _llvmflo_{class}_clock_lo(this, rd.to_ulong()); }}\n"
    ));
}

/// init zeroes every exported wire; doing this in C++ keeps the IR
/// module down to the one function it actually needs.
fn emit_init(program: &Program, out: &mut String) {
    let class = program.class_name();

    out.push_str(&format!("void {class}_t::init(bool r)\n{{\n"));
    for (_, node) in program.nodes() {
        if !node.exported || node.is_mem {
            continue;
        }
        out.push_str(&format!("  this->{} = 0;\n", node.mangled_name));
    }
    out.push_str("}\n");
}

/// clock_hi copies each register's next-value into the register. Plain
/// assignments between `dat_t`s; nothing here benefits from IR.
fn emit_clock_hi(program: &Program, out: &mut String) {
    let class = program.class_name();

    out.push_str(&format!("void {class}_t::clock_hi(dat_t<1> rd)\n{{\n"));
    out.push_str("  bool r = rd.to_ulong();\n");

    for op in program.operations() {
        if op.op != Opcode::Reg {
            continue;
        }

        let dest = &program.node(op.dest).mangled_name;
        match op.src(1) {
            Source::Node(h) => {
                out.push_str(&format!("  {dest} = {};\n", program.node(h).mangled_name));
            }
            Source::Lit(v) => {
                out.push_str(&format!("  {dest} = {v};\n"));
            }
        }
    }

    out.push_str("}\n");
}

/// The debug API looks signals up by their Chisel dotted name.
fn emit_mapping_table(program: &Program, out: &mut String) {
    let class = program.class_name();

    out.push_str(&format!(
        "void {class}_api_t::init_mapping_table(void) {{\n"
    ));
    out.push_str("  dat_table.clear();\n");
    out.push_str("  mem_table.clear();\n");
    out.push_str(&format!(
        "  {class}_t *dut = dynamic_cast<{class}_t*>(module);\n"
    ));
    out.push_str("  if (dut == NULL) {assert(dut != NULL); abort();}\n");

    for (_, node) in program.nodes() {
        if !node.exported {
            continue;
        }

        if node.is_mem {
            out.push_str(&format!(
                "  mem_table[\"{}\"] = new mem_api<{}, {}>(&dut->{}, \"{}\", \"\");\n",
                node.chisel_name, node.width, node.depth, node.mangled_name, node.chisel_name
            ));
        } else {
            out.push_str(&format!(
                "  dat_table[\"{}\"] = new dat_api<{}>(&dut->{}, \"{}\", \"\");\n",
                node.chisel_name, node.width, node.mangled_name, node.chisel_name
            ));
        }
    }

    out.push_str("}\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(source: &str) -> BackendOutput {
        let program = flollvm_flo::parse(source).expect("flo should parse");
        CompatBackend.generate(&program).expect("generation failed")
    }

    fn text(source: &str) -> String {
        generate(source).files[0].content.clone()
    }

    #[test]
    fn backend_metadata() {
        assert_eq!(CompatBackend.name(), "C++ compat");
        assert!(CompatBackend.targets().contains(&"compat"));
    }

    #[test]
    fn accessors_copy_every_word() {
        let t = text("Top::wide = in/65\n");
        assert!(t.contains("void _llvmflo_Top__wide_get(Top_t *d, uint64_t *a) {"));
        assert!(t.contains("    a[0] = d->Top__wide.values[0];\n"));
        assert!(t.contains("    a[1] = d->Top__wide.values[1];\n"));
        assert!(t.contains("void _llvmflo_Top__wide_set(Top_t *d, uint64_t *a) {"));
        assert!(t.contains("    d->Top__wide.values[1] = a[1];\n"));
    }

    #[test]
    fn temporaries_get_no_accessors() {
        let t = text("Top::a = in/8\nT0 = not/8 Top::a\n");
        assert!(!t.contains("_llvmflo_T0_get"));
    }

    #[test]
    fn memories_are_skipped_with_a_warning() {
        let output = generate("Top::m = mem/8 64\n");
        let t = &output.files[0].content;
        assert!(!t.contains("_llvmflo_Top__m_get"));
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].level, DiagnosticLevel::Warning);
        assert!(output.diagnostics[0].message.contains("Top::m"));
    }

    #[test]
    fn clock_bridges_into_the_ir_symbol() {
        let t = text("Top::a = in/8\n");
        assert!(t.contains("int Top_t::clock(dat_t<1> rd)\n  { clock_lo(rd); clock_hi(rd); return 0; }\n"));
        assert!(t.contains("void Top_t::clock_lo(dat_t<1> rd)\n  { _llvmflo_Top_clock_lo(this, rd.to_ulong()); }\n"));
    }

    #[test]
    fn init_zeroes_exported_wires() {
        let t = text("Top::a = in/8\nTop::m = mem/8 4\n");
        assert!(t.contains("void Top_t::init(bool r)\n{\n  this->Top__a = 0;\n}\n"));
        assert!(!t.contains("this->Top__m = 0;"));
    }

    #[test]
    fn clock_hi_copies_registers_only() {
        let t = text(
            "Top::en = in/1\n\
             Top::next = in/32\n\
             Top::r = reg/32 Top::en Top::next\n\
             T0 = add/32 Top::r 1\n",
        );
        assert!(t.contains("void Top_t::clock_hi(dat_t<1> rd)\n{\n"));
        assert!(t.contains("  bool r = rd.to_ulong();\n"));
        assert!(t.contains("  Top__r = Top__next;\n"));
        assert!(!t.contains("  T0 ="));
    }

    #[test]
    fn mapping_table_uses_chisel_dotted_names() {
        let t = text("Top::sub::a = in/8\nTop::m = mem/4 16\n");
        assert!(t.contains("void Top_api_t::init_mapping_table(void) {"));
        assert!(t.contains(
            "  dat_table[\"Top.sub.a\"] = new dat_api<8>(&dut->Top__sub__a, \"Top.sub.a\", \"\");\n"
        ));
        assert!(t.contains(
            "  mem_table[\"Top.m\"] = new mem_api<4, 16>(&dut->Top__m, \"Top.m\", \"\");\n"
        ));
    }

    #[test]
    fn output_file_is_a_cpp_source() {
        let output = generate("Top::a = in/1\n");
        assert_eq!(output.files.len(), 1);
        assert_eq!(output.files[0].name, "module.cpp");
    }
}
