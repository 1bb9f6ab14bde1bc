//! LLVM IR backend for flollvm (`--ir`).
//!
//! Emits a textual LLVM module implementing
//! `_llvmflo_<class>_clock_lo`, the combinational phase of one
//! simulation cycle, plus the external declarations the body needs.
//! Register updates (`clock_hi`) and VCD dumping stay in the C++ compat
//! layer; see `flollvm-backend-compat`.

use flollvm_backend_core::{Backend, BackendError, BackendOutput, OutputFile};
use flollvm_flo::Program;

mod lower;

/// Backend generating the `clock_lo` LLVM IR module.
#[derive(Debug)]
pub struct IrBackend;

impl Backend for IrBackend {
    fn name(&self) -> &str {
        "LLVM IR"
    }

    fn targets(&self) -> &[&str] {
        &["ir"]
    }

    fn generate(&self, program: &Program) -> Result<BackendOutput, BackendError> {
        let text = lower::emit_module(program)?;
        Ok(BackendOutput {
            files: vec![OutputFile {
                name: "module.ll".into(),
                content: text,
            }],
            diagnostics: vec![],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(source: &str) -> String {
        let program = flollvm_flo::parse(source).expect("flo should parse");
        let output = IrBackend.generate(&program).expect("generation failed");
        output.files[0].content.clone()
    }

    #[test]
    fn backend_metadata() {
        assert_eq!(IrBackend.name(), "LLVM IR");
        assert!(IrBackend.targets().contains(&"ir"));
    }

    #[test]
    fn output_file_is_a_module() {
        let program = flollvm_flo::parse("Top::a = in/8\n").unwrap();
        let output = IrBackend.generate(&program).unwrap();
        assert_eq!(output.files.len(), 1);
        assert_eq!(output.files[0].name, "module.ll");
    }

    #[test]
    fn module_declares_the_runtime_and_accessors() {
        let text = generate(
            "Top::a = in/8\n\
             Top::z = out/8 Top::a\n",
        );
        assert!(text.contains("declare void @printf(i8*, ...)"));
        assert!(text.contains("declare void @llvm.memset.p0i8.i64(i8*, i8, i64, i32, i1)"));
        assert!(text.contains("declare void @_llvmflo_Top__a_get(i8*, i64*)"));
        assert!(text.contains("declare void @_llvmflo_Top__a_set(i8*, i64*)"));
        assert!(text.contains("declare void @_llvmflo_Top__z_get(i8*, i64*)"));
        assert!(text.contains("declare void @_llvmflo_Top__z_set(i8*, i64*)"));
    }

    #[test]
    fn module_defines_clock_lo() {
        let text = generate("Top::a = in/8\n");
        assert!(text.contains("define void @_llvmflo_Top_clock_lo(i8* %dut, i1 %rst)"));
        assert!(text.contains("  ret void\n}"));
    }

    #[test]
    fn unsupported_opcode_is_fatal() {
        let program = flollvm_flo::parse("Top::m = mem/8 16\n").unwrap();
        let err = IrBackend.generate(&program).unwrap_err();
        assert!(matches!(err, BackendError::UnsupportedOpcode(_)));
        assert!(format!("{err}").contains("mem"));
    }
}
