//! Cross-artifact tests: the three generated files must agree on the
//! class name and the accessor ABI.

mod common;

use flollvm_backend_compat::CompatBackend;
use flollvm_backend_core::Backend;
use flollvm_backend_header::HeaderBackend;
use flollvm_backend_ir::IrBackend;

const ALU: &str = "\
reset = rst
Alu::io_a = in/16
Alu::io_b = in/16
Alu::io_op = in/1
T0 = add/16 Alu::io_a Alu::io_b
T1 = sub/16 Alu::io_a Alu::io_b
T2 = mux/16 Alu::io_op T0 T1
Alu::io_out = out/16 T2
";

#[test]
fn accessors_declared_by_the_ir_are_defined_by_the_shim() {
    let ir = common::generate(ALU, &IrBackend);
    let compat = common::generate(ALU, &CompatBackend);
    let ir_text = common::first_text(&ir);
    let compat_text = common::first_text(&compat);

    for line in ir_text.lines() {
        let Some(rest) = line.strip_prefix("declare void @_llvmflo_") else {
            continue;
        };
        let Some(symbol) = rest.split('(').next() else {
            continue;
        };
        if symbol.ends_with("_get") || symbol.ends_with("_set") {
            assert!(
                compat_text.contains(&format!("void _llvmflo_{symbol}(Alu_t *d, uint64_t *a)")),
                "IR declares _llvmflo_{symbol} but the shim does not define it"
            );
        }
    }
}

#[test]
fn header_declares_storage_for_every_accessor() {
    let compat = common::generate(ALU, &CompatBackend);
    let header = common::generate(ALU, &HeaderBackend);
    let header_text = common::first_text(&header);

    // Every field the shim dereferences must exist in the class.
    for field in ["Alu__io_a", "Alu__io_b", "Alu__io_op", "Alu__io_out"] {
        assert!(
            common::first_text(&compat).contains(&format!("d->{field}.values[0]")),
            "shim does not copy {field}"
        );
        assert!(
            header_text.contains(&format!("dat_t<16> {field};"))
                || header_text.contains(&format!("dat_t<1> {field};")),
            "header does not declare {field}"
        );
    }
}

#[test]
fn all_three_artifacts_share_the_class_name() {
    let ir = common::generate(ALU, &IrBackend);
    let header = common::generate(ALU, &HeaderBackend);
    let compat = common::generate(ALU, &CompatBackend);

    assert!(common::first_text(&ir).contains("@_llvmflo_Alu_clock_lo"));
    assert!(common::first_text(&header).contains("class Alu_t: public mod_t"));
    assert!(common::first_text(&compat).contains("void Alu_t::clock_lo(dat_t<1> rd)"));
    assert!(common::first_text(&compat).contains("_llvmflo_Alu_clock_lo(this, rd.to_ulong())"));
}

#[test]
fn artifact_file_names() {
    assert_eq!(common::generate(ALU, &IrBackend).files[0].name, "module.ll");
    assert_eq!(
        common::generate(ALU, &HeaderBackend).files[0].name,
        "module.h"
    );
    assert_eq!(
        common::generate(ALU, &CompatBackend).files[0].name,
        "module.cpp"
    );
}

#[test]
fn temporaries_stay_private_everywhere() {
    let ir = common::generate(ALU, &IrBackend);
    let header = common::generate(ALU, &HeaderBackend);
    let compat = common::generate(ALU, &CompatBackend);

    // T0/T1/T2 live only inside the IR body, never in the ABI.
    assert!(!common::first_text(&ir).contains("_llvmflo_T0"));
    assert!(!common::first_text(&header).contains("T0"));
    assert!(!common::first_text(&compat).contains("T0"));
}

#[test]
fn every_artifact_is_deterministic() {
    for backend in [&IrBackend as &dyn Backend, &HeaderBackend, &CompatBackend] {
        let one = common::generate(ALU, backend);
        let two = common::generate(ALU, backend);
        assert_eq!(
            common::first_text(&one),
            common::first_text(&two),
            "{} output is not deterministic",
            backend.name()
        );
    }
}
