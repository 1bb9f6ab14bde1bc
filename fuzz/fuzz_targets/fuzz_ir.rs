#![no_main]

use flollvm_backend_core::Backend;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        // Any program that parses must either generate or fail with a
        // proper error; panics are bugs.
        if let Ok(program) = flollvm_flo::parse(source) {
            let _ = flollvm_backend_ir::IrBackend.generate(&program);
        }
    }
});
