use flollvm_backend_core::{Backend, BackendError, BackendOutput};
use flollvm_flo::Program;

/// Parse Flo source, panicking on failure.
#[allow(dead_code)]
pub fn parse(source: &str) -> Program {
    flollvm_flo::parse(source).expect("Flo parse failed")
}

/// Parse Flo source and run it through the backend.
#[allow(dead_code)]
pub fn generate(source: &str, backend: &dyn Backend) -> BackendOutput {
    backend
        .generate(&parse(source))
        .expect("backend generation failed")
}

/// Like `generate` but returns a Result instead of panicking.
#[allow(dead_code)]
pub fn try_generate(
    source: &str,
    backend: &dyn Backend,
) -> Result<BackendOutput, BackendError> {
    backend.generate(&parse(source))
}

/// Extract the first output file's text from a `BackendOutput`.
#[allow(dead_code)]
pub fn first_text(output: &BackendOutput) -> &str {
    &output.files[0].content
}
