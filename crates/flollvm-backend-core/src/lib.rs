#![warn(missing_docs)]
//! Backend trait and dispatch for flollvm.
//!
//! Defines the [`Backend`] trait that the three generators (LLVM IR,
//! C++ header, C++ compat shim) implement, along with supporting types
//! ([`BackendOutput`], [`BackendError`], [`Diagnostic`]) and a
//! [`BackendRegistry`] for CLI dispatch.

use std::fmt::{self, Debug};

use flollvm_flo::{Opcode, Program};

/// A backend that renders one of the emulator artifacts from a parsed
/// Flo program.
pub trait Backend: Debug + Send + Sync {
    /// Human-readable name (e.g. "LLVM IR").
    fn name(&self) -> &str;

    /// Target identifiers this backend handles (for mode dispatch).
    fn targets(&self) -> &[&str];

    /// Generates the backend's output from a program.
    fn generate(&self, program: &Program) -> Result<BackendOutput, BackendError>;
}

/// The output produced by a backend.
#[derive(Clone, Debug)]
pub struct BackendOutput {
    /// One or more output files.
    pub files: Vec<OutputFile>,
    /// Non-fatal diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

impl fmt::Display for BackendOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s), {} diagnostic(s)",
            self.files.len(),
            self.diagnostics.len()
        )
    }
}

/// A single generated text file.
#[derive(Clone, Debug)]
pub struct OutputFile {
    /// Suggested filename (e.g. "module.ll").
    pub name: String,
    /// The file content.
    pub content: String,
}

impl fmt::Display for OutputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A non-fatal diagnostic message from a backend.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Severity level.
    pub level: DiagnosticLevel,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Severity level for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// A warning that does not prevent generation.
    Warning,
    /// An informational note.
    Info,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "Warning",
            Self::Info => "Info",
        })
    }
}

/// Errors that can occur during generation.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The program uses an opcode the generator cannot compile.
    #[error("unable to compute opcode '{0}'")]
    UnsupportedOpcode(Opcode),
    /// A general backend error.
    #[error("{0}")]
    Other(String),
}

/// Registry of available backends, used for CLI mode dispatch.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    backends: Vec<Box<dyn Backend>>,
}

impl BackendRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// Registers a backend.
    pub fn register(&mut self, backend: Box<dyn Backend>) {
        self.backends.push(backend);
    }

    /// Finds a backend that handles the given target identifier.
    pub fn find(&self, target: &str) -> Option<&dyn Backend> {
        self.backends
            .iter()
            .find(|b| b.targets().contains(&target))
            .map(|b| &**b)
    }

    /// Lists all supported target identifiers.
    pub fn list_targets(&self) -> Vec<&str> {
        self.backends
            .iter()
            .flat_map(|b| b.targets().iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestBackend;
    impl Backend for TestBackend {
        fn name(&self) -> &str {
            "test"
        }
        fn targets(&self) -> &[&str] {
            &["test-target"]
        }
        fn generate(&self, _program: &Program) -> Result<BackendOutput, BackendError> {
            Ok(BackendOutput {
                files: vec![],
                diagnostics: vec![],
            })
        }
    }

    #[test]
    fn registry_find_and_list() {
        let mut reg = BackendRegistry::new();
        reg.register(Box::new(TestBackend));
        assert!(reg.find("test-target").is_some());
        assert!(reg.find("nonexistent").is_none());
        assert_eq!(reg.list_targets(), vec!["test-target"]);
    }

    #[test]
    fn registry_empty_list_targets() {
        let reg = BackendRegistry::new();
        assert!(reg.list_targets().is_empty());
    }

    #[test]
    fn display_backend_output() {
        let output = BackendOutput {
            files: vec![
                OutputFile {
                    name: "module.ll".into(),
                    content: "declare void @printf(i8*, ...)\n".into(),
                },
                OutputFile {
                    name: "module.h".into(),
                    content: String::new(),
                },
            ],
            diagnostics: vec![Diagnostic {
                level: DiagnosticLevel::Info,
                message: "done".into(),
            }],
        };
        assert_eq!(format!("{output}"), "2 file(s), 1 diagnostic(s)");
    }

    #[test]
    fn display_output_file() {
        let f = OutputFile {
            name: "module.ll".into(),
            content: String::new(),
        };
        assert_eq!(format!("{f}"), "module.ll");
    }

    #[test]
    fn display_diagnostic_and_level() {
        let warn = Diagnostic {
            level: DiagnosticLevel::Warning,
            message: "memory accessors skipped".into(),
        };
        assert_eq!(format!("{warn}"), "[Warning] memory accessors skipped");
        assert_eq!(format!("{}", DiagnosticLevel::Info), "Info");
    }

    #[test]
    fn backend_error_display_names_the_opcode() {
        let err = BackendError::UnsupportedOpcode(Opcode::Mem);
        assert_eq!(format!("{err}"), "unable to compute opcode 'mem'");

        let other = BackendError::Other("internal failure".into());
        assert_eq!(format!("{other}"), "internal failure");
    }
}
