//! Emission errors.

/// Errors raised while writing IR.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// `define` was given a parameter-name list whose length differs
    /// from the signature's arity.
    #[error("function '{name}' declares {expected} argument(s) but {found} name(s) were given")]
    ArityMismatch {
        /// The function being defined.
        name: String,
        /// Arity of the signature.
        expected: usize,
        /// Number of parameter names supplied.
        found: usize,
    },
}
