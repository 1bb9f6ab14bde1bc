//! Parse errors for the Flo format.

/// Errors raised while parsing a Flo file.
///
/// All variants carry the 1-based line number of the offending line;
/// parsing stops at the first error.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The line is not of the form `<dest> = <opcode> <operand...>`.
    #[error("line {line}: expected '<dest> = <opcode> <operand...>'")]
    Syntax {
        /// 1-based line number.
        line: usize,
    },

    /// The opcode token is not in the Flo opcode set.
    #[error("line {line}: unknown opcode '{opcode}'")]
    UnknownOpcode {
        /// 1-based line number.
        line: usize,
        /// The unrecognized token.
        opcode: String,
    },

    /// The `/width` annotation is not a valid width.
    #[error("line {line}: invalid width '{text}' (must be 1..=65536)")]
    BadWidth {
        /// 1-based line number.
        line: usize,
        /// The offending annotation text.
        text: String,
    },

    /// An operand looked numeric but does not fit in 64 bits.
    #[error("line {line}: invalid integer literal '{text}'")]
    BadLiteral {
        /// 1-based line number.
        line: usize,
        /// The offending operand text.
        text: String,
    },

    /// A memory declaration has a non-numeric depth.
    #[error("line {line}: invalid memory depth '{text}'")]
    BadDepth {
        /// 1-based line number.
        line: usize,
        /// The offending depth text.
        text: String,
    },

    /// The operand count does not match the opcode's arity.
    #[error("line {line}: '{opcode}' takes {expected} operand(s), found {found}")]
    OperandCount {
        /// 1-based line number.
        line: usize,
        /// The opcode in question.
        opcode: String,
        /// Operands the opcode requires.
        expected: usize,
        /// Operands actually present.
        found: usize,
    },

    /// An operand names a node that no earlier line defines.
    #[error("line {line}: operand '{name}' is not defined by an earlier operation")]
    UndefinedOperand {
        /// 1-based line number.
        line: usize,
        /// The undefined operand name.
        name: String,
    },

    /// A destination name is defined on two lines.
    #[error("line {line}: node '{name}' is defined twice")]
    Redefined {
        /// 1-based line number.
        line: usize,
        /// The redefined node name.
        name: String,
    },

    /// Operand widths do not fit the opcode's typing rule.
    #[error("line {line}: operand widths are inconsistent with '{opcode}' at width {width}")]
    WidthMismatch {
        /// 1-based line number.
        line: usize,
        /// The opcode in question.
        opcode: String,
        /// The destination width.
        width: u64,
    },

    /// No width annotation was given and none can be inferred.
    #[error("line {line}: cannot infer a width for '{name}'; annotate the opcode as 'op/width'")]
    NoWidth {
        /// 1-based line number.
        line: usize,
        /// The destination whose width is unknown.
        name: String,
    },
}
