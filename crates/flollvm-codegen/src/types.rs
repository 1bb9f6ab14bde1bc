//! LLVM type categories used by the emitter.

use std::fmt;

/// A host-primitive kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prim {
    /// No value; only valid as a return type or behind a pointer.
    Void,
    /// A single bit, `i1`.
    Bool,
    /// `i8`.
    I8,
    /// `i32`.
    I32,
    /// `i64`.
    I64,
}

impl Prim {
    /// The width of this primitive in bits. Void has no width.
    pub fn bits(self) -> Option<u64> {
        match self {
            Self::Void => None,
            Self::Bool => Some(1),
            Self::I8 => Some(8),
            Self::I32 => Some(32),
            Self::I64 => Some(64),
        }
    }
}

/// An LLVM type as the emitter sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ty {
    /// A fixed-width integer of exactly `w` bits, `i<w>`.
    Fix(u64),
    /// A host primitive.
    Prim(Prim),
    /// A pointer. Pointee `void` renders as `i8*` since LLVM has no
    /// `void*`.
    Ptr(Box<Ty>),
    /// The varargs marker, only valid as the last declared argument.
    Vararg,
}

impl Ty {
    /// Shorthand for a pointer to `inner`.
    pub fn ptr(inner: Ty) -> Ty {
        Ty::Ptr(Box::new(inner))
    }

    /// The width in bits of an integer-valued type, if it has one.
    pub fn bits(&self) -> Option<u64> {
        match self {
            Self::Fix(w) => Some(*w),
            Self::Prim(p) => p.bits(),
            Self::Ptr(_) | Self::Vararg => None,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fix(w) => write!(f, "i{w}"),
            Self::Prim(Prim::Void) => f.write_str("void"),
            Self::Prim(Prim::Bool) => f.write_str("i1"),
            Self::Prim(Prim::I8) => f.write_str("i8"),
            Self::Prim(Prim::I32) => f.write_str("i32"),
            Self::Prim(Prim::I64) => f.write_str("i64"),
            Self::Ptr(inner) => match **inner {
                Ty::Prim(Prim::Void) => f.write_str("i8*"),
                _ => write!(f, "{inner}*"),
            },
            Self::Vararg => f.write_str("..."),
        }
    }
}
