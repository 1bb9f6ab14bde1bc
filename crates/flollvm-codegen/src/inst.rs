//! Instruction encodings.
//!
//! One variant per IR instruction the emitter uses; each renders as
//! exactly one line of textual SSA. Constructors assert the width
//! agreement each encoding requires, so an ill-typed line cannot be
//! built from well-formed values.

use std::fmt;

use crate::sig::FuncSig;
use crate::types::Ty;
use crate::value::Value;

/// One SSA instruction.
#[derive(Clone, Debug)]
pub enum Inst {
    /// `<d> = add <ty> <a>, <b>`
    Add { d: Value, a: Value, b: Value },
    /// `<d> = sub <ty> <a>, <b>`
    Sub { d: Value, a: Value, b: Value },
    /// `<d> = mul <ty> <a>, <b>`
    Mul { d: Value, a: Value, b: Value },
    /// `<d> = and <ty> <a>, <b>`
    And { d: Value, a: Value, b: Value },
    /// `<d> = or <ty> <a>, <b>`
    Or { d: Value, a: Value, b: Value },
    /// `<d> = xor <ty> <a>, <b>`
    Xor { d: Value, a: Value, b: Value },
    /// Bitwise complement: `<d> = xor <ty> <s>, -1`.
    Not { d: Value, s: Value },
    /// Same-type copy: `<d> = add <d-ty> <s>, 0`.
    Mov { d: Value, s: Value },
    /// Category-crossing copy rendered in the source's type:
    /// `<d> = add <s-ty> <s>, 0`. The bit widths must still agree.
    UnsafeMov { d: Value, s: Value },
    /// `<d> = shl <ty> <s>, <amt>`
    Shl { d: Value, s: Value, amt: Value },
    /// Logical right shift: `<d> = lshr <ty> <s>, <amt>`.
    Lshr { d: Value, s: Value, amt: Value },
    /// `<d> = icmp eq <ty> <a>, <b>`
    CmpEq { d: Value, a: Value, b: Value },
    /// `<d> = icmp ne <ty> <a>, <b>`
    CmpNe { d: Value, a: Value, b: Value },
    /// Unsigned less-than: `<d> = icmp ult <ty> <a>, <b>`.
    CmpUlt { d: Value, a: Value, b: Value },
    /// Unsigned greater-or-equal: `<d> = icmp uge <ty> <a>, <b>`.
    CmpUge { d: Value, a: Value, b: Value },
    /// `<d> = select i1 <c>, <ty> <t>, <ty> <f>`
    Select {
        d: Value,
        c: Value,
        t: Value,
        f: Value,
    },
    /// `<d> = zext <s-ty> <s> to <d-ty>`
    Zext { d: Value, s: Value },
    /// `<d> = trunc <s-ty> <s> to <d-ty>`
    Trunc { d: Value, s: Value },
    /// `<d> = alloca <pointee>, <count-ty> <count>`
    Alloca { d: Value, count: Value },
    /// `<d> = load <d-ty>, <p-ty> <p>`
    Load { d: Value, p: Value },
    /// `store <v-ty> <v>, <p-ty> <p>`
    Store { p: Value, v: Value },
    /// `<d> = getelementptr <pointee>, <base-ty> <base>, <idx-ty> <idx>`
    Gep {
        d: Value,
        base: Value,
        idx: Value,
    },
    /// `call <ret> @<name>(<ty> <arg>, ...)`
    Call {
        ret: Ty,
        func: String,
        args: Vec<Value>,
    },
}

fn same_bits(values: &[&Value]) {
    debug_assert!(
        values.windows(2).all(|w| w[0].bits() == w[1].bits()),
        "operand widths disagree: {values:?}"
    );
}

impl Inst {
    /// Two-source addition over one `Fix(w)`.
    pub fn add(d: Value, a: Value, b: Value) -> Self {
        same_bits(&[&d, &a, &b]);
        Self::Add { d, a, b }
    }

    /// Two-source subtraction.
    pub fn sub(d: Value, a: Value, b: Value) -> Self {
        same_bits(&[&d, &a, &b]);
        Self::Sub { d, a, b }
    }

    /// Two-source multiplication. Sources must already be extended to
    /// the destination width.
    pub fn mul(d: Value, a: Value, b: Value) -> Self {
        same_bits(&[&d, &a, &b]);
        Self::Mul { d, a, b }
    }

    /// Bitwise and.
    pub fn and(d: Value, a: Value, b: Value) -> Self {
        same_bits(&[&d, &a, &b]);
        Self::And { d, a, b }
    }

    /// Bitwise or.
    pub fn or(d: Value, a: Value, b: Value) -> Self {
        same_bits(&[&d, &a, &b]);
        Self::Or { d, a, b }
    }

    /// Bitwise exclusive or.
    pub fn xor(d: Value, a: Value, b: Value) -> Self {
        same_bits(&[&d, &a, &b]);
        Self::Xor { d, a, b }
    }

    /// Bitwise complement.
    pub fn not(d: Value, s: Value) -> Self {
        same_bits(&[&d, &s]);
        Self::Not { d, s }
    }

    /// Same-width copy.
    pub fn mov(d: Value, s: Value) -> Self {
        same_bits(&[&d, &s]);
        Self::Mov { d, s }
    }

    /// Copy across value categories (e.g. host `bool` into `Fix(1)`).
    pub fn unsafe_mov(d: Value, s: Value) -> Self {
        same_bits(&[&d, &s]);
        Self::UnsafeMov { d, s }
    }

    /// Logical left shift. The amount may be any integer value of the
    /// same width or an inline constant.
    pub fn shl(d: Value, s: Value, amt: Value) -> Self {
        same_bits(&[&d, &s]);
        Self::Shl { d, s, amt }
    }

    /// Logical right shift.
    pub fn lshr(d: Value, s: Value, amt: Value) -> Self {
        same_bits(&[&d, &s]);
        Self::Lshr { d, s, amt }
    }

    /// Equality compare into a 1-bit destination.
    pub fn cmp_eq(d: Value, a: Value, b: Value) -> Self {
        same_bits(&[&a, &b]);
        debug_assert_eq!(d.bits(), Some(1));
        Self::CmpEq { d, a, b }
    }

    /// Inequality compare.
    pub fn cmp_neq(d: Value, a: Value, b: Value) -> Self {
        same_bits(&[&a, &b]);
        debug_assert_eq!(d.bits(), Some(1));
        Self::CmpNe { d, a, b }
    }

    /// Unsigned less-than compare.
    pub fn cmp_lt(d: Value, a: Value, b: Value) -> Self {
        same_bits(&[&a, &b]);
        debug_assert_eq!(d.bits(), Some(1));
        Self::CmpUlt { d, a, b }
    }

    /// Unsigned greater-or-equal compare.
    pub fn cmp_gte(d: Value, a: Value, b: Value) -> Self {
        same_bits(&[&a, &b]);
        debug_assert_eq!(d.bits(), Some(1));
        Self::CmpUge { d, a, b }
    }

    /// Three-operand select, `c ? t : f`.
    pub fn mux(d: Value, c: Value, t: Value, f: Value) -> Self {
        debug_assert_eq!(c.bits(), Some(1));
        same_bits(&[&d, &t, &f]);
        Self::Select { d, c, t, f }
    }

    /// Zero extension. Collapses to a copy when the widths already
    /// agree, since `zext iN to iN` is not a legal instruction.
    pub fn zext(d: Value, s: Value) -> Self {
        debug_assert!(d.bits() >= s.bits());
        if d.bits() == s.bits() {
            Self::Mov { d, s }
        } else {
            Self::Zext { d, s }
        }
    }

    /// Zero-extend, truncate, or copy, as the width relation demands.
    pub fn zext_or_trunc(d: Value, s: Value) -> Self {
        use std::cmp::Ordering;
        match d.bits().cmp(&s.bits()) {
            Ordering::Greater => Self::Zext { d, s },
            Ordering::Less => Self::Trunc { d, s },
            Ordering::Equal => Self::UnsafeMov { d, s },
        }
    }

    /// Stack allocation of `count` cells of the destination's pointee.
    pub fn alloca(d: Value, count: Value) -> Self {
        debug_assert!(matches!(d.ty(), Ty::Ptr(_)));
        Self::Alloca { d, count }
    }

    /// Load through a pointer.
    pub fn load(d: Value, p: Value) -> Self {
        debug_assert!(matches!(p.ty(), Ty::Ptr(inner) if **inner == *d.ty()));
        Self::Load { d, p }
    }

    /// Store through a pointer.
    pub fn store(p: Value, v: Value) -> Self {
        debug_assert!(matches!(p.ty(), Ty::Ptr(inner) if **inner == *v.ty()));
        Self::Store { p, v }
    }

    /// Pointer offset by `idx` elements.
    pub fn index(d: Value, base: Value, idx: Value) -> Self {
        debug_assert_eq!(d.ty(), base.ty());
        Self::Gep { d, base, idx }
    }

    /// Call of a declared function. The argument count must match the
    /// callee's arity.
    pub fn call(sig: &FuncSig, args: Vec<Value>) -> Self {
        debug_assert_eq!(sig.args().len(), args.len());
        Self::Call {
            ret: sig.ret().clone(),
            func: sig.name().to_string(),
            args,
        }
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add { d, a, b } => write!(f, "{d} = add {} {a}, {b}", d.ty()),
            Self::Sub { d, a, b } => write!(f, "{d} = sub {} {a}, {b}", d.ty()),
            Self::Mul { d, a, b } => write!(f, "{d} = mul {} {a}, {b}", d.ty()),
            Self::And { d, a, b } => write!(f, "{d} = and {} {a}, {b}", d.ty()),
            Self::Or { d, a, b } => write!(f, "{d} = or {} {a}, {b}", d.ty()),
            Self::Xor { d, a, b } => write!(f, "{d} = xor {} {a}, {b}", d.ty()),
            Self::Not { d, s } => write!(f, "{d} = xor {} {s}, -1", d.ty()),
            Self::Mov { d, s } => write!(f, "{d} = add {} {s}, 0", d.ty()),
            Self::UnsafeMov { d, s } => write!(f, "{d} = add {} {s}, 0", s.ty()),
            Self::Shl { d, s, amt } => write!(f, "{d} = shl {} {s}, {amt}", d.ty()),
            Self::Lshr { d, s, amt } => write!(f, "{d} = lshr {} {s}, {amt}", d.ty()),
            Self::CmpEq { d, a, b } => write!(f, "{d} = icmp eq {} {a}, {b}", a.ty()),
            Self::CmpNe { d, a, b } => write!(f, "{d} = icmp ne {} {a}, {b}", a.ty()),
            Self::CmpUlt { d, a, b } => write!(f, "{d} = icmp ult {} {a}, {b}", a.ty()),
            Self::CmpUge { d, a, b } => write!(f, "{d} = icmp uge {} {a}, {b}", a.ty()),
            Self::Select { d, c, t, f: fv } => {
                write!(f, "{d} = select i1 {c}, {} {t}, {} {fv}", t.ty(), fv.ty())
            }
            Self::Zext { d, s } => write!(f, "{d} = zext {} {s} to {}", s.ty(), d.ty()),
            Self::Trunc { d, s } => write!(f, "{d} = trunc {} {s} to {}", s.ty(), d.ty()),
            Self::Alloca { d, count } => match d.ty() {
                Ty::Ptr(inner) => write!(f, "{d} = alloca {inner}, {} {count}", count.ty()),
                _ => unreachable!("alloca destination is always a pointer"),
            },
            Self::Load { d, p } => write!(f, "{d} = load {}, {} {p}", d.ty(), p.ty()),
            Self::Store { p, v } => write!(f, "store {} {v}, {} {p}", v.ty(), p.ty()),
            Self::Gep { d, base, idx } => match base.ty() {
                Ty::Ptr(inner) => write!(
                    f,
                    "{d} = getelementptr {inner}, {} {base}, {} {idx}",
                    base.ty(),
                    idx.ty()
                ),
                _ => unreachable!("getelementptr base is always a pointer"),
            },
            Self::Call { ret, func, args } => {
                write!(f, "call {ret} @{func}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {arg}", arg.ty())?;
                }
                write!(f, ")")
            }
        }
    }
}
