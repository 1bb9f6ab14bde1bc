//! The Flo opcode set.

use std::fmt;
use std::str::FromStr;

/// A Flo operation code.
///
/// The set is closed: Chisel's Flo emitter produces exactly these. Not
/// every opcode can be compiled (the IR backend rejects the memory and
/// signed-arithmetic family), but the parser recognizes all of them so
/// that an unsupported opcode is reported as such rather than as a
/// syntax error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Opcode {
    Out,
    In,
    Reg,
    Mov,
    Add,
    Sub,
    Mul,
    And,
    Or,
    Xor,
    Not,
    Cat,
    Catd,
    Eq,
    Neq,
    Lt,
    Gte,
    Lsh,
    Rsh,
    Mux,
    Rst,
    Rnd,
    Eat,
    Lit,
    Msk,
    Ld,
    Arsh,
    St,
    Mem,
    Nop,
    Log2,
    Neg,
    Rd,
    Wr,
}

impl Opcode {
    /// The number of source operands this opcode takes, or `None` when
    /// the count is not checked (opcodes the compiler rejects anyway).
    pub fn num_sources(self) -> Option<usize> {
        match self {
            Self::In | Self::Rst => Some(0),
            Self::Out | Self::Mov | Self::Not => Some(1),
            Self::Add
            | Self::Sub
            | Self::Mul
            | Self::And
            | Self::Or
            | Self::Xor
            | Self::Cat
            | Self::Catd
            | Self::Eq
            | Self::Neq
            | Self::Lt
            | Self::Gte
            | Self::Lsh
            | Self::Rsh
            | Self::Reg => Some(2),
            Self::Mux => Some(3),
            Self::Mem => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Out => "out",
            Self::In => "in",
            Self::Reg => "reg",
            Self::Mov => "mov",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Not => "not",
            Self::Cat => "cat",
            Self::Catd => "catd",
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lsh => "lsh",
            Self::Rsh => "rsh",
            Self::Mux => "mux",
            Self::Rst => "rst",
            Self::Rnd => "rnd",
            Self::Eat => "eat",
            Self::Lit => "lit",
            Self::Msk => "msk",
            Self::Ld => "ld",
            Self::Arsh => "arsh",
            Self::St => "st",
            Self::Mem => "mem",
            Self::Nop => "nop",
            Self::Log2 => "log2",
            Self::Neg => "neg",
            Self::Rd => "rd",
            Self::Wr => "wr",
        })
    }
}

impl FromStr for Opcode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Flo files are lowercase; accept either case.
        match s.to_ascii_lowercase().as_str() {
            "out" => Ok(Self::Out),
            "in" => Ok(Self::In),
            "reg" => Ok(Self::Reg),
            "mov" => Ok(Self::Mov),
            "add" => Ok(Self::Add),
            "sub" => Ok(Self::Sub),
            "mul" => Ok(Self::Mul),
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            "xor" => Ok(Self::Xor),
            "not" => Ok(Self::Not),
            "cat" => Ok(Self::Cat),
            "catd" => Ok(Self::Catd),
            "eq" => Ok(Self::Eq),
            "neq" => Ok(Self::Neq),
            "lt" => Ok(Self::Lt),
            "gte" => Ok(Self::Gte),
            "lsh" => Ok(Self::Lsh),
            "rsh" => Ok(Self::Rsh),
            "mux" => Ok(Self::Mux),
            "rst" => Ok(Self::Rst),
            "rnd" => Ok(Self::Rnd),
            "eat" => Ok(Self::Eat),
            "lit" => Ok(Self::Lit),
            "msk" => Ok(Self::Msk),
            "ld" => Ok(Self::Ld),
            "arsh" => Ok(Self::Arsh),
            "st" => Ok(Self::St),
            "mem" => Ok(Self::Mem),
            "nop" => Ok(Self::Nop),
            "log2" => Ok(Self::Log2),
            "neg" => Ok(Self::Neg),
            "rd" => Ok(Self::Rd),
            "wr" => Ok(Self::Wr),
            _ => Err(()),
        }
    }
}
