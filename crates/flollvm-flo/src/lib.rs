//! Flo circuit model for flollvm.
//!
//! A Flo file describes a synchronous circuit as a flat list of named
//! signals and a dataflow-ordered operation stream, as produced by the
//! Chisel front-end. This crate parses that format into a [`Program`]
//! that the generator backends consume.

pub mod arena;
mod display;
mod error;
mod node;
mod op;
mod opcode;
mod parse;
mod program;

pub use arena::{Arena, Handle};
pub use display::dump_program;
pub use error::ParseError;
pub use node::Node;
pub use op::{Operation, Source};
pub use opcode::Opcode;
pub use parse::parse;
pub use program::Program;
