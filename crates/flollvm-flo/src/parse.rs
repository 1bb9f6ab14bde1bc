//! Line-based parser for the Flo textual format.
//!
//! Each non-blank, non-comment line reads
//! `<dest> = <opcode>[/<width>] <operand...>`. Lines arrive in dataflow
//! order, so every operand either names an earlier destination or is an
//! integer literal. Destination widths come from the `/<width>`
//! annotation or are inferred from the opcode.

use crate::error::ParseError;
use crate::node::Node;
use crate::op::{Operation, Source};
use crate::opcode::Opcode;
use crate::program::Program;

const MAX_WIDTH: u64 = 1 << 16;

/// Parses Flo source text into a [`Program`].
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let mut program = Program::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        parse_line(&mut program, line, text)?;
    }

    log::debug!(
        "parsed {} operations over {} nodes",
        program.operations().len(),
        program.nodes().count()
    );
    Ok(program)
}

fn parse_line(program: &mut Program, line: usize, text: &str) -> Result<(), ParseError> {
    let (dest, rhs) = text.split_once('=').ok_or(ParseError::Syntax { line })?;
    let dest = dest.trim();
    if dest.is_empty() || dest.contains(char::is_whitespace) {
        return Err(ParseError::Syntax { line });
    }
    if program.lookup(dest).is_some() {
        return Err(ParseError::Redefined {
            line,
            name: dest.to_string(),
        });
    }

    let mut tokens = rhs.split_whitespace();
    let op_token = tokens.next().ok_or(ParseError::Syntax { line })?;
    let (op_text, width) = parse_op_token(line, op_token)?;
    let opcode: Opcode = op_text.parse().map_err(|()| ParseError::UnknownOpcode {
        line,
        opcode: op_text.to_string(),
    })?;

    let operands: Vec<&str> = tokens.collect();
    if let Some(expected) = opcode.num_sources() {
        if operands.len() != expected {
            return Err(ParseError::OperandCount {
                line,
                opcode: opcode.to_string(),
                expected,
                found: operands.len(),
            });
        }
    }

    if opcode == Opcode::Mem {
        return parse_mem(program, line, dest, width, &operands);
    }

    let mut sources = Vec::with_capacity(operands.len());
    for operand in &operands {
        sources.push(resolve(program, line, operand)?);
    }

    let width = match width {
        Some(w) => w,
        None => infer_width(program, line, dest, opcode, &sources)?,
    };
    check_widths(program, line, opcode, width, &sources)?;

    if dest.contains("::") {
        // The first hierarchical name names the circuit.
        if let Some(top) = dest.split("::").next() {
            program.set_class_name(top);
        }
    }

    let handle = program.declare(Node::wire(dest, width, program.next_index()));
    let node = program.node(handle);
    let writeback = node.exported && !node.is_mem;
    program.push(Operation {
        op: opcode,
        dest: handle,
        sources,
        writeback,
    });
    Ok(())
}

/// Splits `add/32` into the opcode text and the optional width.
fn parse_op_token(line: usize, token: &str) -> Result<(&str, Option<u64>), ParseError> {
    match token.split_once('/') {
        Some((op, w)) => {
            let width = w.parse::<u64>().ok().filter(|w| (1..=MAX_WIDTH).contains(w));
            match width {
                Some(width) => Ok((op, Some(width))),
                None => Err(ParseError::BadWidth {
                    line,
                    text: w.to_string(),
                }),
            }
        }
        None => Ok((token, None)),
    }
}

/// Memory declarations carry a depth instead of sources:
/// `m = mem/8 1024`.
fn parse_mem(
    program: &mut Program,
    line: usize,
    dest: &str,
    width: Option<u64>,
    operands: &[&str],
) -> Result<(), ParseError> {
    let width = width.ok_or_else(|| ParseError::NoWidth {
        line,
        name: dest.to_string(),
    })?;
    let depth = operands[0]
        .parse::<u64>()
        .map_err(|_| ParseError::BadDepth {
            line,
            text: operands[0].to_string(),
        })?;

    if dest.contains("::") {
        if let Some(top) = dest.split("::").next() {
            program.set_class_name(top);
        }
    }

    let handle = program.declare(Node::memory(dest, width, depth, program.next_index()));
    program.push(Operation {
        op: Opcode::Mem,
        dest: handle,
        sources: vec![Source::Lit(depth)],
        writeback: false,
    });
    Ok(())
}

fn resolve(program: &Program, line: usize, operand: &str) -> Result<Source, ParseError> {
    if let Some(handle) = program.lookup(operand) {
        return Ok(Source::Node(handle));
    }
    if operand.chars().all(|c| c.is_ascii_digit()) {
        return operand
            .parse::<u64>()
            .map(Source::Lit)
            .map_err(|_| ParseError::BadLiteral {
                line,
                text: operand.to_string(),
            });
    }
    Err(ParseError::UndefinedOperand {
        line,
        name: operand.to_string(),
    })
}

/// Enforces the opcode typing rules, so that generators can rely on
/// operand widths agreeing with the destination. Literal operands adopt
/// whatever width their position requires and are never checked.
fn check_widths(
    program: &Program,
    line: usize,
    opcode: Opcode,
    width: u64,
    sources: &[Source],
) -> Result<(), ParseError> {
    let node_width = |s: &Source| match s {
        Source::Node(h) => Some(program.node(*h).width),
        Source::Lit(_) => None,
    };
    let all_match = |srcs: &[Source], w: u64| {
        srcs.iter().all(|s| node_width(s).map_or(true, |sw| sw == w))
    };

    let ok = match opcode {
        Opcode::Out
        | Opcode::Mov
        | Opcode::Not
        | Opcode::Add
        | Opcode::Sub
        | Opcode::And
        | Opcode::Or
        | Opcode::Xor => all_match(sources, width),
        // Comparisons are 1-bit and compare like-width operands.
        Opcode::Eq | Opcode::Neq | Opcode::Lt | Opcode::Gte => {
            width == 1
                && match (node_width(&sources[0]), node_width(&sources[1])) {
                    (Some(a), Some(b)) => a == b,
                    _ => true,
                }
        }
        Opcode::Mux => {
            node_width(&sources[0]).map_or(true, |w| w == 1) && all_match(&sources[1..], width)
        }
        Opcode::Rst => width == 1,
        // These zero-extend their sources up to the destination.
        Opcode::Mul | Opcode::Cat | Opcode::Catd | Opcode::Lsh => sources
            .iter()
            .all(|s| node_width(s).map_or(true, |sw| sw <= width)),
        // RSH retargets freely between source and destination widths.
        _ => true,
    };

    if ok {
        Ok(())
    } else {
        Err(ParseError::WidthMismatch {
            line,
            opcode: opcode.to_string(),
            width,
        })
    }
}

/// Width inference for lines without a `/<width>` annotation.
fn infer_width(
    program: &Program,
    line: usize,
    dest: &str,
    opcode: Opcode,
    sources: &[Source],
) -> Result<u64, ParseError> {
    let node_width = |s: &Source| match s {
        Source::Node(h) => Some(program.node(*h).width),
        Source::Lit(_) => None,
    };

    let width = match opcode {
        // Reset wires and comparisons are single-bit.
        Opcode::Rst | Opcode::Eq | Opcode::Neq | Opcode::Lt | Opcode::Gte => Some(1),
        // Concatenation sums its source widths.
        Opcode::Cat | Opcode::Catd => match sources {
            [s, t] => node_width(s).zip(node_width(t)).map(|(a, b)| a + b),
            _ => None,
        },
        // Everything else matches its first node operand.
        _ => sources.iter().find_map(|s| node_width(s)),
    };

    width.ok_or_else(|| ParseError::NoWidth {
        line,
        name: dest.to_string(),
    })
}
