//! Lowering pass: Flo operations → LLVM IR text.
//!
//! The program is already in dataflow order, so a single forward walk
//! suffices. Every operation expands into a comment header, the
//! instructions realizing its semantics at the destination width, and,
//! for exported destinations, a writeback block that marshals the
//! value into C++ storage 64 bits at a time through the accessor ABI.

use flollvm_backend_core::BackendError;
use flollvm_codegen::{Definition, FuncSig, Inst, LlvmWriter, Prim, Ty, Value};
use flollvm_flo::{Node, Opcode, Operation, Program, Source};

/// Emits the whole `--ir` module: declarations, then `clock_lo`.
pub fn emit_module(program: &Program) -> Result<String, BackendError> {
    let mut out = LlvmWriter::new();

    // External symbols used by generated code.
    out.declare(&FuncSig::new(
        "printf",
        void(),
        vec![Ty::ptr(Ty::Prim(Prim::I8)), Ty::Vararg],
    ));
    out.declare(&FuncSig::new(
        "llvm.memset.p0i8.i64",
        void(),
        vec![
            Ty::ptr(Ty::Prim(Prim::I8)),
            Ty::Prim(Prim::I8),
            Ty::Prim(Prim::I64),
            Ty::Prim(Prim::I32),
            Ty::Prim(Prim::Bool),
        ],
    ));

    // The accessors are defined by the compat layer; declaring them
    // here lets LLVM check the call types.
    for (_, node) in program.nodes() {
        if !node.exported || node.is_mem {
            continue;
        }
        out.declare(&getter_sig(node));
        out.declare(&setter_sig(node));
    }

    emit_clock_lo(program, &mut out)?;
    Ok(out.finish())
}

fn emit_clock_lo(program: &Program, out: &mut LlvmWriter) -> Result<(), BackendError> {
    let sig = FuncSig::new(
        format!("_llvmflo_{}_clock_lo", program.class_name()),
        void(),
        vec![Ty::ptr(void()), Ty::Prim(Prim::Bool)],
    );
    let dut = Value::param("dut", Ty::ptr(void()));
    let rst = Value::param("rst", Ty::Prim(Prim::Bool));

    let mut lo = out
        .define(&sig, &["dut", "rst"])
        .map_err(|e| BackendError::Other(e.to_string()))?;

    for op in program.operations() {
        lower_operation(program, &mut lo, op, &dut, &rst)?;
    }

    lo.finish();
    log::debug!(
        "lowered {} operations for class {}",
        program.operations().len(),
        program.class_name()
    );
    Ok(())
}

fn lower_operation(
    program: &Program,
    lo: &mut Definition<'_>,
    op: &Operation,
    dut: &Value,
    rst: &Value,
) -> Result<(), BackendError> {
    let dest = program.node(op.dest);
    let w = dest.width;
    let words = dest.words();
    let dv = node_value(dest);

    lo.comment("");
    lo.comment(&format!(" *** Chisel Node: {}", program.describe(op)));
    lo.comment("");

    // Marshal-in opcodes compute nothing here; their value is fetched
    // from C++ storage, so they must not be written back either.
    let mut nop = false;

    match op.op {
        Opcode::Out | Opcode::Mov => {
            lo.operate(&Inst::mov(dv.clone(), src(program, op, 0, w)));
        }

        Opcode::Add => {
            let (s, t) = (src(program, op, 0, w), src(program, op, 1, w));
            lo.operate(&Inst::add(dv.clone(), s, t));
        }

        Opcode::Sub => {
            let (s, t) = (src(program, op, 0, w), src(program, op, 1, w));
            lo.operate(&Inst::sub(dv.clone(), s, t));
        }

        Opcode::And => {
            let (s, t) = (src(program, op, 0, w), src(program, op, 1, w));
            lo.operate(&Inst::and(dv.clone(), s, t));
        }

        Opcode::Or => {
            let (s, t) = (src(program, op, 0, w), src(program, op, 1, w));
            lo.operate(&Inst::or(dv.clone(), s, t));
        }

        Opcode::Xor => {
            let (s, t) = (src(program, op, 0, w), src(program, op, 1, w));
            lo.operate(&Inst::xor(dv.clone(), s, t));
        }

        Opcode::Not => {
            lo.operate(&Inst::not(dv.clone(), src(program, op, 0, w)));
        }

        Opcode::Mul => {
            // Extend both factors so the product cannot overflow the
            // instruction width.
            let se = lo.fresh_fix(w);
            let te = lo.fresh_fix(w);
            lo.operate(&Inst::zext(se.clone(), src(program, op, 0, w)));
            lo.operate(&Inst::zext(te.clone(), src(program, op, 1, w)));
            lo.operate(&Inst::mul(dv.clone(), se, te));
        }

        Opcode::Cat | Opcode::Catd => {
            let se = lo.fresh_fix(w);
            let te = lo.fresh_fix(w);
            lo.operate(&Inst::zext(se.clone(), src(program, op, 0, w)));
            lo.operate(&Inst::zext(te.clone(), src(program, op, 1, w)));

            // The low half is t, so s lands above it.
            let t_width = src_width(program, op, 1, w);
            let ss = lo.fresh_fix(w);
            lo.operate(&Inst::shl(ss.clone(), se, Value::literal(w, t_width)));

            lo.operate(&Inst::or(dv.clone(), te, ss));
        }

        Opcode::Eq => {
            let (s, t) = cmp_sources(program, op);
            lo.operate(&Inst::cmp_eq(dv.clone(), s, t));
        }

        Opcode::Neq => {
            let (s, t) = cmp_sources(program, op);
            lo.operate(&Inst::cmp_neq(dv.clone(), s, t));
        }

        Opcode::Lt => {
            let (s, t) = cmp_sources(program, op);
            lo.operate(&Inst::cmp_lt(dv.clone(), s, t));
        }

        Opcode::Gte => {
            let (s, t) = cmp_sources(program, op);
            lo.operate(&Inst::cmp_gte(dv.clone(), s, t));
        }

        Opcode::Lsh => {
            let es = lo.fresh_fix(w);
            let et = lo.fresh_fix(w);
            lo.operate(&Inst::zext(es.clone(), src(program, op, 0, w)));
            lo.operate(&Inst::zext(et.clone(), src(program, op, 1, w)));
            lo.operate(&Inst::shl(dv.clone(), es, et));
        }

        Opcode::Rsh => {
            // Right shifts work in the source width, then retarget to
            // the destination width.
            let sw = src_width(program, op, 0, w);
            let s = src(program, op, 0, sw);
            let cast = lo.fresh_fix(sw);
            lo.operate(&Inst::zext_or_trunc(
                cast.clone(),
                src(program, op, 1, sw),
            ));
            let shifted = lo.fresh_fix(sw);
            lo.operate(&Inst::lshr(shifted.clone(), s, cast));
            lo.operate(&Inst::zext_or_trunc(dv.clone(), shifted));
        }

        Opcode::Mux => {
            let c = src(program, op, 0, 1);
            let t = src(program, op, 1, w);
            let u = src(program, op, 2, w);
            lo.operate(&Inst::mux(dv.clone(), c, t, u));
        }

        Opcode::Rst => {
            lo.operate(&Inst::unsafe_mov(dv.clone(), rst.clone()));
        }

        Opcode::In | Opcode::Reg => {
            // No clock-lo computation: the node's stored value is the
            // value. Registers are advanced by the compat layer's
            // clock_hi.
            nop = true;
            marshal_in(lo, dest, &dv, dut, words, w);
        }

        Opcode::Rnd
        | Opcode::Eat
        | Opcode::Lit
        | Opcode::Msk
        | Opcode::Ld
        | Opcode::Arsh
        | Opcode::St
        | Opcode::Mem
        | Opcode::Nop
        | Opcode::Log2
        | Opcode::Neg
        | Opcode::Rd
        | Opcode::Wr => {
            return Err(BackendError::UnsupportedOpcode(op.op));
        }
    }

    if op.writeback && !nop {
        writeback(lo, dest, &dv, dut, words, w);
    }

    Ok(())
}

/// Fetches a node's stored value out of the C++ class: copy the words
/// into a stack array via the exported getter, then reassemble them
/// into one `Fix(w)` with shift/or chains. The LLVM optimizer folds
/// most of this away.
fn marshal_in(
    lo: &mut Definition<'_>,
    dest: &Node,
    dv: &Value,
    dut: &Value,
    words: u64,
    w: u64,
) {
    let ptr = lo.fresh(Ty::ptr(Ty::Prim(Prim::I64)));
    lo.operate(&Inst::alloca(ptr.clone(), Value::const_prim(Prim::I32, words)));
    lo.operate(&Inst::call(
        &getter_sig(dest),
        vec![dut.clone(), ptr.clone()],
    ));

    let mut cells = Vec::new();
    for i in 0..words {
        let cell = lo.fresh(Ty::ptr(Ty::Prim(Prim::I64)));
        lo.operate(&Inst::index(
            cell.clone(),
            ptr.clone(),
            Value::const_prim(Prim::I64, i),
        ));
        cells.push(cell);
    }

    let mut loads = Vec::new();
    for cell in &cells {
        let word = lo.fresh(Ty::Prim(Prim::I64));
        lo.operate(&Inst::load(word.clone(), cell.clone()));
        loads.push(word);
    }

    let mut extended = Vec::new();
    for word in &loads {
        let ext = lo.fresh_fix(w);
        lo.operate(&Inst::zext_or_trunc(ext.clone(), word.clone()));
        extended.push(ext);
    }

    let mut shifted = Vec::new();
    for (i, ext) in extended.iter().enumerate() {
        let sh = lo.fresh_fix(w);
        lo.operate(&Inst::shl(
            sh.clone(),
            ext.clone(),
            Value::literal(w, 64 * i as u64),
        ));
        shifted.push(sh);
    }

    let mut ored: Vec<Value> = Vec::new();
    for (i, sh) in shifted.iter().enumerate() {
        let acc = lo.fresh_fix(w);
        if i == 0 {
            lo.operate(&Inst::mov(acc.clone(), sh.clone()));
        } else {
            lo.operate(&Inst::or(acc.clone(), sh.clone(), ored[i - 1].clone()));
        }
        ored.push(acc);
    }

    lo.operate(&Inst::mov(dv.clone(), ored[words as usize - 1].clone()));
}

/// Stores a computed value back into the C++ class: split it into
/// 64-bit words on a stack array and hand the array to the exported
/// setter.
fn writeback(lo: &mut Definition<'_>, dest: &Node, dv: &Value, dut: &Value, words: u64, w: u64) {
    lo.comment("  Writeback");

    let ptr = lo.fresh(Ty::ptr(Ty::Prim(Prim::I64)));
    lo.operate(&Inst::alloca(ptr.clone(), Value::const_prim(Prim::I32, words)));

    let mut shifted = Vec::new();
    for i in 0..words {
        let sh = lo.fresh_fix(w);
        lo.operate(&Inst::lshr(
            sh.clone(),
            dv.clone(),
            Value::literal(w, 64 * i),
        ));
        shifted.push(sh);
    }

    let mut trunced = Vec::new();
    for sh in &shifted {
        let word = lo.fresh(Ty::Prim(Prim::I64));
        lo.operate(&Inst::zext_or_trunc(word.clone(), sh.clone()));
        trunced.push(word);
    }

    let mut cells = Vec::new();
    for i in 0..words {
        let cell = lo.fresh(Ty::ptr(Ty::Prim(Prim::I64)));
        lo.operate(&Inst::index(
            cell.clone(),
            ptr.clone(),
            Value::const_prim(Prim::I64, i),
        ));
        cells.push(cell);
    }

    for (cell, word) in cells.iter().zip(&trunced) {
        lo.operate(&Inst::store(cell.clone(), word.clone()));
    }

    lo.operate(&Inst::call(
        &setter_sig(dest),
        vec![dut.clone(), ptr.clone()],
    ));
}

fn void() -> Ty {
    Ty::Prim(Prim::Void)
}

fn accessor_args() -> Vec<Ty> {
    vec![Ty::ptr(void()), Ty::ptr(Ty::Prim(Prim::I64))]
}

fn getter_sig(node: &Node) -> FuncSig {
    FuncSig::new(
        format!("_llvmflo_{}_get", node.mangled_name),
        void(),
        accessor_args(),
    )
}

fn setter_sig(node: &Node) -> FuncSig {
    FuncSig::new(
        format!("_llvmflo_{}_set", node.mangled_name),
        void(),
        accessor_args(),
    )
}

fn node_value(node: &Node) -> Value {
    Value::node(&node.mangled_name, node.width)
}

/// Source operand `i` as a value; inline literals take `lit_width`.
fn src(program: &Program, op: &Operation, i: usize, lit_width: u64) -> Value {
    match op.src(i) {
        Source::Node(h) => node_value(program.node(h)),
        Source::Lit(v) => Value::literal(lit_width, v),
    }
}

/// The declared width of source `i`, or `default` for literals.
fn src_width(program: &Program, op: &Operation, i: usize, default: u64) -> u64 {
    match op.src(i) {
        Source::Node(h) => program.node(h).width,
        Source::Lit(_) => default,
    }
}

/// Comparison operands share the width of whichever side is a node.
fn cmp_sources(program: &Program, op: &Operation) -> (Value, Value) {
    let cw = src_width(program, op, 0, src_width(program, op, 1, 1));
    (src(program, op, 0, cw), src(program, op, 1, cw))
}
