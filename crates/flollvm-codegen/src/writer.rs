//! The textual IR writer.

use crate::error::EmitError;
use crate::inst::Inst;
use crate::sig::FuncSig;
use crate::types::Ty;
use crate::value::Value;

/// Accumulates an LLVM IR module as text.
///
/// The writer owns its output buffer for its whole lifetime;
/// [`LlvmWriter::finish`] releases the finished text. Emission order is
/// exactly call order, so identical call sequences produce
/// byte-identical modules.
#[derive(Debug, Default)]
pub struct LlvmWriter {
    out: String,
}

impl LlvmWriter {
    /// Creates a writer with an empty module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a prototype-only declaration line.
    pub fn declare(&mut self, sig: &FuncSig) {
        self.out
            .push_str(&format!("declare {} @{}(", sig.ret(), sig.name()));
        for (i, arg) in sig.args().iter().enumerate() {
            if i != 0 {
                self.out.push_str(", ");
            }
            self.out.push_str(&arg.to_string());
        }
        self.out.push_str(")\n");
    }

    /// Opens a function body with externally chosen parameter names.
    ///
    /// The name count must equal the signature's arity. The returned
    /// [`Definition`] borrows the writer; call [`Definition::finish`]
    /// to terminate the body.
    pub fn define<'w>(
        &'w mut self,
        sig: &FuncSig,
        arg_names: &[&str],
    ) -> Result<Definition<'w>, EmitError> {
        if sig.args().len() != arg_names.len() {
            return Err(EmitError::ArityMismatch {
                name: sig.name().to_string(),
                expected: sig.args().len(),
                found: arg_names.len(),
            });
        }

        self.out
            .push_str(&format!("define {} @{}(", sig.ret(), sig.name()));
        for (i, (arg, name)) in sig.args().iter().zip(arg_names).enumerate() {
            if i != 0 {
                self.out.push_str(", ");
            }
            self.out.push_str(&format!("{arg} %{name}"));
        }
        self.out.push_str(")\n{\n");

        Ok(Definition {
            writer: self,
            next_temp: 0,
        })
    }

    /// Releases the finished module text.
    pub fn finish(self) -> String {
        self.out
    }
}

/// An open function body.
///
/// Fresh temporaries are numbered by a counter scoped to this
/// definition, so unrelated definitions do not perturb each other's
/// names.
#[derive(Debug)]
pub struct Definition<'w> {
    writer: &'w mut LlvmWriter,
    next_temp: u32,
}

impl Definition<'_> {
    /// Emits a comment line inside the body.
    pub fn comment(&mut self, text: &str) {
        self.writer.out.push_str(&format!("  ; {text}\n"));
    }

    /// Emits one instruction.
    pub fn operate(&mut self, inst: &Inst) {
        self.writer.out.push_str(&format!("  {inst}\n"));
    }

    /// Allocates a fresh SSA temporary of the given type.
    pub fn fresh(&mut self, ty: Ty) -> Value {
        let value = Value::temp(ty, self.next_temp);
        self.next_temp += 1;
        value
    }

    /// Allocates a fresh `Fix(w)` temporary.
    pub fn fresh_fix(&mut self, width: u64) -> Value {
        self.fresh(Ty::Fix(width))
    }

    /// Terminates the body with `ret void` and the closing brace.
    pub fn finish(self) {
        self.writer.out.push_str("  ret void\n}\n\n");
    }
}
