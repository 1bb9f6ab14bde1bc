use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use miette::{Context, IntoDiagnostic};

use flollvm_backend_core::BackendRegistry;

/// Converts a Flo file into a drop-in replacement for Chisel's C++
/// emulator
#[derive(Parser)]
#[command(version, about)]
#[command(group(ArgGroup::new("mode").required(true).args(["ir", "header", "compat"])))]
struct Cli {
    /// Input Flo file ('-' reads standard input)
    input: PathBuf,

    /// Generate the LLVM IR module implementing clock_lo
    #[arg(long)]
    ir: bool,

    /// Generate the C++ emulator class header
    #[arg(long)]
    header: bool,

    /// Generate the C++ compatibility layer
    #[arg(long)]
    compat: bool,

    /// Output path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dump the parsed Flo program to stderr before generation
    #[arg(long)]
    emit_flo: bool,
}

impl Cli {
    fn target(&self) -> &'static str {
        if self.ir {
            "ir"
        } else if self.header {
            "header"
        } else {
            "compat"
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

fn build_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register(Box::new(flollvm_backend_ir::IrBackend));
    registry.register(Box::new(flollvm_backend_header::HeaderBackend));
    registry.register(Box::new(flollvm_backend_compat::CompatBackend));
    registry
}

fn run() -> miette::Result<()> {
    env_logger::try_init().ok();

    let cli = Cli::parse();

    // 1. Read the source file, or stdin for '-'.
    let source = if cli.input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .into_diagnostic()
            .wrap_err("failed to read standard input")?;
        buf
    } else {
        std::fs::read_to_string(&cli.input)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read {}", cli.input.display()))?
    };

    // 2. Parse into a circuit program.
    let program = flollvm_flo::parse(&source)
        .map_err(|e| miette::miette!("{e}"))
        .wrap_err("Flo parse failed")?;

    // 3. Optionally dump the program to stderr.
    if cli.emit_flo {
        eprintln!("{}", flollvm_flo::dump_program(&program));
    }

    // 4. Backend dispatch.
    let registry = build_registry();
    let target = cli.target();
    let backend = registry
        .find(target)
        .ok_or_else(|| miette::miette!("unknown target '{target}'"))?;

    let output = backend
        .generate(&program)
        .map_err(|e| miette::miette!("{e}"))
        .wrap_err_with(|| format!("{} generation failed", backend.name()))?;

    // 5. Print diagnostics.
    for diag in &output.diagnostics {
        eprintln!("{diag}");
    }

    // 6. Write the result.
    if let Some(path) = &cli.output {
        for file in &output.files {
            std::fs::write(path, &file.content)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        }
    } else {
        for file in &output.files {
            print!("{}", file.content);
        }
    }

    Ok(())
}
