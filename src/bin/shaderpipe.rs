//! Command-line entry point for the shader statistics pipeline.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use shaderpipe::{pipeline, CompileJob, DebugInfo, GpuTarget, ToolSet};

/// Compile a compute shader and report its register usage and disassembly.
#[derive(Parser)]
#[command(name = "shaderpipe", version, about)]
struct Cli {
    /// Path to the input shader source
    #[arg(short, long)]
    input: PathBuf,

    /// Path for the final disassembly or liveness report
    #[arg(short, long)]
    output: PathBuf,

    /// Path for the resource-usage summary
    #[arg(short, long)]
    stats: PathBuf,

    /// Shader entry-point symbol
    #[arg(short, long = "entry_point")]
    entry_point: String,

    /// Debug-info embedding mode
    #[arg(long = "debug_info", value_enum, default_value = "vulkan")]
    debug_info: DebugInfo,

    /// Run register-liveness analysis instead of plain disassembly; any
    /// non-empty value enables it
    #[arg(long)]
    liveness: Option<String>,

    /// Directory holding the external tool binaries (default: PATH lookup)
    #[arg(long)]
    tool_dir: Option<PathBuf>,

    /// Let the backend derive a descriptor layout on its own (crashes the
    /// backend on some inputs)
    #[arg(long)]
    auto_layout_desc: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let tools = match &cli.tool_dir {
        Some(dir) => ToolSet::from_dir(dir),
        None => ToolSet::from_path(),
    };
    let job = CompileJob {
        input: cli.input,
        output: cli.output,
        stats: cli.stats,
        entry_point: cli.entry_point,
        debug_info: cli.debug_info,
        liveness: cli.liveness.as_deref().is_some_and(|v| !v.is_empty()),
        auto_layout_desc: cli.auto_layout_desc,
        target: GpuTarget::default(),
    };

    let workdir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("error: cannot determine working directory: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = pipeline::run(&job, &tools, &workdir) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
