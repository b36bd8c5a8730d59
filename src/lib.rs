//! shaderpipe - compute-shader register statistics and disassembly.
//!
//! Drives a single compute shader through a fixed chain of external
//! tools (front-end compiler, offline resource analyzer, low-level
//! backend compiler, disassembly/liveness tooling), producing a
//! register-usage summary and either a disassembly listing or a
//! register-liveness report for a target AMD GPU.
//!
//! # Primary Usage
//!
//! ```ignore
//! use shaderpipe::{pipeline, CompileJob, DebugInfo, GpuTarget, ToolSet};
//!
//! let job = CompileJob {
//!     input: "shader.hlsl".into(),
//!     output: "shader.isa".into(),
//!     stats: "shader.stats".into(),
//!     entry_point: "main".into(),
//!     debug_info: DebugInfo::Vulkan,
//!     liveness: false,
//!     auto_layout_desc: false,
//!     target: GpuTarget::default(),
//! };
//! let usage = pipeline::run(&job, &ToolSet::from_path(), &std::env::current_dir()?)?;
//! ```
//!
//! # Architecture
//!
//! - [`pipeline`] - stage sequencing and branch selection
//! - [`artifacts`] - intermediate artifact paths and their cleanup
//! - [`runner`] - synchronous external process invocation
//! - [`report`] - analysis-report parsing and the stats summary
//! - [`target`] - per-tool GPU identifier derivation
//! - [`tools`] - locations of the external binaries

pub mod artifacts;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod target;
pub mod tools;

pub use artifacts::{ArtifactPlan, CleanupGuard};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{CompileJob, DebugInfo};
pub use report::ResourceUsage;
pub use target::GpuTarget;
pub use tools::ToolSet;
