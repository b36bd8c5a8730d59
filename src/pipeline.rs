//! Pipeline orchestration.
//!
//! One run drives four stages, each consuming the previous stage's
//! artifact: front-end compile, resource analysis, backend compile, and
//! a final branch that produces either a plain disassembly or a
//! register-liveness report. Stage arguments are built by pure functions
//! so the branch logic can be tested without spawning anything.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use clap::ValueEnum;

use crate::artifacts::{ArtifactPlan, CleanupGuard};
use crate::error::{PipelineError, PipelineResult};
use crate::report::ResourceUsage;
use crate::runner;
use crate::target::GpuTarget;
use crate::tools::ToolSet;

/// Debug-info embedding mode for the front-end compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DebugInfo {
    /// No debug information at all.
    None,
    /// Vulkan-flavored embedded debug info.
    #[default]
    Vulkan,
    /// Rich (OpenCL-flavored) embedded debug info.
    #[value(name = "opencl")]
    OpenCl,
}

/// One shader compilation request, immutable for the run.
#[derive(Debug, Clone)]
pub struct CompileJob {
    /// Input shader source.
    pub input: PathBuf,
    /// Destination of the final disassembly or liveness report.
    pub output: PathBuf,
    /// Destination of the resource-usage summary.
    pub stats: PathBuf,
    /// Shader entry-point symbol.
    pub entry_point: String,
    /// Debug-info embedding mode.
    pub debug_info: DebugInfo,
    /// Produce a liveness report instead of a plain disassembly.
    pub liveness: bool,
    /// Let the backend derive a descriptor layout on its own. Known to
    /// crash the backend on some inputs, so off unless asked for.
    pub auto_layout_desc: bool,
    /// Target device for every stage.
    pub target: GpuTarget,
}

/// Run the full pipeline for one job.
///
/// Intermediate artifacts live under `<workdir>/temp` and are removed on
/// every exit path, success or failure.
pub fn run(job: &CompileJob, tools: &ToolSet, workdir: &Path) -> PipelineResult<ResourceUsage> {
    let plan = ArtifactPlan::new(workdir, job.target);
    fs::create_dir_all(plan.temp_dir()).map_err(|e| {
        PipelineError::io(format!("creating {}", plan.temp_dir().display()), e)
    })?;
    let _cleanup = CleanupGuard::new(&plan);

    compile_frontend(job, tools, &plan)?;
    let usage = analyze(job, tools, &plan)?;
    compile_backend(job, tools, &plan)?;
    if job.liveness {
        liveness_report(job, tools, &plan)?;
    } else {
        disassemble(job, tools, &plan)?;
    }
    Ok(usage)
}

/// Stage 1: compile the shader source to a SPIR-V blob.
fn compile_frontend(job: &CompileJob, tools: &ToolSet, plan: &ArtifactPlan) -> PipelineResult<()> {
    let mut cmd = Command::new(&tools.frontend);
    cmd.args(frontend_args(job, plan));
    runner::run_captured(&mut cmd)
}

/// Stage 2: offline resource analysis, then stats extraction.
fn analyze(job: &CompileJob, tools: &ToolSet, plan: &ArtifactPlan) -> PipelineResult<ResourceUsage> {
    let mut cmd = Command::new(&tools.analyzer);
    cmd.args(analysis_args(job, plan));
    runner::run_captured(&mut cmd)?;

    // The analyzer rewrites the requested report name, embedding the GPU
    // identifier and shader-kind tag; read the name it actually writes.
    let usage = ResourceUsage::from_report(&plan.analysis_actual)?;
    usage.write_to(&job.stats)?;
    log::info!(
        "resource usage: {} VGPRs, {} SGPRs, {} bytes LDS",
        usage.vgprs,
        usage.sgprs,
        usage.lds_bytes
    );
    Ok(usage)
}

/// Stage 3: lower the SPIR-V blob to a native binary.
fn compile_backend(job: &CompileJob, tools: &ToolSet, plan: &ArtifactPlan) -> PipelineResult<()> {
    let mut cmd = Command::new(&tools.backend);
    cmd.args(backend_args(job, plan));
    runner::run_captured(&mut cmd)
}

/// Stage 4, plain branch: disassemble straight to the output path.
fn disassemble(job: &CompileJob, tools: &ToolSet, plan: &ArtifactPlan) -> PipelineResult<()> {
    let mut cmd = Command::new(&tools.disassembler);
    cmd.args(disassemble_args(job, plan));
    runner::run_redirected(&mut cmd, &job.output)
}

/// Stage 4, liveness branch: plain-format disassembly to a scratch file,
/// then per-instruction liveness analysis over it.
fn liveness_report(job: &CompileJob, tools: &ToolSet, plan: &ArtifactPlan) -> PipelineResult<()> {
    // The general-purpose disassembler's listing is not parseable by the
    // liveness analyzer, so a separate plain disassembly is produced.
    let mut dis = Command::new(&tools.liveness_disassembler);
    dis.arg(&plan.native_binary);
    runner::run_redirected(&mut dis, &plan.liveness_disassembly)?;

    let mut cmd = Command::new(&tools.liveness_analyzer);
    cmd.args(liveness_args(job, plan));
    runner::run_captured(&mut cmd)
}

fn frontend_args(job: &CompileJob, plan: &ArtifactPlan) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-spirv".into(),
        "-T".into(),
        "cs_6_6".into(),
        "-E".into(),
        job.entry_point.clone().into(),
        "-fspv-target-env=vulkan1.3".into(),
        "-WX".into(),
        "-O3".into(),
        "-enable-16bit-types".into(),
        "-HV".into(),
        "2021".into(),
        "-Zpr".into(),
    ];
    match job.debug_info {
        DebugInfo::None => {}
        DebugInfo::Vulkan => {
            args.push("-Zi".into());
            args.push("-fspv-debug=vulkan".into());
        }
        DebugInfo::OpenCl => {
            args.push("-Zi".into());
            args.push("-fspv-debug=rich".into());
        }
    }
    args.push("-Fo".into());
    args.push(plan.spirv.clone().into());
    args.push(job.input.clone().into());
    args
}

fn analysis_args(job: &CompileJob, plan: &ArtifactPlan) -> Vec<OsString> {
    vec![
        "-s".into(),
        "vk-offline".into(),
        "-c".into(),
        job.target.analysis_id().into(),
        "-a".into(),
        plan.analysis_requested.clone().into(),
        "--comp".into(),
        plan.spirv.clone().into(),
    ]
}

fn backend_args(job: &CompileJob, plan: &ArtifactPlan) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        format!("-gfxip={}", job.target.backend_gfxip()).into(),
        "-inline-debug-strings".into(),
        "-trim-debug-info=false".into(),
    ];
    if job.auto_layout_desc {
        args.push("-auto-layout-desc".into());
    }
    args.push("-o".into());
    args.push(plan.native_binary.clone().into());
    args.push(plan.spirv.clone().into());
    args
}

fn disassemble_args(job: &CompileJob, plan: &ArtifactPlan) -> Vec<OsString> {
    vec![
        "-d".into(),
        "--symbolize-operands".into(),
        "--line-numbers".into(),
        "--source".into(),
        format!("--mcpu={}", job.target.analysis_id()).into(),
        plan.native_binary.clone().into(),
    ]
}

fn liveness_args(job: &CompileJob, plan: &ArtifactPlan) -> Vec<OsString> {
    vec![
        "analyse-liveness".into(),
        "--arch".into(),
        job.target.liveness_arch().into(),
        plan.liveness_disassembly.clone().into(),
        job.output.clone().into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(debug_info: DebugInfo) -> CompileJob {
        CompileJob {
            input: PathBuf::from("shader.hlsl"),
            output: PathBuf::from("out.txt"),
            stats: PathBuf::from("stats.txt"),
            entry_point: "main".to_string(),
            debug_info,
            liveness: false,
            auto_layout_desc: false,
            target: GpuTarget::Gfx1030,
        }
    }

    fn plan() -> ArtifactPlan {
        ArtifactPlan::new(Path::new("/work"), GpuTarget::Gfx1030)
    }

    fn has(args: &[OsString], flag: &str) -> bool {
        args.iter().any(|a| a == flag)
    }

    #[test]
    fn debug_info_none_adds_no_debug_flags() {
        let args = frontend_args(&job(DebugInfo::None), &plan());
        assert!(!has(&args, "-Zi"));
        assert!(!args
            .iter()
            .any(|a| a.to_string_lossy().starts_with("-fspv-debug")));
    }

    #[test]
    fn debug_info_flavors_are_mutually_exclusive() {
        let vulkan = frontend_args(&job(DebugInfo::Vulkan), &plan());
        assert!(has(&vulkan, "-Zi"));
        assert!(has(&vulkan, "-fspv-debug=vulkan"));
        assert!(!has(&vulkan, "-fspv-debug=rich"));

        let opencl = frontend_args(&job(DebugInfo::OpenCl), &plan());
        assert!(has(&opencl, "-Zi"));
        assert!(has(&opencl, "-fspv-debug=rich"));
        assert!(!has(&opencl, "-fspv-debug=vulkan"));
    }

    #[test]
    fn frontend_writes_to_the_planned_spirv_path() {
        let args = frontend_args(&job(DebugInfo::None), &plan());
        let fo = args.iter().position(|a| a == "-Fo").unwrap();
        assert_eq!(args[fo + 1], plan().spirv.clone().into_os_string());
        // Input source is the last token.
        assert_eq!(args.last().unwrap(), "shader.hlsl");
    }

    #[test]
    fn analysis_requests_the_planned_report_for_a_compute_shader() {
        let args = analysis_args(&job(DebugInfo::None), &plan());
        assert!(has(&args, "gfx1030"));
        assert!(has(&args, "--comp"));
        let a = args.iter().position(|x| x == "-a").unwrap();
        assert_eq!(args[a + 1], plan().analysis_requested.clone().into_os_string());
    }

    #[test]
    fn auto_layout_desc_is_off_by_default() {
        let mut j = job(DebugInfo::None);
        assert!(!has(&backend_args(&j, &plan()), "-auto-layout-desc"));
        j.auto_layout_desc = true;
        assert!(has(&backend_args(&j, &plan()), "-auto-layout-desc"));
    }

    #[test]
    fn backend_targets_the_gfxip_scheme() {
        let args = backend_args(&job(DebugInfo::None), &plan());
        assert!(has(&args, "-gfxip=10.3.0"));
        assert!(has(&args, "-trim-debug-info=false"));
    }

    #[test]
    fn disassembler_interleaves_source_for_the_analysis_target() {
        let args = disassemble_args(&job(DebugInfo::None), &plan());
        assert!(has(&args, "--symbolize-operands"));
        assert!(has(&args, "--line-numbers"));
        assert!(has(&args, "--source"));
        assert!(has(&args, "--mcpu=gfx1030"));
    }

    #[test]
    fn liveness_analyzer_uses_its_own_arch_scheme() {
        let args = liveness_args(&job(DebugInfo::None), &plan());
        assert!(has(&args, "analyse-liveness"));
        assert!(has(&args, "gfx10"));
        assert_eq!(args.last().unwrap(), "out.txt");
    }
}
