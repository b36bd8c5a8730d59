//! Intermediate artifact paths and their cleanup.
//!
//! Every stage hands its result to the next one through a file with a
//! fixed name under `<workdir>/temp`. The paths are a pure function of
//! the working directory and the GPU target; nothing is derived from the
//! shader itself, so two concurrent runs in one working directory would
//! collide (unsupported).

use std::path::{Path, PathBuf};

use crate::target::GpuTarget;

/// Typed paths for every intermediate artifact of one run.
#[derive(Debug, Clone)]
pub struct ArtifactPlan {
    temp_dir: PathBuf,
    /// Compiled SPIR-V blob written by the front-end compiler.
    pub spirv: PathBuf,
    /// Report path handed to the resource analyzer on its command line.
    pub analysis_requested: PathBuf,
    /// Report path the analyzer actually writes. The tool rewrites the
    /// requested name to embed the GPU identifier and the shader-kind
    /// tag; both names must be tracked for cleanup.
    pub analysis_actual: PathBuf,
    /// Native machine-code binary written by the backend compiler.
    pub native_binary: PathBuf,
    /// Scratch disassembly consumed by the liveness analyzer.
    pub liveness_disassembly: PathBuf,
}

impl ArtifactPlan {
    /// Compute all artifact paths for `workdir`. Performs no I/O.
    pub fn new(workdir: &Path, target: GpuTarget) -> Self {
        let temp_dir = workdir.join("temp");
        ArtifactPlan {
            spirv: temp_dir.join("temp_shader.spv"),
            analysis_requested: temp_dir.join("temp_analysis.txt"),
            analysis_actual: temp_dir.join(format!(
                "{}_temp_analysis_comp.txt",
                target.analysis_id()
            )),
            native_binary: temp_dir.join("temp_shader_binary.bin"),
            liveness_disassembly: temp_dir.join("temp_amd_dissassembly.txt"),
            temp_dir,
        }
    }

    /// Directory holding every intermediate artifact.
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Delete every intermediate artifact that exists. Best-effort: a
    /// missing file is not an error, and deletion failures are logged
    /// and otherwise ignored.
    pub fn cleanup(&self) {
        for path in [
            &self.spirv,
            &self.analysis_requested,
            &self.analysis_actual,
            &self.native_binary,
            &self.liveness_disassembly,
        ] {
            delete_if_exists(path);
        }
    }
}

/// Scope guard that runs [`ArtifactPlan::cleanup`] when dropped, so the
/// artifacts are removed on success and failure paths alike.
pub struct CleanupGuard<'a> {
    plan: &'a ArtifactPlan,
}

impl<'a> CleanupGuard<'a> {
    pub fn new(plan: &'a ArtifactPlan) -> Self {
        CleanupGuard { plan }
    }
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        self.plan.cleanup();
    }
}

/// Remove a file, silently treating an already-absent file as done.
fn delete_if_exists(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => log::debug!("removed {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("could not remove {}: {}", path.display(), e),
    }
}
