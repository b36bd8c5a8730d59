//! Locations of the external tool binaries.
//!
//! The pipeline shells out to six executables. They are either resolved
//! as bare names through `PATH`, or rooted in a single directory when the
//! caller ships its own tool bundle (tests point this at a directory of
//! stub scripts).

use std::path::{Path, PathBuf};

const FRONTEND: &str = "dxc";
const ANALYZER: &str = "rga";
const BACKEND: &str = "amdllpc";
const DISASSEMBLER: &str = "llvm-objdump";
const LIVENESS_DISASSEMBLER: &str = "amdgpu-dis";
const LIVENESS_ANALYZER: &str = "shae";

/// Resolved paths of every external binary the pipeline may invoke.
#[derive(Debug, Clone)]
pub struct ToolSet {
    /// Front-end shader compiler (HLSL to SPIR-V).
    pub frontend: PathBuf,
    /// Offline GPU resource analyzer.
    pub analyzer: PathBuf,
    /// Low-level backend compiler (SPIR-V to native ISA).
    pub backend: PathBuf,
    /// General-purpose disassembler used for the human-readable listing.
    pub disassembler: PathBuf,
    /// Plain-format disassembler whose output the liveness analyzer can
    /// actually parse.
    pub liveness_disassembler: PathBuf,
    /// Per-instruction register-liveness analyzer.
    pub liveness_analyzer: PathBuf,
}

impl ToolSet {
    /// Resolve every tool as a bare name through `PATH`.
    pub fn from_path() -> Self {
        ToolSet {
            frontend: PathBuf::from(FRONTEND),
            analyzer: PathBuf::from(ANALYZER),
            backend: PathBuf::from(BACKEND),
            disassembler: PathBuf::from(DISASSEMBLER),
            liveness_disassembler: PathBuf::from(LIVENESS_DISASSEMBLER),
            liveness_analyzer: PathBuf::from(LIVENESS_ANALYZER),
        }
    }

    /// Resolve every tool inside a single directory.
    pub fn from_dir(dir: &Path) -> Self {
        ToolSet {
            frontend: dir.join(FRONTEND),
            analyzer: dir.join(ANALYZER),
            backend: dir.join(BACKEND),
            disassembler: dir.join(DISASSEMBLER),
            liveness_disassembler: dir.join(LIVENESS_DISASSEMBLER),
            liveness_analyzer: dir.join(LIVENESS_ANALYZER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_dir_roots_every_tool() {
        let tools = ToolSet::from_dir(Path::new("/opt/gpu-tools"));
        assert_eq!(tools.frontend, Path::new("/opt/gpu-tools/dxc"));
        assert_eq!(tools.liveness_analyzer, Path::new("/opt/gpu-tools/shae"));
    }
}
