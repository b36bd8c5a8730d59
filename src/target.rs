//! GPU target selection and per-tool identifier derivation.
//!
//! Each external tool in the chain names the target device in its own
//! scheme: the resource analyzer and the general-purpose disassembler use
//! gfx identifiers, the backend compiler uses a graphics-IP version
//! triple, and the liveness analyzer only distinguishes hardware
//! generations. Deriving all three from one value keeps the stages from
//! silently targeting different devices.

/// Target GPU for a whole pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuTarget {
    /// RDNA2, Navi 21 class. The only target the tool chain is validated
    /// against today.
    #[default]
    Gfx1030,
}

impl GpuTarget {
    /// Identifier understood by the resource analyzer, also passed to the
    /// general-purpose disassembler as its cpu name.
    pub fn analysis_id(self) -> &'static str {
        match self {
            GpuTarget::Gfx1030 => "gfx1030",
        }
    }

    /// Graphics-IP version string in the backend compiler's scheme.
    pub fn backend_gfxip(self) -> &'static str {
        match self {
            GpuTarget::Gfx1030 => "10.3.0",
        }
    }

    /// Hardware-generation tag in the liveness analyzer's scheme.
    pub fn liveness_arch(self) -> &'static str {
        match self {
            GpuTarget::Gfx1030 => "gfx10",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_target_is_gfx1030() {
        assert_eq!(GpuTarget::default(), GpuTarget::Gfx1030);
    }

    #[test]
    fn identifiers_derive_from_one_device() {
        let target = GpuTarget::Gfx1030;
        assert_eq!(target.analysis_id(), "gfx1030");
        assert_eq!(target.backend_gfxip(), "10.3.0");
        assert_eq!(target.liveness_arch(), "gfx10");
    }
}
