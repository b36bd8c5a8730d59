//! Resource-usage report parsing and the stats summary.
//!
//! The resource analyzer writes a CSV report with one data row per
//! compiled shader. Only the first data row matters here; the summary
//! keeps the three occupancy-limiting numbers and serializes them as
//! `key:value` lines.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

/// Column names in the analyzer's CSV report.
const COL_VGPRS: &str = "USED_VGPRs";
const COL_SGPRS: &str = "USED_SGPRs";
const COL_LDS: &str = "USED_LDS_BYTES";

/// Register and LDS usage of one compiled shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceUsage {
    /// Vector general-purpose registers used.
    pub vgprs: u32,
    /// Scalar general-purpose registers used.
    pub sgprs: u32,
    /// Local data share consumed, in bytes.
    pub lds_bytes: u32,
}

impl ResourceUsage {
    /// Read the analyzer's CSV report and extract the summary from its
    /// first data row.
    pub fn from_report(path: &Path) -> PipelineResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PipelineError::MissingReport {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(PipelineError::io(format!("reading {}", path.display()), e)),
        };
        parse_report(&text, path)
    }

    /// Serialize as exactly three `key:value` lines, no trailing newline.
    pub fn to_stats_string(&self) -> String {
        format!(
            "VGPRs:{}\nSGPRs:{}\nLDS:{}",
            self.vgprs, self.sgprs, self.lds_bytes
        )
    }

    /// Write the serialized summary to the stats file.
    pub fn write_to(&self, path: &Path) -> PipelineResult<()> {
        fs::write(path, self.to_stats_string())
            .map_err(|e| PipelineError::io(format!("writing {}", path.display()), e))
    }
}

fn parse_report(text: &str, path: &Path) -> PipelineResult<ResourceUsage> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    fn empty(path: &Path) -> PipelineError {
        PipelineError::EmptyReport {
            path: path.to_path_buf(),
        }
    }

    let header: Vec<&str> = lines.next().ok_or_else(|| empty(path))?.split(',').collect();
    // Rows past the first belong to other shader stages; ignore them.
    let row: Vec<&str> = lines.next().ok_or_else(|| empty(path))?.split(',').collect();

    Ok(ResourceUsage {
        vgprs: field(&header, &row, COL_VGPRS)?,
        sgprs: field(&header, &row, COL_SGPRS)?,
        lds_bytes: field(&header, &row, COL_LDS)?,
    })
}

/// Look up one column in a data row and normalize it to an integer.
fn field(header: &[&str], row: &[&str], column: &'static str) -> PipelineResult<u32> {
    let index = header
        .iter()
        .position(|name| name.trim() == column)
        .ok_or(PipelineError::MissingColumn { column })?;
    let raw = row
        .get(index)
        .map(|value| value.trim().trim_matches('"'))
        .unwrap_or("");
    raw.parse().map_err(|_| PipelineError::MalformedField {
        column,
        value: raw.to_string(),
    })
}
