//! Synchronous invocation of external tools.
//!
//! Each stage blocks on its process until it exits. The invoked command
//! line is echoed to the console, and in captured mode both output
//! streams are echoed in full afterwards; that text is the primary
//! debugging signal when a stage misbehaves. Exit status is surfaced
//! explicitly instead of leaving failures for downstream stages to
//! discover through missing files.

use std::fs::File;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use crate::error::{PipelineError, PipelineResult};

/// Run a tool to completion, capturing and echoing stdout and stderr.
pub fn run_captured(cmd: &mut Command) -> PipelineResult<()> {
    println!("{}", render(cmd));
    let output = cmd.output().map_err(|source| PipelineError::ToolLaunch {
        tool: tool_name(cmd),
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.is_empty() {
        print!("{stdout}");
    }
    if !stderr.is_empty() {
        eprint!("{stderr}");
    }
    check_status(cmd, output.status, &stderr)
}

/// Run a tool to completion with its stdout streamed into `target`.
///
/// Nothing is captured from stdout; stderr is still captured and echoed.
pub fn run_redirected(cmd: &mut Command, target: &Path) -> PipelineResult<()> {
    println!("{} > {}", render(cmd), target.display());
    let file = File::create(target)
        .map_err(|e| PipelineError::io(format!("creating {}", target.display()), e))?;
    let output = cmd
        .stdout(Stdio::from(file))
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| PipelineError::ToolLaunch {
            tool: tool_name(cmd),
            source,
        })?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        eprint!("{stderr}");
    }
    check_status(cmd, output.status, &stderr)
}

fn check_status(cmd: &Command, status: ExitStatus, stderr: &str) -> PipelineResult<()> {
    if status.success() {
        Ok(())
    } else {
        Err(PipelineError::ToolFailed {
            tool: tool_name(cmd),
            status,
            stderr: stderr.trim().to_string(),
        })
    }
}

/// Short tool name for diagnostics, without directory or extension.
fn tool_name(cmd: &Command) -> String {
    Path::new(cmd.get_program())
        .file_stem()
        .unwrap_or(cmd.get_program())
        .to_string_lossy()
        .into_owned()
}

/// Render the command line the way it would be typed in a shell.
fn render(cmd: &Command) -> String {
    let mut line = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn captured_run_succeeds_on_zero_exit() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo hello"]);
        assert!(run_captured(&mut cmd).is_ok());
    }

    #[test]
    fn captured_run_reports_nonzero_exit() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo broken >&2; exit 3"]);
        match run_captured(&mut cmd) {
            Err(PipelineError::ToolFailed { tool, stderr, .. }) => {
                assert_eq!(tool, "sh");
                assert_eq!(stderr, "broken");
            }
            other => panic!("expected ToolFailed, got {other:?}"),
        }
    }

    #[test]
    fn launch_failure_names_the_tool() {
        let mut cmd = Command::new("/nonexistent/tool-binary");
        match run_captured(&mut cmd) {
            Err(PipelineError::ToolLaunch { tool, .. }) => {
                assert_eq!(tool, "tool-binary");
            }
            other => panic!("expected ToolLaunch, got {other:?}"),
        }
    }

    #[test]
    fn redirected_run_streams_stdout_to_the_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("listing.txt");
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo line1; echo line2"]);
        run_redirected(&mut cmd, &target).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "line1\nline2\n");
    }
}
