//! Encoder subprocess execution.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::command::EncodeCommand;

/// A sink receiving encoder diagnostic lines as they are produced.
pub type LogSink<'a> = &'a mut (dyn FnMut(&str) + Send);

/// Whether the given encoder binary is present on this system.
pub fn encoder_available(program: &str) -> bool {
    std::process::Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {program} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Execute one encoder invocation.
///
/// The encoder's diagnostic stream (stderr for ffmpeg) is consumed
/// line-by-line as it is produced; each non-empty trimmed line is
/// forwarded to the sink immediately so callers can show live progress.
///
/// The verdict comes from the exit status alone. Diagnostic text is
/// informational only; encoder output formats are not a stable
/// contract. A subprocess that fails to start yields the same `false`
/// verdict as one that ran and exited unsuccessfully.
pub async fn run_encoder(cmd: &EncodeCommand, sink: LogSink<'_>) -> bool {
    tracing::debug!(program = %cmd.program, args = ?cmd.args, "Running encoder");

    let mut child = match Command::new(&cmd.program)
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(program = %cmd.program, error = %e, "Encoder failed to start");
            sink(&format!("failed to start {}: {e}", cmd.program));
            return false;
        }
    };

    if let Some(stderr) = child.stderr.take() {
        let mut lines = BufReader::new(stderr).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        sink(trimmed);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed reading encoder diagnostics");
                    break;
                }
            }
        }
    }

    match child.wait().await {
        Ok(status) => {
            tracing::debug!(%status, "Encoder exited");
            status.success()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to wait on encoder");
            false
        }
    }
}
