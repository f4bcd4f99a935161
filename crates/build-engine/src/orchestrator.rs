//! Build orchestration state machine.

use std::path::{Path, PathBuf};

use snaplapse_common::error::{SnapError, SnapResult};

use crate::command::{build_encode_command, Codec, DEFAULT_ENCODER};
use crate::runner;
use crate::scanner;
use crate::session::{FrameRate, Session};

/// Callback receiving each aggregated log line as it is appended.
pub type ProgressCallback = Box<dyn Fn(&str) + Send + Sync>;

/// State of a build job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Job created but not started.
    Idle,
    /// Checking preconditions (encoder availability, frame count).
    Validating,
    /// One codec attempt is running.
    Attempting,
    /// An attempt succeeded; the artifact exists.
    Succeeded,
    /// All attempts failed or a precondition was not met.
    Failed,
}

/// One end-to-end build request.
///
/// Drives the attempt list sequentially: stale artifact removal, command
/// construction, subprocess execution, and the retry decision. The
/// aggregated log records every command issued and every diagnostic line
/// emitted, in order, across all attempts; lines are only ever appended.
///
/// A job is terminal once it reaches `Succeeded` or `Failed`; a new build
/// request constructs a new job.
pub struct BuildJob {
    session: Session,
    frame_rate: FrameRate,
    output_path: PathBuf,
    attempts: Vec<Codec>,
    encoder_program: String,
    log: Vec<String>,
    state: BuildState,
}

impl BuildJob {
    /// Create a new build job for the given session.
    pub fn new(session: Session, frame_rate: FrameRate) -> Self {
        let output_path = session.output_path();
        Self {
            session,
            frame_rate,
            output_path,
            attempts: Codec::FALLBACK_ORDER.to_vec(),
            encoder_program: DEFAULT_ENCODER.to_string(),
            log: Vec::new(),
            state: BuildState::Idle,
        }
    }

    /// Override the encoder binary (capability probes and tests).
    pub fn with_encoder_program(mut self, program: impl Into<String>) -> Self {
        self.encoder_program = program.into();
        self
    }

    /// Current job state.
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// The aggregated log so far.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// The output artifact path this job writes to.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Run the build to completion.
    ///
    /// Validates preconditions, then tries each codec in order until one
    /// succeeds or the list is exhausted. Attempts are strictly
    /// sequential; the next codec never starts before the previous
    /// verdict is known. On failure the aggregated log remains on the
    /// job for diagnosis.
    pub async fn run(&mut self, progress: Option<ProgressCallback>) -> SnapResult<PathBuf> {
        if self.state != BuildState::Idle {
            return Err(SnapError::encode("Build job already run"));
        }

        self.state = BuildState::Validating;

        if !runner::encoder_available(&self.encoder_program) {
            self.state = BuildState::Failed;
            return Err(SnapError::unsupported(format!(
                "Encoder '{}' not found in PATH",
                self.encoder_program
            )));
        }

        let frames = match scanner::count_frames(self.session.dir()) {
            Ok(frames) => frames,
            Err(e) => {
                self.state = BuildState::Failed;
                return Err(e);
            }
        };
        if frames == 0 {
            self.state = BuildState::Failed;
            return Err(SnapError::NoFrames {
                path: self.session.dir().to_path_buf(),
            });
        }

        tracing::info!(
            session = %self.session.dir().display(),
            frames,
            fps = %self.frame_rate,
            "Starting timelapse build"
        );

        let attempts = self.attempts.clone();
        for codec in attempts.iter().copied() {
            self.state = BuildState::Attempting;

            if let Err(e) = remove_stale_artifact(&self.output_path) {
                self.state = BuildState::Failed;
                return Err(e);
            }

            let mut cmd =
                build_encode_command(&self.session, self.frame_rate, codec, &self.output_path);
            cmd.program = self.encoder_program.clone();

            self.push_line(format!("$ {}", cmd.shell_line()), progress.as_ref());

            let log = &mut self.log;
            let mut sink = |line: &str| {
                if let Some(cb) = progress.as_ref() {
                    cb(line);
                }
                log.push(line.to_string());
            };
            let ok = runner::run_encoder(&cmd, &mut sink).await;

            if ok {
                self.state = BuildState::Succeeded;
                tracing::info!(
                    codec = %codec,
                    artifact = %self.output_path.display(),
                    "Timelapse build succeeded"
                );
                return Ok(self.output_path.clone());
            }

            tracing::warn!(codec = %codec, "Codec attempt failed");
            self.push_line(
                format!("note: encoding with {codec} failed"),
                progress.as_ref(),
            );
        }

        self.state = BuildState::Failed;
        Err(SnapError::AttemptsExhausted {
            attempts: attempts.len(),
        })
    }

    fn push_line(&mut self, line: String, progress: Option<&ProgressCallback>) {
        if let Some(cb) = progress {
            cb(&line);
        }
        self.log.push(line);
    }
}

/// Remove a leftover artifact from a previous build.
///
/// Absence of a prior file is not an error; any other deletion failure
/// is fatal for the attempt.
fn remove_stale_artifact(path: &Path) -> SnapResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Removed stale artifact");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_session(name: &str, frames: usize) -> Session {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        for i in 1..=frames {
            std::fs::write(dir.join(format!("img_{i:05}.jpg")), b"x").unwrap();
        }
        Session::new(dir)
    }

    fn command_echoes(job: &BuildJob) -> Vec<&String> {
        job.log()
            .iter()
            .filter(|line| line.starts_with("$ "))
            .collect()
    }

    #[cfg(unix)]
    fn fake_encoder(name: &str, script_body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{script_body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    #[tokio::test]
    async fn test_unavailable_encoder_fails_without_attempt() {
        let session = scratch_session("snaplapse_test_job_noencoder", 3);
        let mut job =
            BuildJob::new(session, FrameRate::default()).with_encoder_program("snaplapse-no-bin");

        let err = job.run(None).await.unwrap_err();
        assert!(matches!(err, SnapError::Unsupported { .. }));
        assert_eq!(job.state(), BuildState::Failed);
        assert!(job.log().is_empty());
    }

    #[tokio::test]
    async fn test_empty_session_fails_without_attempt() {
        let session = scratch_session("snaplapse_test_job_empty", 0);
        let mut job = BuildJob::new(session, FrameRate::default()).with_encoder_program("true");

        let err = job.run(None).await.unwrap_err();
        assert!(matches!(err, SnapError::NoFrames { .. }));
        assert_eq!(job.state(), BuildState::Failed);
        assert!(job.log().is_empty());
    }

    #[tokio::test]
    async fn test_missing_session_dir_is_fatal_scan_error() {
        let dir = std::env::temp_dir().join("snaplapse_test_job_missing");
        let _ = std::fs::remove_dir_all(&dir);
        let mut job =
            BuildJob::new(Session::new(dir), FrameRate::default()).with_encoder_program("true");

        let err = job.run(None).await.unwrap_err();
        assert!(matches!(err, SnapError::Io(_)));
        assert_eq!(job.state(), BuildState::Failed);
    }

    #[tokio::test]
    async fn test_primary_success_runs_exactly_one_attempt() {
        let session = scratch_session("snaplapse_test_job_primary", 3);
        let expected = session.output_path();
        let mut job = BuildJob::new(session, FrameRate::new(24)).with_encoder_program("true");

        let artifact = job.run(None).await.unwrap();
        assert_eq!(artifact, expected);
        assert_eq!(job.state(), BuildState::Succeeded);

        let echoes = command_echoes(&job);
        assert_eq!(echoes.len(), 1);
        assert!(echoes[0].contains("libx264"));
        assert!(echoes[0].contains("-framerate 24"));
    }

    #[tokio::test]
    async fn test_exhausted_attempts_returns_no_artifact() {
        let session = scratch_session("snaplapse_test_job_exhaust", 2);
        let mut job = BuildJob::new(session, FrameRate::default()).with_encoder_program("false");

        let err = job.run(None).await.unwrap_err();
        assert!(matches!(err, SnapError::AttemptsExhausted { attempts: 2 }));
        assert_eq!(job.state(), BuildState::Failed);

        let echoes = command_echoes(&job);
        assert_eq!(echoes.len(), 2);
        assert!(echoes[0].contains("libx264"));
        assert!(echoes[1].contains("mpeg4"));
        assert_eq!(
            job.log()
                .iter()
                .filter(|l| l.starts_with("note: "))
                .count(),
            2
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fallback_succeeds_after_primary_failure() {
        let session = scratch_session("snaplapse_test_job_fallback", 2);
        let encoder = fake_encoder(
            "snaplapse_test_fake_enc_fallback.sh",
            "case \"$*\" in *libx264*) echo \"unknown encoder 'libx264'\" >&2; exit 1;; *) exit 0;; esac",
        );
        let expected = session.output_path();
        let mut job = BuildJob::new(session, FrameRate::default()).with_encoder_program(&encoder);

        let artifact = job.run(None).await.unwrap();
        assert_eq!(artifact, expected);
        assert_eq!(job.state(), BuildState::Succeeded);

        // Two command echoes in order, with the failure note and the
        // primary attempt's diagnostics between them.
        let log = job.log();
        let first = log.iter().position(|l| l.starts_with("$ ")).unwrap();
        let second = log.iter().rposition(|l| l.starts_with("$ ")).unwrap();
        assert!(first < second);
        assert!(log[first].contains("libx264"));
        assert!(log[second].contains("mpeg4"));
        assert!(log[first..second]
            .iter()
            .any(|l| l.contains("unknown encoder")));
        assert!(log[first..second]
            .iter()
            .any(|l| l == "note: encoding with libx264 failed"));
        assert_eq!(command_echoes(&job).len(), 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_rebuild_replaces_previous_artifact() {
        let session = scratch_session("snaplapse_test_job_rebuild", 2);
        // Writes a unique token into the output path (last argument).
        let encoder = fake_encoder(
            "snaplapse_test_fake_enc_rebuild.sh",
            "for a; do out=\"$a\"; done\nhead -c 8 /dev/urandom | od -An -tx1 > \"$out\"",
        );

        let mut first = BuildJob::new(session.clone(), FrameRate::default())
            .with_encoder_program(&encoder);
        let artifact = first.run(None).await.unwrap();
        let content_first = std::fs::read(&artifact).unwrap();

        let mut second = BuildJob::new(session, FrameRate::default())
            .with_encoder_program(&encoder);
        let artifact_again = second.run(None).await.unwrap();
        assert_eq!(artifact, artifact_again);

        let content_second = std::fs::read(&artifact_again).unwrap();
        assert_ne!(content_first, content_second);
    }

    #[tokio::test]
    async fn test_stale_artifact_removed_before_attempt() {
        let session = scratch_session("snaplapse_test_job_stale", 2);
        std::fs::write(session.output_path(), b"stale").unwrap();
        // `true` exits successfully without writing the output, so any
        // file left at the path must be the stale one.
        let mut job = BuildJob::new(session.clone(), FrameRate::default())
            .with_encoder_program("true");

        job.run(None).await.unwrap();
        assert!(!session.output_path().exists());
    }

    #[tokio::test]
    async fn test_job_is_not_reusable_after_terminal_state() {
        let session = scratch_session("snaplapse_test_job_reuse", 1);
        let mut job = BuildJob::new(session, FrameRate::default()).with_encoder_program("true");

        job.run(None).await.unwrap();
        let err = job.run(None).await.unwrap_err();
        assert!(matches!(err, SnapError::Encode { .. }));
    }

    #[tokio::test]
    async fn test_progress_callback_sees_every_log_line() {
        use std::sync::{Arc, Mutex};

        let session = scratch_session("snaplapse_test_job_progress", 2);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_cb = seen.clone();
        let progress: ProgressCallback =
            Box::new(move |line| seen_cb.lock().unwrap().push(line.to_string()));

        let mut job = BuildJob::new(session, FrameRate::default()).with_encoder_program("false");
        let _ = job.run(Some(progress)).await;

        assert_eq!(&*seen.lock().unwrap(), job.log());
    }
}
