//! Per-request conversion session state.
//!
//! The UI's state — current upload, current settings, current result — is
//! held in an explicit [`Session`] threaded through the request handler, with
//! the transitions below, rather than in globals:
//!
//! ```text
//! Idle → Uploading → ConfiguringParameters → Converting
//!                                              ├─▶ Succeeded(artifact) ─▶ Idle
//!                                              └─▶ Failed(error)       ─▶ Idle
//! ```
//!
//! One HTTP request drives one full traversal. Re-entering `Converting`
//! discards any prior artifact.

use crate::error::Pdf2ZipError;
use crate::output::ArchiveArtifact;

/// Where a conversion session currently stands.
#[derive(Debug)]
pub enum SessionState {
    /// Nothing in flight.
    Idle,
    /// Upload bytes are being received.
    Uploading,
    /// Upload complete; parameters being read.
    ConfiguringParameters,
    /// The pipeline is running.
    Converting,
    /// Conversion finished; the artifact is ready for download.
    Succeeded(ArchiveArtifact),
    /// Conversion failed; the job is abandoned.
    Failed(Pdf2ZipError),
}

/// A single user conversion session.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// An upload has started arriving.
    pub fn begin_upload(&mut self) {
        self.state = SessionState::Uploading;
    }

    /// Upload received in full; parameters are being read.
    pub fn configure(&mut self) {
        self.state = SessionState::ConfiguringParameters;
    }

    /// The pipeline is starting. Any prior artifact is discarded here.
    pub fn begin_conversion(&mut self) {
        self.state = SessionState::Converting;
    }

    /// The pipeline produced an artifact.
    pub fn succeed(&mut self, artifact: ArchiveArtifact) {
        self.state = SessionState::Succeeded(artifact);
    }

    /// The pipeline failed; the job is abandoned.
    pub fn fail(&mut self, error: Pdf2ZipError) {
        self.state = SessionState::Failed(error);
    }

    /// Return to `Idle`, dropping whatever the session held.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Consume the session, yielding the artifact or the failure.
    ///
    /// Calling this in a non-terminal state is a bug in the driver.
    pub fn finish(self) -> Result<ArchiveArtifact, Pdf2ZipError> {
        match self.state {
            SessionState::Succeeded(artifact) => Ok(artifact),
            SessionState::Failed(error) => Err(error),
            other => Err(Pdf2ZipError::Internal(format!(
                "Session finished in non-terminal state {other:?}"
            ))),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(tag: &[u8]) -> ArchiveArtifact {
        ArchiveArtifact::new(tag.to_vec())
    }

    #[test]
    fn full_traversal_succeeds() {
        let mut s = Session::new();
        assert!(matches!(s.state(), SessionState::Idle));
        s.begin_upload();
        s.configure();
        s.begin_conversion();
        assert!(matches!(s.state(), SessionState::Converting));
        s.succeed(artifact(b"zip"));
        let artifact = s.finish().unwrap();
        assert_eq!(artifact.bytes, b"zip");
    }

    #[test]
    fn failure_is_terminal_and_carries_the_error() {
        let mut s = Session::new();
        s.begin_upload();
        s.configure();
        s.begin_conversion();
        s.fail(Pdf2ZipError::RasterizationFailed {
            status: Some(1),
            stderr: "boom".into(),
        });
        let err = s.finish().unwrap_err();
        assert!(matches!(err, Pdf2ZipError::RasterizationFailed { .. }));
    }

    #[test]
    fn reentering_converting_discards_prior_artifact() {
        let mut s = Session::new();
        s.begin_conversion();
        s.succeed(artifact(b"old"));
        s.begin_conversion();
        assert!(matches!(s.state(), SessionState::Converting));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut s = Session::new();
        s.begin_conversion();
        s.succeed(artifact(b"zip"));
        s.reset();
        assert!(matches!(s.state(), SessionState::Idle));
    }
}
