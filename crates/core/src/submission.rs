//! Submission state machine and the submission collaborator.
//!
//! ```text
//! Idle -> Validating -> Blocked ----------------> Idle
//!                    -> Submitting -> Succeeded -> Idle
//!                    |             -> Failed ----> Idle
//!                    -> Failed (no identity) ----> Idle
//! ```
//!
//! Only `Idle` accepts a new submit. `Blocked`, `Succeeded`, and `Failed` are passed through
//! on the way back to `Idle`, so between calls the machine always rests in `Idle`.

use crate::payload::QuestionSubmission;
use crate::{ComposerError, ComposerResult};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Blocked,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionPhase {
    pub fn can_transition_to(self, next: SubmissionPhase) -> bool {
        use SubmissionPhase::*;

        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Blocked)
                | (Validating, Submitting)
                | (Validating, Failed)
                | (Submitting, Succeeded)
                | (Submitting, Failed)
                | (Blocked, Idle)
                | (Succeeded, Idle)
                | (Failed, Idle)
        )
    }
}

#[derive(Debug)]
pub struct SubmissionMachine {
    phase: SubmissionPhase,
}

impl Default for SubmissionMachine {
    fn default() -> Self {
        Self {
            phase: SubmissionPhase::Idle,
        }
    }
}

impl SubmissionMachine {
    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SubmissionPhase::Idle
    }

    /// Starts a submit. Fails with [`ComposerError::SubmitInProgress`] outside `Idle`.
    pub fn begin(&mut self) -> ComposerResult<()> {
        if !self.is_idle() {
            return Err(ComposerError::SubmitInProgress);
        }
        self.advance(SubmissionPhase::Validating)
    }

    pub fn advance(&mut self, next: SubmissionPhase) -> ComposerResult<()> {
        if !self.phase.can_transition_to(next) {
            return Err(ComposerError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("submission {:?} -> {:?}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Used when an in-flight submit future is dropped before it settles.
    fn abandon(&mut self) {
        if !self.is_idle() {
            tracing::warn!("submission abandoned while {:?}", self.phase);
            self.phase = SubmissionPhase::Idle;
        }
    }
}

/// Holds the machine in `Submitting` across the suspending call.
///
/// If the owning future is dropped before [`InFlight::settle`] runs, the machine goes back
/// to `Idle` and the draft is left as it was.
pub(crate) struct InFlight<'a> {
    machine: &'a mut SubmissionMachine,
    settled: bool,
}

impl<'a> InFlight<'a> {
    pub(crate) fn start(machine: &'a mut SubmissionMachine) -> ComposerResult<Self> {
        machine.advance(SubmissionPhase::Submitting)?;
        Ok(Self {
            machine,
            settled: false,
        })
    }

    pub(crate) fn settle(mut self, outcome: SubmissionPhase) -> ComposerResult<()> {
        self.settled = true;
        self.machine.advance(outcome)?;
        self.machine.advance(SubmissionPhase::Idle)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.machine.abandon();
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("no response within {0:?}")]
    TimedOut(Duration),
    #[error("rejected by server: {0}")]
    Rejected(String),
    #[error("failed to encode submission: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Receives finished questions. Stands in for the backend endpoint.
#[async_trait]
pub trait QuestionSubmitter: Send + Sync {
    async fn submit(&self, submission: &QuestionSubmission) -> Result<(), SubmitError>;
}

/// Simulated send: logs the payload and upload summary, always succeeds.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingSubmitter;

#[async_trait]
impl QuestionSubmitter for LoggingSubmitter {
    async fn submit(&self, submission: &QuestionSubmission) -> Result<(), SubmitError> {
        let payload = serde_json::to_string(&submission.payload)?;
        tracing::info!("submitting question: {}", payload);
        tracing::info!(
            "upload body: {} file part(s), {} bytes encoded, {}",
            submission.upload.parts().len(),
            submission.upload.encode().len(),
            submission.upload.content_type()
        );
        Ok(())
    }
}

/// Runs one submit call, bounded by `timeout`.
pub async fn send_with_timeout(
    submitter: &dyn QuestionSubmitter,
    submission: &QuestionSubmission,
    timeout: Duration,
) -> Result<(), SubmitError> {
    match tokio::time::timeout(timeout, submitter.submit(submission)).await {
        Ok(result) => result,
        Err(_) => Err(SubmitError::TimedOut(timeout)),
    }
}
