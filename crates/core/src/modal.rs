//! The ask-a-question modal controller.
//!
//! The controller owns the live [`Draft`] and wires together validation, payload building,
//! identity, and the submission collaborator. Visibility is not stored here: the owner passes
//! `is_open` to [`ModalController::render`] and is told to dismiss the modal through the
//! `on_close` callback.

use crate::config::{ClosePolicy, ComposerConfig};
use crate::constants::{MISSING_IDENTITY_MESSAGE, SUBMIT_FAILURE_MESSAGE, SUBMIT_SUCCESS_MESSAGE};
use crate::draft::Draft;
use crate::identity::IdentityProvider;
use crate::notify::{Notice, NoticeKind, Notifier};
use crate::payload::{build_submission, QuestionPayload};
use crate::submission::{
    send_with_timeout, InFlight, QuestionSubmitter, SubmissionMachine, SubmissionPhase,
};
use crate::validation::{validate, Violations};
use crate::{ComposerError, ComposerResult};
use askq_files::{AttachmentId, FileCandidate, StageReport};
use chrono::Utc;
use std::sync::Arc;

/// Callback telling the owner to dismiss the modal.
pub type OnClose = Box<dyn FnMut() + Send>;

/// Result of one submit attempt that reached a decision.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Sent. The draft has been reset and `on_close` invoked.
    Submitted(QuestionPayload),
    /// Stopped by validation. The draft is unchanged.
    Blocked(Violations),
    /// Missing identity or a failed send. The draft is unchanged.
    Failed(ComposerError),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagChip<'a> {
    pub label: &'a str,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentRow<'a> {
    pub id: AttachmentId,
    pub name: &'a str,
    pub size_bytes: u64,
}

/// Snapshot of the form for rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalView<'a> {
    pub title: &'a str,
    /// e.g. `22/200`
    pub title_counter: String,
    pub details: &'a str,
    pub details_counter: String,
    /// Every vocabulary tag, in vocabulary order.
    pub tags: Vec<TagChip<'a>>,
    pub attachments: Vec<AttachmentRow<'a>>,
    /// File picker filter, e.g. `image/jpeg,image/png,application/pdf`.
    pub accept: String,
    pub submit_enabled: bool,
}

pub struct ModalController {
    config: Arc<ComposerConfig>,
    draft: Draft,
    machine: SubmissionMachine,
    identity: Arc<dyn IdentityProvider>,
    submitter: Arc<dyn QuestionSubmitter>,
    notifier: Arc<dyn Notifier>,
    on_close: OnClose,
}

impl ModalController {
    pub fn new(
        config: Arc<ComposerConfig>,
        identity: Arc<dyn IdentityProvider>,
        submitter: Arc<dyn QuestionSubmitter>,
        notifier: Arc<dyn Notifier>,
        on_close: OnClose,
    ) -> Self {
        Self {
            config,
            draft: Draft::new(),
            machine: SubmissionMachine::default(),
            identity,
            submitter,
            notifier,
            on_close,
        }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.machine.phase()
    }

    /// The submit trigger is only enabled while no submission is running.
    pub fn can_submit(&self) -> bool {
        self.machine.is_idle()
    }

    /// Returns `None` while the modal is closed.
    pub fn render(&self, is_open: bool) -> Option<ModalView<'_>> {
        if !is_open {
            return None;
        }

        let vocabulary = self.config.vocabulary();
        Some(ModalView {
            title: self.draft.title(),
            title_counter: format!(
                "{}/{}",
                self.draft.title().chars().count(),
                self.config.title_max_chars()
            ),
            details: self.draft.details(),
            details_counter: format!(
                "{}/{}",
                self.draft.details().chars().count(),
                self.config.details_max_chars()
            ),
            tags: vocabulary
                .iter()
                .map(|label| TagChip {
                    label,
                    selected: self.draft.tags().contains(label),
                })
                .collect(),
            attachments: self
                .draft
                .attachments()
                .iter()
                .map(|f| AttachmentRow {
                    id: f.id(),
                    name: f.name(),
                    size_bytes: f.size(),
                })
                .collect(),
            accept: self.config.attachment_rules().accept_filter(),
            submit_enabled: self.can_submit(),
        })
    }

    pub fn set_title(&mut self, value: &str) {
        self.draft.set_title(value, self.config.title_max_chars());
    }

    pub fn set_details(&mut self, value: &str) {
        self.draft.set_details(value, self.config.details_max_chars());
    }

    /// Returns whether the tag is selected afterwards.
    pub fn toggle_tag(&mut self, tag: &str) -> ComposerResult<bool> {
        self.draft.toggle_tag(self.config.vocabulary(), tag)
    }

    /// Stages candidates and raises one notice per rejected file.
    pub fn stage_files(
        &mut self,
        candidates: impl IntoIterator<Item = FileCandidate>,
    ) -> StageReport {
        let report = self
            .draft
            .stage_files(self.config.attachment_rules(), candidates);

        for rejected in &report.rejected {
            self.notifier.notify(&Notice::new(
                NoticeKind::FileRejected,
                format!("{} was not attached: {}", rejected.name, rejected.reason),
            ));
        }

        report
    }

    pub fn remove_file(&mut self, id: AttachmentId) -> bool {
        self.draft.remove_file(id)
    }

    /// Dismisses the modal without submitting.
    pub fn cancel(&mut self) {
        if self.config.close_policy() == ClosePolicy::Reset {
            self.draft.reset();
        }
        tracing::debug!("ask-question modal cancelled");
        (self.on_close)();
    }

    /// Validates, builds, and sends the draft.
    ///
    /// Failures are reported through the notifier and returned as a [`SubmitOutcome`].
    /// The only `Err` is [`ComposerError::SubmitInProgress`] (or a state machine fault).
    pub async fn submit(&mut self) -> ComposerResult<SubmitOutcome> {
        self.machine.begin()?;

        let violations = validate(&self.draft, self.config.title_min_chars());
        if !violations.is_empty() {
            self.machine.advance(SubmissionPhase::Blocked)?;
            tracing::info!("submit blocked by {} violation(s)", violations.len());
            self.notifier
                .notify(&Notice::new(NoticeKind::Blocked, violations.to_string()));
            self.machine.advance(SubmissionPhase::Idle)?;
            return Ok(SubmitOutcome::Blocked(violations));
        }

        let Some(author) = self.identity.current_author() else {
            self.machine.advance(SubmissionPhase::Failed)?;
            tracing::warn!("submit refused: no signed-in author");
            self.notifier
                .notify(&Notice::new(NoticeKind::Failure, MISSING_IDENTITY_MESSAGE));
            self.machine.advance(SubmissionPhase::Idle)?;
            return Ok(SubmitOutcome::Failed(ComposerError::MissingIdentity));
        };

        let submission = build_submission(
            &self.draft,
            self.config.vocabulary(),
            author,
            Utc::now(),
        );

        let in_flight = InFlight::start(&mut self.machine)?;
        tracing::info!(
            "submitting question with {} tag(s) and {} attachment(s)",
            submission.payload.tags.len(),
            submission.upload.parts().len()
        );
        let result = send_with_timeout(
            self.submitter.as_ref(),
            &submission,
            self.config.submit_timeout(),
        )
        .await;

        match result {
            Ok(()) => {
                in_flight.settle(SubmissionPhase::Succeeded)?;
                self.draft.reset();
                (self.on_close)();
                self.notifier
                    .notify(&Notice::new(NoticeKind::Success, SUBMIT_SUCCESS_MESSAGE));
                Ok(SubmitOutcome::Submitted(submission.payload))
            }
            Err(err) => {
                in_flight.settle(SubmissionPhase::Failed)?;
                tracing::error!("question submission error: {}", err);
                self.notifier
                    .notify(&Notice::new(NoticeKind::Failure, SUBMIT_FAILURE_MESSAGE));
                Ok(SubmitOutcome::Failed(ComposerError::Submit(err)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Anonymous, Author, StaticIdentity};
    use crate::payload::QuestionSubmission;
    use crate::submission::{LoggingSubmitter, SubmitError};
    use crate::validation::Violation;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingNotifier(Mutex<Vec<Notice>>);

    impl RecordingNotifier {
        fn kinds(&self) -> Vec<NoticeKind> {
            self.0.lock().unwrap().iter().map(|n| n.kind).collect()
        }

        fn last(&self) -> Option<Notice> {
            self.0.lock().unwrap().last().cloned()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: &Notice) {
            self.0.lock().unwrap().push(notice.clone());
        }
    }

    struct FailingSubmitter;

    #[async_trait]
    impl QuestionSubmitter for FailingSubmitter {
        async fn submit(&self, _submission: &QuestionSubmission) -> Result<(), SubmitError> {
            Err(SubmitError::Rejected("service unavailable".into()))
        }
    }

    struct Stalled;

    #[async_trait]
    impl QuestionSubmitter for Stalled {
        async fn submit(&self, _submission: &QuestionSubmission) -> Result<(), SubmitError> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    struct Harness {
        modal: ModalController,
        notifier: Arc<RecordingNotifier>,
        closed: Arc<AtomicUsize>,
    }

    fn harness_with(
        config: ComposerConfig,
        identity: Arc<dyn IdentityProvider>,
        submitter: Arc<dyn QuestionSubmitter>,
    ) -> Harness {
        let notifier = Arc::new(RecordingNotifier::default());
        let closed = Arc::new(AtomicUsize::new(0));
        let closed_count = Arc::clone(&closed);
        let modal = ModalController::new(
            Arc::new(config),
            identity,
            submitter,
            notifier.clone(),
            Box::new(move || {
                closed_count.fetch_add(1, Ordering::SeqCst);
            }),
        );
        Harness {
            modal,
            notifier,
            closed,
        }
    }

    fn harness(submitter: Arc<dyn QuestionSubmitter>) -> Harness {
        harness_with(
            ComposerConfig::default(),
            Arc::new(StaticIdentity::new(Author::new("u-7", "Riley Chen").unwrap())),
            submitter,
        )
    }

    fn fill_valid(modal: &mut ModalController) {
        modal.set_title("Is aspirin safe daily?");
        modal.toggle_tag("Healthcare").unwrap();
    }

    #[test]
    fn render_is_none_while_closed() {
        let h = harness(Arc::new(LoggingSubmitter));
        assert!(h.modal.render(false).is_none());
    }

    #[test]
    fn render_shows_counters_and_tags_in_vocabulary_order() {
        let mut h = harness(Arc::new(LoggingSubmitter));
        h.modal.set_title("Is aspirin safe daily?");
        h.modal.set_details("Asking for my father.");
        h.modal.toggle_tag("Nutrition").unwrap();

        let view = h.modal.render(true).unwrap();
        assert_eq!(view.title_counter, "22/200");
        assert_eq!(view.details_counter, "21/1000");
        assert_eq!(view.tags.len(), 6);
        assert_eq!(view.tags[0].label, "Healthcare");
        assert!(!view.tags[0].selected);
        assert!(view.tags[3].selected);
        assert_eq!(view.accept, "image/jpeg,image/png,application/pdf");
        assert!(view.submit_enabled);
    }

    #[test]
    fn rejected_files_raise_notices() {
        let mut h = harness(Arc::new(LoggingSubmitter));
        let report = h.modal.stage_files(vec![
            FileCandidate::new("archive.zip", "application/zip", vec![0u8; 4]),
            FileCandidate::new("scan.png", "image/png", vec![0u8; 4]),
        ]);

        assert_eq!(report.accepted.len(), 1);
        assert_eq!(h.notifier.kinds(), vec![NoticeKind::FileRejected]);
        assert!(h
            .notifier
            .last()
            .unwrap()
            .message
            .starts_with("archive.zip was not attached"));

        let view = h.modal.render(true).unwrap();
        assert_eq!(view.attachments.len(), 1);
        assert_eq!(view.attachments[0].name, "scan.png");
    }

    #[test]
    fn remove_file_drops_only_that_attachment() {
        let mut h = harness(Arc::new(LoggingSubmitter));
        let report = h.modal.stage_files(vec![
            FileCandidate::new("scan.png", "image/png", vec![1u8; 4]),
            FileCandidate::new("scan.png", "image/png", vec![1u8; 4]),
        ]);
        assert_eq!(report.accepted.len(), 2);

        assert!(h.modal.remove_file(report.accepted[0]));
        assert!(!h.modal.remove_file(report.accepted[0]));

        let view = h.modal.render(true).unwrap();
        assert_eq!(view.attachments.len(), 1);
        let remaining = h.modal.draft().attachments().iter().next().unwrap();
        assert_eq!(remaining.id(), report.accepted[1]);
    }

    #[test]
    fn cancel_preserves_draft_by_default() {
        let mut h = harness(Arc::new(LoggingSubmitter));
        h.modal.set_title("Half-written question");
        h.modal.cancel();

        assert_eq!(h.closed.load(Ordering::SeqCst), 1);
        assert_eq!(h.modal.draft().title(), "Half-written question");
    }

    #[test]
    fn cancel_resets_draft_under_reset_policy() {
        let mut h = harness_with(
            ComposerConfig::default().with_close_policy(ClosePolicy::Reset),
            Arc::new(StaticIdentity::new(Author::new("u-7", "Riley Chen").unwrap())),
            Arc::new(LoggingSubmitter),
        );
        h.modal.set_title("Half-written question");
        h.modal.cancel();

        assert_eq!(h.closed.load(Ordering::SeqCst), 1);
        assert!(h.modal.draft().is_empty());
    }

    #[tokio::test]
    async fn successful_submit_resets_and_closes_once() {
        let mut h = harness(Arc::new(LoggingSubmitter));
        fill_valid(&mut h.modal);

        let outcome = h.modal.submit().await.unwrap();
        let SubmitOutcome::Submitted(payload) = outcome else {
            panic!("expected submitted outcome");
        };
        assert_eq!(payload.title, "Is aspirin safe daily?");
        assert_eq!(payload.author.name.as_str(), "Riley Chen");

        assert!(h.modal.draft().is_empty());
        assert_eq!(h.closed.load(Ordering::SeqCst), 1);
        assert_eq!(h.notifier.kinds(), vec![NoticeKind::Success]);
        assert_eq!(h.notifier.last().unwrap().message, SUBMIT_SUCCESS_MESSAGE);
        assert_eq!(h.modal.phase(), SubmissionPhase::Idle);
    }

    #[tokio::test]
    async fn blocked_submit_keeps_draft_and_stays_open() {
        let mut h = harness(Arc::new(LoggingSubmitter));
        h.modal.set_title("Hi");
        let before = h.modal.draft().clone();

        let outcome = h.modal.submit().await.unwrap();
        let SubmitOutcome::Blocked(violations) = outcome else {
            panic!("expected blocked outcome");
        };
        assert!(violations.contains(&Violation::TitleTooShort { min_chars: 10 }));
        assert!(violations.contains(&Violation::NoTagSelected));

        let notice = h.notifier.last().unwrap();
        assert_eq!(notice.kind, NoticeKind::Blocked);
        assert!(notice.message.contains("Question title must be at least 10 characters"));
        assert!(notice.message.contains("Please select at least one tag"));

        assert_eq!(h.modal.draft(), &before);
        assert_eq!(h.closed.load(Ordering::SeqCst), 0);
        assert!(h.modal.can_submit());
    }

    #[tokio::test]
    async fn failed_submit_preserves_draft() {
        let mut h = harness(Arc::new(FailingSubmitter));
        fill_valid(&mut h.modal);
        let before = h.modal.draft().clone();

        let outcome = h.modal.submit().await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Failed(ComposerError::Submit(SubmitError::Rejected(_)))
        ));
        assert_eq!(h.modal.draft(), &before);
        assert_eq!(h.closed.load(Ordering::SeqCst), 0);
        assert_eq!(h.notifier.last().unwrap().message, SUBMIT_FAILURE_MESSAGE);
        assert!(h.modal.can_submit());
    }

    #[tokio::test]
    async fn missing_identity_fails_closed() {
        let mut h = harness_with(
            ComposerConfig::default(),
            Arc::new(Anonymous),
            Arc::new(LoggingSubmitter),
        );
        fill_valid(&mut h.modal);

        let outcome = h.modal.submit().await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Failed(ComposerError::MissingIdentity)
        ));
        assert_eq!(h.notifier.last().unwrap().message, MISSING_IDENTITY_MESSAGE);
        assert_eq!(h.modal.draft().title(), "Is aspirin safe daily?");
        assert_eq!(h.closed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_submit_times_out_and_keeps_draft() {
        let mut h = harness_with(
            ComposerConfig::default().with_submit_timeout(Duration::from_secs(5)),
            Arc::new(StaticIdentity::new(Author::new("u-7", "Riley Chen").unwrap())),
            Arc::new(Stalled),
        );
        fill_valid(&mut h.modal);

        let outcome = h.modal.submit().await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Failed(ComposerError::Submit(SubmitError::TimedOut(_)))
        ));
        assert!(!h.modal.draft().is_empty());
        assert!(h.modal.can_submit());
    }

    #[tokio::test]
    async fn dropped_submit_returns_to_idle() {
        let mut h = harness(Arc::new(Stalled));
        fill_valid(&mut h.modal);

        {
            let fut = h.modal.submit();
            tokio::pin!(fut);
            let polled = poll_once(fut.as_mut()).await;
            assert!(polled.is_none());
        }

        assert!(h.modal.can_submit());
        assert_eq!(h.modal.draft().title(), "Is aspirin safe daily?");
    }

    async fn poll_once<F: std::future::Future + Unpin>(fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            out = fut => Some(out),
            _ = std::future::ready(()) => None,
        }
    }
}
