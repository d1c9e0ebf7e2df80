//! # Ask-a-Question Core
//!
//! Core logic of the community "ask a question" modal:
//! - the draft question (title, details, tags, staged attachments)
//! - submit-time validation
//! - payload and upload body construction
//! - the submission state machine and its collaborators (identity, submitter, notifier)
//! - the modal controller that ties them together
//!
//! **No transport or rendering concerns**: the submitter, identity provider, and notifier are
//! traits implemented by the host application. Binaries in this workspace wire up the
//! bundled implementations.

pub mod config;
pub mod constants;
pub mod draft;
pub mod error;
pub mod identity;
pub mod modal;
pub mod notify;
pub mod payload;
pub mod submission;
pub mod tags;
pub mod validation;

pub use askq_files::{AttachmentId, AttachmentRules, FileCandidate, StageReport};
pub use askq_types::NonEmptyText;
pub use config::{ClosePolicy, ComposerConfig};
pub use draft::Draft;
pub use error::{ComposerError, ComposerResult};
pub use identity::{Anonymous, Author, IdentityProvider, StaticIdentity};
pub use modal::{ModalController, ModalView, OnClose, SubmitOutcome};
pub use notify::{Notice, NoticeKind, Notifier, TracingNotifier};
pub use payload::{QuestionPayload, QuestionStatus, QuestionSubmission};
pub use submission::{LoggingSubmitter, QuestionSubmitter, SubmissionPhase, SubmitError};
pub use tags::{TagSelection, TagVocabulary};
pub use validation::{Violation, Violations};
