//! Attachment staging for the ask-a-question composer.
//!
//! This crate owns everything that touches file bytes on the way into a question:
//!
//! - [`FileCandidate`]: a file the user picked, not yet accepted
//! - [`AttachmentRules`]: the type and size predicate a candidate must satisfy
//! - [`Attachments`]: the ordered list of staged files bound to a draft
//! - [`UploadBody`]: the `multipart/form-data` body carrying the raw bytes
//! - [`load_candidate`]: reads a candidate from disk and sniffs its media type
//!
//! ## Staging model
//!
//! Candidates are checked once, when they are staged. Accepted candidates are appended in
//! input order and receive their own [`AttachmentId`], so staging the same file twice yields
//! two entries that can be removed independently. Rejected candidates never enter the list;
//! each one is reported back with a [`RejectionReason`].
//!
//! ```
//! use askq_files::{AttachmentRules, Attachments, FileCandidate};
//!
//! let rules = AttachmentRules::default();
//! let mut attachments = Attachments::new();
//! let report = attachments.stage(
//!     &rules,
//!     vec![
//!         FileCandidate::new("scan.png", "image/png", vec![0u8; 128]),
//!         FileCandidate::new("notes.zip", "application/zip", vec![0u8; 128]),
//!     ],
//! );
//!
//! assert_eq!(report.accepted.len(), 1);
//! assert_eq!(report.rejected.len(), 1);
//! assert_eq!(attachments.names(), vec!["scan.png"]);
//! ```

mod constants;
mod files;
mod loader;
mod upload;

pub use constants::{
    ALLOWED_MIME_TYPES, FALLBACK_MIME_TYPE, MAX_ATTACHMENT_BYTES, UPLOAD_FIELD_NAME,
};
pub use files::{
    AttachmentId, AttachmentRules, Attachments, FileCandidate, RejectedFile, RejectionReason,
    StageReport, StagedFile,
};
pub use loader::{detect_mime_type, load_candidate};
pub use upload::{UploadBody, UploadPart};

/// Errors that can occur while reading candidate files
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Path does not name a regular file
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
