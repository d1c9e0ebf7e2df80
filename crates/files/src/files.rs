//! Candidate files, the staging predicate, and the staged attachment list.
//!
//! # Ownership of bytes
//!
//! File contents are held as `Arc<[u8]>`. A staged file, the candidate it came from, and any
//! [`UploadBody`] built from the list all share one allocation, and the bytes are released
//! when the last of them is dropped (normally when the draft is reset).

use crate::constants::{ALLOWED_MIME_TYPES, MAX_ATTACHMENT_BYTES};
use crate::upload::UploadBody;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A file offered for attachment but not yet checked.
#[derive(Clone, PartialEq, Eq)]
pub struct FileCandidate {
    name: String,
    mime_type: String,
    contents: Arc<[u8]>,
}

impl FileCandidate {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        contents: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            contents: contents.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Size of the contents in bytes.
    pub fn size(&self) -> u64 {
        self.contents.len() as u64
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }
}

// Contents are left out so a 5 MiB file does not end up in a log line.
impl fmt::Debug for FileCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCandidate")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size())
            .finish()
    }
}

/// Identifier of one staged entry.
///
/// Two stagings of the same file get two different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentId(Uuid);

impl AttachmentId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// A candidate that passed [`AttachmentRules::check`] and is bound to a draft.
#[derive(Clone, PartialEq, Eq)]
pub struct StagedFile {
    id: AttachmentId,
    file: FileCandidate,
}

impl StagedFile {
    pub fn id(&self) -> AttachmentId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.file.name()
    }

    pub fn mime_type(&self) -> &str {
        self.file.mime_type()
    }

    pub fn size(&self) -> u64 {
        self.file.size()
    }

    pub fn contents(&self) -> &[u8] {
        self.file.contents()
    }

    pub(crate) fn shared_contents(&self) -> Arc<[u8]> {
        Arc::clone(&self.file.contents)
    }
}

impl fmt::Debug for StagedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedFile")
            .field("id", &self.id)
            .field("name", &self.file.name)
            .field("mime_type", &self.file.mime_type)
            .field("size", &self.file.size())
            .finish()
    }
}

/// Why a candidate was not staged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    #[error("unsupported file type '{mime_type}'")]
    UnsupportedType { mime_type: String },
    #[error("file is {size_bytes} bytes, larger than the {max_bytes} byte limit")]
    TooLarge { size_bytes: u64, max_bytes: u64 },
}

/// A candidate that was dropped during staging, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFile {
    pub name: String,
    pub reason: RejectionReason,
}

impl fmt::Display for RejectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

/// Outcome of one [`Attachments::stage`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Ids of the accepted candidates, in input order.
    pub accepted: Vec<AttachmentId>,
    pub rejected: Vec<RejectedFile>,
}

/// Type and size predicate applied to every candidate at stage time.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttachmentRules {
    pub allowed_mime_types: Vec<String>,
    pub max_size_bytes: u64,
}

impl Default for AttachmentRules {
    fn default() -> Self {
        Self {
            allowed_mime_types: ALLOWED_MIME_TYPES.iter().map(|m| (*m).to_owned()).collect(),
            max_size_bytes: MAX_ATTACHMENT_BYTES,
        }
    }
}

impl AttachmentRules {
    /// Checks a candidate against the rules.
    ///
    /// Types must match an allowed entry exactly, so every staged file carries one of the
    /// allowed spellings. The type check runs first, so a file that is both the wrong type and too large is
    /// reported as the wrong type.
    pub fn check(&self, candidate: &FileCandidate) -> Result<(), RejectionReason> {
        let allowed = self
            .allowed_mime_types
            .iter()
            .any(|m| m == candidate.mime_type());
        if !allowed {
            return Err(RejectionReason::UnsupportedType {
                mime_type: candidate.mime_type().to_owned(),
            });
        }

        if candidate.size() > self.max_size_bytes {
            return Err(RejectionReason::TooLarge {
                size_bytes: candidate.size(),
                max_bytes: self.max_size_bytes,
            });
        }

        Ok(())
    }

    /// Comma-separated list of allowed types, suitable for a file picker `accept` filter.
    pub fn accept_filter(&self) -> String {
        self.allowed_mime_types.join(",")
    }
}

/// Ordered list of staged files belonging to a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachments {
    entries: Vec<StagedFile>,
}

impl Attachments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages candidates against `rules`.
    ///
    /// Accepted candidates are appended in input order. Rejected candidates are not kept;
    /// they only appear in the returned report.
    pub fn stage(
        &mut self,
        rules: &AttachmentRules,
        candidates: impl IntoIterator<Item = FileCandidate>,
    ) -> StageReport {
        let mut report = StageReport::default();

        for candidate in candidates {
            match rules.check(&candidate) {
                Ok(()) => {
                    let id = AttachmentId::new();
                    tracing::debug!(
                        "staged attachment {} ({}, {} bytes)",
                        candidate.name(),
                        candidate.mime_type(),
                        candidate.size()
                    );
                    self.entries.push(StagedFile {
                        id,
                        file: candidate,
                    });
                    report.accepted.push(id);
                }
                Err(reason) => {
                    tracing::warn!("rejected attachment {}: {}", candidate.name(), reason);
                    report.rejected.push(RejectedFile {
                        name: candidate.name,
                        reason,
                    });
                }
            }
        }

        report
    }

    /// Removes the entry with the given id.
    ///
    /// Returns `false` when no such entry is staged.
    pub fn remove(&mut self, id: AttachmentId) -> bool {
        match self.entries.iter().position(|f| f.id == id) {
            Some(index) => {
                let removed = self.entries.remove(index);
                tracing::debug!("removed attachment {}", removed.name());
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StagedFile> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File names in staging order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(StagedFile::name).collect()
    }

    /// Builds the multipart upload body carrying every staged file.
    pub fn upload_body(&self) -> UploadBody {
        UploadBody::from_staged(self.entries.iter())
    }
}
