//! The in-progress question (form state store).
//!
//! A [`Draft`] is mutated in place by user input and only reset by the modal controller,
//! after a successful submit or on close when the close policy says so.

use crate::tags::{TagSelection, TagVocabulary};
use crate::ComposerResult;
use askq_files::{AttachmentId, AttachmentRules, Attachments, FileCandidate, StageReport};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    title: String,
    details: String,
    tags: TagSelection,
    attachments: Attachments,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn tags(&self) -> &TagSelection {
        &self.tags
    }

    pub fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    /// Replaces the title, keeping at most `max_chars` characters.
    pub fn set_title(&mut self, value: &str, max_chars: usize) {
        self.title = truncate_chars(value, max_chars);
    }

    /// Replaces the details, keeping at most `max_chars` characters.
    pub fn set_details(&mut self, value: &str, max_chars: usize) {
        self.details = truncate_chars(value, max_chars);
    }

    pub fn toggle_tag(&mut self, vocabulary: &TagVocabulary, tag: &str) -> ComposerResult<bool> {
        self.tags.toggle(vocabulary, tag)
    }

    pub fn stage_files(
        &mut self,
        rules: &AttachmentRules,
        candidates: impl IntoIterator<Item = FileCandidate>,
    ) -> StageReport {
        self.attachments.stage(rules, candidates)
    }

    pub fn remove_file(&mut self, id: AttachmentId) -> bool {
        self.attachments.remove(id)
    }

    /// Back to the empty draft. Releases staged file bytes.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.details.is_empty()
            && self.tags.is_empty()
            && self.attachments.is_empty()
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            tracing::debug!("input truncated to {} characters", max_chars);
            value[..byte_index].to_owned()
        }
        None => value.to_owned(),
    }
}
