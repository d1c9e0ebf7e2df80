//! Submission payload for a question.
//!
//! The payload carries attachment names only. File bytes travel next to it in the
//! [`UploadBody`] of the same [`QuestionSubmission`].

use crate::draft::Draft;
use crate::identity::Author;
use crate::tags::TagVocabulary;
use crate::{ComposerError, ComposerResult};
use askq_files::UploadBody;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a question. New questions are always open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Open,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPayload {
    pub title: String,
    pub details: String,
    pub tags: Vec<String>,
    pub attachments: Vec<String>,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub author: Author,
    pub status: QuestionStatus,
    pub views: u64,
    pub answers: u64,
}

impl QuestionPayload {
    pub fn to_json(&self) -> ComposerResult<String> {
        serde_json::to_string(self).map_err(ComposerError::Serialization)
    }

    pub fn to_json_pretty(&self) -> ComposerResult<String> {
        serde_json::to_string_pretty(self).map_err(ComposerError::Serialization)
    }
}

/// Everything handed to the submission collaborator for one question.
#[derive(Clone, Debug)]
pub struct QuestionSubmission {
    pub payload: QuestionPayload,
    pub upload: UploadBody,
}

/// Builds the payload for `draft`.
///
/// Tags are listed in vocabulary order and attachments in staging order. Title and
/// details are sent as typed, without trimming.
pub fn build_payload(
    draft: &Draft,
    vocabulary: &TagVocabulary,
    author: Author,
    now: DateTime<Utc>,
) -> QuestionPayload {
    QuestionPayload {
        title: draft.title().to_owned(),
        details: draft.details().to_owned(),
        tags: vocabulary
            .ordered(draft.tags())
            .into_iter()
            .map(str::to_owned)
            .collect(),
        attachments: draft
            .attachments()
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect(),
        timestamp: now,
        author,
        status: QuestionStatus::Open,
        views: 0,
        answers: 0,
    }
}

/// Builds the payload and the matching upload body.
pub fn build_submission(
    draft: &Draft,
    vocabulary: &TagVocabulary,
    author: Author,
    now: DateTime<Utc>,
) -> QuestionSubmission {
    QuestionSubmission {
        payload: build_payload(draft, vocabulary, author, now),
        upload: draft.attachments().upload_body(),
    }
}

// ISO-8601 with millisecond precision and a `Z` suffix, e.g. `2024-05-01T09:30:00.000Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askq_files::{AttachmentRules, FileCandidate};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    fn author() -> Author {
        Author::new("u-42", "Sam Patel").unwrap()
    }

    #[test]
    fn payload_json_shape() {
        let vocabulary = TagVocabulary::default();
        let mut draft = Draft::new();
        draft.set_title("Is aspirin safe daily?", 200);
        draft.toggle_tag(&vocabulary, "Healthcare").unwrap();

        let payload = build_payload(&draft, &vocabulary, author(), fixed_now());
        let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "title": "Is aspirin safe daily?",
                "details": "",
                "tags": ["Healthcare"],
                "attachments": [],
                "timestamp": "2024-05-01T09:30:00.000Z",
                "author": { "id": "u-42", "name": "Sam Patel" },
                "status": "open",
                "views": 0,
                "answers": 0
            })
        );
    }

    #[test]
    fn payload_lists_attachment_names_and_vocabulary_ordered_tags() {
        let vocabulary = TagVocabulary::default();
        let mut draft = Draft::new();
        draft.set_title("Which supplements help recovery?", 200);
        draft.toggle_tag(&vocabulary, "Nutrition").unwrap();
        draft.toggle_tag(&vocabulary, "Healthcare").unwrap();
        draft.stage_files(
            &AttachmentRules::default(),
            vec![
                FileCandidate::new("labs.pdf", "application/pdf", vec![1u8; 16]),
                FileCandidate::new("labs.pdf", "application/pdf", vec![1u8; 16]),
                FileCandidate::new("photo.png", "image/png", vec![2u8; 8]),
            ],
        );

        let submission = build_submission(&draft, &vocabulary, author(), fixed_now());
        assert_eq!(submission.payload.tags, vec!["Healthcare", "Nutrition"]);
        assert_eq!(
            submission.payload.attachments,
            vec!["labs.pdf", "labs.pdf", "photo.png"]
        );
        assert_eq!(submission.upload.parts().len(), 3);
        assert_eq!(submission.upload.payload_bytes(), 40);
    }

    #[test]
    fn payload_round_trips_timestamp() {
        let vocabulary = TagVocabulary::default();
        let payload = build_payload(&Draft::new(), &vocabulary, author(), fixed_now());
        let parsed: QuestionPayload = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        assert_eq!(parsed.timestamp, fixed_now());
        assert_eq!(parsed.status, QuestionStatus::Open);
    }
}
