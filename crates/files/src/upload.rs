//! `multipart/form-data` upload body for staged attachments.
//!
//! Every staged file becomes one part under the [`UPLOAD_FIELD_NAME`] field, carrying the raw
//! bytes with the file's name and declared media type. Encoding follows RFC 7578; quotes and
//! line breaks in file names are percent-encoded the way browsers do.

use crate::constants::UPLOAD_FIELD_NAME;
use crate::files::StagedFile;
use std::sync::Arc;
use uuid::Uuid;

/// One file part of an [`UploadBody`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    pub field_name: String,
    pub filename: String,
    pub content_type: String,
    contents: Arc<[u8]>,
}

impl UploadPart {
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }
}

/// Multipart body holding the raw bytes of every staged attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBody {
    boundary: String,
    parts: Vec<UploadPart>,
}

impl UploadBody {
    pub(crate) fn from_staged<'a>(files: impl Iterator<Item = &'a StagedFile>) -> Self {
        let parts = files
            .map(|file| UploadPart {
                field_name: UPLOAD_FIELD_NAME.to_owned(),
                filename: file.name().to_owned(),
                content_type: file.mime_type().to_owned(),
                contents: file.shared_contents(),
            })
            .collect();

        Self {
            boundary: format!("askq-boundary-{}", Uuid::new_v4().simple()),
            parts,
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn parts(&self) -> &[UploadPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Sum of the raw part sizes, excluding multipart framing.
    pub fn payload_bytes(&self) -> u64 {
        self.parts.iter().map(|p| p.contents.len() as u64).sum()
    }

    /// Value for the `Content-Type` request header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Serialises the body.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.payload_bytes() as usize + 256 * self.parts.len());

        for part in &self.parts {
            out.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            out.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    escape_quoted(&part.field_name),
                    escape_quoted(&part.filename)
                )
                .as_bytes(),
            );
            out.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
            out.extend_from_slice(&part.contents);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());

        out
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
