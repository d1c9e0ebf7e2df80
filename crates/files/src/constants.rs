//! Attachment limits and wire names.

/// Media types a staged attachment may declare.
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "application/pdf"];

/// Largest accepted attachment, in bytes (5 MiB).
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

/// Multipart field name used for every uploaded file part.
pub const UPLOAD_FIELD_NAME: &str = "files";

/// Media type used when neither content sniffing nor the extension gives an answer.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";
