use crate::submission::{SubmissionPhase, SubmitError};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ComposerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to read config file (path: {path}): {source}", path = path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file (path: {path}): {source}", path = path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_path_to_error::Error<serde_yaml::Error>,
    },

    #[error("unknown tag: {0}")]
    UnknownTag(String),

    #[error("a submission is already in progress")]
    SubmitInProgress,
    #[error("invalid submission transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: SubmissionPhase,
        to: SubmissionPhase,
    },
    #[error("no signed-in author is available")]
    MissingIdentity,
    #[error("submission failed: {0}")]
    Submit(#[from] SubmitError),

    #[error("failed to serialize payload: {0}")]
    Serialization(serde_json::Error),
    #[error("attachment error: {0}")]
    Files(#[from] askq_files::FilesError),
}

pub type ComposerResult<T> = std::result::Result<T, ComposerError>;
