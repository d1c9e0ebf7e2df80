//! Composer runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the modal
//! controller. Library code never reads environment variables; binaries resolve them and
//! hand the values to the helpers in this module.

use crate::constants::{
    DEFAULT_SUBMIT_TIMEOUT_SECS, DEFAULT_TAGS, DETAILS_MAX_CHARS, TITLE_MAX_CHARS,
    TITLE_MIN_CHARS,
};
use crate::tags::TagVocabulary;
use crate::{ComposerError, ComposerResult};
use askq_files::AttachmentRules;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What happens to the draft when the modal is cancelled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosePolicy {
    /// Keep the draft so reopening the modal shows it again.
    #[default]
    Preserve,
    /// Discard the draft on cancel.
    Reset,
}

/// On-disk form of the configuration. Every field is optional in the YAML file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub tags: Vec<String>,
    pub attachments: AttachmentRules,
    pub title_min_chars: usize,
    pub title_max_chars: usize,
    pub details_max_chars: usize,
    pub submit_timeout_secs: u64,
    pub close_policy: ClosePolicy,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            tags: DEFAULT_TAGS.iter().map(|t| (*t).to_owned()).collect(),
            attachments: AttachmentRules::default(),
            title_min_chars: TITLE_MIN_CHARS,
            title_max_chars: TITLE_MAX_CHARS,
            details_max_chars: DETAILS_MAX_CHARS,
            submit_timeout_secs: DEFAULT_SUBMIT_TIMEOUT_SECS,
            close_policy: ClosePolicy::default(),
        }
    }
}

/// Validated composer configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposerConfig {
    vocabulary: TagVocabulary,
    attachment_rules: AttachmentRules,
    title_min_chars: usize,
    title_max_chars: usize,
    details_max_chars: usize,
    submit_timeout: Duration,
    close_policy: ClosePolicy,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            vocabulary: TagVocabulary::default(),
            attachment_rules: AttachmentRules::default(),
            title_min_chars: TITLE_MIN_CHARS,
            title_max_chars: TITLE_MAX_CHARS,
            details_max_chars: DETAILS_MAX_CHARS,
            submit_timeout: Duration::from_secs(DEFAULT_SUBMIT_TIMEOUT_SECS),
            close_policy: ClosePolicy::default(),
        }
    }
}

impl ComposerConfig {
    /// Validate a [`ConfigFile`] into a `ComposerConfig`.
    pub fn from_file(file: ConfigFile) -> ComposerResult<Self> {
        let vocabulary = TagVocabulary::new(file.tags)?;

        if file.attachments.allowed_mime_types.is_empty() {
            return Err(ComposerError::InvalidConfig(
                "attachments.allowed_mime_types cannot be empty".into(),
            ));
        }
        if file.attachments.max_size_bytes == 0 {
            return Err(ComposerError::InvalidConfig(
                "attachments.max_size_bytes must be greater than zero".into(),
            ));
        }
        if file.title_max_chars == 0 || file.details_max_chars == 0 {
            return Err(ComposerError::InvalidConfig(
                "title_max_chars and details_max_chars must be greater than zero".into(),
            ));
        }
        if file.title_min_chars > file.title_max_chars {
            return Err(ComposerError::InvalidConfig(format!(
                "title_min_chars ({}) exceeds title_max_chars ({})",
                file.title_min_chars, file.title_max_chars
            )));
        }
        if file.submit_timeout_secs == 0 {
            return Err(ComposerError::InvalidConfig(
                "submit_timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(Self {
            vocabulary,
            attachment_rules: file.attachments,
            title_min_chars: file.title_min_chars,
            title_max_chars: file.title_max_chars,
            details_max_chars: file.details_max_chars,
            submit_timeout: Duration::from_secs(file.submit_timeout_secs),
            close_policy: file.close_policy,
        })
    }

    /// Load and validate a YAML configuration file.
    pub fn load(path: &Path) -> ComposerResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            ComposerError::ConfigRead {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let deserializer = serde_yaml::Deserializer::from_str(&contents);
        let file: ConfigFile =
            serde_path_to_error::deserialize(deserializer).map_err(|source| {
                ComposerError::ConfigParse {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

        tracing::debug!("loaded composer config from {}", path.display());
        Self::from_file(file)
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    pub fn with_close_policy(mut self, policy: ClosePolicy) -> Self {
        self.close_policy = policy;
        self
    }

    pub fn vocabulary(&self) -> &TagVocabulary {
        &self.vocabulary
    }

    pub fn attachment_rules(&self) -> &AttachmentRules {
        &self.attachment_rules
    }

    pub fn title_min_chars(&self) -> usize {
        self.title_min_chars
    }

    pub fn title_max_chars(&self) -> usize {
        self.title_max_chars
    }

    pub fn details_max_chars(&self) -> usize {
        self.details_max_chars
    }

    pub fn submit_timeout(&self) -> Duration {
        self.submit_timeout
    }

    pub fn close_policy(&self) -> ClosePolicy {
        self.close_policy
    }
}

/// Resolve the configuration from an optional file path.
///
/// `None` gives the built-in defaults.
pub fn resolve_config(path: Option<PathBuf>) -> ComposerResult<ComposerConfig> {
    match path {
        Some(path) => ComposerConfig::load(&path),
        None => Ok(ComposerConfig::default()),
    }
}

/// Parse a submit timeout override (whole seconds) from an optional string value.
///
/// `None` or empty/whitespace means no override.
pub fn submit_timeout_from_env_value(value: Option<String>) -> ComposerResult<Option<Duration>> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(value) = value else {
        return Ok(None);
    };

    let secs: u64 = value.parse().map_err(|_| {
        ComposerError::InvalidConfig(format!(
            "submit timeout must be a whole number of seconds, got '{}'",
            value
        ))
    })?;
    if secs == 0 {
        return Err(ComposerError::InvalidConfig(
            "submit timeout must be greater than zero".into(),
        ));
    }

    Ok(Some(Duration::from_secs(secs)))
}
