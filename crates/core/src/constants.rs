//! Constants used throughout the composer core.
//!
//! Defaults here are only starting values; the live values come from
//! [`ComposerConfig`](crate::config::ComposerConfig).

/// Default tag vocabulary, in display order.
pub const DEFAULT_TAGS: [&str; 6] = [
    "Healthcare",
    "Medical Research",
    "Patient Care",
    "Nutrition",
    "Mental Health",
    "Medical Technology",
];

/// Maximum number of characters kept in a question title.
pub const TITLE_MAX_CHARS: usize = 200;

/// Minimum number of characters (after trimming) a title needs before submit.
pub const TITLE_MIN_CHARS: usize = 10;

/// Maximum number of characters kept in question details.
pub const DETAILS_MAX_CHARS: usize = 1000;

/// Default upper bound on one submission call.
pub const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 30;

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Question submitted successfully!";

pub const SUBMIT_FAILURE_MESSAGE: &str = "Failed to submit question. Please try again.";

pub const MISSING_IDENTITY_MESSAGE: &str = "You need to be signed in to ask a question.";
