//! Submit-time validation of a draft.
//!
//! Every rule is evaluated; nothing short-circuits. The caller shows all violations at once.

use crate::draft::Draft;
use std::fmt;

/// A single failed validation rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    TitleRequired,
    TitleTooShort { min_chars: usize },
    NoTagSelected,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TitleRequired => write!(f, "Question title is required"),
            Violation::TitleTooShort { min_chars } => write!(
                f,
                "Question title must be at least {} characters",
                min_chars
            ),
            Violation::NoTagSelected => write!(f, "Please select at least one tag"),
        }
    }
}

/// Ordered list of violations. Displays as one message, one violation per line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, violation: &Violation) -> bool {
        self.0.contains(violation)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

/// Checks whether `draft` may be submitted.
///
/// Rules, in order:
/// 1. the trimmed title is non-empty
/// 2. the trimmed title has at least `min_title_chars` characters
/// 3. at least one tag is selected
pub fn validate(draft: &Draft, min_title_chars: usize) -> Violations {
    let mut violations = Vec::new();
    let title = trim_title(draft.title());

    if title.is_empty() {
        violations.push(Violation::TitleRequired);
    }

    if title.chars().count() < min_title_chars {
        violations.push(Violation::TitleTooShort {
            min_chars: min_title_chars,
        });
    }

    if draft.tags().is_empty() {
        violations.push(Violation::NoTagSelected);
    }

    Violations(violations)
}

/// Trims whitespace and stray byte-order marks, which paste in from some editors.
fn trim_title(title: &str) -> &str {
    title.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}
