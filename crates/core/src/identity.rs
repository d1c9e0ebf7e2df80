//! Author identity for submitted questions.
//!
//! The composer never invents an author. If the identity provider has nobody signed in,
//! the submit path fails closed with [`ComposerError::MissingIdentity`].

use crate::{ComposerError, ComposerResult};
use askq_types::NonEmptyText;
use serde::{Deserialize, Serialize};

/// The person asking the question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: NonEmptyText,
    pub name: NonEmptyText,
}

impl Author {
    pub fn new(id: impl AsRef<str>, name: impl AsRef<str>) -> ComposerResult<Self> {
        let id = NonEmptyText::new(id)
            .map_err(|_| ComposerError::InvalidConfig("author id cannot be empty".into()))?;
        let name = NonEmptyText::new(name)
            .map_err(|_| ComposerError::InvalidConfig("author name cannot be empty".into()))?;
        Ok(Self { id, name })
    }
}

/// Source of the currently signed-in author.
pub trait IdentityProvider: Send + Sync {
    fn current_author(&self) -> Option<Author>;
}

/// Always returns the same author.
#[derive(Clone, Debug)]
pub struct StaticIdentity(Author);

impl StaticIdentity {
    pub fn new(author: Author) -> Self {
        Self(author)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_author(&self) -> Option<Author> {
        Some(self.0.clone())
    }
}

/// Nobody is signed in.
#[derive(Clone, Copy, Debug, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current_author(&self) -> Option<Author> {
        None
    }
}

/// Builds an author from optional id and name values (typically environment variables).
///
/// Both absent (or blank) means no author. Exactly one present is a configuration error.
pub fn author_from_values(
    id: Option<String>,
    name: Option<String>,
) -> ComposerResult<Option<Author>> {
    let id = id.filter(|v| !v.trim().is_empty());
    let name = name.filter(|v| !v.trim().is_empty());

    match (id, name) {
        (Some(id), Some(name)) => Author::new(id, name).map(Some),
        (None, None) => Ok(None),
        (Some(_), None) => Err(ComposerError::InvalidConfig(
            "author id is set but author name is missing".into(),
        )),
        (None, Some(_)) => Err(ComposerError::InvalidConfig(
            "author name is set but author id is missing".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_identity_returns_author() {
        let author = Author::new("u-17", "Dr Grace Hopper").unwrap();
        let provider = StaticIdentity::new(author.clone());
        assert_eq!(provider.current_author(), Some(author));
    }

    #[test]
    fn anonymous_has_no_author() {
        assert_eq!(Anonymous.current_author(), None);
    }

    #[test]
    fn author_from_values_pairs() {
        let author = author_from_values(Some("u-1".into()), Some(" Ada ".into()))
            .unwrap()
            .unwrap();
        assert_eq!(author.name.as_str(), "Ada");

        assert!(author_from_values(None, None).unwrap().is_none());
        assert!(author_from_values(Some("  ".into()), None).unwrap().is_none());
        assert!(author_from_values(Some("u-1".into()), None).is_err());
        assert!(author_from_values(None, Some("Ada".into())).is_err());
    }
}
