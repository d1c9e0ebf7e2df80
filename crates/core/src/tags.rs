//! Tag vocabulary and tag selection.
//!
//! The vocabulary is injected through [`ComposerConfig`](crate::config::ComposerConfig) so
//! it can be localised or swapped in tests. Display order always follows the vocabulary,
//! never the order in which tags were selected.

use crate::constants::DEFAULT_TAGS;
use crate::{ComposerError, ComposerResult};
use std::collections::BTreeSet;

/// The fixed list of tags a question may carry, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagVocabulary {
    tags: Vec<String>,
}

impl Default for TagVocabulary {
    fn default() -> Self {
        Self {
            tags: DEFAULT_TAGS.iter().map(|t| (*t).to_owned()).collect(),
        }
    }
}

impl TagVocabulary {
    /// Builds a vocabulary, rejecting empty lists, blank tags, and duplicates.
    pub fn new<I, S>(tags: I) -> ComposerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();

        if tags.is_empty() {
            return Err(ComposerError::InvalidConfig(
                "tag vocabulary cannot be empty".into(),
            ));
        }

        let mut seen = BTreeSet::new();
        for tag in &tags {
            if tag.trim().is_empty() || tag.trim() != tag {
                return Err(ComposerError::InvalidConfig(format!(
                    "tag '{}' is blank or has surrounding whitespace",
                    tag
                )));
            }
            if !seen.insert(tag.as_str()) {
                return Err(ComposerError::InvalidConfig(format!(
                    "tag '{}' appears more than once",
                    tag
                )));
            }
        }

        Ok(Self { tags })
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Selected tags in vocabulary order.
    pub fn ordered<'a>(&'a self, selection: &TagSelection) -> Vec<&'a str> {
        self.iter().filter(|t| selection.contains(t)).collect()
    }
}

/// Set of tags chosen for a draft. Membership only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagSelection {
    selected: BTreeSet<String>,
}

impl TagSelection {
    /// Adds `tag` if absent, removes it if present.
    ///
    /// Returns whether the tag is selected afterwards. Tags outside `vocabulary` are
    /// rejected and leave the selection unchanged.
    pub fn toggle(&mut self, vocabulary: &TagVocabulary, tag: &str) -> ComposerResult<bool> {
        if !vocabulary.contains(tag) {
            return Err(ComposerError::UnknownTag(tag.to_owned()));
        }

        if self.selected.remove(tag) {
            Ok(false)
        } else {
            self.selected.insert(tag.to_owned());
            Ok(true)
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.selected.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
