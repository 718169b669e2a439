//! Hierarchical gameplay tags.
//!
//! Tags are dotted names such as `status.burning`. A tag matches itself and
//! every ancestor: a container holding `status.burning` answers yes to
//! `status`. Exact lookups skip the hierarchy.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Malformed tag names.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("tag name is empty")]
    Empty,

    #[error("tag `{0}` has an empty segment")]
    EmptySegment(String),

    #[error("tag `{name}` contains invalid character {character:?}")]
    InvalidCharacter { name: String, character: char },
}

/// A validated hierarchical tag.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag(Arc<str>);

impl Tag {
    /// Parses `name`. Segments are separated by `.` and may contain ASCII
    /// letters, digits and `_`.
    pub fn new(name: &str) -> Result<Self, TagError> {
        if name.is_empty() {
            return Err(TagError::Empty);
        }
        for segment in name.split('.') {
            if segment.is_empty() {
                return Err(TagError::EmptySegment(name.to_owned()));
            }
            if let Some(character) = segment
                .chars()
                .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
            {
                return Err(TagError::InvalidCharacter {
                    name: name.to_owned(),
                    character,
                });
            }
        }
        Ok(Self(Arc::from(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `self` is `other` or a descendant of it.
    pub fn matches(&self, other: &Tag) -> bool {
        let (tag, query) = (self.as_str(), other.as_str());
        tag == query
            || (tag.len() > query.len()
                && tag.starts_with(query)
                && tag.as_bytes()[query.len()] == b'.')
    }

    /// The direct parent tag, if any.
    pub fn parent(&self) -> Option<Tag> {
        self.0
            .rfind('.')
            .map(|index| Tag(Arc::from(&self.0[..index])))
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.0.split('.').count()
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for Tag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::new(s)
    }
}

/// An ordered set of tags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagContainer {
    tags: BTreeSet<Tag>,
}

impl TagContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every name into a container.
    pub fn parse<'a, I>(names: I) -> Result<Self, TagError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().map(Tag::new).collect()
    }

    /// Adds `tag`. Returns false if it was already present.
    pub fn insert(&mut self, tag: Tag) -> bool {
        self.tags.insert(tag)
    }

    pub fn remove(&mut self, tag: &Tag) -> bool {
        self.tags.remove(tag)
    }

    /// Returns true if any tag in the container matches `tag` hierarchically.
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|own| own.matches(tag))
    }

    pub fn has_tag_exact(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// True if any tag of `other` is matched. False for an empty `other`.
    pub fn has_any(&self, other: &TagContainer) -> bool {
        other.iter().any(|tag| self.has_tag(tag))
    }

    /// True if every tag of `other` is matched. True for an empty `other`.
    pub fn has_all(&self, other: &TagContainer) -> bool {
        other.iter().all(|tag| self.has_tag(tag))
    }

    pub fn has_any_exact(&self, other: &TagContainer) -> bool {
        other.iter().any(|tag| self.has_tag_exact(tag))
    }

    pub fn has_all_exact(&self, other: &TagContainer) -> bool {
        other.iter().all(|tag| self.has_tag_exact(tag))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl FromIterator<Tag> for TagContainer {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

impl Extend<Tag> for TagContainer {
    fn extend<I: IntoIterator<Item = Tag>>(&mut self, iter: I) {
        self.tags.extend(iter);
    }
}

/// Boolean expression over a container's tags.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagQuery {
    /// At least one listed tag is present.
    AnyTagsMatch(TagContainer),
    /// Every listed tag is present.
    AllTagsMatch(TagContainer),
    /// None of the listed tags is present.
    NoTagsMatch(TagContainer),
    /// At least one sub-expression holds.
    AnyExprMatch(Vec<TagQuery>),
    /// Every sub-expression holds.
    AllExprMatch(Vec<TagQuery>),
    /// No sub-expression holds.
    NoExprMatch(Vec<TagQuery>),
}

impl TagQuery {
    pub fn matches(&self, container: &TagContainer) -> bool {
        match self {
            TagQuery::AnyTagsMatch(tags) => container.has_any(tags),
            TagQuery::AllTagsMatch(tags) => container.has_all(tags),
            TagQuery::NoTagsMatch(tags) => !container.has_any(tags),
            TagQuery::AnyExprMatch(exprs) => exprs.iter().any(|expr| expr.matches(container)),
            TagQuery::AllExprMatch(exprs) => exprs.iter().all(|expr| expr.matches(container)),
            TagQuery::NoExprMatch(exprs) => !exprs.iter().any(|expr| expr.matches(container)),
        }
    }
}
