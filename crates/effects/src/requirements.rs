//! Tag requirements evaluated against a target's tags.

use crate::{TagContainer, TagQuery};

/// Tags that must be present, tags that must be absent, and an optional
/// query. Every part must pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagRequirements {
    pub require_tags: TagContainer,
    pub ignore_tags: TagContainer,
    pub tag_query: Option<TagQuery>,
}

impl TagRequirements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_require_tags(mut self, tags: TagContainer) -> Self {
        self.require_tags = tags;
        self
    }

    pub fn with_ignore_tags(mut self, tags: TagContainer) -> Self {
        self.ignore_tags = tags;
        self
    }

    pub fn with_query(mut self, query: TagQuery) -> Self {
        self.tag_query = Some(query);
        self
    }

    /// True when nothing is required; such requirements always pass.
    pub fn is_empty(&self) -> bool {
        self.require_tags.is_empty() && self.ignore_tags.is_empty() && self.tag_query.is_none()
    }

    pub fn requirements_met(&self, tags: &TagContainer) -> bool {
        tags.has_all(&self.require_tags)
            && !tags.has_any(&self.ignore_tags)
            && self.tag_query.as_ref().is_none_or(|query| query.matches(tags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> TagContainer {
        TagContainer::parse(names.iter().copied()).unwrap()
    }

    #[test]
    fn empty_requirements_always_pass() {
        let requirements = TagRequirements::new();
        assert!(requirements.is_empty());
        assert!(requirements.requirements_met(&TagContainer::new()));
    }

    #[test]
    fn required_and_ignored_tags() {
        let requirements = TagRequirements::new()
            .with_require_tags(tags(&["state.alive"]))
            .with_ignore_tags(tags(&["status.immune"]));

        assert!(requirements.requirements_met(&tags(&["state.alive.wounded"])));
        assert!(!requirements.requirements_met(&tags(&["state.dead"])));
        assert!(!requirements.requirements_met(&tags(&[
            "state.alive",
            "status.immune.fire"
        ])));
    }

    #[test]
    fn query_is_applied_last() {
        let requirements = TagRequirements::new()
            .with_query(TagQuery::AnyTagsMatch(tags(&["class.mage", "class.priest"])));

        assert!(requirements.requirements_met(&tags(&["class.priest"])));
        assert!(!requirements.requirements_met(&tags(&["class.warrior"])));
    }
}
