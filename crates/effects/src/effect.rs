//! Effect definitions and the targets they apply to.

use std::sync::Arc;

use crate::{PeriodicData, TagContainer};

/// An entity effects can be applied to. Only its tags are visible here.
pub trait EffectTarget {
    fn tags(&self) -> &TagContainer;
}

impl EffectTarget for TagContainer {
    fn tags(&self) -> &TagContainer {
        self
    }
}

/// Immutable effect definition shared by every applied instance.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectData {
    pub name: String,
    /// Tags describing the effect itself.
    pub asset_tags: TagContainer,
    /// Present for effects that execute on a period.
    pub periodic: Option<PeriodicData>,
}

impl EffectData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_asset_tags(mut self, tags: TagContainer) -> Self {
        self.asset_tags = tags;
        self
    }

    pub fn with_periodic(mut self, periodic: PeriodicData) -> Self {
        self.periodic = Some(periodic);
        self
    }
}

/// An effect definition at a given level.
#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    data: Arc<EffectData>,
    level: i32,
}

impl Effect {
    pub const DEFAULT_LEVEL: i32 = 1;

    pub fn new(data: Arc<EffectData>) -> Self {
        Self {
            data,
            level: Self::DEFAULT_LEVEL,
        }
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn data(&self) -> &EffectData {
        &self.data
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn is_periodic(&self) -> bool {
        self.data.periodic.is_some()
    }

    /// Seconds between executions at this effect's level.
    pub fn period(&self) -> Option<f32> {
        self.data
            .periodic
            .as_ref()
            .map(|periodic| periodic.period_at(self.level))
    }
}
