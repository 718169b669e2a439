//! Effect application contracts consumed by the gameplay runtime.
//!
//! Effects are timed, chance-gated, tag-conditioned modifications applied to
//! game entities. This crate provides the evaluators that decide *whether* and
//! *how often* an effect applies; it does not store entities or apply
//! modifiers itself.
//!
//! # Architecture
//!
//! - [`Tag`], [`TagContainer`], [`TagQuery`]: hierarchical tags and queries
//! - [`TagRequirements`]: required/ignored tags plus an optional query
//! - [`ScalableFloat`], [`Curve`]: level-scaled magnitudes
//! - [`PeriodicData`]: periodic trigger configuration
//! - [`RandomProvider`], [`PcgRandom`]: pluggable random source
//! - [`components`]: application gates such as
//!   [`ChanceToApplyEffectComponent`](components::ChanceToApplyEffectComponent)

pub mod components;
pub mod effect;
pub mod periodic;
pub mod random;
pub mod requirements;
pub mod scalable;
pub mod tags;

pub use components::{
    ChanceToApplyEffectComponent, EffectComponent, EffectGate, TargetTagRequirementsComponent,
};
pub use effect::{Effect, EffectData, EffectTarget};
pub use periodic::{PeriodInhibitionRemovedPolicy, PeriodicData};
pub use random::{PcgRandom, RandomProvider};
pub use requirements::TagRequirements;
pub use scalable::{Curve, CurveKey, ScalableFloat};
pub use tags::{Tag, TagContainer, TagError, TagQuery};
