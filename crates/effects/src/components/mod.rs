//! Application gates attached to effects.
//!
//! Each component may veto an application. [`EffectGate`] runs its
//! components in order and stops at the first veto, so later components
//! (including random draws) are skipped for rejected applications.

mod chance;
mod target_tags;

pub use chance::ChanceToApplyEffectComponent;
pub use target_tags::TargetTagRequirementsComponent;

use tracing::trace;

use crate::{Effect, EffectTarget};

/// A component that can veto applying an effect to a target.
pub trait EffectComponent: Send {
    /// Returns false to block the application.
    fn can_apply_effect(&mut self, target: &dyn EffectTarget, effect: &Effect) -> bool;
}

/// Ordered list of components consulted before an effect applies.
#[derive(Default)]
pub struct EffectGate {
    components: Vec<Box<dyn EffectComponent>>,
}

impl EffectGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, component: impl EffectComponent + 'static) -> Self {
        self.components.push(Box::new(component));
        self
    }

    pub fn push(&mut self, component: Box<dyn EffectComponent>) {
        self.components.push(component);
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn can_apply(&mut self, target: &dyn EffectTarget, effect: &Effect) -> bool {
        for (index, component) in self.components.iter_mut().enumerate() {
            if !component.can_apply_effect(target, effect) {
                trace!(
                    target: "effects::gate",
                    effect = effect.name(),
                    component = index,
                    "application blocked"
                );
                return false;
            }
        }
        true
    }
}

impl core::fmt::Debug for EffectGate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EffectGate")
            .field("components", &self.components.len())
            .finish()
    }
}
