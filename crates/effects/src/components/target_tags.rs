use crate::{Effect, EffectComponent, EffectTarget, TagRequirements};

/// Blocks application unless the target's tags satisfy the requirements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetTagRequirementsComponent {
    pub application: TagRequirements,
}

impl TargetTagRequirementsComponent {
    pub fn new(application: TagRequirements) -> Self {
        Self { application }
    }
}

impl EffectComponent for TargetTagRequirementsComponent {
    fn can_apply_effect(&mut self, target: &dyn EffectTarget, _effect: &Effect) -> bool {
        self.application.requirements_met(target.tags())
    }
}
