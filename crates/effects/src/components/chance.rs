use tracing::debug;

use crate::{Effect, EffectComponent, EffectTarget, RandomProvider, ScalableFloat};

/// Applies an effect with a level-scaled probability.
///
/// Every evaluation draws exactly one sample, even when the chance is at or
/// beyond `0.0` or `1.0`, so the random stream advances identically whatever
/// the configured chance.
#[derive(Clone, Debug)]
pub struct ChanceToApplyEffectComponent<R> {
    random: R,
    chance: ScalableFloat,
}

impl<R: RandomProvider> ChanceToApplyEffectComponent<R> {
    pub fn new(random: R, chance: impl Into<ScalableFloat>) -> Self {
        Self {
            random,
            chance: chance.into(),
        }
    }

    pub fn chance(&self) -> &ScalableFloat {
        &self.chance
    }

    pub fn random_mut(&mut self) -> &mut R {
        &mut self.random
    }
}

impl<R: RandomProvider> EffectComponent for ChanceToApplyEffectComponent<R> {
    fn can_apply_effect(&mut self, _target: &dyn EffectTarget, effect: &Effect) -> bool {
        let chance = self.chance.get_value(effect.level());
        let roll = self.random.next_single();
        let applies = roll < chance;
        debug!(
            target: "effects::chance",
            effect = effect.name(),
            level = effect.level(),
            chance,
            roll,
            applies,
            "chance evaluated"
        );
        applies
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use super::*;
    use crate::{Curve, CurveKey, EffectData, TagContainer};

    /// Replays fixed samples.
    struct Scripted(VecDeque<f32>);

    impl RandomProvider for Scripted {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_single(&mut self) -> f32 {
            self.0.pop_front().unwrap_or(0.0)
        }
    }

    fn effect(level: i32) -> Effect {
        Effect::new(Arc::new(EffectData::new("poison"))).with_level(level)
    }

    #[test]
    fn applies_when_roll_is_below_chance() {
        let mut component =
            ChanceToApplyEffectComponent::new(Scripted(VecDeque::from([0.29, 0.3, 0.9])), 0.3);
        let target = TagContainer::new();

        assert!(component.can_apply_effect(&target, &effect(1)));
        assert!(!component.can_apply_effect(&target, &effect(1)));
        assert!(!component.can_apply_effect(&target, &effect(1)));
    }

    #[test]
    fn chance_scales_with_level() {
        let chance = ScalableFloat::constant(0.5)
            .with_curve(Curve::new([CurveKey::new(1.0, 1.0), CurveKey::new(2.0, 2.0)]));
        let mut component =
            ChanceToApplyEffectComponent::new(Scripted(VecDeque::from([0.75, 0.75])), chance);
        let target = TagContainer::new();

        assert!(!component.can_apply_effect(&target, &effect(1)));
        assert!(component.can_apply_effect(&target, &effect(2)));
    }

    #[test]
    fn zero_chance_still_consumes_a_sample() {
        let mut component =
            ChanceToApplyEffectComponent::new(Scripted(VecDeque::from([0.0, 0.1])), 0.0);
        assert!(!component.can_apply_effect(&TagContainer::new(), &effect(1)));
        assert_eq!(component.random_mut().0.len(), 1);
    }
}
