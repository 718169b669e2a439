//! Periodic trigger configuration.

use crate::ScalableFloat;

/// What happens to the period timer when an inhibited periodic effect becomes
/// active again.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PeriodInhibitionRemovedPolicy {
    /// Keep counting from where the period was.
    #[default]
    NeverReset,
    /// Restart the period from zero.
    ResetPeriod,
    /// Execute once immediately, then restart the period.
    ExecuteAndResetPeriod,
}

impl PeriodInhibitionRemovedPolicy {
    pub fn resets_period(self) -> bool {
        !matches!(self, Self::NeverReset)
    }

    pub fn executes_immediately(self) -> bool {
        matches!(self, Self::ExecuteAndResetPeriod)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodicData {
    /// Seconds between executions, scaled by effect level.
    pub period: ScalableFloat,
    /// Execute once as soon as the effect is applied.
    pub execute_on_application: bool,
    pub period_inhibition_removed_policy: PeriodInhibitionRemovedPolicy,
}

impl PeriodicData {
    pub fn new(period: impl Into<ScalableFloat>) -> Self {
        Self {
            period: period.into(),
            ..Self::default()
        }
    }

    pub fn with_execute_on_application(mut self, execute: bool) -> Self {
        self.execute_on_application = execute;
        self
    }

    pub fn with_inhibition_policy(mut self, policy: PeriodInhibitionRemovedPolicy) -> Self {
        self.period_inhibition_removed_policy = policy;
        self
    }

    /// Period in seconds at `level`, never negative.
    pub fn period_at(&self, level: i32) -> f32 {
        self.period.get_value(level).max(0.0)
    }
}
