//! Sandbox configuration loaded from the environment.
use std::env;

use statescript::GraphConfig;

/// Tuning for one sandbox run.
#[derive(Clone, Debug)]
pub struct SandboxConfig {
    pub graph: GraphConfig,
    /// Seconds advanced per tick.
    pub tick_delta: f64,
    pub ticks: u32,
    /// Tick before which the windup duration is written.
    pub windup_tick: u32,
    pub windup_seconds: f64,
    pub burn_seconds: f64,
    pub burn_period: f32,
    pub burn_chance: f32,
    pub effect_level: i32,
    pub seed: u64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            graph: GraphConfig::default(),
            tick_delta: 0.2,
            ticks: 30,
            windup_tick: 3,
            windup_seconds: 0.5,
            burn_seconds: 3.0,
            burn_period: 0.5,
            burn_chance: 0.6,
            effect_level: 1,
            seed: 42,
        }
    }
}

impl SandboxConfig {
    /// Shortest accepted burn period, in seconds.
    pub const MIN_BURN_PERIOD: f32 = 0.01;

    /// Sets the burn period, raising it to [`Self::MIN_BURN_PERIOD`].
    #[must_use]
    pub fn with_burn_period(mut self, period: f32) -> Self {
        self.burn_period = period.max(Self::MIN_BURN_PERIOD);
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SANDBOX_TICK_DELTA` - Seconds per tick (default: 0.2)
    /// - `SANDBOX_TICKS` - Number of ticks to run (default: 30)
    /// - `SANDBOX_WINDUP_TICK` - Tick at which the windup duration appears (default: 3)
    /// - `SANDBOX_WINDUP_SECONDS` - Windup duration (default: 0.5)
    /// - `SANDBOX_BURN_SECONDS` - How long the burn phase lasts (default: 3.0)
    /// - `SANDBOX_BURN_PERIOD` - Seconds between burn applications (default: 0.5, min: 0.01)
    /// - `SANDBOX_BURN_CHANCE` - Probability each application lands (default: 0.6)
    /// - `SANDBOX_EFFECT_LEVEL` - Effect level (default: 1)
    /// - `SANDBOX_SEED` - Random seed (default: 42)
    /// - `STATESCRIPT_MAX_NODES` - Node limit per graph (default: 4096)
    /// - `STATESCRIPT_MAX_DELTA` - Per-tick delta clamp (default: none)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(delta) = read_env::<f64>("SANDBOX_TICK_DELTA") {
            config.tick_delta = delta.max(0.0);
        }
        if let Some(ticks) = read_env::<u32>("SANDBOX_TICKS") {
            config.ticks = ticks;
        }
        if let Some(tick) = read_env::<u32>("SANDBOX_WINDUP_TICK") {
            config.windup_tick = tick.max(1);
        }
        if let Some(seconds) = read_env::<f64>("SANDBOX_WINDUP_SECONDS") {
            config.windup_seconds = seconds;
        }
        if let Some(seconds) = read_env::<f64>("SANDBOX_BURN_SECONDS") {
            config.burn_seconds = seconds;
        }
        if let Some(period) = read_env::<f32>("SANDBOX_BURN_PERIOD") {
            config = config.with_burn_period(period);
        }
        if let Some(chance) = read_env::<f32>("SANDBOX_BURN_CHANCE") {
            config.burn_chance = chance;
        }
        if let Some(level) = read_env::<i32>("SANDBOX_EFFECT_LEVEL") {
            config.effect_level = level;
        }
        if let Some(seed) = read_env::<u64>("SANDBOX_SEED") {
            config.seed = seed;
        }

        if let Some(max_nodes) = read_env::<usize>("STATESCRIPT_MAX_NODES") {
            config.graph = config.graph.with_max_nodes(max_nodes.max(1));
        }
        if let Some(max_delta) = read_env::<f64>("STATESCRIPT_MAX_DELTA") {
            config.graph = config.graph.with_max_delta_time(max_delta);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burn_period_is_kept_positive() {
        let config = SandboxConfig::default();
        assert_eq!(config.clone().with_burn_period(0.25).burn_period, 0.25);
        assert_eq!(
            config.clone().with_burn_period(0.0).burn_period,
            SandboxConfig::MIN_BURN_PERIOD
        );
        assert_eq!(
            config.clone().with_burn_period(-3.0).burn_period,
            SandboxConfig::MIN_BURN_PERIOD
        );
        assert_eq!(
            config.with_burn_period(f32::NAN).burn_period,
            SandboxConfig::MIN_BURN_PERIOD
        );
    }
}
