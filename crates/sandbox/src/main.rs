//! Statescript sandbox binary.
//!
//! Ticks a small ability graph headlessly and logs what happens:
//!
//! 1. `Windup` waits on the `WindupSeconds` variable, which the host only
//!    writes at `SANDBOX_WINDUP_TICK`.
//! 2. When the windup completes, `Burn` and a clock start.
//! 3. While `Burn` is active, a periodic burn effect is offered to a target
//!    through a tag gate and a seeded chance gate.
//!
//! ```bash
//! RUST_LOG=statescript=debug,effects=debug cargo run -p statescript-sandbox
//! ```

mod config;

use std::sync::Arc;

use anyhow::Result;
use effects::{
    ChanceToApplyEffectComponent, Effect, EffectData, EffectGate, PcgRandom, PeriodicData,
    TagContainer, TagRequirements, TargetTagRequirementsComponent,
};
use statescript::nodes::{ElapsedTimeNode, TimerNode};
use statescript::{GraphBuilder, PropertyBinding, ValueKind, VariableTable};
use tracing_subscriber::EnvFilter;

use crate::config::SandboxConfig;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = SandboxConfig::from_env();
    tracing::info!(?config, "Starting statescript sandbox");

    run(&config)
}

fn run(config: &SandboxConfig) -> Result<()> {
    // 1. Graph definition
    let mut builder = GraphBuilder::new(config.graph.clone());
    let windup = builder.add_node(TimerNode)?;
    let burn = builder.add_node(TimerNode)?;
    let clock = builder.add_node(ElapsedTimeNode)?;
    builder
        .bind(windup, TimerNode::DURATION, PropertyBinding::variable("WindupSeconds"))?
        .bind(burn, TimerNode::DURATION, PropertyBinding::constant(config.burn_seconds))?
        .publish_as(clock, ElapsedTimeNode::ELAPSED, "BurnElapsed")?
        .entry(windup)?
        .transition(windup, burn)?
        .transition(windup, clock)?;

    let mut variables = VariableTable::new();
    variables.declare("WindupSeconds", ValueKind::Float)?;
    let mut graph = builder.build(variables)?;

    // 2. Effect and gates
    let effect = Effect::new(Arc::new(
        EffectData::new("burn")
            .with_asset_tags(TagContainer::parse(["damage.fire"])?)
            .with_periodic(PeriodicData::new(config.burn_period)),
    ))
    .with_level(config.effect_level);
    let period = f64::from(effect.period().unwrap_or(config.burn_period));

    let target = TagContainer::parse(["state.alive", "class.mage"])?;
    let mut gate = EffectGate::new()
        .with(TargetTagRequirementsComponent::new(
            TagRequirements::new()
                .with_require_tags(TagContainer::parse(["state.alive"])?)
                .with_ignore_tags(TagContainer::parse(["status.immune.fire"])?),
        ))
        .with(ChanceToApplyEffectComponent::new(
            PcgRandom::new(config.seed),
            config.burn_chance,
        ));

    // 3. Tick loop
    graph.start()?;
    let mut since_application = 0.0;
    let (mut offered, mut landed) = (0u32, 0u32);

    for tick in 1..=config.ticks {
        if tick == config.windup_tick {
            graph
                .variables_mut()
                .set("WindupSeconds", config.windup_seconds)?;
            tracing::info!(tick, seconds = config.windup_seconds, "windup duration set");
        }

        let burning_before = graph.is_active(burn);
        let summary = graph.update(config.tick_delta)?;

        if graph.is_active(burn) && !burning_before {
            tracing::info!(tick, "burn phase started");
        }
        if burning_before {
            for _ in 0..applications_due(&mut since_application, config.tick_delta, period) {
                offered += 1;
                if gate.can_apply(&target, &effect) {
                    landed += 1;
                    tracing::info!(tick, effect = effect.name(), "effect applied");
                }
            }
            if !graph.is_active(burn) {
                let elapsed = graph.output("BurnElapsed").and_then(|value| value.get::<f64>());
                tracing::info!(tick, ?elapsed, "burn phase finished");
            }
        }

        tracing::debug!(
            tick = summary.tick,
            updated = summary.updated,
            deactivated = summary.deactivated,
            activated = summary.activated,
            active = graph.active_nodes().count(),
            "tick"
        );
    }

    tracing::info!(offered, landed, ticks = graph.tick_count(), "Sandbox run complete");
    graph.stop()?;
    Ok(())
}

/// Advances the time since the last application by `delta` and returns how
/// many periods elapsed. A non-positive period never applies.
fn applications_due(since_application: &mut f64, delta: f64, period: f64) -> u32 {
    if period.is_nan() || period <= 0.0 {
        *since_application = 0.0;
        return 0;
    }

    *since_application += delta;
    let due = (*since_application / period).floor();
    *since_application -= due * period;
    due as u32
}
