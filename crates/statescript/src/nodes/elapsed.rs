//! Publishes time since activation.

use crate::{NodeParameters, NodeResult, NodeScope, StateNode, ValueKind};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElapsedTimeContext {
    pub elapsed: f64,
}

/// Publishes the seconds since its last activation on the `Elapsed` output.
///
/// Publishes `0.0` on activation and the running total on every update. Never
/// deactivates on its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct ElapsedTimeNode;

impl ElapsedTimeNode {
    /// Output slot: seconds since activation.
    pub const ELAPSED: usize = 0;
}

impl StateNode for ElapsedTimeNode {
    type Context = ElapsedTimeContext;

    const DESCRIPTION: &'static str = "Publishes the time elapsed since activation.";

    fn define_parameters(&self, parameters: &mut NodeParameters) {
        parameters.output("Elapsed", ValueKind::Float);
    }

    fn on_activate(
        &self,
        context: &mut ElapsedTimeContext,
        scope: &mut NodeScope<'_>,
    ) -> NodeResult {
        context.elapsed = 0.0;
        scope.publish(Self::ELAPSED, context.elapsed)
    }

    fn on_update(
        &self,
        delta_time: f64,
        context: &mut ElapsedTimeContext,
        scope: &mut NodeScope<'_>,
    ) -> NodeResult {
        context.elapsed += delta_time;
        scope.publish(Self::ELAPSED, context.elapsed)
    }
}
