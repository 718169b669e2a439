//! Duration-gated timer node.

use crate::{NodeParameters, NodeResult, NodeScope, StateNode, ValueKind};

/// Elapsed time since the timer was last activated.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimerContext {
    pub elapsed: f64,
}

/// Stays active until the time since activation reaches `Duration`.
///
/// Elapsed time accumulates on every update, including updates where
/// `Duration` cannot be resolved; such updates never deactivate the node.
/// Reaching the duration exactly counts as done, so a duration of zero or less
/// completes on the first update that resolves it.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimerNode;

impl TimerNode {
    /// Input slot: how long to stay active, in seconds.
    pub const DURATION: usize = 0;
}

impl StateNode for TimerNode {
    type Context = TimerContext;

    const DESCRIPTION: &'static str =
        "Remains active for the bound duration, then deactivates itself.";

    fn define_parameters(&self, parameters: &mut NodeParameters) {
        parameters.input("Duration", ValueKind::Float);
    }

    fn on_activate(&self, context: &mut TimerContext, _scope: &mut NodeScope<'_>) -> NodeResult {
        context.elapsed = 0.0;
        Ok(())
    }

    fn on_update(
        &self,
        delta_time: f64,
        context: &mut TimerContext,
        scope: &mut NodeScope<'_>,
    ) -> NodeResult {
        context.elapsed += delta_time;

        let Some(duration) = scope.try_resolve::<f64>(Self::DURATION) else {
            return Ok(());
        };

        if context.elapsed >= duration {
            scope.deactivate_node();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Graph, GraphBuilder, GraphConfig, NodeId, PropertyBinding, VariableTable};

    fn started(duration: PropertyBinding, variables: VariableTable) -> (Graph, NodeId) {
        let mut builder = GraphBuilder::new(GraphConfig::default());
        let timer = builder.add_node(TimerNode).unwrap();
        builder
            .bind(timer, TimerNode::DURATION, duration)
            .unwrap()
            .entry(timer)
            .unwrap();
        let mut graph = builder.build(variables).unwrap();
        graph.start().unwrap();
        (graph, timer)
    }

    #[test]
    fn equal_elapsed_completes() {
        let (mut graph, timer) = started(PropertyBinding::constant(2.0), VariableTable::new());

        graph.update(1.0).unwrap();
        assert!(graph.is_active(timer));
        graph.update(1.0).unwrap();
        assert!(!graph.is_active(timer));
    }

    #[test]
    fn negative_duration_completes_on_first_update() {
        let (mut graph, timer) = started(PropertyBinding::constant(-1.0), VariableTable::new());
        graph.update(0.0).unwrap();
        assert!(!graph.is_active(timer));
    }

    #[test]
    fn zero_delta_alone_does_not_complete() {
        let (mut graph, timer) = started(PropertyBinding::constant(0.5), VariableTable::new());
        for _ in 0..10 {
            graph.update(0.0).unwrap();
        }
        assert!(graph.is_active(timer));
        assert_eq!(graph.node_context::<TimerContext>(timer).unwrap().elapsed, 0.0);
    }

    #[test]
    fn elapsed_accumulates_while_unresolved() {
        let (mut graph, timer) =
            started(PropertyBinding::variable("Duration"), VariableTable::new());

        graph.update(0.2).unwrap();
        graph.update(0.2).unwrap();
        assert!(graph.is_active(timer));

        let elapsed = graph.node_context::<TimerContext>(timer).unwrap().elapsed;
        assert!((elapsed - 0.4).abs() < 1e-12);
    }

    #[test]
    fn mistyped_variable_never_completes() {
        let (mut graph, timer) =
            started(PropertyBinding::variable("Duration"), VariableTable::new());
        graph.variables_mut().set("Duration", 1_i64).unwrap();

        for _ in 0..5 {
            graph.update(1.0).unwrap();
        }
        assert!(graph.is_active(timer));
    }
}
