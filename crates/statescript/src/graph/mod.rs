//! Graph instances and the tick loop.
//!
//! A [`Graph`] is built once by [`GraphBuilder`], ticked many times by its
//! host and dropped once. It exclusively owns its nodes and their
//! [`GraphContext`]; all mutation goes through `&mut Graph`, so a graph can
//! never be ticked concurrently and the host cannot write variables while a
//! tick is in progress.
//!
//! # Tick semantics
//!
//! - Nodes update in a fixed order: producers before the consumers reading
//!   their outputs, ties broken by declaration order.
//! - Outputs are visible immediately. A node updated later in the same tick
//!   reads the value published earlier in that tick.
//! - A node activated during a tick (through a transition) gets its first
//!   update on the next tick.
//! - Transitions fire when a node deactivates itself. Host-initiated
//!   deactivation does not fire them.

mod builder;
mod order;

pub use builder::GraphBuilder;

use tracing::error;

use crate::{GraphConfig, GraphContext, LifecycleError, NodeId, NodeInstance, NodeState, Value};
use crate::{VariableTable, node::NodeResult};

/// Counters describing one completed tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// 1-based index of the tick.
    pub tick: u64,
    /// Nodes whose `on_update` ran.
    pub updated: usize,
    /// Nodes that deactivated themselves.
    pub deactivated: usize,
    /// Nodes activated by transitions.
    pub activated: usize,
}

/// A built graph instance.
pub struct Graph {
    config: GraphConfig,
    nodes: Vec<NodeInstance>,
    order: Vec<NodeId>,
    entries: Vec<NodeId>,
    successors: Vec<Vec<NodeId>>,
    context: GraphContext,
    /// Nodes activated during the current tick; skipped until the next one.
    fresh: Vec<bool>,
    ticks: u64,
}

impl Graph {
    pub(crate) fn new(
        config: GraphConfig,
        nodes: Vec<NodeInstance>,
        order: Vec<NodeId>,
        entries: Vec<NodeId>,
        successors: Vec<Vec<NodeId>>,
        context: GraphContext,
    ) -> Self {
        let fresh = vec![false; nodes.len()];
        Self {
            config,
            nodes,
            order,
            entries,
            successors,
            context,
            fresh,
            ticks: 0,
        }
    }

    /// Activates every entry node, in the order they were marked.
    pub fn start(&mut self) -> NodeResult {
        for position in 0..self.entries.len() {
            let node = self.entries[position];
            self.activate(node)?;
        }
        Ok(())
    }

    /// Activates `node` between ticks.
    pub fn activate(&mut self, node: NodeId) -> NodeResult {
        let instance = self
            .nodes
            .get_mut(node.index())
            .ok_or(LifecycleError::UnknownNode { node })?;
        instance.activate(&mut self.context).inspect_err(report)
    }

    /// Deactivates `node` between ticks. Transitions do not fire.
    pub fn deactivate(&mut self, node: NodeId) -> NodeResult {
        let instance = self
            .nodes
            .get_mut(node.index())
            .ok_or(LifecycleError::UnknownNode { node })?;
        instance.deactivate(&mut self.context).inspect_err(report)
    }

    /// Deactivates every active node in update order. Transitions do not fire.
    pub fn stop(&mut self) -> NodeResult {
        for position in 0..self.order.len() {
            let index = self.order[position].index();
            if self.nodes[index].is_active() {
                self.nodes[index]
                    .deactivate(&mut self.context)
                    .inspect_err(report)?;
            }
        }
        Ok(())
    }

    /// Advances the graph by `delta_time` seconds.
    ///
    /// The delta must be finite and non-negative. It is clamped to
    /// [`GraphConfig::max_delta_time`] when one is configured.
    pub fn update(&mut self, delta_time: f64) -> Result<TickSummary, LifecycleError> {
        if !delta_time.is_finite() || delta_time < 0.0 {
            let err = LifecycleError::InvalidDelta(delta_time);
            report(&err);
            return Err(err);
        }

        let delta_time = self.config.clamp_delta(delta_time);
        self.ticks += 1;
        let result = self.run_tick(delta_time);
        self.fresh.fill(false);
        result.inspect_err(report)
    }

    fn run_tick(&mut self, delta_time: f64) -> Result<TickSummary, LifecycleError> {
        let mut summary = TickSummary {
            tick: self.ticks,
            ..TickSummary::default()
        };

        for position in 0..self.order.len() {
            let index = self.order[position].index();
            if self.fresh[index] || !self.nodes[index].is_active() {
                continue;
            }

            summary.updated += 1;
            if self.nodes[index].update(delta_time, &mut self.context)? {
                summary.deactivated += 1;
                summary.activated += self.fire_transitions(index)?;
            }
        }

        Ok(summary)
    }

    fn fire_transitions(&mut self, index: usize) -> Result<usize, LifecycleError> {
        for &next in &self.successors[index] {
            self.nodes[next.index()].activate(&mut self.context)?;
            self.fresh[next.index()] = true;
        }
        Ok(self.successors[index].len())
    }

    /// Number of ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, node: NodeId) -> Option<&NodeInstance> {
        self.nodes.get(node.index())
    }

    pub fn nodes(&self) -> &[NodeInstance] {
        &self.nodes
    }

    pub fn node_state(&self, node: NodeId) -> Option<NodeState> {
        self.node(node).map(NodeInstance::state)
    }

    pub fn is_active(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(NodeInstance::is_active)
    }

    /// Active nodes, in update order.
    pub fn active_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|node| self.nodes[node.index()].is_active())
    }

    /// The order nodes are updated in each tick.
    pub fn update_order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn description(&self, node: NodeId) -> Option<&'static str> {
        self.node(node).map(NodeInstance::description)
    }

    pub fn context(&self) -> &GraphContext {
        &self.context
    }

    /// Context of `node`, see [`GraphContext::node_context`].
    pub fn node_context<T>(&mut self, node: NodeId) -> Result<&mut T, LifecycleError>
    where
        T: Default + Send + 'static,
    {
        self.context.node_context(node)
    }

    pub fn variables(&self) -> &VariableTable {
        self.context.variables()
    }

    /// Host write access to external variables. Only reachable between ticks.
    pub fn variables_mut(&mut self) -> &mut VariableTable {
        self.context.variables_mut()
    }

    /// Last value published under `name`.
    pub fn output(&self, name: &str) -> Option<&Value> {
        self.context.output(name)
    }
}

impl core::fmt::Debug for Graph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes)
            .field("order", &self.order)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

fn report(err: &LifecycleError) {
    error!(target: "statescript::graph", error = %err, "lifecycle misuse");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{ElapsedTimeNode, TimerNode};
    use crate::{BuildError, PropertyBinding};

    fn timer_graph(duration: PropertyBinding, variables: VariableTable) -> (Graph, NodeId) {
        let mut builder = GraphBuilder::new(GraphConfig::default());
        let timer = builder.add_node(TimerNode).unwrap();
        builder
            .bind(timer, TimerNode::DURATION, duration)
            .unwrap()
            .entry(timer)
            .unwrap();
        (builder.build(variables).unwrap(), timer)
    }

    #[test]
    fn start_activates_entries() {
        let (mut graph, timer) = timer_graph(PropertyBinding::constant(1.0), VariableTable::new());
        assert_eq!(graph.node_state(timer), Some(NodeState::Inactive));

        graph.start().unwrap();
        assert_eq!(graph.node_state(timer), Some(NodeState::Active));
        assert_eq!(graph.active_nodes().collect::<Vec<_>>(), vec![timer]);
    }

    #[test]
    fn negative_or_nan_delta_is_rejected() {
        let (mut graph, _) = timer_graph(PropertyBinding::constant(1.0), VariableTable::new());
        graph.start().unwrap();

        assert_eq!(graph.update(-0.1), Err(LifecycleError::InvalidDelta(-0.1)));
        assert!(graph.update(f64::NAN).is_err());
        assert!(graph.update(f64::INFINITY).is_err());
        assert_eq!(graph.tick_count(), 0);
    }

    #[test]
    fn delta_clamp_applies() {
        let mut builder = GraphBuilder::new(GraphConfig::new().with_max_delta_time(0.5));
        let timer = builder.add_node(TimerNode).unwrap();
        builder
            .bind(timer, TimerNode::DURATION, PropertyBinding::constant(1.0))
            .unwrap()
            .entry(timer)
            .unwrap();
        let mut graph = builder.build(VariableTable::new()).unwrap();
        graph.start().unwrap();

        graph.update(10.0).unwrap();
        assert!(graph.is_active(timer));
        graph.update(10.0).unwrap();
        assert!(!graph.is_active(timer));
    }

    #[test]
    fn host_activation_of_active_node_is_an_error() {
        let (mut graph, timer) = timer_graph(PropertyBinding::constant(1.0), VariableTable::new());
        graph.start().unwrap();

        assert_eq!(
            graph.activate(timer),
            Err(LifecycleError::AlreadyActive { node: timer })
        );
        assert_eq!(
            graph.activate(NodeId(7)),
            Err(LifecycleError::UnknownNode { node: NodeId(7) })
        );
    }

    #[test]
    fn stop_deactivates_everything() {
        let (mut graph, timer) = timer_graph(PropertyBinding::constant(5.0), VariableTable::new());
        graph.start().unwrap();
        graph.stop().unwrap();

        assert!(!graph.is_active(timer));
        assert_eq!(
            graph.deactivate(timer),
            Err(LifecycleError::NotActive { node: timer })
        );
    }

    #[test]
    fn summary_counts_work_done() {
        let (mut graph, _) = timer_graph(PropertyBinding::constant(1.0), VariableTable::new());
        graph.start().unwrap();

        let first = graph.update(0.5).unwrap();
        assert_eq!(
            first,
            TickSummary {
                tick: 1,
                updated: 1,
                deactivated: 0,
                activated: 0
            }
        );

        let second = graph.update(0.5).unwrap();
        assert_eq!(second.deactivated, 1);

        let third = graph.update(0.5).unwrap();
        assert_eq!(third.updated, 0);
    }

    #[test]
    fn transition_target_waits_for_next_tick() {
        let mut builder = GraphBuilder::new(GraphConfig::default());
        let first = builder.add_node(TimerNode).unwrap();
        let second = builder.add_node(ElapsedTimeNode).unwrap();
        builder
            .bind(first, TimerNode::DURATION, PropertyBinding::constant(0.0))
            .unwrap()
            .entry(first)
            .unwrap()
            .transition(first, second)
            .unwrap();
        let mut graph = builder.build(VariableTable::new()).unwrap();
        graph.start().unwrap();

        let summary = graph.update(0.25).unwrap();
        assert_eq!(summary.activated, 1);
        assert!(graph.is_active(second));
        // Activated this tick: published on activation, not yet updated.
        assert_eq!(graph.output("Elapsed"), Some(&Value::Float(0.0)));

        graph.update(0.25).unwrap();
        assert_eq!(graph.output("Elapsed"), Some(&Value::Float(0.25)));
    }

    #[test]
    fn self_transition_loops_the_node() {
        let mut builder = GraphBuilder::new(GraphConfig::default());
        let timer = builder.add_node(TimerNode).unwrap();
        builder
            .bind(timer, TimerNode::DURATION, PropertyBinding::constant(1.0))
            .unwrap()
            .entry(timer)
            .unwrap()
            .transition(timer, timer)
            .unwrap();
        let mut graph = builder.build(VariableTable::new()).unwrap();
        graph.start().unwrap();

        for _ in 0..5 {
            graph.update(1.0).unwrap();
            assert!(graph.is_active(timer));
        }
        assert_eq!(graph.node(timer).unwrap().activations(), 6);
    }

    #[test]
    fn transition_into_active_node_is_an_error() {
        let mut builder = GraphBuilder::new(GraphConfig::default());
        let short = builder.add_node(TimerNode).unwrap();
        let long = builder.add_node(TimerNode).unwrap();
        builder
            .bind(short, TimerNode::DURATION, PropertyBinding::constant(0.5))
            .unwrap()
            .bind(long, TimerNode::DURATION, PropertyBinding::constant(5.0))
            .unwrap()
            .entry(short)
            .unwrap()
            .entry(long)
            .unwrap()
            .transition(short, long)
            .unwrap();
        let mut graph = builder.build(VariableTable::new()).unwrap();
        graph.start().unwrap();

        assert_eq!(
            graph.update(1.0),
            Err(LifecycleError::AlreadyActive { node: long })
        );
    }

    #[test]
    fn build_rejects_unbound_inputs() {
        let mut builder = GraphBuilder::new(GraphConfig::default());
        builder.add_node(TimerNode).unwrap();
        assert!(matches!(
            builder.build(VariableTable::new()),
            Err(BuildError::Unbound { .. })
        ));
    }
}
