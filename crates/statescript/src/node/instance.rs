//! Runtime wrapper enforcing the node state machine.

use tracing::{debug, warn};

use super::{NodeResult, NodeScope, NodeState, StateNode};
use crate::{BoundInput, GraphContext, LifecycleError, NodeId, PublishedOutput};

/// Object-safe face of a [`StateNode`], used by the graph to hold
/// heterogeneous node types.
pub(crate) trait ErasedNode: Send {
    fn description(&self) -> &'static str;
    fn type_name(&self) -> &'static str;
    fn activate(&self, scope: &mut NodeScope<'_>) -> NodeResult;
    fn update(&self, delta_time: f64, scope: &mut NodeScope<'_>) -> NodeResult;
    fn deactivate(&self, scope: &mut NodeScope<'_>) -> NodeResult;
}

pub(crate) struct Erased<N>(pub(crate) N);

impl<N: StateNode> Erased<N> {
    /// Runs `hook` with the node's context moved out of the arena.
    fn with_context<F>(scope: &mut NodeScope<'_>, hook: F) -> NodeResult
    where
        F: FnOnce(&mut N::Context, &mut NodeScope<'_>) -> NodeResult,
    {
        let node = scope.node;
        let mut context = scope.graph.contexts_mut().take::<N::Context>(node)?;
        let result = hook(&mut *context, scope);
        scope.graph.contexts_mut().restore(node, context);
        result
    }
}

impl<N: StateNode> ErasedNode for Erased<N> {
    fn description(&self) -> &'static str {
        self.0.description()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<N>()
    }

    fn activate(&self, scope: &mut NodeScope<'_>) -> NodeResult {
        Self::with_context(scope, |context, scope| self.0.on_activate(context, scope))
    }

    fn update(&self, delta_time: f64, scope: &mut NodeScope<'_>) -> NodeResult {
        Self::with_context(scope, |context, scope| {
            self.0.on_update(delta_time, context, scope)
        })
    }

    fn deactivate(&self, scope: &mut NodeScope<'_>) -> NodeResult {
        Self::with_context(scope, |context, scope| self.0.on_deactivate(context, scope))
    }
}

/// A node placed in a graph: its type, frozen bindings and activation state.
pub struct NodeInstance {
    id: NodeId,
    node: Box<dyn ErasedNode>,
    state: NodeState,
    inputs: Vec<BoundInput>,
    outputs: Vec<PublishedOutput>,
    activations: u32,
}

impl NodeInstance {
    pub(crate) fn new(
        id: NodeId,
        node: Box<dyn ErasedNode>,
        inputs: Vec<BoundInput>,
        outputs: Vec<PublishedOutput>,
    ) -> Self {
        Self {
            id,
            node,
            state: NodeState::Inactive,
            inputs,
            outputs,
            activations: 0,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn description(&self) -> &'static str {
        self.node.description()
    }

    pub fn type_name(&self) -> &'static str {
        self.node.type_name()
    }

    pub fn inputs(&self) -> &[BoundInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[PublishedOutput] {
        &self.outputs
    }

    /// Number of times this node has been activated.
    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// Inactive → Active, then runs `on_activate`.
    pub fn activate(&mut self, graph: &mut GraphContext) -> NodeResult {
        if self.state.is_active() {
            return Err(LifecycleError::AlreadyActive { node: self.id });
        }

        self.state = NodeState::Active;
        self.activations = self.activations.saturating_add(1);
        debug!(
            target: "statescript::graph",
            node = %self.id,
            node_type = self.node.type_name(),
            "activated"
        );

        let mut scope = NodeScope::new(self.id, &self.inputs, &self.outputs, graph);
        let result = self.node.activate(&mut scope);
        self.warn_ignored_request(&scope, "on_activate");
        result
    }

    /// Runs `on_update` and performs a requested self-deactivation.
    ///
    /// Returns `true` if the node deactivated during this update.
    pub fn update(
        &mut self,
        delta_time: f64,
        graph: &mut GraphContext,
    ) -> Result<bool, LifecycleError> {
        if !self.state.is_active() {
            return Err(LifecycleError::NotActive { node: self.id });
        }

        let requested = {
            let mut scope = NodeScope::new(self.id, &self.inputs, &self.outputs, graph);
            self.node.update(delta_time, &mut scope)?;
            scope.deactivation_requested()
        };

        if requested {
            self.deactivate(graph)?;
        }
        Ok(requested)
    }

    /// Active → Inactive, running `on_deactivate` on the way out.
    pub fn deactivate(&mut self, graph: &mut GraphContext) -> NodeResult {
        if !self.state.is_active() {
            return Err(LifecycleError::NotActive { node: self.id });
        }

        let result = {
            let mut scope = NodeScope::new(self.id, &self.inputs, &self.outputs, graph);
            let result = self.node.deactivate(&mut scope);
            self.warn_ignored_request(&scope, "on_deactivate");
            result
        };
        self.state = NodeState::Inactive;
        debug!(
            target: "statescript::graph",
            node = %self.id,
            node_type = self.node.type_name(),
            "deactivated"
        );
        result
    }

    fn warn_ignored_request(&self, scope: &NodeScope<'_>, hook: &'static str) {
        if scope.deactivation_requested() {
            warn!(
                target: "statescript::graph",
                node = %self.id,
                node_type = self.node.type_name(),
                hook,
                "deactivation requested outside on_update; ignored"
            );
        }
    }
}

impl core::fmt::Debug for NodeInstance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeInstance")
            .field("id", &self.id)
            .field("type", &self.node.type_name())
            .field("state", &self.state)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeParameters, VariableTable};

    #[derive(Default)]
    struct Ticks {
        count: u32,
    }

    /// Counts updates and stops after the second.
    struct TwoTicks;

    impl StateNode for TwoTicks {
        type Context = Ticks;
        const DESCRIPTION: &'static str = "Deactivates on its second update.";

        fn define_parameters(&self, _parameters: &mut NodeParameters) {}

        fn on_activate(&self, context: &mut Ticks, _scope: &mut NodeScope<'_>) -> NodeResult {
            context.count = 0;
            Ok(())
        }

        fn on_update(
            &self,
            _delta_time: f64,
            context: &mut Ticks,
            scope: &mut NodeScope<'_>,
        ) -> NodeResult {
            context.count += 1;
            if context.count >= 2 {
                scope.deactivate_node();
            }
            Ok(())
        }
    }

    /// Asks to stop from every hook.
    struct Impatient;

    impl StateNode for Impatient {
        type Context = ();
        const DESCRIPTION: &'static str = "Requests deactivation from every hook.";

        fn define_parameters(&self, _parameters: &mut NodeParameters) {}

        fn on_activate(&self, _context: &mut (), scope: &mut NodeScope<'_>) -> NodeResult {
            scope.deactivate_node();
            Ok(())
        }

        fn on_update(
            &self,
            _delta_time: f64,
            _context: &mut (),
            scope: &mut NodeScope<'_>,
        ) -> NodeResult {
            scope.deactivate_node();
            Ok(())
        }

        fn on_deactivate(&self, _context: &mut (), scope: &mut NodeScope<'_>) -> NodeResult {
            scope.deactivate_node();
            Ok(())
        }
    }

    fn fixture() -> (NodeInstance, GraphContext) {
        let instance = NodeInstance::new(
            NodeId(0),
            Box::new(Erased(TwoTicks)),
            Vec::new(),
            Vec::new(),
        );
        let graph = GraphContext::new(1, VariableTable::new(), std::iter::empty());
        (instance, graph)
    }

    #[test]
    fn starts_inactive() {
        let (instance, _) = fixture();
        assert_eq!(instance.state(), NodeState::Inactive);
        assert_eq!(instance.description(), "Deactivates on its second update.");
    }

    #[test]
    fn double_activation_is_an_error() {
        let (mut instance, mut graph) = fixture();
        instance.activate(&mut graph).unwrap();

        assert_eq!(
            instance.activate(&mut graph),
            Err(LifecycleError::AlreadyActive { node: NodeId(0) })
        );
        assert_eq!(instance.activations(), 1);
    }

    #[test]
    fn updating_inactive_node_is_an_error() {
        let (mut instance, mut graph) = fixture();
        assert_eq!(
            instance.update(0.1, &mut graph),
            Err(LifecycleError::NotActive { node: NodeId(0) })
        );
    }

    #[test]
    fn deactivating_inactive_node_is_an_error() {
        let (mut instance, mut graph) = fixture();
        assert_eq!(
            instance.deactivate(&mut graph),
            Err(LifecycleError::NotActive { node: NodeId(0) })
        );
    }

    #[test]
    fn self_deactivation_takes_effect_after_update() {
        let (mut instance, mut graph) = fixture();
        instance.activate(&mut graph).unwrap();

        assert_eq!(instance.update(0.1, &mut graph), Ok(false));
        assert!(instance.is_active());
        assert_eq!(instance.update(0.1, &mut graph), Ok(true));
        assert!(!instance.is_active());
    }

    #[test]
    fn context_persists_between_callbacks_and_resets_on_activate() {
        let (mut instance, mut graph) = fixture();
        instance.activate(&mut graph).unwrap();
        instance.update(0.1, &mut graph).unwrap();
        assert_eq!(graph.node_context::<Ticks>(NodeId(0)).unwrap().count, 1);

        instance.deactivate(&mut graph).unwrap();
        instance.activate(&mut graph).unwrap();
        assert_eq!(graph.node_context::<Ticks>(NodeId(0)).unwrap().count, 0);
        assert_eq!(instance.activations(), 2);
    }

    #[test]
    fn deactivation_request_outside_update_is_ignored() {
        let mut instance =
            NodeInstance::new(NodeId(0), Box::new(Erased(Impatient)), Vec::new(), Vec::new());
        let mut graph = GraphContext::new(1, VariableTable::new(), std::iter::empty());

        instance.activate(&mut graph).unwrap();
        assert!(instance.is_active());

        assert_eq!(instance.update(0.1, &mut graph), Ok(true));
        assert_eq!(instance.state(), NodeState::Inactive);

        instance.activate(&mut graph).unwrap();
        instance.deactivate(&mut graph).unwrap();
        assert_eq!(instance.state(), NodeState::Inactive);
    }

    #[test]
    fn activation_count_saturates() {
        let (mut instance, mut graph) = fixture();
        instance.activations = u32::MAX;

        instance.activate(&mut graph).unwrap();
        assert_eq!(instance.activations(), u32::MAX);
    }
}
