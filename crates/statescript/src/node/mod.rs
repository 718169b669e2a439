//! Node lifecycle contract.
//!
//! This module defines the [`StateNode`] trait every node type implements,
//! the [`NodeScope`] handed to its callbacks, and the runtime wrapper
//! ([`NodeInstance`]) that enforces the Inactive/Active state machine.

mod instance;

pub use instance::NodeInstance;
pub(crate) use instance::{Erased, ErasedNode};

use crate::{
    BoundInput, FromValue, GraphContext, LifecycleError, NodeId, NodeParameters, PublishedOutput,
    Value,
};

/// Result of a node callback.
pub type NodeResult = Result<(), LifecycleError>;

/// Activation state of a node.
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
pub enum NodeState {
    #[default]
    Inactive,
    Active,
}

impl NodeState {
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, NodeState::Active)
    }
}

/// A node type: declared parameters plus lifecycle hooks over a context type.
///
/// The runtime owns one `Context` per node instance, default-constructs it on
/// first use and hands it to every hook. Hooks never see the context of
/// another node.
///
/// # Lifecycle
///
/// - `on_activate` runs right after the node becomes Active. Any context field
///   measuring "since activation" must be reset here.
/// - `on_update` runs once per tick while Active. It may resolve inputs any
///   number of times and may call [`NodeScope::deactivate_node`].
/// - `on_deactivate` runs when the node leaves the Active state.
///
/// [`NodeScope::deactivate_node`] only takes effect from `on_update`. A request
/// made from `on_activate` or `on_deactivate` is dropped with a warning and
/// the node's state is left as the lifecycle step set it.
///
/// A failed resolution is not an error: treat it as "not yet available" and
/// skip this tick's decision.
pub trait StateNode: Send + 'static {
    /// Per-instance mutable state.
    type Context: Default + Send + 'static;

    /// One-line human-readable summary of what the node does.
    const DESCRIPTION: &'static str;

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    /// Declares inputs and outputs. Called once when the node is added to a graph.
    fn define_parameters(&self, parameters: &mut NodeParameters);

    fn on_activate(&self, _context: &mut Self::Context, _scope: &mut NodeScope<'_>) -> NodeResult {
        Ok(())
    }

    fn on_update(
        &self,
        delta_time: f64,
        context: &mut Self::Context,
        scope: &mut NodeScope<'_>,
    ) -> NodeResult;

    fn on_deactivate(
        &self,
        _context: &mut Self::Context,
        _scope: &mut NodeScope<'_>,
    ) -> NodeResult {
        Ok(())
    }
}

/// View of the graph given to a node for the duration of one callback.
pub struct NodeScope<'a> {
    pub(crate) node: NodeId,
    inputs: &'a [BoundInput],
    outputs: &'a [PublishedOutput],
    pub(crate) graph: &'a mut GraphContext,
    deactivate_requested: bool,
}

impl<'a> NodeScope<'a> {
    pub(crate) fn new(
        node: NodeId,
        inputs: &'a [BoundInput],
        outputs: &'a [PublishedOutput],
        graph: &'a mut GraphContext,
    ) -> Self {
        Self {
            node,
            inputs,
            outputs,
            graph,
            deactivate_requested: false,
        }
    }

    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// Read access to the whole graph context.
    pub fn graph(&self) -> &GraphContext {
        &*self.graph
    }

    /// Bound input at `slot`.
    pub fn input(&self, slot: usize) -> Option<&BoundInput> {
        self.inputs.get(slot)
    }

    /// Name the input at `slot` resolves through (`None` for constants).
    pub fn bound_name(&self, slot: usize) -> Option<&str> {
        self.inputs.get(slot)?.binding.bound_name()
    }

    /// Resolves the input at `slot` as `T`.
    ///
    /// Fails when the slot does not exist, the source has no value yet, or the
    /// value is of another kind.
    pub fn try_resolve<T: FromValue>(&self, slot: usize) -> Option<T> {
        let input = self.inputs.get(slot)?;
        self.graph.resolve_binding(&input.binding)
    }

    /// Publishes `value` on the output at `slot`.
    ///
    /// The value becomes visible immediately to every node updated after this
    /// one in the same tick.
    pub fn publish(&mut self, slot: usize, value: impl Into<Value>) -> NodeResult {
        let node = self.node;
        let output = self
            .outputs
            .get(slot)
            .ok_or(LifecycleError::UnknownOutputSlot { node, slot })?;

        let value = value.into();
        if value.kind() != output.variable.kind {
            return Err(LifecycleError::OutputKindMismatch {
                node,
                output: output.name.to_string(),
                expected: output.variable.kind,
                actual: value.kind(),
            });
        }

        self.graph.publish(&output.name, value);
        Ok(())
    }

    /// Requests that this node deactivate once the current update returns.
    ///
    /// Only honored from `on_update`; requests from other hooks are dropped
    /// with a warning.
    pub fn deactivate_node(&mut self) {
        self.deactivate_requested = true;
    }

    pub fn deactivation_requested(&self) -> bool {
        self.deactivate_requested
    }
}
