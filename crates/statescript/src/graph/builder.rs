//! Graph construction and validation.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use tracing::{info, warn};

use super::{Graph, order};
use crate::node::Erased;
use crate::{
    BoundInput, BuildError, GraphConfig, GraphContext, InputProperty, NodeId, NodeInstance,
    NodeParameters, OutputVariable, PropertyBinding, PublishedOutput, StateNode, ValueKind,
    VariableTable, node::ErasedNode,
};

struct PendingNode {
    node: Box<dyn ErasedNode>,
    inputs: Vec<InputProperty>,
    outputs: Vec<OutputVariable>,
    bindings: Vec<Option<PropertyBinding>>,
    published: Vec<Arc<str>>,
}

/// Assembles nodes, bindings and transitions into a [`Graph`].
///
/// Every structural problem is reported by [`build`](Self::build) (or earlier,
/// by the call that introduced it); a graph that builds never runs with
/// missing wiring.
///
/// # Example
///
/// ```
/// use statescript::{GraphBuilder, GraphConfig, PropertyBinding, VariableTable};
/// use statescript::nodes::TimerNode;
///
/// let mut builder = GraphBuilder::new(GraphConfig::default());
/// let timer = builder.add_node(TimerNode)?;
/// builder
///     .bind(timer, TimerNode::DURATION, PropertyBinding::constant(2.0))?
///     .entry(timer)?;
///
/// let mut graph = builder.build(VariableTable::new())?;
/// graph.start()?;
/// graph.update(1.0)?;
/// assert!(graph.is_active(timer));
/// graph.update(1.0)?;
/// assert!(!graph.is_active(timer));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct GraphBuilder {
    config: GraphConfig,
    nodes: Vec<PendingNode>,
    entries: Vec<NodeId>,
    transitions: Vec<(NodeId, NodeId)>,
}

impl GraphBuilder {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            entries: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Number of nodes added so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node and collects its parameter declarations.
    pub fn add_node<N: StateNode>(&mut self, node: N) -> Result<NodeId, BuildError> {
        let max = self.config.node_limit();
        if self.nodes.len() >= max {
            return Err(BuildError::TooManyNodes { max });
        }

        let mut parameters = NodeParameters::new();
        node.define_parameters(&mut parameters);
        if parameters.inputs_overflowed() {
            return Err(BuildError::TooManyParameters {
                node_type: std::any::type_name::<N>(),
                what: "inputs",
                max: GraphConfig::MAX_NODE_INPUTS,
            });
        }
        if parameters.outputs_overflowed() {
            return Err(BuildError::TooManyParameters {
                node_type: std::any::type_name::<N>(),
                what: "outputs",
                max: GraphConfig::MAX_NODE_OUTPUTS,
            });
        }

        let id = NodeId(self.nodes.len() as u32);
        let inputs = parameters.inputs().to_vec();
        let outputs = parameters.outputs().to_vec();
        self.nodes.push(PendingNode {
            node: Box::new(Erased(node)),
            bindings: vec![None; inputs.len()],
            published: outputs.iter().map(|output| Arc::from(output.name)).collect(),
            inputs,
            outputs,
        });
        Ok(id)
    }

    /// Binds the input at `slot` of `node` to a source.
    pub fn bind(
        &mut self,
        node: NodeId,
        slot: usize,
        binding: PropertyBinding,
    ) -> Result<&mut Self, BuildError> {
        let pending = self.pending_mut(node)?;
        let input = *pending
            .inputs
            .get(slot)
            .ok_or(BuildError::UnknownInputSlot { node, slot })?;
        let bound = &mut pending.bindings[slot];
        if bound.is_some() {
            return Err(BuildError::AlreadyBound {
                node,
                input: input.name,
            });
        }
        *bound = Some(binding);
        Ok(self)
    }

    /// Publishes the output at `slot` of `node` under `name` instead of its
    /// declared name.
    pub fn publish_as(
        &mut self,
        node: NodeId,
        slot: usize,
        name: &str,
    ) -> Result<&mut Self, BuildError> {
        let pending = self.pending_mut(node)?;
        let published = pending
            .published
            .get_mut(slot)
            .ok_or(BuildError::UnknownOutputSlot { node, slot })?;
        *published = Arc::from(name);
        Ok(self)
    }

    /// Marks `node` to be activated by [`Graph::start`].
    pub fn entry(&mut self, node: NodeId) -> Result<&mut Self, BuildError> {
        self.pending_mut(node)?;
        if !self.entries.contains(&node) {
            self.entries.push(node);
        }
        Ok(self)
    }

    /// Activates `to` whenever `from` deactivates itself.
    pub fn transition(&mut self, from: NodeId, to: NodeId) -> Result<&mut Self, BuildError> {
        self.pending_mut(from)?;
        self.pending_mut(to)?;
        self.transitions.push((from, to));
        Ok(self)
    }

    /// Validates the definition and builds the graph.
    pub fn build(self, variables: VariableTable) -> Result<Graph, BuildError> {
        let producers = self.collect_published()?;

        let mut edges = Vec::new();
        for (index, pending) in self.nodes.iter().enumerate() {
            let node = NodeId(index as u32);
            for (input, binding) in pending.inputs.iter().zip(&pending.bindings) {
                let binding = binding.as_ref().ok_or(BuildError::Unbound {
                    node,
                    input: input.name,
                })?;
                if let Some(producer) =
                    validate_binding(node, input, binding, &producers, &variables)?
                {
                    edges.push((producer, node));
                }
            }
        }

        let order = order::update_order(self.nodes.len(), &edges)?;

        let mut successors = vec![Vec::new(); self.nodes.len()];
        for (from, to) in &self.transitions {
            successors[from.index()].push(*to);
        }

        let context = GraphContext::new(
            self.nodes.len(),
            variables,
            producers.keys().map(Arc::clone),
        );

        let nodes: Vec<NodeInstance> = self
            .nodes
            .into_iter()
            .enumerate()
            .map(|(index, pending)| {
                let inputs = pending
                    .inputs
                    .into_iter()
                    .zip(pending.bindings)
                    .filter_map(|(property, binding)| {
                        binding.map(|binding| BoundInput { property, binding })
                    })
                    .collect();
                let outputs = pending
                    .outputs
                    .into_iter()
                    .zip(pending.published)
                    .map(|(variable, name)| PublishedOutput { variable, name })
                    .collect();
                NodeInstance::new(NodeId(index as u32), pending.node, inputs, outputs)
            })
            .collect();

        info!(
            target: "statescript::builder",
            nodes = nodes.len(),
            edges = edges.len(),
            entries = self.entries.len(),
            transitions = self.transitions.len(),
            "graph built"
        );

        Ok(Graph::new(
            self.config,
            nodes,
            order,
            self.entries,
            successors,
            context,
        ))
    }

    fn pending_mut(&mut self, node: NodeId) -> Result<&mut PendingNode, BuildError> {
        self.nodes
            .get_mut(node.index())
            .ok_or(BuildError::UnknownNode { node })
    }

    /// Maps every published output name to its producer and kind.
    fn collect_published(&self) -> Result<HashMap<Arc<str>, (NodeId, ValueKind)>, BuildError> {
        let mut producers = HashMap::new();
        for (index, pending) in self.nodes.iter().enumerate() {
            let node = NodeId(index as u32);
            for (output, name) in pending.outputs.iter().zip(&pending.published) {
                match producers.entry(Arc::clone(name)) {
                    Entry::Occupied(existing) => {
                        let (first, _) = *existing.get();
                        return Err(BuildError::DuplicateOutput {
                            name: name.to_string(),
                            first,
                            second: node,
                        });
                    }
                    Entry::Vacant(slot) => {
                        slot.insert((node, output.kind));
                    }
                }
            }
        }
        Ok(producers)
    }
}

/// Checks one binding and returns the producer it depends on, if any.
fn validate_binding(
    node: NodeId,
    input: &InputProperty,
    binding: &PropertyBinding,
    producers: &HashMap<Arc<str>, (NodeId, ValueKind)>,
    variables: &VariableTable,
) -> Result<Option<NodeId>, BuildError> {
    let mismatch = |actual: ValueKind| BuildError::BindingKindMismatch {
        node,
        input: input.name,
        expected: input.kind,
        actual,
    };

    match binding {
        PropertyBinding::Constant(value) => {
            if value.kind() != input.kind {
                return Err(mismatch(value.kind()));
            }
            Ok(None)
        }
        PropertyBinding::Variable(name) => {
            if let Some(kind) = variables.kind(name) {
                if kind != input.kind {
                    return Err(mismatch(kind));
                }
            }
            if producers.contains_key(name) {
                warn!(
                    target: "statescript::builder",
                    %node,
                    name = &**name,
                    "variable binding shares its name with a published output"
                );
            }
            Ok(None)
        }
        PropertyBinding::Output(name) => {
            let &(producer, kind) =
                producers
                    .get(name)
                    .ok_or_else(|| BuildError::DanglingOutput {
                        node,
                        input: input.name,
                        output: name.to_string(),
                    })?;
            if kind != input.kind {
                return Err(mismatch(kind));
            }
            if variables.contains(name) {
                warn!(
                    target: "statescript::builder",
                    %node,
                    name = &**name,
                    "external variable shadows the bound output"
                );
            }
            Ok(Some(producer))
        }
    }
}
