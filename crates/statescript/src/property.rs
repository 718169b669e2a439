//! Parameter declarations and bindings.
//!
//! A node type declares its inputs and outputs once through
//! [`NodeParameters`]. The graph builder then attaches a [`PropertyBinding`]
//! to every input and a published name to every output; both are frozen once
//! the graph is built.

use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::{GraphConfig, Value, ValueKind};

/// Declared input of a node type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputProperty {
    /// Display name, unique within the node type.
    pub name: &'static str,
    pub kind: ValueKind,
    /// Zero-based slot index scoped to the node.
    pub slot: usize,
}

/// Declared output of a node type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputVariable {
    /// Default published name. Builders may publish under a different name.
    pub name: &'static str,
    pub kind: ValueKind,
    pub slot: usize,
}

/// Source an input property reads from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyBinding {
    /// Literal value fixed at build time.
    Constant(Value),
    /// Host-supplied external variable.
    Variable(Arc<str>),
    /// Output published by another node in the same graph.
    Output(Arc<str>),
}

impl PropertyBinding {
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    pub fn variable(name: &str) -> Self {
        Self::Variable(Arc::from(name))
    }

    pub fn output(name: &str) -> Self {
        Self::Output(Arc::from(name))
    }

    /// Name the binding resolves through, if it is not a constant.
    pub fn bound_name(&self) -> Option<&str> {
        match self {
            Self::Constant(_) => None,
            Self::Variable(name) | Self::Output(name) => Some(name),
        }
    }
}

/// Collector passed to [`StateNode::define_parameters`](crate::StateNode::define_parameters).
///
/// Slots are assigned in declaration order. Declaring past
/// [`GraphConfig::MAX_NODE_INPUTS`] or [`GraphConfig::MAX_NODE_OUTPUTS`] marks
/// the declaration as overflowed; the builder rejects it.
#[derive(Debug, Default)]
pub struct NodeParameters {
    inputs: ArrayVec<InputProperty, { GraphConfig::MAX_NODE_INPUTS }>,
    outputs: ArrayVec<OutputVariable, { GraphConfig::MAX_NODE_OUTPUTS }>,
    inputs_overflowed: bool,
    outputs_overflowed: bool,
}

impl NodeParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an input property and returns its slot.
    pub fn input(&mut self, name: &'static str, kind: ValueKind) -> usize {
        let slot = self.inputs.len();
        if self
            .inputs
            .try_push(InputProperty { name, kind, slot })
            .is_err()
        {
            self.inputs_overflowed = true;
        }
        slot
    }

    /// Declares an output variable and returns its slot.
    pub fn output(&mut self, name: &'static str, kind: ValueKind) -> usize {
        let slot = self.outputs.len();
        if self
            .outputs
            .try_push(OutputVariable { name, kind, slot })
            .is_err()
        {
            self.outputs_overflowed = true;
        }
        slot
    }

    pub fn inputs(&self) -> &[InputProperty] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputVariable] {
        &self.outputs
    }

    pub(crate) fn inputs_overflowed(&self) -> bool {
        self.inputs_overflowed
    }

    pub(crate) fn outputs_overflowed(&self) -> bool {
        self.outputs_overflowed
    }
}

/// An input property together with its frozen binding.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundInput {
    pub property: InputProperty,
    pub binding: PropertyBinding,
}

/// An output variable together with the graph-unique name it publishes under.
#[derive(Clone, Debug, PartialEq)]
pub struct PublishedOutput {
    pub variable: OutputVariable,
    pub name: Arc<str>,
}
