//! Shared per-graph state handed to every node callback.

mod store;
mod variables;

pub use store::NodeContextStore;
pub use variables::VariableTable;

use std::collections::HashMap;
use std::sync::Arc;

use crate::{FromValue, LifecycleError, NodeId, PropertyBinding, Value};

/// Single point of truth for property resolution and per-node state.
///
/// A `GraphContext` owns:
/// - the node-context arena ([`NodeContextStore`]),
/// - the host's external [`VariableTable`],
/// - the table of outputs published by nodes, keyed by published name.
///
/// Published names are registered when the graph is built; a node can only
/// publish under a name the builder validated.
#[derive(Debug)]
pub struct GraphContext {
    contexts: NodeContextStore,
    variables: VariableTable,
    outputs: HashMap<Arc<str>, Option<Value>>,
}

impl GraphContext {
    pub(crate) fn new<I>(node_count: usize, variables: VariableTable, published: I) -> Self
    where
        I: IntoIterator<Item = Arc<str>>,
    {
        Self {
            contexts: NodeContextStore::new(node_count),
            variables,
            outputs: published.into_iter().map(|name| (name, None)).collect(),
        }
    }

    /// Returns the context of `node`, default-constructing `T` on first access.
    ///
    /// Asking for a different `T` than the one already materialized for the
    /// node is a programming error and returns
    /// [`LifecycleError::ContextTypeMismatch`].
    pub fn node_context<T>(&mut self, node: NodeId) -> Result<&mut T, LifecycleError>
    where
        T: Default + Send + 'static,
    {
        self.contexts.get_or_default(node)
    }

    /// Resolves `bound_name` as a value of type `T`.
    ///
    /// Lookup order is the external variable table first, then published node
    /// outputs. The first source holding a value decides the outcome: if its
    /// kind is not `T`'s kind, resolution fails rather than falling through.
    /// A name with no value anywhere fails as well.
    pub fn try_resolve<T: FromValue>(&self, bound_name: &str) -> Option<T> {
        let found = self
            .variables
            .get(bound_name)
            .or_else(|| self.outputs.get(bound_name).and_then(Option::as_ref));

        let Some(value) = found else {
            tracing::trace!(
                target: "statescript::resolve",
                name = bound_name,
                "no value bound"
            );
            return None;
        };

        let resolved = T::from_value(value);
        if resolved.is_none() {
            tracing::trace!(
                target: "statescript::resolve",
                name = bound_name,
                expected = %T::KIND,
                actual = %value.kind(),
                "kind mismatch"
            );
        }
        resolved
    }

    /// Resolves an input binding as a value of type `T`.
    pub fn resolve_binding<T: FromValue>(&self, binding: &PropertyBinding) -> Option<T> {
        match binding {
            PropertyBinding::Constant(value) => T::from_value(value),
            PropertyBinding::Variable(name) | PropertyBinding::Output(name) => {
                self.try_resolve(name)
            }
        }
    }

    /// Last value published under `name`, if any.
    pub fn output(&self, name: &str) -> Option<&Value> {
        self.outputs.get(name).and_then(Option::as_ref)
    }

    /// Returns true if `name` is a published output of this graph.
    pub fn is_published(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }

    pub fn variables(&self) -> &VariableTable {
        &self.variables
    }

    pub fn contexts(&self) -> &NodeContextStore {
        &self.contexts
    }

    pub(crate) fn variables_mut(&mut self) -> &mut VariableTable {
        &mut self.variables
    }

    pub(crate) fn contexts_mut(&mut self) -> &mut NodeContextStore {
        &mut self.contexts
    }

    /// Stores `value` under a registered published name.
    ///
    /// Returns false if the name was never registered.
    pub(crate) fn publish(&mut self, name: &str, value: Value) -> bool {
        match self.outputs.get_mut(name) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }
}
