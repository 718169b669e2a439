//! Arena of per-node context objects.

use std::any::{Any, type_name};

use crate::{LifecycleError, NodeId};

struct Slot {
    value: Box<dyn Any + Send>,
    type_name: &'static str,
}

impl Slot {
    fn new<T: Send + 'static>(value: Box<T>) -> Self {
        Self {
            value,
            type_name: type_name::<T>(),
        }
    }
}

/// Per-graph storage of node contexts, indexed by [`NodeId`].
///
/// Each slot starts empty and is default-constructed on first access with the
/// type the caller asks for. From then on the slot only answers to that type.
/// Contexts live exactly as long as the store, which the graph owns.
pub struct NodeContextStore {
    slots: Vec<Option<Slot>>,
}

impl NodeContextStore {
    /// Allocates one empty slot per node.
    pub fn new(node_count: usize) -> Self {
        let mut slots = Vec::with_capacity(node_count);
        slots.resize_with(node_count, || None);
        Self { slots }
    }

    /// Number of node slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns true if the node's context has been constructed.
    pub fn is_materialized(&self, node: NodeId) -> bool {
        matches!(self.slots.get(node.index()), Some(Some(_)))
    }

    /// Type name of the materialized context, if any.
    pub fn type_name_of(&self, node: NodeId) -> Option<&'static str> {
        self.slots
            .get(node.index())
            .and_then(|slot| slot.as_ref())
            .map(|slot| slot.type_name)
    }

    /// Returns the node's context, constructing `T::default()` on first access.
    pub fn get_or_default<T>(&mut self, node: NodeId) -> Result<&mut T, LifecycleError>
    where
        T: Default + Send + 'static,
    {
        let entry = self
            .slots
            .get_mut(node.index())
            .ok_or(LifecycleError::UnknownNode { node })?;
        let slot = entry.get_or_insert_with(|| Slot::new(Box::new(T::default())));
        let existing = slot.type_name;
        slot.value
            .downcast_mut::<T>()
            .ok_or(LifecycleError::ContextTypeMismatch {
                node,
                existing,
                requested: type_name::<T>(),
            })
    }

    /// Moves the node's context out of its slot for the duration of a callback.
    ///
    /// The slot is empty until [`restore`](Self::restore) puts the box back, so
    /// no allocation happens after first access.
    pub(crate) fn take<T>(&mut self, node: NodeId) -> Result<Box<T>, LifecycleError>
    where
        T: Default + Send + 'static,
    {
        let entry = self
            .slots
            .get_mut(node.index())
            .ok_or(LifecycleError::UnknownNode { node })?;
        let Some(Slot { value, type_name }) = entry.take() else {
            return Ok(Box::new(T::default()));
        };
        match value.downcast::<T>() {
            Ok(context) => Ok(context),
            Err(value) => {
                *entry = Some(Slot { value, type_name });
                Err(LifecycleError::ContextTypeMismatch {
                    node,
                    existing: type_name,
                    requested: std::any::type_name::<T>(),
                })
            }
        }
    }

    pub(crate) fn restore<T: Send + 'static>(&mut self, node: NodeId, context: Box<T>) {
        if let Some(entry) = self.slots.get_mut(node.index()) {
            *entry = Some(Slot::new(context));
        }
    }
}

impl core::fmt::Debug for NodeContextStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(
                self.slots
                    .iter()
                    .map(|slot| slot.as_ref().map(|slot| slot.type_name)),
            )
            .finish()
    }
}
