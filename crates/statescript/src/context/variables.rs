//! Host-supplied external variables.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{Value, ValueKind, VariableError};

#[derive(Clone, Debug, PartialEq)]
struct Variable {
    kind: ValueKind,
    value: Option<Value>,
}

/// Named, typed values written by the host and read by bindings.
///
/// A variable can be declared with a kind before it has a value; bindings to
/// it fail to resolve until the host sets one. Once a variable's kind is known
/// it is fixed: writes of another kind are rejected until the variable is
/// removed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariableTable {
    entries: HashMap<Arc<str>, Variable>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name` with a kind and no value.
    pub fn declare(&mut self, name: &str, kind: ValueKind) -> Result<(), VariableError> {
        match self.entries.get(name) {
            Some(existing) if existing.kind != kind => Err(VariableError::KindMismatch {
                name: name.to_owned(),
                declared: existing.kind,
                actual: kind,
            }),
            Some(_) => Ok(()),
            None => {
                self.entries
                    .insert(Arc::from(name), Variable { kind, value: None });
                Ok(())
            }
        }
    }

    /// Sets the value of `name`, declaring it if needed.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), VariableError> {
        let value = value.into();
        if let Some(existing) = self.entries.get_mut(name) {
            if existing.kind != value.kind() {
                return Err(VariableError::KindMismatch {
                    name: name.to_owned(),
                    declared: existing.kind,
                    actual: value.kind(),
                });
            }
            existing.value = Some(value);
            return Ok(());
        }
        self.entries.insert(
            Arc::from(name),
            Variable {
                kind: value.kind(),
                value: Some(value),
            },
        );
        Ok(())
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, VariableError> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Clears the value of `name` but keeps its declared kind.
    pub fn unset(&mut self, name: &str) -> Option<Value> {
        self.entries.get_mut(name).and_then(|var| var.value.take())
    }

    /// Removes `name` entirely, forgetting its kind.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.remove(name).and_then(|var| var.value)
    }

    /// Current value of `name`, if it has one.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).and_then(|var| var.value.as_ref())
    }

    /// Declared kind of `name`, whether or not it has a value.
    pub fn kind(&self, name: &str) -> Option<ValueKind> {
        self.entries.get(name).map(|var| var.kind)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
