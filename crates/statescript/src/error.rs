//! Error infrastructure for the graph runtime.
//!
//! Binding-resolution failures are not errors: they surface as `None` from
//! the resolution API and stay local to the node that asked. Everything in
//! this module is something the host must look at.
//!
//! - [`BuildError`]: the graph definition is malformed and cannot be built.
//! - [`LifecycleError`]: a node or the host misused the lifecycle contract.
//! - [`VariableError`]: the host wrote an external variable with the wrong kind.

use crate::{NodeId, ValueKind};

/// Severity level of an error, used for categorization and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input rejected before it could affect a running graph.
    ///
    /// Examples: dangling binding, cyclic output dependency, mistyped variable.
    Validation,

    /// Contract violation in a running graph. Indicates a bug in a node or host.
    ///
    /// Examples: double activation, updating an inactive node.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common interface for all runtime errors.
pub trait StatescriptError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static identifier for this error variant.
    fn error_code(&self) -> &'static str;
}

/// Lifecycle contract violations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LifecycleError {
    #[error("{node} is already active")]
    AlreadyActive { node: NodeId },

    #[error("{node} is not active")]
    NotActive { node: NodeId },

    #[error("{node} does not exist in this graph")]
    UnknownNode { node: NodeId },

    #[error("{node} context is `{existing}`, requested `{requested}`")]
    ContextTypeMismatch {
        node: NodeId,
        existing: &'static str,
        requested: &'static str,
    },

    #[error("{node} has no output slot {slot}")]
    UnknownOutputSlot { node: NodeId, slot: usize },

    #[error("{node} output `{output}` is {expected}, published {actual}")]
    OutputKindMismatch {
        node: NodeId,
        output: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("tick delta must be finite and non-negative (got {0})")]
    InvalidDelta(f64),
}

impl StatescriptError for LifecycleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyActive { .. } => "ALREADY_ACTIVE",
            Self::NotActive { .. } => "NOT_ACTIVE",
            Self::UnknownNode { .. } => "UNKNOWN_NODE",
            Self::ContextTypeMismatch { .. } => "CONTEXT_TYPE_MISMATCH",
            Self::UnknownOutputSlot { .. } => "UNKNOWN_OUTPUT_SLOT",
            Self::OutputKindMismatch { .. } => "OUTPUT_KIND_MISMATCH",
            Self::InvalidDelta(_) => "INVALID_DELTA",
        }
    }
}

/// Malformed graph definitions, detected while building.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("graph exceeds the node limit of {max}")]
    TooManyNodes { max: usize },

    #[error("node type `{node_type}` declares more than {max} {what}")]
    TooManyParameters {
        node_type: &'static str,
        what: &'static str,
        max: usize,
    },

    #[error("{node} does not exist in this graph")]
    UnknownNode { node: NodeId },

    #[error("{node} has no input slot {slot}")]
    UnknownInputSlot { node: NodeId, slot: usize },

    #[error("{node} has no output slot {slot}")]
    UnknownOutputSlot { node: NodeId, slot: usize },

    #[error("{node} input `{input}` is already bound")]
    AlreadyBound { node: NodeId, input: &'static str },

    #[error("{node} input `{input}` has no binding")]
    Unbound { node: NodeId, input: &'static str },

    #[error("{node} input `{input}` is bound to missing output `{output}`")]
    DanglingOutput {
        node: NodeId,
        input: &'static str,
        output: String,
    },

    #[error("{node} input `{input}` expects {expected}, binding provides {actual}")]
    BindingKindMismatch {
        node: NodeId,
        input: &'static str,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("output name `{name}` is published by both {first} and {second}")]
    DuplicateOutput {
        name: String,
        first: NodeId,
        second: NodeId,
    },

    #[error("output dependencies form a cycle through {node}")]
    CyclicDependency { node: NodeId },
}

impl StatescriptError for BuildError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TooManyNodes { .. } => "TOO_MANY_NODES",
            Self::TooManyParameters { .. } => "TOO_MANY_PARAMETERS",
            Self::UnknownNode { .. } => "UNKNOWN_NODE",
            Self::UnknownInputSlot { .. } => "UNKNOWN_INPUT_SLOT",
            Self::UnknownOutputSlot { .. } => "UNKNOWN_OUTPUT_SLOT",
            Self::AlreadyBound { .. } => "ALREADY_BOUND",
            Self::Unbound { .. } => "UNBOUND",
            Self::DanglingOutput { .. } => "DANGLING_OUTPUT",
            Self::BindingKindMismatch { .. } => "BINDING_KIND_MISMATCH",
            Self::DuplicateOutput { .. } => "DUPLICATE_OUTPUT",
            Self::CyclicDependency { .. } => "CYCLIC_DEPENDENCY",
        }
    }
}

/// Host-side variable table misuse.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VariableError {
    #[error("variable `{name}` is declared {declared}, cannot hold {actual}")]
    KindMismatch {
        name: String,
        declared: ValueKind,
        actual: ValueKind,
    },
}

impl StatescriptError for VariableError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::KindMismatch { .. } => "VARIABLE_KIND_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_errors_are_internal() {
        let err = LifecycleError::AlreadyActive { node: NodeId(3) };
        assert!(err.severity().is_internal());
        assert_eq!(err.error_code(), "ALREADY_ACTIVE");
        assert_eq!(err.to_string(), "node#3 is already active");
    }

    #[test]
    fn build_errors_are_validation() {
        let err = BuildError::CyclicDependency { node: NodeId(0) };
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.severity().as_str(), "validation");
    }
}
