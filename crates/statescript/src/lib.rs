//! Statescript: a node-based state machine runtime for gameplay logic.
//!
//! A graph is a fixed set of nodes. Each node is either Inactive or Active;
//! active nodes are updated once per tick with the elapsed time, read their
//! inputs through typed bindings and decide for themselves when to
//! deactivate.
//!
//! - **Deterministic**: nodes update in a fixed, dependency-respecting order
//! - **Type-checked data flow**: bindings resolve only to values of the
//!   declared kind; a miss is `None`, never a silent default
//! - **Owned state**: per-node contexts live in an arena owned by the graph
//!
//! # Architecture
//!
//! - [`StateNode`]: trait every node type implements
//! - [`GraphContext`]: node-context arena, external variables, published outputs
//! - [`GraphBuilder`] / [`Graph`]: construction, validation and the tick loop
//! - [`nodes`]: built-in node types such as [`nodes::TimerNode`]

pub mod config;
pub mod context;
pub mod error;
pub mod graph;
pub mod id;
pub mod node;
pub mod nodes;
pub mod property;
pub mod value;

pub use config::GraphConfig;
pub use context::{GraphContext, NodeContextStore, VariableTable};
pub use error::{BuildError, ErrorSeverity, LifecycleError, StatescriptError, VariableError};
pub use graph::{Graph, GraphBuilder, TickSummary};
pub use id::NodeId;
pub use node::{NodeInstance, NodeResult, NodeScope, NodeState, StateNode};
pub use property::{
    BoundInput, InputProperty, NodeParameters, OutputVariable, PropertyBinding, PublishedOutput,
};
pub use value::{FromValue, Value, ValueKind};
