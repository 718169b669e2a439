//! Graph-scoped node identifiers.

use core::fmt;

/// Stable identifier of a node within one graph instance.
///
/// Identifiers are assigned densely in declaration order by
/// [`GraphBuilder`](crate::GraphBuilder) and double as the index into the
/// node-context arena. They are never reused within a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    /// Returns the arena index for this node.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}
