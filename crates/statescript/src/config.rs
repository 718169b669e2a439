/// Graph runtime configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphConfig {
    /// Upper bound on the number of nodes a single graph may declare.
    pub max_nodes: usize,
    /// Largest delta a single tick may advance by. Larger deltas are clamped.
    /// `None` applies the host's delta unchanged.
    pub max_delta_time: Option<f64>,
}

impl GraphConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of input properties one node type may declare.
    pub const MAX_NODE_INPUTS: usize = 16;
    /// Maximum number of output variables one node type may declare.
    pub const MAX_NODE_OUTPUTS: usize = 16;

    /// Largest node count addressable by a [`NodeId`](crate::NodeId).
    pub const MAX_GRAPH_NODES: usize = u32::MAX as usize;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_NODES: usize = 4096;

    pub fn new() -> Self {
        Self {
            max_nodes: Self::DEFAULT_MAX_NODES,
            max_delta_time: None,
        }
    }

    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes.min(Self::MAX_GRAPH_NODES);
        self
    }

    #[must_use]
    pub fn with_max_delta_time(mut self, max_delta_time: f64) -> Self {
        self.max_delta_time = Some(max_delta_time);
        self
    }

    /// Node limit actually enforced, never above [`Self::MAX_GRAPH_NODES`].
    #[inline]
    pub fn node_limit(&self) -> usize {
        self.max_nodes.min(Self::MAX_GRAPH_NODES)
    }

    /// Applies the delta clamp, if any.
    #[inline]
    pub fn clamp_delta(&self, delta_time: f64) -> f64 {
        match self.max_delta_time {
            Some(max) => delta_time.min(max),
            None => delta_time,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_passes_through_without_clamp() {
        let config = GraphConfig::default();
        assert_eq!(config.clamp_delta(10.0), 10.0);
    }

    #[test]
    fn delta_clamps_to_configured_max() {
        let config = GraphConfig::new().with_max_delta_time(0.25);
        assert_eq!(config.clamp_delta(1.0), 0.25);
        assert_eq!(config.clamp_delta(0.1), 0.1);
    }

    #[test]
    fn node_limit_fits_node_ids() {
        let config = GraphConfig::new().with_max_nodes(usize::MAX);
        assert_eq!(config.max_nodes, GraphConfig::MAX_GRAPH_NODES);

        let config = GraphConfig {
            max_nodes: usize::MAX,
            ..GraphConfig::default()
        };
        assert_eq!(config.node_limit(), u32::MAX as usize);
        assert_eq!(GraphConfig::new().with_max_nodes(8).node_limit(), 8);
    }
}
