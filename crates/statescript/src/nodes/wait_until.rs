//! Condition-gated node.

use crate::{NodeParameters, NodeResult, NodeScope, StateNode, ValueKind};

/// Deactivates on the first update where `Condition` resolves to `true`.
///
/// An unresolvable condition counts as not yet satisfied.
#[derive(Clone, Copy, Debug, Default)]
pub struct WaitUntilNode;

impl WaitUntilNode {
    pub const CONDITION: usize = 0;
}

impl StateNode for WaitUntilNode {
    type Context = ();

    const DESCRIPTION: &'static str = "Waits until the bound condition holds, then deactivates.";

    fn define_parameters(&self, parameters: &mut NodeParameters) {
        parameters.input("Condition", ValueKind::Bool);
    }

    fn on_update(
        &self,
        _delta_time: f64,
        _context: &mut (),
        scope: &mut NodeScope<'_>,
    ) -> NodeResult {
        if scope.try_resolve::<bool>(Self::CONDITION) == Some(true) {
            scope.deactivate_node();
        }
        Ok(())
    }
}
