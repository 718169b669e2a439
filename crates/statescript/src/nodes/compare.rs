//! Float comparison node.

use crate::{NodeParameters, NodeResult, NodeScope, StateNode, ValueKind};

/// Comparison operator applied as `left <op> right`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Comparison {
    Less,
    LessOrEqual,
    Equal,
    NotEqual,
    GreaterOrEqual,
    Greater,
}

impl Comparison {
    pub fn evaluate(self, left: f64, right: f64) -> bool {
        match self {
            Comparison::Less => left < right,
            Comparison::LessOrEqual => left <= right,
            Comparison::Equal => left == right,
            Comparison::NotEqual => left != right,
            Comparison::GreaterOrEqual => left >= right,
            Comparison::Greater => left > right,
        }
    }
}

/// Publishes `Left <op> Right` on the `Result` output every update.
///
/// If either side fails to resolve, nothing is published that tick and the
/// previous result stays visible.
#[derive(Clone, Copy, Debug)]
pub struct CompareNode {
    pub comparison: Comparison,
}

impl CompareNode {
    pub const LEFT: usize = 0;
    pub const RIGHT: usize = 1;
    /// Output slot: comparison result.
    pub const RESULT: usize = 0;

    pub const fn new(comparison: Comparison) -> Self {
        Self { comparison }
    }
}

impl StateNode for CompareNode {
    type Context = ();

    const DESCRIPTION: &'static str = "Publishes whether Left compares to Right.";

    fn define_parameters(&self, parameters: &mut NodeParameters) {
        parameters.input("Left", ValueKind::Float);
        parameters.input("Right", ValueKind::Float);
        parameters.output("Result", ValueKind::Bool);
    }

    fn on_update(
        &self,
        _delta_time: f64,
        _context: &mut (),
        scope: &mut NodeScope<'_>,
    ) -> NodeResult {
        let (Some(left), Some(right)) = (
            scope.try_resolve::<f64>(Self::LEFT),
            scope.try_resolve::<f64>(Self::RIGHT),
        ) else {
            return Ok(());
        };
        scope.publish(Self::RESULT, self.comparison.evaluate(left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators() {
        assert!(Comparison::Less.evaluate(1.0, 2.0));
        assert!(!Comparison::Less.evaluate(2.0, 2.0));
        assert!(Comparison::LessOrEqual.evaluate(2.0, 2.0));
        assert!(Comparison::Equal.evaluate(2.0, 2.0));
        assert!(Comparison::NotEqual.evaluate(1.0, 2.0));
        assert!(Comparison::GreaterOrEqual.evaluate(2.0, 2.0));
        assert!(Comparison::Greater.evaluate(3.0, 2.0));
    }

    #[test]
    fn parses_from_snake_case() {
        assert_eq!(
            "greater_or_equal".parse::<Comparison>().unwrap(),
            Comparison::GreaterOrEqual
        );
    }
}
