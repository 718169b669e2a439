//! Deterministic update ordering.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::{BuildError, NodeId};

/// Computes the update order for `node_count` nodes.
///
/// `edges` holds `(producer, consumer)` pairs: the consumer reads an output the
/// producer publishes, so the producer must update first. Among nodes whose
/// producers are all placed, the lowest declaration index goes next, which
/// keeps the order stable for a given definition.
pub(crate) fn update_order(
    node_count: usize,
    edges: &[(NodeId, NodeId)],
) -> Result<Vec<NodeId>, BuildError> {
    let mut consumers: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut pending = vec![0_usize; node_count];
    for &(producer, consumer) in edges {
        consumers[producer.index()].push(consumer.index());
        pending[consumer.index()] += 1;
    }

    let mut ready: BinaryHeap<Reverse<usize>> = pending
        .iter()
        .enumerate()
        .filter(|(_, count)| **count == 0)
        .map(|(index, _)| Reverse(index))
        .collect();

    let mut order = Vec::with_capacity(node_count);
    while let Some(Reverse(index)) = ready.pop() {
        order.push(NodeId(index as u32));
        for &consumer in &consumers[index] {
            pending[consumer] -= 1;
            if pending[consumer] == 0 {
                ready.push(Reverse(consumer));
            }
        }
    }

    if order.len() < node_count {
        return Err(BuildError::CyclicDependency {
            node: NodeId(node_on_cycle(&pending, edges) as u32),
        });
    }

    Ok(order)
}

/// Picks a node lying on a cycle among the nodes left with unplaced
/// producers.
///
/// Every stuck node has at least one stuck producer, so walking producers
/// from any stuck node must revisit a node; the first revisited node is on a
/// cycle.
fn node_on_cycle(pending: &[usize], edges: &[(NodeId, NodeId)]) -> usize {
    let stuck = |index: usize| pending[index] > 0;
    let mut producer_of: Vec<Option<usize>> = vec![None; pending.len()];
    for &(producer, consumer) in edges {
        let (producer, consumer) = (producer.index(), consumer.index());
        if stuck(producer) && stuck(consumer) && producer_of[consumer].is_none() {
            producer_of[consumer] = Some(producer);
        }
    }

    let Some(mut current) = (0..pending.len()).find(|&index| stuck(index)) else {
        return 0;
    };
    let mut seen = vec![false; pending.len()];
    while !seen[current] {
        seen[current] = true;
        match producer_of[current] {
            Some(producer) => current = producer,
            None => break,
        }
    }
    current
}
