//! Built-in node types.
//!
//! - [`TimerNode`]: stays active for a bound duration, then completes.
//! - [`ElapsedTimeNode`]: publishes time since activation.
//! - [`CompareNode`]: publishes the comparison of two bound floats.
//! - [`WaitUntilNode`]: completes once a bound condition holds.

mod compare;
mod elapsed;
mod timer;
mod wait_until;

pub use compare::{Comparison, CompareNode};
pub use elapsed::{ElapsedTimeContext, ElapsedTimeNode};
pub use timer::{TimerContext, TimerNode};
pub use wait_until::WaitUntilNode;
