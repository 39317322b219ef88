//! Cooperative tasks pumped by the host's update tick.
//!
//! # Responsibility
//! - Replace engine-driven coroutines with explicit, tick-resumed tasks.
//! - Tie task lifetime to the owning unit through handles and groups.
//!
//! # Invariants
//! - No task blocks; each `step` returns within the calling tick.
//! - Dropping a `TaskHandle` or `TaskGroup` is the cancellation mechanism.

mod scheduler;
mod tasks;

pub use scheduler::{
    CooperativeTask, Scheduler, TaskGroup, TaskHandle, TaskId, TaskOwner, TaskStatus,
};
pub use tasks::{Periodic, Tween};
