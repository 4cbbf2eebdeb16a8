//! Forward scheduling of project tasks.
//!
//! # Algorithm
//!
//! `ForwardScheduler` performs a single greedy forward pass: predecessors
//! first, finish-to-start dependencies only, each allocation booked on its
//! own resource. It is not a critical-path or resource-leveling solver and
//! never revisits work that already holds a confirmed booking.
//!
//! # Errors
//!
//! A run aborts on the first unresolvable resource, dependency cycle or
//! booking failure. Bookings committed earlier in the run are kept.
//!
//! # References
//!
//! - Kelley & Walker (1959), "Critical-Path Planning and Scheduling"
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"

mod error;
mod forward;

pub use error::ScheduleError;
pub use forward::ForwardScheduler;
