//! Forward resource scheduling for project tasks.
//!
//! Computes planned start/end dates for interdependent tasks by resolving
//! predecessors first and reserving working time on calendar-bound
//! resources (people with a daily working window, weekends off).
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Task`, `Allocation`, `Company`,
//!   `Employee`, `Resource`, `Booking`, `WorkingHours`, `TimeWindow`
//! - **`store`**: In-memory work store (predecessor graph + parent tree)
//! - **`booking`**: `ResourceCalendar` interface and the `BookingLedger`
//! - **`scheduler`**: `ForwardScheduler`, the single-pass forward scheduler
//! - **`hierarchy`**: Project date rollups and expected-end propagation
//! - **`assignment`**: Assigned-employee projection and confirmation hook
//! - **`plan`**: `ResourcePlan`, the purge / schedule / confirm entry point
//! - **`validation`**: Input integrity checks (dangling refs, DAG cycles)
//!
//! # Architecture
//!
//! The scheduler only reads task, allocation and predecessor data and
//! writes planned dates; every interval placement decision belongs to the
//! `ResourceCalendar` implementation. Booking confirmations are published
//! as events and applied to tasks by a separate subscriber.
//!
//! # References
//!
//! - Kelley & Walker (1959), "Critical-Path Planning and Scheduling"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod assignment;
pub mod booking;
pub mod hierarchy;
pub mod models;
pub mod plan;
pub mod scheduler;
pub mod store;
pub mod validation;
