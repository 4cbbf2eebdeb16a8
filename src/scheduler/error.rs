//! Scheduling errors.

use crate::booking::{BookingError, ResolveError};
use crate::store::StoreError;

/// Why a scheduling run was aborted.
///
/// Bookings committed before the failure are kept.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    /// An allocation's employee maps to zero or several resources.
    #[error("No resource found for the employee \"{employee}\" ({reason})")]
    UnresolvableResource {
        /// Employee display name.
        employee: String,
        /// Resolution failure.
        reason: ResolveError,
    },

    /// The predecessor graph loops back onto a task being scheduled.
    #[error("Cyclic dependency: {}", cycle.join(" -> "))]
    CyclicDependency {
        /// Task ids along the cycle, first and last equal.
        cycle: Vec<String>,
    },

    /// The rolled-over start falls past the last representable date.
    #[error("Task '{0}' cannot start within the supported date range")]
    DateOutOfRange(String),

    /// A requested task does not exist.
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    /// Calendar or booking failure.
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// Store write failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
