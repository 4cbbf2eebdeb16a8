//! Calendar resources and the booking ledger.
//!
//! The forward scheduler never places intervals itself: it asks a
//! [`ResourceCalendar`] to resolve an employee to a resource, to propose
//! booking windows for a number of hours, and to commit them. The
//! in-memory [`BookingLedger`] is the reference implementation.
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use resource_plan::booking::{BookingLedger, ResourceCalendar};
//! use resource_plan::models::{DocumentRef, Resource};
//!
//! let mut ledger = BookingLedger::new();
//! ledger.add_resource(Resource::for_employee("R1", "E1"));
//!
//! let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let resource = ledger.resolve_by_employee("E1").unwrap();
//! let slots = ledger.book_hours(&resource, monday, 8.0).unwrap();
//! ledger.commit(&resource, &slots, DocumentRef::task("T1")).unwrap();
//! ```

mod ledger;

pub use ledger::BookingLedger;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{BookingState, DocumentRef, TimeWindow};

/// Why an employee could not be mapped to exactly one resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No resource represents the employee.
    #[error("no resource found")]
    NotFound,

    /// Several resources represent the employee.
    #[error("{0} resources found")]
    Ambiguous(usize),
}

/// Errors raised by calendar and booking operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookingError {
    /// Resource id not registered.
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// Booking id not registered.
    #[error("Unknown booking: {0}")]
    UnknownBooking(u64),

    /// Requested hours are not a positive finite number.
    #[error("Cannot book {0} hours")]
    InvalidHours(f64),

    /// The resource's working day is empty.
    #[error("Resource '{0}' has no working time")]
    NoWorkingTime(String),

    /// Placement would run past the last representable date.
    #[error("Booking on resource '{0}' runs past the supported date range")]
    OutOfRange(String),

    /// Illegal state change.
    #[error("Booking {id} cannot go from {from} to {to}")]
    InvalidTransition {
        id: u64,
        from: BookingState,
        to: BookingState,
    },

    /// Only draft or cancelled bookings may be deleted.
    #[error("Booking {0} is confirmed and cannot be deleted")]
    NotDeletable(u64),
}

/// Emitted once per booking when it becomes confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmed {
    /// Confirmed booking.
    pub booking_id: u64,
    /// Reserved resource.
    pub resource_id: String,
    /// Employee represented by the resource, if any.
    pub employee_id: Option<String>,
    /// Document the booking was made for.
    pub document: Option<DocumentRef>,
}

/// Booking interface consumed by the forward scheduler.
pub trait ResourceCalendar {
    /// Finds the single resource representing `employee_id`.
    fn resolve_by_employee(&self, employee_id: &str) -> Result<String, ResolveError>;

    /// Proposes windows totalling `hours` of working time on `resource_id`,
    /// none starting before `anchor`.
    fn book_hours(
        &self,
        resource_id: &str,
        anchor: NaiveDateTime,
        hours: f64,
    ) -> Result<Vec<TimeWindow>, BookingError>;

    /// Envelope (earliest start, latest end) of proposed windows.
    fn interval_bounds(&self, slots: &[TimeWindow]) -> Option<(NaiveDateTime, NaiveDateTime)> {
        TimeWindow::envelope(slots)
    }

    /// Reserves the windows for `document`, returning the new booking ids.
    fn commit(
        &mut self,
        resource_id: &str,
        slots: &[TimeWindow],
        document: DocumentRef,
    ) -> Result<Vec<u64>, BookingError>;

    /// Whether `document` holds at least one confirmed booking.
    fn has_confirmed_booking(&self, document: &DocumentRef) -> bool;
}
