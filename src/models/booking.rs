//! Booking (reservation) model.
//!
//! A booking reserves one window of a resource's calendar on behalf of a
//! document, usually the task that caused it.
//!
//! # Lifecycle
//!
//! | From | To | Allowed |
//! |------|----|---------|
//! | Draft | Confirmed | yes |
//! | Draft | Cancelled | yes |
//! | Confirmed | Cancelled | yes |
//! | anything else | | no |
//!
//! Cancelled bookings release their window.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TimeWindow;

/// Booking state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingState {
    /// Proposed, not yet committed to.
    #[default]
    Draft,
    /// Firm reservation.
    Confirmed,
    /// Released.
    Cancelled,
}

impl BookingState {
    /// Whether `self → to` is a legal transition.
    pub fn can_transition_to(self, to: BookingState) -> bool {
        matches!(
            (self, to),
            (BookingState::Draft, BookingState::Confirmed)
                | (BookingState::Draft, BookingState::Cancelled)
                | (BookingState::Confirmed, BookingState::Cancelled)
        )
    }
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingState::Draft => f.write_str("draft"),
            BookingState::Confirmed => f.write_str("confirmed"),
            BookingState::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Kind of entity a booking was made for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// A project task.
    Task,
    /// Any other bookable document.
    Other(String),
}

/// Tagged reference to the document behind a booking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Document kind.
    pub kind: DocumentKind,
    /// Document identifier within its kind.
    pub id: String,
}

impl DocumentRef {
    /// Reference to a task.
    pub fn task(id: impl Into<String>) -> Self {
        Self {
            kind: DocumentKind::Task,
            id: id.into(),
        }
    }

    /// Reference to a document of another kind.
    pub fn other(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: DocumentKind::Other(kind.into()),
            id: id.into(),
        }
    }

    /// Task id, if this references a task.
    pub fn as_task(&self) -> Option<&str> {
        match self.kind {
            DocumentKind::Task => Some(&self.id),
            DocumentKind::Other(_) => None,
        }
    }
}

/// A reserved window on one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: u64,
    /// Reserved resource.
    pub resource_id: String,
    /// Reserved window.
    pub window: TimeWindow,
    /// Lifecycle state.
    pub state: BookingState,
    /// Originating document.
    pub document: Option<DocumentRef>,
}

impl Booking {
    /// Whether the booking still occupies its resource's calendar.
    pub fn is_active(&self) -> bool {
        self.state != BookingState::Cancelled
    }

    /// Whether the booking was made for `document`.
    pub fn is_for(&self, document: &DocumentRef) -> bool {
        self.document.as_ref() == Some(document)
    }
}
