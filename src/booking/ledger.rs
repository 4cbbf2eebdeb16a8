//! In-memory booking ledger.
//!
//! # Interval placement
//! 1. Move the cursor to the next working instant (skip nights, weekends).
//! 2. If an active booking covers the cursor, jump to its end.
//! 3. Otherwise take free time up to the next booking or the end of day.
//! 4. Repeat until the requested hours are placed.
//!
//! Requests shorter than a millisecond still take one millisecond. Requests
//! that cannot end before the last representable date fail with
//! [`BookingError::OutOfRange`].
//!
//! # Complexity
//! O(s * b) where s=slots produced, b=active bookings on the resource.

use chrono::{Days, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{BookingConfirmed, BookingError, ResolveError, ResourceCalendar};
use crate::models::{Booking, BookingState, DocumentRef, Resource, TimeWindow};

/// Resources plus every booking made against them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingLedger {
    resources: Vec<Resource>,
    bookings: BTreeMap<u64, Booking>,
    next_id: u64,
}

impl BookingLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resource.
    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    /// Adds a resource (builder form).
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.add_resource(resource);
        self
    }

    /// Looks up a resource.
    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// All resources in registration order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Looks up a booking.
    pub fn booking(&self, id: u64) -> Option<&Booking> {
        self.bookings.get(&id)
    }

    /// All bookings in creation order.
    pub fn bookings(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.values()
    }

    /// Bookings made for `document`.
    pub fn bookings_for(&self, document: &DocumentRef) -> Vec<&Booking> {
        self.bookings.values().filter(|b| b.is_for(document)).collect()
    }

    /// Ids of all draft bookings.
    pub fn drafts(&self) -> Vec<u64> {
        self.bookings
            .values()
            .filter(|b| b.state == BookingState::Draft)
            .map(|b| b.id)
            .collect()
    }

    /// Windows currently occupying a resource's calendar, sorted by start.
    pub fn busy_windows(&self, resource_id: &str) -> Vec<TimeWindow> {
        let mut windows: Vec<TimeWindow> = self
            .bookings
            .values()
            .filter(|b| b.resource_id == resource_id && b.is_active())
            .map(|b| b.window)
            .collect();
        windows.sort_by_key(|w| w.start);
        windows
    }

    /// Confirms bookings and returns one event per booking.
    ///
    /// All ids are checked before any state changes.
    pub fn confirm(&mut self, ids: &[u64]) -> Result<Vec<BookingConfirmed>, BookingError> {
        self.transition(ids, BookingState::Confirmed)?;

        let events = ids
            .iter()
            .filter_map(|id| self.bookings.get(id))
            .map(|b| BookingConfirmed {
                booking_id: b.id,
                resource_id: b.resource_id.clone(),
                employee_id: self
                    .resource(&b.resource_id)
                    .and_then(|r| r.employee_id.clone()),
                document: b.document.clone(),
            })
            .collect::<Vec<_>>();

        tracing::debug!(count = events.len(), "Confirmed bookings");
        Ok(events)
    }

    /// Cancels bookings, releasing their windows.
    pub fn cancel(&mut self, ids: &[u64]) -> Result<(), BookingError> {
        self.transition(ids, BookingState::Cancelled)?;
        tracing::debug!(count = ids.len(), "Cancelled bookings");
        Ok(())
    }

    /// Deletes draft or cancelled bookings.
    pub fn delete(&mut self, ids: &[u64]) -> Result<(), BookingError> {
        for id in ids {
            let booking = self
                .bookings
                .get(id)
                .ok_or(BookingError::UnknownBooking(*id))?;
            if booking.state == BookingState::Confirmed {
                return Err(BookingError::NotDeletable(*id));
            }
        }
        for id in ids {
            self.bookings.remove(id);
        }
        tracing::debug!(count = ids.len(), "Deleted bookings");
        Ok(())
    }

    fn transition(&mut self, ids: &[u64], to: BookingState) -> Result<(), BookingError> {
        let mut seen = HashSet::new();
        for id in ids {
            let booking = self
                .bookings
                .get(id)
                .ok_or(BookingError::UnknownBooking(*id))?;
            if !seen.insert(*id) {
                continue;
            }
            if !booking.state.can_transition_to(to) {
                return Err(BookingError::InvalidTransition {
                    id: *id,
                    from: booking.state,
                    to,
                });
            }
        }
        for id in ids {
            if let Some(booking) = self.bookings.get_mut(id) {
                booking.state = to;
            }
        }
        Ok(())
    }
}

impl ResourceCalendar for BookingLedger {
    fn resolve_by_employee(&self, employee_id: &str) -> Result<String, ResolveError> {
        let matches: Vec<&Resource> = self
            .resources
            .iter()
            .filter(|r| r.belongs_to(employee_id))
            .collect();
        match matches.as_slice() {
            [] => Err(ResolveError::NotFound),
            [resource] => Ok(resource.id.clone()),
            many => Err(ResolveError::Ambiguous(many.len())),
        }
    }

    fn book_hours(
        &self,
        resource_id: &str,
        anchor: NaiveDateTime,
        hours: f64,
    ) -> Result<Vec<TimeWindow>, BookingError> {
        let resource = self
            .resource(resource_id)
            .ok_or_else(|| BookingError::UnknownResource(resource_id.to_string()))?;
        if !hours.is_finite() || hours <= 0.0 {
            return Err(BookingError::InvalidHours(hours));
        }
        let calendar = resource.hours;
        if !calendar.is_valid() {
            return Err(BookingError::NoWorkingTime(resource_id.to_string()));
        }

        let out_of_range = || BookingError::OutOfRange(resource_id.to_string());
        let millis = (hours * 3_600_000.0).round().max(1.0) as i64;
        let mut remaining = Duration::try_milliseconds(millis).ok_or_else(out_of_range)?;

        // Five working days per week at best.
        let working_days = remaining.num_milliseconds() / calendar.daily_duration().num_milliseconds();
        let min_days = u64::try_from(working_days / 5 * 7).unwrap_or(u64::MAX);
        anchor
            .date()
            .checked_add_days(Days::new(min_days))
            .ok_or_else(out_of_range)?;

        let busy = self.busy_windows(resource_id);
        let mut slots: Vec<TimeWindow> = Vec::new();
        let mut cursor = anchor;

        while remaining > Duration::zero() {
            cursor = calendar.next_working_time(cursor).ok_or_else(out_of_range)?;

            if let Some(blocking) = busy.iter().find(|w| w.contains(cursor)) {
                cursor = blocking.end;
                continue;
            }

            let day_end = cursor.date().and_time(calendar.day_ends);
            let free_until = busy
                .iter()
                .map(|w| w.start)
                .find(|start| *start > cursor && *start < day_end)
                .unwrap_or(day_end);

            let take = remaining.min(free_until - cursor);
            let end = cursor.checked_add_signed(take).ok_or_else(out_of_range)?;
            match slots.last_mut() {
                Some(last) if last.end == cursor => last.end = end,
                _ => slots.push(TimeWindow::new(cursor, end)),
            }
            remaining -= take;
            cursor = end;
        }

        Ok(slots)
    }

    fn commit(
        &mut self,
        resource_id: &str,
        slots: &[TimeWindow],
        document: DocumentRef,
    ) -> Result<Vec<u64>, BookingError> {
        if self.resource(resource_id).is_none() {
            return Err(BookingError::UnknownResource(resource_id.to_string()));
        }
        let mut ids = Vec::with_capacity(slots.len());
        for slot in slots {
            self.next_id += 1;
            let id = self.next_id;
            self.bookings.insert(
                id,
                Booking {
                    id,
                    resource_id: resource_id.to_string(),
                    window: *slot,
                    state: BookingState::Draft,
                    document: Some(document.clone()),
                },
            );
            ids.push(id);
        }
        Ok(ids)
    }

    fn has_confirmed_booking(&self, document: &DocumentRef) -> bool {
        self.bookings
            .values()
            .any(|b| b.state == BookingState::Confirmed && b.is_for(document))
    }
}
