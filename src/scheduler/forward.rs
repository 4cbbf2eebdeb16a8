//! Forward scheduler over the predecessor graph.
//!
//! # Algorithm
//!
//! 1. Skip tasks already visited in this run, already holding a confirmed
//!    booking, or not task-typed.
//! 2. Schedule the task's predecessors first (depth-first, shared visited
//!    set). A task met again on the current recursion path is a cycle.
//! 3. Earliest start = latest predecessor end, rolled to the next working
//!    morning when it falls at or after the company's end of day.
//! 4. For every allocation, book `effort × percentage / 100` hours on the
//!    employee's resource, anchored at the earliest start (or "now").
//! 5. The task's window is the envelope of all its bookings.
//!
//! Recursion depth equals the longest predecessor chain.
//!
//! # Complexity
//! O(n + e) graph visits plus one booking request per allocation.

use chrono::{Local, NaiveDateTime};
use std::collections::HashSet;

use super::ScheduleError;
use crate::booking::ResourceCalendar;
use crate::models::DocumentRef;
use crate::store::WorkStore;

/// Greedy single-pass forward scheduler.
///
/// Writes `planned_start` / `planned_end` on every task it can resolve and
/// reserves the matching windows on the allocated resources.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use chrono::NaiveDate;
/// use resource_plan::booking::BookingLedger;
/// use resource_plan::models::{Allocation, Company, Resource, Task};
/// use resource_plan::scheduler::ForwardScheduler;
/// use resource_plan::store::WorkStore;
///
/// let mut store = WorkStore::new();
/// store.add_company(Company::new("C1"));
/// store.insert_task(
///     Task::new("T1")
///         .with_company("C1")
///         .with_effort(8.0)
///         .with_allocation(Allocation::full("E1")),
/// ).unwrap();
/// let mut ledger = BookingLedger::new().with_resource(Resource::for_employee("R1", "E1"));
///
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let scheduler = ForwardScheduler::new().with_now(monday);
/// scheduler
///     .schedule(&mut store, &mut ledger, &["T1".to_string()], &mut HashSet::new())
///     .unwrap();
///
/// let t1 = store.task("T1").unwrap();
/// assert_eq!(t1.planned_start, Some(monday));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ForwardScheduler {
    now: Option<NaiveDateTime>,
}

impl ForwardScheduler {
    /// Creates a scheduler anchored at the wall clock.
    pub fn new() -> Self {
        Self { now: None }
    }

    /// Fixes the anchor used for tasks without dated predecessors.
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    /// Schedules `tasks` in the given order.
    ///
    /// `visited` collects the ids of tasks that received dates and may be
    /// shared across calls to keep them from being booked twice.
    pub fn schedule<C>(
        &self,
        store: &mut WorkStore,
        calendar: &mut C,
        tasks: &[String],
        visited: &mut HashSet<String>,
    ) -> Result<(), ScheduleError>
    where
        C: ResourceCalendar + ?Sized,
    {
        let mut run = Run {
            store,
            calendar,
            visited,
            path: Vec::new(),
            now: self.now.unwrap_or_else(|| Local::now().naive_local()),
        };
        run.schedule_all(tasks)
    }
}

/// State of one scheduling invocation.
struct Run<'a, C: ?Sized> {
    store: &'a mut WorkStore,
    calendar: &'a mut C,
    visited: &'a mut HashSet<String>,
    path: Vec<String>,
    now: NaiveDateTime,
}

impl<C> Run<'_, C>
where
    C: ResourceCalendar + ?Sized,
{
    fn schedule_all(&mut self, tasks: &[String]) -> Result<(), ScheduleError> {
        for id in tasks {
            self.schedule_task(id)?;
        }
        Ok(())
    }

    fn schedule_task(&mut self, id: &str) -> Result<(), ScheduleError> {
        if self.visited.contains(id) {
            return Ok(());
        }
        if let Some(pos) = self.path.iter().position(|p| p == id) {
            let mut cycle = self.path[pos..].to_vec();
            cycle.push(id.to_string());
            tracing::warn!(task_id = %id, "Cyclic dependency, aborting run");
            return Err(ScheduleError::CyclicDependency { cycle });
        }

        let task = self
            .store
            .task(id)
            .ok_or_else(|| ScheduleError::UnknownTask(id.to_string()))?;
        if !task.is_schedulable() {
            tracing::debug!(task_id = %id, "Skipping non-task node");
            return Ok(());
        }
        if self.calendar.has_confirmed_booking(&DocumentRef::task(id)) {
            tracing::debug!(task_id = %id, "Already scheduled");
            return Ok(());
        }

        let predecessors: Vec<String> = self
            .store
            .predecessors(id)
            .iter()
            .map(|t| t.id.clone())
            .collect();

        self.path.push(id.to_string());
        let result = self
            .schedule_all(&predecessors)
            .and_then(|()| self.place(id));
        self.path.pop();
        result
    }

    /// Books a task whose predecessors are settled.
    fn place(&mut self, id: &str) -> Result<(), ScheduleError> {
        let mut planned_start = self
            .store
            .predecessors(id)
            .iter()
            .filter_map(|t| t.planned_end)
            .max();
        if let Some(start) = planned_start {
            let hours = self.store.company_hours(id).unwrap_or_default();
            let rolled = hours
                .roll_over(start)
                .ok_or_else(|| ScheduleError::DateOutOfRange(id.to_string()))?;
            planned_start = Some(rolled);
        }

        let task = self
            .store
            .task(id)
            .ok_or_else(|| ScheduleError::UnknownTask(id.to_string()))?;
        let Some(effort) = task
            .positive_effort()
            .filter(|_| task.has_scheduling_inputs())
        else {
            tracing::debug!(task_id = %id, "No effort or allocations, leaving unscheduled");
            return Ok(());
        };
        let allocations = task.allocations.clone();

        let anchor = planned_start.unwrap_or(self.now);
        let document = DocumentRef::task(id);
        let mut planned_end: Option<NaiveDateTime> = None;

        for (index, allocation) in allocations.iter().enumerate() {
            let hours = allocation.hours_for(effort);
            let resource = self
                .calendar
                .resolve_by_employee(&allocation.employee_id)
                .map_err(|reason| {
                    let employee = self.store.employee_name(&allocation.employee_id);
                    tracing::warn!(task_id = %id, employee = %employee, %reason, "Unresolvable resource");
                    ScheduleError::UnresolvableResource { employee, reason }
                })?;

            let slots = self.calendar.book_hours(&resource, anchor, hours)?;
            let Some((start, end)) = self.calendar.interval_bounds(&slots) else {
                continue;
            };

            // The booked start is finer-grained than a rolled-over anchor.
            if index == 0 && planned_start.is_some_and(|p| p.date() == start.date()) {
                planned_start = Some(start);
            }
            planned_start = Some(planned_start.map_or(start, |p| p.min(start)));
            planned_end = Some(planned_end.map_or(end, |p| p.max(end)));

            let booked = self.calendar.commit(&resource, &slots, document.clone())?;
            tracing::debug!(
                task_id = %id,
                resource_id = %resource,
                hours,
                bookings = booked.len(),
                "Booked allocation"
            );
        }

        self.store.set_planned_dates(id, planned_start, planned_end)?;
        self.visited.insert(id.to_string());
        tracing::info!(
            task_id = %id,
            start = ?planned_start,
            end = ?planned_end,
            "Task scheduled"
        );
        Ok(())
    }
}
