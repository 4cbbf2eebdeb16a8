//! Resource plan: one purge / schedule / confirm invocation.
//!
//! # Steps
//! 1. Optionally cancel and delete every draft booking, so stale proposals
//!    from an earlier plan do not block calendars.
//! 2. Forward-schedule the selected tasks.
//! 3. Optionally confirm the draft bookings of those tasks and assign
//!    employees to tasks that had none.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::assignment::{assign_on_confirm, AllocationFilter};
use crate::booking::BookingLedger;
use crate::models::{BookingState, DocumentRef, Task};
use crate::scheduler::{ForwardScheduler, ScheduleError};
use crate::store::WorkStore;

/// Task field used to order the default selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    Id,
    Name,
    Effort,
    PlannedStart,
    ExpectedEnd,
}

/// Sort direction. Missing values sort first when ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// One sort criterion of the default selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl TaskOrder {
    /// Ascending on `key`.
    pub fn asc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    /// Descending on `key`.
    pub fn desc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Descending,
        }
    }

    fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let ord = match self.key {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Effort => match (a.effort, b.effort) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (x, y) => x.is_some().cmp(&y.is_some()),
            },
            SortKey::PlannedStart => a.planned_start.cmp(&b.planned_start),
            SortKey::ExpectedEnd => a.expected_end.cmp(&b.expected_end),
        };
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// Options of a planning run.
///
/// # Example
///
/// ```
/// use resource_plan::plan::ResourcePlan;
///
/// let plan = ResourcePlan::new().with_confirm_bookings(true);
/// assert!(plan.delete_drafts);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePlan {
    /// Cancel and delete all draft bookings before scheduling.
    pub delete_drafts: bool,
    /// Confirm the bookings produced for the planned tasks.
    pub confirm_bookings: bool,
    /// Narrows `default_tasks`.
    pub filter: Option<AllocationFilter>,
    /// Orders `default_tasks`; ties keep store order.
    pub order: Vec<TaskOrder>,
}

impl Default for ResourcePlan {
    fn default() -> Self {
        Self {
            delete_drafts: true,
            confirm_bookings: false,
            filter: None,
            order: Vec::new(),
        }
    }
}

/// Result of a planning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOutcome {
    /// Tasks that received planned dates.
    pub scheduled: Vec<String>,
    /// Draft bookings removed before scheduling.
    pub deleted_drafts: usize,
    /// Bookings confirmed after scheduling.
    pub confirmed: Vec<u64>,
    /// Tasks whose assigned employee was set by a confirmation.
    pub assigned: Vec<String>,
}

impl ResourcePlan {
    /// Creates a plan with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets draft deletion.
    pub fn with_delete_drafts(mut self, delete_drafts: bool) -> Self {
        self.delete_drafts = delete_drafts;
        self
    }

    /// Sets booking confirmation.
    pub fn with_confirm_bookings(mut self, confirm_bookings: bool) -> Self {
        self.confirm_bookings = confirm_bookings;
        self
    }

    /// Sets the task selection filter.
    pub fn with_filter(mut self, filter: AllocationFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Appends a sort criterion.
    pub fn with_order(mut self, order: TaskOrder) -> Self {
        self.order.push(order);
        self
    }

    /// Task-typed nodes matching the filter, sorted by `order`.
    pub fn default_tasks(&self, store: &WorkStore) -> Vec<String> {
        let mut tasks: Vec<&Task> = store
            .tasks()
            .filter(|t| t.is_schedulable() && self.filter.as_ref().map_or(true, |f| f.matches(t)))
            .collect();
        tasks.sort_by(|a, b| {
            self.order
                .iter()
                .fold(Ordering::Equal, |acc, o| acc.then_with(|| o.compare(a, b)))
        });
        tasks.into_iter().map(|t| t.id.clone()).collect()
    }

    /// Runs the plan over `tasks`.
    pub fn run(
        &self,
        scheduler: &ForwardScheduler,
        store: &mut WorkStore,
        ledger: &mut BookingLedger,
        tasks: &[String],
    ) -> Result<PlanOutcome, ScheduleError> {
        let mut outcome = PlanOutcome::default();

        if self.delete_drafts {
            let drafts = ledger.drafts();
            if !drafts.is_empty() {
                ledger.cancel(&drafts)?;
                ledger.delete(&drafts)?;
            }
            outcome.deleted_drafts = drafts.len();
        }

        let mut visited = HashSet::new();
        scheduler.schedule(store, ledger, tasks, &mut visited)?;
        outcome.scheduled = tasks
            .iter()
            .filter(|id| visited.contains(*id))
            .cloned()
            .collect();

        if self.confirm_bookings {
            let to_confirm: Vec<u64> = tasks
                .iter()
                .flat_map(|id| ledger.bookings_for(&DocumentRef::task(id.as_str())))
                .filter(|b| b.state == BookingState::Draft)
                .map(|b| b.id)
                .collect();
            if !to_confirm.is_empty() {
                let events = ledger.confirm(&to_confirm)?;
                outcome.assigned = assign_on_confirm(store, &events);
            }
            outcome.confirmed = to_confirm;
        }

        tracing::info!(
            scheduled = outcome.scheduled.len(),
            deleted_drafts = outcome.deleted_drafts,
            confirmed = outcome.confirmed.len(),
            "Resource plan finished"
        );
        Ok(outcome)
    }
}
