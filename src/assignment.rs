//! Assigned-employee projection over task allocations.
//!
//! Many views only care about "who is on this task". That single value is
//! projected from the allocation list: reading takes the first allocation,
//! writing replaces every allocation with one full-time allocation, and
//! searching is rewritten into a filter over allocations.
//!
//! The module also hosts the subscriber reacting to booking confirmations:
//! a confirmed booking on an unassigned task assigns the booked employee.

use serde::{Deserialize, Serialize};

use crate::booking::BookingConfirmed;
use crate::models::{Allocation, Task};
use crate::store::{StoreError, WorkStore};

/// Employee of the first allocation, if any.
pub fn assigned_employee(task: &Task) -> Option<&str> {
    task.allocations.first().map(|a| a.employee_id.as_str())
}

/// Replaces the allocations of `tasks` with a single 100% allocation.
///
/// With `None` the tasks end up without allocations.
pub fn set_assigned_employee(
    store: &mut WorkStore,
    tasks: &[String],
    employee_id: Option<&str>,
) -> Result<(), StoreError> {
    if let Some(missing) = tasks.iter().find(|id| !store.contains(id)) {
        return Err(StoreError::UnknownTask(missing.clone()));
    }
    for id in tasks {
        if let Some(task) = store.task_mut(id) {
            task.allocations.clear();
            if let Some(employee_id) = employee_id {
                task.allocations.push(Allocation::full(employee_id));
            }
        }
    }
    Ok(())
}

/// Comparison operator of a search clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
}

/// Search clause on the assigned-employee projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedEmployeeClause {
    /// Comparison.
    pub operator: Operator,
    /// Employee id, or `None` for "unassigned".
    pub value: Option<String>,
}

impl AssignedEmployeeClause {
    /// `assigned_employee = value`
    pub fn equals(value: Option<&str>) -> Self {
        Self {
            operator: Operator::Eq,
            value: value.map(str::to_string),
        }
    }

    /// `assigned_employee != value`
    pub fn not_equals(value: Option<&str>) -> Self {
        Self {
            operator: Operator::NotEq,
            value: value.map(str::to_string),
        }
    }

    /// Rewrites the clause into a filter on the allocation relation.
    pub fn rewrite(&self) -> AllocationFilter {
        match &self.value {
            None => AllocationFilter::Allocations(self.operator),
            Some(employee) => AllocationFilter::Employee(self.operator, employee.clone()),
        }
    }
}

/// Filter over a task's allocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationFilter {
    /// `Eq`: no allocations; `NotEq`: at least one allocation.
    Allocations(Operator),
    /// `Eq`: some allocation has the employee; `NotEq`: some allocation
    /// has a different employee.
    Employee(Operator, String),
}

impl AllocationFilter {
    /// Whether `task` satisfies the filter.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            AllocationFilter::Allocations(Operator::Eq) => task.allocations.is_empty(),
            AllocationFilter::Allocations(Operator::NotEq) => !task.allocations.is_empty(),
            AllocationFilter::Employee(Operator::Eq, employee) => {
                task.allocations.iter().any(|a| a.employee_id == *employee)
            }
            AllocationFilter::Employee(Operator::NotEq, employee) => {
                task.allocations.iter().any(|a| a.employee_id != *employee)
            }
        }
    }

    /// Ids of matching tasks, in store order.
    pub fn search(&self, store: &WorkStore) -> Vec<String> {
        store.filter(|t| self.matches(t))
    }
}

/// Applies booking confirmations: an unassigned task whose booking was
/// confirmed on an employee's resource gets that employee assigned.
///
/// Returns the ids of tasks that were updated.
pub fn assign_on_confirm(store: &mut WorkStore, events: &[BookingConfirmed]) -> Vec<String> {
    let mut updated = Vec::new();
    for event in events {
        let Some(task_id) = event.document.as_ref().and_then(|d| d.as_task()) else {
            continue;
        };
        let Some(employee_id) = event.employee_id.as_deref() else {
            continue;
        };
        let Some(task) = store.task_mut(task_id) else {
            continue;
        };
        if assigned_employee(task).is_some() {
            continue;
        }
        task.allocations = vec![Allocation::full(employee_id)];
        tracing::debug!(task_id = %task_id, employee_id = %employee_id, "Assigned from confirmed booking");
        updated.push(task_id.to_string());
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentRef;

    fn sample_store() -> WorkStore {
        let mut store = WorkStore::new();
        store.insert_task(Task::new("none")).unwrap();
        store
            .insert_task(Task::new("alice").with_allocation(Allocation::full("E1")))
            .unwrap();
        store
            .insert_task(
                Task::new("pair")
                    .with_allocation(Allocation::new("E2", 60.0))
                    .with_allocation(Allocation::new("E1", 40.0)),
            )
            .unwrap();
        store
    }

    fn confirmed(document: DocumentRef, employee: Option<&str>) -> BookingConfirmed {
        BookingConfirmed {
            booking_id: 1,
            resource_id: "R".into(),
            employee_id: employee.map(str::to_string),
            document: Some(document),
        }
    }

    #[test]
    fn test_read_first_allocation() {
        let store = sample_store();
        assert_eq!(assigned_employee(store.task("none").unwrap()), None);
        assert_eq!(assigned_employee(store.task("pair").unwrap()), Some("E2"));
    }

    #[test]
    fn test_write_replaces_allocations() {
        let mut store = sample_store();
        set_assigned_employee(&mut store, &["pair".to_string()], Some("E3")).unwrap();
        let pair = store.task("pair").unwrap();
        assert_eq!(pair.allocations, vec![Allocation::full("E3")]);

        set_assigned_employee(&mut store, &["pair".to_string()], None).unwrap();
        assert!(store.task("pair").unwrap().allocations.is_empty());
    }

    #[test]
    fn test_write_unknown_task_changes_nothing() {
        let mut store = sample_store();
        let result = set_assigned_employee(
            &mut store,
            &["alice".to_string(), "ghost".to_string()],
            None,
        );
        assert_eq!(result, Err(StoreError::UnknownTask("ghost".into())));
        assert_eq!(store.task("alice").unwrap().allocations.len(), 1);
    }

    #[test]
    fn test_search_rewrite() {
        assert_eq!(
            AssignedEmployeeClause::equals(None).rewrite(),
            AllocationFilter::Allocations(Operator::Eq)
        );
        assert_eq!(
            AssignedEmployeeClause::equals(Some("E1")).rewrite(),
            AllocationFilter::Employee(Operator::Eq, "E1".into())
        );
    }

    #[test]
    fn test_search_results() {
        let store = sample_store();
        let find = |clause: AssignedEmployeeClause| clause.rewrite().search(&store);

        assert_eq!(find(AssignedEmployeeClause::equals(None)), vec!["none"]);
        assert_eq!(find(AssignedEmployeeClause::not_equals(None)), vec!["alice", "pair"]);
        // Any allocation matches, not only the projected first one
        assert_eq!(find(AssignedEmployeeClause::equals(Some("E1"))), vec!["alice", "pair"]);
        assert_eq!(find(AssignedEmployeeClause::not_equals(Some("E1"))), vec!["pair"]);
    }

    #[test]
    fn test_confirmation_assigns_unassigned_task() {
        let mut store = sample_store();
        let events = vec![
            confirmed(DocumentRef::task("none"), Some("E7")),
            confirmed(DocumentRef::task("alice"), Some("E7")),
        ];
        let updated = assign_on_confirm(&mut store, &events);
        assert_eq!(updated, vec!["none"]);
        assert_eq!(assigned_employee(store.task("none").unwrap()), Some("E7"));
        assert_eq!(assigned_employee(store.task("alice").unwrap()), Some("E1"));
    }

    #[test]
    fn test_confirmation_ignores_other_documents() {
        let mut store = sample_store();
        let events = vec![
            confirmed(DocumentRef::other("meeting", "none"), Some("E7")),
            confirmed(DocumentRef::task("none"), None),
            confirmed(DocumentRef::task("ghost"), Some("E7")),
        ];
        assert!(assign_on_confirm(&mut store, &events).is_empty());
        assert!(store.task("none").unwrap().allocations.is_empty());
    }
}
