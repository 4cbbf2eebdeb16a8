//! In-memory work store.
//!
//! Holds tasks, companies and employees and exposes the two graph views
//! the planner needs: the predecessor graph (for scheduling) and the parent
//! tree (for hierarchy rollups). Tasks keep their insertion order, which is
//! the order every listing returns.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

use crate::models::{Company, Employee, Task, WorkingHours};

/// Errors raised by store mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A task with this id already exists.
    #[error("Duplicate task ID: {0}")]
    DuplicateId(String),

    /// No task with this id.
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    /// A task may not depend on itself.
    #[error("Task '{0}' cannot be its own predecessor")]
    SelfDependency(String),
}

/// Task, company and employee records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkStore {
    tasks: HashMap<String, Task>,
    order: Vec<String>,
    companies: HashMap<String, Company>,
    employees: HashMap<String, Employee>,
}

impl WorkStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a task.
    ///
    /// Rejects duplicate ids and self-referencing predecessor lists.
    pub fn insert_task(&mut self, task: Task) -> Result<(), StoreError> {
        if self.tasks.contains_key(&task.id) {
            return Err(StoreError::DuplicateId(task.id));
        }
        if task.predecessors.iter().any(|p| *p == task.id) {
            return Err(StoreError::SelfDependency(task.id));
        }
        self.order.push(task.id.clone());
        self.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    /// Registers (or replaces) a company.
    pub fn add_company(&mut self, company: Company) {
        self.companies.insert(company.id.clone(), company);
    }

    /// Registers (or replaces) an employee.
    pub fn add_employee(&mut self, employee: Employee) {
        self.employees.insert(employee.id.clone(), employee);
    }

    /// Looks up a task.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Looks up a task for mutation.
    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    /// Whether a task exists.
    pub fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.order.iter().filter_map(|id| self.tasks.get(id))
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store has no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Ids of tasks matching `predicate`, in insertion order.
    pub fn filter<F>(&self, predicate: F) -> Vec<String>
    where
        F: Fn(&Task) -> bool,
    {
        self.tasks()
            .filter(|t| predicate(t))
            .map(|t| t.id.clone())
            .collect()
    }

    /// Company record.
    pub fn company(&self, id: &str) -> Option<&Company> {
        self.companies.get(id)
    }

    /// Working hours of the company owning `task_id`.
    pub fn company_hours(&self, task_id: &str) -> Option<WorkingHours> {
        let task = self.tasks.get(task_id)?;
        self.companies.get(&task.company).map(|c| c.hours)
    }

    /// Employee record.
    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.employees.get(id)
    }

    /// Display name of an employee, falling back to the id.
    pub fn employee_name(&self, id: &str) -> String {
        self.employees
            .get(id)
            .map(|e| e.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| id.to_string())
    }

    // ---- Predecessor graph ----

    /// Direct predecessors of a task, in stored order. Unknown ids are skipped.
    pub fn predecessors(&self, id: &str) -> Vec<&Task> {
        self.tasks
            .get(id)
            .map(|t| {
                t.predecessors
                    .iter()
                    .filter_map(|p| self.tasks.get(p))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Direct successors of a task, in insertion order.
    pub fn successors(&self, id: &str) -> Vec<&Task> {
        self.tasks()
            .filter(|t| t.predecessors.iter().any(|p| p == id))
            .collect()
    }

    /// Adds a finish-to-start edge `predecessor → successor`.
    pub fn add_predecessor(&mut self, successor: &str, predecessor: &str) -> Result<(), StoreError> {
        if successor == predecessor {
            return Err(StoreError::SelfDependency(successor.to_string()));
        }
        if !self.tasks.contains_key(predecessor) {
            return Err(StoreError::UnknownTask(predecessor.to_string()));
        }
        let task = self
            .tasks
            .get_mut(successor)
            .ok_or_else(|| StoreError::UnknownTask(successor.to_string()))?;
        if !task.predecessors.iter().any(|p| p == predecessor) {
            task.predecessors.push(predecessor.to_string());
        }
        Ok(())
    }

    // ---- Work hierarchy ----

    /// A node and all of its descendants (breadth-first).
    ///
    /// Returns an empty list for unknown ids. Parent cycles are not followed
    /// twice.
    pub fn descendants(&self, id: &str) -> Vec<&Task> {
        let Some(root) = self.tasks.get(id) else {
            return Vec::new();
        };

        let mut children: HashMap<&str, Vec<&Task>> = HashMap::new();
        for task in self.tasks() {
            if let Some(parent) = task.parent.as_deref() {
                children.entry(parent).or_default().push(task);
            }
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = Vec::new();
        let mut queue = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            if !seen.insert(node.id.as_str()) {
                continue;
            }
            out.push(node);
            if let Some(kids) = children.get(node.id.as_str()) {
                queue.extend(kids.iter().copied());
            }
        }
        out
    }

    // ---- Restricted writes ----

    /// Writes the scheduler's result onto a task.
    pub fn set_planned_dates(
        &mut self,
        id: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<(), StoreError> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownTask(id.to_string()))?;
        task.planned_start = start;
        task.planned_end = end;
        Ok(())
    }

    /// Overwrites the expected end date of a task.
    pub fn set_expected_end(&mut self, id: &str, value: Option<NaiveDateTime>) -> Result<(), StoreError> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownTask(id.to_string()))?;
        task.expected_end = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Allocation;

    fn sample_store() -> WorkStore {
        let mut store = WorkStore::new();
        store.add_company(Company::new("C1"));
        store.add_employee(Employee::new("E1", "Alice"));
        store.insert_task(Task::project("P")).unwrap();
        store.insert_task(Task::new("A").with_parent("P").with_company("C1")).unwrap();
        store
            .insert_task(Task::new("B").with_parent("P").with_predecessor("A"))
            .unwrap();
        store
            .insert_task(
                Task::new("C")
                    .with_parent("B")
                    .with_predecessor("A")
                    .with_predecessor("B")
                    .with_allocation(Allocation::full("E1")),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut store = sample_store();
        assert_eq!(
            store.insert_task(Task::new("A")),
            Err(StoreError::DuplicateId("A".into()))
        );
    }

    #[test]
    fn test_insert_rejects_self_dependency() {
        let mut store = WorkStore::new();
        assert_eq!(
            store.insert_task(Task::new("X").with_predecessor("X")),
            Err(StoreError::SelfDependency("X".into()))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_insertion_order() {
        let store = sample_store();
        let ids: Vec<_> = store.tasks().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["P", "A", "B", "C"]);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_predecessors_and_successors() {
        let store = sample_store();
        let preds: Vec<_> = store.predecessors("C").iter().map(|t| t.id.clone()).collect();
        assert_eq!(preds, vec!["A", "B"]);
        let succs: Vec<_> = store.successors("A").iter().map(|t| t.id.clone()).collect();
        assert_eq!(succs, vec!["B", "C"]);
        assert!(store.predecessors("missing").is_empty());
    }

    #[test]
    fn test_add_predecessor() {
        let mut store = sample_store();
        assert_eq!(
            store.add_predecessor("A", "A"),
            Err(StoreError::SelfDependency("A".into()))
        );
        assert_eq!(
            store.add_predecessor("A", "nope"),
            Err(StoreError::UnknownTask("nope".into()))
        );
        store.add_predecessor("B", "A").unwrap(); // already present
        assert_eq!(store.task("B").unwrap().predecessors.len(), 1);

        store.add_predecessor("A", "P").unwrap();
        let succs: Vec<_> = store.successors("P").iter().map(|t| t.id.clone()).collect();
        assert_eq!(succs, vec!["A"]);
    }

    #[test]
    fn test_descendants_inclusive() {
        let store = sample_store();
        let ids: Vec<_> = store.descendants("P").iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec!["P", "A", "B", "C"]);
        let ids: Vec<_> = store.descendants("B").iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec!["B", "C"]);
        assert!(store.descendants("missing").is_empty());
    }

    #[test]
    fn test_descendants_tolerates_parent_cycle() {
        let mut store = WorkStore::new();
        store.insert_task(Task::new("X").with_parent("Y")).unwrap();
        store.insert_task(Task::new("Y").with_parent("X")).unwrap();
        assert_eq!(store.descendants("X").len(), 2);
    }

    #[test]
    fn test_directory_lookups() {
        let store = sample_store();
        assert_eq!(store.employee_name("E1"), "Alice");
        assert_eq!(store.employee_name("E9"), "E9");
        assert_eq!(store.company_hours("A"), Some(WorkingHours::default()));
        assert_eq!(store.company_hours("B"), None); // no company set
    }
}
