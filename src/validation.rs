//! Input validation for resource planning.
//!
//! Checks structural integrity of tasks, allocations, and resources
//! before scheduling. Detects:
//! - Duplicate resource IDs
//! - Dangling predecessor, parent, company and employee references
//! - Allocations that cannot be mapped to exactly one resource
//! - Out-of-range percentages and efforts
//! - Circular precedence dependencies (DAG validation)
//! - Circular parent chains
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use crate::models::Resource;
use crate::store::WorkStore;
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two resources share the same ID.
    DuplicateId,
    /// A task lists itself as predecessor.
    SelfDependency,
    /// A task references a predecessor that doesn't exist.
    InvalidPredecessor,
    /// A task references a parent that doesn't exist.
    InvalidParent,
    /// A task references a company that doesn't exist.
    InvalidCompany,
    /// An allocation references an unknown employee.
    InvalidEmployee,
    /// An allocated employee has no resource, or several.
    InvalidResourceReference,
    /// Allocation percentage outside (0, 100].
    InvalidPercentage,
    /// Effort is negative or not a number.
    InvalidEffort,
    /// Precedence graph contains a cycle.
    CyclicDependency,
    /// Parent chain contains a cycle.
    CyclicHierarchy,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a store and the resources it will be scheduled on.
///
/// Checks:
/// 1. No duplicate resource IDs
/// 2. No self-dependencies; all predecessors exist
/// 3. All parents exist and parent chains are acyclic
/// 4. Task-typed nodes belong to an existing company
/// 5. Allocations reference known employees with exactly one resource
/// 6. Percentages in (0, 100], efforts finite and non-negative
/// 7. No circular precedence dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(store: &WorkStore, resources: &[Resource]) -> ValidationResult {
    let mut errors = Vec::new();

    // Resource IDs and employee → resource count
    let mut resource_ids = HashSet::new();
    let mut per_employee: HashMap<&str, usize> = HashMap::new();
    for r in resources {
        if !resource_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate resource ID: {}", r.id),
            ));
        }
        if let Some(employee) = r.employee_id.as_deref() {
            *per_employee.entry(employee).or_insert(0) += 1;
        }
    }

    for task in store.tasks() {
        for pred in &task.predecessors {
            if *pred == task.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfDependency,
                    format!("Task '{}' is its own predecessor", task.id),
                ));
            } else if !store.contains(pred) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPredecessor,
                    format!("Task '{}' references unknown predecessor '{}'", task.id, pred),
                ));
            }
        }

        if let Some(parent) = &task.parent {
            if !store.contains(parent) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidParent,
                    format!("Task '{}' references unknown parent '{}'", task.id, parent),
                ));
            }
        }

        if !task.is_schedulable() {
            continue;
        }

        if store.company(&task.company).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCompany,
                format!("Task '{}' references unknown company '{}'", task.id, task.company),
            ));
        }

        if let Some(effort) = task.effort {
            if !effort.is_finite() || effort < 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidEffort,
                    format!("Task '{}' has invalid effort {}", task.id, effort),
                ));
            }
        }

        for alloc in &task.allocations {
            if !(alloc.percentage > 0.0 && alloc.percentage <= 100.0) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPercentage,
                    format!(
                        "Task '{}' allocates {}% to '{}'",
                        task.id, alloc.percentage, alloc.employee_id
                    ),
                ));
            }
            if store.employee(&alloc.employee_id).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidEmployee,
                    format!(
                        "Task '{}' references unknown employee '{}'",
                        task.id, alloc.employee_id
                    ),
                ));
            }
            let count = per_employee
                .get(alloc.employee_id.as_str())
                .copied()
                .unwrap_or(0);
            if count != 1 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidResourceReference,
                    format!(
                        "Employee '{}' of task '{}' has {} resources",
                        alloc.employee_id, task.id, count
                    ),
                ));
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(store) {
        errors.push(cycle_err);
    }
    if let Some(hierarchy_err) = detect_parent_cycles(store) {
        errors.push(hierarchy_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the precedence graph using DFS.
///
/// # Algorithm
/// Depth-first walk along predecessor edges, keeping the current chain on a
/// path stack. Meeting a node already on the path closes a cycle, reported
/// as the path slice from that node back to itself.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(store: &WorkStore) -> Option<ValidationError> {
    let mut done = HashSet::new();
    for task in store.tasks() {
        let mut path = Vec::new();
        if let Some(cycle) = cycle_through(store, &task.id, &mut path, &mut done) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency: {}", cycle.join(" -> ")),
            ));
        }
    }
    None
}

/// `done` holds nodes whose predecessor closure is known to be acyclic.
fn cycle_through<'a>(
    store: &'a WorkStore,
    id: &'a str,
    path: &mut Vec<&'a str>,
    done: &mut HashSet<&'a str>,
) -> Option<Vec<String>> {
    if done.contains(id) {
        return None;
    }
    if let Some(pos) = path.iter().position(|p| *p == id) {
        let mut cycle: Vec<String> = path[pos..].iter().map(|p| p.to_string()).collect();
        cycle.push(id.to_string());
        return Some(cycle);
    }

    path.push(id);
    for pred in store.predecessors(id) {
        if let Some(cycle) = cycle_through(store, &pred.id, path, done) {
            return Some(cycle);
        }
    }
    path.pop();
    done.insert(id);
    None
}

/// Detects a parent chain that loops back on itself.
fn detect_parent_cycles(store: &WorkStore) -> Option<ValidationError> {
    for task in store.tasks() {
        let mut seen = HashSet::from([task.id.as_str()]);
        let mut current = task.parent.as_deref();
        while let Some(parent) = current {
            if !seen.insert(parent) {
                return Some(ValidationError::new(
                    ValidationErrorKind::CyclicHierarchy,
                    format!("Parent chain of task '{}' loops at '{parent}'", task.id),
                ));
            }
            current = store.task(parent).and_then(|t| t.parent.as_deref());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Allocation, Company, Employee, Task};

    fn sample_resources() -> Vec<Resource> {
        vec![
            Resource::for_employee("R1", "E1").with_name("Alice"),
            Resource::for_employee("R2", "E2").with_name("Bob"),
            Resource::new("room-1"),
        ]
    }

    fn base_store() -> WorkStore {
        let mut store = WorkStore::new();
        store.add_company(Company::new("C1"));
        store.add_employee(Employee::new("E1", "Alice"));
        store.add_employee(Employee::new("E2", "Bob"));
        store
    }

    fn sample_store() -> WorkStore {
        let mut store = base_store();
        store.insert_task(Task::project("P").with_company("C1")).unwrap();
        store
            .insert_task(
                Task::new("A")
                    .with_parent("P")
                    .with_company("C1")
                    .with_effort(8.0)
                    .with_allocation(Allocation::full("E1")),
            )
            .unwrap();
        store
            .insert_task(
                Task::new("B")
                    .with_parent("P")
                    .with_company("C1")
                    .with_effort(4.0)
                    .with_predecessor("A")
                    .with_allocation(Allocation::new("E2", 50.0)),
            )
            .unwrap();
        store
    }

    fn kinds(store: &WorkStore, resources: &[Resource]) -> Vec<ValidationErrorKind> {
        validate_input(store, resources)
            .unwrap_err()
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_store(), &sample_resources()).is_ok());
    }

    #[test]
    fn test_duplicate_resource_id() {
        let resources = vec![
            Resource::for_employee("R1", "E1"),
            Resource::for_employee("R1", "E2"),
        ];
        let errors = validate_input(&sample_store(), &resources).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("resource")));
    }

    #[test]
    fn test_self_dependency_via_mutation() {
        let mut store = sample_store();
        store.task_mut("A").unwrap().predecessors.push("A".into());
        assert!(kinds(&store, &sample_resources()).contains(&ValidationErrorKind::SelfDependency));
    }

    #[test]
    fn test_dangling_references() {
        let mut store = base_store();
        store
            .insert_task(
                Task::new("X")
                    .with_company("nope")
                    .with_parent("ghost")
                    .with_predecessor("missing")
                    .with_allocation(Allocation::full("E9")),
            )
            .unwrap();

        let found = kinds(&store, &sample_resources());
        for kind in [
            ValidationErrorKind::InvalidCompany,
            ValidationErrorKind::InvalidParent,
            ValidationErrorKind::InvalidPredecessor,
            ValidationErrorKind::InvalidEmployee,
            ValidationErrorKind::InvalidResourceReference,
        ] {
            assert!(found.contains(&kind), "missing {kind:?}");
        }
    }

    #[test]
    fn test_ambiguous_resource() {
        let mut resources = sample_resources();
        resources.push(Resource::for_employee("R3", "E2"));
        let errors = validate_input(&sample_store(), &resources).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidResourceReference);
        assert!(errors[0].message.contains("2 resources"));
    }

    #[test]
    fn test_out_of_range_values() {
        let mut store = sample_store();
        {
            let b = store.task_mut("B").unwrap();
            b.allocations.push(Allocation::new("E1", 0.0));
            b.allocations.push(Allocation::new("E1", 150.0));
            b.effort = Some(-1.0);
        }
        let found = kinds(&store, &sample_resources());
        assert_eq!(
            found
                .iter()
                .filter(|k| **k == ValidationErrorKind::InvalidPercentage)
                .count(),
            2
        );
        assert!(found.contains(&ValidationErrorKind::InvalidEffort));
    }

    #[test]
    fn test_over_allocation_is_accepted() {
        let mut store = sample_store();
        store
            .task_mut("A")
            .unwrap()
            .allocations
            .push(Allocation::full("E2"));
        assert!(validate_input(&store, &sample_resources()).is_ok());
    }

    #[test]
    fn test_cyclic_dependency() {
        // A → B → C → A (cycle)
        let mut store = base_store();
        for (id, pred) in [("A", "C"), ("B", "A"), ("C", "B")] {
            store
                .insert_task(Task::new(id).with_company("C1").with_predecessor(pred))
                .unwrap();
        }
        let errors = validate_input(&store, &[]).unwrap_err();
        let cycle = errors
            .iter()
            .find(|e| e.kind == ValidationErrorKind::CyclicDependency)
            .unwrap();
        assert!(cycle.message.ends_with("A -> C -> B -> A"), "{}", cycle.message);
    }

    #[test]
    fn test_shared_predecessor_is_not_a_cycle() {
        let mut store = base_store();
        store.insert_task(Task::new("A").with_company("C1")).unwrap();
        for id in ["B", "C"] {
            store
                .insert_task(Task::new(id).with_company("C1").with_predecessor("A"))
                .unwrap();
        }
        store
            .insert_task(
                Task::new("D")
                    .with_company("C1")
                    .with_predecessor("B")
                    .with_predecessor("C"),
            )
            .unwrap();
        assert!(validate_input(&store, &[]).is_ok());
    }

    #[test]
    fn test_no_cycle_in_chain() {
        let mut store = base_store();
        store.insert_task(Task::new("A").with_company("C1")).unwrap();
        store
            .insert_task(Task::new("B").with_company("C1").with_predecessor("A"))
            .unwrap();
        store
            .insert_task(Task::new("C").with_company("C1").with_predecessor("B"))
            .unwrap();
        assert!(validate_input(&store, &[]).is_ok());
    }

    #[test]
    fn test_cyclic_hierarchy() {
        let mut store = base_store();
        store.insert_task(Task::project("X").with_parent("Y")).unwrap();
        store.insert_task(Task::project("Y").with_parent("X")).unwrap();
        assert_eq!(kinds(&store, &[]), vec![ValidationErrorKind::CyclicHierarchy]);
    }
}
