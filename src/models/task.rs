//! Task (work item) model.
//!
//! A task is a node of two graphs at once: the predecessor graph used by
//! the forward scheduler, and the parent tree used for hierarchy rollups.
//! Only `TaskType::Task` nodes carry effort and allocations; `Project`
//! nodes summarize their descendants.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Kind of work node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    /// Schedulable unit of work.
    #[default]
    Task,
    /// Container whose dates are derived from its descendants.
    Project,
}

/// A fractional commitment of one employee to a task's effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Allocated employee.
    pub employee_id: String,
    /// Share of the task's effort, in (0, 100].
    pub percentage: f64,
}

impl Allocation {
    /// Creates an allocation with an explicit percentage.
    pub fn new(employee_id: impl Into<String>, percentage: f64) -> Self {
        Self {
            employee_id: employee_id.into(),
            percentage,
        }
    }

    /// Creates a full-time (100%) allocation.
    pub fn full(employee_id: impl Into<String>) -> Self {
        Self::new(employee_id, 100.0)
    }

    /// Hours this allocation must book for a task of `effort` hours.
    pub fn hours_for(&self, effort: f64) -> f64 {
        effort * (self.percentage / 100.0)
    }
}

/// A unit of work in the dependency graph and the work hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Node kind.
    pub task_type: TaskType,
    /// Owning company (supplies the working day used for rollover).
    pub company: String,
    /// Parent node in the work hierarchy.
    pub parent: Option<String>,
    /// Tasks that must finish before this one starts (finish-to-start).
    pub predecessors: Vec<String>,
    /// Required person-hours. `None` = not estimated.
    pub effort: Option<f64>,
    /// Employee allocations, in stored order.
    pub allocations: Vec<Allocation>,
    /// Start computed by the scheduler (or rollup).
    pub planned_start: Option<NaiveDateTime>,
    /// End computed by the scheduler (or rollup).
    pub planned_end: Option<NaiveDateTime>,
    /// Target completion, settable independently of planning.
    pub expected_end: Option<NaiveDateTime>,
}

impl Task {
    /// Creates a new task-typed node with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            task_type: TaskType::Task,
            company: String::new(),
            parent: None,
            predecessors: Vec::new(),
            effort: None,
            allocations: Vec::new(),
            planned_start: None,
            planned_end: None,
            expected_end: None,
        }
    }

    /// Creates a project-typed node.
    pub fn project(id: impl Into<String>) -> Self {
        Self::new(id).with_type(TaskType::Project)
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the node kind.
    pub fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    /// Sets the owning company.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    /// Sets the parent node.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Adds a predecessor (ignored if already present).
    pub fn with_predecessor(mut self, predecessor: impl Into<String>) -> Self {
        let predecessor = predecessor.into();
        if !self.predecessors.contains(&predecessor) {
            self.predecessors.push(predecessor);
        }
        self
    }

    /// Sets the effort in hours.
    pub fn with_effort(mut self, hours: f64) -> Self {
        self.effort = Some(hours);
        self
    }

    /// Adds an allocation.
    pub fn with_allocation(mut self, allocation: Allocation) -> Self {
        self.allocations.push(allocation);
        self
    }

    /// Sets the expected end date.
    pub fn with_expected_end(mut self, at: NaiveDateTime) -> Self {
        self.expected_end = Some(at);
        self
    }

    /// Whether this node takes part in scheduling.
    pub fn is_schedulable(&self) -> bool {
        self.task_type == TaskType::Task
    }

    /// Effort if it is set and non-zero.
    pub fn positive_effort(&self) -> Option<f64> {
        self.effort.filter(|e| e.is_finite() && *e > 0.0)
    }

    /// Whether the scheduler has anything to book for this task.
    pub fn has_scheduling_inputs(&self) -> bool {
        !self.allocations.is_empty() && self.positive_effort().is_some()
    }
}
