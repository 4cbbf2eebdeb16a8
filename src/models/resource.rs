//! Bookable resource model.
//!
//! A resource is anything whose calendar can be reserved. In project
//! planning it is usually a person, linked to an employee record; the
//! scheduler finds resources through that link.

use serde::{Deserialize, Serialize};

use super::WorkingHours;

/// A resource with a working-hours calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Employee this resource represents, if any.
    pub employee_id: Option<String>,
    /// Daily working window (weekdays only).
    pub hours: WorkingHours,
}

impl Resource {
    /// Creates a resource with the default working day.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            employee_id: None,
            hours: WorkingHours::default(),
        }
    }

    /// Creates a resource representing an employee.
    pub fn for_employee(id: impl Into<String>, employee_id: impl Into<String>) -> Self {
        Self::new(id).with_employee(employee_id)
    }

    /// Sets the resource name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Links the resource to an employee.
    pub fn with_employee(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    /// Sets the working hours.
    pub fn with_hours(mut self, hours: WorkingHours) -> Self {
        self.hours = hours;
        self
    }

    /// Whether this resource represents `employee_id`.
    pub fn belongs_to(&self, employee_id: &str) -> bool {
        self.employee_id.as_deref() == Some(employee_id)
    }
}
