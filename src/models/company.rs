//! Company and employee directory records.

use serde::{Deserialize, Serialize};

use super::WorkingHours;

/// A company owning tasks; defines the working day used for rollover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    /// Unique company identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Daily working window.
    pub hours: WorkingHours,
}

impl Company {
    /// Creates a company with the default 09:00-17:00 working day.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            hours: WorkingHours::default(),
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the working hours.
    pub fn with_hours(mut self, hours: WorkingHours) -> Self {
        self.hours = hours;
        self
    }
}

/// An employee that can be allocated to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Employee {
    /// Creates an employee.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
