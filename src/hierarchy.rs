//! Work hierarchy date rollups.
//!
//! A project node has no dates of its own: its effective range is derived
//! from the tasks below it. Rollups are read-only; the only write in this
//! module is the downward propagation of an expected end date.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::Task;
use crate::store::{StoreError, WorkStore};

/// Date field that can be rolled up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateField {
    /// Earliest planned start.
    PlannedStart,
    /// Latest planned end.
    PlannedEnd,
    /// Latest expected end.
    ExpectedEnd,
}

impl DateField {
    /// Value of this field on a task.
    pub fn value(self, task: &Task) -> Option<NaiveDateTime> {
        match self {
            DateField::PlannedStart => task.planned_start,
            DateField::PlannedEnd => task.planned_end,
            DateField::ExpectedEnd => task.expected_end,
        }
    }

    /// Start fields reduce with `min`, end fields with `max`.
    pub fn is_start(self) -> bool {
        matches!(self, DateField::PlannedStart)
    }

    fn reduce(self, a: NaiveDateTime, b: NaiveDateTime) -> NaiveDateTime {
        if self.is_start() {
            a.min(b)
        } else {
            a.max(b)
        }
    }
}

/// Rolled-up dates per node and field.
pub type ProjectDates = HashMap<String, HashMap<DateField, Option<NaiveDateTime>>>;

/// Rolls up `fields` over each node and all of its descendants.
///
/// Unset values are ignored; a field with no value anywhere below the node
/// is `None`. Unknown nodes get `None` for every field.
pub fn project_dates(store: &WorkStore, nodes: &[String], fields: &[DateField]) -> ProjectDates {
    let mut result = ProjectDates::new();
    for node in nodes {
        let subtree = store.descendants(node);
        let values = fields
            .iter()
            .map(|&field| {
                let rolled = subtree
                    .iter()
                    .filter_map(|t| field.value(t))
                    .reduce(|a, b| field.reduce(a, b));
                (field, rolled)
            })
            .collect();
        result.insert(node.clone(), values);
    }
    result
}

/// Overwrites `expected_end` on every node and descendant of `nodes`.
///
/// Returns the number of tasks written.
pub fn set_expected_end_project(
    store: &mut WorkStore,
    nodes: &[String],
    value: Option<NaiveDateTime>,
) -> Result<usize, StoreError> {
    let mut targets: Vec<String> = Vec::new();
    for node in nodes {
        if !store.contains(node) {
            return Err(StoreError::UnknownTask(node.clone()));
        }
        for task in store.descendants(node) {
            if !targets.contains(&task.id) {
                targets.push(task.id.clone());
            }
        }
    }
    for id in &targets {
        store.set_expected_end(id, value)?;
    }
    tracing::debug!(count = targets.len(), "Propagated expected end date");
    Ok(targets.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sample_store() -> WorkStore {
        let mut store = WorkStore::new();
        store.insert_task(Task::project("P")).unwrap();
        store.insert_task(Task::project("Sub").with_parent("P")).unwrap();
        store.insert_task(Task::project("Empty")).unwrap();
        store.insert_task(Task::new("Blank").with_parent("Empty")).unwrap();

        let mut t1 = Task::new("T1").with_parent("P");
        t1.planned_start = Some(at(2, 9));
        t1.planned_end = Some(at(2, 17));
        let mut t2 = Task::new("T2").with_parent("Sub");
        t2.planned_start = Some(at(1, 13));
        t2.planned_end = Some(at(4, 11));
        let t3 = Task::new("T3").with_parent("Sub").with_expected_end(at(9, 17));
        store.insert_task(t1).unwrap();
        store.insert_task(t2).unwrap();
        store.insert_task(t3).unwrap();
        store
    }

    #[test]
    fn test_min_start_max_end() {
        let store = sample_store();
        let dates = project_dates(
            &store,
            &ids(&["P", "Sub"]),
            &[DateField::PlannedStart, DateField::PlannedEnd, DateField::ExpectedEnd],
        );

        let p = &dates["P"];
        assert_eq!(p[&DateField::PlannedStart], Some(at(1, 13)));
        assert_eq!(p[&DateField::PlannedEnd], Some(at(4, 11)));
        assert_eq!(p[&DateField::ExpectedEnd], Some(at(9, 17)));

        let sub = &dates["Sub"];
        assert_eq!(sub[&DateField::PlannedStart], Some(at(1, 13)));
        assert_eq!(sub[&DateField::PlannedEnd], Some(at(4, 11)));
    }

    #[test]
    fn test_no_scheduled_descendants() {
        let store = sample_store();
        let dates = project_dates(
            &store,
            &ids(&["Empty", "missing"]),
            &[DateField::PlannedStart, DateField::PlannedEnd],
        );
        assert_eq!(dates["Empty"][&DateField::PlannedStart], None);
        assert_eq!(dates["Empty"][&DateField::PlannedEnd], None);
        assert_eq!(dates["missing"][&DateField::PlannedEnd], None);
    }

    #[test]
    fn test_rollup_does_not_mutate() {
        let store = sample_store();
        let _ = project_dates(&store, &ids(&["P"]), &[DateField::PlannedStart]);
        assert_eq!(store.task("P").unwrap().planned_start, None);
    }

    #[test]
    fn test_set_expected_end_overwrites_subtree() {
        let mut store = sample_store();
        let written = set_expected_end_project(&mut store, &ids(&["Sub", "P"]), Some(at(12, 17)))
            .unwrap();
        assert_eq!(written, 5); // overlapping subtrees are written once
        for id in ["P", "Sub", "T1", "T2", "T3"] {
            assert_eq!(store.task(id).unwrap().expected_end, Some(at(12, 17)), "{id}");
        }
        assert_eq!(store.task("Blank").unwrap().expected_end, None);
    }

    #[test]
    fn test_set_expected_end_unknown_node() {
        let mut store = sample_store();
        assert_eq!(
            set_expected_end_project(&mut store, &ids(&["nope"]), None),
            Err(StoreError::UnknownTask("nope".into()))
        );
    }
}
