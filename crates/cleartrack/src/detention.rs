//! Detention-from dates: arrival plus the job's free time.
//!
//! Free time is a job-level allowance applied to every container, so a change
//! to it fans out into one batch covering all containers. An arrival edit only
//! touches its own container.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::{add_days, format_date};
use crate::status::ContainerRecord;

/// Recomputed detention date for one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetentionUpdate {
    pub container_number: String,
    /// `None` clears the stored value.
    pub detention_from: Option<NaiveDate>,
}

impl DetentionUpdate {
    /// The value as written back to the `detention_from` field.
    pub fn persisted_value(&self) -> Option<String> {
        self.detention_from.map(format_date)
    }
}

/// Every container's detention date after a free-time change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetentionPlan {
    pub free_time_days: u32,
    pub updates: Vec<DetentionUpdate>,
}

impl DetentionPlan {
    /// Number of containers whose stored value actually moves.
    pub fn changed_count(&self, containers: &[ContainerRecord]) -> usize {
        self.updates
            .iter()
            .filter(|update| {
                containers
                    .iter()
                    .find(|c| c.container_number == update.container_number)
                    .map_or(true, |c| c.detention_from_date != update.detention_from)
            })
            .count()
    }
}

/// `arrival + free_time_days`, or `None` when there is no arrival.
pub fn compute_detention_from(arrival: Option<NaiveDate>, free_time_days: u32) -> Option<NaiveDate> {
    arrival.and_then(|date| add_days(date, free_time_days))
}

/// Recomputes one container after its arrival date was edited.
pub fn plan_arrival_change(
    container_number: &str,
    arrival: Option<NaiveDate>,
    free_time_days: u32,
) -> DetentionUpdate {
    DetentionUpdate {
        container_number: container_number.to_string(),
        detention_from: compute_detention_from(arrival, free_time_days),
    }
}

/// Recomputes every container of a job for a new free-time allowance.
pub fn plan_free_time_change(containers: &[ContainerRecord], free_time_days: u32) -> DetentionPlan {
    DetentionPlan {
        free_time_days,
        updates: containers
            .iter()
            .map(|c| plan_arrival_change(&c.container_number, c.arrival_date, free_time_days))
            .collect(),
    }
}
