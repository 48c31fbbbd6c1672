//! Deadline-proximity bucketing used to flag jobs in the job list.
//!
//! Which policy applies is decided by the job's status alone; at most one
//! policy is active for any status.

pub mod bucketer;
pub mod thresholds;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::status::DetailedStatus;

pub use bucketer::{DeadlineBucketer, JobUrgency};
pub use thresholds::{BillingThresholds, BucketThresholds, DetentionThresholds, EtaThresholds};

/// Urgency of a job or container, least to most severe.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyBucket {
    #[default]
    None,
    Low,
    Elevated,
    High,
    Critical,
}

impl fmt::Display for UrgencyBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UrgencyBucket::None => "none",
            UrgencyBucket::Low => "low",
            UrgencyBucket::Elevated => "elevated",
            UrgencyBucket::High => "high",
            UrgencyBucket::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// Cell colours for a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub background: &'static str,
    pub text: &'static str,
}

const WHITE: &str = "#ffffff";
const BLACK: &str = "#000000";

impl Highlight {
    const fn new(background: &'static str, text: &'static str) -> Self {
        Self { background, text }
    }
}

/// The three deadline policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Vessel berthing approaching, for jobs still at ETA.
    UpcomingEta,
    /// Time since the last container finished, for jobs awaiting billing.
    BillingAging,
    /// Time until detention starts, per container, for jobs in clearance.
    DetentionAging,
}

impl Policy {
    pub fn for_status(status: DetailedStatus) -> Option<Policy> {
        match status {
            DetailedStatus::EstimatedTimeOfArrival => Some(Policy::UpcomingEta),
            DetailedStatus::BillingPending => Some(Policy::BillingAging),
            DetailedStatus::CustomClearanceCompleted
            | DetailedStatus::BeNotedClearancePending
            | DetailedStatus::PcvDoneDutyPaymentPending => Some(Policy::DetentionAging),
            _ => None,
        }
    }

    /// Display colours; `None` means the cell is left unstyled.
    pub fn highlight(&self, bucket: UrgencyBucket) -> Option<Highlight> {
        match (self, bucket) {
            (Policy::UpcomingEta, UrgencyBucket::Critical) => Some(Highlight::new("#d32f2f", WHITE)),
            (Policy::UpcomingEta, UrgencyBucket::High) => Some(Highlight::new("#e57373", BLACK)),
            (Policy::UpcomingEta, UrgencyBucket::Elevated) => Some(Highlight::new("#ffcdd2", BLACK)),

            (Policy::BillingAging, UrgencyBucket::Critical) => Some(Highlight::new("#ef5350", WHITE)),
            (Policy::BillingAging, UrgencyBucket::Elevated) => Some(Highlight::new("#ffa726", BLACK)),
            (Policy::BillingAging, _) => Some(Highlight::new(WHITE, BLACK)),

            (Policy::DetentionAging, UrgencyBucket::Critical) => {
                Some(Highlight::new("#b71c1c", WHITE))
            }
            (Policy::DetentionAging, UrgencyBucket::High) => Some(Highlight::new("#f44336", WHITE)),
            (Policy::DetentionAging, UrgencyBucket::Elevated) => {
                Some(Highlight::new("#ff9800", BLACK))
            }
            (Policy::DetentionAging, UrgencyBucket::Low) => Some(Highlight::new("#ffeb3b", BLACK)),

            _ => None,
        }
    }
}
