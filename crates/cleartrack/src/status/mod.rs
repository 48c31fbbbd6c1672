//! Detailed shipment status and the rule cascade that derives it.

pub mod classifier;
pub mod snapshot;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use classifier::{classify, Classification, StatusClassifier, StatusRule};
pub use snapshot::{BillOfEntryType, ConsignmentType, ContainerRecord, JobSnapshot};

/// Lifecycle stage of an import job, ordered earliest to most advanced.
///
/// The display strings are shared with the job tables and the persisted
/// `detailed_status` column, so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DetailedStatus {
    #[serde(rename = "ETA Date Pending")]
    EtaDatePending,
    #[serde(rename = "Estimated Time of Arrival")]
    EstimatedTimeOfArrival,
    #[serde(rename = "Gateway IGM Filed")]
    GatewayIgmFiled,
    #[serde(rename = "Discharged")]
    Discharged,
    #[serde(rename = "Rail Out")]
    RailOut,
    #[serde(rename = "Arrived, BE Note Pending")]
    ArrivedBeNotePending,
    #[serde(rename = "BE Noted, Arrival Pending")]
    BeNotedArrivalPending,
    #[serde(rename = "BE Noted, Clearance Pending")]
    BeNotedClearancePending,
    #[serde(rename = "PCV Done, Duty Payment Pending")]
    PcvDoneDutyPaymentPending,
    #[serde(rename = "Custom Clearance Completed")]
    CustomClearanceCompleted,
    #[serde(rename = "Billing Pending")]
    BillingPending,
}

impl DetailedStatus {
    pub const ALL: [DetailedStatus; 11] = [
        DetailedStatus::EtaDatePending,
        DetailedStatus::EstimatedTimeOfArrival,
        DetailedStatus::GatewayIgmFiled,
        DetailedStatus::Discharged,
        DetailedStatus::RailOut,
        DetailedStatus::ArrivedBeNotePending,
        DetailedStatus::BeNotedArrivalPending,
        DetailedStatus::BeNotedClearancePending,
        DetailedStatus::PcvDoneDutyPaymentPending,
        DetailedStatus::CustomClearanceCompleted,
        DetailedStatus::BillingPending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DetailedStatus::EtaDatePending => "ETA Date Pending",
            DetailedStatus::EstimatedTimeOfArrival => "Estimated Time of Arrival",
            DetailedStatus::GatewayIgmFiled => "Gateway IGM Filed",
            DetailedStatus::Discharged => "Discharged",
            DetailedStatus::RailOut => "Rail Out",
            DetailedStatus::ArrivedBeNotePending => "Arrived, BE Note Pending",
            DetailedStatus::BeNotedArrivalPending => "BE Noted, Arrival Pending",
            DetailedStatus::BeNotedClearancePending => "BE Noted, Clearance Pending",
            DetailedStatus::PcvDoneDutyPaymentPending => "PCV Done, Duty Payment Pending",
            DetailedStatus::CustomClearanceCompleted => "Custom Clearance Completed",
            DetailedStatus::BillingPending => "Billing Pending",
        }
    }
}

impl fmt::Display for DetailedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `detailed_status` value that is not one of the known labels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown detailed status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for DetailedStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        DetailedStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == trimmed)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
