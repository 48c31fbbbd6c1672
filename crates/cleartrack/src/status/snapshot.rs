use chrono::{NaiveDate, NaiveDateTime};

use super::DetailedStatus;
use crate::dates::non_blank;

/// Bill-of-entry type of a job. Only `ExBond` changes classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BillOfEntryType {
    #[default]
    Normal,
    ExBond,
    InBond,
    Other(String),
}

impl BillOfEntryType {
    /// Reads the persisted `type_of_b_e` value. Blank means `Normal`.
    pub fn parse(value: Option<&str>) -> Self {
        let Some(raw) = non_blank(value) else {
            return BillOfEntryType::Normal;
        };
        let folded: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "normal" | "home" | "homeconsumption" => BillOfEntryType::Normal,
            "exbond" => BillOfEntryType::ExBond,
            "inbond" => BillOfEntryType::InBond,
            _ => BillOfEntryType::Other(raw.to_string()),
        }
    }
}

/// Consignment type of a job. Only `Lcl` changes classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConsignmentType {
    #[default]
    Fcl,
    Lcl,
    Other(String),
}

impl ConsignmentType {
    /// Reads the persisted `consignment_type` value. Blank means `Fcl`.
    pub fn parse(value: Option<&str>) -> Self {
        let Some(raw) = non_blank(value) else {
            return ConsignmentType::Fcl;
        };
        if raw.eq_ignore_ascii_case("lcl") {
            ConsignmentType::Lcl
        } else if raw.eq_ignore_ascii_case("fcl") {
            ConsignmentType::Fcl
        } else {
            ConsignmentType::Other(raw.to_string())
        }
    }
}

/// One physical container tied to a job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerRecord {
    pub container_number: String,
    pub arrival_date: Option<NaiveDate>,
    pub rail_out_date: Option<NaiveDateTime>,
    pub empty_offload_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    /// Derived from `arrival_date` and `free_time_days`; never authoritative.
    pub detention_from_date: Option<NaiveDate>,
    /// Job-level free time, repeated on every container.
    pub free_time_days: u32,
}

/// Immutable view of one shipment at evaluation time.
///
/// Missing and malformed dates are both `None` by the time they get here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobSnapshot {
    pub job_no: String,
    pub bill_of_entry_number: Option<String>,
    pub vessel_berthing_date: Option<NaiveDateTime>,
    pub gateway_igm_date: Option<NaiveDateTime>,
    pub discharge_date: Option<NaiveDateTime>,
    pub pcv_date: Option<NaiveDateTime>,
    pub out_of_charge_date: Option<NaiveDateTime>,
    pub assessment_date: Option<NaiveDateTime>,
    pub type_of_bill_of_entry: BillOfEntryType,
    pub consignment_type: ConsignmentType,
    pub containers: Vec<ContainerRecord>,
    pub current_status: Option<DetailedStatus>,
}

impl JobSnapshot {
    pub fn has_bill_of_entry(&self) -> bool {
        non_blank(self.bill_of_entry_number.as_deref()).is_some()
    }

    pub fn any_arrived(&self) -> bool {
        self.containers.iter().any(|c| c.arrival_date.is_some())
    }

    /// True only when there is at least one container and all satisfy `pred`.
    pub fn all_containers<F>(&self, pred: F) -> bool
    where
        F: Fn(&ContainerRecord) -> bool,
    {
        !self.containers.is_empty() && self.containers.iter().all(pred)
    }

    pub fn all_rail_out(&self) -> bool {
        self.all_containers(|c| c.rail_out_date.is_some())
    }

    pub fn all_empty_offloaded(&self) -> bool {
        self.all_containers(|c| c.empty_offload_date.is_some())
    }

    pub fn all_delivered(&self) -> bool {
        self.all_containers(|c| c.delivery_date.is_some())
    }

    /// Ex-bond and LCL jobs finish at delivery instead of empty offload.
    pub fn is_ex_bond_or_lcl(&self) -> bool {
        self.type_of_bill_of_entry == BillOfEntryType::ExBond
            || self.consignment_type == ConsignmentType::Lcl
    }

    pub fn terminal_container_milestone(&self) -> bool {
        if self.is_ex_bond_or_lcl() {
            self.all_delivered()
        } else {
            self.all_empty_offloaded()
        }
    }

    /// The date that ends a container's life on this job, by job type.
    pub fn terminal_date(&self, container: &ContainerRecord) -> Option<NaiveDate> {
        if self.is_ex_bond_or_lcl() {
            container.delivery_date
        } else {
            container.empty_offload_date
        }
    }
}
