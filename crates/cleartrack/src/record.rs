//! Persisted job and container records.
//!
//! Field names follow the job store's existing shape, including the one
//! camel-cased container field. Dates stay as raw strings here; they are only
//! interpreted when a [`JobSnapshot`] is assembled.

use serde::{Deserialize, Deserializer, Serialize};

use crate::dates::{non_blank, parse_date, parse_datetime};
use crate::status::{BillOfEntryType, ConsignmentType, ContainerRecord, DetailedStatus, JobSnapshot};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerRow {
    pub container_number: String,
    #[serde(default)]
    pub arrival_date: Option<String>,
    #[serde(default)]
    pub container_rail_out_date: Option<String>,
    #[serde(rename = "emptyContainerOffLoadDate", default)]
    pub empty_container_off_load_date: Option<String>,
    #[serde(default)]
    pub delivery_date: Option<String>,
    #[serde(default)]
    pub detention_from: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_no: String,
    #[serde(default)]
    pub be_no: Option<String>,
    #[serde(default)]
    pub vessel_berthing: Option<String>,
    #[serde(default)]
    pub gateway_igm_date: Option<String>,
    #[serde(default)]
    pub discharge_date: Option<String>,
    #[serde(default)]
    pub pcv_date: Option<String>,
    #[serde(default)]
    pub out_of_charge: Option<String>,
    #[serde(default)]
    pub assessment_date: Option<String>,
    #[serde(default)]
    pub type_of_b_e: Option<String>,
    #[serde(default)]
    pub consignment_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_free_time")]
    pub free_time: u32,
    #[serde(default)]
    pub detailed_status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_containers")]
    pub container_nos: Vec<ContainerRow>,
}

/// Free time arrives as a number, a numeric string, or blank.
fn deserialize_free_time<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| D::Error::custom(format!("Invalid free_time: {}", n))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u32>()
            .map_err(|e| D::Error::custom(format!("Invalid free_time '{}': {}", s, e))),
        Some(other) => Err(D::Error::custom(format!("Invalid free_time: {}", other))),
    }
}

/// A `null` container list is the same as an empty one.
fn deserialize_containers<'de, D>(deserializer: D) -> Result<Vec<ContainerRow>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ContainerRow>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ContainerRow {
    pub fn to_container(&self, free_time_days: u32) -> ContainerRecord {
        ContainerRecord {
            container_number: self.container_number.clone(),
            arrival_date: parse_date(self.arrival_date.as_deref()),
            rail_out_date: parse_datetime(self.container_rail_out_date.as_deref()),
            empty_offload_date: parse_date(self.empty_container_off_load_date.as_deref()),
            delivery_date: parse_date(self.delivery_date.as_deref()),
            detention_from_date: parse_date(self.detention_from.as_deref()),
            free_time_days,
        }
    }

    pub fn set_field(&mut self, field: ContainerField, value: Option<String>) {
        let slot = match field {
            ContainerField::ArrivalDate => &mut self.arrival_date,
            ContainerField::RailOutDate => &mut self.container_rail_out_date,
            ContainerField::EmptyOffloadDate => &mut self.empty_container_off_load_date,
            ContainerField::DeliveryDate => &mut self.delivery_date,
        };
        *slot = value;
    }
}

impl JobRecord {
    /// Builds the classifier's view of this record.
    ///
    /// An unrecognised `detailed_status` is dropped with a warning so the
    /// next evaluation overwrites it.
    pub fn to_snapshot(&self) -> JobSnapshot {
        let current_status = non_blank(self.detailed_status.as_deref()).and_then(|raw| {
            raw.parse::<DetailedStatus>()
                .map_err(|e| {
                    log::warn!("Job {}: {}, treating as unset", self.job_no, e);
                })
                .ok()
        });

        JobSnapshot {
            job_no: self.job_no.clone(),
            bill_of_entry_number: non_blank(self.be_no.as_deref()).map(str::to_string),
            vessel_berthing_date: parse_datetime(self.vessel_berthing.as_deref()),
            gateway_igm_date: parse_datetime(self.gateway_igm_date.as_deref()),
            discharge_date: parse_datetime(self.discharge_date.as_deref()),
            pcv_date: parse_datetime(self.pcv_date.as_deref()),
            out_of_charge_date: parse_datetime(self.out_of_charge.as_deref()),
            assessment_date: parse_datetime(self.assessment_date.as_deref()),
            type_of_bill_of_entry: BillOfEntryType::parse(self.type_of_b_e.as_deref()),
            consignment_type: ConsignmentType::parse(self.consignment_type.as_deref()),
            containers: self
                .container_nos
                .iter()
                .map(|row| row.to_container(self.free_time))
                .collect(),
            current_status,
        }
    }

    pub fn container(&self, container_number: &str) -> Option<&ContainerRow> {
        self.container_nos
            .iter()
            .find(|c| c.container_number == container_number)
    }

    pub fn container_mut(&mut self, container_number: &str) -> Option<&mut ContainerRow> {
        self.container_nos
            .iter_mut()
            .find(|c| c.container_number == container_number)
    }

    pub fn set_field(&mut self, field: JobField, value: Option<String>) {
        let slot = match field {
            JobField::BillOfEntryNumber => &mut self.be_no,
            JobField::VesselBerthing => &mut self.vessel_berthing,
            JobField::GatewayIgmDate => &mut self.gateway_igm_date,
            JobField::DischargeDate => &mut self.discharge_date,
            JobField::PcvDate => &mut self.pcv_date,
            JobField::OutOfCharge => &mut self.out_of_charge,
            JobField::AssessmentDate => &mut self.assessment_date,
            JobField::TypeOfBillOfEntry => &mut self.type_of_b_e,
            JobField::ConsignmentType => &mut self.consignment_type,
        };
        *slot = value;
    }
}

/// Editable job-level fields that feed classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobField {
    #[serde(rename = "be_no")]
    BillOfEntryNumber,
    #[serde(rename = "vessel_berthing")]
    VesselBerthing,
    #[serde(rename = "gateway_igm_date")]
    GatewayIgmDate,
    #[serde(rename = "discharge_date")]
    DischargeDate,
    #[serde(rename = "pcv_date")]
    PcvDate,
    #[serde(rename = "out_of_charge")]
    OutOfCharge,
    #[serde(rename = "assessment_date")]
    AssessmentDate,
    #[serde(rename = "type_of_b_e")]
    TypeOfBillOfEntry,
    #[serde(rename = "consignment_type")]
    ConsignmentType,
}

impl JobField {
    /// Column in the `jobs` table. Job field names double as column names.
    pub fn column(&self) -> &'static str {
        match self {
            JobField::BillOfEntryNumber => "be_no",
            JobField::VesselBerthing => "vessel_berthing",
            JobField::GatewayIgmDate => "gateway_igm_date",
            JobField::DischargeDate => "discharge_date",
            JobField::PcvDate => "pcv_date",
            JobField::OutOfCharge => "out_of_charge",
            JobField::AssessmentDate => "assessment_date",
            JobField::TypeOfBillOfEntry => "type_of_b_e",
            JobField::ConsignmentType => "consignment_type",
        }
    }
}

/// Editable container dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerField {
    #[serde(rename = "arrival_date")]
    ArrivalDate,
    #[serde(rename = "container_rail_out_date")]
    RailOutDate,
    #[serde(rename = "emptyContainerOffLoadDate")]
    EmptyOffloadDate,
    #[serde(rename = "delivery_date")]
    DeliveryDate,
}

impl ContainerField {
    /// Column in the `containers` table.
    pub fn column(&self) -> &'static str {
        match self {
            ContainerField::ArrivalDate => "arrival_date",
            ContainerField::RailOutDate => "container_rail_out_date",
            ContainerField::EmptyOffloadDate => "empty_container_off_load_date",
            ContainerField::DeliveryDate => "delivery_date",
        }
    }
}
