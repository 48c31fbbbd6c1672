//! Builders for job and container records.
//!
//! Records are built in their persisted (string) shape so every test goes
//! through the same lenient date parsing as production data.

#![allow(dead_code)]

use chrono::NaiveDate;

use cleartrack::record::{ContainerRow, JobRecord};
use cleartrack::status::JobSnapshot;

pub fn day(year: i32, month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, d).expect("valid test date")
}

/// Builder for `ContainerRow` instances.
pub struct ContainerBuilder {
    row: ContainerRow,
}

impl ContainerBuilder {
    pub fn new(container_number: &str) -> Self {
        Self {
            row: ContainerRow {
                container_number: container_number.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn arrived(mut self, date: &str) -> Self {
        self.row.arrival_date = Some(date.to_string());
        self
    }

    pub fn rail_out(mut self, date: &str) -> Self {
        self.row.container_rail_out_date = Some(date.to_string());
        self
    }

    pub fn empty_offloaded(mut self, date: &str) -> Self {
        self.row.empty_container_off_load_date = Some(date.to_string());
        self
    }

    pub fn delivered(mut self, date: &str) -> Self {
        self.row.delivery_date = Some(date.to_string());
        self
    }

    pub fn detention_from(mut self, date: &str) -> Self {
        self.row.detention_from = Some(date.to_string());
        self
    }

    pub fn build(self) -> ContainerRow {
        self.row
    }
}

/// Builder for `JobRecord` instances.
pub struct JobBuilder {
    record: JobRecord,
}

impl JobBuilder {
    pub fn new(job_no: &str) -> Self {
        Self {
            record: JobRecord {
                job_no: job_no.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn be_no(mut self, be_no: &str) -> Self {
        self.record.be_no = Some(be_no.to_string());
        self
    }

    pub fn eta(mut self, date: &str) -> Self {
        self.record.vessel_berthing = Some(date.to_string());
        self
    }

    pub fn gateway_igm(mut self, date: &str) -> Self {
        self.record.gateway_igm_date = Some(date.to_string());
        self
    }

    pub fn discharged(mut self, date: &str) -> Self {
        self.record.discharge_date = Some(date.to_string());
        self
    }

    pub fn pcv(mut self, date: &str) -> Self {
        self.record.pcv_date = Some(date.to_string());
        self
    }

    pub fn out_of_charge(mut self, date: &str) -> Self {
        self.record.out_of_charge = Some(date.to_string());
        self
    }

    pub fn be_type(mut self, be_type: &str) -> Self {
        self.record.type_of_b_e = Some(be_type.to_string());
        self
    }

    pub fn consignment(mut self, consignment: &str) -> Self {
        self.record.consignment_type = Some(consignment.to_string());
        self
    }

    pub fn free_time(mut self, days: u32) -> Self {
        self.record.free_time = days;
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.record.detailed_status = Some(status.to_string());
        self
    }

    pub fn container(mut self, container: ContainerBuilder) -> Self {
        self.record.container_nos.push(container.build());
        self
    }

    pub fn build(self) -> JobRecord {
        self.record
    }

    pub fn snapshot(self) -> JobSnapshot {
        self.record.to_snapshot()
    }
}

/// A job that has cleared customs: BE filed, arrived, out of charge.
pub fn cleared_job(job_no: &str) -> JobBuilder {
    JobBuilder::new(job_no)
        .be_no("BE-4471")
        .eta("2025-06-01T00:00:00Z")
        .discharged("2025-06-02")
        .out_of_charge("2025-06-09T14:20:00.000Z")
}
