use chrono::NaiveDate;
use serde::Serialize;

use super::thresholds::BucketThresholds;
use super::{Highlight, Policy, UrgencyBucket};
use crate::dates::days_between;
use crate::status::{DetailedStatus, JobSnapshot, StatusClassifier};

/// Job-list row data: derived status plus its deadline bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobUrgency {
    pub job_no: String,
    pub status: DetailedStatus,
    pub policy: Option<Policy>,
    pub bucket: UrgencyBucket,
    /// The date that decided the bucket (the worst container for per-container policies).
    pub reference_date: Option<NaiveDate>,
    pub highlight: Option<Highlight>,
}

/// Maps a status and its deadline dates onto an urgency bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeadlineBucketer {
    thresholds: BucketThresholds,
}

impl DeadlineBucketer {
    pub fn new(thresholds: BucketThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &BucketThresholds {
        &self.thresholds
    }

    /// Buckets a single reference date under the policy selected by `status`.
    pub fn bucket(
        &self,
        status: DetailedStatus,
        reference_date: NaiveDate,
        today: NaiveDate,
    ) -> UrgencyBucket {
        match Policy::for_status(status) {
            Some(policy) => self.bucket_for_policy(policy, reference_date, today),
            None => UrgencyBucket::None,
        }
    }

    pub fn bucket_for_policy(
        &self,
        policy: Policy,
        reference_date: NaiveDate,
        today: NaiveDate,
    ) -> UrgencyBucket {
        match policy {
            Policy::UpcomingEta => self.eta_bucket(days_between(today, reference_date)),
            Policy::BillingAging => self.billing_bucket(days_between(reference_date, today)),
            Policy::DetentionAging => self.detention_bucket(days_between(today, reference_date)),
        }
    }

    fn eta_bucket(&self, days_until: i64) -> UrgencyBucket {
        let t = &self.thresholds.eta;
        if days_until < 0 {
            // Overdue ETAs are not this policy's concern.
            UrgencyBucket::None
        } else if days_until == 0 {
            UrgencyBucket::Critical
        } else if days_until <= i64::from(t.high_within_days) {
            UrgencyBucket::High
        } else if days_until <= i64::from(t.elevated_within_days) {
            UrgencyBucket::Elevated
        } else {
            UrgencyBucket::None
        }
    }

    fn billing_bucket(&self, days_since: i64) -> UrgencyBucket {
        let t = &self.thresholds.billing;
        if days_since <= i64::from(t.elevated_after_days) {
            UrgencyBucket::None
        } else if days_since <= i64::from(t.critical_after_days) {
            UrgencyBucket::Elevated
        } else {
            UrgencyBucket::Critical
        }
    }

    fn detention_bucket(&self, days_until: i64) -> UrgencyBucket {
        let t = &self.thresholds.detention;
        if days_until <= 0 {
            UrgencyBucket::Critical
        } else if days_until <= i64::from(t.high_within_days) {
            UrgencyBucket::High
        } else if days_until <= i64::from(t.elevated_within_days) {
            UrgencyBucket::Elevated
        } else if days_until <= i64::from(t.low_within_days) {
            UrgencyBucket::Low
        } else {
            UrgencyBucket::None
        }
    }

    /// Dates the policy looks at for this job.
    fn reference_dates(policy: Policy, job: &JobSnapshot) -> Vec<NaiveDate> {
        match policy {
            Policy::UpcomingEta => job
                .vessel_berthing_date
                .map(|dt| dt.date())
                .into_iter()
                .collect(),
            Policy::BillingAging => job
                .containers
                .iter()
                .filter_map(|c| job.terminal_date(c))
                .collect(),
            Policy::DetentionAging => job
                .containers
                .iter()
                .filter_map(|c| c.detention_from_date)
                .collect(),
        }
    }

    /// Most severe bucket over the policy's reference dates, with the date
    /// that produced it. Ties go to the earliest date.
    fn worst(
        &self,
        policy: Policy,
        job: &JobSnapshot,
        today: NaiveDate,
    ) -> (UrgencyBucket, Option<NaiveDate>) {
        Self::reference_dates(policy, job)
            .into_iter()
            .map(|date| (self.bucket_for_policy(policy, date, today), date))
            .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
            .map(|(bucket, date)| (bucket, Some(date)))
            .unwrap_or((UrgencyBucket::None, None))
    }

    /// Job-level bucket, deriving the status with the standard cascade.
    pub fn bucket_job(&self, job: &JobSnapshot, today: NaiveDate) -> UrgencyBucket {
        let status = StatusClassifier::new().classify(job);
        match Policy::for_status(status) {
            Some(policy) => self.worst(policy, job, today).0,
            None => UrgencyBucket::None,
        }
    }

    pub fn assess(
        &self,
        classifier: &StatusClassifier,
        job: &JobSnapshot,
        today: NaiveDate,
    ) -> JobUrgency {
        let status = classifier.classify(job);
        let policy = Policy::for_status(status);
        let (bucket, reference_date) = match policy {
            Some(policy) => self.worst(policy, job, today),
            None => (UrgencyBucket::None, None),
        };

        JobUrgency {
            job_no: job.job_no.clone(),
            status,
            policy,
            bucket,
            reference_date,
            highlight: policy.and_then(|p| p.highlight(bucket)),
        }
    }

    /// Assesses every job, most severe first, then by job number.
    pub fn triage<'a, I>(
        &self,
        classifier: &StatusClassifier,
        jobs: I,
        today: NaiveDate,
    ) -> Vec<JobUrgency>
    where
        I: IntoIterator<Item = &'a JobSnapshot>,
    {
        let mut rows: Vec<JobUrgency> = jobs
            .into_iter()
            .map(|job| self.assess(classifier, job, today))
            .collect();
        rows.sort_by(|a, b| b.bucket.cmp(&a.bucket).then_with(|| a.job_no.cmp(&b.job_no)));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ContainerRecord;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn bucketer() -> DeadlineBucketer {
        DeadlineBucketer::default()
    }

    #[test]
    fn test_eta_policy() {
        let today = day(5, 30);
        let eta = DetailedStatus::EstimatedTimeOfArrival;
        let b = bucketer();
        assert_eq!(b.bucket(eta, day(5, 29), today), UrgencyBucket::None);
        assert_eq!(b.bucket(eta, day(5, 30), today), UrgencyBucket::Critical);
        assert_eq!(b.bucket(eta, day(5, 31), today), UrgencyBucket::High);
        assert_eq!(b.bucket(eta, day(6, 1), today), UrgencyBucket::High);
        assert_eq!(b.bucket(eta, day(6, 2), today), UrgencyBucket::Elevated);
        assert_eq!(b.bucket(eta, day(6, 4), today), UrgencyBucket::Elevated);
        assert_eq!(b.bucket(eta, day(6, 5), today), UrgencyBucket::None);
    }

    #[test]
    fn test_billing_policy() {
        let today = day(6, 20);
        let billing = DetailedStatus::BillingPending;
        let b = bucketer();
        assert_eq!(b.bucket(billing, day(6, 25), today), UrgencyBucket::None);
        assert_eq!(b.bucket(billing, day(6, 20), today), UrgencyBucket::None);
        assert_eq!(b.bucket(billing, day(6, 15), today), UrgencyBucket::None);
        assert_eq!(b.bucket(billing, day(6, 14), today), UrgencyBucket::Elevated);
        assert_eq!(b.bucket(billing, day(6, 10), today), UrgencyBucket::Elevated);
        assert_eq!(b.bucket(billing, day(6, 9), today), UrgencyBucket::Critical);
    }

    #[test]
    fn test_detention_policy() {
        let today = day(6, 10);
        let status = DetailedStatus::CustomClearanceCompleted;
        let b = bucketer();
        assert_eq!(b.bucket(status, day(6, 8), today), UrgencyBucket::Critical);
        assert_eq!(b.bucket(status, day(6, 10), today), UrgencyBucket::Critical);
        assert_eq!(b.bucket(status, day(6, 11), today), UrgencyBucket::High);
        assert_eq!(b.bucket(status, day(6, 12), today), UrgencyBucket::Elevated);
        assert_eq!(b.bucket(status, day(6, 13), today), UrgencyBucket::Low);
        assert_eq!(b.bucket(status, day(6, 14), today), UrgencyBucket::None);
    }

    #[test]
    fn test_status_without_policy() {
        let b = bucketer();
        assert_eq!(
            b.bucket(DetailedStatus::Discharged, day(6, 1), day(6, 1)),
            UrgencyBucket::None
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let mut thresholds = BucketThresholds::default();
        thresholds.billing.elevated_after_days = 2;
        let b = DeadlineBucketer::new(thresholds);
        assert_eq!(
            b.bucket(DetailedStatus::BillingPending, day(6, 7), day(6, 10)),
            UrgencyBucket::Elevated
        );
    }

    #[test]
    fn test_detention_job_takes_worst_container() {
        let container = |n: &str, detention: Option<NaiveDate>| ContainerRecord {
            container_number: n.to_string(),
            arrival_date: Some(day(6, 1)),
            detention_from_date: detention,
            ..Default::default()
        };
        let job = JobSnapshot {
            job_no: "IMP/7".to_string(),
            bill_of_entry_number: Some("BE7".to_string()),
            containers: vec![
                container("C1", Some(day(6, 20))),
                container("C2", Some(day(6, 11))),
                container("C3", None),
            ],
            ..Default::default()
        };

        let urgency = bucketer().assess(&StatusClassifier::new(), &job, day(6, 10));
        assert_eq!(urgency.status, DetailedStatus::BeNotedClearancePending);
        assert_eq!(urgency.policy, Some(Policy::DetentionAging));
        assert_eq!(urgency.bucket, UrgencyBucket::High);
        assert_eq!(urgency.reference_date, Some(day(6, 11)));
    }

    #[test]
    fn test_job_without_reference_date() {
        let job = JobSnapshot {
            bill_of_entry_number: Some("BE7".to_string()),
            containers: vec![ContainerRecord {
                arrival_date: Some(day(6, 1)),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(bucketer().bucket_job(&job, day(6, 10)), UrgencyBucket::None);
    }
}
