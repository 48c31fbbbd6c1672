use super::snapshot::JobSnapshot;
use super::DetailedStatus;

/// One row of the status cascade.
#[derive(Clone, Copy)]
pub struct StatusRule {
    pub id: &'static str,
    pub status: DetailedStatus,
    predicate: fn(&JobSnapshot) -> bool,
}

impl StatusRule {
    pub fn matches(&self, job: &JobSnapshot) -> bool {
        (self.predicate)(job)
    }
}

impl std::fmt::Debug for StatusRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusRule")
            .field("id", &self.id)
            .field("status", &self.status)
            .finish()
    }
}

fn cleared_with_arrival(job: &JobSnapshot) -> bool {
    job.has_bill_of_entry() && job.any_arrived()
}

/// Most advanced stage first. The first matching rule wins.
const RULES: &[StatusRule] = &[
    StatusRule {
        id: "billing-pending",
        status: DetailedStatus::BillingPending,
        predicate: |job| {
            cleared_with_arrival(job)
                && job.out_of_charge_date.is_some()
                && job.terminal_container_milestone()
        },
    },
    StatusRule {
        id: "custom-clearance-completed",
        status: DetailedStatus::CustomClearanceCompleted,
        predicate: |job| cleared_with_arrival(job) && job.out_of_charge_date.is_some(),
    },
    StatusRule {
        id: "pcv-done",
        status: DetailedStatus::PcvDoneDutyPaymentPending,
        predicate: |job| cleared_with_arrival(job) && job.pcv_date.is_some(),
    },
    StatusRule {
        id: "be-noted-clearance-pending",
        status: DetailedStatus::BeNotedClearancePending,
        predicate: cleared_with_arrival,
    },
    StatusRule {
        id: "be-noted-arrival-pending",
        status: DetailedStatus::BeNotedArrivalPending,
        predicate: |job| job.has_bill_of_entry(),
    },
    StatusRule {
        id: "arrived-be-note-pending",
        status: DetailedStatus::ArrivedBeNotePending,
        predicate: |job| !job.has_bill_of_entry() && job.any_arrived(),
    },
    StatusRule {
        id: "rail-out",
        status: DetailedStatus::RailOut,
        predicate: |job| job.all_rail_out(),
    },
    StatusRule {
        id: "discharged",
        status: DetailedStatus::Discharged,
        predicate: |job| job.discharge_date.is_some(),
    },
    StatusRule {
        id: "gateway-igm-filed",
        status: DetailedStatus::GatewayIgmFiled,
        predicate: |job| job.gateway_igm_date.is_some(),
    },
    // Unparsable ETAs were already folded to None by the record layer.
    StatusRule {
        id: "eta-date-pending",
        status: DetailedStatus::EtaDatePending,
        predicate: |job| job.vessel_berthing_date.is_none(),
    },
    StatusRule {
        id: "estimated-time-of-arrival",
        status: DetailedStatus::EstimatedTimeOfArrival,
        predicate: |job| job.vessel_berthing_date.is_some(),
    },
];

/// Result of running the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Rule that fired; `None` when nothing matched and the old value was kept.
    pub rule_id: Option<&'static str>,
    pub status: DetailedStatus,
}

/// Ordered rule cascade deriving a job's `DetailedStatus`.
#[derive(Debug, Clone, Copy)]
pub struct StatusClassifier {
    rules: &'static [StatusRule],
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusClassifier {
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    /// The cascade in evaluation order.
    pub fn rules(&self) -> &'static [StatusRule] {
        self.rules
    }

    pub fn evaluate(&self, job: &JobSnapshot) -> Classification {
        for rule in self.rules {
            if rule.matches(job) {
                return Classification {
                    rule_id: Some(rule.id),
                    status: rule.status,
                };
            }
        }

        // Catch-all: keep whatever the job already had.
        Classification {
            rule_id: None,
            status: job.current_status.unwrap_or(DetailedStatus::EtaDatePending),
        }
    }

    pub fn classify(&self, job: &JobSnapshot) -> DetailedStatus {
        self.evaluate(job).status
    }

    /// The freshly derived status, only when it differs from `current_status`.
    pub fn status_change(&self, job: &JobSnapshot) -> Option<DetailedStatus> {
        let status = self.classify(job);
        (job.current_status != Some(status)).then_some(status)
    }
}

/// Classifies with the standard cascade.
pub fn classify(job: &JobSnapshot) -> DetailedStatus {
    StatusClassifier::new().classify(job)
}
