use serde::{Deserialize, Serialize};

/// Day counts separating the buckets of every policy.
///
/// The defaults are the values the job list has always used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketThresholds {
    #[serde(default)]
    pub eta: EtaThresholds,
    #[serde(default)]
    pub billing: BillingThresholds,
    #[serde(default)]
    pub detention: DetentionThresholds,
}

/// Berthing today is always critical; these bound the later buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtaThresholds {
    #[serde(default = "default_eta_high")]
    pub high_within_days: u32,
    #[serde(default = "default_eta_elevated")]
    pub elevated_within_days: u32,
}

fn default_eta_high() -> u32 {
    2
}

fn default_eta_elevated() -> u32 {
    5
}

impl Default for EtaThresholds {
    fn default() -> Self {
        Self {
            high_within_days: default_eta_high(),
            elevated_within_days: default_eta_elevated(),
        }
    }
}

/// Ages (days since the reference date) at which billing becomes overdue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingThresholds {
    #[serde(default = "default_billing_elevated")]
    pub elevated_after_days: u32,
    #[serde(default = "default_billing_critical")]
    pub critical_after_days: u32,
}

fn default_billing_elevated() -> u32 {
    5
}

fn default_billing_critical() -> u32 {
    10
}

impl Default for BillingThresholds {
    fn default() -> Self {
        Self {
            elevated_after_days: default_billing_elevated(),
            critical_after_days: default_billing_critical(),
        }
    }
}

/// Detention reached (zero or fewer days left) is always critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetentionThresholds {
    #[serde(default = "default_detention_high")]
    pub high_within_days: u32,
    #[serde(default = "default_detention_elevated")]
    pub elevated_within_days: u32,
    #[serde(default = "default_detention_low")]
    pub low_within_days: u32,
}

fn default_detention_high() -> u32 {
    1
}

fn default_detention_elevated() -> u32 {
    2
}

fn default_detention_low() -> u32 {
    3
}

impl Default for DetentionThresholds {
    fn default() -> Self {
        Self {
            high_within_days: default_detention_high(),
            elevated_within_days: default_detention_elevated(),
            low_within_days: default_detention_low(),
        }
    }
}

impl BucketThresholds {
    /// Checks that every policy's boundaries are ordered.
    pub fn validate(&self) -> Result<(), String> {
        let eta = &self.eta;
        if eta.high_within_days == 0 || eta.high_within_days > eta.elevated_within_days {
            return Err(format!(
                "eta: expected 0 < high_within_days ({}) <= elevated_within_days ({})",
                eta.high_within_days, eta.elevated_within_days
            ));
        }

        let billing = &self.billing;
        if billing.elevated_after_days >= billing.critical_after_days {
            return Err(format!(
                "billing: expected elevated_after_days ({}) < critical_after_days ({})",
                billing.elevated_after_days, billing.critical_after_days
            ));
        }

        let detention = &self.detention;
        if detention.high_within_days == 0
            || detention.high_within_days > detention.elevated_within_days
            || detention.elevated_within_days > detention.low_within_days
        {
            return Err(format!(
                "detention: expected 0 < high_within_days ({}) <= elevated_within_days ({}) <= low_within_days ({})",
                detention.high_within_days,
                detention.elevated_within_days,
                detention.low_within_days
            ));
        }

        Ok(())
    }
}
