use crate::domain::ledger::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Completed,
    Pending,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Completed => write!(f, "Completed"),
            PaymentStatus::Pending => write!(f, "Pending"),
        }
    }
}

/// Whether a payment came out of the batch run or a one-off user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentKind {
    Scheduled,
    #[serde(rename = "On-Demand")]
    OnDemand,
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentKind::Scheduled => write!(f, "Scheduled"),
            PaymentKind::OnDemand => write!(f, "On-Demand"),
        }
    }
}

/// One entry in the append-only payment history.
///
/// Payments are never deleted; the only permitted mutation is the
/// Pending -> Completed status transition performed by a user retry.
/// `vendor_name` is a snapshot taken at creation so history stays readable
/// after the vendor is renamed or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub vendor_id: String,
    pub vendor_name: String,
    pub amount: Amount,
    pub date: DateTime<Utc>,
    pub status: PaymentStatus,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
}
