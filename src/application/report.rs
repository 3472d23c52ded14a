use crate::domain::ledger::Balance;
use crate::domain::payment::Payment;
use crate::domain::vendor::Vendor;
use chrono::{DateTime, Utc};

/// Point-in-time snapshot of balances and completed payments.
///
/// Assembled by [`PaymentEngine::report`](crate::application::engine::PaymentEngine::report)
/// without mutating anything; rendering and export live in the interfaces
/// layer so an export failure can never touch the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub generated: DateTime<Utc>,
    pub account1: Balance,
    pub account2: Balance,
    /// Vendor section, included on request.
    pub vendors: Option<Vec<Vendor>>,
    /// Completed payments only, in log order.
    pub completed: Vec<Payment>,
}
