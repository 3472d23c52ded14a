use crate::domain::ledger::Amount;
use crate::domain::schedule::{SchedulePolicy, ScheduledDebit};
use crate::error::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Tunable policy knobs for the payment engine.
///
/// The defaults reproduce the original behavior: a flat 200 charge, both
/// accounts opening at 200000, biweekly vendors due on even epoch weeks and
/// every scheduled debit drawn from account 1.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Flat charge applied when a vendor has no per-vendor amount.
    pub payment_amount: Amount,
    /// Opening balance seeded into both accounts when no backend has any.
    pub default_balance: Decimal,
    pub schedule: SchedulePolicy,
    pub scheduled_debit: ScheduledDebit,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            payment_amount: Amount::new(dec!(200)).unwrap(),
            default_balance: dec!(200000),
            schedule: SchedulePolicy::default(),
            scheduled_debit: ScheduledDebit::default(),
        }
    }
}

impl EngineConfig {
    /// Loads the config from a JSON file; absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
