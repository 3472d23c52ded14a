use crate::domain::ledger::{Account, Amount};
use crate::domain::token::time_token;
use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a vendor gets paid by the scheduled batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    Weekly,
    Biweekly,
    #[serde(rename = "On-Demand")]
    OnDemand,
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentType::Weekly => write!(f, "Weekly"),
            PaymentType::Biweekly => write!(f, "Biweekly"),
            PaymentType::OnDemand => write!(f, "On-Demand"),
        }
    }
}

impl FromStr for PaymentType {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "weekly" => Ok(PaymentType::Weekly),
            "biweekly" => Ok(PaymentType::Biweekly),
            "on-demand" | "ondemand" => Ok(PaymentType::OnDemand),
            other => Err(PaymentError::ValidationError(format!(
                "unknown payment type '{other}', expected weekly, biweekly or on-demand"
            ))),
        }
    }
}

/// A payee on the vendor list.
///
/// `index` is the 1-based display position; the registry keeps it contiguous
/// across deletions. `amount` overrides the configured flat charge when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub index: usize,
    pub name: String,
    pub payment_type: PaymentType,
    pub assigned_account: Account,
    #[serde(default = "Utc::now")]
    pub date_added: DateTime<Utc>,
    #[serde(default)]
    pub skip_next: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
}

/// Ordered vendor list with a contiguous 1..N index invariant.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorRegistry {
    vendors: Vec<Vendor>,
}

impl VendorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts an already-persisted list, restoring the index invariant in
    /// case the backing store was edited by hand.
    pub fn from_vec(mut vendors: Vec<Vendor>) -> Self {
        for (i, v) in vendors.iter_mut().enumerate() {
            v.index = i + 1;
        }
        Self { vendors }
    }

    /// Appends a vendor at the end of the list.
    ///
    /// Fails with `ValidationError` when the name is empty or whitespace.
    pub fn add(
        &mut self,
        name: &str,
        payment_type: PaymentType,
        assigned_account: Account,
        amount: Option<Amount>,
        now: DateTime<Utc>,
    ) -> Result<&Vendor> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PaymentError::ValidationError(
                "vendor name is required".to_string(),
            ));
        }
        let vendor = Vendor {
            id: time_token(now),
            index: self.vendors.len() + 1,
            name: name.to_string(),
            payment_type,
            assigned_account,
            date_added: now,
            skip_next: false,
            amount,
        };
        self.vendors.push(vendor);
        Ok(self.vendors.last().unwrap())
    }

    /// Replaces the mutable fields of the vendor with the given id.
    ///
    /// An unknown id is a silent no-op; returns whether anything changed.
    /// `amount = None` keeps any existing per-vendor override.
    pub fn edit(
        &mut self,
        id: &str,
        name: &str,
        payment_type: PaymentType,
        assigned_account: Account,
        amount: Option<Amount>,
    ) -> bool {
        match self.vendors.iter_mut().find(|v| v.id == id) {
            Some(vendor) => {
                vendor.name = name.to_string();
                vendor.payment_type = payment_type;
                vendor.assigned_account = assigned_account;
                if amount.is_some() {
                    vendor.amount = amount;
                }
                true
            }
            None => false,
        }
    }

    /// Removes the vendor with the given id and reindexes the survivors to
    /// a contiguous 1..N sequence in their original relative order.
    ///
    /// Returns whether a vendor was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.vendors.len();
        self.vendors.retain(|v| v.id != id);
        if self.vendors.len() == before {
            return false;
        }
        for (i, v) in self.vendors.iter_mut().enumerate() {
            v.index = i + 1;
        }
        true
    }

    /// Sets or clears the skip-next-scheduled-payment flag.
    pub fn set_skip_next(&mut self, id: &str, flag: bool) -> bool {
        match self.vendors.iter_mut().find(|v| v.id == id) {
            Some(vendor) => {
                vendor.skip_next = flag;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.id == id)
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Vendor> {
        self.vendors.get(index.checked_sub(1)?)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vendor> {
        self.vendors.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Vendor> {
        self.vendors.iter_mut()
    }

    pub fn as_slice(&self) -> &[Vendor] {
        &self.vendors
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}
