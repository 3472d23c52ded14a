use crate::domain::ledger::{Balance, Ledger};
use crate::domain::payment::Payment;
use crate::domain::ports::{BalanceStore, PaymentStore, VendorStore};
use crate::domain::session::Session;
use crate::domain::vendor::Vendor;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const VENDORS_SLOT: &str = "vendors.json";
const PAYMENTS_SLOT: &str = "paymentsHistory.json";
const ACCOUNT1_SLOT: &str = "account1Balance";
const ACCOUNT2_SLOT: &str = "account2Balance";
const SESSION_SLOT: &str = "loggedInUser";

/// The durable local backend: named slots in a directory, one per record
/// set, mirroring the original local-storage keys. This is the fallback of
/// record when the workbook store is unavailable.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Opens the store, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    fn slot(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn read_slot(&self, name: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.slot(name)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_slot(&self, name: &str, contents: &str) -> Result<()> {
        fs::write(self.slot(name), contents)?;
        Ok(())
    }

    /// Loads the logged-in-user marker, if any.
    pub fn load_session(&self) -> Result<Option<Session>> {
        Ok(self
            .read_slot(SESSION_SLOT)?
            .map(|raw| Session::new(&raw))
            .filter(|s| !s.username.is_empty()))
    }

    pub fn save_session(&self, session: &Session) -> Result<()> {
        self.write_slot(SESSION_SLOT, &session.username)
    }

    pub fn clear_session(&self) -> Result<()> {
        match fs::remove_file(self.slot(SESSION_SLOT)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl VendorStore for LocalStore {
    async fn read_vendors(&self) -> Result<Vec<Vendor>> {
        match self.read_slot(VENDORS_SLOT)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_vendors(&self, vendors: &[Vendor]) -> Result<()> {
        self.write_slot(VENDORS_SLOT, &serde_json::to_string_pretty(vendors)?)
    }
}

#[async_trait]
impl PaymentStore for LocalStore {
    async fn read_payments(&self) -> Result<Vec<Payment>> {
        match self.read_slot(PAYMENTS_SLOT)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_payments(&self, payments: &[Payment]) -> Result<()> {
        self.write_slot(PAYMENTS_SLOT, &serde_json::to_string_pretty(payments)?)
    }
}

#[async_trait]
impl BalanceStore for LocalStore {
    async fn read_balances(&self) -> Result<Option<Ledger>> {
        let account1 = self.read_slot(ACCOUNT1_SLOT)?;
        let account2 = self.read_slot(ACCOUNT2_SLOT)?;
        match (account1, account2) {
            (Some(a1), Some(a2)) => Ok(Some(Ledger::new(
                Balance::new(parse_balance(&a1)?),
                Balance::new(parse_balance(&a2)?),
            ))),
            _ => Ok(None),
        }
    }

    async fn write_balances(&self, ledger: &Ledger) -> Result<()> {
        self.write_slot(ACCOUNT1_SLOT, &ledger.account1.value().to_string())?;
        self.write_slot(ACCOUNT2_SLOT, &ledger.account2.value().to_string())
    }
}

fn parse_balance(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim())
        .map_err(|e| PaymentError::ValidationError(format!("invalid stored balance '{raw}': {e}")))
}
