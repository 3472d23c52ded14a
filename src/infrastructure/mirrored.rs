use crate::application::report::Report;
use crate::domain::ledger::Ledger;
use crate::domain::payment::Payment;
use crate::domain::ports::{BalanceStore, PaymentStore, VendorStore};
use crate::domain::vendor::Vendor;
use crate::error::{PaymentError, Result};
use crate::infrastructure::local::LocalStore;
use crate::infrastructure::workbook::WorkbookStore;
use async_trait::async_trait;
use std::path::Path;
use tracing::{info, warn};

/// The dual-backend persistence adapter.
///
/// Reads prefer the workbook when it is available and has rows, otherwise
/// fall back to the local store. Writes go to the workbook best-effort
/// (failures logged, never surfaced) and to the local store always, so the
/// local store stays the durable copy of record.
pub struct MirroredStore {
    workbook: Option<WorkbookStore>,
    local: LocalStore,
}

impl MirroredStore {
    pub fn new(local: LocalStore, workbook_dir: Option<&Path>) -> Self {
        let workbook = workbook_dir.and_then(|dir| {
            let store = WorkbookStore::open(dir);
            if store.is_none() {
                info!(dir = %dir.display(), "workbook not available, using local store only");
            }
            store
        });
        Self { workbook, local }
    }

    pub fn workbook_available(&self) -> bool {
        self.workbook.is_some()
    }

    /// Exports the report to the workbook. Unlike the record-set writes this
    /// surfaces unavailability, because report export is the one action the
    /// user explicitly asked the external store for.
    pub fn export_report(&self, report: &Report) -> Result<()> {
        match &self.workbook {
            Some(workbook) => workbook.write_report(report),
            None => Err(PaymentError::PersistenceUnavailable(
                "no workbook to export the report to".to_string(),
            )),
        }
    }
}

#[async_trait]
impl VendorStore for MirroredStore {
    async fn read_vendors(&self) -> Result<Vec<Vendor>> {
        if let Some(workbook) = &self.workbook {
            match workbook.read_vendors().await {
                Ok(vendors) if !vendors.is_empty() => return Ok(vendors),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "workbook vendor read failed, falling back"),
            }
        }
        self.local.read_vendors().await
    }

    async fn write_vendors(&self, vendors: &[Vendor]) -> Result<()> {
        if let Some(workbook) = &self.workbook
            && let Err(e) = workbook.write_vendors(vendors).await
        {
            warn!(error = %e, "workbook vendor write failed");
        }
        self.local.write_vendors(vendors).await
    }
}

#[async_trait]
impl PaymentStore for MirroredStore {
    async fn read_payments(&self) -> Result<Vec<Payment>> {
        if let Some(workbook) = &self.workbook {
            match workbook.read_payments().await {
                Ok(payments) if !payments.is_empty() => return Ok(payments),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "workbook payment read failed, falling back"),
            }
        }
        self.local.read_payments().await
    }

    async fn write_payments(&self, payments: &[Payment]) -> Result<()> {
        if let Some(workbook) = &self.workbook
            && let Err(e) = workbook.write_payments(payments).await
        {
            warn!(error = %e, "workbook payment write failed");
        }
        self.local.write_payments(payments).await
    }
}

#[async_trait]
impl BalanceStore for MirroredStore {
    async fn read_balances(&self) -> Result<Option<Ledger>> {
        if let Some(workbook) = &self.workbook {
            match workbook.read_balances().await {
                Ok(Some(ledger)) => return Ok(Some(ledger)),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "workbook balance read failed, falling back"),
            }
        }
        self.local.read_balances().await
    }

    async fn write_balances(&self, ledger: &Ledger) -> Result<()> {
        if let Some(workbook) = &self.workbook
            && let Err(e) = workbook.write_balances(ledger).await
        {
            warn!(error = %e, "workbook balance write failed");
        }
        self.local.write_balances(ledger).await
    }
}
