use crate::application::report::Report;
use crate::domain::ledger::{Account, Amount, Balance, Ledger};
use crate::domain::payment::{Payment, PaymentKind, PaymentStatus};
use crate::domain::ports::{BalanceStore, PaymentStore, VendorStore};
use crate::domain::token::time_token;
use crate::domain::vendor::{PaymentType, Vendor};
use crate::error::{PaymentError, Result};
use crate::interfaces::csv::report_writer::ReportWriter;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const VENDORS_SHEET: &str = "Vendors.csv";
const PAYMENTS_SHEET: &str = "Payments.csv";
const BALANCES_SHEET: &str = "Balances.csv";
const REPORT_SHEET: &str = "CurrentReport.csv";

/// The external tabular backend: one CSV "sheet" per record set inside a
/// workbook directory.
///
/// The workbook is best-effort. Its absence is an expected condition, not an
/// error, and it stores the human-facing row shapes only: vendor and payment
/// ids are not carried, so reads synthesize fresh ones the way the original
/// sheet import did.
#[derive(Debug, Clone)]
pub struct WorkbookStore {
    dir: PathBuf,
}

impl WorkbookStore {
    /// Opens the workbook if its directory exists; `None` means the host is
    /// not available and callers should fall back to the local store.
    pub fn open<P: AsRef<Path>>(dir: P) -> Option<Self> {
        let dir = dir.as_ref();
        dir.is_dir().then(|| Self {
            dir: dir.to_path_buf(),
        })
    }

    fn sheet(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Writes the sectioned report as the `CurrentReport.csv` sheet.
    pub fn write_report(&self, report: &Report) -> Result<()> {
        let file = fs::File::create(self.sheet(REPORT_SHEET))?;
        let mut writer = ReportWriter::new(file);
        writer.write_report(report)
    }
}

#[derive(Serialize, Deserialize)]
struct VendorRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Payment Type")]
    payment_type: PaymentType,
    #[serde(rename = "Assigned Account")]
    assigned_account: Account,
    #[serde(rename = "Date Added")]
    date_added: String,
}

#[derive(Serialize, Deserialize)]
struct PaymentRow {
    #[serde(rename = "Vendor ID")]
    vendor_id: String,
    #[serde(rename = "Vendor Name")]
    vendor_name: String,
    #[serde(rename = "Amount")]
    amount: Amount,
    #[serde(rename = "Date")]
    date: DateTime<Utc>,
    #[serde(rename = "Status")]
    status: PaymentStatus,
    #[serde(rename = "Type")]
    kind: PaymentKind,
}

#[derive(Serialize, Deserialize)]
struct BalanceRow {
    #[serde(rename = "Account")]
    account: String,
    #[serde(rename = "Balance")]
    balance: Decimal,
}

/// The sheet column carries a calendar date only; midnight UTC on reimport.
fn parse_date_added(raw: &str) -> Option<DateTime<Utc>> {
    let date = raw.parse::<chrono::NaiveDate>().ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);
    let rows = reader.deserialize().collect::<std::result::Result<_, _>>()?;
    Ok(Some(rows))
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = csv::WriterBuilder::new().from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[async_trait]
impl VendorStore for WorkbookStore {
    async fn read_vendors(&self) -> Result<Vec<Vendor>> {
        let rows: Vec<VendorRow> = read_rows(&self.sheet(VENDORS_SHEET))?.unwrap_or_default();
        let now = Utc::now();
        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| Vendor {
                id: time_token(now),
                index: i + 1,
                name: row.name,
                payment_type: row.payment_type,
                assigned_account: row.assigned_account,
                date_added: parse_date_added(&row.date_added).unwrap_or(now),
                skip_next: false,
                amount: None,
            })
            .collect())
    }

    async fn write_vendors(&self, vendors: &[Vendor]) -> Result<()> {
        write_rows(
            &self.sheet(VENDORS_SHEET),
            vendors.iter().map(|v| VendorRow {
                name: v.name.clone(),
                payment_type: v.payment_type,
                assigned_account: v.assigned_account,
                date_added: v.date_added.date_naive().to_string(),
            }),
        )
    }
}

#[async_trait]
impl PaymentStore for WorkbookStore {
    async fn read_payments(&self) -> Result<Vec<Payment>> {
        let rows: Vec<PaymentRow> = read_rows(&self.sheet(PAYMENTS_SHEET))?.unwrap_or_default();
        let now = Utc::now();
        Ok(rows
            .into_iter()
            .map(|row| Payment {
                id: time_token(now),
                vendor_id: row.vendor_id,
                vendor_name: row.vendor_name,
                amount: row.amount,
                date: row.date,
                status: row.status,
                kind: row.kind,
            })
            .collect())
    }

    async fn write_payments(&self, payments: &[Payment]) -> Result<()> {
        write_rows(
            &self.sheet(PAYMENTS_SHEET),
            payments.iter().map(|p| PaymentRow {
                vendor_id: p.vendor_id.clone(),
                vendor_name: p.vendor_name.clone(),
                amount: p.amount,
                date: p.date,
                status: p.status,
                kind: p.kind,
            }),
        )
    }
}

#[async_trait]
impl BalanceStore for WorkbookStore {
    async fn read_balances(&self) -> Result<Option<Ledger>> {
        let Some(rows) = read_rows::<BalanceRow>(&self.sheet(BALANCES_SHEET))? else {
            return Ok(None);
        };
        let mut account1 = None;
        let mut account2 = None;
        for row in rows {
            match row.account.as_str() {
                "Account 1" => account1 = Some(row.balance),
                "Account 2" => account2 = Some(row.balance),
                other => {
                    return Err(PaymentError::ValidationError(format!(
                        "unknown account label '{other}' in balances sheet"
                    )));
                }
            }
        }
        match (account1, account2) {
            (Some(a1), Some(a2)) => Ok(Some(Ledger::new(Balance::new(a1), Balance::new(a2)))),
            _ => Ok(None),
        }
    }

    async fn write_balances(&self, ledger: &Ledger) -> Result<()> {
        write_rows(
            &self.sheet(BALANCES_SHEET),
            [
                BalanceRow {
                    account: Account::Account1.to_string(),
                    balance: ledger.account1.value(),
                },
                BalanceRow {
                    account: Account::Account2.to_string(),
                    balance: ledger.account2.value(),
                },
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn vendor(name: &str) -> Vendor {
        Vendor {
            id: "v1".to_string(),
            index: 1,
            name: name.to_string(),
            payment_type: PaymentType::Biweekly,
            assigned_account: Account::Account2,
            date_added: "2026-01-15T09:30:00Z".parse().unwrap(),
            skip_next: true,
            amount: None,
        }
    }

    #[test]
    fn test_open_requires_existing_directory() {
        let dir = tempdir().unwrap();
        assert!(WorkbookStore::open(dir.path()).is_some());
        assert!(WorkbookStore::open(dir.path().join("missing")).is_none());
    }

    #[tokio::test]
    async fn test_missing_sheets_read_as_empty() {
        let dir = tempdir().unwrap();
        let store = WorkbookStore::open(dir.path()).unwrap();
        assert!(store.read_vendors().await.unwrap().is_empty());
        assert!(store.read_payments().await.unwrap().is_empty());
        assert!(store.read_balances().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_vendor_sheet_shape_and_reimport() {
        let dir = tempdir().unwrap();
        let store = WorkbookStore::open(dir.path()).unwrap();

        store.write_vendors(&[vendor("Acme, Inc.")]).await.unwrap();

        let raw = fs::read_to_string(dir.path().join("Vendors.csv")).unwrap();
        assert!(raw.starts_with("Name,Payment Type,Assigned Account,Date Added"));
        assert!(raw.contains("\"Acme, Inc.\",Biweekly,Account 2"));

        // Reimport synthesizes a fresh id and index; the skip flag is not a
        // sheet column and resets.
        let back = store.read_vendors().await.unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].name, "Acme, Inc.");
        assert_eq!(back[0].index, 1);
        assert_ne!(back[0].id, "v1");
        assert!(!back[0].skip_next);
    }

    #[tokio::test]
    async fn test_vendor_sheet_keeps_original_date_added() {
        let dir = tempdir().unwrap();
        let store = WorkbookStore::open(dir.path()).unwrap();

        store.write_vendors(&[vendor("Acme")]).await.unwrap();
        // A later mirror write must not re-date the row.
        store.write_vendors(&[vendor("Acme")]).await.unwrap();

        let raw = fs::read_to_string(dir.path().join("Vendors.csv")).unwrap();
        assert!(raw.contains("Acme,Biweekly,Account 2,2026-01-15"));

        let back = store.read_vendors().await.unwrap();
        assert_eq!(
            back[0].date_added.date_naive(),
            "2026-01-15".parse::<chrono::NaiveDate>().unwrap()
        );
    }

    #[tokio::test]
    async fn test_payment_sheet_roundtrip() {
        let dir = tempdir().unwrap();
        let store = WorkbookStore::open(dir.path()).unwrap();

        let payment = Payment {
            id: "p1".to_string(),
            vendor_id: "v1".to_string(),
            vendor_name: "Acme".to_string(),
            amount: Amount::new(dec!(200)).unwrap(),
            date: "2026-08-28T12:00:00Z".parse().unwrap(),
            status: PaymentStatus::Completed,
            kind: PaymentKind::Scheduled,
        };
        store.write_payments(&[payment.clone()]).await.unwrap();

        let back = store.read_payments().await.unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].vendor_name, "Acme");
        assert_eq!(back[0].amount, payment.amount);
        assert_eq!(back[0].date, payment.date);
        assert_eq!(back[0].status, PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn test_balances_sheet_roundtrip() {
        let dir = tempdir().unwrap();
        let store = WorkbookStore::open(dir.path()).unwrap();

        store
            .write_balances(&Ledger::new(
                Balance::new(dec!(199800)),
                Balance::new(dec!(200000)),
            ))
            .await
            .unwrap();

        let raw = fs::read_to_string(dir.path().join("Balances.csv")).unwrap();
        assert!(raw.starts_with("Account,Balance"));
        assert!(raw.contains("Account 1,199800"));

        let back = store.read_balances().await.unwrap().unwrap();
        assert_eq!(back.account2, Balance::new(dec!(200000)));
    }
}
