use crate::domain::ledger::Ledger;
use crate::domain::payment::Payment;
use crate::domain::vendor::Vendor;
use crate::error::Result;
use async_trait::async_trait;

/// Storage port for the vendor list. A missing record set reads as empty.
#[async_trait]
pub trait VendorStore: Send + Sync {
    async fn read_vendors(&self) -> Result<Vec<Vendor>>;
    async fn write_vendors(&self, vendors: &[Vendor]) -> Result<()>;
}

/// Storage port for the append-only payment history.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn read_payments(&self) -> Result<Vec<Payment>>;
    async fn write_payments(&self, payments: &[Payment]) -> Result<()>;
}

/// Storage port for the two account balances. `None` means no backend has
/// balances yet and the caller should seed defaults.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    async fn read_balances(&self) -> Result<Option<Ledger>>;
    async fn write_balances(&self, ledger: &Ledger) -> Result<()>;
}

/// Umbrella trait for backends covering all three record sets.
pub trait StateStore: VendorStore + PaymentStore + BalanceStore {}

impl<T: VendorStore + PaymentStore + BalanceStore> StateStore for T {}

pub type StateStoreBox = Box<dyn StateStore>;
