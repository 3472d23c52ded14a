use crate::domain::ledger::Ledger;
use crate::domain::payment::Payment;
use crate::domain::ports::{BalanceStore, PaymentStore, VendorStore};
use crate::domain::vendor::Vendor;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory backend covering all three record sets.
///
/// `Clone` shares the underlying state, which lets tests hand the engine a
/// boxed copy and still inspect what was mirrored into it.
#[derive(Default, Clone)]
pub struct InMemoryStateStore {
    vendors: Arc<RwLock<Vec<Vendor>>>,
    payments: Arc<RwLock<Vec<Payment>>>,
    balances: Arc<RwLock<Option<Ledger>>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn vendors_snapshot(&self) -> Vec<Vendor> {
        self.vendors.read().await.clone()
    }

    pub async fn payments_snapshot(&self) -> Vec<Payment> {
        self.payments.read().await.clone()
    }
}

#[async_trait]
impl VendorStore for InMemoryStateStore {
    async fn read_vendors(&self) -> Result<Vec<Vendor>> {
        Ok(self.vendors.read().await.clone())
    }

    async fn write_vendors(&self, vendors: &[Vendor]) -> Result<()> {
        *self.vendors.write().await = vendors.to_vec();
        Ok(())
    }
}

#[async_trait]
impl PaymentStore for InMemoryStateStore {
    async fn read_payments(&self) -> Result<Vec<Payment>> {
        Ok(self.payments.read().await.clone())
    }

    async fn write_payments(&self, payments: &[Payment]) -> Result<()> {
        *self.payments.write().await = payments.to_vec();
        Ok(())
    }
}

#[async_trait]
impl BalanceStore for InMemoryStateStore {
    async fn read_balances(&self) -> Result<Option<Ledger>> {
        Ok(*self.balances.read().await)
    }

    async fn write_balances(&self, ledger: &Ledger) -> Result<()> {
        *self.balances.write().await = Some(*ledger);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::Balance;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_clone_shares_state() {
        let store = InMemoryStateStore::new();
        let alias = store.clone();

        store
            .write_balances(&Ledger::uniform(dec!(100)))
            .await
            .unwrap();

        let seen = alias.read_balances().await.unwrap().unwrap();
        assert_eq!(seen.account1, Balance::new(dec!(100)));
    }

    #[tokio::test]
    async fn test_empty_store_reads_empty() {
        let store = InMemoryStateStore::new();
        assert!(store.read_vendors().await.unwrap().is_empty());
        assert!(store.read_payments().await.unwrap().is_empty());
        assert!(store.read_balances().await.unwrap().is_none());
    }
}
