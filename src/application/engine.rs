use crate::application::report::Report;
use crate::config::EngineConfig;
use crate::domain::ledger::{Account, Amount, Ledger};
use crate::domain::payment::{Payment, PaymentKind, PaymentStatus};
use crate::domain::ports::StateStoreBox;
use crate::domain::token::time_token;
use crate::domain::vendor::{PaymentType, Vendor, VendorRegistry};
use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, warn};

/// Result of a single on-demand payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOutcome {
    pub payment: Payment,
    /// Whether the assigned account covered the charge. Advisory only; the
    /// payment record carries the authoritative status.
    pub sufficient: bool,
}

/// Per-vendor outcome of a scheduled batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledOutcome {
    Completed,
    Pending,
    Skipped,
}

/// Human-readable summary of one scheduled batch run, in vendor list order.
/// Vendors that were not due produce no line, matching the original summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub outcomes: Vec<(String, ScheduledOutcome)>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.outcomes.is_empty() {
            return write!(f, "No scheduled payments.");
        }
        for (i, (name, outcome)) in self.outcomes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match outcome {
                ScheduledOutcome::Completed => write!(f, "{name}: Completed")?,
                ScheduledOutcome::Pending => write!(f, "{name}: Pending (insufficient funds)")?,
                ScheduledOutcome::Skipped => write!(f, "{name}: skipped (skip-next)")?,
            }
        }
        Ok(())
    }
}

/// Result of a user-initiated retry of a pending payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome {
    Completed,
    StillPending,
    /// The payment was not pending, or the payment/vendor no longer exists.
    /// Silent no-op either way.
    NoOp,
}

/// The business-rule engine: owns the in-memory session state (vendor
/// registry, payment log, ledger) and mirrors every mutation to the
/// persistence adapter.
///
/// The in-memory state is the source of truth for the session; persistence
/// is write-through and best-effort, so adapter failures are logged and
/// never block a state transition the user already saw.
pub struct PaymentEngine {
    config: EngineConfig,
    store: StateStoreBox,
    vendors: VendorRegistry,
    payments: Vec<Payment>,
    ledger: Ledger,
}

impl PaymentEngine {
    /// Starts a session: reads all three record sets through the adapter,
    /// seeding default balances when no backend has any.
    pub async fn load(config: EngineConfig, store: StateStoreBox) -> Result<Self> {
        let vendors = VendorRegistry::from_vec(store.read_vendors().await?);
        let payments = store.read_payments().await?;
        let ledger = store
            .read_balances()
            .await?
            .unwrap_or_else(|| Ledger::uniform(config.default_balance));
        debug!(
            vendors = vendors.len(),
            payments = payments.len(),
            "session state loaded"
        );
        Ok(Self {
            config,
            store,
            vendors,
            payments,
            ledger,
        })
    }

    pub fn vendors(&self) -> &VendorRegistry {
        &self.vendors
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn add_vendor(
        &mut self,
        name: &str,
        payment_type: PaymentType,
        assigned_account: Account,
        amount: Option<Amount>,
        now: DateTime<Utc>,
    ) -> Result<Vendor> {
        let vendor = self
            .vendors
            .add(name, payment_type, assigned_account, amount, now)?
            .clone();
        self.persist_vendors().await;
        Ok(vendor)
    }

    pub async fn edit_vendor(
        &mut self,
        id: &str,
        name: &str,
        payment_type: PaymentType,
        assigned_account: Account,
        amount: Option<Amount>,
    ) -> bool {
        let changed = self
            .vendors
            .edit(id, name, payment_type, assigned_account, amount);
        if changed {
            self.persist_vendors().await;
        }
        changed
    }

    pub async fn delete_vendor(&mut self, id: &str) -> bool {
        let removed = self.vendors.delete(id);
        if removed {
            self.persist_vendors().await;
        }
        removed
    }

    pub async fn set_skip_next(&mut self, id: &str, flag: bool) -> bool {
        let changed = self.vendors.set_skip_next(id, flag);
        if changed {
            self.persist_vendors().await;
        }
        changed
    }

    /// Pays a vendor now. Debits the vendor's assigned account when covered,
    /// otherwise records a Pending payment without touching the ledger. A
    /// payment record is appended regardless of the outcome.
    pub async fn pay_now(
        &mut self,
        vendor_id: &str,
        skip_next: bool,
        now: DateTime<Utc>,
    ) -> Result<PaymentOutcome> {
        let vendor = self
            .vendors
            .get(vendor_id)
            .ok_or_else(|| PaymentError::NotFound(format!("vendor {vendor_id}")))?
            .clone();

        let amount = vendor.amount.unwrap_or(self.config.payment_amount);
        let sufficient = self.ledger.try_debit(vendor.assigned_account, amount);

        let payment = Payment {
            id: time_token(now),
            vendor_id: vendor.id.clone(),
            vendor_name: vendor.name.clone(),
            amount,
            date: now,
            status: if sufficient {
                PaymentStatus::Completed
            } else {
                PaymentStatus::Pending
            },
            kind: PaymentKind::OnDemand,
        };
        self.payments.push(payment.clone());

        if skip_next {
            self.vendors.set_skip_next(&vendor.id, true);
        }

        self.persist_balances().await;
        self.persist_payments().await;
        self.persist_vendors().await;

        Ok(PaymentOutcome {
            payment,
            sufficient,
        })
    }

    /// Runs one scheduled-payment pass over the whole vendor list.
    ///
    /// Debits accumulate against a balance snapshot taken at batch start, so
    /// a single run never over-commits an account even though vendors are
    /// evaluated in list order.
    pub async fn run_scheduled(&mut self, now: DateTime<Utc>) -> RunSummary {
        let policy = self.config.schedule;
        let debit_policy = self.config.scheduled_debit;
        let flat_amount = self.config.payment_amount;

        let mut ledger = self.ledger;
        let mut new_payments = Vec::new();
        let mut summary = RunSummary::default();

        for vendor in self.vendors.iter_mut() {
            if vendor.payment_type == PaymentType::OnDemand {
                continue;
            }
            if vendor.skip_next {
                vendor.skip_next = false;
                summary
                    .outcomes
                    .push((vendor.name.clone(), ScheduledOutcome::Skipped));
                continue;
            }
            if !policy.is_due(vendor.payment_type, now) {
                continue;
            }

            let amount = vendor.amount.unwrap_or(flat_amount);
            let account = debit_policy.debit_account(vendor.assigned_account);
            let sufficient = ledger.try_debit(account, amount);

            new_payments.push(Payment {
                id: time_token(now),
                vendor_id: vendor.id.clone(),
                vendor_name: vendor.name.clone(),
                amount,
                date: now,
                status: if sufficient {
                    PaymentStatus::Completed
                } else {
                    PaymentStatus::Pending
                },
                kind: PaymentKind::Scheduled,
            });
            summary.outcomes.push((
                vendor.name.clone(),
                if sufficient {
                    ScheduledOutcome::Completed
                } else {
                    ScheduledOutcome::Pending
                },
            ));
        }

        self.ledger = ledger;
        self.payments.extend(new_payments);

        self.persist_balances().await;
        self.persist_payments().await;
        self.persist_vendors().await;

        summary
    }

    /// Retries a pending payment once, at user request. Re-attempts the
    /// debit against the originating vendor's assigned account and flips the
    /// payment to Completed on success, preserving its identity.
    pub async fn retry_pending(&mut self, payment_id: &str) -> RetryOutcome {
        let Some(pos) = self.payments.iter().position(|p| p.id == payment_id) else {
            return RetryOutcome::NoOp;
        };
        if self.payments[pos].status != PaymentStatus::Pending {
            return RetryOutcome::NoOp;
        }
        let Some(vendor) = self.vendors.get(&self.payments[pos].vendor_id) else {
            return RetryOutcome::NoOp;
        };

        let amount = self.payments[pos].amount;
        if self.ledger.try_debit(vendor.assigned_account, amount) {
            self.payments[pos].status = PaymentStatus::Completed;
            self.persist_balances().await;
            self.persist_payments().await;
            RetryOutcome::Completed
        } else {
            RetryOutcome::StillPending
        }
    }

    /// Snapshots the current balances and completed payments. Pure read.
    pub fn report(&self, include_vendors: bool, now: DateTime<Utc>) -> Report {
        Report {
            generated: now,
            account1: self.ledger.account1,
            account2: self.ledger.account2,
            vendors: include_vendors.then(|| self.vendors.as_slice().to_vec()),
            completed: self
                .payments
                .iter()
                .filter(|p| p.status == PaymentStatus::Completed)
                .cloned()
                .collect(),
        }
    }

    async fn persist_vendors(&self) {
        if let Err(e) = self.store.write_vendors(self.vendors.as_slice()).await {
            warn!(error = %e, "failed to persist vendor registry");
        }
    }

    async fn persist_payments(&self) {
        if let Err(e) = self.store.write_payments(&self.payments).await {
            warn!(error = %e, "failed to persist payment history");
        }
    }

    async fn persist_balances(&self) {
        if let Err(e) = self.store.write_balances(&self.ledger).await {
            warn!(error = %e, "failed to persist balances");
        }
    }
}
