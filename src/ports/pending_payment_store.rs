//! PendingPaymentStore port - Interface for tracking issued payment intents.
//!
//! A signed callback proves the provider sent it, not that it matches what
//! we asked for. Every issued payment is recorded here so the IPN handler
//! can cross-check order reference and amount, and settle each order at
//! most once.
//!
//! ## Why Idempotency Matters
//!
//! The provider retries an IPN until it receives an acknowledgement, so the
//! same notification may arrive several times. Settlement must therefore be
//! a single, atomic `Pending -> Paid | Failed` transition.
//!
//! ## Expiry
//!
//! A pending record lives only as long as the URL it was issued for. Once
//! `expires_at` has passed without a settlement the record is stale: stores
//! may drop it, and a new `save` for the same order replaces it.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{DomainError, Timestamp};

/// Lifecycle of an issued payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

/// Record of a payment URL issued for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPayment {
    pub order_reference: String,
    /// Amount in major units.
    pub amount: i64,
    pub status: PaymentStatus,
    pub created_at: Timestamp,
    /// When the issued URL stops being accepted by the provider.
    pub expires_at: Timestamp,
    pub settled_at: Option<Timestamp>,
    /// Provider transaction number, once settled.
    pub transaction_no: Option<String>,
}

impl PendingPayment {
    /// Creates a new pending record.
    pub fn new(order_reference: impl Into<String>, amount: i64, expires_at: Timestamp) -> Self {
        Self {
            order_reference: order_reference.into(),
            amount,
            status: PaymentStatus::Pending,
            created_at: Timestamp::now(),
            expires_at,
            settled_at: None,
            transaction_no: None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.status != PaymentStatus::Pending
    }

    /// True when the record is still pending and its URL has lapsed at `now`.
    pub fn is_expired_at(&self, now: &Timestamp) -> bool {
        !self.is_settled() && self.expires_at.is_before(now)
    }
}

/// Result of attempting to save a pending payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveResult {
    /// Record was inserted, either new or replacing an expired one.
    Inserted,
    /// A live pending record with the same amount had its expiry extended.
    Refreshed,
    /// A conflicting record exists (settled, or pending with another
    /// amount); it was left untouched and is returned for inspection.
    AlreadyExists(PendingPayment),
}

/// Result of attempting to settle a pending payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleResult {
    /// This call performed the transition.
    Settled,
    /// Another call already settled the order.
    AlreadySettled,
    /// No record for this order.
    NotFound,
}

/// Port for storing issued payments.
///
/// Implementations must make `save` insert-if-absent (treating expired
/// pending records as absent) and `settle` a compare-and-set on `Pending`,
/// so concurrent deliveries cannot both win.
#[async_trait]
pub trait PendingPaymentStore: Send + Sync {
    /// Insert a record unless a live one already exists for the order.
    ///
    /// A live pending record with the same amount is refreshed to the later
    /// of the two expiries.
    async fn save(&self, payment: PendingPayment) -> Result<SaveResult, DomainError>;

    /// Find a record by order reference.
    async fn find_by_reference(
        &self,
        order_reference: &str,
    ) -> Result<Option<PendingPayment>, DomainError>;

    /// Move a pending record to `status` (`Paid` or `Failed`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` when `status` is `Pending`.
    async fn settle(
        &self,
        order_reference: &str,
        status: PaymentStatus,
        transaction_no: Option<String>,
    ) -> Result<SettleResult, DomainError>;
}
