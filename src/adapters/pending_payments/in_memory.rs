//! In-Memory Pending Payment Store
//!
//! Keeps issued payments in a process-local map.
//! Suitable for single-instance deployments, development and tests.
//!
//! Expired pending records are pruned on every `save`, so the map holds at
//! most the payments issued within one expiry window plus settled ones.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::ports::{PaymentStatus, PendingPayment, PendingPaymentStore, SaveResult, SettleResult};

/// In-memory storage for issued payments, keyed by order reference.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPendingPaymentStore {
    payments: Arc<RwLock<HashMap<String, PendingPayment>>>,
}

impl InMemoryPendingPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.payments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.payments.read().await.is_empty()
    }
}

#[async_trait]
impl PendingPaymentStore for InMemoryPendingPaymentStore {
    async fn save(&self, payment: PendingPayment) -> Result<SaveResult, DomainError> {
        let now = Timestamp::now();
        let mut payments = self.payments.write().await;
        payments.retain(|_, existing| !existing.is_expired_at(&now));

        match payments.get_mut(&payment.order_reference) {
            None => {
                payments.insert(payment.order_reference.clone(), payment);
                Ok(SaveResult::Inserted)
            }
            Some(existing) if !existing.is_settled() && existing.amount == payment.amount => {
                existing.expires_at = existing.expires_at.max(payment.expires_at);
                Ok(SaveResult::Refreshed)
            }
            Some(existing) => Ok(SaveResult::AlreadyExists(existing.clone())),
        }
    }

    async fn find_by_reference(
        &self,
        order_reference: &str,
    ) -> Result<Option<PendingPayment>, DomainError> {
        Ok(self.payments.read().await.get(order_reference).cloned())
    }

    async fn settle(
        &self,
        order_reference: &str,
        status: PaymentStatus,
        transaction_no: Option<String>,
    ) -> Result<SettleResult, DomainError> {
        if status == PaymentStatus::Pending {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "cannot settle a payment back to pending",
            ));
        }

        // Check and update under one write lock so only one caller wins.
        let mut payments = self.payments.write().await;
        let Some(payment) = payments.get_mut(order_reference) else {
            return Ok(SettleResult::NotFound);
        };
        if payment.is_settled() {
            return Ok(SettleResult::AlreadySettled);
        }

        payment.status = status;
        payment.settled_at = Some(Timestamp::now());
        payment.transaction_no = transaction_no;
        Ok(SettleResult::Settled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(order_reference: &str, amount: i64) -> PendingPayment {
        PendingPayment::new(order_reference, amount, Timestamp::now().plus_minutes(15))
    }

    fn lapsed(order_reference: &str, amount: i64) -> PendingPayment {
        PendingPayment::new(order_reference, amount, Timestamp::now().plus_minutes(-1))
    }

    // ══════════════════════════════════════════════════════════════
    // Save / Find
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn save_inserts_new_record() {
        let store = InMemoryPendingPaymentStore::new();

        let result = store.save(pending("ORD-001", 150_000)).await;

        assert_eq!(result.unwrap(), SaveResult::Inserted);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn save_keeps_live_record_with_other_amount() {
        let store = InMemoryPendingPaymentStore::new();
        store.save(pending("ORD-001", 150_000)).await.unwrap();

        let result = store.save(pending("ORD-001", 999)).await.unwrap();

        match result {
            SaveResult::AlreadyExists(existing) => assert_eq!(existing.amount, 150_000),
            other => panic!("expected AlreadyExists, got {:?}", other),
        }
        let stored = store.find_by_reference("ORD-001").await.unwrap().unwrap();
        assert_eq!(stored.amount, 150_000);
    }

    #[tokio::test]
    async fn save_same_amount_extends_expiry() {
        let store = InMemoryPendingPaymentStore::new();
        store.save(pending("ORD-001", 150_000)).await.unwrap();
        let later = Timestamp::now().plus_minutes(60);

        let result = store
            .save(PendingPayment::new("ORD-001", 150_000, later))
            .await
            .unwrap();

        assert_eq!(result, SaveResult::Refreshed);
        let stored = store.find_by_reference("ORD-001").await.unwrap().unwrap();
        assert_eq!(stored.expires_at, later);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn save_replaces_expired_record_with_new_amount() {
        let store = InMemoryPendingPaymentStore::new();
        store.save(lapsed("ORD-001", 150_000)).await.unwrap();

        let result = store.save(pending("ORD-001", 175_000)).await.unwrap();

        assert_eq!(result, SaveResult::Inserted);
        let stored = store.find_by_reference("ORD-001").await.unwrap().unwrap();
        assert_eq!(stored.amount, 175_000);
        assert_eq!(stored.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn save_prunes_expired_records() {
        let store = InMemoryPendingPaymentStore::new();
        for i in 0..5_000 {
            store.save(lapsed(&format!("ABANDONED-{i}"), 10_000)).await.unwrap();
        }

        store.save(pending("ORD-001", 10_000)).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert!(store.find_by_reference("ABANDONED-0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_keeps_settled_records_past_expiry() {
        let store = InMemoryPendingPaymentStore::new();
        store.save(lapsed("ORD-001", 150_000)).await.unwrap();
        store.settle("ORD-001", PaymentStatus::Paid, None).await.unwrap();

        let result = store.save(pending("ORD-001", 150_000)).await.unwrap();

        assert!(matches!(result, SaveResult::AlreadyExists(ref p) if p.is_settled()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn find_unknown_returns_none() {
        let store = InMemoryPendingPaymentStore::new();

        let found = store.find_by_reference("missing").await.unwrap();

        assert!(found.is_none());
    }

    // ══════════════════════════════════════════════════════════════
    // Settle
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn settle_marks_paid_once() {
        let store = InMemoryPendingPaymentStore::new();
        store.save(pending("ORD-001", 1)).await.unwrap();

        let first = store
            .settle("ORD-001", PaymentStatus::Paid, Some("14226112".to_string()))
            .await
            .unwrap();
        let second = store
            .settle("ORD-001", PaymentStatus::Failed, None)
            .await
            .unwrap();

        assert_eq!(first, SettleResult::Settled);
        assert_eq!(second, SettleResult::AlreadySettled);
        let stored = store.find_by_reference("ORD-001").await.unwrap().unwrap();
        assert_eq!(stored.status, PaymentStatus::Paid);
        assert_eq!(stored.transaction_no.as_deref(), Some("14226112"));
        assert!(stored.settled_at.is_some());
    }

    #[tokio::test]
    async fn settle_unknown_is_not_found() {
        let store = InMemoryPendingPaymentStore::new();

        let result = store.settle("missing", PaymentStatus::Paid, None).await;

        assert_eq!(result.unwrap(), SettleResult::NotFound);
    }

    #[tokio::test]
    async fn settle_to_pending_is_rejected() {
        let store = InMemoryPendingPaymentStore::new();
        store.save(pending("ORD-001", 1)).await.unwrap();

        let err = store
            .settle("ORD-001", PaymentStatus::Pending, None)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn concurrent_settles_have_single_winner() {
        let store = InMemoryPendingPaymentStore::new();
        store.save(pending("ORD-001", 1)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.settle("ORD-001", PaymentStatus::Paid, None).await
            }));
        }

        let mut settled = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() == SettleResult::Settled {
                settled += 1;
            }
        }
        assert_eq!(settled, 1);
    }
}
