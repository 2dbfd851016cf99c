//! HandlePaymentIpnHandler - Settles payments from provider notifications.
//!
//! The IPN is the only authoritative settlement signal. It is verified,
//! cross-checked against the pending payment, and applied at most once.
//! Every outcome is answered with an acknowledgement; the provider retries
//! until it receives one.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::payment::{CallbackEnvelope, PaymentError, PaymentResult};
use crate::ports::{PaymentGateway, PaymentStatus, PendingPaymentStore, SettleResult};

/// Command carrying the raw IPN query pairs.
#[derive(Debug, Clone)]
pub struct HandlePaymentIpnCommand {
    pub query: Vec<(String, String)>,
}

/// Acknowledgement body the provider expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpnAcknowledgement {
    #[serde(rename = "RspCode")]
    pub rsp_code: &'static str,
    #[serde(rename = "Message")]
    pub message: &'static str,
}

impl IpnAcknowledgement {
    pub const CONFIRMED: Self = Self::new("00", "Confirm Success");
    pub const ORDER_NOT_FOUND: Self = Self::new("01", "Order not found");
    pub const ALREADY_CONFIRMED: Self = Self::new("02", "Order already confirmed");
    pub const INVALID_AMOUNT: Self = Self::new("04", "Invalid amount");
    pub const INVALID_SIGNATURE: Self = Self::new("97", "Invalid signature");
    pub const UNKNOWN_ERROR: Self = Self::new("99", "Unknown error");

    const fn new(rsp_code: &'static str, message: &'static str) -> Self {
        Self { rsp_code, message }
    }
}

impl From<&PaymentError> for IpnAcknowledgement {
    fn from(err: &PaymentError) -> Self {
        match err {
            PaymentError::SignatureMismatch | PaymentError::MissingSignature => {
                Self::INVALID_SIGNATURE
            }
            PaymentError::OrderNotFound(_) => Self::ORDER_NOT_FOUND,
            PaymentError::AmountMismatch { .. } => Self::INVALID_AMOUNT,
            PaymentError::AlreadyConfirmed(_) => Self::ALREADY_CONFIRMED,
            PaymentError::NotConfigured
            | PaymentError::InvalidInput { .. }
            | PaymentError::MalformedProviderResponse { .. }
            | PaymentError::Infrastructure(_) => Self::UNKNOWN_ERROR,
        }
    }
}

/// Handler for provider IPN calls.
pub struct HandlePaymentIpnHandler {
    gateway: Option<Arc<dyn PaymentGateway>>,
    pending_payments: Arc<dyn PendingPaymentStore>,
}

impl HandlePaymentIpnHandler {
    pub fn new(
        gateway: Option<Arc<dyn PaymentGateway>>,
        pending_payments: Arc<dyn PendingPaymentStore>,
    ) -> Self {
        Self {
            gateway,
            pending_payments,
        }
    }

    /// Processes a notification. Never fails: errors become acknowledgement codes.
    pub async fn handle(&self, cmd: HandlePaymentIpnCommand) -> IpnAcknowledgement {
        match self.settle(cmd).await {
            Ok(()) => IpnAcknowledgement::CONFIRMED,
            Err(err) => {
                match &err {
                    PaymentError::AlreadyConfirmed(order_reference) => {
                        tracing::info!(
                            order_reference = %order_reference,
                            "Duplicate IPN for settled order"
                        );
                    }
                    PaymentError::Infrastructure(_) | PaymentError::NotConfigured => {
                        tracing::error!(error = %err, "IPN processing failed");
                    }
                    _ if err.is_security_relevant() => {
                        tracing::warn!(
                            code = err.code(),
                            "IPN rejected: unauthenticated callback"
                        );
                    }
                    _ => {
                        tracing::warn!(code = err.code(), "IPN rejected");
                    }
                }
                IpnAcknowledgement::from(&err)
            }
        }
    }

    async fn settle(&self, cmd: HandlePaymentIpnCommand) -> Result<(), PaymentError> {
        let gateway = self.gateway.as_ref().ok_or(PaymentError::NotConfigured)?;

        // 1. Authenticate
        let envelope = CallbackEnvelope::from_query(cmd.query);
        let result = gateway.verify_callback(&envelope).into_result()?;

        // 2. Cross-check against what we issued
        let pending = self
            .pending_payments
            .find_by_reference(&result.order_reference)
            .await?
            .ok_or_else(|| PaymentError::OrderNotFound(result.order_reference.clone()))?;

        if pending.amount != result.amount {
            return Err(PaymentError::AmountMismatch {
                expected: pending.amount,
                actual: result.amount,
            });
        }
        if pending.is_settled() {
            return Err(PaymentError::AlreadyConfirmed(pending.order_reference));
        }

        // 3. Settle at most once
        let status = settlement_status(&result);
        match self
            .pending_payments
            .settle(&result.order_reference, status, result.transaction_no.clone())
            .await?
        {
            SettleResult::Settled => {
                tracing::info!(
                    order_reference = %result.order_reference,
                    amount = result.amount,
                    status = ?status,
                    "Payment settled"
                );
                Ok(())
            }
            SettleResult::AlreadySettled => {
                Err(PaymentError::AlreadyConfirmed(result.order_reference))
            }
            SettleResult::NotFound => Err(PaymentError::OrderNotFound(result.order_reference)),
        }
    }
}

fn settlement_status(result: &PaymentResult) -> PaymentStatus {
    if result.is_successful() {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Failed
    }
}
