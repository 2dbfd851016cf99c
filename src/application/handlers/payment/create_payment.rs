//! CreatePaymentHandler - Command handler for issuing a signed payment URL.

use std::sync::Arc;

use crate::domain::payment::{Locale, PaymentError, PaymentIntent};
use crate::ports::{PaymentGateway, PendingPayment, PendingPaymentStore, SaveResult};

/// Command to start a payment for an order.
#[derive(Debug, Clone)]
pub struct CreatePaymentCommand {
    pub order_id: String,
    /// Amount in major currency units.
    pub amount: i64,
    pub order_info: Option<String>,
    pub bank_code: Option<String>,
    pub locale: Option<Locale>,
    /// Customer IP as seen by the HTTP layer.
    pub client_ip: String,
}

/// Result of issuing a payment URL.
#[derive(Debug, Clone)]
pub struct CreatePaymentResult {
    pub order_id: String,
    pub amount: i64,
    pub payment_url: String,
}

/// Handler for issuing payment URLs.
///
/// Records a pending payment for the order so the IPN can be
/// cross-checked against what was actually requested.
pub struct CreatePaymentHandler {
    gateway: Option<Arc<dyn PaymentGateway>>,
    pending_payments: Arc<dyn PendingPaymentStore>,
}

impl CreatePaymentHandler {
    pub fn new(
        gateway: Option<Arc<dyn PaymentGateway>>,
        pending_payments: Arc<dyn PendingPaymentStore>,
    ) -> Self {
        Self {
            gateway,
            pending_payments,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentCommand,
    ) -> Result<CreatePaymentResult, PaymentError> {
        let gateway = self.gateway.as_ref().ok_or(PaymentError::NotConfigured)?;

        // 1. Validate the intent
        let intent = PaymentIntent::new(cmd.order_id, cmd.amount)?
            .with_order_info(cmd.order_info)
            .with_bank_code(cmd.bank_code)
            .with_locale(cmd.locale);

        // 2. Sign before recording, so a signing failure leaves no trace
        let redirect = gateway.create_payment_url(&intent, &cmd.client_ip)?;

        // 3. Record (or re-use) the pending payment; expired records are replaced
        let pending = PendingPayment::new(
            intent.order_reference(),
            intent.amount(),
            redirect.expires_at,
        );
        if let SaveResult::AlreadyExists(existing) = self.pending_payments.save(pending).await? {
            return Err(reissue_conflict(existing, &intent));
        }

        Ok(CreatePaymentResult {
            order_id: intent.order_reference().to_string(),
            amount: intent.amount(),
            payment_url: redirect.url,
        })
    }
}

/// Why a live record blocks issuing a new URL for the same order.
fn reissue_conflict(existing: PendingPayment, intent: &PaymentIntent) -> PaymentError {
    if existing.is_settled() {
        PaymentError::AlreadyConfirmed(existing.order_reference)
    } else {
        PaymentError::AmountMismatch {
            expected: existing.amount,
            actual: intent.amount(),
        }
    }
}
