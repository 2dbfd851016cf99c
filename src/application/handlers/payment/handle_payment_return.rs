//! HandlePaymentReturnHandler - Verifies the browser return redirect.
//!
//! The return URL is user-controlled: it is shown to the customer but never
//! settles anything. Settlement happens only through the IPN.

use std::sync::Arc;

use crate::domain::payment::{CallbackEnvelope, PaymentError, PaymentResult};
use crate::ports::PaymentGateway;

/// Command carrying the raw return-URL query pairs.
#[derive(Debug, Clone)]
pub struct HandlePaymentReturnCommand {
    pub query: Vec<(String, String)>,
}

/// Verified, normalized return data.
#[derive(Debug, Clone)]
pub struct HandlePaymentReturnResult {
    pub payment: PaymentResult,
    /// Customer-facing description of the response code.
    pub message: &'static str,
}

pub struct HandlePaymentReturnHandler {
    gateway: Option<Arc<dyn PaymentGateway>>,
}

impl HandlePaymentReturnHandler {
    pub fn new(gateway: Option<Arc<dyn PaymentGateway>>) -> Self {
        Self { gateway }
    }

    pub fn handle(
        &self,
        cmd: HandlePaymentReturnCommand,
    ) -> Result<HandlePaymentReturnResult, PaymentError> {
        let gateway = self.gateway.as_ref().ok_or(PaymentError::NotConfigured)?;

        let envelope = CallbackEnvelope::from_query(cmd.query);
        let payment = gateway.verify_callback(&envelope).into_result()?;
        let message = payment.response_code.description();

        Ok(HandlePaymentReturnResult { payment, message })
    }
}
