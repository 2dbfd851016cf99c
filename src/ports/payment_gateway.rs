//! Payment gateway port.
//!
//! The two protocol operations a hosted-checkout provider offers: issue a
//! signed redirect URL for a payment intent, and authenticate the callback
//! that comes back. Both are synchronous and side-effect free; transport
//! concerns (reading the caller IP, the query string) stay in the adapter
//! that calls them.

use crate::domain::foundation::Timestamp;
use crate::domain::payment::{CallbackEnvelope, PaymentError, PaymentIntent, VerificationOutcome};

/// A signed redirect URL and the moment the provider stops honouring it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRedirect {
    pub url: String,
    pub expires_at: Timestamp,
}

/// Port for payment provider integrations.
pub trait PaymentGateway: Send + Sync {
    /// Builds the signed provider URL the customer is redirected to.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::InvalidInput` when the intent cannot be
    /// expressed on the wire.
    fn create_payment_url(
        &self,
        intent: &PaymentIntent,
        client_ip: &str,
    ) -> Result<PaymentRedirect, PaymentError>;

    /// Authenticates a callback and, when genuine, normalizes its fields.
    ///
    /// Never fails: every rejection is a `VerificationOutcome::Invalid`.
    fn verify_callback(&self, envelope: &CallbackEnvelope) -> VerificationOutcome;
}
