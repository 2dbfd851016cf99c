//! Payment-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotConfigured | 400 |
//! | InvalidInput | 400 |
//! | SignatureMismatch | 401 |
//! | MissingSignature | 401 |
//! | MalformedProviderResponse | 502 |
//! | OrderNotFound | 404 |
//! | AmountMismatch | 409 |
//! | AlreadyConfirmed | 409 |
//! | Infrastructure | 500 |

use thiserror::Error;

use super::callback::RejectionReason;
use super::fields;
use crate::domain::foundation::{DomainError, ValidationError};

/// Errors raised while issuing or settling a payment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// Gateway credentials were not supplied at startup.
    #[error("Payment gateway is not configured")]
    NotConfigured,

    #[error("Invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Callback signature does not match")]
    SignatureMismatch,

    #[error("Callback signature is missing")]
    MissingSignature,

    /// Signature was valid but a field could not be interpreted.
    #[error("Malformed provider response field {field}: {message}")]
    MalformedProviderResponse { field: String, message: String },

    #[error("No pending payment for order {0}")]
    OrderNotFound(String),

    #[error("Amount mismatch: expected {expected}, got {actual}")]
    AmountMismatch { expected: i64, actual: i64 },

    #[error("Payment for order {0} is already confirmed")]
    AlreadyConfirmed(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl PaymentError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::MalformedProviderResponse {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PaymentError::Infrastructure(message.into())
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            PaymentError::NotConfigured => "PAYMENT_NOT_CONFIGURED",
            PaymentError::InvalidInput { .. } => "VALIDATION_FAILED",
            PaymentError::SignatureMismatch => "INVALID_SIGNATURE",
            PaymentError::MissingSignature => "MISSING_SIGNATURE",
            PaymentError::MalformedProviderResponse { .. } => "MALFORMED_PROVIDER_RESPONSE",
            PaymentError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            PaymentError::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            PaymentError::AlreadyConfirmed(_) => "ALREADY_CONFIRMED",
            PaymentError::Infrastructure(_) => "INTERNAL_ERROR",
        }
    }

    /// True for failures that indicate a forged or tampered callback.
    pub fn is_security_relevant(&self) -> bool {
        matches!(
            self,
            PaymentError::SignatureMismatch | PaymentError::MissingSignature
        )
    }
}

impl From<ValidationError> for PaymentError {
    fn from(err: ValidationError) -> Self {
        PaymentError::invalid_input(err.field().to_string(), err.to_string())
    }
}

impl From<DomainError> for PaymentError {
    fn from(err: DomainError) -> Self {
        PaymentError::Infrastructure(err.to_string())
    }
}

impl From<RejectionReason> for PaymentError {
    fn from(reason: RejectionReason) -> Self {
        match reason {
            RejectionReason::SignatureMismatch => PaymentError::SignatureMismatch,
            RejectionReason::MissingSignature => PaymentError::MissingSignature,
            RejectionReason::MalformedAmount => {
                PaymentError::malformed(fields::AMOUNT, "not a whole minor-unit amount")
            }
            RejectionReason::MissingField(field) => {
                PaymentError::malformed(field, "required field is missing")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn validation_error_becomes_invalid_input() {
        let err: PaymentError = ValidationError::empty_field("order_id").into();

        assert_eq!(err.code(), "VALIDATION_FAILED");
        assert!(matches!(err, PaymentError::InvalidInput { ref field, .. } if field == "order_id"));
    }

    #[test]
    fn domain_error_becomes_infrastructure() {
        let err: PaymentError = DomainError::new(ErrorCode::InvalidStateTransition, "down").into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn malformed_amount_is_distinct_from_tampering() {
        let malformed: PaymentError = RejectionReason::MalformedAmount.into();
        let tampered: PaymentError = RejectionReason::SignatureMismatch.into();

        assert_eq!(malformed.code(), "MALFORMED_PROVIDER_RESPONSE");
        assert!(!malformed.is_security_relevant());
        assert_eq!(tampered.code(), "INVALID_SIGNATURE");
        assert!(tampered.is_security_relevant());
    }

    #[test]
    fn missing_signature_is_security_relevant() {
        let err: PaymentError = RejectionReason::MissingSignature.into();
        assert!(err.is_security_relevant());
        assert_eq!(err.code(), "MISSING_SIGNATURE");
    }

    #[test]
    fn messages_do_not_leak_internal_values() {
        let err = PaymentError::SignatureMismatch;
        assert_eq!(err.to_string(), "Callback signature does not match");
    }
}
