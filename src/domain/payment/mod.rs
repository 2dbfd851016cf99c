//! Payment domain - VNPay request signing and callback verification.
//!
//! Everything here is pure computation: building the canonical parameter
//! string, signing and verifying it, and turning an authenticated callback
//! into a typed result.

pub mod canonical;
pub mod fields;
pub mod signature;

mod callback;
mod errors;
mod intent;
mod response_code;

pub use callback::{
    minor_to_major, CallbackEnvelope, PaymentResult, RejectionReason, VerificationOutcome,
};
pub use canonical::{CanonicalPayload, ParameterSet};
pub use errors::PaymentError;
pub use intent::{Locale, PaymentIntent};
pub use response_code::{ResponseCode, TransactionStatus};
