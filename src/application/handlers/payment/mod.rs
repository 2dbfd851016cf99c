//! Payment handlers.
//!
//! ## Commands
//! - Issuing a signed payment URL
//! - Verifying the customer return redirect
//! - Settling from the provider IPN

mod create_payment;
mod handle_payment_ipn;
mod handle_payment_return;

pub use create_payment::{CreatePaymentCommand, CreatePaymentHandler, CreatePaymentResult};
pub use handle_payment_ipn::{HandlePaymentIpnCommand, HandlePaymentIpnHandler, IpnAcknowledgement};
pub use handle_payment_return::{
    HandlePaymentReturnCommand, HandlePaymentReturnHandler, HandlePaymentReturnResult,
};
