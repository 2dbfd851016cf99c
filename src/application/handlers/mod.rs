//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod payment;

pub use payment::{
    CreatePaymentCommand, CreatePaymentHandler, CreatePaymentResult, HandlePaymentIpnCommand,
    HandlePaymentIpnHandler, HandlePaymentReturnCommand, HandlePaymentReturnHandler,
    HandlePaymentReturnResult, IpnAcknowledgement,
};
