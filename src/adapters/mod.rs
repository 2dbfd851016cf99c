//! Adapters - Implementations of port interfaces.

pub mod http;
pub mod pending_payments;
pub mod vnpay;

pub use pending_payments::InMemoryPendingPaymentStore;
pub use vnpay::VnpayGateway;
