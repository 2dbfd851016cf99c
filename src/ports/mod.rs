//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentGateway` - Signed payment URLs and callback authentication
//! - `PendingPaymentStore` - Issued payments and at-most-once settlement

mod payment_gateway;
mod pending_payment_store;

pub use payment_gateway::{PaymentGateway, PaymentRedirect};
pub use pending_payment_store::{
    PaymentStatus, PendingPayment, PendingPaymentStore, SaveResult, SettleResult,
};
