//! HTTP adapter for payment endpoints.
//!
//! Exposes the payment flow via REST API:
//! - `POST /api/payments` - Issue a signed payment URL
//! - `GET /api/payments/vnpay/return` - Verify the customer return redirect
//! - `GET /api/payments/vnpay/ipn` - Settle from the provider notification
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{extract_client_ip, PaymentApiError, PaymentAppState};
pub use routes::{payment_router, payment_routes};
