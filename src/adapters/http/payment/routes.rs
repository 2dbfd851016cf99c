//! Axum router configuration for payment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_payment, health, payment_ipn, payment_return, PaymentAppState};

/// Create the payment API router.
///
/// # Routes
/// - `POST /` - Issue a signed payment URL
/// - `GET /vnpay/return` - Verify the customer return redirect
/// - `GET /vnpay/ipn` - Provider notification (signature verified)
pub fn payment_routes() -> Router<PaymentAppState> {
    Router::new()
        .route("/", post(create_payment))
        .route("/vnpay/return", get(payment_return))
        .route("/vnpay/ipn", get(payment_ipn))
}

/// Create the complete service router.
///
/// Mounts the payment routes at `/api/payments` and the liveness probe at
/// `/health`.
///
/// # Example
///
/// ```ignore
/// let state = PaymentAppState::new(Some(gateway), pending_payments);
/// let app = payment_router().with_state(state);
/// ```
pub fn payment_router() -> Router<PaymentAppState> {
    Router::new()
        .nest("/api/payments", payment_routes())
        .route("/health", get(health))
}
