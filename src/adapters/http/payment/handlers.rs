//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to application layer command handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Json, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::payment::{
    CreatePaymentCommand, CreatePaymentHandler, HandlePaymentIpnCommand, HandlePaymentIpnHandler,
    HandlePaymentReturnCommand, HandlePaymentReturnHandler,
};
use crate::domain::payment::canonical::decode;
use crate::domain::payment::fields::DEFAULT_CLIENT_IP;
use crate::domain::payment::PaymentError;
use crate::ports::{PaymentGateway, PendingPaymentStore};

use super::dto::{
    CreatePaymentRequest, CreatePaymentResponse, ErrorResponse, HealthResponse,
    PaymentReturnResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for payment endpoints.
///
/// `gateway` is `None` when no gateway credentials were configured; every
/// payment endpoint then answers `PAYMENT_NOT_CONFIGURED`.
#[derive(Clone)]
pub struct PaymentAppState {
    pub gateway: Option<Arc<dyn PaymentGateway>>,
    pub pending_payments: Arc<dyn PendingPaymentStore>,
    /// Whether forwarded headers may name the client IP.
    pub trust_proxy_headers: bool,
}

impl PaymentAppState {
    pub fn new(
        gateway: Option<Arc<dyn PaymentGateway>>,
        pending_payments: Arc<dyn PendingPaymentStore>,
    ) -> Self {
        Self {
            gateway,
            pending_payments,
            trust_proxy_headers: true,
        }
    }

    pub fn with_trusted_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn create_payment_handler(&self) -> CreatePaymentHandler {
        CreatePaymentHandler::new(self.gateway.clone(), self.pending_payments.clone())
    }

    pub fn return_handler(&self) -> HandlePaymentReturnHandler {
        HandlePaymentReturnHandler::new(self.gateway.clone())
    }

    pub fn ipn_handler(&self) -> HandlePaymentIpnHandler {
        HandlePaymentIpnHandler::new(self.gateway.clone(), self.pending_payments.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments - Issue a signed payment URL
pub async fn create_payment(
    State(state): State<PaymentAppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let handler = state.create_payment_handler();
    let cmd = CreatePaymentCommand {
        order_id: request.order_id,
        amount: request.amount,
        order_info: request.order_info,
        bank_code: request.bank_code,
        locale: request.locale,
        client_ip: extract_client_ip(
            &headers,
            connect_info.as_ref(),
            state.trust_proxy_headers,
        ),
    };

    let result = handler.handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(CreatePaymentResponse::from(result))))
}

/// GET /api/payments/vnpay/return - Verify the customer return redirect
pub async fn payment_return(
    State(state): State<PaymentAppState>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, PaymentApiError> {
    let handler = state.return_handler();
    let cmd = HandlePaymentReturnCommand {
        query: decode(query.as_deref().unwrap_or_default()),
    };

    let result = handler.handle(cmd)?;

    Ok(Json(PaymentReturnResponse::from(result)))
}

/// GET /api/payments/vnpay/ipn - Provider server-to-server notification
///
/// Always 200: the outcome is carried in the acknowledgement body.
pub async fn payment_ipn(
    State(state): State<PaymentAppState>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let handler = state.ipn_handler();
    let cmd = HandlePaymentIpnCommand {
        query: decode(query.as_deref().unwrap_or_default()),
    };

    Json(handler.handle(cmd).await)
}

/// GET /health - Liveness probe
pub async fn health(State(state): State<PaymentAppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        payments_configured: state.is_configured(),
    })
}

/// Extract client IP, checking forwarded headers first.
///
/// Order of precedence:
/// 1. X-Forwarded-For header (first IP in list)
/// 2. X-Real-IP header
/// 3. ConnectInfo socket address
/// 4. Loopback
///
/// Steps 1 and 2 are skipped unless `trust_proxy_headers` is set. Any client
/// can send these headers, so they are only meaningful behind a reverse proxy
/// that overwrites them.
pub fn extract_client_ip(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    trust_proxy_headers: bool,
) -> String {
    let peer_ip = || {
        connect_info
            .map(|ci| ci.0.ip().to_string())
            .unwrap_or_else(|| DEFAULT_CLIENT_IP.to_string())
    };
    if !trust_proxy_headers {
        return peer_ip();
    }

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(first_ip) = header("X-Forwarded-For")
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return first_ip.to_string();
    }

    if let Some(real_ip) = header("X-Real-IP") {
        return real_ip.to_string();
    }

    peer_ip()
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts payment errors to HTTP responses.
#[derive(Debug)]
pub struct PaymentApiError(PaymentError);

impl From<PaymentError> for PaymentApiError {
    fn from(err: PaymentError) -> Self {
        Self(err)
    }
}

impl PaymentApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PaymentError::NotConfigured | PaymentError::InvalidInput { .. } => {
                StatusCode::BAD_REQUEST
            }
            PaymentError::SignatureMismatch | PaymentError::MissingSignature => {
                StatusCode::UNAUTHORIZED
            }
            PaymentError::MalformedProviderResponse { .. } => StatusCode::BAD_GATEWAY,
            PaymentError::OrderNotFound(_) => StatusCode::NOT_FOUND,
            PaymentError::AmountMismatch { .. } | PaymentError::AlreadyConfirmed(_) => {
                StatusCode::CONFLICT
            }
            PaymentError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match &self.0 {
            PaymentError::Infrastructure(detail) => {
                tracing::error!(error = %detail, "Payment request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorResponse::new(self.0.code(), message);
        (status, Json(body)).into_response()
    }
}
