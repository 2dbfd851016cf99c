//! Data Transfer Objects for payment HTTP endpoints.
//!
//! These types define the JSON request/response structures for the payment API.

use serde::{Deserialize, Serialize};

use crate::application::handlers::payment::{CreatePaymentResult, HandlePaymentReturnResult};
use crate::domain::payment::Locale;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a payment for an order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentRequest {
    pub order_id: String,
    /// Amount in major currency units.
    pub amount: i64,
    #[serde(default)]
    pub order_info: Option<String>,
    #[serde(default)]
    pub bank_code: Option<String>,
    #[serde(default)]
    pub locale: Option<Locale>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response with the URL the customer should be redirected to.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentResponse {
    pub order_id: String,
    pub amount: i64,
    pub payment_url: String,
}

impl From<CreatePaymentResult> for CreatePaymentResponse {
    fn from(result: CreatePaymentResult) -> Self {
        Self {
            order_id: result.order_id,
            amount: result.amount,
            payment_url: result.payment_url,
        }
    }
}

/// Verified return-URL data for display.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReturnResponse {
    pub order_id: String,
    pub amount: i64,
    pub successful: bool,
    pub response_code: String,
    pub transaction_status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_date: Option<String>,
}

impl From<HandlePaymentReturnResult> for PaymentReturnResponse {
    fn from(result: HandlePaymentReturnResult) -> Self {
        let payment = result.payment;
        Self {
            successful: payment.is_successful(),
            order_id: payment.order_reference,
            amount: payment.amount,
            response_code: payment.response_code.as_str().to_string(),
            transaction_status: payment.transaction_status.as_str().to_string(),
            message: result.message.to_string(),
            transaction_no: payment.transaction_no,
            bank_code: payment.bank_code,
            card_type: payment.card_type,
            pay_date: payment.pay_date,
        }
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub payments_configured: bool,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
