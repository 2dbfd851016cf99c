//! VNPay payment gateway adapter.
//!
//! Implements the `PaymentGateway` port for VNPay, including:
//! - Signed payment URL construction
//! - Return URL / IPN callback verification
//!
//! # Configuration
//!
//! Required environment variables:
//! - `PAYMENT_GATEWAY__PAYMENT__MERCHANT_CODE`: Terminal code (vnp_TmnCode)
//! - `PAYMENT_GATEWAY__PAYMENT__HASH_SECRET`: HMAC-SHA512 shared secret
//! - `PAYMENT_GATEWAY__PAYMENT__PAYMENT_URL`: Provider payment page
//! - `PAYMENT_GATEWAY__PAYMENT__RETURN_URL`: Customer return URL

mod vnpay_adapter;

pub use vnpay_adapter::VnpayGateway;
