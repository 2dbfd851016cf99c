//! Payment Gateway - VNPay request signing and callback verification
//!
//! Issues signed payment URLs for the VNPay hosted checkout and verifies the
//! return redirect and IPN callbacks it sends back.
//!
//! Layout follows ports and adapters:
//! - `domain` - canonical encoding, HMAC-SHA512 signing, callback parsing
//! - `ports` - gateway and pending-payment interfaces
//! - `adapters` - VNPay gateway, in-memory store, axum HTTP surface
//! - `application` - command handlers
//! - `config` - environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
