//! Domain layer - Core business logic.
//!
//! - `foundation` - Shared value objects and error types
//! - `payment` - Canonical encoding, signing and callback verification

pub mod foundation;
pub mod payment;
