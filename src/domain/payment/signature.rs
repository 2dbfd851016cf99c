//! Secure hash signing and verification.
//!
//! VNPay authenticates both directions with HMAC-SHA512 over the canonical
//! payload, rendered as lowercase hex. Verification decodes the claimed hex
//! (either case) and compares raw bytes in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;

use super::canonical::CanonicalPayload;

type HmacSha512 = Hmac<Sha512>;

/// Length of a hex-encoded HMAC-SHA512 digest.
pub const SIGNATURE_HEX_LEN: usize = 128;

/// Signs a canonical payload, returning the lowercase hex digest.
pub fn sign(payload: &CanonicalPayload, secret: &[u8]) -> String {
    hex::encode(compute_mac(payload, secret))
}

/// Checks `claimed_hex` against a freshly computed digest.
///
/// An empty claim or one that is not valid hex simply fails.
pub fn verify(payload: &CanonicalPayload, secret: &[u8], claimed_hex: &str) -> bool {
    if claimed_hex.is_empty() {
        return false;
    }
    let Ok(claimed) = hex::decode(claimed_hex) else {
        return false;
    };
    constant_time_compare(&compute_mac(payload, secret), &claimed)
}

fn compute_mac(payload: &CanonicalPayload, secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha512::new_from_slice(secret).expect("HMAC accepts any key");
    mac.update(payload.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
