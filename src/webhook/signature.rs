//! HMAC-SHA256 signing and timing-safe comparison.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Computes the lowercase hex HMAC-SHA256 of `payload` keyed by `secret`.
///
/// # Example
///
/// ```
/// use mangopay_fam::webhook::compute_signature;
///
/// let sig = compute_signature("whsec_test", b"{}");
/// assert_eq!(sig.len(), 64);
/// ```
#[must_use]
pub fn compute_signature(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Compares two strings without leaking where they differ.
///
/// Unequal lengths return `false` immediately; signature digests have a
/// fixed, public length. Equal-length inputs are compared over every byte.
#[must_use]
pub fn timing_safe_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
