//! HMAC-SHA256 signing and constant-time verification.
//!
//! Used for REST request signatures, private/presence channel auth tokens
//! and webhook verification. All signatures are lowercase hex.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Sign `message` with `secret`, returning the lowercase hex digest.
pub fn sign(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Check that `supplied` is the signature of `message` under `secret`.
pub fn verify(secret: &str, message: &str, supplied: &str) -> bool {
    let expected = sign(secret, message);
    constant_time_compare(&expected, supplied)
}

/// Constant-time string comparison.
///
/// Runtime does not depend on the position of the first differing byte.
/// Inputs of different length are padded with different bytes and the
/// length check is folded in without branching.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    let max_len = std::cmp::max(a.len(), b.len());

    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];

    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);

    (lengths_equal & contents_equal).into()
}

/// Lowercase hex MD5 of a request body (`body_md5` query parameter).
pub fn body_md5(body: &str) -> String {
    format!("{:x}", md5::compute(body.as_bytes()))
}
