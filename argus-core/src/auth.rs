//! Request signing and verification.
//!
//! Every authenticated request carries `Authorization: ARGUS <access>:<sig>`
//! where the signature is an HMAC-SHA1 over a canonical newline-joined string
//! of the request: method, hex MD5 of the body, content type, date header and
//! path. The client produces the header; the simulator recomputes and compares
//! it. The canonical order and digests must never change - they have to match
//! the live service bit for bit.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::error::AuthError;

type HmacSha1 = Hmac<Sha1>;

/// Scheme token at the start of the `Authorization` header.
pub const AUTH_SCHEME: &str = "ARGUS";

/// Compute the signature for a request.
///
/// Pure function of its inputs; an empty body hashes the empty string.
pub fn sign(
    secret_key: &[u8],
    method: &str,
    content: &[u8],
    content_type: &str,
    date: &str,
    request_path: &str,
) -> String {
    let content_md5 = hex::encode(Md5::digest(content));
    let canonical = [method, content_md5.as_str(), content_type, date, request_path].join("\n");

    // HMAC accepts keys of any length, so this cannot fail.
    let mut mac = HmacSha1::new_from_slice(secret_key).expect("HMAC key of any length");
    mac.update(canonical.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Build the full `Authorization` header value for a request.
#[allow(clippy::too_many_arguments)]
pub fn authorization_header(
    access_key: &str,
    secret_key: &[u8],
    method: &str,
    content: &[u8],
    content_type: &str,
    date: &str,
    request_path: &str,
) -> String {
    let signature = sign(secret_key, method, content, content_type, date, request_path);
    format!("{AUTH_SCHEME} {access_key}:{signature}")
}

/// Verify a received `Authorization` header against the request it arrived
/// with.
///
/// `lookup` resolves an access key to its secret; returning `None` marks the
/// key as unknown. On success the claimed access key is returned so the caller
/// can scope the operation to that credential pair. The signature comparison
/// is constant-time.
pub fn verify<F>(
    received_header: &str,
    lookup: F,
    method: &str,
    content: &[u8],
    content_type: &str,
    date: &str,
    request_path: &str,
) -> Result<String, AuthError>
where
    F: FnOnce(&str) -> Option<Vec<u8>>,
{
    let rest = received_header
        .strip_prefix(AUTH_SCHEME)
        .and_then(|r| r.strip_prefix(' '))
        .ok_or(AuthError::MalformedHeader)?;

    let (access_key, claimed) = rest.split_once(':').ok_or(AuthError::MalformedHeader)?;
    if access_key.is_empty() || claimed.is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    let secret_key = lookup(access_key).ok_or(AuthError::UnknownAccessKey)?;
    let expected = sign(&secret_key, method, content, content_type, date, request_path);

    if bool::from(expected.as_bytes().ct_eq(claimed.as_bytes())) {
        Ok(access_key.to_string())
    } else {
        Err(AuthError::SignatureMismatch)
    }
}
