//! Request authentication: the first stage of the validation pipeline.
//!
//! Checks the `Date` window and the `Authorization` signature before any body
//! parsing happens. The real failure reason is logged at debug level; the
//! wire response is always the same generic `AuthenticationFailure`, so a
//! caller cannot probe which part was wrong.

use std::sync::Arc;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, DATE};
use axum::http::HeaderMap;
use chrono::Duration;

use argus_core::{parse_rfc_1123_date, verify, AuthError};

use crate::error::SimulatorError;
use crate::state::{Account, Simulator};

/// Authenticate one request against the simulator's credential registry.
///
/// Returns the account the signature resolves to. `request_path` must be the
/// path exactly as received, since it is part of the signed canonical string.
pub fn authenticate(
    simulator: &Simulator,
    method: &str,
    request_path: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Arc<Account>, SimulatorError> {
    match try_authenticate(simulator, method, request_path, headers, body) {
        Ok(account) => Ok(account),
        Err(reason) => {
            tracing::debug!(%reason, method, request_path, "Authentication failed");
            Err(SimulatorError::AuthenticationFailure)
        }
    }
}

fn try_authenticate(
    simulator: &Simulator,
    method: &str,
    request_path: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Arc<Account>, AuthError> {
    let date = headers
        .get(DATE)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::BadDate)?;
    let request_time = parse_rfc_1123_date(date).map_err(|_| AuthError::BadDate)?;

    let skew = Duration::from_std(simulator.config.date_skew_tolerance)
        .unwrap_or_else(|_| Duration::minutes(5));
    let now = simulator.config.clock.now();
    if (now - request_time).abs() > skew {
        return Err(AuthError::SkewedDate);
    }

    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MalformedHeader)?;

    // Any Content-Type value is accepted; it is only fed into the canonical
    // string verbatim (empty when absent).
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let access_key = verify(
        authorization,
        |ak| simulator.account(ak).map(|a| a.secret_key.clone().into_bytes()),
        method,
        body,
        content_type,
        date,
        request_path,
    )?;

    // The key verified, so the account exists.
    simulator
        .account(&access_key)
        .ok_or(AuthError::UnknownAccessKey)
}
