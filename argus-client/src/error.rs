//! Client-side error taxonomy.
//!
//! Every service result code maps to its own variant so callers can match on
//! the failure kind; each carries the original envelope for inspection.
//! Transport-level failures (connection errors, oversized uploads the server
//! cut off before composing a response) surface as their own variants and
//! never carry a result code.

use reqwest::StatusCode;
use thiserror::Error;

use argus_core::ResultCode;

/// The parsed failure envelope a variant carries.
#[derive(Debug, Clone)]
pub struct ServiceFailure {
    pub status: StatusCode,
    pub result_code: ResultCode,
    pub transaction_id: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authentication failed")]
    AuthenticationFailure(ServiceFailure),

    #[error("project is inactive")]
    ProjectInactive(ServiceFailure),

    #[error("unknown target")]
    UnknownTarget(ServiceFailure),

    #[error("target name already exists")]
    TargetNameExist(ServiceFailure),

    #[error("request failed validation")]
    Fail(ServiceFailure),

    #[error("image could not be used")]
    BadImage(ServiceFailure),

    #[error("image too large")]
    ImageTooLarge(ServiceFailure),

    #[error("application metadata too large")]
    MetadataTooLarge(ServiceFailure),

    #[error("target status does not allow this operation")]
    TargetStatusNotSuccess(ServiceFailure),

    /// The server aborted the request before composing an envelope. Seen when
    /// the payload exceeds the transport-level ceiling.
    #[error("request aborted by the server (HTTP {status}); payload may be too large")]
    PayloadTooLarge { status: StatusCode },

    /// A response that carries no known result code.
    #[error("unexpected response (HTTP {status}): {body}")]
    UnexpectedResponse { status: StatusCode, body: String },

    /// Connection-level failure; no response was received at all.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Client-side only: polling exceeded the caller's deadline. The server
    /// has no notion of waiting.
    #[error("timed out waiting for target {target_id} to finish processing")]
    ProcessingTimeout { target_id: String },
}

impl ClientError {
    /// Translate a failure envelope into the matching variant.
    pub(crate) fn from_failure(status: StatusCode, result_code: ResultCode, transaction_id: String) -> Self {
        let failure = ServiceFailure {
            status,
            result_code,
            transaction_id,
        };
        match result_code {
            ResultCode::AuthenticationFailure => Self::AuthenticationFailure(failure),
            ResultCode::ProjectInactive => Self::ProjectInactive(failure),
            ResultCode::UnknownTarget => Self::UnknownTarget(failure),
            ResultCode::TargetNameExist => Self::TargetNameExist(failure),
            ResultCode::Fail => Self::Fail(failure),
            ResultCode::BadImage => Self::BadImage(failure),
            ResultCode::ImageTooLarge => Self::ImageTooLarge(failure),
            ResultCode::MetadataTooLarge => Self::MetadataTooLarge(failure),
            ResultCode::TargetStatusNotSuccess => Self::TargetStatusNotSuccess(failure),
            // Success codes on a failure path mean the server and client
            // disagree about the operation; surface them raw.
            ResultCode::Success | ResultCode::TargetCreated => Self::UnexpectedResponse {
                status,
                body: result_code.as_str().to_string(),
            },
        }
    }

    /// The failure envelope, when this error carries one.
    pub fn service_failure(&self) -> Option<&ServiceFailure> {
        match self {
            Self::AuthenticationFailure(f)
            | Self::ProjectInactive(f)
            | Self::UnknownTarget(f)
            | Self::TargetNameExist(f)
            | Self::Fail(f)
            | Self::BadImage(f)
            | Self::ImageTooLarge(f)
            | Self::MetadataTooLarge(f)
            | Self::TargetStatusNotSuccess(f) => Some(f),
            _ => None,
        }
    }
}
