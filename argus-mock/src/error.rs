//! Simulator error type and the failure half of the response composer.
//!
//! Each variant fixes one (HTTP status, result code) pairing; `IntoResponse`
//! renders the shared JSON envelope with a fresh transaction id.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use argus_core::{BasicResponse, ResultCode};

use crate::response::new_transaction_id;

/// Every failure outcome a request can resolve to.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulatorError {
    /// Bad or missing signature, unknown key, missing or stale date. The wire
    /// response never distinguishes which.
    #[error("authentication failed")]
    AuthenticationFailure,

    /// The whole project is suspended; takes precedence over per-target state.
    #[error("project is inactive")]
    ProjectInactive,

    /// No live target with the given id.
    #[error("unknown target")]
    UnknownTarget,

    /// Another live target of this owner already uses the name.
    #[error("target name already exists")]
    TargetNameExist,

    /// Unparsable body, unexpected fields, or a per-field type/range failure.
    #[error("malformed request: {0}")]
    BadRequest(String),

    /// Metadata was a string but not valid base64. Same result code as
    /// `BadRequest` but a more severe status.
    #[error("application metadata is not valid base64")]
    MetadataNotBase64,

    /// Decoded metadata over the configured ceiling.
    #[error("application metadata too large")]
    MetadataTooLarge,

    /// Image payload did not decode as a supported raster format.
    #[error("image could not be decoded")]
    BadImage,

    /// Decoded image over the configured ceiling.
    #[error("image too large")]
    ImageTooLarge,

    /// Mutation attempted while the target's state forbids it.
    #[error("target is not in a modifiable state")]
    TargetStatusNotSuccess,
}

impl SimulatorError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationFailure => StatusCode::UNAUTHORIZED,
            Self::ProjectInactive | Self::TargetNameExist | Self::TargetStatusNotSuccess => {
                StatusCode::FORBIDDEN
            }
            Self::UnknownTarget => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MetadataNotBase64
            | Self::MetadataTooLarge
            | Self::BadImage
            | Self::ImageTooLarge => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::AuthenticationFailure => ResultCode::AuthenticationFailure,
            Self::ProjectInactive => ResultCode::ProjectInactive,
            Self::UnknownTarget => ResultCode::UnknownTarget,
            Self::TargetNameExist => ResultCode::TargetNameExist,
            // Invalid base64 shares the generic code; only the status differs.
            Self::BadRequest(_) | Self::MetadataNotBase64 => ResultCode::Fail,
            Self::MetadataTooLarge => ResultCode::MetadataTooLarge,
            Self::BadImage => ResultCode::BadImage,
            Self::ImageTooLarge => ResultCode::ImageTooLarge,
            Self::TargetStatusNotSuccess => ResultCode::TargetStatusNotSuccess,
        }
    }
}

impl IntoResponse for SimulatorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let result_code = self.result_code();

        tracing::warn!(
            status = %status,
            result_code = result_code.as_str(),
            error = %self,
            "Request failed"
        );

        let body = BasicResponse {
            result_code,
            transaction_id: new_transaction_id(),
        };
        (status, Json(body)).into_response()
    }
}
