//! Machine-readable result codes returned in every response envelope.

use serde::{Deserialize, Serialize};

/// The service's outcome label, spelled exactly as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultCode {
    /// Operation completed.
    Success,
    /// Target created; processing has started.
    TargetCreated,
    /// Signature, access key or date check failed. Never says which.
    AuthenticationFailure,
    /// Malformed request or a per-field validation failure.
    Fail,
    /// No live target with the given id.
    UnknownTarget,
    /// A live target of the same owner already uses this name.
    TargetNameExist,
    /// The target's current processing state forbids this mutation.
    TargetStatusNotSuccess,
    /// The whole project (credential pair) is suspended.
    ProjectInactive,
    /// The image payload is not a decodable raster image.
    BadImage,
    /// The image payload exceeds the configured ceiling.
    ImageTooLarge,
    /// The application metadata exceeds the configured ceiling.
    MetadataTooLarge,
}

impl ResultCode {
    /// The wire spelling, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::TargetCreated => "TargetCreated",
            Self::AuthenticationFailure => "AuthenticationFailure",
            Self::Fail => "Fail",
            Self::UnknownTarget => "UnknownTarget",
            Self::TargetNameExist => "TargetNameExist",
            Self::TargetStatusNotSuccess => "TargetStatusNotSuccess",
            Self::ProjectInactive => "ProjectInactive",
            Self::BadImage => "BadImage",
            Self::ImageTooLarge => "ImageTooLarge",
            Self::MetadataTooLarge => "MetadataTooLarge",
        }
    }
}
