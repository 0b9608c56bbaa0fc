use thiserror::Error;

/// Reasons a signed request can fail verification.
///
/// The variants are distinct so callers can log the real cause, but the
/// simulator surfaces all of them as the same generic authentication failure
/// on the wire.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("malformed Authorization header")]
    MalformedHeader,

    #[error("unknown access key")]
    UnknownAccessKey,

    #[error("signature mismatch")]
    SignatureMismatch,

    #[error("missing or unparsable Date header")]
    BadDate,

    #[error("request date outside the allowed skew window")]
    SkewedDate,
}
