//! Argus Core - request-signing primitives and wire types
//!
//! This crate provides the pieces shared between the Argus client and the
//! service simulator:
//!
//! - HMAC request signing and verification (the `Authorization` header scheme)
//! - The fixed RFC-1123 date format required by the signing scheme
//! - Result codes and the JSON response envelopes
//!
//! # Example
//!
//! ```
//! use argus_core::auth::{authorization_header, verify};
//! use argus_core::clock::{rfc_1123_date, Clock, SystemClock};
//!
//! let date = rfc_1123_date(SystemClock.now());
//! let header = authorization_header(
//!     "my-access-key",
//!     b"my-secret-key",
//!     "GET",
//!     b"",
//!     "",
//!     &date,
//!     "/targets",
//! );
//!
//! let access_key = verify(
//!     &header,
//!     |ak| (ak == "my-access-key").then(|| b"my-secret-key".to_vec()),
//!     "GET",
//!     b"",
//!     "",
//!     &date,
//!     "/targets",
//! )
//! .unwrap();
//! assert_eq!(access_key, "my-access-key");
//! ```

pub mod auth;
pub mod clock;
pub mod codes;
pub mod envelope;
pub mod error;
pub mod target;

// Re-export main types for convenience
pub use auth::{authorization_header, sign, verify, AUTH_SCHEME};
pub use clock::{parse_rfc_1123_date, rfc_1123_date, Clock, FixedClock, SystemClock};
pub use codes::ResultCode;
pub use envelope::{
    AddTargetResponse, BasicResponse, GetTargetResponse, ListTargetsResponse, TargetRecord,
};
pub use error::AuthError;
pub use target::TargetStatus;
