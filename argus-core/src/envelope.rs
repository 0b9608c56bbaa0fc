//! JSON response envelopes.
//!
//! Every response body carries a result code plus a transaction id; success
//! bodies add the requested resource fields. The simulator serializes these
//! and the client deserializes them, so both sides share one set of types.

use serde::{Deserialize, Serialize};

use crate::codes::ResultCode;
use crate::target::TargetStatus;

/// The minimal envelope: all error responses and the update/delete successes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicResponse {
    pub result_code: ResultCode,
    pub transaction_id: String,
}

/// Response to a successful create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTargetResponse {
    pub result_code: ResultCode,
    pub transaction_id: String,
    pub target_id: String,
}

/// The stored target fields echoed back on a read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetRecord {
    pub target_id: String,
    pub active_flag: bool,
    pub name: String,
    pub width: f64,
    /// Unset while the target is still processing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_rating: Option<i32>,
}

/// Response to a successful read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTargetResponse {
    pub result_code: ResultCode,
    pub transaction_id: String,
    pub target_record: TargetRecord,
    pub status: TargetStatus,
}

/// Response to a successful list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTargetsResponse {
    pub result_code: ResultCode,
    pub transaction_id: String,
    pub results: Vec<String>,
}
