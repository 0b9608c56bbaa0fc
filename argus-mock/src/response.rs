//! Success half of the response composer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use argus_core::{
    AddTargetResponse, BasicResponse, GetTargetResponse, ListTargetsResponse, ResultCode,
    TargetRecord,
};

use crate::store::StoredTarget;

/// Fresh transaction id for one response envelope.
pub fn new_transaction_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// 201 `TargetCreated` with the new target id.
pub fn created(target_id: String) -> Response {
    let body = AddTargetResponse {
        result_code: ResultCode::TargetCreated,
        transaction_id: new_transaction_id(),
        target_id,
    };
    (StatusCode::CREATED, Json(body)).into_response()
}

/// 200 `Success` carrying the target record with its status spelled out.
pub fn target_read(target: &StoredTarget) -> Response {
    let body = GetTargetResponse {
        result_code: ResultCode::Success,
        transaction_id: new_transaction_id(),
        target_record: TargetRecord {
            target_id: target.target_id.clone(),
            active_flag: target.active_flag,
            name: target.name.clone(),
            width: target.width,
            tracking_rating: target.tracking_rating,
        },
        status: target.status,
    };
    Json(body).into_response()
}

/// 200 `Success` with the owner's target ids in insertion order.
pub fn target_list(target_ids: Vec<String>) -> Response {
    let body = ListTargetsResponse {
        result_code: ResultCode::Success,
        transaction_id: new_transaction_id(),
        results: target_ids,
    };
    Json(body).into_response()
}

/// 200 `Success` with the bare envelope (update, delete).
pub fn success() -> Response {
    let body = BasicResponse {
        result_code: ResultCode::Success,
        transaction_id: new_transaction_id(),
    };
    Json(body).into_response()
}
