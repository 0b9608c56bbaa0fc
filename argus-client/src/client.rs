//! The async API client.
//!
//! Every request is signed over exactly what is sent: method, raw body
//! bytes, content type, a freshly rendered RFC-1123 date and the path. The
//! client mirrors only the signer; all lifecycle behavior lives server-side
//! and is observed by polling.

use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Method, StatusCode};
use serde_json::json;

use argus_core::{
    authorization_header, rfc_1123_date, AddTargetResponse, BasicResponse, GetTargetResponse,
    Clock, ListTargetsResponse, ResultCode, SystemClock, TargetStatus,
};

use crate::error::ClientError;

/// Default production endpoint; override with [`Client::with_base_url`] to
/// point at a simulator.
pub const DEFAULT_BASE_URL: &str = "https://reco.argusapi.com";

/// Fields for a create request. `active_flag` defaults to true server-side.
#[derive(Debug, Clone)]
pub struct AddTarget {
    name: String,
    width: f64,
    image: Vec<u8>,
    active_flag: Option<bool>,
    application_metadata: Option<Vec<u8>>,
}

impl AddTarget {
    pub fn new(name: impl Into<String>, width: f64, image: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            width,
            image: image.into(),
            active_flag: None,
            application_metadata: None,
        }
    }

    pub fn active_flag(mut self, active: bool) -> Self {
        self.active_flag = Some(active);
        self
    }

    pub fn application_metadata(mut self, metadata: impl Into<Vec<u8>>) -> Self {
        self.application_metadata = Some(metadata.into());
        self
    }

    fn into_body(self) -> Vec<u8> {
        let mut body = json!({
            "name": self.name,
            "width": self.width,
            "image": BASE64.encode(&self.image),
        });
        if let Some(active) = self.active_flag {
            body["active_flag"] = json!(active);
        }
        if let Some(metadata) = &self.application_metadata {
            body["application_metadata"] = json!(BASE64.encode(metadata));
        }
        serde_json::to_vec(&body).unwrap_or_default()
    }
}

/// A partial update. Absent fields are left alone; an image or width change
/// sends the target back into processing.
#[derive(Debug, Clone, Default)]
pub struct TargetUpdate {
    name: Option<String>,
    width: Option<f64>,
    image: Option<Vec<u8>>,
    active_flag: Option<bool>,
    application_metadata: Option<Vec<u8>>,
}

impl TargetUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn image(mut self, image: impl Into<Vec<u8>>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn active_flag(mut self, active: bool) -> Self {
        self.active_flag = Some(active);
        self
    }

    pub fn application_metadata(mut self, metadata: impl Into<Vec<u8>>) -> Self {
        self.application_metadata = Some(metadata.into());
        self
    }

    fn into_body(self) -> Vec<u8> {
        let mut body = json!({});
        if let Some(name) = self.name {
            body["name"] = json!(name);
        }
        if let Some(width) = self.width {
            body["width"] = json!(width);
        }
        if let Some(image) = &self.image {
            body["image"] = json!(BASE64.encode(image));
        }
        if let Some(active) = self.active_flag {
            body["active_flag"] = json!(active);
        }
        if let Some(metadata) = &self.application_metadata {
            body["application_metadata"] = json!(BASE64.encode(metadata));
        }
        serde_json::to_vec(&body).unwrap_or_default()
    }
}

/// Client for one credential pair.
pub struct Client {
    base_url: String,
    access_key: String,
    secret_key: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Point the client at a different endpoint (e.g. a local simulator).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Create a target. Returns the new target id; the target starts in
    /// `processing`.
    pub async fn add_target(&self, target: AddTarget) -> Result<String, ClientError> {
        let body = target.into_body();
        let response: AddTargetResponse = self
            .execute(
                Method::POST,
                "/targets",
                body,
                StatusCode::CREATED,
                ResultCode::TargetCreated,
            )
            .await?;
        Ok(response.target_id)
    }

    /// Read one target's record and processing status.
    pub async fn get_target(&self, target_id: &str) -> Result<GetTargetResponse, ClientError> {
        self.execute(
            Method::GET,
            &format!("/targets/{target_id}"),
            Vec::new(),
            StatusCode::OK,
            ResultCode::Success,
        )
        .await
    }

    /// List this credential pair's target ids.
    pub async fn list_targets(&self) -> Result<Vec<String>, ClientError> {
        let response: ListTargetsResponse = self
            .execute(
                Method::GET,
                "/targets",
                Vec::new(),
                StatusCode::OK,
                ResultCode::Success,
            )
            .await?;
        Ok(response.results)
    }

    /// Apply a partial update to a target.
    pub async fn update_target(
        &self,
        target_id: &str,
        update: TargetUpdate,
    ) -> Result<(), ClientError> {
        let body = update.into_body();
        let _: BasicResponse = self
            .execute(
                Method::PUT,
                &format!("/targets/{target_id}"),
                body,
                StatusCode::OK,
                ResultCode::Success,
            )
            .await?;
        Ok(())
    }

    /// Delete a target. Its id is never reused; its name becomes free again.
    pub async fn delete_target(&self, target_id: &str) -> Result<(), ClientError> {
        let _: BasicResponse = self
            .execute(
                Method::DELETE,
                &format!("/targets/{target_id}"),
                Vec::new(),
                StatusCode::OK,
                ResultCode::Success,
            )
            .await?;
        Ok(())
    }

    /// Poll until the target leaves `processing` or the deadline passes.
    ///
    /// The waiting happens entirely client-side; the server always answers
    /// immediately. Dropping the returned future cancels the wait.
    pub async fn wait_for_target_processed(
        &self,
        target_id: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<TargetStatus, ClientError> {
        let deadline = Instant::now() + timeout;
        loop {
            let response = self.get_target(target_id).await?;
            if response.status.is_terminal() {
                return Ok(response.status);
            }
            if Instant::now() >= deadline {
                return Err(ClientError::ProcessingTimeout {
                    target_id: target_id.to_string(),
                });
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Vec<u8>,
        expected_status: StatusCode,
        expected_code: ResultCode,
    ) -> Result<T, ClientError> {
        let date = rfc_1123_date(SystemClock.now());
        let content_type = if body.is_empty() { "" } else { "application/json" };
        let authorization = authorization_header(
            &self.access_key,
            self.secret_key.as_bytes(),
            method.as_str(),
            &body,
            content_type,
            &date,
            path,
        );

        let mut request = self
            .http
            .request(method.clone(), format!("{}{}", self.base_url, path))
            .header("Authorization", authorization)
            .header("Date", &date);
        if !content_type.is_empty() {
            request = request.header("Content-Type", content_type);
        }

        let response = request.body(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        tracing::debug!(%method, path, status = status.as_u16(), "Request completed");

        if status == expected_status {
            if let Ok(parsed) = serde_json::from_slice::<T>(&bytes) {
                return Ok(parsed);
            }
        }

        match serde_json::from_slice::<BasicResponse>(&bytes) {
            Ok(envelope) if envelope.result_code == expected_code => {
                // Right code on the wrong status; the body did not parse as
                // the expected success type.
                Err(ClientError::UnexpectedResponse {
                    status,
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                })
            }
            Ok(envelope) => Err(ClientError::from_failure(
                status,
                envelope.result_code,
                envelope.transaction_id,
            )),
            // No envelope at all. Oversized uploads are cut off before the
            // server can compose one.
            Err(_) if status == StatusCode::PAYLOAD_TOO_LARGE => {
                Err(ClientError::PayloadTooLarge { status })
            }
            Err(_) => Err(ClientError::UnexpectedResponse {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            }),
        }
    }
}
