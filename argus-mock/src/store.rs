//! In-memory target store, one per credential pair.
//!
//! A single `tokio::sync::Mutex` serializes all operations on an account's
//! targets. Target counts are small and nothing here is performance-critical;
//! the lock keeps the name-uniqueness check atomic with the insert and lets
//! lazy lifecycle advancement happen inside the same critical section as the
//! read that triggered it.

use chrono::{DateTime, Utc};
use sha3::{Digest, Sha3_256};
use tokio::sync::Mutex;

use argus_core::TargetStatus;

use crate::config::SimulatorConfig;
use crate::error::SimulatorError;
use crate::lifecycle::advance_if_due;

/// One target record as the simulator keeps it.
///
/// The uploaded image bytes are not retained; only a fingerprint survives,
/// for decodability/size checks having already passed.
#[derive(Debug, Clone)]
pub struct StoredTarget {
    pub target_id: String,
    pub name: String,
    pub width: f64,
    pub image_fingerprint: String,
    pub active_flag: bool,
    pub application_metadata: Option<Vec<u8>>,
    pub status: TargetStatus,
    pub tracking_rating: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// When the lifecycle engine may move this record out of `processing`.
    pub processing_deadline: DateTime<Utc>,
}

/// Fields for a validated create request.
#[derive(Debug)]
pub struct NewTarget {
    pub name: String,
    pub width: f64,
    pub image: Vec<u8>,
    pub active_flag: bool,
    pub application_metadata: Option<Vec<u8>>,
}

/// A validated partial update. `application_metadata` distinguishes "leave
/// alone" (outer `None`) from "clear" (`Some(None)`).
#[derive(Debug, Default)]
pub struct TargetPatch {
    pub name: Option<String>,
    pub width: Option<f64>,
    pub image: Option<Vec<u8>>,
    pub active_flag: Option<bool>,
    pub application_metadata: Option<Option<Vec<u8>>>,
}

/// The keyed collection of targets owned by one credential pair.
#[derive(Debug, Default)]
pub struct TargetStore {
    // Vec keeps insertion order for reproducible list responses.
    targets: Mutex<Vec<StoredTarget>>,
}

fn fingerprint(image: &[u8]) -> String {
    hex::encode(Sha3_256::digest(image))
}

fn new_target_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

impl TargetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record in `processing` state.
    ///
    /// The name-uniqueness check and the insert run under one lock, so two
    /// concurrent creates cannot both claim the same name.
    pub async fn create(
        &self,
        new: NewTarget,
        config: &SimulatorConfig,
    ) -> Result<String, SimulatorError> {
        let mut targets = self.targets.lock().await;

        if targets.iter().any(|t| t.name == new.name) {
            return Err(SimulatorError::TargetNameExist);
        }

        let now = config.clock.now();
        let target_id = new_target_id();
        targets.push(StoredTarget {
            target_id: target_id.clone(),
            name: new.name,
            width: new.width,
            image_fingerprint: fingerprint(&new.image),
            active_flag: new.active_flag,
            application_metadata: new.application_metadata,
            status: TargetStatus::Processing,
            tracking_rating: None,
            created_at: now,
            updated_at: now,
            processing_deadline: now + config.processing_delay,
        });

        tracing::info!(target_id = %target_id, "Target created");
        Ok(target_id)
    }

    /// Read one record, advancing its lifecycle first.
    pub async fn get(
        &self,
        target_id: &str,
        config: &SimulatorConfig,
    ) -> Result<StoredTarget, SimulatorError> {
        let mut targets = self.targets.lock().await;
        let now = config.clock.now();

        let target = targets
            .iter_mut()
            .find(|t| t.target_id == target_id)
            .ok_or(SimulatorError::UnknownTarget)?;

        advance_if_due(target, now, config.outcome_policy.as_ref());
        Ok(target.clone())
    }

    /// All live target ids, in insertion order.
    pub async fn list(&self) -> Vec<String> {
        let targets = self.targets.lock().await;
        targets.iter().map(|t| t.target_id.clone()).collect()
    }

    /// Apply a validated patch, enforcing state gating and name uniqueness.
    ///
    /// The whole read-modify-write runs under the store lock. A patch that
    /// touches recognition data (image or width) puts the record back into
    /// `processing` and clears its tracking rating.
    pub async fn update(
        &self,
        target_id: &str,
        patch: TargetPatch,
        config: &SimulatorConfig,
    ) -> Result<(), SimulatorError> {
        let mut targets = self.targets.lock().await;
        let now = config.clock.now();

        let index = targets
            .iter()
            .position(|t| t.target_id == target_id)
            .ok_or(SimulatorError::UnknownTarget)?;

        if let Some(name) = &patch.name {
            let collides = targets
                .iter()
                .any(|t| t.target_id != target_id && t.name == *name);
            if collides {
                return Err(SimulatorError::TargetNameExist);
            }
        }

        let target = &mut targets[index];
        advance_if_due(target, now, config.outcome_policy.as_ref());

        // Updates are only accepted once processing has produced an outcome.
        if !target.status.is_terminal() {
            return Err(SimulatorError::TargetStatusNotSuccess);
        }

        let reprocess = patch.image.is_some() || patch.width.is_some();

        if let Some(name) = patch.name {
            target.name = name;
        }
        if let Some(width) = patch.width {
            target.width = width;
        }
        if let Some(image) = patch.image {
            target.image_fingerprint = fingerprint(&image);
        }
        if let Some(active_flag) = patch.active_flag {
            target.active_flag = active_flag;
        }
        if let Some(metadata) = patch.application_metadata {
            target.application_metadata = metadata;
        }

        target.updated_at = now;
        if reprocess {
            target.status = TargetStatus::Processing;
            target.tracking_rating = None;
            target.processing_deadline = now + config.processing_delay;
        }

        tracing::info!(target_id = %target_id, reprocess, "Target updated");
        Ok(())
    }

    /// Remove a record. Permitted from any state; the id is never reused and
    /// the name immediately becomes available again.
    pub async fn delete(&self, target_id: &str) -> Result<(), SimulatorError> {
        let mut targets = self.targets.lock().await;

        let index = targets
            .iter()
            .position(|t| t.target_id == target_id)
            .ok_or(SimulatorError::UnknownTarget)?;
        targets.remove(index);

        tracing::info!(target_id = %target_id, "Target deleted");
        Ok(())
    }
}
