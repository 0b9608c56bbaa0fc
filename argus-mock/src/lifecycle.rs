//! Lifecycle engine: moves targets out of `processing` and decides outcomes.
//!
//! Advancement is lazy. Every store access first calls [`advance_if_due`] on
//! the records it touches, inside the store lock, so a read always observes
//! either the pre- or post-transition record and never a partial one.

use chrono::{DateTime, Utc};
use rand::Rng;

use argus_core::TargetStatus;

use crate::store::StoredTarget;

/// What the engine decided for a target that finished processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingOutcome {
    Success { tracking_rating: i32 },
    Failure,
}

/// Pluggable stand-in for the service's proprietary image-quality heuristic.
///
/// Conformance tests need both a deterministic mode and a randomized one, so
/// the policy is injected through [`crate::config::SimulatorConfig`] rather
/// than hard-coded.
pub trait OutcomePolicy: Send + Sync {
    fn decide(&self, target: &StoredTarget) -> ProcessingOutcome;
}

/// Every target processes successfully, with a fixed top rating.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysSucceed;

impl OutcomePolicy for AlwaysSucceed {
    fn decide(&self, _target: &StoredTarget) -> ProcessingOutcome {
        ProcessingOutcome::Success { tracking_rating: 5 }
    }
}

/// Fails targets with the given probability; successes get a random rating.
#[derive(Debug, Clone, Copy)]
pub struct RandomOutcome {
    pub failure_rate: f64,
}

impl OutcomePolicy for RandomOutcome {
    fn decide(&self, _target: &StoredTarget) -> ProcessingOutcome {
        let mut rng = rand::thread_rng();
        if rng.gen_bool(self.failure_rate.clamp(0.0, 1.0)) {
            ProcessingOutcome::Failure
        } else {
            ProcessingOutcome::Success {
                tracking_rating: rng.gen_range(0..=5),
            }
        }
    }
}

/// Apply the pending transition if the target's processing deadline passed.
///
/// No-op for targets already in a terminal state.
pub fn advance_if_due(target: &mut StoredTarget, now: DateTime<Utc>, policy: &dyn OutcomePolicy) {
    if target.status != TargetStatus::Processing || now < target.processing_deadline {
        return;
    }

    match policy.decide(target) {
        ProcessingOutcome::Success { tracking_rating } => {
            target.status = TargetStatus::Success;
            target.tracking_rating = Some(tracking_rating);
        }
        ProcessingOutcome::Failure => {
            target.status = TargetStatus::Failed;
            target.tracking_rating = None;
        }
    }

    tracing::debug!(
        target_id = %target.target_id,
        status = ?target.status,
        "Target finished processing"
    );
}
