//! Simulator configuration.
//!
//! All tunables live on an explicit config object handed to the simulator at
//! construction, so several independent simulators can coexist in one test
//! process. The binary loads overrides from environment variables.

use std::sync::Arc;
use std::time::Duration;

use argus_core::{Clock, SystemClock};

use crate::lifecycle::{AlwaysSucceed, OutcomePolicy, RandomOutcome};

/// Configuration for one simulator instance.
#[derive(Clone)]
pub struct SimulatorConfig {
    /// Whether the simulated project accepts requests at all. When false,
    /// every authenticated operation fails with `ProjectInactive`.
    pub active: bool,
    /// How long a target stays in `processing` before an outcome is decided.
    pub processing_delay: Duration,
    /// Decides `success` vs `failed` once the delay has elapsed.
    pub outcome_policy: Arc<dyn OutcomePolicy>,
    /// Wall clock; swap in a `FixedClock` for deterministic tests.
    pub clock: Arc<dyn Clock>,
    /// Accepted `Date` header drift, either side of now (default 5 minutes).
    pub date_skew_tolerance: Duration,
    /// Ceiling for a decoded image payload (default 2 MiB); above it the
    /// request fails with `ImageTooLarge`.
    pub max_image_bytes: usize,
    /// Ceiling for decoded application metadata (default 1 MiB); above it the
    /// request fails with `MetadataTooLarge`.
    pub max_metadata_bytes: usize,
    /// Maximum target name length in characters (default 64).
    pub max_name_len: usize,
    /// Transport-level request body ceiling (default 4 MiB). Oversized bodies
    /// are cut off by the body-limit layer with a bare 413, before any
    /// envelope can be composed.
    pub request_body_limit: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            active: true,
            processing_delay: Duration::from_millis(500),
            outcome_policy: Arc::new(AlwaysSucceed),
            clock: Arc::new(SystemClock),
            date_skew_tolerance: Duration::from_secs(5 * 60),
            max_image_bytes: 2 * 1024 * 1024,
            max_metadata_bytes: 1024 * 1024,
            max_name_len: 64,
            request_body_limit: 4 * 1024 * 1024,
        }
    }
}

impl std::fmt::Debug for SimulatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatorConfig")
            .field("active", &self.active)
            .field("processing_delay", &self.processing_delay)
            .field("date_skew_tolerance", &self.date_skew_tolerance)
            .field("max_image_bytes", &self.max_image_bytes)
            .field("max_metadata_bytes", &self.max_metadata_bytes)
            .field("max_name_len", &self.max_name_len)
            .field("request_body_limit", &self.request_body_limit)
            .finish_non_exhaustive()
    }
}

impl SimulatorConfig {
    /// Load overrides from environment variables on top of the defaults.
    ///
    /// Recognized: `ARGUS_MOCK_INACTIVE`, `ARGUS_MOCK_PROCESSING_DELAY_MS`,
    /// `ARGUS_MOCK_FAILURE_RATE`, `ARGUS_MOCK_DATE_SKEW_SECS`,
    /// `ARGUS_MOCK_MAX_IMAGE_BYTES`, `ARGUS_MOCK_MAX_METADATA_BYTES`,
    /// `ARGUS_MOCK_MAX_NAME_LEN`, `ARGUS_MOCK_BODY_LIMIT`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("ARGUS_MOCK_INACTIVE") {
            config.active = v.to_lowercase() != "true";
        }
        if let Some(ms) = env_parse::<u64>("ARGUS_MOCK_PROCESSING_DELAY_MS") {
            config.processing_delay = Duration::from_millis(ms);
        }
        // A failure rate switches the outcome policy to the randomized one.
        if let Some(rate) = env_parse::<f64>("ARGUS_MOCK_FAILURE_RATE") {
            config.outcome_policy = Arc::new(RandomOutcome {
                failure_rate: rate.clamp(0.0, 1.0),
            });
        }
        if let Some(secs) = env_parse::<u64>("ARGUS_MOCK_DATE_SKEW_SECS") {
            config.date_skew_tolerance = Duration::from_secs(secs);
        }
        if let Some(v) = env_parse::<usize>("ARGUS_MOCK_MAX_IMAGE_BYTES") {
            config.max_image_bytes = v;
        }
        if let Some(v) = env_parse::<usize>("ARGUS_MOCK_MAX_METADATA_BYTES") {
            config.max_metadata_bytes = v;
        }
        if let Some(v) = env_parse::<usize>("ARGUS_MOCK_MAX_NAME_LEN") {
            config.max_name_len = v;
        }
        if let Some(v) = env_parse::<usize>("ARGUS_MOCK_BODY_LIMIT") {
            config.request_body_limit = v;
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
