//! Argus Mock - in-memory simulator of the Argus recognition API
//!
//! A test double for the cloud target-management service: signed-request
//! verification, the full validation pipeline, and an in-memory target store
//! whose records move through `processing` to `success`/`failed` on a
//! configurable delay and policy.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use argus_mock::{mock_router, Simulator, SimulatorConfig};
//!
//! let simulator = Arc::new(Simulator::new(SimulatorConfig::default()));
//! let account = simulator.register_random_account();
//! let app = mock_router(simulator);
//! // Serve `app` or drive it directly with tower::ServiceExt::oneshot.
//! # let _ = (app, account);
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;
pub mod validation;

pub use config::SimulatorConfig;
pub use error::SimulatorError;
pub use lifecycle::{AlwaysSucceed, OutcomePolicy, ProcessingOutcome, RandomOutcome};
pub use routes::mock_router;
pub use state::{Account, AppState, Simulator};
pub use store::{NewTarget, StoredTarget, TargetPatch, TargetStore};
