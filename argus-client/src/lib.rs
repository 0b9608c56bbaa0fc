//! Argus Client - async client for the Argus recognition API
//!
//! Wraps the five target operations (add, get, list, update, delete) over
//! signed HTTP requests, plus a client-side polling helper for waiting out
//! the service's asynchronous processing step.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use argus_client::{AddTarget, Client};
//!
//! # async fn example(image: Vec<u8>) -> Result<(), argus_client::ClientError> {
//! let client = Client::new("my-access-key", "my-secret-key");
//!
//! let target_id = client.add_target(AddTarget::new("x", 1.0, image)).await?;
//! let status = client
//!     .wait_for_target_processed(&target_id, Duration::from_secs(60), Duration::from_millis(200))
//!     .await?;
//! println!("target {target_id} finished as {status:?}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;

pub use client::{AddTarget, Client, TargetUpdate, DEFAULT_BASE_URL};
pub use error::{ClientError, ServiceFailure};
