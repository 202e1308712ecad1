// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mixpanel ingestion client for Rust.
//!
//! Sends events to `/track/` and profile updates to `/engage/`. Each call is
//! one stateless `GET <endpoint>?data=<base64 JSON>` round trip; the service
//! answers `1` on success and anything else on failure.
//!
//! Nothing is batched or retried. Callers own their retry policy.
//!
//! # Example
//!
//! ```ignore
//! use loom_mixpanel::{MixpanelClient, Properties};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MixpanelClient::from_env("MIXPANEL_TOKEN")?;
//!
//!     client.track_for_user("Login", "user_123").await?;
//!
//!     client
//!         .profile_set("user_123", Properties::new().insert("plan", "pro"))
//!         .await?;
//!     client.profile_increment("user_123", "logins").await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;

pub use client::{
	MixpanelClient, MixpanelClientBuilder, DEFAULT_API_HOST, ENGAGE_PATH, TRACK_PATH,
};
pub use config::{load_token_env, DEFAULT_TOKEN_ENV};
pub use error::{MixpanelError, Result};

// Re-export core types for convenience
pub use loom_mixpanel_core::{
	current_time_string, format_time, EngageRequest, ProfileOperation, Properties, TrackEvent,
	TrackRequest, Transaction, WriteToken,
};
