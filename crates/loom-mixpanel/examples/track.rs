// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: Track an event and update a profile with the loom-mixpanel SDK.
//!
//! Run with:
//!   MIXPANEL_TOKEN=... RUST_LOG=loom_mixpanel=debug cargo run --example track -p loom-mixpanel

use chrono::Utc;
use loom_mixpanel::{MixpanelClient, Properties};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let distinct_id =
		std::env::var("MIXPANEL_DISTINCT_ID").unwrap_or_else(|_| "example-user-0001".to_string());

	let client = MixpanelClient::from_default_env()?;
	if client.token().is_empty() {
		println!("MIXPANEL_TOKEN is not set; requests will be rejected");
	}

	println!("Tracking event for {distinct_id}...");
	client
		.track_for_user_with_properties(
			"Example Run",
			&distinct_id,
			Properties::new()
				.insert("sdk", "loom-mixpanel")
				.insert("attempt", 1),
		)
		.await?;

	println!("Updating profile...");
	client
		.profile_set(
			&distinct_id,
			Properties::new()
				.insert("$name", distinct_id.as_str())
				.insert("last_example_run", loom_mixpanel::current_time_string()),
		)
		.await?;
	client.profile_increment(&distinct_id, "example_runs").await?;
	client
		.profile_add_revenue_transaction(&distinct_id, &Utc::now(), "EXAMPLE", 0.0)
		.await?;

	println!("Done");
	Ok(())
}
