// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP client construction with a consistent User-Agent header.

use reqwest::{Client, ClientBuilder};

/// Returns the `{os}-{arch}` platform string, e.g. `linux-x86_64`.
pub fn platform() -> String {
	format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
}

/// Returns the User-Agent for an SDK.
///
/// Format: `{sdk_name}/{sdk_version} ({platform})`
/// Example: `loom-mixpanel/0.1.0 (linux-x86_64)`
pub fn user_agent(sdk_name: &str, sdk_version: &str) -> String {
	format!("{sdk_name}/{sdk_version} ({})", platform())
}

/// Creates a client builder with the SDK's User-Agent.
///
/// Use this when you need to customize the client further.
///
/// # Example
/// ```ignore
/// let client = loom_common_http::builder("loom-mixpanel", "0.1.0")
///     .pool_idle_timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub fn builder(sdk_name: &str, sdk_version: &str) -> ClientBuilder {
	Client::builder().user_agent(user_agent(sdk_name, sdk_version))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn user_agent_has_correct_format() {
		let ua = user_agent("loom-mixpanel", "1.2.3");
		assert!(ua.starts_with("loom-mixpanel/1.2.3 ("));
		assert!(ua.ends_with(')'));
		assert!(ua.contains(std::env::consts::OS));
	}

	#[test]
	fn platform_is_os_and_arch() {
		let platform = platform();
		let parts: Vec<&str> = platform.splitn(2, '-').collect();
		assert_eq!(parts.len(), 2);
		assert_eq!(parts[0], std::env::consts::OS);
	}

	#[test]
	fn builder_produces_client() {
		assert!(builder("loom-mixpanel", "0.1.0").build().is_ok());
	}
}
