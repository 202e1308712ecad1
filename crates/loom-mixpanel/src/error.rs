// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the Mixpanel client.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Mixpanel operations.
pub type Result<T> = std::result::Result<T, MixpanelError>;

/// Errors returned by the Mixpanel client.
#[derive(Debug, Error)]
pub enum MixpanelError {
	/// The payload could not be encoded as JSON, for example a property
	/// holding NaN or an infinity.
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// The endpoint could not be reached (connect, timeout, TLS).
	#[error("HTTP request failed: {0}")]
	Transport(#[source] reqwest::Error),

	/// The connection succeeded but the response body could not be read.
	#[error("failed to read response body: {0}")]
	ResponseRead(#[source] reqwest::Error),

	/// The service answered with something other than `1`.
	#[error("request rejected by Mixpanel (body: {body:?})")]
	RejectedByService {
		/// Raw response body.
		body: String,
	},

	/// An argument was outside its allowed range.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// The configured API host is not a valid base URL.
	#[error("invalid API host: {0}")]
	InvalidEndpoint(String),

	/// A `*_FILE` token path could not be read.
	#[error("failed to read token file {}: {source}", .path.display())]
	TokenFile {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The HTTP transport could not be constructed.
	#[error("failed to build HTTP client: {0}")]
	HttpClient(#[source] reqwest::Error),
}

impl MixpanelError {
	/// Returns true when the request reached the service and was refused.
	pub fn is_rejected(&self) -> bool {
		matches!(self, MixpanelError::RejectedByService { .. })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_rejected_display_includes_body() {
		let err = MixpanelError::RejectedByService {
			body: "0".to_string(),
		};
		assert_eq!(err.to_string(), r#"request rejected by Mixpanel (body: "0")"#);
		assert!(err.is_rejected());
	}

	#[test]
	fn test_invalid_argument_not_rejected() {
		let err = MixpanelError::InvalidArgument("value must be greater than zero".to_string());
		assert!(!err.is_rejected());
		assert!(err.to_string().contains("greater than zero"));
	}

	#[test]
	fn test_serialization_error_converts() {
		let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
		let err: MixpanelError = json_err.into();
		assert!(matches!(err, MixpanelError::Serialization(_)));
	}

	#[test]
	fn test_token_file_display_includes_path() {
		let err = MixpanelError::TokenFile {
			path: PathBuf::from("/run/secrets/mixpanel"),
			source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
		};
		assert!(err.to_string().contains("/run/secrets/mixpanel"));
	}
}
