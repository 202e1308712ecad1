// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project write token.

use serde::{Serialize, Serializer};
use zeroize::Zeroize;

/// Placeholder printed instead of the token value.
pub const REDACTED: &str = "[REDACTED]";

/// A Mixpanel project token, sent with every ingestion request.
///
/// The token is not validated: an empty token is accepted and simply yields
/// requests the service rejects. `Debug` and `Display` never print the
/// value, and the buffer is zeroed on drop.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct WriteToken(String);

impl WriteToken {
	pub fn new(token: impl Into<String>) -> Self {
		Self(token.into())
	}

	/// Returns the raw token value.
	pub fn expose(&self) -> &str {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<String> for WriteToken {
	fn from(token: String) -> Self {
		Self(token)
	}
}

impl From<&str> for WriteToken {
	fn from(token: &str) -> Self {
		Self(token.to_string())
	}
}

impl std::fmt::Debug for WriteToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("WriteToken").field(&REDACTED).finish()
	}
}

impl std::fmt::Display for WriteToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(REDACTED)
	}
}

/// Serializes the raw value; the wire format requires it.
impl Serialize for WriteToken {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.0)
	}
}

impl Drop for WriteToken {
	fn drop(&mut self) {
		self.0.zeroize();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_debug_is_redacted() {
		let token = WriteToken::new("super-secret");
		let debug = format!("{token:?}");
		assert!(!debug.contains("super-secret"));
		assert!(debug.contains(REDACTED));
	}

	#[test]
	fn test_display_is_redacted() {
		let token = WriteToken::new("super-secret");
		assert_eq!(token.to_string(), REDACTED);
	}

	#[test]
	fn test_expose_returns_raw_value() {
		let token = WriteToken::from("abc");
		assert_eq!(token.expose(), "abc");
	}

	#[test]
	fn test_empty_token_is_allowed() {
		let token = WriteToken::default();
		assert!(token.is_empty());
		assert_eq!(serde_json::to_string(&token).unwrap(), r#""""#);
	}

	#[test]
	fn test_serializes_raw_value() {
		let token = WriteToken::new("ABC");
		assert_eq!(serde_json::to_string(&token).unwrap(), r#""ABC""#);
	}
}
