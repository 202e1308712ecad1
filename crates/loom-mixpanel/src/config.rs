// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Token loading from the environment.

use std::path::PathBuf;

use loom_mixpanel_core::WriteToken;
use tracing::debug;

use crate::error::{MixpanelError, Result};

/// Environment variable read by [`MixpanelClient::from_default_env`](crate::MixpanelClient::from_default_env).
pub const DEFAULT_TOKEN_ENV: &str = "MIXPANEL_TOKEN";

/// Loads a write token from the environment.
///
/// Resolution order:
/// 1. `{name}` if set
/// 2. the contents of the file named by `{name}_FILE`, with surrounding
///    whitespace trimmed
/// 3. an empty token
///
/// A missing variable is not an error: the client is still constructed and
/// the service rejects its requests. Only an unreadable `{name}_FILE` fails.
pub fn load_token_env(name: &str) -> Result<WriteToken> {
	if let Ok(value) = std::env::var(name) {
		debug!(env = %name, "Loaded Mixpanel token from environment");
		return Ok(WriteToken::new(value));
	}

	let file_var = format!("{name}_FILE");
	if let Ok(path) = std::env::var(&file_var) {
		let path = PathBuf::from(path);
		let contents =
			std::fs::read_to_string(&path).map_err(|source| MixpanelError::TokenFile {
				path: path.clone(),
				source,
			})?;
		debug!(env = %file_var, path = %path.display(), "Loaded Mixpanel token from file");
		return Ok(WriteToken::new(contents.trim()));
	}

	debug!(env = %name, "Mixpanel token not set, using empty token");
	Ok(WriteToken::default())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_reads_plain_variable() {
		std::env::set_var("LOOM_MIXPANEL_TEST_PLAIN", "abc123");
		let token = load_token_env("LOOM_MIXPANEL_TEST_PLAIN").unwrap();
		assert_eq!(token.expose(), "abc123");
	}

	#[test]
	fn test_missing_variable_gives_empty_token() {
		let token = load_token_env("LOOM_MIXPANEL_TEST_DEFINITELY_UNSET").unwrap();
		assert!(token.is_empty());
	}

	#[test]
	fn test_reads_file_variable() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "  from-file-token  ").unwrap();
		std::env::set_var("LOOM_MIXPANEL_TEST_VIA_FILE_FILE", file.path());

		let token = load_token_env("LOOM_MIXPANEL_TEST_VIA_FILE").unwrap();
		assert_eq!(token.expose(), "from-file-token");
	}

	#[test]
	fn test_plain_variable_wins_over_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "file-token").unwrap();
		std::env::set_var("LOOM_MIXPANEL_TEST_BOTH", "env-token");
		std::env::set_var("LOOM_MIXPANEL_TEST_BOTH_FILE", file.path());

		let token = load_token_env("LOOM_MIXPANEL_TEST_BOTH").unwrap();
		assert_eq!(token.expose(), "env-token");
	}

	#[test]
	fn test_unreadable_file_is_error() {
		std::env::set_var(
			"LOOM_MIXPANEL_TEST_BAD_FILE_FILE",
			"/nonexistent/loom-mixpanel/token",
		);
		let result = load_token_env("LOOM_MIXPANEL_TEST_BAD_FILE");
		assert!(matches!(result, Err(MixpanelError::TokenFile { .. })));
	}
}
