// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Timestamp formatting for profile properties.

use chrono::{DateTime, TimeZone, Utc};

/// Profile timestamp layout, e.g. `2024-03-01T09:30:00`.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Formats `time` in its own offset without a zone suffix.
///
/// Mixpanel interprets these values as UTC, so callers should normally pass
/// a `DateTime<Utc>`.
pub fn format_time<Tz>(time: &DateTime<Tz>) -> String
where
	Tz: TimeZone,
	Tz::Offset: std::fmt::Display,
{
	time.format(TIME_FORMAT).to_string()
}

/// The current UTC time, formatted with [`format_time`].
pub fn current_time_string() -> String {
	format_time(&Utc::now())
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{FixedOffset, NaiveDateTime};

	#[test]
	fn test_format_utc() {
		let time = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
		assert_eq!(format_time(&time), "2024-03-01T09:05:07");
	}

	#[test]
	fn test_format_keeps_local_offset() {
		let offset = FixedOffset::east_opt(2 * 3600).unwrap();
		let time = offset.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
		assert_eq!(format_time(&time), "2024-12-31T23:59:59");
	}

	#[test]
	fn test_current_time_string_parses_back() {
		let before = Utc::now().timestamp();
		let formatted = current_time_string();
		let after = Utc::now().timestamp();

		let parsed = NaiveDateTime::parse_from_str(&formatted, TIME_FORMAT)
			.unwrap()
			.and_utc()
			.timestamp();
		assert!(parsed >= before && parsed <= after);
	}
}
