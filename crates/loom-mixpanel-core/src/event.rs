// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event payloads for the `/track/` endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::properties::Properties;
use crate::token::WriteToken;

/// Property keys the library fills in itself.
pub mod keys {
	pub const TOKEN: &str = "token";
	pub const DISTINCT_ID: &str = "distinct_id";
	pub const TIME: &str = "time";
	pub const IP: &str = "ip";
}

/// A single event to track.
///
/// Only the name is required. Every other field is optional and omitted
/// from the payload when unset.
///
/// # Example
///
/// ```
/// use loom_mixpanel_core::{Properties, TrackEvent};
///
/// let event = TrackEvent::new("Signed Up")
///     .distinct_id("user_123")
///     .ip("203.0.113.7")
///     .properties(Properties::new().insert("referrer", "newsletter"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEvent {
	pub name: String,
	pub distinct_id: Option<String>,
	pub time: Option<DateTime<Utc>>,
	pub ip: Option<String>,
	pub properties: Option<Properties>,
}

impl TrackEvent {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			distinct_id: None,
			time: None,
			ip: None,
			properties: None,
		}
	}

	/// Attributes the event to a user.
	pub fn distinct_id(mut self, distinct_id: impl Into<String>) -> Self {
		self.distinct_id = Some(distinct_id.into());
		self
	}

	/// Sets the event time. Sent as whole Unix seconds.
	pub fn time(mut self, time: DateTime<Utc>) -> Self {
		self.time = Some(time);
		self
	}

	/// Sets the origin IP address used for geolocation.
	pub fn ip(mut self, ip: impl Into<String>) -> Self {
		self.ip = Some(ip.into());
		self
	}

	/// Sets extra properties. These are merged last and replace any
	/// library-computed key of the same name (`token`, `distinct_id`,
	/// `time`, `ip`).
	pub fn properties(mut self, properties: Properties) -> Self {
		self.properties = Some(properties);
		self
	}

	/// Builds the wire payload for `token`.
	pub fn into_request(self, token: &WriteToken) -> TrackRequest {
		let mut base = Properties::new().insert(keys::TOKEN, token.expose());
		if let Some(distinct_id) = self.distinct_id {
			base = base.insert(keys::DISTINCT_ID, distinct_id);
		}
		if let Some(time) = self.time {
			base = base.insert(keys::TIME, time.timestamp());
		}
		if let Some(ip) = self.ip {
			base = base.insert(keys::IP, ip);
		}

		let properties = match self.properties {
			Some(extra) => base.merge(extra),
			None => base,
		};

		TrackRequest {
			event: self.name,
			properties,
		}
	}
}

/// Body of a `/track/` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRequest {
	pub event: String,
	pub properties: Properties,
}
