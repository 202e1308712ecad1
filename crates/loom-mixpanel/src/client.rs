// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mixpanel client for event tracking and profile updates.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use base64::prelude::*;
use chrono::{DateTime, TimeZone, Utc};
use loom_mixpanel_core::{
	EngageRequest, ProfileOperation, Properties, TrackEvent, Transaction, WriteToken,
};
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::debug;

use crate::config::{load_token_env, DEFAULT_TOKEN_ENV};
use crate::error::{MixpanelError, Result};

/// SDK version for identification.
const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
/// SDK name for identification.
const SDK_NAME: &str = "loom-mixpanel";

/// Default ingestion host.
pub const DEFAULT_API_HOST: &str = "http://api.mixpanel.com";
/// Event tracking endpoint path.
pub const TRACK_PATH: &str = "/track/";
/// Profile update endpoint path.
pub const ENGAGE_PATH: &str = "/engage/";

/// Body returned by the service for an accepted request.
const SUCCESS_BODY: &str = "1";

#[derive(Debug, Clone, Copy)]
enum Endpoint {
	Track,
	Engage,
}

impl std::fmt::Display for Endpoint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Endpoint::Track => f.write_str("track"),
			Endpoint::Engage => f.write_str("engage"),
		}
	}
}

/// The service answers `1`, sometimes followed by a single newline.
fn is_success_body(body: &str) -> bool {
	body.strip_suffix('\n').unwrap_or(body) == SUCCESS_BODY
}

/// Builder for constructing a MixpanelClient.
pub struct MixpanelClientBuilder {
	token: WriteToken,
	api_host: String,
	request_timeout: Option<Duration>,
	http_client: Option<Client>,
}

impl MixpanelClientBuilder {
	/// Creates a new builder with an empty token and the default host.
	pub fn new() -> Self {
		Self {
			token: WriteToken::default(),
			api_host: DEFAULT_API_HOST.to_string(),
			request_timeout: None,
			http_client: None,
		}
	}

	/// Sets the project write token.
	///
	/// The token is not validated; an empty token is accepted.
	pub fn token(mut self, token: impl Into<WriteToken>) -> Self {
		self.token = token.into();
		self
	}

	/// Loads the token with [`load_token_env`].
	pub fn token_from_env(mut self, name: &str) -> Result<Self> {
		self.token = load_token_env(name)?;
		Ok(self)
	}

	/// Sets the ingestion host.
	///
	/// Example: `https://api-eu.mixpanel.com`
	pub fn api_host(mut self, host: impl Into<String>) -> Self {
		self.api_host = host.into();
		self
	}

	/// Sets a per-request timeout. No timeout is applied by default.
	///
	/// Ignored when a custom client is supplied with [`http_client`](Self::http_client).
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = Some(timeout);
		self
	}

	/// Uses a caller-supplied HTTP client for all requests.
	pub fn http_client(mut self, client: Client) -> Self {
		self.http_client = Some(client);
		self
	}

	/// Builds the MixpanelClient.
	pub fn build(self) -> Result<MixpanelClient> {
		let api_host = self.api_host.trim_end_matches('/').to_string();
		let track_url = endpoint_url(&api_host, TRACK_PATH)?;
		let engage_url = endpoint_url(&api_host, ENGAGE_PATH)?;

		let http_client = match self.http_client {
			Some(client) => client,
			None => {
				let mut builder = loom_common_http::builder(SDK_NAME, SDK_VERSION);
				if let Some(timeout) = self.request_timeout {
					builder = builder.timeout(timeout);
				}
				builder.build().map_err(MixpanelError::HttpClient)?
			}
		};

		debug!(
			api_host = %api_host,
			sdk_name = SDK_NAME,
			sdk_version = SDK_VERSION,
			"Mixpanel client initialized"
		);

		Ok(MixpanelClient {
			inner: Arc::new(MixpanelClientInner {
				token: self.token,
				track_url,
				engage_url,
				http_client,
			}),
		})
	}
}

impl Default for MixpanelClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn endpoint_url(api_host: &str, path: &str) -> Result<Url> {
	let url = Url::parse(&format!("{api_host}{path}"))
		.map_err(|e| MixpanelError::InvalidEndpoint(format!("{api_host}: {e}")))?;
	if !matches!(url.scheme(), "http" | "https") {
		return Err(MixpanelError::InvalidEndpoint(format!(
			"{api_host}: unsupported scheme {}",
			url.scheme()
		)));
	}
	Ok(url)
}

#[derive(Debug)]
struct MixpanelClientInner {
	token: WriteToken,
	track_url: Url,
	engage_url: Url,
	http_client: Client,
}

/// Client for the Mixpanel ingestion API.
///
/// Cloning is cheap and clones share one connection pool. Every method is a
/// single independent request, so a client can be used from many tasks at
/// once.
///
/// # Example
///
/// ```ignore
/// use loom_mixpanel::{MixpanelClient, Properties};
///
/// let client = MixpanelClient::new("project_token")?;
///
/// client
///     .track_for_user_with_properties(
///         "Checkout",
///         "user_123",
///         Properties::new().insert("total", 42.5),
///     )
///     .await?;
///
/// client.profile_increment_by("user_123", "orders", 1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MixpanelClient {
	inner: Arc<MixpanelClientInner>,
}

impl MixpanelClient {
	/// Creates a client for `token` against the default host.
	pub fn new(token: impl Into<WriteToken>) -> Result<Self> {
		Self::builder().token(token).build()
	}

	/// Creates a client with the token loaded from the environment variable
	/// `name` (or `{name}_FILE`). See [`load_token_env`].
	pub fn from_env(name: &str) -> Result<Self> {
		Self::builder().token_from_env(name)?.build()
	}

	/// Creates a client with the token loaded from `MIXPANEL_TOKEN`.
	pub fn from_default_env() -> Result<Self> {
		Self::from_env(DEFAULT_TOKEN_ENV)
	}

	pub fn builder() -> MixpanelClientBuilder {
		MixpanelClientBuilder::new()
	}

	/// The write token sent with every request.
	pub fn token(&self) -> &WriteToken {
		&self.inner.token
	}

	pub fn track_url(&self) -> &Url {
		&self.inner.track_url
	}

	pub fn engage_url(&self) -> &Url {
		&self.inner.engage_url
	}

	// -- Event tracking ---------------------------------------------------

	/// Tracks an event.
	///
	/// Properties are built from `token` and whichever of `distinct_id`,
	/// `time` and `ip` are set on the event, then the event's own
	/// properties are merged on top. A caller property named like one of
	/// those keys replaces the computed value.
	pub async fn track_event(&self, event: TrackEvent) -> Result<()> {
		let request = event.into_request(&self.inner.token);
		debug!(event = %request.event, "Tracking event");
		self.send(Endpoint::Track, &request).await
	}

	/// Tracks an anonymous event at the current time.
	pub async fn track(&self, event: &str) -> Result<()> {
		self.track_event(TrackEvent::new(event).time(Utc::now())).await
	}

	/// Tracks an anonymous event with extra properties.
	pub async fn track_with_properties(&self, event: &str, properties: Properties) -> Result<()> {
		self.track_event(TrackEvent::new(event).time(Utc::now()).properties(properties))
			.await
	}

	/// Tracks an event for a user.
	pub async fn track_for_user(&self, event: &str, distinct_id: &str) -> Result<()> {
		self.track_event(
			TrackEvent::new(event)
				.distinct_id(distinct_id)
				.time(Utc::now()),
		)
		.await
	}

	/// Tracks an event for a user with extra properties.
	pub async fn track_for_user_with_properties(
		&self,
		event: &str,
		distinct_id: &str,
		properties: Properties,
	) -> Result<()> {
		self.track_event(
			TrackEvent::new(event)
				.distinct_id(distinct_id)
				.time(Utc::now())
				.properties(properties),
		)
		.await
	}

	/// Tracks an event for a user from an IP address.
	pub async fn track_for_user_from_ip(
		&self,
		event: &str,
		distinct_id: &str,
		ip: &str,
	) -> Result<()> {
		self.track_event(
			TrackEvent::new(event)
				.distinct_id(distinct_id)
				.time(Utc::now())
				.ip(ip),
		)
		.await
	}

	/// Tracks an event for a user from an IP address with extra properties.
	pub async fn track_for_user_from_ip_with_properties(
		&self,
		event: &str,
		distinct_id: &str,
		ip: &str,
		properties: Properties,
	) -> Result<()> {
		self.track_event(
			TrackEvent::new(event)
				.distinct_id(distinct_id)
				.time(Utc::now())
				.ip(ip)
				.properties(properties),
		)
		.await
	}

	// -- Profile updates --------------------------------------------------

	/// Applies `operation` to the profile identified by `distinct_id`.
	pub async fn profile_update(
		&self,
		distinct_id: &str,
		operation: ProfileOperation,
	) -> Result<()> {
		let request = EngageRequest::new(self.inner.token.clone(), distinct_id, operation);
		debug!(
			distinct_id = %request.distinct_id,
			operation = %request.operation,
			"Updating profile"
		);
		self.send(Endpoint::Engage, &request).await
	}

	/// Sets profile properties, creating the profile if it does not exist and
	/// overwriting existing values.
	pub async fn profile_set(&self, distinct_id: &str, properties: Properties) -> Result<()> {
		self.profile_update(distinct_id, ProfileOperation::Set(properties))
			.await
	}

	/// Sets profile properties that are not already present.
	///
	/// Useful for values like "First login date".
	pub async fn profile_set_once(&self, distinct_id: &str, properties: Properties) -> Result<()> {
		self.profile_update(distinct_id, ProfileOperation::SetOnce(properties))
			.await
	}

	/// Adds integer deltas to numeric profile properties.
	///
	/// Missing properties start at 0. Negative deltas decrement.
	pub async fn profile_add<I, K>(&self, distinct_id: &str, deltas: I) -> Result<()>
	where
		I: IntoIterator<Item = (K, i64)>,
		K: Into<String>,
	{
		let deltas: BTreeMap<String, i64> = deltas.into_iter().map(|(k, v)| (k.into(), v)).collect();
		self.profile_update(distinct_id, ProfileOperation::Add(deltas))
			.await
	}

	/// Appends each value to the list property of the same name.
	pub async fn profile_append(&self, distinct_id: &str, properties: Properties) -> Result<()> {
		self.profile_update(distinct_id, ProfileOperation::Append(properties))
			.await
	}

	/// Merges list values into existing list properties, ignoring duplicates.
	pub async fn profile_union(&self, distinct_id: &str, properties: Properties) -> Result<()> {
		self.profile_update(distinct_id, ProfileOperation::Union(properties))
			.await
	}

	/// Removes a value from each named list property.
	///
	/// Values must be scalars, not lists.
	pub async fn profile_remove(&self, distinct_id: &str, properties: Properties) -> Result<()> {
		self.profile_update(distinct_id, ProfileOperation::Remove(properties))
			.await
	}

	/// Permanently removes the named properties from the profile.
	pub async fn profile_unset<I, K>(&self, distinct_id: &str, names: I) -> Result<()>
	where
		I: IntoIterator<Item = K>,
		K: Into<String>,
	{
		let names = names.into_iter().map(Into::into).collect();
		self.profile_update(distinct_id, ProfileOperation::Unset(names))
			.await
	}

	/// Permanently deletes the profile and all of its properties.
	pub async fn profile_delete(&self, distinct_id: &str) -> Result<()> {
		self.profile_update(distinct_id, ProfileOperation::Delete)
			.await
	}

	/// Increments `property` by 1.
	pub async fn profile_increment(&self, distinct_id: &str, property: &str) -> Result<()> {
		self.profile_add(distinct_id, [(property, 1)]).await
	}

	/// Increments `property` by `value`, which must be positive.
	pub async fn profile_increment_by(
		&self,
		distinct_id: &str,
		property: &str,
		value: i64,
	) -> Result<()> {
		require_positive(value)?;
		self.profile_add(distinct_id, [(property, value)]).await
	}

	/// Decrements `property` by 1.
	pub async fn profile_decrement(&self, distinct_id: &str, property: &str) -> Result<()> {
		self.profile_add(distinct_id, [(property, -1)]).await
	}

	/// Decrements `property` by `value`, which must be positive.
	pub async fn profile_decrement_by(
		&self,
		distinct_id: &str,
		property: &str,
		value: i64,
	) -> Result<()> {
		require_positive(value)?;
		self.profile_add(distinct_id, [(property, -value)]).await
	}

	/// Appends a revenue transaction to the profile's `$transactions` list.
	///
	/// `timestamp` is sent as `YYYY-MM-DDTHH:MM:SS` in its own offset; pass
	/// UTC.
	pub async fn profile_add_revenue_transaction<Tz>(
		&self,
		distinct_id: &str,
		timestamp: &DateTime<Tz>,
		product_code: &str,
		amount: f64,
	) -> Result<()>
	where
		Tz: TimeZone,
		Tz::Offset: std::fmt::Display,
	{
		let transaction = Transaction::new(timestamp, product_code, amount);
		self.profile_update(distinct_id, transaction.into_operation())
			.await
	}

	// -- Dispatch ---------------------------------------------------------

	async fn send<T: Serialize>(&self, endpoint: Endpoint, payload: &T) -> Result<()> {
		let json = serde_json::to_vec(payload)?;
		let data = BASE64_STANDARD.encode(&json);
		let url = match endpoint {
			Endpoint::Track => &self.inner.track_url,
			Endpoint::Engage => &self.inner.engage_url,
		};

		debug!(endpoint = %endpoint, payload_bytes = json.len(), "Sending Mixpanel request");

		let response = self
			.inner
			.http_client
			.get(url.clone())
			.query(&[("data", data.as_str())])
			.send()
			.await
			.map_err(MixpanelError::Transport)?;

		let status = response.status();
		let body = response.text().await.map_err(MixpanelError::ResponseRead)?;

		if !is_success_body(&body) {
			debug!(
				endpoint = %endpoint,
				status = status.as_u16(),
				body = %body,
				"Mixpanel rejected request"
			);
			return Err(MixpanelError::RejectedByService { body });
		}

		debug!(endpoint = %endpoint, status = status.as_u16(), "Mixpanel request accepted");
		Ok(())
	}
}

fn require_positive(value: i64) -> Result<()> {
	if value <= 0 {
		return Err(MixpanelError::InvalidArgument(format!(
			"value must be greater than zero, got {value}"
		)));
	}
	Ok(())
}
