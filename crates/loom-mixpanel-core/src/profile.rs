// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Profile update payloads for the `/engage/` endpoint.
//!
//! Every request names one operation and the profile it applies to:
//!
//! ```json
//! {"$token": "...", "$distinct_id": "user_123", "$set": {"plan": "pro"}}
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::properties::Properties;
use crate::time::format_time;
use crate::token::WriteToken;

/// Profile property that holds the revenue transaction list.
pub const TRANSACTIONS_PROPERTY: &str = "$transactions";

/// A mutation applied to a single profile.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileOperation {
	/// Creates the profile if needed and overwrites the given properties.
	Set(Properties),
	/// Sets properties that are not already present. Never overwrites.
	SetOnce(Properties),
	/// Adds an integer delta to each property, starting from 0 when absent.
	/// Negative deltas decrement.
	Add(BTreeMap<String, i64>),
	/// Appends each value to the list property of the same name, creating
	/// a one-element list when absent.
	Append(Properties),
	/// Merges list values into existing lists, skipping duplicates.
	Union(Properties),
	/// Removes one scalar value from each named list property. No-op when
	/// the value is not present.
	Remove(Properties),
	/// Deletes the named properties.
	Unset(Vec<String>),
	/// Deletes the whole profile.
	Delete,
}

impl ProfileOperation {
	/// The `$`-prefixed key this operation is sent under.
	pub fn key(&self) -> &'static str {
		match self {
			ProfileOperation::Set(_) => "$set",
			ProfileOperation::SetOnce(_) => "$set_once",
			ProfileOperation::Add(_) => "$add",
			ProfileOperation::Append(_) => "$append",
			ProfileOperation::Union(_) => "$union",
			ProfileOperation::Remove(_) => "$remove",
			ProfileOperation::Unset(_) => "$unset",
			ProfileOperation::Delete => "$delete",
		}
	}
}

impl std::fmt::Display for ProfileOperation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.key())
	}
}

/// Body of an `/engage/` request.
#[derive(Debug, Clone, PartialEq)]
pub struct EngageRequest {
	pub token: WriteToken,
	pub distinct_id: String,
	pub operation: ProfileOperation,
}

impl EngageRequest {
	pub fn new(token: WriteToken, distinct_id: impl Into<String>, operation: ProfileOperation) -> Self {
		Self {
			token,
			distinct_id: distinct_id.into(),
			operation,
		}
	}
}

impl Serialize for EngageRequest {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(3))?;
		map.serialize_entry("$token", &self.token)?;
		map.serialize_entry("$distinct_id", &self.distinct_id)?;
		let key = self.operation.key();
		match &self.operation {
			ProfileOperation::Set(props)
			| ProfileOperation::SetOnce(props)
			| ProfileOperation::Append(props)
			| ProfileOperation::Union(props)
			| ProfileOperation::Remove(props) => map.serialize_entry(key, props)?,
			ProfileOperation::Add(deltas) => map.serialize_entry(key, deltas)?,
			ProfileOperation::Unset(names) => map.serialize_entry(key, names)?,
			// The value is ignored by the service.
			ProfileOperation::Delete => map.serialize_entry(key, "")?,
		}
		map.end()
	}
}

/// A revenue record appended to a profile's `$transactions` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
	#[serde(rename = "$time")]
	pub time: String,
	#[serde(rename = "$amount")]
	pub amount: f64,
	pub product_code: String,
}

impl Transaction {
	pub fn new<Tz>(time: &DateTime<Tz>, product_code: impl Into<String>, amount: f64) -> Self
	where
		Tz: TimeZone,
		Tz::Offset: std::fmt::Display,
	{
		Self {
			time: format_time(time),
			amount,
			product_code: product_code.into(),
		}
	}

	/// Wraps the transaction as an `$append` operation.
	pub fn into_operation(self) -> ProfileOperation {
		ProfileOperation::Append(Properties::new().insert(TRANSACTIONS_PROPERTY, self))
	}
}
