// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Property maps for events and profile updates.

use std::collections::BTreeMap;

use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::encode::to_strict_value;

/// A JSON object of property names to values.
///
/// Used both for extra event properties and for profile operation payloads.
///
/// Values without a JSON representation (NaN, infinities) are remembered per
/// key and make serialization of the whole map fail, so they never reach the
/// wire as `null`.
///
/// # Example
///
/// ```
/// use loom_mixpanel_core::Properties;
///
/// let props = Properties::new()
///     .insert("plan", "enterprise")
///     .insert("seats", 25)
///     .insert("trial", false);
///
/// assert_eq!(props.len(), 3);
/// assert!(props.is_encodable());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
	inner: Map<String, Value>,
	invalid: BTreeMap<String, String>,
}

impl Properties {
	/// Creates an empty property map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a key-value pair, replacing any existing value for `key`.
	///
	/// Accepts any `Serialize` value: strings, integers, floats, booleans,
	/// vectors, and nested objects. A value that cannot be encoded is kept
	/// as `null` and reported when the map is serialized.
	pub fn insert<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Serialize,
	{
		let key = key.into();
		match to_strict_value(&value) {
			Ok(value) => {
				self.invalid.remove(&key);
				self.inner.insert(key, value);
			}
			Err(e) => {
				self.inner.insert(key.clone(), Value::Null);
				self.invalid.insert(key, e.to_string());
			}
		}
		self
	}

	/// Inserts any `Serialize` value, failing immediately when it has no
	/// JSON representation.
	pub fn try_insert<K, V>(mut self, key: K, value: &V) -> Result<Self, serde_json::Error>
	where
		K: Into<String>,
		V: Serialize + ?Sized,
	{
		let value = to_strict_value(value).map_err(serde_json::Error::custom)?;
		let key = key.into();
		self.invalid.remove(&key);
		self.inner.insert(key, value);
		Ok(self)
	}

	/// Returns a new map holding every key of `self` and of `overrides`.
	///
	/// Keys present in both take the value from `overrides`.
	pub fn merge(mut self, overrides: Properties) -> Self {
		let Properties { inner, invalid } = overrides;
		for (k, v) in inner {
			self.invalid.remove(&k);
			self.inner.insert(k, v);
		}
		self.invalid.extend(invalid);
		self
	}

	/// Whether every value can be written as JSON.
	pub fn is_encodable(&self) -> bool {
		self.invalid.is_empty()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.inner.get(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.inner.contains_key(key)
	}

	/// Iterates over entries in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.inner.iter()
	}

	/// Converts the map into a `serde_json::Value::Object`.
	///
	/// Unencodable values appear as `null`.
	pub fn into_value(self) -> Value {
		Value::Object(self.inner)
	}
}

impl Serialize for Properties {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		if let Some((key, reason)) = self.invalid.iter().next() {
			return Err(S::Error::custom(format!(
				"property {key:?} cannot be encoded as JSON: {reason}"
			)));
		}
		self.inner.serialize(serializer)
	}
}

impl From<Properties> for Value {
	fn from(props: Properties) -> Self {
		props.into_value()
	}
}

impl From<Map<String, Value>> for Properties {
	fn from(map: Map<String, Value>) -> Self {
		Self {
			inner: map,
			invalid: BTreeMap::new(),
		}
	}
}

/// Non-object values produce an empty map.
impl From<Value> for Properties {
	fn from(value: Value) -> Self {
		match value {
			Value::Object(map) => Self::from(map),
			_ => Self::new(),
		}
	}
}

impl<K, V> FromIterator<(K, V)> for Properties
where
	K: Into<String>,
	V: Serialize,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		iter.into_iter()
			.fold(Self::new(), |props, (k, v)| props.insert(k, v))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use std::collections::{BTreeMap, HashMap};

	#[test]
	fn test_new_is_empty() {
		let props = Properties::new();
		assert!(props.is_empty());
		assert_eq!(props.len(), 0);
	}

	#[test]
	fn test_insert_mixed_values() {
		let props = Properties::new()
			.insert("name", "Ancient One")
			.insert("age", 12343)
			.insert("score", 300.1)
			.insert("active", true)
			.insert("tags", vec!["a", "b"]);

		assert_eq!(props.len(), 5);
		assert_eq!(props.get("name"), Some(&Value::from("Ancient One")));
		assert_eq!(props.get("age"), Some(&Value::from(12343)));
		assert!(props.get("score").unwrap().is_f64());
		assert_eq!(props.get("active"), Some(&Value::Bool(true)));
		assert_eq!(props.get("tags"), Some(&serde_json::json!(["a", "b"])));
	}

	#[test]
	fn test_insert_nested_properties() {
		let inner = Properties::new().insert("name", "Ancient One");
		let props = Properties::new().insert("innerKey1", inner);

		assert_eq!(props.get("innerKey1").unwrap()["name"], "Ancient One");
	}

	#[test]
	fn test_insert_replaces_existing_key() {
		let props = Properties::new().insert("k", 1).insert("k", 2);
		assert_eq!(props.len(), 1);
		assert_eq!(props.get("k"), Some(&Value::from(2)));
	}

	#[test]
	fn test_try_insert_serializable() {
		let mut map = HashMap::new();
		map.insert("inner", 7);
		let props = Properties::new().try_insert("nested", &map).unwrap();
		assert_eq!(props.get("nested").unwrap()["inner"], 7);
	}

	#[test]
	fn test_try_insert_rejects_non_string_keys() {
		let mut map = BTreeMap::new();
		map.insert(vec![1u8], "x");
		let result = Properties::new().try_insert("bad", &map);
		assert!(result.is_err());
	}

	#[test]
	fn test_merge_override_wins() {
		let base = Properties::new().insert("a", 1).insert("b", 2);
		let overrides = Properties::new().insert("b", 20).insert("c", 3);

		let merged = base.merge(overrides);

		assert_eq!(merged.len(), 3);
		assert_eq!(merged.get("a"), Some(&Value::from(1)));
		assert_eq!(merged.get("b"), Some(&Value::from(20)));
		assert_eq!(merged.get("c"), Some(&Value::from(3)));
	}

	#[test]
	fn test_serializes_as_plain_object() {
		let props = Properties::new().insert("b", 2).insert("a", "x");
		let json = serde_json::to_string(&props).unwrap();
		assert_eq!(json, r#"{"a":"x","b":2}"#);
	}

	#[test]
	fn test_from_non_object_value_is_empty() {
		let props = Properties::from(Value::String("not an object".to_string()));
		assert!(props.is_empty());
	}

	#[test]
	fn test_from_iterator() {
		let props: Properties = vec![("x", 1), ("y", 2)].into_iter().collect();
		assert_eq!(props.len(), 2);
		assert!(props.contains_key("x"));
	}

	#[test]
	fn test_nan_value_fails_serialization() {
		let props = Properties::new().insert("amount", f64::NAN);
		assert!(!props.is_encodable());
		assert_eq!(props.get("amount"), Some(&Value::Null));

		let err = serde_json::to_vec(&props).unwrap_err();
		assert!(err.to_string().contains("amount"));
	}

	#[test]
	fn test_infinity_inside_collection_is_caught() {
		let props = Properties::new().insert("series", vec![1.0, f64::INFINITY]);
		assert!(!props.is_encodable());
		assert!(serde_json::to_string(&props).is_err());
	}

	#[test]
	fn test_unencodable_nested_properties_propagate() {
		let inner = Properties::new().insert("x", f32::NEG_INFINITY);
		let props = Properties::new().insert("outer", inner);
		assert!(!props.is_encodable());
	}

	#[test]
	fn test_replacing_unencodable_value_clears_error() {
		let props = Properties::new()
			.insert("v", f64::NAN)
			.merge(Properties::new().insert("v", 1.5));
		assert!(props.is_encodable());
		assert_eq!(serde_json::to_string(&props).unwrap(), r#"{"v":1.5}"#);

		let props = Properties::new().insert("v", f64::NAN).insert("v", 2);
		assert!(props.is_encodable());
	}

	#[test]
	fn test_merge_keeps_unencodable_override() {
		let merged = Properties::new()
			.insert("a", 1)
			.merge(Properties::new().insert("b", f64::NAN));
		assert!(!merged.is_encodable());
	}

	#[test]
	fn test_try_insert_rejects_nan() {
		assert!(Properties::new().try_insert("x", &f64::NAN).is_err());
	}

	proptest! {
		#[test]
		fn merge_contains_all_keys_and_override_wins(
			base in proptest::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..16),
			overrides in proptest::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..16),
		) {
			let base_props: Properties = base.clone().into_iter().collect();
			let override_props: Properties = overrides.clone().into_iter().collect();

			let merged = base_props.merge(override_props);

			for key in base.keys().chain(overrides.keys()) {
				prop_assert!(merged.contains_key(key));
			}
			for (key, value) in &overrides {
				prop_assert_eq!(merged.get(key), Some(&Value::from(*value)));
			}
			for (key, value) in base.iter().filter(|(k, _)| !overrides.contains_key(*k)) {
				prop_assert_eq!(merged.get(key), Some(&Value::from(*value)));
			}
			let expected_len = base.keys().chain(overrides.keys()).collect::<std::collections::BTreeSet<_>>().len();
			prop_assert_eq!(merged.len(), expected_len);
		}
	}
}
