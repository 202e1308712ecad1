// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core payload types for the Mixpanel ingestion API.
//!
//! Nothing in this crate performs I/O. It builds the JSON documents that the
//! `/track/` and `/engage/` endpoints expect:
//!
//! - [`TrackEvent`] / [`TrackRequest`]: `{"event": ..., "properties": {...}}`
//! - [`ProfileOperation`] / [`EngageRequest`]: `{"$token": ..., "$distinct_id": ..., "$op": ...}`
//! - [`Properties`]: the property map with override-merge semantics
//!
//! Floats must be finite. NaN and infinities fail serialization instead of
//! being sent as `null`.

mod encode;
pub mod event;
pub mod profile;
pub mod properties;
pub mod time;
pub mod token;

pub use event::{TrackEvent, TrackRequest};
pub use profile::{EngageRequest, ProfileOperation, Transaction};
pub use properties::Properties;
pub use time::{current_time_string, format_time, TIME_FORMAT};
pub use token::WriteToken;
