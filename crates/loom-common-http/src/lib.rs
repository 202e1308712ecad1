// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Loom SDKs.
//!
//! Every SDK builds its `reqwest` client through this crate so requests
//! carry a consistent User-Agent of the form `{sdk}/{version} ({platform})`.

mod client;

pub use client::{builder, platform, user_agent};
