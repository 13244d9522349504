// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Storage implementations.
//!
//! - `vec_store`: entries in one contiguous `Vec`, sorted in place.

pub(crate) mod vec_store;

pub use vec_store::VecStore;
