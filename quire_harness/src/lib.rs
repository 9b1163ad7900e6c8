// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test host and reference list strategy for exercising quire layouts.
//!
//! - [`FixedHost`]: a [`CollectionHost`](quire_core::host::CollectionHost)
//!   whose counts and bounds the test edits directly.
//! - [`ListStrategy`]: a single-column list with section headers and section
//!   backgrounds, implementing every
//!   [`LayoutStrategy`](quire_core::strategy::LayoutStrategy) hook and
//!   counting each call.

#![no_std]

extern crate alloc;

mod host;
mod list;

pub use host::FixedHost;
pub use list::{BACKGROUND_KIND, HEADER_KIND, Hook, ListStrategy};
