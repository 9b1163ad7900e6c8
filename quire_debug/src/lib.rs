// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, recording, and JSON export for quire engine diagnostics.
//!
//! This crate provides [`TraceSink`](quire_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: in-memory event log shared between the
//!   engine that owns the sink and the code inspecting it.
//! - [`json::export`]: writes recorded events as a JSON array.

pub mod json;
pub mod pretty;
pub mod recorder;
