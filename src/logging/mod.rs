//! Diagnostic Reporting Module
//!
//! This module provides the diagnostic logging facade used by the detection
//! engine. Unlike plain `tracing` calls, a [`Reporter`](types::Reporter) can
//! run in *queued* mode: every line is appended to a shared, ordered list
//! instead of being emitted, and a later `flush` replays the list exactly
//! once in original call order.
//!
//! Queued mode exists for one reason: when two detection attempts run
//! concurrently, their diagnostics must never interleave, and an attempt
//! that lost the race (or was abandoned) must leave no trace in the output.
//! Each concurrent attempt therefore gets its own queued reporter, and only
//! the winning attempt's queue is ever flushed.

pub mod impls;
pub mod types;
