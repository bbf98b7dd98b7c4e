// Standard library
use std::sync::{Arc, Mutex};

/// Severity of a single diagnostic line.
///
/// `Notice` sits between `Info` and `Warn`: it flags a state change the
/// operator should read (for example, "the alternative endpoint will be
/// preferred from now on") without implying anything went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagLevel {
    Debug,
    Info,
    Notice,
    Warn,
    Error,
}

/// One deferred diagnostic line held by a queued reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedRecord {
    pub level: DiagLevel,
    pub indent: usize,
    pub message: String,
}

/// Upstream destination for diagnostic lines.
pub trait LogSink: Send + Sync {
    fn write(&self, level: DiagLevel, indent: usize, message: &str);
}

/// Forwards diagnostic lines to the `tracing` macros.
pub struct TracingSink;

/// Records diagnostic lines in memory. Used by tests to assert on ordering.
#[derive(Default)]
pub struct MemorySink {
    pub(super) entries: Mutex<Vec<QueuedRecord>>,
}

/// Diagnostic reporter handed to detection code.
///
/// A reporter is either *immediate* (lines go straight to the upstream sink)
/// or *queued* (lines are appended to a shared list and replayed by
/// [`flush`](Reporter::flush)). `indented` and `queued` derive new reporters
/// without touching the original, so a reporter can be freely handed down
/// into nested detection steps.
///
/// A single reporter instance is not meant for concurrent writers; each
/// concurrent attempt receives its own queued instance, and only the
/// coordinator's controlling task flushes.
#[derive(Clone)]
pub struct Reporter {
    pub(super) sink: Arc<dyn LogSink>,
    pub(super) indent: usize,
    pub(super) queue: Option<Arc<Mutex<Vec<QueuedRecord>>>>,
}
