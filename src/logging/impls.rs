// Standard library
use std::mem;
use std::sync::{Arc, Mutex};

// 3rd party crates
use tracing::{debug, error, info, warn};

// Current module imports
use super::types::{DiagLevel, LogSink, MemorySink, QueuedRecord, Reporter, TracingSink};

impl LogSink for TracingSink {
    fn write(&self, level: DiagLevel, indent: usize, message: &str) {
        let padding = "  ".repeat(indent);
        match level {
            DiagLevel::Debug => debug!("{}{}", padding, message),
            DiagLevel::Info => info!("{}{}", padding, message),
            DiagLevel::Notice => info!("{}{}", padding, message),
            DiagLevel::Warn => warn!("{}{}", padding, message),
            DiagLevel::Error => error!("{}{}", padding, message),
        }
    }
}

impl LogSink for MemorySink {
    fn write(&self, level: DiagLevel, indent: usize, message: &str) {
        self.entries.lock().unwrap().push(QueuedRecord {
            level,
            indent,
            message: message.to_string(),
        });
    }
}

impl MemorySink {
    /// Returns a copy of everything written so far, in write order.
    pub fn entries(&self) -> Vec<QueuedRecord> {
        self.entries.lock().unwrap().clone()
    }

    /// Returns only the messages, in write order.
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|record| record.message.clone())
            .collect()
    }
}

impl Reporter {
    /// Creates an immediate reporter writing to the given upstream sink.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            indent: 0,
            queue: None,
        }
    }

    /// Creates an immediate reporter backed by the `tracing` macros.
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    /// Returns a reporter one indentation level deeper.
    ///
    /// The derived reporter shares the queue (if any) with its parent, so
    /// lines from nested steps keep their position in the flush order.
    pub fn indented(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            indent: self.indent + 1,
            queue: self.queue.clone(),
        }
    }

    /// Returns a queued reporter with a fresh, empty list, writing to the
    /// same upstream sink when flushed.
    pub fn queued(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            indent: self.indent,
            queue: Some(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    /// Replays all queued lines to the upstream sink, in original call
    /// order, exactly once. The queue is left empty, so a second flush
    /// without new lines is a no-op. On an immediate reporter this does
    /// nothing.
    pub fn flush(&self) {
        let Some(queue) = &self.queue else {
            return;
        };
        let records = mem::take(&mut *queue.lock().unwrap());
        for record in records {
            self.sink.write(record.level, record.indent, &record.message);
        }
    }

    fn log(&self, level: DiagLevel, message: String) {
        match &self.queue {
            Some(queue) => queue.lock().unwrap().push(QueuedRecord {
                level,
                indent: self.indent,
                message,
            }),
            None => self.sink.write(level, self.indent, &message),
        }
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(DiagLevel::Debug, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(DiagLevel::Info, message.into());
    }

    pub fn notice(&self, message: impl Into<String>) {
        self.log(DiagLevel::Notice, message.into());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(DiagLevel::Warn, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(DiagLevel::Error, message.into());
    }
}
