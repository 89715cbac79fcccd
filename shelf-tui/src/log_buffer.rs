use std::{
    collections::VecDeque,
    fmt::Write as _,
    sync::{Arc, Mutex},
};

use tracing::{Level, Subscriber, field::Field};
use tracing_subscriber::{Layer, layer::Context};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    /// The event message followed by its other fields as `key=value`.
    pub message: String,
}

impl LogEntry {
    /// Warnings and errors, which the log panel title counts.
    pub fn is_problem(&self) -> bool {
        self.level <= Level::WARN
    }
}

/// A bounded ring of recent events, shared between the tracing layer and the log panel.
#[derive(Clone)]
pub struct LogBuffer {
    capacity: usize,
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
        }
    }

    fn push(&self, entry: LogEntry) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or_default()
    }

    pub fn problem_count(&self) -> usize {
        self.entries
            .lock()
            .map(|e| e.iter().filter(|entry| entry.is_problem()).count())
            .unwrap_or_default()
    }
}

/// Feeds every event that passes the subscriber's filter into a [`LogBuffer`].
pub struct LogBufferLayer {
    buffer: LogBuffer,
}

impl LogBufferLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl<S: Subscriber> Layer<S> for LogBufferLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = EventFields::default();
        event.record(&mut fields);

        let metadata = event.metadata();
        self.buffer.push(LogEntry {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: fields.into_line(),
        });
    }
}

/// Collects the message and any structured fields of one event.
#[derive(Default)]
struct EventFields {
    message: String,
    rest: String,
}

impl EventFields {
    fn into_line(self) -> String {
        match (self.message.is_empty(), self.rest.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.rest,
            (false, false) => format!("{} {}", self.message, self.rest),
        }
    }

    fn push(&mut self, field: &Field, value: std::fmt::Arguments<'_>) {
        if field.name() == "message" {
            let _ = self.message.write_fmt(value);
            return;
        }
        if !self.rest.is_empty() {
            self.rest.push(' ');
        }
        let _ = write!(self.rest, "{}={value}", field.name());
    }
}

impl tracing::field::Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.push(field, format_args!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, format_args!("{value}"));
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    fn capture(buffer: &LogBuffer, f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(LogBufferLayer::new(buffer.clone()));
        tracing::subscriber::with_default(subscriber, f);
    }

    #[test]
    fn test_layer_captures_message_and_fields() {
        let buffer = LogBuffer::with_capacity(16);
        capture(&buffer, || {
            tracing::warn!(resource = "wantlist.json", status = 404, "treating as empty");
            tracing::info!("loaded {} records", 2);
        });

        let entries = buffer.snapshot();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, Level::WARN);
        assert_eq!(
            entries[0].message,
            "treating as empty resource=wantlist.json status=404"
        );
        assert!(entries[0].target.starts_with("shelf_tui"));
        assert_eq!(entries[1].message, "loaded 2 records");
        assert_eq!(buffer.problem_count(), 1);
    }

    #[test]
    fn test_oldest_entries_are_evicted() {
        let buffer = LogBuffer::with_capacity(3);
        for i in 0..5 {
            buffer.push(LogEntry {
                level: Level::INFO,
                target: "shelf".to_string(),
                message: i.to_string(),
            });
        }
        let messages: Vec<_> = buffer.snapshot().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, ["2", "3", "4"]);
        assert_eq!(buffer.len(), 3);
    }
}
