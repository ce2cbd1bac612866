use std::sync::Mutex;

use lessbatch::report::{LogSink, Severity};

/// Log sink that keeps every message for later assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<(Severity, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn at(&self, severity: Severity) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn contains(&self, severity: Severity, needle: &str) -> bool {
        self.at(severity).iter().any(|m| m.contains(needle))
    }
}

impl LogSink for RecordingSink {
    fn log(&self, severity: Severity, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((severity, message.to_string()));
    }
}
