use std::sync::Mutex;

use crate::internals::core::ports::LogPort;

/// Forwards component log records to the global tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogAdapter;

impl LogPort for TracingLogAdapter {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// Keeps every record in memory, in the order it was logged.
#[derive(Debug, Default)]
pub struct MemoryLogAdapter {
    records: Mutex<Vec<String>>,
}

impl MemoryLogAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<String> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn clear(&self) {
        match self.records.lock() {
            Ok(mut records) => records.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl LogPort for MemoryLogAdapter {
    fn info(&self, message: &str) {
        match self.records.lock() {
            Ok(mut records) => records.push(message.to_owned()),
            Err(poisoned) => poisoned.into_inner().push(message.to_owned()),
        }
    }
}
