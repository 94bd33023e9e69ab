//! Diagnostics sink for operator-facing lines.
//!
//! The controller only needs `log(message)`; which transport carries the
//! lines is chosen by whoever builds the controller.

use std::sync::{Arc, Mutex};

pub trait Logger {
    fn log(&self, message: &str);
}

/// Forwards each line to `tracing` under the `dispenser::diag` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!(target: "dispenser::diag", "{message}");
    }
}

/// Keeps every line in memory; clones share the buffer.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogger {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, message: &str) {
        if let Ok(mut g) = self.lines.lock() {
            g.push(message.to_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_logger_clones_share_lines() {
        let a = MemoryLogger::new();
        let b = a.clone();
        b.log("pump on");
        assert_eq!(a.lines(), vec!["pump on".to_string()]);
        assert!(a.contains("pump"));
    }
}
