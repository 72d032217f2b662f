use std::sync::Mutex;

use crate::traits::{DiagnosticSink, SqlTrace};

/// Emits each trace as a `tracing` debug event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, trace: &SqlTrace) {
        tracing::debug!(
            adapter = trace.adapter,
            operation = trace.operation,
            template = %trace.template,
            params = %trace.params.join(","),
            sql = %trace.sql,
            "formatted sql"
        );
    }
}

/// Keeps every trace in memory so tests can inspect them.
#[derive(Debug, Default)]
pub struct RecordingSink {
    traces: Mutex<Vec<SqlTrace>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded traces.
    pub fn traces(&self) -> Vec<SqlTrace> {
        self.traces.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<SqlTrace> {
        self.traces.lock().unwrap().last().cloned()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, trace: &SqlTrace) {
        self.traces.lock().unwrap().push(trace.clone());
    }
}
