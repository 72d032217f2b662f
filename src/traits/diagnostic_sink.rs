/// One formatted call, as reported to a [`DiagnosticSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct SqlTrace {
    /// Driver name
    pub adapter: &'static str,
    /// Client operation, e.g. `query_for_value`
    pub operation: &'static str,
    /// Template as supplied by the caller
    pub template: String,
    /// Parameters rendered as SQL literals
    pub params: Vec<String>,
    /// Final SQL sent to the engine
    pub sql: String,
}

/// Receives a trace of every statement a client formats.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, trace: &SqlTrace);
}
