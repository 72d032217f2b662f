mod diagnostic_sink;
mod driver;

pub use diagnostic_sink::{DiagnosticSink, SqlTrace};
pub use driver::DatabaseDriver;
