//! Tracing with OpenTelemetry export to a local file.
//!
//! The sandbox has no collector to talk to, so spans are encoded as
//! OTLP/JSON and appended to `marquee-otlp.json` in the data directory,
//! one batch per line. The file rotates at 10 MiB and keeps 3 backups.
//!
//! ```text
//! tracing spans → tracing-opentelemetry → SDK provider → FileSpanExporter → RotatingFile
//! ```
//!
//! The level comes from the `trace_level` plugin option (default `info`) and
//! accepts `EnvFilter` directives such as `marquee=debug`.
//!
//! Trace context crosses into the worker inside each message; see
//! [`TraceContext`](crate::worker::TraceContext).

mod exporter;
mod init;
mod otlp;
mod rotation;

pub use init::{init_tracing, SERVICE_NAME, TRACE_FILE};
pub use rotation::{RotatingFile, DEFAULT_BACKUPS, DEFAULT_MAX_BYTES};
