//! Observability for Medibot: tracing subscriber setup with stdout, log
//! file and optional OpenTelemetry sinks.

pub mod tracing_setup;
