//! Logging and trace export setup shared by the relay binaries.
//!
//! Call [`init_telemetry`] once at the top of `main` with a config built by
//! [`TelemetryConfig::from_env`].

mod config;
mod tracing_init;

pub use config::{TelemetryConfig, TelemetryProtocol};
pub use tracing_init::{init_telemetry, telemetry_enabled};
