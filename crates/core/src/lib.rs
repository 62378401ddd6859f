//! Core errors, clock, configuration, and constants for `gridmetrics`.
//!
//! This crate holds the building blocks shared by the metrics aggregator so
//! that the hot-path crate stays focused on counters and registries.
//!
//! ## Key Components
//!
//! - **`errors`**: The `Error` enum and `Result` alias used by every fallible
//!   operation in the workspace.
//! - **`clock`**: The millisecond `Clock` abstraction with a wall-clock and a
//!   manually driven implementation.
//! - **`config`**: `MetricsConfig`, its builder, and environment loading.
//! - **`logging`**: `tracing-subscriber` bootstrap for binaries and tests.
//! - **`constants`**: Environment variable names and defaults.

pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;

pub use self::{
    clock::{Clock, ManualClock, SharedClock, SystemClock},
    config::{MetricsConfig, MetricsConfigBuilder},
    constants::*,
    errors::{Error, Result},
};
