//! Shared utilities for shardblast.

pub mod logging;
pub mod stats;
pub mod time;

pub use logging::{init_tracing, LogFormat};
pub use stats::StatsCounter;
pub use time::{format_duration, format_elapsed};
