//! Grow a cloud block volume, its partition and its filesystem when the disk fills up.

pub mod cli;
pub mod config;
pub mod device_map;
pub mod errors;
pub mod grow;
pub mod logging;
pub mod mounts;
pub mod orchestrator;
pub mod pipeline;
pub mod shell;
pub mod usage;
pub mod volume;

pub use config::Config;
pub use errors::{ResizeError, Result};
pub use pipeline::DeviceOutcome;
