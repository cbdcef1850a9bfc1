//! Host and cloud abstraction layer for resize-thyself.
//!
//! Everything that touches the world (subprocesses, `/proc`, `/dev`, the
//! instance metadata service, the cloud volume API) goes through the traits in
//! [`hal`] so the resize workflow can be exercised against [`FakeHal`].

pub mod error;
pub mod hal;
pub mod path;
pub mod procfs;

pub use error::{HalError, HalResult};
pub use hal::*;
