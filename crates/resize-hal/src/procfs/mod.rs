//! Parsers for procfs files.

pub mod mounts;
