//! Core type definitions using newtype patterns for type safety.
//!
//! Invalid ports, ranges and hosts are rejected when these types are built,
//! so the scanning core only ever handles valid values.

mod port;
mod target;

pub use port::{Port, PortRange};
pub use target::{ScanTarget, TargetSpec};
