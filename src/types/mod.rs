//! Core type definitions using newtype patterns for type safety.

mod port;
mod target;

pub use port::{Port, PortError, PortSelection, PortSet, TOP_PORTS};
pub use target::{ScanTarget, TargetError};
