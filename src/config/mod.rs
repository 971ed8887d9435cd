//! Configuration management for lookout.
//!
//! Provides XDG-compliant settings storage with command-line overrides
//! applied on top by the CLI layer.

mod settings;

pub use settings::{seconds_to_duration, AppSettings, Paths};
