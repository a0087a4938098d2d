//! Common utility functions shared across the Polvo crates.
//!
//! Pure functions only: no side effects, no I/O.

pub mod datetime;

pub use datetime::{format_datetime, parse_datetime};
