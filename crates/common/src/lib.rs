//! Common types shared across piiguard crates.

pub mod error;

pub use error::{Error, Result};
