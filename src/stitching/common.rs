//! Common utilities module
//!
//! This module contains shared utilities used across the stitching engine.

pub mod error;

pub use error::{StitchError, Result};
