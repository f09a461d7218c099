//! Common utilities for dugout
//!
//! Shared error taxonomy and logging bootstrap used by the driver crate and the CLI.

pub mod error;
pub mod logging;

pub use error::{DugoutError, Result};
pub use logging::init_logging;
