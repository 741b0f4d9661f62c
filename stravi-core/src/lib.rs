//! Shared types for the STR→AVI converter.
//!
//! Holds the error taxonomy used by the PlayStation-side decoder, the
//! decoded frame representation handed to the AVI muxer, and the progress
//! events the pipeline reports to frontends.

pub mod error;
pub mod frame;
pub mod progress;
pub mod util;

pub use error::StrError;
pub use frame::{Geometry, RgbFrame};
pub use progress::ConvertProgress;
