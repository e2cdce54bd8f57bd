//! Type definitions for anomdash

mod error;
mod record;

pub use error::*;
pub use record::*;
