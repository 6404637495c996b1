pub mod config;
pub mod error;
pub mod types;

pub use config::QuoteFinderConfig;
pub use error::{QuoteFinderError, Result};
pub use types::*;
