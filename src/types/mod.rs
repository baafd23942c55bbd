// src/types/mod.rs
use thiserror::Error;

mod domain_types;
mod ids;

pub use domain_types::*;
pub use ids::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },
}
