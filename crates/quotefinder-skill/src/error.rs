//! Error types for the quote skill.

use quotefinder_core::QuoteFinderError;

/// Failures below the pagination engine.
///
/// Both variants are folded into "no results" before they reach the user;
/// they exist so the boundary can log what actually went wrong.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("parse failure: {0}")]
    ParseFailure(String),
}

/// Errors surfaced to the host.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    #[error("invalid intent: {0}")]
    UnknownIntent(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("session error: {0}")]
    Session(String),
}

impl From<QuoteFinderError> for SkillError {
    fn from(err: QuoteFinderError) -> Self {
        match err {
            QuoteFinderError::Config(msg) => SkillError::Config(msg),
            other => SkillError::Session(other.to_string()),
        }
    }
}
