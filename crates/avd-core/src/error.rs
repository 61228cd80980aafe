use thiserror::Error;

/// A literal in the document that could not be read. Contained by the evaluator and renderer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("Invalid color literal: {0:?}")]
    InvalidColor(String),
    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),
}
