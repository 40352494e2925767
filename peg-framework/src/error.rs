use crate::cause::Cause;
use std::sync::Arc;
use thiserror::Error;

/// Returned when the input does not match the grammar.
///
/// The message is the one-line summary of the root cause; the full cause
/// tree is available through [`ParseFailed::cause`].
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ParseFailed {
    message: String,
    cause: Arc<Cause>,
}

impl ParseFailed {
    pub fn new(cause: Arc<Cause>) -> Self {
        Self {
            message: cause.to_string(),
            cause,
        }
    }

    pub fn cause(&self) -> &Arc<Cause> {
        &self.cause
    }

    /// Renders the cause tree; see [`Cause::ascii_tree`].
    pub fn ascii_tree(&self) -> String {
        self.cause.ascii_tree()
    }
}

/// Errors detected while building a grammar.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
