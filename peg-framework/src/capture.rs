use crate::cause::Cause;
use crate::tree::Tree;
use common_framework::Slice;
use std::sync::Arc;

/// Intermediate result of an atom, before flattening.
///
/// Sequences and repetitions keep their children tagged so that the
/// flattening step can apply the right merge rules to them.
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    /// Zero-width results such as lookaheads.
    Nil,
    Str(Slice),
    Sequence(Vec<Capture>),
    Repetition(Vec<Capture>),
    Maybe(Option<Box<Capture>>),
    /// An already flattened value, as produced by named atoms.
    Tree(Tree),
}

/// A failed match.
///
/// While no error reporter is installed the cause is not computed and the
/// failure is just a marker.
#[derive(Debug, Clone, Default)]
pub struct Failure {
    cause: Option<Arc<Cause>>,
}

impl Failure {
    pub(crate) fn silent() -> Self {
        Self { cause: None }
    }

    pub(crate) fn with_cause(cause: Arc<Cause>) -> Self {
        Self { cause: Some(cause) }
    }

    pub fn cause(&self) -> Option<&Arc<Cause>> {
        self.cause.as_ref()
    }

    pub fn into_cause(self) -> Option<Arc<Cause>> {
        self.cause
    }
}

/// The result of applying an atom.
pub type Outcome = Result<Capture, Failure>;
