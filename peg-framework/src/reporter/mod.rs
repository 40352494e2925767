//! Error reporters decide which failure a parse reports.
//!
//! A PEG parse backtracks through many failures before it gives up; the
//! reporter receives each of them and returns the cause to propagate
//! upwards.

mod contextual;
mod deepest;

pub use contextual::Contextual;
pub use deepest::Deepest;

use crate::atoms::Atom;
use crate::cause::Cause;
use common_framework::Position;
use source_framework::ParseSource;
use std::fmt;
use std::sync::Arc;

/// Receives the failures and successes of a parse.
pub trait ErrorReporter {
    /// Reports a failure of `atom` at the current position of `source`.
    fn err(
        &mut self,
        atom: &Atom,
        source: &dyn ParseSource,
        message: String,
        children: Vec<Arc<Cause>>,
    ) -> Arc<Cause> {
        let pos = source.pos();
        self.err_at(atom, source, message, pos, children)
    }

    /// Reports a failure of `atom` at `pos`.
    fn err_at(
        &mut self,
        atom: &Atom,
        source: &dyn ParseSource,
        message: String,
        pos: Position,
        children: Vec<Arc<Cause>>,
    ) -> Arc<Cause>;

    /// Notifies the reporter that an atom matched.
    fn succ(&mut self, _source: &dyn ParseSource) {}
}

/// Reports every failure as a fresh node, producing the full cause tree.
#[derive(Debug, Default)]
pub struct TreeReporter;

impl ErrorReporter for TreeReporter {
    fn err_at(
        &mut self,
        _atom: &Atom,
        source: &dyn ParseSource,
        message: String,
        pos: Position,
        children: Vec<Arc<Cause>>,
    ) -> Arc<Cause> {
        Arc::new(Cause::format(source, pos, message, children))
    }
}

/// Selects the reporter used for the error pass of a parse.
#[derive(Clone, Copy, Default)]
pub enum ReporterKind {
    Tree,
    Deepest,
    #[default]
    Contextual,
    Custom(fn() -> Box<dyn ErrorReporter>),
}

impl ReporterKind {
    pub fn build(self) -> Box<dyn ErrorReporter> {
        match self {
            ReporterKind::Tree => Box::new(TreeReporter),
            ReporterKind::Deepest => Box::new(Deepest::default()),
            ReporterKind::Contextual => Box::new(Contextual::default()),
            ReporterKind::Custom(factory) => factory(),
        }
    }
}

impl fmt::Debug for ReporterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReporterKind::Tree => f.write_str("Tree"),
            ReporterKind::Deepest => f.write_str("Deepest"),
            ReporterKind::Contextual => f.write_str("Contextual"),
            ReporterKind::Custom(_) => f.write_str("Custom"),
        }
    }
}
