use crate::atoms::Atom;
use crate::capture::{Failure, Outcome};
use crate::cause::Cause;
use crate::flatten::MergeWarning;
use crate::reporter::ErrorReporter;
use common_framework::Position;
use source_framework::ParseSource;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Per-parse state shared by all atoms of one parse.
///
/// Holds the error reporter (absent during the fast pass), the packrat
/// cache and the warnings collected while flattening named captures.
pub struct Context {
    reporter: Option<Box<dyn ErrorReporter>>,
    prune: bool,
    verbose: bool,
    memo: Option<HashMap<MemoKey, (Outcome, Position)>>,
    warnings: Vec<MergeWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MemoKey {
    atom: usize,
    bytepos: usize,
}

impl Context {
    /// Creates the context of the fast pass: no reporter, pruning enabled.
    pub fn fast(verbose: bool, memoize: bool) -> Self {
        Self {
            reporter: None,
            prune: true,
            verbose,
            memo: memoize.then(HashMap::new),
            warnings: Vec::new(),
        }
    }

    /// Creates the context of the error pass: every failure is reported
    /// and no alternative is skipped.
    pub fn reporting(reporter: Box<dyn ErrorReporter>, verbose: bool, memoize: bool) -> Self {
        Self {
            reporter: Some(reporter),
            prune: false,
            verbose,
            memo: memoize.then(HashMap::new),
            warnings: Vec::new(),
        }
    }

    /// True when atoms may skip work based on lookahead pre-checks.
    pub fn prune(&self) -> bool {
        self.prune
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub(crate) fn take_warnings(&mut self) -> Vec<MergeWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub(crate) fn warnings_mut(&mut self) -> &mut Vec<MergeWarning> {
        &mut self.warnings
    }

    /// Reports a failure at the current position.
    ///
    /// The message is only rendered when a reporter is installed.
    pub fn err<F>(
        &mut self,
        atom: &Atom,
        source: &dyn ParseSource,
        children: Vec<Arc<Cause>>,
        message: F,
    ) -> Failure
    where
        F: FnOnce(&dyn ParseSource) -> String,
    {
        match self.reporter.as_mut() {
            Some(reporter) => {
                let message = message(source);
                Failure::with_cause(reporter.err(atom, source, message, children))
            }
            None => Failure::silent(),
        }
    }

    /// Reports a failure at `pos`.
    pub fn err_at<F>(
        &mut self,
        atom: &Atom,
        source: &dyn ParseSource,
        pos: Position,
        children: Vec<Arc<Cause>>,
        message: F,
    ) -> Failure
    where
        F: FnOnce(&dyn ParseSource) -> String,
    {
        match self.reporter.as_mut() {
            Some(reporter) => {
                let message = message(source);
                Failure::with_cause(reporter.err_at(atom, source, message, pos, children))
            }
            None => Failure::silent(),
        }
    }

    pub fn succ(&mut self, source: &dyn ParseSource) {
        if let Some(reporter) = self.reporter.as_mut() {
            reporter.succ(source);
        }
    }

    /// Runs `atom` at the current position, reusing a previous result when
    /// the packrat cache is enabled and the atom is cacheable.
    ///
    /// Results are keyed by atom and position only. A success recorded
    /// without `consume_all` is replayed as is when the same rule is later
    /// applied with it, and [`Atom::apply`] then reports the leftover input.
    pub(crate) fn try_with_cache(
        &mut self,
        atom: &Atom,
        source: &mut dyn ParseSource,
        consume_all: bool,
    ) -> Outcome {
        if self.memo.is_none() || !atom.is_cached() {
            return atom.try_match(source, self, consume_all);
        }

        let key = MemoKey {
            atom: atom.id(),
            bytepos: source.bytepos(),
        };
        if let Some((outcome, end)) = self.memo.as_ref().and_then(|memo| memo.get(&key)) {
            trace!(atom = %atom, bytepos = key.bytepos, "memo hit");
            let outcome = outcome.clone();
            source.restore(*end);
            return outcome;
        }

        let outcome = atom.try_match(source, self, consume_all);
        if let Some(memo) = self.memo.as_mut() {
            memo.insert(key, (outcome.clone(), source.pos()));
        }
        outcome
    }
}
