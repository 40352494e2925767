use super::ErrorReporter;
use crate::atoms::Atom;
use crate::cause::Cause;
use common_framework::Position;
use source_framework::ParseSource;
use std::sync::Arc;

/// Reports the failure that reached deepest into the input.
///
/// Every new cause is compared with the deepest leaf seen so far. A cause
/// whose own deepest leaf lies at or beyond the stored one replaces it and
/// is passed on unchanged; a shallower cause is replaced by the stored
/// leaf, so that the parents built on top of it point at the deep failure.
#[derive(Debug, Default)]
pub struct Deepest {
    deepest_cause: Option<Arc<Cause>>,
}

impl Deepest {
    /// Returns the deepest leaf stored so far.
    pub fn deepest_cause(&self) -> Option<&Arc<Cause>> {
        self.deepest_cause.as_ref()
    }

    /// Returns `cause` labelled, replacing the stored leaf if that is the
    /// cause being labelled.
    pub(crate) fn relabel(&mut self, cause: &Arc<Cause>, label: &str) -> Arc<Cause> {
        let labelled = Arc::new(Cause::clone(cause).with_label(label));
        if let Some(stored) = self.deepest_cause.as_mut() {
            if Arc::ptr_eq(stored, cause) {
                *stored = labelled.clone();
            }
        }
        labelled
    }

    pub(crate) fn reset(&mut self) {
        self.deepest_cause = None;
    }

    /// Checks `cause` against the stored leaf and returns the cause to report.
    pub fn deepest(&mut self, cause: Arc<Cause>) -> Arc<Cause> {
        let leaf = deepest_leaf(&cause, 0).1;

        match &self.deepest_cause {
            Some(stored) if leaf.pos() < stored.pos() => stored.clone(),
            _ => {
                self.deepest_cause = Some(leaf);
                cause
            }
        }
    }
}

/// Finds the leaf with the highest rank (depth) below `cause`. The first
/// leaf wins on ties.
fn deepest_leaf(cause: &Arc<Cause>, rank: usize) -> (usize, Arc<Cause>) {
    let mut max_rank = rank;
    let mut max_child = cause.clone();
    for child in cause.children() {
        let (child_rank, child_leaf) = deepest_leaf(child, rank + 1);
        if child_rank > max_rank {
            max_rank = child_rank;
            max_child = child_leaf;
        }
    }
    (max_rank, max_child)
}

impl ErrorReporter for Deepest {
    fn err_at(
        &mut self,
        _atom: &Atom,
        source: &dyn ParseSource,
        message: String,
        pos: Position,
        children: Vec<Arc<Cause>>,
    ) -> Arc<Cause> {
        let cause = Arc::new(Cause::format(source, pos, message, children));
        self.deepest(cause)
    }
}
