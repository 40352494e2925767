use super::{Deepest, ErrorReporter};
use crate::atoms::Atom;
use crate::cause::Cause;
use common_framework::Position;
use source_framework::ParseSource;
use std::sync::Arc;

/// The default reporter: [`Deepest`] scoped to the current attempt.
///
/// Whenever an atom succeeds at or beyond the furthest point of success
/// seen so far, the stored deepest failure is forgotten. A labelled atom
/// puts its label on whatever cause it ends up reporting, which may be the
/// stored deeper failure rather than its own.
#[derive(Debug, Default)]
pub struct Contextual {
    deepest: Deepest,
    last_reset_pos: usize,
}

impl ErrorReporter for Contextual {
    fn err_at(
        &mut self,
        atom: &Atom,
        source: &dyn ParseSource,
        message: String,
        pos: Position,
        children: Vec<Arc<Cause>>,
    ) -> Arc<Cause> {
        let cause = Arc::new(Cause::format(source, pos, message, children));
        let reported = self.deepest.deepest(cause);
        match atom.label_text() {
            Some(label) => self.deepest.relabel(&reported, label),
            None => reported,
        }
    }

    fn succ(&mut self, source: &dyn ParseSource) {
        let bytepos = source.bytepos();
        if bytepos < self.last_reset_pos {
            return;
        }
        self.last_reset_pos = bytepos;
        self.deepest.reset();
    }
}
