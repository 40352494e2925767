use super::{Atom, Matcher, Precedence};
use crate::capture::{Capture, Outcome};
use crate::context::Context;
use source_framework::ParseSource;

/// Distinguishes `maybe()` from general repetitions; they flatten
/// differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatTag {
    Repeat,
    Maybe,
}

/// Greedy repetition of an atom.
///
/// Matches as many times as possible (up to `max`) and never gives back
/// occurrences to let a later atom match.
#[derive(Clone)]
pub struct Repetition {
    child: Atom,
    min: usize,
    max: Option<usize>,
    tag: RepeatTag,
}

impl Repetition {
    pub fn new(child: Atom, min: usize, max: Option<usize>, tag: RepeatTag) -> Self {
        Self {
            child,
            min,
            max,
            tag,
        }
    }

    pub fn child(&self) -> &Atom {
        &self.child
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub fn tag(&self) -> RepeatTag {
        self.tag
    }

    fn wrap(&self, mut values: Vec<Capture>) -> Capture {
        match self.tag {
            RepeatTag::Repeat => Capture::Repetition(values),
            RepeatTag::Maybe => Capture::Maybe(values.pop().map(Box::new)),
        }
    }
}

impl Matcher for Repetition {
    fn try_match(
        &self,
        owner: &Atom,
        source: &mut dyn ParseSource,
        ctx: &mut Context,
        consume_all: bool,
    ) -> Outcome {
        let start_pos = source.pos();
        let mut values = Vec::new();
        let mut break_on = None;
        let mut stalled = false;

        if self.max == Some(0) {
            return Ok(self.wrap(values));
        }

        loop {
            let before = source.bytepos();
            match self.child.apply(source, ctx, false) {
                Ok(value) => {
                    values.push(value);
                    if self.max.is_some_and(|max| values.len() >= max) {
                        return Ok(self.wrap(values));
                    }
                    // A match that consumed nothing would match forever
                    if source.bytepos() == before {
                        stalled = true;
                        break;
                    }
                }
                Err(failure) => {
                    break_on = failure.into_cause();
                    break;
                }
            }
        }

        // A zero-width match could be repeated up to any minimum
        if values.len() < self.min && !stalled {
            let verbose = ctx.verbose();
            return Err(ctx.err_at(owner, source, start_pos, break_on.into_iter().collect(), |_| {
                format!(
                    "Expected at least {} of {}",
                    self.min,
                    self.child.inspect(Precedence::Outer, verbose)
                )
            }));
        }

        if consume_all && source.chars_left() > 0 {
            return Err(ctx.err(owner, source, break_on.into_iter().collect(), |_| {
                "Extra input after last repetition".to_string()
            }));
        }

        Ok(self.wrap(values))
    }

    fn lookahead(&self, source: &dyn ParseSource) -> bool {
        self.min == 0 || self.child.lookahead(source)
    }

    fn precedence(&self) -> Precedence {
        Precedence::Repetition
    }

    fn render(&self, verbose: bool) -> String {
        let inner = self.child.inspect(Precedence::Repetition, verbose);
        match (self.tag, self.max) {
            (RepeatTag::Maybe, _) => format!("{}?", inner),
            (RepeatTag::Repeat, Some(max)) => format!("{}{{{}, {}}}", inner, self.min, max),
            (RepeatTag::Repeat, None) => format!("{}{{{}, }}", inner, self.min),
        }
    }
}
