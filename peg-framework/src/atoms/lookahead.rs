use super::{Atom, Matcher, Precedence};
use crate::capture::{Capture, Outcome};
use crate::context::Context;
use source_framework::ParseSource;

/// Zero-width test: succeeds if the bound atom matches (`positive`) or
/// fails (negative) at the current position. Never consumes input.
#[derive(Clone)]
pub struct Lookahead {
    bound: Atom,
    positive: bool,
}

impl Lookahead {
    pub fn new(bound: Atom, positive: bool) -> Self {
        Self { bound, positive }
    }

    pub fn bound(&self) -> &Atom {
        &self.bound
    }

    pub fn positive(&self) -> bool {
        self.positive
    }
}

impl Matcher for Lookahead {
    fn try_match(
        &self,
        owner: &Atom,
        source: &mut dyn ParseSource,
        ctx: &mut Context,
        consume_all: bool,
    ) -> Outcome {
        let start_pos = source.pos();
        let matched = self.bound.apply(source, ctx, consume_all).is_ok();
        source.restore(start_pos);

        if matched == self.positive {
            return Ok(Capture::Nil);
        }

        let verbose = ctx.verbose();
        let expectation = if self.positive {
            "Input should start with"
        } else {
            "Input should not start with"
        };
        Err(ctx.err_at(owner, source, start_pos, Vec::new(), |_| {
            format!(
                "{} {}",
                expectation,
                self.bound.inspect(Precedence::Outer, verbose)
            )
        }))
    }

    fn lookahead(&self, source: &dyn ParseSource) -> bool {
        !self.positive || self.bound.lookahead(source)
    }

    fn precedence(&self) -> Precedence {
        Precedence::Lookahead
    }

    fn render(&self, verbose: bool) -> String {
        let marker = if self.positive { '&' } else { '!' };
        format!("{}{}", marker, self.bound.inspect(Precedence::Lookahead, verbose))
    }
}
