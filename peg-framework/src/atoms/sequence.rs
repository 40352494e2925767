use super::re::anchored;
use super::{Atom, Matcher, Precedence};
use crate::capture::{Capture, Failure, Outcome};
use crate::context::Context;
use once_cell::sync::OnceCell;
use regex::Regex;
use source_framework::ParseSource;

/// Matches its children one after the other.
#[derive(Clone)]
pub struct Sequence {
    children: Vec<Atom>,
    fused: OnceCell<Option<Regex>>,
}

impl Sequence {
    pub fn new(children: Vec<Atom>) -> Self {
        Self {
            children,
            fused: OnceCell::new(),
        }
    }

    pub fn children(&self) -> &[Atom] {
        &self.children
    }

    /// The combined lookahead pattern of a sequence of single-character
    /// classes, built on first use.
    pub fn fused(&self) -> Option<&Regex> {
        self.fused.get_or_init(|| fuse(&self.children)).as_ref()
    }
}

/// Concatenates the patterns of a run of single-character classes,
/// optionally closed by a positive lookahead on a class.
///
/// A trailing negative lookahead is left out of the pattern; only the
/// classes before it are fused.
fn fuse(children: &[Atom]) -> Option<Regex> {
    let (last, init) = children.split_last()?;

    let mut pattern = String::new();
    for child in init {
        let re = child.as_re().filter(|re| re.is_single_char())?;
        pattern.push_str(&re.group());
    }

    if let Some(re) = last.as_re().filter(|re| re.is_single_char()) {
        pattern.push_str(&re.group());
    } else if let Some(lookahead) = last.as_lookahead() {
        let re = lookahead.bound().as_re().filter(|re| re.is_single_char())?;
        if lookahead.positive() {
            pattern.push_str(&re.group());
        } else if init.is_empty() {
            return None;
        }
    } else {
        return None;
    }

    anchored(&pattern).ok()
}

impl Matcher for Sequence {
    fn try_match(
        &self,
        owner: &Atom,
        source: &mut dyn ParseSource,
        ctx: &mut Context,
        consume_all: bool,
    ) -> Outcome {
        let mut values = Vec::with_capacity(self.children.len());
        let last = self.children.len().saturating_sub(1);

        for (idx, child) in self.children.iter().enumerate() {
            if ctx.prune() && !child.lookahead(source) {
                return Err(Failure::silent());
            }

            let child_consume_all = consume_all && idx == last;
            match child.apply(source, ctx, child_consume_all) {
                Ok(value) => values.push(value),
                Err(failure) => {
                    let verbose = ctx.verbose();
                    let children = failure.into_cause().into_iter().collect();
                    return Err(ctx.err(owner, source, children, |_| {
                        format!("Failed to match sequence ({})", owner.inspect(Precedence::Outer, verbose))
                    }));
                }
            }
        }

        Ok(Capture::Sequence(values))
    }

    fn lookahead(&self, source: &dyn ParseSource) -> bool {
        match self.fused() {
            Some(regex) => source.lookahead(regex),
            None => self.children.first().map_or(true, |child| child.lookahead(source)),
        }
    }

    fn first_char_key(&self) -> Option<String> {
        self.children.first().and_then(Atom::first_char_key)
    }

    fn precedence(&self) -> Precedence {
        Precedence::Sequence
    }

    fn render(&self, verbose: bool) -> String {
        self.children
            .iter()
            .map(|child| child.inspect(Precedence::Sequence, verbose))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
