//! Parser atoms and the matching protocol they share.
//!
//! An [`Atom`] is a cheap, clonable handle to an immutable matcher. Atoms
//! are combined with `>>` (sequence), `|` (ordered choice) and the builder
//! methods on [`Atom`] into grammars, which can be shared freely between
//! threads.

mod alternative;
mod entity;
mod literal;
mod lookahead;
mod named;
mod re;
mod repetition;
mod sequence;

pub use alternative::Alternative;
pub use entity::Entity;
pub use literal::Str;
pub use lookahead::Lookahead;
pub use named::Named;
pub use re::Re;
pub use repetition::{RepeatTag, Repetition};
pub use sequence::Sequence;

use crate::capture::Outcome;
use crate::context::Context;
use crate::error::GrammarError;
use source_framework::ParseSource;
use std::fmt;
use std::ops::{BitOr, Shr};
use std::sync::Arc;

/// Binding strength of an atom when rendered, from tightest to loosest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Base = 1,
    Lookahead,
    Repetition,
    Sequence,
    Alternate,
    Outer,
}

/// The capability set shared by all atom kinds.
pub trait Matcher {
    /// Tries to match at the current position of `source`.
    ///
    /// `owner` is the atom handle wrapping this matcher, used when
    /// reporting failures. The position may be left anywhere on failure;
    /// [`Atom::apply`] rewinds it.
    fn try_match(
        &self,
        owner: &Atom,
        source: &mut dyn ParseSource,
        ctx: &mut Context,
        consume_all: bool,
    ) -> Outcome;

    /// Cheap pre-check: could this matcher succeed here?
    ///
    /// Returning `true` is always safe; returning `false` for input the
    /// matcher would accept is a bug.
    #[inline]
    fn lookahead(&self, source: &dyn ParseSource) -> bool {
        let _ = source;
        true
    }

    /// Pattern matching the first character of any successful match, or
    /// `None` if unknown.
    fn first_char_key(&self) -> Option<String> {
        None
    }

    fn precedence(&self) -> Precedence {
        Precedence::Base
    }

    /// Renders the matcher without surrounding parentheses.
    fn render(&self, verbose: bool) -> String;
}

/// A parser atom.
#[derive(Clone)]
pub struct Atom(Arc<AtomNode>);

struct AtomNode {
    kind: AtomKind,
    label: Option<String>,
}

/// The closed set of atom kinds.
#[derive(Clone)]
pub enum AtomKind {
    Str(Str),
    Re(Re),
    Sequence(Sequence),
    Alternative(Alternative),
    Repetition(Repetition),
    Lookahead(Lookahead),
    Named(Named),
    Entity(Entity),
}

impl AtomKind {
    fn matcher(&self) -> &dyn Matcher {
        match self {
            AtomKind::Str(atom) => atom,
            AtomKind::Re(atom) => atom,
            AtomKind::Sequence(atom) => atom,
            AtomKind::Alternative(atom) => atom,
            AtomKind::Repetition(atom) => atom,
            AtomKind::Lookahead(atom) => atom,
            AtomKind::Named(atom) => atom,
            AtomKind::Entity(atom) => atom,
        }
    }
}

impl Atom {
    pub fn new(kind: AtomKind) -> Self {
        Atom(Arc::new(AtomNode { kind, label: None }))
    }

    /// Matches the literal `text`.
    pub fn str(text: &str) -> Self {
        Atom::new(AtomKind::Str(Str::new(text)))
    }

    /// Matches one character against a regular expression, usually a
    /// character class such as `[a-z]`.
    pub fn try_re(pattern: &str) -> Result<Self, GrammarError> {
        Ok(Atom::new(AtomKind::Re(Re::new(pattern)?)))
    }

    pub fn kind(&self) -> &AtomKind {
        &self.0.kind
    }

    pub fn label_text(&self) -> Option<&str> {
        self.0.label.as_deref()
    }

    /// Returns a copy of this atom that renders as `label` and names it in
    /// error messages.
    pub fn label(&self, label: impl Into<String>) -> Atom {
        Atom(Arc::new(AtomNode {
            kind: self.0.kind.clone(),
            label: Some(label.into()),
        }))
    }

    /// Repeats this atom at least `min` times.
    pub fn repeat(&self, min: usize) -> Atom {
        Atom::new(AtomKind::Repetition(Repetition::new(
            self.clone(),
            min,
            None,
            RepeatTag::Repeat,
        )))
    }

    /// Repeats this atom between `min` and `max` times.
    pub fn repeat_range(&self, min: usize, max: usize) -> Atom {
        Atom::new(AtomKind::Repetition(Repetition::new(
            self.clone(),
            min,
            Some(max),
            RepeatTag::Repeat,
        )))
    }

    /// Matches this atom or nothing.
    pub fn maybe(&self) -> Atom {
        Atom::new(AtomKind::Repetition(Repetition::new(
            self.clone(),
            0,
            Some(1),
            RepeatTag::Maybe,
        )))
    }

    /// Stores the flattened result of this atom under `key`.
    pub fn named(&self, key: impl Into<String>) -> Atom {
        Atom::new(AtomKind::Named(Named::new(self.clone(), key)))
    }

    /// Succeeds without consuming if this atom would match.
    pub fn present(&self) -> Atom {
        Atom::new(AtomKind::Lookahead(Lookahead::new(self.clone(), true)))
    }

    /// Succeeds without consuming if this atom would not match.
    pub fn absent(&self) -> Atom {
        Atom::new(AtomKind::Lookahead(Lookahead::new(self.clone(), false)))
    }

    /// Applies the atom, rewinding on failure.
    ///
    /// With `consume_all`, a match that leaves input behind is turned into
    /// a failure pointing at the leftover input.
    pub fn apply(&self, source: &mut dyn ParseSource, ctx: &mut Context, consume_all: bool) -> Outcome {
        let old_pos = source.pos();

        match ctx.try_with_cache(self, source, consume_all) {
            Ok(value) => {
                ctx.succ(source);

                if consume_all && !source.is_eof() {
                    let offending_pos = source.pos();
                    let failure = ctx.err_at(self, source, offending_pos, Vec::new(), |source| {
                        format!("Don't know what to do with {:?}", source.peek(10).as_str())
                    });
                    source.restore(old_pos);
                    return Err(failure);
                }
                Ok(value)
            }
            Err(failure) => {
                source.restore(old_pos);
                Err(failure)
            }
        }
    }

    pub(crate) fn try_match(&self, source: &mut dyn ParseSource, ctx: &mut Context, consume_all: bool) -> Outcome {
        self.0.kind.matcher().try_match(self, source, ctx, consume_all)
    }

    /// Cheap pre-check; see [`Matcher::lookahead`].
    pub fn lookahead(&self, source: &dyn ParseSource) -> bool {
        self.0.kind.matcher().lookahead(source)
    }

    pub(crate) fn first_char_key(&self) -> Option<String> {
        self.0.kind.matcher().first_char_key()
    }

    pub fn precedence(&self) -> Precedence {
        self.0.kind.matcher().precedence()
    }

    /// Renders the atom as it appears inside a context of precedence
    /// `outer`, parenthesised if it binds looser than that context.
    pub fn inspect(&self, outer: Precedence, verbose: bool) -> String {
        let own = self.precedence();
        let text = match &self.0.label {
            Some(label) => label.clone(),
            None => self.0.kind.matcher().render(verbose),
        };
        if outer < own {
            format!("({})", text)
        } else {
            text
        }
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub(crate) fn is_cached(&self) -> bool {
        matches!(self.0.kind, AtomKind::Entity(_))
    }

    pub(crate) fn as_re(&self) -> Option<&Re> {
        match &self.0.kind {
            AtomKind::Re(re) => Some(re),
            _ => None,
        }
    }

    pub(crate) fn as_lookahead(&self) -> Option<&Lookahead> {
        match &self.0.kind {
            AtomKind::Lookahead(lookahead) => Some(lookahead),
            _ => None,
        }
    }
}

impl fmt::Display for Atom {
    /// `{:#}` lists every alternative instead of a truncated summary.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect(Precedence::Outer, f.alternate()))
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({})", self)
    }
}

impl Shr for Atom {
    type Output = Atom;

    fn shr(self, rhs: Atom) -> Atom {
        match (&self.0.kind, &self.0.label) {
            (AtomKind::Sequence(seq), None) => {
                let mut children = seq.children().to_vec();
                children.push(rhs);
                Atom::new(AtomKind::Sequence(Sequence::new(children)))
            }
            _ => Atom::new(AtomKind::Sequence(Sequence::new(vec![self, rhs]))),
        }
    }
}

impl BitOr for Atom {
    type Output = Atom;

    fn bitor(self, rhs: Atom) -> Atom {
        match (&self.0.kind, &self.0.label) {
            (AtomKind::Alternative(alt), None) => {
                let mut alternatives = alt.alternatives().to_vec();
                alternatives.push(rhs);
                Atom::new(AtomKind::Alternative(Alternative::new(alternatives)))
            }
            _ => Atom::new(AtomKind::Alternative(Alternative::new(vec![self, rhs]))),
        }
    }
}
