use super::re::anchored;
use super::{Atom, Matcher, Precedence};
use crate::capture::Outcome;
use crate::context::Context;
use once_cell::sync::OnceCell;
use regex::Regex;
use source_framework::ParseSource;

/// Alternatives shown before a summary is used instead.
const SHOWN_ALTERNATIVES: usize = 5;

/// Grouping by first character only pays off for large choices.
const DISPATCH_THRESHOLD: usize = 10;

/// Ordered choice: the first alternative that matches wins.
#[derive(Clone)]
pub struct Alternative {
    alternatives: Vec<Atom>,
    dispatch: OnceCell<Option<Dispatch>>,
}

/// Alternatives grouped by the pattern their first character must match.
#[derive(Debug, Clone)]
struct Dispatch {
    patterns: Vec<Regex>,
    /// Group of every alternative, `None` for alternatives without a key.
    group_of: Vec<Option<usize>>,
}

impl Dispatch {
    fn build(alternatives: &[Atom]) -> Option<Self> {
        if alternatives.len() < DISPATCH_THRESHOLD {
            return None;
        }

        let keys: Vec<Option<String>> = alternatives.iter().map(Atom::first_char_key).collect();
        let keyed = keys.iter().filter(|key| key.is_some()).count();
        if keyed * 2 < alternatives.len() {
            return None;
        }

        let mut key_texts: Vec<String> = Vec::new();
        let mut patterns = Vec::new();
        let mut group_of = Vec::with_capacity(keys.len());
        for key in keys {
            let group = key.and_then(|key| {
                if let Some(idx) = key_texts.iter().position(|known| *known == key) {
                    return Some(idx);
                }
                let pattern = anchored(&key).ok()?;
                key_texts.push(key);
                patterns.push(pattern);
                Some(patterns.len() - 1)
            });
            group_of.push(group);
        }

        Some(Self { patterns, group_of })
    }
}

impl Alternative {
    pub fn new(alternatives: Vec<Atom>) -> Self {
        Self {
            alternatives,
            dispatch: OnceCell::new(),
        }
    }

    pub fn alternatives(&self) -> &[Atom] {
        &self.alternatives
    }

    /// Number of distinct first-character groups, if grouping is active.
    pub fn dispatch_groups(&self) -> Option<usize> {
        self.dispatch().map(|dispatch| dispatch.patterns.len())
    }

    fn dispatch(&self) -> Option<&Dispatch> {
        self.dispatch
            .get_or_init(|| Dispatch::build(&self.alternatives))
            .as_ref()
    }

    /// Renders the alternatives shown in summaries, and how many were left
    /// out.
    fn listing(&self, verbose: bool, outer: Precedence) -> (Vec<String>, usize) {
        let shown = if verbose {
            self.alternatives.len()
        } else {
            SHOWN_ALTERNATIVES.min(self.alternatives.len())
        };
        let items = self.alternatives[..shown]
            .iter()
            .map(|alt| alt.inspect(outer, verbose))
            .collect();
        (items, self.alternatives.len() - shown)
    }

    fn error_message(&self, verbose: bool) -> String {
        let (items, hidden) = self.listing(verbose, Precedence::Outer);
        format!("Expected one of [{}]{}", items.join(", "), more(hidden))
    }

    /// Applies every alternative, collecting all failure causes.
    fn try_all(
        &self,
        owner: &Atom,
        source: &mut dyn ParseSource,
        ctx: &mut Context,
        consume_all: bool,
    ) -> Outcome {
        let mut causes = Vec::new();
        for alt in &self.alternatives {
            match alt.apply(source, ctx, consume_all) {
                Ok(value) => return Ok(value),
                Err(failure) => causes.extend(failure.into_cause()),
            }
        }

        let verbose = ctx.verbose();
        Err(ctx.err(owner, source, causes, |_| self.error_message(verbose)))
    }

    fn try_pruned(
        &self,
        owner: &Atom,
        source: &mut dyn ParseSource,
        ctx: &mut Context,
        consume_all: bool,
    ) -> Outcome {
        let dispatch = if ctx.verbose() { None } else { self.dispatch() };

        match dispatch {
            Some(dispatch) => {
                // Each group is tested at most once per attempt, and only
                // when an alternative of that group is reached.
                let mut verdicts: Vec<Option<bool>> = vec![None; dispatch.patterns.len()];
                for (alt, group) in self.alternatives.iter().zip(&dispatch.group_of) {
                    if let Some(group) = *group {
                        let hit = *verdicts[group]
                            .get_or_insert_with(|| source.lookahead(&dispatch.patterns[group]));
                        if !hit {
                            continue;
                        }
                    }
                    if !alt.lookahead(source) {
                        continue;
                    }
                    if let Ok(value) = alt.apply(source, ctx, consume_all) {
                        return Ok(value);
                    }
                }
            }
            None => {
                for alt in &self.alternatives {
                    if !alt.lookahead(source) {
                        continue;
                    }
                    if let Ok(value) = alt.apply(source, ctx, consume_all) {
                        return Ok(value);
                    }
                }
            }
        }

        let verbose = ctx.verbose();
        Err(ctx.err(owner, source, Vec::new(), |_| self.error_message(verbose)))
    }
}

fn more(hidden: usize) -> String {
    if hidden == 0 {
        String::new()
    } else {
        format!(" and ({}) more", hidden)
    }
}

impl Matcher for Alternative {
    fn try_match(
        &self,
        owner: &Atom,
        source: &mut dyn ParseSource,
        ctx: &mut Context,
        consume_all: bool,
    ) -> Outcome {
        if ctx.prune() {
            self.try_pruned(owner, source, ctx, consume_all)
        } else {
            self.try_all(owner, source, ctx, consume_all)
        }
    }

    fn precedence(&self) -> Precedence {
        Precedence::Alternate
    }

    fn render(&self, verbose: bool) -> String {
        let (items, hidden) = self.listing(verbose, Precedence::Alternate);
        format!("{}{}", items.join(" / "), more(hidden))
    }
}

#[cfg(test)]
mod tests {
    use crate::atoms::AtomKind;
    use crate::dsl::*;
    use crate::Atom;

    fn keywords(count: usize) -> Atom {
        (0..count)
            .map(|idx| str(&format!("kw{}", idx)))
            .reduce(|acc, atom| acc | atom)
            .unwrap()
    }

    fn groups(atom: &Atom) -> Option<usize> {
        match atom.kind() {
            AtomKind::Alternative(alt) => alt.dispatch_groups(),
            _ => None,
        }
    }

    #[test]
    fn test_render_truncates_after_five() {
        let atom = keywords(7);
        assert_eq!(
            atom.to_string(),
            "'kw0' / 'kw1' / 'kw2' / 'kw3' / 'kw4' and (2) more"
        );
        assert_eq!(
            format!("{:#}", atom),
            "'kw0' / 'kw1' / 'kw2' / 'kw3' / 'kw4' / 'kw5' / 'kw6'"
        );
    }

    #[test]
    fn test_dispatch_needs_many_keyed_alternatives() {
        assert_eq!(groups(&keywords(9)), None);
        assert_eq!(groups(&keywords(12)), Some(1));

        let mixed = (str("a") | str("b") | str("c") | str("d"))
            | re("[x]")
            | re("a|b").named("x")
            | any()
            | any()
            | any()
            | any()
            | any();
        // Only 5 of 11 alternatives have a key
        assert_eq!(groups(&mixed), None);
    }

    #[test]
    fn test_dispatch_groups_by_first_char() {
        let atom = ["apple", "avocado", "banana", "blueberry", "cherry", "date", "elder", "fig", "grape", "guava"]
            .iter()
            .map(|word| str(word))
            .reduce(|acc, atom| acc | atom)
            .unwrap();
        assert_eq!(groups(&atom), Some(7));
    }
}
