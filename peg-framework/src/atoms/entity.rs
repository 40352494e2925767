use super::{Atom, Matcher};
use crate::capture::Outcome;
use crate::context::Context;
use once_cell::sync::OnceCell;
use source_framework::ParseSource;
use std::fmt;
use std::sync::Arc;

/// A named rule whose atom is built on first use.
///
/// Deferring construction lets rules refer to themselves and to rules
/// defined later.
#[derive(Clone)]
pub struct Entity {
    name: String,
    block: Arc<dyn Fn() -> Atom + Send + Sync>,
    resolved: OnceCell<Atom>,
}

impl Entity {
    pub fn new<F>(name: impl Into<String>, block: F) -> Self
    where
        F: Fn() -> Atom + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            block: Arc::new(block),
            resolved: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rule's atom, building it on the first call.
    pub fn atom(&self) -> &Atom {
        self.resolved.get_or_init(|| (self.block)())
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("resolved", &self.resolved.get().is_some())
            .finish()
    }
}

impl Matcher for Entity {
    fn try_match(
        &self,
        _owner: &Atom,
        source: &mut dyn ParseSource,
        ctx: &mut Context,
        consume_all: bool,
    ) -> Outcome {
        self.atom().apply(source, ctx, consume_all)
    }

    fn render(&self, _verbose: bool) -> String {
        self.name.to_uppercase()
    }
}
