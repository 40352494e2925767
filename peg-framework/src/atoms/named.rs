use super::{Atom, Matcher, Precedence};
use crate::capture::{Capture, Outcome};
use crate::context::Context;
use crate::flatten::flatten;
use crate::tree::Tree;
use source_framework::ParseSource;
use std::collections::BTreeMap;

/// Stores the flattened result of its child under a key.
#[derive(Clone)]
pub struct Named {
    child: Atom,
    name: String,
}

impl Named {
    pub fn new(child: Atom, name: impl Into<String>) -> Self {
        Self {
            child,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn child(&self) -> &Atom {
        &self.child
    }
}

impl Matcher for Named {
    fn try_match(
        &self,
        _owner: &Atom,
        source: &mut dyn ParseSource,
        ctx: &mut Context,
        consume_all: bool,
    ) -> Outcome {
        let value = self.child.apply(source, ctx, consume_all)?;
        let tree = flatten(value, true, ctx.warnings_mut());

        let mut map = BTreeMap::new();
        map.insert(self.name.clone(), tree);
        Ok(Capture::Tree(Tree::Map(map)))
    }

    fn lookahead(&self, source: &dyn ParseSource) -> bool {
        self.child.lookahead(source)
    }

    fn first_char_key(&self) -> Option<String> {
        self.child.first_char_key()
    }

    fn render(&self, verbose: bool) -> String {
        format!("{}:{}", self.name, self.child.inspect(Precedence::Base, verbose))
    }
}
