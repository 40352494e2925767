use super::{Atom, Matcher};
use crate::capture::{Capture, Outcome};
use crate::context::Context;
use source_framework::ParseSource;

/// Matches a literal string.
#[derive(Debug, Clone)]
pub struct Str {
    text: String,
    len: usize,
}

impl Str {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            len: text.chars().count(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Matcher for Str {
    fn try_match(
        &self,
        owner: &Atom,
        source: &mut dyn ParseSource,
        ctx: &mut Context,
        _consume_all: bool,
    ) -> Outcome {
        if source.starts_with(&self.text) {
            return Ok(Capture::Str(source.consume(self.len)));
        }

        if source.chars_left() < self.len {
            return Err(ctx.err(owner, source, Vec::new(), |_| {
                "Premature end of input".to_string()
            }));
        }

        let error_pos = source.pos();
        Err(ctx.err_at(owner, source, error_pos, Vec::new(), |source| {
            format!(
                "Expected {:?}, but got {:?}",
                self.text,
                source.peek(self.len).as_str()
            )
        }))
    }

    #[inline]
    fn lookahead(&self, source: &dyn ParseSource) -> bool {
        source.starts_with(&self.text)
    }

    fn first_char_key(&self) -> Option<String> {
        self.text
            .chars()
            .next()
            .map(|ch| regex::escape(ch.encode_utf8(&mut [0; 4])))
    }

    fn render(&self, _verbose: bool) -> String {
        format!("'{}'", self.text)
    }
}
