use super::{Atom, Matcher};
use crate::capture::{Capture, Outcome};
use crate::context::Context;
use crate::error::GrammarError;
use regex::Regex;
use source_framework::ParseSource;

/// Matches a single character against a regular expression.
///
/// The pattern is anchored at the current position and `.` matches
/// newlines. Exactly one character is consumed on success, so the pattern
/// is normally a character class.
#[derive(Debug, Clone)]
pub struct Re {
    pattern: String,
    regex: Regex,
}

impl Re {
    pub fn new(pattern: &str) -> Result<Self, GrammarError> {
        let regex = anchored(pattern)?;
        Ok(Self {
            pattern: pattern.to_owned(),
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// True if the pattern always matches exactly one character.
    pub(crate) fn is_single_char(&self) -> bool {
        self.pattern == "." || is_bracket_class(&self.pattern)
    }

    /// The pattern wrapped for concatenation with other patterns.
    pub(crate) fn group(&self) -> String {
        format!("(?s:{})", self.pattern)
    }
}

/// Compiles `pattern` anchored at the start of the input.
pub(crate) fn anchored(pattern: &str) -> Result<Regex, GrammarError> {
    Regex::new(&format!("^(?s:{})", pattern)).map_err(|source| GrammarError::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })
}

/// True if the whole pattern is a single bracketed class such as `[a-z]`.
fn is_bracket_class(pattern: &str) -> bool {
    let bytes = pattern.as_bytes();
    if bytes.first() != Some(&b'[') {
        return false;
    }

    let mut idx = 1;
    if bytes.get(idx) == Some(&b'^') {
        idx += 1;
    }
    // A leading ']' is a literal
    if bytes.get(idx) == Some(&b']') {
        idx += 1;
    }

    let mut depth = 1;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\\' => idx += 1,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return idx == bytes.len() - 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    false
}

impl Matcher for Re {
    fn try_match(
        &self,
        owner: &Atom,
        source: &mut dyn ParseSource,
        ctx: &mut Context,
        _consume_all: bool,
    ) -> Outcome {
        if source.matches(&self.regex) {
            return Ok(Capture::Str(source.consume(1)));
        }

        if source.chars_left() < 1 {
            return Err(ctx.err(owner, source, Vec::new(), |_| {
                "Premature end of input".to_string()
            }));
        }

        Err(ctx.err(owner, source, Vec::new(), |_| {
            format!("Failed to match {}", self.render(false))
        }))
    }

    #[inline]
    fn lookahead(&self, source: &dyn ParseSource) -> bool {
        source.lookahead(&self.regex)
    }

    fn first_char_key(&self) -> Option<String> {
        is_bracket_class(&self.pattern).then(|| self.pattern.clone())
    }

    fn render(&self, _verbose: bool) -> String {
        let quoted = format!("{:?}", self.pattern);
        quoted[1..quoted.len() - 1].to_string()
    }
}
