use crate::traits::ParseSource;
use common_framework::{LineCache, Position, Slice};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// A [`ParseSource`] over an in-memory string.
///
/// The buffer is shared with every [`Slice`] the source hands out, so
/// captured text never copies the input.
#[derive(Clone)]
pub struct StrSource {
    buffer: Arc<str>,
    position: Position,
    total_chars: usize,
    line_cache: Arc<LineCache>,
}

impl StrSource {
    /// Creates a source from the input string.
    pub fn new<S: Into<String>>(input: S) -> Self {
        let owned = input.into();
        Self::with_arc(Arc::<str>::from(owned))
    }

    /// Creates a source from an existing shared buffer.
    pub fn with_arc(buffer: Arc<str>) -> Self {
        Self {
            total_chars: buffer.chars().count(),
            line_cache: Arc::new(LineCache::new(buffer.clone())),
            position: Position::new(),
            buffer,
        }
    }

    /// Returns the whole input.
    pub fn buffer(&self) -> &Arc<str> {
        &self.buffer
    }

    /// Returns the remaining input.
    pub fn remaining(&self) -> &str {
        &self.buffer[self.position.bytepos..]
    }

    /// Returns the byte offset after `n` characters of remaining input.
    fn end_after(&self, n: usize) -> usize {
        let remaining = self.remaining();
        remaining
            .char_indices()
            .nth(n)
            .map(|(i, _)| self.position.bytepos + i)
            .unwrap_or(self.buffer.len())
    }

    fn slice(&self, end: usize) -> Slice {
        Slice::from_shared(
            self.buffer.clone(),
            self.position.bytepos,
            end,
            self.position,
            Some(self.line_cache.clone()),
        )
    }
}

impl ParseSource for StrSource {
    fn pos(&self) -> Position {
        self.position
    }

    fn set_bytepos(&mut self, bytepos: usize) {
        self.position = Position::in_text(&self.buffer, bytepos);
    }

    fn restore(&mut self, pos: Position) {
        self.position = pos;
    }

    fn chars_left(&self) -> usize {
        self.total_chars.saturating_sub(self.position.charpos)
    }

    fn lookahead(&self, pattern: &Regex) -> bool {
        pattern.is_match(self.remaining())
    }

    fn starts_with(&self, literal: &str) -> bool {
        self.remaining().starts_with(literal)
    }

    fn consume(&mut self, n: usize) -> Slice {
        let end = self.end_after(n);
        let slice = self.slice(end);
        self.position = Position::at(end, self.position.charpos + slice.chars().count());
        slice
    }

    fn peek(&self, n: usize) -> Slice {
        self.slice(self.end_after(n))
    }

    fn line_and_column(&self, bytepos: Option<usize>) -> (usize, usize) {
        self.line_cache
            .line_and_column(bytepos.unwrap_or(self.position.bytepos))
    }
}

impl fmt::Debug for StrSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrSource")
            .field("position", &self.position)
            .field("chars_left", &self.chars_left())
            .finish()
    }
}
