use common_framework::{Position, Slice};
use regex::Regex;

/// The input a grammar is matched against.
///
/// Atoms only ever see a `&mut dyn ParseSource`, so any buffer that can
/// report positions, test anchored patterns and hand out [`Slice`]s can be
/// parsed. All counts are in characters; positions additionally carry the
/// byte offset used for seeking.
pub trait ParseSource {
    /// Returns the current position.
    fn pos(&self) -> Position;

    /// Returns the current byte offset.
    fn bytepos(&self) -> usize {
        self.pos().bytepos
    }

    /// Moves to the given byte offset, recomputing the character offset.
    fn set_bytepos(&mut self, bytepos: usize);

    /// Rewinds (or advances) to a position previously returned by [`pos`].
    ///
    /// [`pos`]: ParseSource::pos
    fn restore(&mut self, pos: Position);

    /// Returns the number of characters left after the current position.
    fn chars_left(&self) -> usize;

    /// Returns true if the input is exhausted.
    fn is_eof(&self) -> bool {
        self.chars_left() == 0
    }

    /// Tests a start-anchored pattern against the remaining input.
    fn lookahead(&self, pattern: &Regex) -> bool;

    /// Same as [`lookahead`](ParseSource::lookahead).
    fn matches(&self, pattern: &Regex) -> bool {
        self.lookahead(pattern)
    }

    /// Returns true if the remaining input starts with `literal`.
    fn starts_with(&self, literal: &str) -> bool;

    /// Consumes up to `n` characters and returns them.
    fn consume(&mut self, n: usize) -> Slice;

    /// Returns up to `n` characters without consuming them.
    fn peek(&self, n: usize) -> Slice;

    /// Returns the 1-based line and column of a byte offset, defaulting to
    /// the current position.
    fn line_and_column(&self, bytepos: Option<usize>) -> (usize, usize);
}
