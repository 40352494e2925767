use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A position inside the parsed input.
///
/// Positions carry both the byte offset (used for seeking and ordering) and
/// the character offset (used for Unicode-aware reporting). Two positions are
/// ordered and compared solely by their byte offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct Position {
    /// Byte offset from the start of the input
    pub bytepos: usize,
    /// Character (code point) offset from the start of the input
    pub charpos: usize,
}

impl Position {
    /// Creates a position at the start of the input.
    pub fn new() -> Self {
        Self {
            bytepos: 0,
            charpos: 0,
        }
    }

    /// Creates a position with the given values.
    pub fn at(bytepos: usize, charpos: usize) -> Self {
        Self { bytepos, charpos }
    }

    /// Computes the position of byte offset `bytepos` inside `text`.
    ///
    /// Offsets past the end are clamped to the end of the text. Offsets that
    /// fall inside a multi-byte character are moved back to its first byte.
    pub fn in_text(text: &str, bytepos: usize) -> Self {
        let mut bytepos = bytepos.min(text.len());
        while !text.is_char_boundary(bytepos) {
            bytepos -= 1;
        }
        Self {
            bytepos,
            charpos: text[..bytepos].chars().count(),
        }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.bytepos == other.bytepos
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytepos.hash(state);
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytepos.cmp(&other.bytepos)
    }
}
