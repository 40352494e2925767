use crate::{LineCache, Position};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::{ParseFloatError, ParseIntError};
use std::ops::{Add, Deref};
use std::str::FromStr;
use std::sync::Arc;

/// Immutable, position-tagged view of matched input.
///
/// The slice keeps an `Arc<str>` alive so that it can be freely cloned and
/// moved around without worrying about lifetimes. It implements `Deref<Target =
/// str>` which allows it to be used transparently as `&str` in most places.
///
/// Equality and hashing look at the text only: two slices with the same
/// content taken from different places of the input are equal.
#[derive(Clone)]
pub struct Slice {
    buffer: Arc<str>,
    start: usize,
    end: usize,
    position: Position,
    line_cache: Option<Arc<LineCache>>,
}

impl Slice {
    /// Creates a slice owning a copy of `text`, located at `position`.
    pub fn new(position: Position, text: &str, line_cache: Option<Arc<LineCache>>) -> Self {
        Self {
            buffer: Arc::from(text),
            start: 0,
            end: text.len(),
            position,
            line_cache,
        }
    }

    /// Creates a slice over the byte range `start..end` of a shared buffer.
    pub fn from_shared(
        buffer: Arc<str>,
        start: usize,
        end: usize,
        position: Position,
        line_cache: Option<Arc<LineCache>>,
    ) -> Self {
        debug_assert!(start <= end);
        debug_assert!(end <= buffer.len());
        Self {
            buffer,
            start,
            end,
            position,
            line_cache,
        }
    }

    /// Returns the text of the slice.
    pub fn as_str(&self) -> &str {
        &self.buffer[self.start..self.end]
    }

    /// Returns the position of the first character.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the character offset of the first character.
    pub fn offset(&self) -> usize {
        self.position.charpos
    }

    /// Returns the `(line, column)` of the slice start, if the slice was
    /// taken from a source that tracks lines.
    pub fn line_and_column(&self) -> Option<(usize, usize)> {
        self.line_cache
            .as_ref()
            .map(|cache| cache.line_and_column(self.position.bytepos))
    }

    /// Concatenates two slices, keeping the offset of `self`.
    ///
    /// Adjacent slices of the same buffer are joined without copying.
    pub fn concat(&self, other: &Slice) -> Slice {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        if Arc::ptr_eq(&self.buffer, &other.buffer) && self.end == other.start {
            return Slice {
                end: other.end,
                ..self.clone()
            };
        }

        let mut text = String::with_capacity(self.len() + other.len());
        text.push_str(self.as_str());
        text.push_str(other.as_str());
        Slice::new(self.position, &text, self.line_cache.clone())
    }

    /// Parses the text as an integer.
    pub fn to_int(&self) -> Result<i64, ParseIntError> {
        self.as_str().trim().parse()
    }

    /// Parses the text as a float.
    pub fn to_float(&self) -> Result<f64, ParseFloatError> {
        self.as_str().trim().parse()
    }

    /// Returns the text as an owned key, for use in maps.
    pub fn to_symbol(&self) -> String {
        self.as_str().to_owned()
    }

    /// Parses the text into any `FromStr` type.
    pub fn parse_as<T: FromStr>(&self) -> Result<T, T::Err> {
        self.as_str().parse()
    }
}

impl Default for Slice {
    fn default() -> Self {
        Slice::from("")
    }
}

impl From<&str> for Slice {
    fn from(text: &str) -> Self {
        Slice::new(Position::new(), text, None)
    }
}

impl From<String> for Slice {
    fn from(text: String) -> Self {
        let end = text.len();
        Slice::from_shared(Arc::from(text), 0, end, Position::new(), None)
    }
}

impl Add for Slice {
    type Output = Slice;

    fn add(self, rhs: Slice) -> Slice {
        self.concat(&rhs)
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}", self.as_str(), self.offset())
    }
}

impl Deref for Slice {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for Slice {
    fn as_ref(&self) -> &str {
        self
    }
}

impl PartialEq for Slice {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Slice {}

impl Hash for Slice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialEq<str> for Slice {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Slice {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<Slice> for &str {
    fn eq(&self, other: &Slice) -> bool {
        *self == other.as_str()
    }
}
