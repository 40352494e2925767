use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Maps byte offsets of a shared buffer to 1-based `(line, column)` pairs.
///
/// Line starts are computed once, on the first query. Columns count
/// characters, so a code point at byte offset `n` is not necessarily at
/// column `n + 1`. A newline belongs to the line it terminates.
pub struct LineCache {
    buffer: Arc<str>,
    line_starts: OnceCell<Vec<usize>>,
}

impl LineCache {
    /// Creates a cache over the given buffer.
    pub fn new(buffer: Arc<str>) -> Self {
        Self {
            buffer,
            line_starts: OnceCell::new(),
        }
    }

    fn line_starts(&self) -> &[usize] {
        self.line_starts.get_or_init(|| {
            let mut starts = vec![0];
            starts.extend(
                self.buffer
                    .bytes()
                    .enumerate()
                    .filter(|(_, b)| *b == b'\n')
                    .map(|(i, _)| i + 1),
            );
            starts
        })
    }

    /// Returns the line and column of the given byte offset.
    ///
    /// Offsets beyond the end of the buffer are clamped to the end.
    pub fn line_and_column(&self, bytepos: usize) -> (usize, usize) {
        let mut bytepos = bytepos.min(self.buffer.len());
        while !self.buffer.is_char_boundary(bytepos) {
            bytepos -= 1;
        }

        let starts = self.line_starts();
        // starts[0] == 0, so the partition point is at least 1
        let line = starts.partition_point(|&start| start <= bytepos);
        let line_start = starts[line - 1];
        let column = self.buffer[line_start..bytepos].chars().count() + 1;
        (line, column)
    }

    /// Returns the number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.line_starts().len()
    }
}

impl fmt::Debug for LineCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineCache")
            .field("len", &self.buffer.len())
            .field("computed", &self.line_starts.get().is_some())
            .finish()
    }
}
