use common_framework::Position;
use source_framework::ParseSource;
use std::fmt;
use std::sync::Arc;

/// Why a parse failed, as a tree of nested failures.
///
/// Every node records its message and the position it applies to; the
/// children are the failures of the sub-atoms that caused this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    message: String,
    pos: Position,
    line: usize,
    column: usize,
    children: Vec<Arc<Cause>>,
    context: Option<String>,
}

impl Cause {
    /// Creates a cause at `pos`, resolving its line and column in `source`.
    pub fn format(
        source: &dyn ParseSource,
        pos: Position,
        message: impl Into<String>,
        children: Vec<Arc<Cause>>,
    ) -> Self {
        let (line, column) = source.line_and_column(Some(pos.bytepos));
        Self {
            message: message.into(),
            pos,
            line,
            column,
            children,
            context: None,
        }
    }

    /// Attaches the label of the atom that failed.
    pub fn with_label(mut self, label: &str) -> Self {
        self.context = Some(format!(" when parsing {}", label));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn children(&self) -> &[Arc<Cause>] {
        &self.children
    }

    /// Returns the `" when parsing LABEL"` suffix, if a label was attached.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Renders the cause and all of its children as an indented tree.
    ///
    /// ```text
    /// Failed to match sequence ('a' 'b') at line 1 char 2.
    /// `- Premature end of input at line 1 char 2.
    /// ```
    pub fn ascii_tree(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, &mut vec![true]);
        out
    }

    fn write_tree(&self, out: &mut String, last_flags: &mut Vec<bool>) {
        if last_flags.len() >= 2 {
            for &last in &last_flags[1..last_flags.len() - 1] {
                out.push_str(if last { "   " } else { "|  " });
            }
            out.push_str(if last_flags[last_flags.len() - 1] {
                "`- "
            } else {
                "|- "
            });
        }
        out.push_str(&self.to_string());
        out.push('\n');

        let count = self.children.len();
        for (idx, child) in self.children.iter().enumerate() {
            last_flags.push(idx + 1 == count);
            child.write_tree(out, last_flags);
            last_flags.pop();
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} at line {} char {}.",
            self.message,
            self.context.as_deref().unwrap_or(""),
            self.line,
            self.column
        )
    }
}
