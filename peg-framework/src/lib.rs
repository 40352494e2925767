//! PEG Framework
//!
//! A parsing expression grammar engine. Grammars are built from [`Atom`]s,
//! matched against a [`ParseSource`] and produce a [`Tree`] of captures or a
//! [`ParseFailed`] error explaining the deepest failure.

pub mod atoms;
pub mod capture;
pub mod cause;
pub mod context;
pub mod dsl;
pub mod error;
pub mod flatten;
pub mod parser;
pub mod reporter;
pub mod tree;

pub use atoms::{Atom, AtomKind, Matcher, Precedence};
pub use capture::{Capture, Failure, Outcome};
pub use cause::Cause;
pub use common_framework::{Position, Slice};
pub use context::Context;
pub use error::{GrammarError, ParseFailed};
pub use flatten::MergeWarning;
pub use parser::{Grammar, ParseOptions, Parsed};
pub use reporter::{Contextual, Deepest, ErrorReporter, ReporterKind, TreeReporter};
pub use source_framework::{ParseSource, StrSource};
pub use tree::Tree;

#[doc(hidden)]
pub use once_cell::sync::OnceCell as __OnceCell;
