use crate::atoms::Atom;
use crate::capture::Capture;
use crate::cause::Cause;
use crate::context::Context;
use crate::error::ParseFailed;
use crate::flatten::{flatten, MergeWarning};
use crate::reporter::ReporterKind;
use crate::tree::Tree;
use source_framework::{ParseSource, StrSource};
use std::sync::Arc;
use tracing::{debug, warn};

/// Options of a single parse.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    reporter: ReporterKind,
    prefix: bool,
    verbose: bool,
    memoize: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            reporter: ReporterKind::default(),
            prefix: false,
            verbose: false,
            memoize: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the reporter used to explain failures.
    pub fn reporter(mut self, reporter: ReporterKind) -> Self {
        self.reporter = reporter;
        self
    }

    /// Accepts a match of a prefix of the input.
    pub fn prefix(mut self, prefix: bool) -> Self {
        self.prefix = prefix;
        self
    }

    /// Lists every alternative in messages and disables first-character
    /// dispatch.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Caches rule results per input position. On by default.
    ///
    /// Turning the cache off reruns a rule every time it is applied, which
    /// can change the shape of error trees: a rule that matched a prefix and
    /// is then applied to the rest of the input fails inside the rule
    /// instead of at the leftover input.
    pub fn memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    pub fn reporter_kind(&self) -> ReporterKind {
        self.reporter
    }

    pub fn is_prefix(&self) -> bool {
        self.prefix
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_memoized(&self) -> bool {
        self.memoize
    }
}

/// A successful parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub tree: Tree,
    /// Duplicate keys met while merging named captures.
    pub warnings: Vec<MergeWarning>,
}

impl Atom {
    /// Parses the whole of `input`.
    pub fn parse(&self, input: &str) -> Result<Tree, ParseFailed> {
        self.parse_with(input, &ParseOptions::default())
            .map(|parsed| parsed.tree)
    }

    pub fn parse_with(&self, input: &str, options: &ParseOptions) -> Result<Parsed, ParseFailed> {
        let mut source = StrSource::new(input);
        self.parse_source(&mut source, options)
    }

    /// Parses `input`, printing the cause tree instead of returning an error.
    pub fn parse_with_debug(&self, input: &str, options: &ParseOptions) -> Option<Tree> {
        match self.parse_with(input, options) {
            Ok(parsed) => Some(parsed.tree),
            Err(error) => {
                print!("{}", error.ascii_tree());
                None
            }
        }
    }

    /// Parses from the current position of `source`.
    ///
    /// The first attempt runs without error reporting. Only if it fails is
    /// the input rewound and parsed again with the configured reporter, to
    /// find out why.
    pub fn parse_source(
        &self,
        source: &mut dyn ParseSource,
        options: &ParseOptions,
    ) -> Result<Parsed, ParseFailed> {
        let start = source.pos();
        let consume_all = !options.is_prefix();

        let mut ctx = Context::fast(options.is_verbose(), options.is_memoized());
        if let Ok(value) = self.apply(source, &mut ctx, consume_all) {
            return Ok(finish(value, &mut ctx));
        }

        debug!(reporter = ?options.reporter_kind(), "parse failed, rerunning with error reporting");
        source.restore(start);
        let mut ctx = Context::reporting(
            options.reporter_kind().build(),
            options.is_verbose(),
            options.is_memoized(),
        );
        match self.apply(source, &mut ctx, consume_all) {
            Ok(value) => {
                warn!("input rejected without error reporting was accepted with it");
                Ok(finish(value, &mut ctx))
            }
            Err(failure) => {
                let cause = failure.into_cause().unwrap_or_else(|| {
                    Arc::new(Cause::format(&*source, start, "Failed to parse input", Vec::new()))
                });
                Err(ParseFailed::new(cause))
            }
        }
    }
}

fn finish(value: Capture, ctx: &mut Context) -> Parsed {
    let tree = flatten(value, false, ctx.warnings_mut());
    Parsed {
        tree,
        warnings: ctx.take_warnings(),
    }
}

/// A grammar with a root rule.
///
/// ```
/// use peg_framework::{rule, Atom, Grammar};
/// use peg_framework::dsl::*;
///
/// struct Digits;
///
/// impl Digits {
///     rule!(fn digit() { re("[0-9]") });
///     rule!(fn digits() { Self::digit().repeat(1) });
/// }
///
/// impl Grammar for Digits {
///     fn root(&self) -> Atom {
///         Self::digits()
///     }
/// }
///
/// assert_eq!(Digits.parse("123").unwrap(), "123");
/// ```
pub trait Grammar {
    fn root(&self) -> Atom;

    fn parse(&self, input: &str) -> Result<Tree, ParseFailed> {
        self.root().parse(input)
    }

    fn parse_with(&self, input: &str, options: &ParseOptions) -> Result<Parsed, ParseFailed> {
        self.root().parse_with(input, options)
    }

    fn parse_with_debug(&self, input: &str, options: &ParseOptions) -> Option<Tree> {
        self.root().parse_with_debug(input, options)
    }
}

impl Grammar for Atom {
    fn root(&self) -> Atom {
        self.clone()
    }
}

/// Defines a rule: a function returning a shared, lazily built entity.
///
/// The rule body may call the rule itself or rules defined later. The
/// entity is named after the function unless a name is given with `as`.
///
/// ```
/// use peg_framework::rule;
/// use peg_framework::dsl::*;
///
/// rule!(fn parens() { str("(") >> parens().maybe() >> str(")") });
/// rule!(fn space_opt() as "space?" { str(" ").repeat(0) });
///
/// assert!(parens().parse("((()))").is_ok());
/// assert_eq!(space_opt().to_string(), "SPACE?");
/// ```
#[macro_export]
macro_rules! rule {
    ($(#[$meta:meta])* $vis:vis fn $name:ident() as $label:tt $body:block) => {
        $(#[$meta])*
        $vis fn $name() -> $crate::Atom {
            static RULE: $crate::__OnceCell<$crate::Atom> = $crate::__OnceCell::new();
            RULE.get_or_init(|| $crate::dsl::entity($label, || $body)).clone()
        }
    };
    ($(#[$meta:meta])* $vis:vis fn $name:ident() $body:block) => {
        $crate::rule!($(#[$meta])* $vis fn $name() as (stringify!($name)) $body);
    };
}
