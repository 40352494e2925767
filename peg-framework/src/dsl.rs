//! Short constructors for writing grammars.
//!
//! ```
//! use peg_framework::dsl::*;
//!
//! let word = re("[a-z]").repeat(1);
//! let greeting = str("hello") >> str(" ") >> word.named("name");
//! assert_eq!(greeting.parse("hello world").unwrap()["name"], "world");
//! ```

use crate::atoms::{Atom, AtomKind, Entity};

/// Matches the literal `text`.
pub fn str(text: &str) -> Atom {
    Atom::str(text)
}

/// Matches one character against `pattern`.
///
/// # Panics
///
/// Panics if `pattern` is not a valid regular expression. Use
/// [`Atom::try_re`] for patterns that are not known in advance.
pub fn re(pattern: &str) -> Atom {
    match Atom::try_re(pattern) {
        Ok(atom) => atom,
        Err(err) => panic!("{}", err),
    }
}

/// Matches any single character.
pub fn any() -> Atom {
    re(".")
}

/// Defines a rule whose atom is built by `block` on first use.
pub fn entity<F>(name: impl Into<String>, block: F) -> Atom
where
    F: Fn() -> Atom + Send + Sync + 'static,
{
    Atom::new(AtomKind::Entity(Entity::new(name, block)))
}
