use common_framework::Slice;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

/// The value produced by a successful parse.
///
/// Unnamed matches collapse into [`Tree::Str`]; named captures produce
/// [`Tree::Map`]s and repeated named captures produce [`Tree::Seq`]s.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Tree {
    #[default]
    Nil,
    Str(Slice),
    Seq(Vec<Tree>),
    Map(BTreeMap<String, Tree>),
}

static NIL: Tree = Tree::Nil;

impl Tree {
    /// Builds a map from key/value pairs.
    pub fn map<K, I>(entries: I) -> Tree
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Tree)>,
    {
        Tree::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds a sequence.
    pub fn seq<I>(items: I) -> Tree
    where
        I: IntoIterator<Item = Tree>,
    {
        Tree::Seq(items.into_iter().collect())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Tree::Nil)
    }

    pub fn as_slice(&self) -> Option<&Slice> {
        match self {
            Tree::Str(slice) => Some(slice),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_slice().map(Slice::as_str)
    }

    pub fn as_seq(&self) -> Option<&[Tree]> {
        match self {
            Tree::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Tree>> {
        match self {
            Tree::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a key of a map.
    pub fn get(&self, key: &str) -> Option<&Tree> {
        self.as_map().and_then(|map| map.get(key))
    }
}

impl Index<&str> for Tree {
    type Output = Tree;

    /// Returns [`Tree::Nil`] for missing keys and non-map values.
    fn index(&self, key: &str) -> &Tree {
        self.get(key).unwrap_or(&NIL)
    }
}

impl Index<usize> for Tree {
    type Output = Tree;

    fn index(&self, idx: usize) -> &Tree {
        self.as_seq().and_then(|items| items.get(idx)).unwrap_or(&NIL)
    }
}

impl PartialEq<&str> for Tree {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<str> for Tree {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl From<&str> for Tree {
    fn from(text: &str) -> Self {
        Tree::Str(Slice::from(text))
    }
}

impl From<Slice> for Tree {
    fn from(slice: Slice) -> Self {
        Tree::Str(slice)
    }
}

impl From<Vec<Tree>> for Tree {
    fn from(items: Vec<Tree>) -> Self {
        Tree::Seq(items)
    }
}

impl From<BTreeMap<String, Tree>> for Tree {
    fn from(map: BTreeMap<String, Tree>) -> Self {
        Tree::Map(map)
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tree::Nil => f.write_str("nil"),
            Tree::Str(slice) => fmt::Debug::fmt(slice, f),
            Tree::Seq(items) => f.debug_list().entries(items).finish(),
            Tree::Map(map) => f.debug_map().entries(map).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_missing_is_nil() {
        let tree = Tree::map([("a", Tree::from("x"))]);
        assert_eq!(tree["a"], "x");
        assert!(tree["b"].is_nil());
        assert!(tree[0].is_nil());
        assert!(Tree::from("x")["a"].is_nil());
    }

    #[test]
    fn test_seq_index() {
        let tree = Tree::seq([Tree::from("a"), Tree::Nil]);
        assert_eq!(tree[0], "a");
        assert!(tree[1].is_nil());
        assert_eq!(tree.as_seq().map(<[Tree]>::len), Some(2));
    }

    #[test]
    fn test_debug_renders_like_parse_output() {
        let tree = Tree::map([
            ("a", Tree::from("x")),
            ("b", Tree::seq([Tree::Nil])),
        ]);
        assert_eq!(format!("{:?}", tree), r#"{"a": "x"@0, "b": [nil]}"#);
    }
}
