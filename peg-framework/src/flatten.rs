use crate::capture::Capture;
use crate::tree::Tree;
use common_framework::Slice;
use std::fmt;
use tracing::warn;

/// Emitted when two named captures with the same key are merged.
///
/// Only the later value is kept; this is almost always a grammar bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeWarning {
    pub key: String,
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "duplicate subtrees while merging, only the value of the latter is kept (key: {:?})",
            self.key
        )
    }
}

/// Turns an intermediate capture into a parse tree.
///
/// `named` is true when the result is about to be stored under a key. It
/// makes empty repetitions yield `[]` and empty optionals yield `Nil`
/// instead of the empty string.
pub fn flatten(capture: Capture, named: bool, warnings: &mut Vec<MergeWarning>) -> Tree {
    match capture {
        Capture::Nil => Tree::Nil,
        Capture::Str(slice) => Tree::Str(slice),
        Capture::Tree(tree) => tree,
        Capture::Sequence(items) => {
            let items = flatten_all(items, warnings);
            flatten_sequence(items, warnings)
        }
        Capture::Repetition(items) => {
            let items = flatten_all(items, warnings);
            flatten_repetition(items, named)
        }
        Capture::Maybe(item) => match item {
            Some(item) => flatten(*item, false, warnings),
            None if named => Tree::Nil,
            None => empty(),
        },
    }
}

fn flatten_all(items: Vec<Capture>, warnings: &mut Vec<MergeWarning>) -> Vec<Tree> {
    items
        .into_iter()
        .map(|item| flatten(item, false, warnings))
        .filter(|tree| !tree.is_nil())
        .collect()
}

fn empty() -> Tree {
    Tree::Str(Slice::default())
}

fn flatten_sequence(items: Vec<Tree>, warnings: &mut Vec<MergeWarning>) -> Tree {
    let mut items = items.into_iter();
    let Some(first) = items.next() else {
        return empty();
    };
    items.fold(first, |acc, item| merge_fold(acc, item, warnings))
}

fn merge_fold(left: Tree, right: Tree, warnings: &mut Vec<MergeWarning>) -> Tree {
    match (left, right) {
        (Tree::Map(mut left), Tree::Map(right)) => {
            for (key, value) in right {
                if left.contains_key(&key) {
                    warn!(key = %key, "duplicate subtrees while merging, only the value of the latter is kept");
                    warnings.push(MergeWarning { key: key.clone() });
                }
                left.insert(key, value);
            }
            Tree::Map(left)
        }
        (Tree::Seq(mut left), Tree::Seq(right)) => {
            left.extend(right);
            Tree::Seq(left)
        }
        (Tree::Str(left), Tree::Str(right)) => Tree::Str(left.concat(&right)),
        // Unnamed text next to structure is dropped
        (Tree::Str(_), other) | (other, Tree::Str(_)) => other,
        (Tree::Seq(mut items), map @ Tree::Map(_)) => {
            items.push(map);
            Tree::Seq(items)
        }
        (map @ Tree::Map(_), Tree::Seq(items)) => {
            let mut merged = Vec::with_capacity(items.len() + 1);
            merged.push(map);
            merged.extend(items);
            Tree::Seq(merged)
        }
        (left, Tree::Nil) => left,
        (Tree::Nil, right) => right,
    }
}

fn flatten_repetition(items: Vec<Tree>, named: bool) -> Tree {
    if items.iter().any(|item| matches!(item, Tree::Map(_))) {
        return Tree::Seq(
            items
                .into_iter()
                .filter(|item| matches!(item, Tree::Map(_)))
                .collect(),
        );
    }

    if items.iter().any(|item| matches!(item, Tree::Seq(_))) {
        return Tree::Seq(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Tree::Seq(inner) => Some(inner),
                    _ => None,
                })
                .flatten()
                .collect(),
        );
    }

    if named && items.is_empty() {
        return Tree::Seq(Vec::new());
    }

    items
        .into_iter()
        .reduce(|acc, item| match (acc, item) {
            (Tree::Str(left), Tree::Str(right)) => Tree::Str(left.concat(&right)),
            (acc, _) => acc,
        })
        .unwrap_or_else(empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_framework::Position;
    use rstest::rstest;

    fn s(text: &str) -> Capture {
        Capture::Str(Slice::from(text))
    }

    fn named(key: &str, value: Tree) -> Capture {
        Capture::Tree(Tree::map([(key, value)]))
    }

    fn run(capture: Capture, is_named: bool) -> (Tree, Vec<MergeWarning>) {
        let mut warnings = Vec::new();
        let tree = flatten(capture, is_named, &mut warnings);
        (tree, warnings)
    }

    #[rstest]
    #[case::plain_text(Capture::Sequence(vec![s("a"), s("b")]), Tree::from("ab"))]
    #[case::nil_dropped(Capture::Sequence(vec![s("a"), Capture::Nil, s("b")]), Tree::from("ab"))]
    #[case::empty(Capture::Sequence(vec![]), Tree::from(""))]
    #[case::text_then_map(
        Capture::Sequence(vec![s("a"), named("b", Tree::from("b"))]),
        Tree::map([("b", Tree::from("b"))])
    )]
    #[case::map_then_text(
        Capture::Sequence(vec![named("a", Tree::from("a")), s("b")]),
        Tree::map([("a", Tree::from("a"))])
    )]
    #[case::maps_merge(
        Capture::Sequence(vec![named("a", Tree::from("a")), named("b", Tree::from("b"))]),
        Tree::map([("a", Tree::from("a")), ("b", Tree::from("b"))])
    )]
    #[case::seqs_concat(
        Capture::Sequence(vec![
            Capture::Tree(Tree::seq([Tree::from("a")])),
            Capture::Tree(Tree::seq([Tree::from("b")])),
        ]),
        Tree::seq([Tree::from("a"), Tree::from("b")])
    )]
    #[case::seq_then_map(
        Capture::Sequence(vec![
            Capture::Tree(Tree::seq([Tree::from("a")])),
            named("b", Tree::from("b")),
        ]),
        Tree::seq([Tree::from("a"), Tree::map([("b", Tree::from("b"))])])
    )]
    #[case::map_then_seq(
        Capture::Sequence(vec![
            named("b", Tree::from("b")),
            Capture::Tree(Tree::seq([Tree::from("a")])),
        ]),
        Tree::seq([Tree::map([("b", Tree::from("b"))]), Tree::from("a")])
    )]
    fn test_flatten_sequence(#[case] capture: Capture, #[case] expected: Tree) {
        assert_eq!(run(capture, false).0, expected);
    }

    #[rstest]
    #[case::text_concatenates(Capture::Repetition(vec![s("a"), s("b"), s("c")]), false, Tree::from("abc"))]
    #[case::named_text_concatenates(Capture::Repetition(vec![s("a"), s("b")]), true, Tree::from("ab"))]
    #[case::empty(Capture::Repetition(vec![]), false, Tree::from(""))]
    #[case::named_empty(Capture::Repetition(vec![]), true, Tree::Seq(vec![]))]
    #[case::keeps_maps_only(
        Capture::Repetition(vec![named("a", Tree::from("1")), s(","), named("a", Tree::from("2"))]),
        false,
        Tree::seq([Tree::map([("a", Tree::from("1"))]), Tree::map([("a", Tree::from("2"))])])
    )]
    #[case::splices_seqs(
        Capture::Repetition(vec![
            Capture::Tree(Tree::seq([Tree::from("a")])),
            s(","),
            Capture::Tree(Tree::seq([Tree::from("b"), Tree::from("c")])),
        ]),
        false,
        Tree::seq([Tree::from("a"), Tree::from("b"), Tree::from("c")])
    )]
    fn test_flatten_repetition(#[case] capture: Capture, #[case] is_named: bool, #[case] expected: Tree) {
        assert_eq!(run(capture, is_named).0, expected);
    }

    #[rstest]
    #[case::unnamed_missing(None, false, Tree::from(""))]
    #[case::named_missing(None, true, Tree::Nil)]
    #[case::unnamed_present(Some(s("a")), false, Tree::from("a"))]
    #[case::named_present(Some(s("a")), true, Tree::from("a"))]
    fn test_flatten_maybe(#[case] item: Option<Capture>, #[case] is_named: bool, #[case] expected: Tree) {
        let capture = Capture::Maybe(item.map(Box::new));
        assert_eq!(run(capture, is_named).0, expected);
    }

    #[test]
    fn test_duplicate_keys_warn_and_latter_wins() {
        let capture = Capture::Sequence(vec![named("a", Tree::from("1")), named("a", Tree::from("2"))]);
        let (tree, warnings) = run(capture, false);
        assert_eq!(tree, Tree::map([("a", Tree::from("2"))]));
        assert_eq!(warnings, vec![MergeWarning { key: "a".to_string() }]);
    }

    #[test]
    fn test_concatenation_keeps_first_offset() {
        let first = Slice::new(Position::at(3, 3), "foo", None);
        let second = Slice::new(Position::at(6, 6), "bar", None);
        let (tree, _) = run(Capture::Sequence(vec![Capture::Str(first), Capture::Str(second)]), false);
        assert_eq!(tree, "foobar");
        assert_eq!(tree.as_slice().map(Slice::offset), Some(3));
    }
}
