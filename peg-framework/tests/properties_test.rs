use peg_framework::dsl::*;
use peg_framework::{Atom, ParseOptions, StrSource};
use proptest::prelude::*;

const CLASSES: &[&str] = &["[a-b]", "[b-c]", "[^a]", ".", "[\\s]"];

fn class_sequence(indices: &[usize]) -> Atom {
    indices
        .iter()
        .map(|&idx| re(CLASSES[idx]))
        .reduce(|acc, atom| acc >> atom)
        .unwrap_or_else(|| str(""))
}

/// The same classes as [`class_sequence`], each behind a rule so that no
/// fused pre-check is built.
fn unfused_sequence(indices: &[usize]) -> Atom {
    indices
        .iter()
        .map(|&idx| {
            let pattern = CLASSES[idx];
            entity(pattern, move || re(pattern))
        })
        .reduce(|acc, atom| acc >> atom)
        .unwrap_or_else(|| str(""))
}

/// Matches `indices` against `input` one class at a time.
fn naive_match(indices: &[usize], input: &str) -> bool {
    let mut chars = input.chars();
    indices.iter().all(|&idx| match chars.next() {
        Some(ch) => match CLASSES[idx] {
            "[a-b]" => matches!(ch, 'a'..='b'),
            "[b-c]" => matches!(ch, 'b'..='c'),
            "[^a]" => ch != 'a',
            "[\\s]" => ch.is_whitespace(),
            _ => true,
        },
        None => false,
    })
}

fn keyword_choice(words: &[String]) -> Atom {
    words
        .iter()
        .map(|word| str(word))
        .reduce(|acc, atom| acc | atom)
        .unwrap_or_else(|| str(""))
}

proptest! {
    #[test]
    fn prop_fused_lookahead_agrees_with_matching(
        indices in prop::collection::vec(0..CLASSES.len(), 2..6),
        input in "[abc \n]{0,8}",
    ) {
        let atom = class_sequence(&indices);
        let expected = naive_match(&indices, &input);

        prop_assert_eq!(atom.lookahead(&StrSource::new(input.as_str())), expected);
        let options = ParseOptions::new().prefix(true);
        let parsed = atom.parse_with(&input, &options);
        prop_assert_eq!(parsed.is_ok(), expected);

        let unfused = unfused_sequence(&indices).parse_with(&input, &options);
        match (parsed, unfused) {
            (Ok(fused), Ok(plain)) => prop_assert_eq!(fused.tree, plain.tree),
            (Err(fused), Err(plain)) => prop_assert_eq!(fused.cause().pos(), plain.cause().pos()),
            (fused, plain) => prop_assert!(false, "fused {:?} vs unfused {:?}", fused, plain),
        }
    }

    #[test]
    fn prop_lookahead_never_rejects_a_match(
        indices in prop::collection::vec(0..CLASSES.len(), 1..4),
        negated in 0..CLASSES.len(),
        input in "[abc \n]{0,6}",
    ) {
        let atom = class_sequence(&indices) >> re(CLASSES[negated]).absent();
        let options = ParseOptions::new().prefix(true);
        if atom.parse_with(&input, &options).is_ok() {
            prop_assert!(atom.lookahead(&StrSource::new(input.as_str())));
        }
    }

    #[test]
    fn prop_predicates_consume_nothing(input in "[ab]{0,8}") {
        let rest = any().repeat(0);

        let present = str("a").present() >> rest.clone();
        match present.parse(&input) {
            Ok(tree) => prop_assert_eq!(tree, input.as_str()),
            Err(_) => prop_assert!(!input.starts_with('a')),
        }

        let absent = str("a").absent() >> rest;
        match absent.parse(&input) {
            Ok(tree) => prop_assert_eq!(tree, input.as_str()),
            Err(_) => prop_assert!(input.starts_with('a')),
        }
    }

    #[test]
    fn prop_prefix_parse_stops_at_first_mismatch(input in "[a-z]{0,6}[0-9 ]{0,4}") {
        let word = re("[a-z]").repeat(0);
        let parsed = word.parse_with(&input, &ParseOptions::new().prefix(true)).unwrap();
        let letters: String = input.chars().take_while(char::is_ascii_lowercase).collect();
        prop_assert_eq!(parsed.tree, letters.as_str());
    }

    #[test]
    fn prop_trailing_input_is_left_for_prefix_parses(input in "[a-z]{1,6}", extra in "[0-9]{1,3}") {
        let word = re("[a-z]").repeat(1) >> (str("-") >> re("[a-z]").repeat(1)).maybe();
        let full = format!("{}{}", input, extra);

        prop_assert!(word.parse(&full).is_err());
        let prefix = word.parse_with(&full, &ParseOptions::new().prefix(true)).unwrap();
        prop_assert_eq!(prefix.tree, word.parse(&input).unwrap());
    }

    #[test]
    fn prop_dispatch_preserves_ordered_choice(
        words in prop::collection::vec("[a-e]{1,3}", 10..16),
        input in "[a-e]{1,3}",
    ) {
        let atom = keyword_choice(&words);
        let fast = atom.parse_with(&input, &ParseOptions::new().prefix(true));
        let plain = atom.parse_with(&input, &ParseOptions::new().prefix(true).verbose(true));

        prop_assert_eq!(fast.is_ok(), plain.is_ok());
        if let (Ok(fast), Ok(plain)) = (fast, plain) {
            prop_assert_eq!(fast.tree, plain.tree);
        }
    }

    #[test]
    fn prop_memoization_is_transparent(input in "[ab()]{0,10}") {
        let atom = nested();
        let plain = atom.parse_with(&input, &ParseOptions::new().memoize(false));
        let memo = atom.parse(&input);

        prop_assert_eq!(plain.is_ok(), memo.is_ok());
        if let (Ok(plain), Ok(memo)) = (plain, memo) {
            prop_assert_eq!(plain.tree, memo);
        }
    }
}

peg_framework::rule!(fn nested() {
    (str("(") >> nested().repeat(0) >> str(")")) | re("[ab]")
});
