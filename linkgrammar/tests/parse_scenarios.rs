//! End-to-end scenarios exercising the facade's whole pipeline
//! (tokenize -> prune -> count -> extract -> post-process) the way an
//! embedding application would, rather than one stage at a time.

use linkgrammar::{AffixClass, Direction, DriverError, InMemoryDictionary, ParseOptions, Sentence, SurfaceExp, UNKNOWN_WORD};

fn conn(name: &str, dir: Direction) -> SurfaceExp {
    SurfaceExp::connector(0.0, name, dir, false, u16::MAX)
}

fn and2(a: SurfaceExp, b: SurfaceExp) -> SurfaceExp {
    SurfaceExp::and(0.0, vec![a, b])
}

#[test]
fn clean_linkage_has_no_violation_and_zero_null_count() {
    let mut dict = InMemoryDictionary::new();
    dict.insert("birds", conn("S", Direction::Right), None);
    dict.insert("fly", and2(conn("S", Direction::Left), conn("Mv", Direction::Right)), None);
    dict.insert("south", conn("Mv", Direction::Left), None);

    let opts = ParseOptions::default();
    let sentence = Sentence::parse(&dict, "birds fly south", &opts).unwrap();
    assert_eq!(sentence.num_words(), 3);
    let linkage = &sentence.linkages[0];
    assert_eq!(linkage.num_links(), 2);
    assert_eq!(linkage.unused_word_cost(), 0);
    assert!(linkage.violation_name().is_none());
}

#[test]
fn trailing_period_right_strips_and_null_links() {
    let mut dict = InMemoryDictionary::new();
    dict.insert("birds", conn("S", Direction::Right), None);
    dict.insert("fly", conn("S", Direction::Left), None);
    dict.set_affix_class(AffixClass::RPunc, vec![".".into()]);

    // The period has no dictionary entry of its own, so it can only
    // ever be null-linked: min/max_null_count must allow one null.
    let opts = ParseOptions { max_null_count: 1, ..ParseOptions::default() };
    let sentence = Sentence::parse(&dict, "birds fly.", &opts).unwrap();
    assert_eq!(sentence.num_words(), 3);
    assert_eq!(sentence.word(2), ".");
    let best = sentence.linkages.iter().min_by_key(|l| l.cost_vector().1).unwrap();
    assert_eq!(best.unused_word_cost(), 1);
    assert_eq!(best.num_links(), 1);
}

#[test]
fn contraction_splits_into_two_subwords_that_both_link() {
    let mut dict = InMemoryDictionary::new();
    dict.insert("i", conn("Sp", Direction::Right), None);
    dict.insert("can", and2(conn("Sp", Direction::Left), conn("Xc", Direction::Right)), None);
    // Gates the affix split; its own expression is never consulted.
    dict.insert("can.=", SurfaceExp::null(0.0), None);
    dict.insert("n't", and2(conn("Xc", Direction::Left), conn("Ivb", Direction::Right)), None);
    dict.insert("go", conn("Ivb", Direction::Left), None);
    dict.set_affix_class(AffixClass::Suf, vec!["n't".into()]);

    let opts = ParseOptions::default();
    let sentence = Sentence::parse(&dict, "i can't go", &opts).unwrap();
    assert_eq!(sentence.num_words(), 4);
    assert_eq!(sentence.word(1), "can");
    assert_eq!(sentence.word(2), "n't");
    let linkage = &sentence.linkages[0];
    assert_eq!(linkage.unused_word_cost(), 0);
    assert_eq!(linkage.num_links(), 3);
}

#[test]
fn units_suffix_splits_numeric_stem_from_unit() {
    let mut dict = InMemoryDictionary::new();
    dict.insert("12", conn("Num", Direction::Right), None);
    dict.insert("ft", and2(conn("Num", Direction::Left), conn("J", Direction::Right)), None);
    dict.insert("rope", conn("J", Direction::Left), None);
    dict.set_affix_class(AffixClass::Units, vec!["ft".into()]);

    let opts = ParseOptions::default();
    let sentence = Sentence::parse(&dict, "12ft rope", &opts).unwrap();
    assert_eq!(sentence.num_words(), 3);
    assert_eq!(sentence.word(0), "12");
    assert_eq!(sentence.word(1), "ft");
    let linkage = &sentence.linkages[0];
    assert_eq!(linkage.unused_word_cost(), 0);
    assert_eq!(linkage.num_links(), 2);
}

#[test]
fn unknown_word_fallback_toggles_between_error_and_linkage() {
    let mut dict = InMemoryDictionary::new();
    dict.insert("birds", conn("S", Direction::Right), None);
    dict.insert("fly", conn("S", Direction::Left), None);

    let opts = ParseOptions::default();
    let sentence = Sentence::parse(&dict, "xyzzy plugh", &opts).unwrap();
    // Neither word is in the dictionary and UNKNOWN-WORD is off: both
    // tokens are dropped from the word array entirely (spec.md §4.C),
    // leaving nothing to link.
    assert_eq!(sentence.num_words(), 0);

    dict.insert(UNKNOWN_WORD, SurfaceExp::or(0.0, vec![conn("Unk", Direction::Right), conn("Unk", Direction::Left)]), None);
    dict.set_use_unknown_word(true);
    let sentence = Sentence::parse(&dict, "xyzzy plugh", &opts).unwrap();
    assert_eq!(sentence.num_words(), 2);
    let linkage = &sentence.linkages[0];
    assert_eq!(linkage.num_links(), 1);
    assert_eq!(linkage.unused_word_cost(), 0);
}

#[test]
fn missing_unknown_word_entry_is_a_hard_error_not_a_zero_linkage_result() {
    let mut dict = InMemoryDictionary::new();
    dict.insert("birds", conn("S", Direction::Right), None);
    dict.set_use_unknown_word(true);
    let opts = ParseOptions::default();
    assert!(matches!(Sentence::parse(&dict, "birds", &opts), Err(DriverError::DictionaryInconsistent(_))));
}

#[test]
fn repeated_word_with_no_valid_partner_is_all_null_linked_not_an_error() {
    // Five copies of a word whose only connector can never find a
    // partner (no word in the sentence carries the opposite-direction
    // connector it needs): every disjunct is pruned away, so the best
    // (only) linkage null-links every word rather than failing.
    let mut dict = InMemoryDictionary::new();
    dict.insert("the", conn("D", Direction::Right), None);

    let opts = ParseOptions { max_null_count: 5, ..ParseOptions::default() };
    let sentence = Sentence::parse(&dict, "the the the the the", &opts).unwrap();
    assert_eq!(sentence.num_words(), 5);
    let linkage = &sentence.linkages[0];
    assert_eq!(linkage.num_links(), 0);
    assert_eq!(linkage.unused_word_cost(), 5);
}
