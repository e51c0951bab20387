use poker_ev::cards::Rank;
use poker_ev::range::parse_range;

#[test]
fn suited_token_expands_to_four_same_suit_combos() {
    let range = parse_range("AKs");
    assert_eq!(range.len(), 4);
    assert!(range.iter().all(|hand| hand.high().suit == hand.low().suit));
}

#[test]
fn offsuit_token_expands_to_twelve_combos() {
    let range = parse_range("AKo");
    assert_eq!(range.len(), 12);
    assert!(range.iter().all(|hand| !hand.is_suited()));
}

#[test]
fn pair_plus_covers_jacks_through_aces() {
    let range = parse_range("JJ+");
    assert_eq!(range.len(), 24);
    let ranks: std::collections::BTreeSet<Rank> =
        range.iter().map(|hand| hand.high().rank).collect();
    assert_eq!(
        ranks.into_iter().collect::<Vec<_>>(),
        vec![Rank::Jack, Rank::Queen, Rank::King, Rank::Ace]
    );
    assert!(range.iter().all(|hand| hand.is_pair()));
}

#[test]
fn suited_plus_climbs_kicker_to_below_high_card() {
    let range = parse_range("ATs+");
    // ATs, AJs, AQs, AKs
    assert_eq!(range.len(), 16);
    assert!(range.iter().all(|hand| hand.high().rank == Rank::Ace && hand.is_suited()));
}

#[test]
fn overlapping_tokens_collapse() {
    let range = parse_range("QQ+, KK, AA, AKs, AKs");
    assert_eq!(range.len(), 18 + 4);
}

#[test]
fn whitespace_and_case_are_ignored() {
    assert_eq!(parse_range(" j j + , a k s "), parse_range("JJ+,AKs"));
}

#[test]
fn no_combo_repeats_a_card() {
    let range = parse_range("22+, A2s+, A2o+, KTs+, QJo");
    assert!(range.iter().all(|hand| hand.high() != hand.low()));
}

#[test]
fn empty_spec_is_empty_range() {
    assert!(parse_range("").is_empty());
    assert!(parse_range(" , ,").is_empty());
}

#[test]
fn characters_after_the_suit_marker_are_ignored_unless_plus() {
    assert_eq!(parse_range("AKsx").len(), 4);
    assert_eq!(parse_range("AKsx"), parse_range("AKs"));
    assert_eq!(parse_range("T9o+"), parse_range("T9o"));
}

#[test]
fn four_card_tokens_name_single_combos() {
    let range = parse_range("AsKd, AhAs");
    assert_eq!(range.len(), 2);
    assert!(range.iter().any(|hand| hand.to_string() == "AsKd"));
}
