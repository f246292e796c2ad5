//! Enumerable combinators and enumerator laziness, exercised against
//! `Array`/`Hash` receivers and the `Enumerator` objects `each` produces
//! when called without a block.

mod common;

use birch::Error;
use common::eval_ok;

#[test]
fn map_transforms_every_element_preserving_length() {
    let v = eval_ok("[1, 2, 3].map {|x| x * 2}");
    assert_eq!(v.inspect(), "[2, 4, 6]");
}

#[test]
fn select_keeps_only_matching_elements_in_order() {
    assert_eq!(eval_ok("[1, 2, 3, 4, 5].select {|x| x % 2 == 0}").inspect(), "[2, 4]");
}

#[test]
fn reject_is_the_complement_of_select() {
    assert_eq!(eval_ok("[1, 2, 3, 4, 5].reject {|x| x % 2 == 0}").inspect(), "[1, 3, 5]");
}

#[test]
fn reduce_folds_left_to_right_with_a_seed() {
    assert_eq!(eval_ok("[1, 2, 3, 4].reduce(0) {|acc, x| acc + x}").to_s(), "10");
}

#[test]
fn reduce_without_a_seed_uses_the_first_element() {
    assert_eq!(eval_ok("[1, 2, 3, 4].reduce {|acc, x| acc + x}").to_s(), "10");
}

#[test]
fn reduce_without_a_block_is_an_argument_error() {
    assert!(matches!(
        birch::eval_source("[1, 2].reduce", &scope()).unwrap_err(),
        Error::Argument { .. }
    ));
}

#[test]
fn find_returns_the_first_match_and_nil_when_none_match() {
    assert_eq!(eval_ok("[1, 2, 3].find {|x| x > 1}").to_s(), "2");
    assert_eq!(eval_ok("[1, 2, 3].find {|x| x > 10}").to_s(), "");
}

#[test]
fn find_stops_iterating_at_the_first_match() {
    // `bump` is called once per element the block actually visits; if
    // `find` kept going past the first hit it would be called 4 times
    // instead of 2.
    let host = std::rc::Rc::new(common::CountingHost::new());
    let scope = birch::Scope::new(host.clone());
    let result = birch::eval_source("[1, 2, 3, 4].find {|x| bump && x == 2}", &scope).unwrap();
    assert_eq!(result.to_s(), "2");
    assert_eq!(host.count(), 2);
}

#[test]
fn any_all_none_without_a_block_test_truthiness() {
    assert_eq!(eval_ok("[1, nil, 3].any?").to_s(), "true");
    assert_eq!(eval_ok("[1, 2, 3].all?").to_s(), "true");
    assert_eq!(eval_ok("[nil, false].none?").to_s(), "true");
}

#[test]
fn count_without_a_block_counts_every_element() {
    assert_eq!(eval_ok("[1, 2, 3].count").to_s(), "3");
}

#[test]
fn count_with_a_block_counts_matches() {
    assert_eq!(eval_ok("[1, 2, 3, 4].count {|x| x % 2 == 0}").to_s(), "2");
}

#[test]
fn min_and_max_use_ordered_comparison() {
    assert_eq!(eval_ok("[3, 1, 4, 1, 5].min").to_s(), "1");
    assert_eq!(eval_ok("[3, 1, 4, 1, 5].max").to_s(), "5");
}

#[test]
fn sort_orders_ascending_by_the_three_way_comparison() {
    assert_eq!(eval_ok("[3, 1, 2].sort").inspect(), "[1, 2, 3]");
}

#[test]
fn sort_by_orders_by_the_block_result() {
    assert_eq!(eval_ok("['ccc', 'a', 'bb'].sort_by {|s| s.length}").inspect(), r#"["a", "bb", "ccc"]"#);
}

#[test]
fn group_by_buckets_elements_under_their_block_key() {
    assert_eq!(
        eval_ok("[1, 2, 3, 4, 5].group_by {|x| x % 2}").inspect(),
        "{1 => [1, 3, 5], 0 => [2, 4]}"
    );
}

#[test]
fn include_checks_membership_by_value_equality() {
    assert_eq!(eval_ok("[1, 2, 3].include?(2)").to_s(), "true");
    assert_eq!(eval_ok("[1, 2, 3].include?(9)").to_s(), "false");
}

#[test]
fn hash_each_yields_key_value_pairs() {
    assert_eq!(eval_ok("{1 => 'a', 2 => 'b'}.map {|pair| pair[0]}").inspect(), "[1, 2]");
}

#[test]
fn each_without_a_block_returns_an_enumerator_usable_with_combinators() {
    // `each` with no block defers; calling a combinator on the resulting
    // Enumerator forwards back through the original receiver's `each`.
    assert_eq!(eval_ok("[1, 2, 3].each.map {|x| x * 2}").inspect(), "[2, 4, 6]");
}

#[test]
fn each_with_index_pairs_elements_with_their_position() {
    assert_eq!(
        eval_ok("[10, 20, 30].each_with_index.to_a").inspect(),
        "[[10, 0], [20, 1], [30, 2]]"
    );
}

#[test]
fn to_a_materializes_an_enumerator_back_into_an_array() {
    assert_eq!(eval_ok("[1, 2, 3].each.to_a").inspect(), "[1, 2, 3]");
}

fn scope() -> birch::Scope {
    birch::Scope::new(std::rc::Rc::new(common::NoHost))
}
