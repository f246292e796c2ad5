//! Equality, ordering, and identity invariants across the value model.

mod common;

use std::rc::Rc;

use birch::value::make_number;
use birch::Value;
use common::eval_ok;

#[test]
fn numbers_compare_by_value_not_identity() {
    assert_eq!(eval_ok("1 == 1.0").to_s(), "true");
    assert_eq!(eval_ok("2 == 3").to_s(), "false");
}

#[test]
fn strings_compare_structurally() {
    assert_eq!(eval_ok("'abc' == 'abc'").to_s(), "true");
    assert_eq!(eval_ok("'abc' == 'abd'").to_s(), "false");
}

#[test]
fn arrays_and_hashes_compare_structurally_and_recursively() {
    assert_eq!(eval_ok("[1, [2, 3]] == [1, [2, 3]]").to_s(), "true");
    assert_eq!(eval_ok("[1, [2, 3]] == [1, [2, 4]]").to_s(), "false");
    assert_eq!(eval_ok("{1 => [2, 3]} == {1 => [2, 3]}").to_s(), "true");
}

#[test]
fn nil_and_booleans_are_only_equal_to_themselves() {
    assert_eq!(eval_ok("nil == nil").to_s(), "true");
    assert_eq!(eval_ok("nil == false").to_s(), "false");
    assert_eq!(eval_ok("true == true").to_s(), "true");
    assert_eq!(eval_ok("true == false").to_s(), "false");
}

#[test]
fn symbols_compare_by_interned_identity() {
    assert_eq!(eval_ok(":foo == :foo").to_s(), "true");
    assert_eq!(eval_ok(":foo == :bar").to_s(), "false");
}

#[test]
fn cmp_orders_numbers_strings_and_arrays() {
    assert_eq!(eval_ok("1 <=> 2").to_s(), "-1");
    assert_eq!(eval_ok("2 <=> 2").to_s(), "0");
    assert_eq!(eval_ok("3 <=> 2").to_s(), "1");
    assert_eq!(eval_ok("'a' <=> 'b'").to_s(), "-1");
    assert_eq!(eval_ok("[1, 2] <=> [1, 3]").to_s(), "-1");
}

#[test]
fn cmp_between_incomparable_types_is_nil() {
    assert_eq!(eval_ok("1 <=> 'a'").to_s(), "");
    assert_eq!(eval_ok("nil <=> 1").to_s(), "");
}

#[test]
fn relational_operators_are_grounded_in_cmp() {
    assert_eq!(eval_ok("1 < 2").to_s(), "true");
    assert_eq!(eval_ok("2 <= 2").to_s(), "true");
    assert_eq!(eval_ok("3 > 2").to_s(), "true");
    assert_eq!(eval_ok("2 >= 3").to_s(), "false");
}

#[test]
fn hash_inspect_preserves_insertion_order_across_overwrites() {
    assert_eq!(
        eval_ok("{'z' => 1, 'a' => 2, 'z' => 3}").inspect(),
        r#"{"z" => 3, "a" => 2}"#
    );
}

#[test]
fn small_integers_in_the_cache_range_share_identity() {
    let a = make_number(42.0);
    let b = make_number(42.0);
    assert!(Rc::ptr_eq(&a, &b));
}

#[test]
fn integers_outside_the_cache_range_do_not_share_identity() {
    let a = make_number(1000.0);
    let b = make_number(1000.0);
    assert!(!Rc::ptr_eq(&a, &b));
}

#[test]
fn non_integers_are_never_cached() {
    let a = make_number(1.5);
    let b = make_number(1.5);
    assert!(!Rc::ptr_eq(&a, &b));
}

#[test]
fn negative_integers_are_outside_the_cache_range() {
    let a = make_number(-1.0);
    let b = make_number(-1.0);
    assert!(!Rc::ptr_eq(&a, &b));
}

#[test]
fn value_eq_and_compare_agree_on_numeric_equality() {
    let five = Value::Number(make_number(5.0));
    let also_five = Value::Number(make_number(5.0));
    assert!(five.value_eq(&also_five));
    assert_eq!(five.compare(&also_five), Some(std::cmp::Ordering::Equal));
}
