//! End-to-end expression evaluation scenarios, mirroring the concrete
//! examples and invariants called out for the language front end.

mod common;

use birch::Error;
use common::{eval, eval_ok};

#[test]
fn all_is_false_when_any_element_is_nil() {
    assert_eq!(eval_ok("[1, 2, nil, 3].all?").to_s(), "false");
}

#[test]
fn any_with_block_tests_the_block_result() {
    assert_eq!(eval_ok("[1, 2, 3].any? {|x| x > 2}").to_s(), "true");
}

#[test]
fn array_of_pairs_converts_to_a_hash() {
    assert_eq!(
        eval_ok("[[1,6],[2,7],[3,8]].to_h").inspect(),
        "{1 => 6, 2 => 7, 3 => 8}"
    );
}

#[test]
fn arithmetic_honors_standard_precedence_and_parens() {
    assert_eq!(eval_ok("(1 + 2) * 3 - 4").to_s(), "5");
}

#[test]
fn string_concatenation_inspects_with_quotes() {
    assert_eq!(eval_ok("'a' + 'b' + 'c'").inspect(), "\"abc\"");
}

#[test]
fn non_array_element_in_to_h_is_a_type_error() {
    assert!(matches!(eval("[1].to_h").unwrap_err(), Error::Type { .. }));
}

#[test]
fn wrong_length_pair_in_to_h_is_an_argument_error() {
    assert!(matches!(eval("[[1,2,3]].to_h").unwrap_err(), Error::Argument { .. }));
}

#[test]
fn equal_values_are_reflexively_equal() {
    for expr in ["1 == 1", "'x' == 'x'", "nil == nil", "[1, [2, 3]] == [1, [2, 3]]", "{1 => 2} == {1 => 2}"] {
        assert_eq!(eval_ok(expr).to_s(), "true", "expected {expr} to be true");
    }
}

#[test]
fn short_circuit_and_never_evaluates_rhs() {
    // `boom` has no method on the implicit receiver; if `&&` evaluated it
    // eagerly this would fail with a NameError instead of returning false.
    assert_eq!(eval_ok("false && boom").to_s(), "false");
}

#[test]
fn short_circuit_or_never_evaluates_rhs() {
    assert_eq!(eval_ok("true || boom").to_s(), "true");
}

#[test]
fn short_circuit_returns_the_determining_operand_not_a_coerced_boolean() {
    assert_eq!(eval_ok("nil || 3").to_s(), "3");
    assert_eq!(eval_ok("1 && 2").to_s(), "2");
}

#[test]
fn ternary_is_right_associative() {
    assert_eq!(eval_ok("true ? 1 : false ? 2 : 3").to_s(), "1");
    assert_eq!(eval_ok("false ? 1 : true ? 2 : 3").to_s(), "2");
}

#[test]
fn truthiness_excludes_only_nil_and_false() {
    for truthy_expr in ["0", "''", "[]", "{}"] {
        assert_eq!(eval_ok(&format!("{truthy_expr} ? 'truthy' : 'falsy'")).to_s(), "truthy");
    }
    for falsy_expr in ["nil", "false"] {
        assert_eq!(eval_ok(&format!("{falsy_expr} ? 'truthy' : 'falsy'")).to_s(), "falsy");
    }
}

#[test]
fn undefined_bare_identifier_is_a_name_error() {
    assert!(matches!(eval("totally_unbound_name").unwrap_err(), Error::Name { .. }));
}

#[test]
fn unknown_method_on_a_known_type_is_a_no_method_error() {
    assert!(matches!(eval("5.frobnicate").unwrap_err(), Error::NoMethod { .. }));
}

#[test]
fn division_by_zero_is_a_zero_division_error() {
    assert_eq!(eval("1 / 0").unwrap_err(), Error::ZeroDivision);
}

#[test]
fn block_parameters_bind_against_the_value_yielded() {
    assert_eq!(eval_ok("[1, 2, 3].map {|x| x * 10}").inspect(), "[10, 20, 30]");
}

#[test]
fn index_access_desugars_to_the_bracket_method() {
    assert_eq!(eval_ok("[10, 20, 30][1]").to_s(), "20");
    assert_eq!(eval_ok("{1 => 'a', 2 => 'b'}[2]").to_s(), "b");
}

#[test]
fn bitwise_and_shift_operators_truncate_to_32_bit_ints() {
    assert_eq!(eval_ok("6 & 3").to_s(), "2");
    assert_eq!(eval_ok("1 << 4").to_s(), "16");
    assert_eq!(eval_ok("-1 >> 1").to_s(), "-1");
}

#[test]
fn symbol_literal_parses_and_prints_with_leading_colon() {
    assert_eq!(eval_ok(":name").inspect(), ":name");
}

#[test]
fn do_end_block_is_equivalent_to_brace_block() {
    assert_eq!(eval_ok("[1, 2].map do |x| x + 1 end").inspect(), "[2, 3]");
}

#[test]
fn hash_literal_preserves_insertion_order_through_overwrites() {
    assert_eq!(
        eval_ok("{1 => 'a', 2 => 'b', 1 => 'c'}").inspect(),
        r#"{1 => "c", 2 => "b"}"#
    );
}

#[test]
fn lambda_builds_a_callable_proc_value() {
    assert_eq!(eval_ok("lambda {|x| x + 1}.call(5)").to_s(), "6");
    assert_eq!(eval_ok("proc {|a, b| a * b}.call(3, 4)").to_s(), "12");
}

#[test]
fn method_call_against_a_host_view_model_field() {
    let v = common::eval_with(
        vec![("name", birch::Value::string("Ada"))],
        "'hello, ' + name",
    )
    .unwrap();
    assert_eq!(v.to_s(), "hello, Ada");
}
