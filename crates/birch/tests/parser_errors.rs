//! Lexer/parser failure scenarios: every case here must fail with
//! `SyntaxError` and must not partially evaluate anything first.

mod common;

use birch::Error;
use common::eval;

fn assert_syntax_error(src: &str) {
    match eval(src) {
        Err(Error::Syntax { .. }) => {}
        other => panic!("expected a SyntaxError for {src:?}, got {other:?}"),
    }
}

#[test]
fn unterminated_string_literal_is_a_syntax_error() {
    assert_syntax_error("\"abc");
}

#[test]
fn unknown_escape_sequence_is_a_syntax_error() {
    assert_syntax_error(r#""a\qb""#);
}

#[test]
fn trailing_garbage_after_a_complete_expression_is_a_syntax_error() {
    assert_syntax_error("1 2");
}

#[test]
fn unbalanced_parentheses_are_a_syntax_error() {
    assert_syntax_error("(1 + 2");
}

#[test]
fn unbalanced_brackets_are_a_syntax_error() {
    assert_syntax_error("[1, 2");
}

#[test]
fn missing_fat_arrow_in_hash_literal_is_a_syntax_error() {
    assert_syntax_error("{1 2}");
}

#[test]
fn dangling_dot_with_no_method_name_is_a_syntax_error() {
    assert_syntax_error("5.");
}

#[test]
fn unclosed_block_is_a_syntax_error() {
    assert_syntax_error("[1].map {|x| x");
}

#[test]
fn do_block_missing_end_is_a_syntax_error() {
    assert_syntax_error("[1].map do |x| x");
}

#[test]
fn ternary_missing_colon_is_a_syntax_error() {
    assert_syntax_error("true ? 1");
}

#[test]
fn unexpected_character_is_a_syntax_error() {
    assert_syntax_error("1 + @");
}

#[test]
fn a_failed_parse_never_partially_commits_state() {
    // Parsing has no observable side effects of its own: a failed parse
    // leaves nothing behind for a later, independent parse to trip over.
    assert_syntax_error("1 +");
    assert_eq!(common::eval_ok("1 + 2").to_s(), "3");
}
