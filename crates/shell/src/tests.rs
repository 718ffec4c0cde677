// SPDX-License-Identifier: MIT

use super::*;
use yare::parameterized;

#[parameterized(
    simple = {"cat", &["cat"]},
    two_words = {"cp a b", &["cp", "a", "b"]},
    extra_spaces = {"  cp   a    b  ", &["cp", "a", "b"]},
    single_quoted = {"echo 'hello world'", &["echo", "hello world"]},
    double_quoted = {"echo \"hello world\"", &["echo", "hello world"]},
    escaped_space = {"touch foo\\ bar", &["touch", "foo bar"]},
    mixed_quotes = {"sh -c 'echo hi' --flag=\"on\"", &["sh", "-c", "echo hi", "--flag=on"]},
    double_quote_escapes = {"echo \"a\\\"b\\\\c\"", &["echo", "a\"b\\c"]},
)]
fn splits_words(input: &str, want: &[&str]) {
    let got = split_words(input).unwrap();
    assert_eq!(got, want);
}

#[test]
fn unterminated_single_quote_errors() {
    assert_eq!(
        split_words("echo 'unterminated"),
        Err(ShellError::UnterminatedSingleQuote)
    );
}

#[test]
fn unterminated_double_quote_errors() {
    assert_eq!(
        split_words("echo \"unterminated"),
        Err(ShellError::UnterminatedDoubleQuote)
    );
}

#[test]
fn trailing_backslash_errors() {
    assert_eq!(split_words("echo \\"), Err(ShellError::TrailingBackslash));
}

#[test]
fn empty_input_errors() {
    assert_eq!(split_words(""), Err(ShellError::EmptyCommand));
    assert_eq!(split_words("   "), Err(ShellError::EmptyCommand));
}

#[test]
fn double_quote_backslash_before_ordinary_char_is_literal() {
    // `\n` inside double quotes where `n` has no escape meaning keeps
    // the backslash, per POSIX: only \" \\ \$ \` and \<newline> collapse.
    let got = split_words("echo \"a\\nb\"").unwrap();
    assert_eq!(got, vec!["echo", "a\\nb"]);
}