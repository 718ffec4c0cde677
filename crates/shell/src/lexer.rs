// SPDX-License-Identifier: MIT

use crate::error::ShellError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Bare,
    Single,
    Double,
}

/// Split a command string into argv the way a POSIX shell would split an
/// unquoted word list: whitespace separates words outside quotes; single
/// quotes preserve everything literally; double quotes preserve
/// everything except `\"`, `\\`, `` \` ``, `\$`, and `\<newline>`, which
/// collapse to the escaped character; outside quotes, a backslash
/// escapes the following character verbatim.
///
/// Returns [`ShellError::EmptyCommand`] if the input is empty or
/// whitespace-only after splitting — an empty argv can never be
/// `exec`'d.
pub fn split_words(input: &str) -> Result<Vec<String>, ShellError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut mode = Mode::Bare;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match mode {
            Mode::Bare => match c {
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                '\'' => {
                    mode = Mode::Single;
                    in_word = true;
                }
                '"' => {
                    mode = Mode::Double;
                    in_word = true;
                }
                '\\' => match chars.next() {
                    Some(escaped) => {
                        current.push(escaped);
                        in_word = true;
                    }
                    None => return Err(ShellError::TrailingBackslash),
                },
                c => {
                    current.push(c);
                    in_word = true;
                }
            },
            Mode::Single => match c {
                '\'' => mode = Mode::Bare,
                c => current.push(c),
            },
            Mode::Double => match c {
                '"' => mode = Mode::Bare,
                '\\' => match chars.peek() {
                    Some('"') | Some('\\') | Some('$') | Some('`') => {
                        current.push(chars.next().unwrap_or_default());
                    }
                    Some('\n') => {
                        chars.next();
                    }
                    _ => current.push('\\'),
                },
                c => current.push(c),
            },
        }
    }

    match mode {
        Mode::Single => return Err(ShellError::UnterminatedSingleQuote),
        Mode::Double => return Err(ShellError::UnterminatedDoubleQuote),
        Mode::Bare => {}
    }

    if in_word {
        words.push(current);
    }

    if words.is_empty() {
        return Err(ShellError::EmptyCommand);
    }

    Ok(words)
}
