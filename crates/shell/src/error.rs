// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellError {
    #[error("unterminated single quote")]
    UnterminatedSingleQuote,

    #[error("unterminated double quote")]
    UnterminatedDoubleQuote,

    #[error("trailing backslash with nothing to escape")]
    TrailingBackslash,

    #[error("empty command after word splitting")]
    EmptyCommand,
}
