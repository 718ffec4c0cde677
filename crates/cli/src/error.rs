// SPDX-License-Identifier: MIT

//! Argument-validation errors, composed into `anyhow::Error` at `main`'s
//! boundary the way the teacher's `oj` binary composes its own
//! `thiserror` enums before formatting them for the user.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// spec.md §6: "`--invariant` ... required iff ≥2 inputs".
    #[error("--invariant is required when two or more --input patterns are given")]
    MissingInvariant,

    #[error("--invariant is only meaningful with two or more --input patterns")]
    UnexpectedInvariant,

    /// spec.md §6: "`--error` ... 0 or exactly `|inputs|`".
    #[error(
        "--error must be given 0 times or once per --input ({inputs} inputs, {errors} --error)"
    )]
    ErrorArityMismatch { inputs: usize, errors: usize },
}
