// SPDX-License-Identifier: MIT

//! The explicit context interface the template engine consumes.
//!
//! Per the design notes: templates must not reflect on a `Transition`
//! directly. Anything that can answer these three questions can be
//! expanded against, including test fakes.

/// Everything a `{{.Field}}` placeholder can resolve against.
pub trait TemplateContext {
    /// The base name of the `i`-th matched input file, if one exists.
    fn input(&self, i: usize) -> Option<&str>;

    /// The invariant value computed for this round, if one has been
    /// computed yet (absent before the first input is matched).
    fn invariant(&self) -> Option<&str>;

    /// A named regex capture harvested from the most recently matched
    /// input file name.
    fn named(&self, key: &str) -> Option<&str>;

    /// A positional regex capture (`{{.0}}`, `{{.1}}`, ...) from the
    /// invariant template's own substitution rules.
    fn positional(&self, index: usize) -> Option<&str>;
}
