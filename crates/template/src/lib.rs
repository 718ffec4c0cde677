// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]

//! pmjq-template: the `{{.Field}}` expansion engine.
//!
//! Structurally mirrors the teacher's `${var}` interpolation module: a
//! `LazyLock`-compiled placeholder regex, `replace_all` with a closure
//! that consults the context, unresolved placeholders left verbatim
//! rather than erroring.

use pmjq_core::TemplateContext;
use regex::Regex;
use std::sync::LazyLock;

/// Matches `{{.Input N}}`, `{{.Invariant}}`, `{{.NamedMatches.key}}`, and
/// the positional aliases `{{.0}}`..`{{.9}}`.
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\{\{\s*\.(?:Input\s+(?P<input_idx>\d+)|Invariant|NamedMatches\.(?P<named_key>[a-zA-Z_][a-zA-Z0-9_-]*)|(?P<positional_idx>\d+))\s*\}\}",
    )
    .expect("constant placeholder regex is valid")
});

/// Expand every `{{.Field}}` placeholder in `template` against `ctx`.
///
/// A placeholder whose referent is absent (an input index out of range,
/// a named capture that didn't fire, an invariant not yet computed) is
/// left in the output unchanged — the caller's later use of the
/// unexpanded text (the child process failing on a literal `{{.Input
/// 3}}` path, say) is the signal something was misconfigured, not a
/// silent failure inside the engine.
pub fn expand(template: &str, ctx: &impl TemplateContext) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            if let Some(idx) = caps.name("input_idx") {
                let idx: usize = match idx.as_str().parse() {
                    Ok(i) => i,
                    Err(_) => return caps[0].to_string(),
                };
                return ctx
                    .input(idx)
                    .map(str::to_string)
                    .unwrap_or_else(|| caps[0].to_string());
            }
            if let Some(key) = caps.name("named_key") {
                return ctx
                    .named(key.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| caps[0].to_string());
            }
            if let Some(idx) = caps.name("positional_idx") {
                let idx: usize = match idx.as_str().parse() {
                    Ok(i) => i,
                    Err(_) => return caps[0].to_string(),
                };
                return ctx
                    .positional(idx)
                    .map(str::to_string)
                    .unwrap_or_else(|| caps[0].to_string());
            }
            // Bare `{{.Invariant}}`.
            ctx.invariant()
                .map(str::to_string)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
}

/// Expand an `--invariant=<template>` string against a single matched
/// input's regex captures (named and positional), per the "regex
/// capture-substitution rules" named in spec.md §4.1 step 3a. This is a
/// distinct entry point from [`expand`] because the invariant is
/// computed *before* a `Transition` exists to act as the context — it is
/// expanded directly against one `regex::Captures`.
pub fn expand_invariant(template: &str, captures: &regex::Captures<'_>, matched_name: &str) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            if let Some(key) = caps.name("named_key") {
                return captures
                    .name(key.as_str())
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| caps[0].to_string());
            }
            if let Some(idx) = caps.name("positional_idx") {
                let idx: usize = match idx.as_str().parse() {
                    Ok(i) => i,
                    Err(_) => return caps[0].to_string(),
                };
                return captures
                    .get(idx)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| caps[0].to_string());
            }
            if caps.name("input_idx").is_some() {
                return matched_name.to_string();
            }
            // Bare `{{.Invariant}}` makes no sense inside an invariant
            // template itself; leave it untouched.
            caps[0].to_string()
        })
        .to_string()
}
