// SPDX-License-Identifier: MIT

//! `DirPattern` and `DirTemplate`: the immutable-after-parse input and
//! output/error/log specifications named by the data model.

use crate::error::CoreError;
use regex::Regex;
use std::path::PathBuf;

/// An input specification: a directory plus a compiled regex that
/// candidate file names are matched against.
///
/// Parsed once from a `<dir>/<regex>` CLI argument and never mutated
/// afterward — `DirLister` only ever reads through a `&DirPattern`.
#[derive(Debug, Clone)]
pub struct DirPattern {
    dir: PathBuf,
    raw: String,
    regex: Regex,
}

impl DirPattern {
    /// Parse a `--input=<dir>/<regex>` argument.
    ///
    /// The directory is everything before the final `/`; the regex is
    /// everything after it. An empty (or wholly absent) regex portion
    /// defaults to `.*`, matching any entry.
    pub fn parse(spec: &str) -> Result<Self, CoreError> {
        if spec.is_empty() {
            return Err(CoreError::InvalidInputSpec(spec.to_string()));
        }
        let (dir, raw) = match spec.rsplit_once('/') {
            Some((dir, pattern)) if !dir.is_empty() => (dir.to_string(), pattern.to_string()),
            // A leading '/' with nothing before it (e.g. "/.*") or no
            // separator at all: treat the whole thing as the directory.
            _ => (spec.to_string(), String::new()),
        };
        let raw = if raw.is_empty() {
            ".*".to_string()
        } else {
            raw
        };
        let regex = Regex::new(&raw).map_err(|source| CoreError::BadRegex {
            pattern: raw.clone(),
            source,
        })?;
        Ok(Self {
            dir: PathBuf::from(dir),
            raw,
            regex,
        })
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The source text of the compiled regex, kept around for diagnostics.
    pub fn pattern_str(&self) -> &str {
        &self.raw
    }

    /// Does this entry name match the pattern, and does it name capture
    /// groups the invariant/output templates might reference?
    pub fn captures<'h>(&self, name: &'h str) -> Option<regex::Captures<'h>> {
        self.regex.captures(name)
    }
}

/// An output/error/log specification: a directory plus a template string
/// expanded with a [`crate::TemplateContext`] once a concrete `Transition`
/// exists.
///
/// The template is not pre-parsed into an AST — like the interpolation
/// engine it is expanded with, it is a flat string scanned for
/// `{{.Field}}` placeholders on every expansion. This keeps `DirTemplate`
/// free of a dependency on the template engine crate (which in turn
/// depends on `pmjq-core` for the `TemplateContext` seam), avoiding a
/// crate dependency cycle.
#[derive(Debug, Clone)]
pub struct DirTemplate {
    dir: PathBuf,
    template: String,
}

impl DirTemplate {
    /// Parse a `--output=<dir>/<template>` (or `--error=`/`--stderr=`)
    /// argument. An empty template defaults to `default_template`
    /// (`{{.Input 0}}` for `--output`, caller-supplied otherwise).
    pub fn parse(spec: &str, default_template: &str) -> Result<Self, CoreError> {
        if spec.is_empty() {
            return Err(CoreError::InvalidTemplateSpec(spec.to_string()));
        }
        let (dir, template) = match spec.rsplit_once('/') {
            Some((dir, template)) if !dir.is_empty() => (dir.to_string(), template.to_string()),
            _ => (spec.to_string(), String::new()),
        };
        let template = if template.is_empty() {
            default_template.to_string()
        } else {
            template
        };
        Ok(Self {
            dir: PathBuf::from(dir),
            template,
        })
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
