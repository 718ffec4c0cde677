// SPDX-License-Identifier: MIT

//! Test helpers exported for other crates via the `test-support` feature,
//! mirroring the teacher's per-crate `test_support` module convention.

use crate::template_context::TemplateContext;
use std::collections::HashMap;

/// A bare `TemplateContext` fake, for exercising `pmjq-template` and
/// other consumers without constructing a full `Transition`.
#[derive(Debug, Default, Clone)]
pub struct FakeContext {
    pub inputs: Vec<String>,
    pub invariant: Option<String>,
    pub named: HashMap<String, String>,
    pub positional: Vec<String>,
}

impl FakeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    pub fn with_invariant(mut self, value: impl Into<String>) -> Self {
        self.invariant = Some(value.into());
        self
    }

    pub fn with_named(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.named.insert(key.into(), value.into());
        self
    }
}

impl TemplateContext for FakeContext {
    fn input(&self, i: usize) -> Option<&str> {
        self.inputs.get(i).map(String::as_str)
    }

    fn invariant(&self) -> Option<&str> {
        self.invariant.as_deref()
    }

    fn named(&self, key: &str) -> Option<&str> {
        self.named.get(key).map(String::as_str)
    }

    fn positional(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }
}
