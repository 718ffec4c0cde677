// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]

//! pmjq-core: the data model shared by every stage of the transition
//! scheduler — [`Transition`], [`DirPattern`], [`DirTemplate`], and the
//! [`TemplateContext`] seam the templating engine consumes.

pub mod error;
pub mod id;
pub mod pattern;
pub mod template_context;
pub mod transition;

pub use error::CoreError;
pub use id::TransitionIdGen;
pub use pattern::{DirPattern, DirTemplate};
pub use template_context::TemplateContext;
pub use transition::Transition;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
