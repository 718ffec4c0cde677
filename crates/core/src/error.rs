// SPDX-License-Identifier: MIT

//! Error taxonomy for the core data model: pattern/template compilation
//! failures. Everything else (I/O, lock contention) is owned by the
//! crate that observes it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid --input spec '{0}': expected <dir>/<regex>")]
    InvalidInputSpec(String),

    #[error("invalid --output/--error spec '{0}': expected <dir>/<template>")]
    InvalidTemplateSpec(String),

    #[error("bad regex in input pattern '{pattern}': {source}")]
    BadRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
