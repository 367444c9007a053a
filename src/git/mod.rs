//! Git operations module
//!
//! Provides the two repository-facing stages of a pass:
//! - Diff collection (numeric diffs of both areas plus the status listing)
//! - File resolution (classification and total line counts)

mod collect;
mod resolve;

#[cfg(test)]
pub(crate) mod testutil;

pub use collect::{collect, open_repository};
pub use resolve::Resolver;
