//! Pure text rewrite primitives shared by all migrators.
//!
//! Every function in this crate is a pure `&str -> String`/`Option` mapping
//! with no persistent state and no shared mutable buffers. All splicing
//! happens in memory against the string read at the start of a file's
//! migration; callers own the single read and the single write.
//!
//! # Modules
//!
//! - [`imports`] - Safe import insertion and merge-into-import
//! - [`braces`] - Balanced-delimiter extraction
//! - [`jsx`] - Anchored markup insertion and balanced element-block location
//! - [`component`] - Client/server component classification

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod braces;
pub mod component;
pub mod imports;
pub mod jsx;

pub use braces::match_balanced_braces;
pub use component::{has_directive, is_client_component};
pub use imports::{MergeOutcome, add_import_safely, merge_into_import};
pub use jsx::{element_block, insert_after_anchor};
