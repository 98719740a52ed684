//! Content module - parses, validates and collects posts

mod collection;
mod entry;
mod error;
pub mod frontmatter;
pub mod loader;
pub mod schema;

pub use collection::{Adjacent, Collection, TagCount};
pub use entry::{ContentEntry, Metadata};
pub use error::{ContentError, LoadErrors, LoadFailure};
pub use loader::{CollectionLoader, LoadMode, LoadReport};
