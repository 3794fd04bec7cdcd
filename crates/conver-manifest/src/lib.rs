mod batch;
mod document;
mod error;
mod requirement;

pub use batch::ManifestBatch;
pub use document::{DependencyEdit, EditOutcome, ManifestDocument, VersionWrite, read_document};
pub use error::ManifestError;
pub use requirement::{RangePolicy, SkipReason, rewrite_requirement};
