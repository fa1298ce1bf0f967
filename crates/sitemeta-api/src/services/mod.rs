//! Service layer for business logic.

pub mod metadata;
pub mod revalidate;
pub mod tag_cache;

pub use metadata::MetadataService;
pub use revalidate::{RevalidationOutcome, Revalidator};
pub use tag_cache::TagCache;
