//! Manual revalidation utilities.
//!
//! Programmatic tag invalidation outside the webhook flow, for admin tooling
//! and tests. Batch revalidation attempts **every** tag and reports a
//! combined outcome; it never stops at the first failure and never raises.

use std::sync::Arc;

use tracing::{info, warn};

use sitemeta_core::CacheInvalidator;

/// Aggregate outcome of a revalidation call.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RevalidationOutcome {
    pub success: bool,
    pub message: String,
}

/// Invalidates named cache tags through the abstract cache capability.
#[derive(Clone)]
pub struct Revalidator {
    cache: Arc<dyn CacheInvalidator>,
}

impl Revalidator {
    pub fn new(cache: Arc<dyn CacheInvalidator>) -> Self {
        Self { cache }
    }

    /// Invalidate a single tag. Idempotent; failure is reported, not raised.
    pub async fn revalidate(&self, tag: &str) -> RevalidationOutcome {
        match self.cache.invalidate(tag).await {
            Ok(()) => {
                info!(tag = %tag, op = "revalidate", "Cache tag revalidated");
                RevalidationOutcome {
                    success: true,
                    message: format!("Cache tag revalidated: {}", tag),
                }
            }
            Err(e) => {
                warn!(tag = %tag, error = %e, "Failed to revalidate cache tag");
                RevalidationOutcome {
                    success: false,
                    message: format!("Failed to revalidate cache tag: {}", tag),
                }
            }
        }
    }

    /// Invalidate every tag in order, reporting a combined outcome.
    ///
    /// All tags are attempted even when an earlier one fails; the outcome
    /// carries the first failure so redundant failures do not drown it out.
    pub async fn revalidate_many(&self, tags: &[String]) -> RevalidationOutcome {
        let mut first_failure: Option<String> = None;

        for tag in tags {
            if let Err(e) = self.cache.invalidate(tag).await {
                warn!(tag = %tag, error = %e, "Failed to revalidate cache tag");
                if first_failure.is_none() {
                    first_failure = Some(tag.clone());
                }
            }
        }

        match first_failure {
            None => {
                info!(tags = ?tags, op = "revalidate_many", "Cache tags revalidated");
                RevalidationOutcome {
                    success: true,
                    message: format!("Cache tags revalidated: {}", tags.join(", ")),
                }
            }
            Some(tag) => RevalidationOutcome {
                success: false,
                message: format!("Failed to revalidate cache tag: {}", tag),
            },
        }
    }
}
