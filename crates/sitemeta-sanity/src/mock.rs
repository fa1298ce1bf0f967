//! Mock content store for deterministic testing.
//!
//! Backs resolver, synthesizer, and endpoint tests without a live Sanity
//! project. Records fetch calls so tests can assert cache behavior.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use sitemeta_core::{ContentStore, Error, RawSiteMetadata, Result};

/// Mock content store for testing.
#[derive(Clone, Default)]
pub struct MockContentStore {
    record: Arc<Mutex<Option<RawSiteMetadata>>>,
    failing: Arc<Mutex<bool>>,
    fetch_count: Arc<AtomicUsize>,
}

impl MockContentStore {
    /// Store with no record: `fetch_metadata` returns `Ok(None)`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store holding the given record.
    pub fn with_record(record: RawSiteMetadata) -> Self {
        let store = Self::default();
        *store.record.lock().unwrap() = Some(record);
        store
    }

    /// Store whose fetches fail with a transport error.
    pub fn failing() -> Self {
        let store = Self::default();
        *store.failing.lock().unwrap() = true;
        store
    }

    /// Replace the stored record (simulates a CMS content edit).
    pub fn set_record(&self, record: Option<RawSiteMetadata>) {
        *self.record.lock().unwrap() = record;
    }

    /// Number of `fetch_metadata` calls made so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn fetch_metadata(&self) -> Result<Option<RawSiteMetadata>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if *self.failing.lock().unwrap() {
            return Err(Error::ContentStore("mock fetch failure".to_string()));
        }
        Ok(self.record.lock().unwrap().clone())
    }

    fn image_url(&self, image_ref: &str) -> Option<String> {
        crate::image::cdn_url("mock", "test", image_ref)
    }
}
