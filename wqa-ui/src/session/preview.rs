//! Preview references for submitted samples
//!
//! A preview reference lets the page redisplay the submitted photo
//! (`/preview/<id>`) without the browser re-reading the file. References are
//! created when an analysis starts and revoked on reset; a revoked reference no
//! longer resolves.

use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::sample::ImageSample;

/// Handle to a registered preview
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct PreviewRef(Uuid);

impl PreviewRef {
    pub fn id(&self) -> Uuid {
        self.0
    }

    /// URL the page uses to display the preview
    pub fn url(&self) -> String {
        format!("/preview/{}", self.0)
    }
}

impl From<PreviewRef> for String {
    fn from(preview: PreviewRef) -> Self {
        preview.url()
    }
}

/// Registry of live previews
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    entries: HashMap<Uuid, ImageSample>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sample and hand out a fresh reference to it
    pub fn create(&mut self, sample: &ImageSample) -> PreviewRef {
        let id = Uuid::new_v4();
        self.entries.insert(id, sample.clone());
        PreviewRef(id)
    }

    /// Revoke a reference; returns false if it was not live
    pub fn revoke(&mut self, preview: &PreviewRef) -> bool {
        self.entries.remove(&preview.0).is_some()
    }

    pub fn get(&self, id: Uuid) -> Option<&ImageSample> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
