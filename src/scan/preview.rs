//! Preview handles for the selected image
//!
//! A preview is an object-URL-style handle (`blob:nutriscan/<uuid>`) that
//! must be released when the image is replaced or the dialog closes. Handles
//! release themselves on drop; the registry only counts what is live.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

const PREVIEW_SCHEME: &str = "blob:nutriscan/";

#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<Mutex<HashSet<Uuid>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> PreviewHandle {
        let id = Uuid::new_v4();
        self.with_live(|live| {
            live.insert(id);
        });
        PreviewHandle {
            id,
            url: format!("{}{}", PREVIEW_SCHEME, id),
            registry: self.clone(),
        }
    }

    pub fn live_count(&self) -> usize {
        self.with_live(|live| live.len())
    }

    pub fn is_live(&self, url: &str) -> bool {
        url.strip_prefix(PREVIEW_SCHEME)
            .and_then(|id| Uuid::parse_str(id).ok())
            .is_some_and(|id| self.with_live(|live| live.contains(&id)))
    }

    fn with_live<R>(&self, f: impl FnOnce(&mut HashSet<Uuid>) -> R) -> R {
        let mut guard = self.live.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut guard)
    }
}

#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    url: String,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        let id = self.id;
        self.registry.with_live(|live| {
            live.remove(&id);
        });
        tracing::trace!("released preview {}", self.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_release_on_drop() {
        let registry = PreviewRegistry::new();
        let a = registry.create();
        let b = registry.create();
        assert_ne!(a.url(), b.url());
        assert!(a.url().starts_with("blob:nutriscan/"));
        assert_eq!(registry.live_count(), 2);

        let url = a.url().to_string();
        drop(a);
        assert!(!registry.is_live(&url));
        assert!(registry.is_live(b.url()));
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn test_is_live_rejects_foreign_urls() {
        let registry = PreviewRegistry::new();
        assert!(!registry.is_live("https://example.com/x.png"));
        assert!(!registry.is_live("blob:nutriscan/not-a-uuid"));
    }
}
