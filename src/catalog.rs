//! Catalog loader and cache.
//!
//! The cache is an explicit object owned by the view model. It is filled on
//! first use, replaced wholesale on every successful or failed load, and
//! dropped only through [`CatalogCache::invalidate`].

use crate::api::NovelApi;
use crate::config::ApiConfig;
use crate::diagnostics::DiagnosticLog;
use crate::images::normalize_image_url;
use crate::models::{Catalog, Novel};
use std::sync::Arc;

/// The catalog as seen by a view, plus the error of the load that produced it.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub catalog: Arc<Catalog>,
    /// Set when the last load failed; the catalog is then empty.
    pub error: Option<String>,
}

impl CatalogSnapshot {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

pub struct CatalogCache {
    api: Arc<dyn NovelApi>,
    static_base: String,
    upload_prefix: String,
    diagnostics: DiagnosticLog,
    catalog: Option<Arc<Catalog>>,
    last_error: Option<String>,
}

impl CatalogCache {
    pub fn new(api: Arc<dyn NovelApi>, config: &ApiConfig, diagnostics: DiagnosticLog) -> Self {
        Self {
            api,
            static_base: config.static_base_url.clone(),
            upload_prefix: config.upload_prefix.clone(),
            diagnostics,
            catalog: None,
            last_error: None,
        }
    }

    /// Fetches the catalog, replacing whatever is cached.
    ///
    /// Never fails: on any error the cache holds an empty catalog and the
    /// error is recorded.
    pub async fn load(&mut self) -> CatalogSnapshot {
        match self.api.fetch_catalog().await {
            Ok(novels) => {
                let novels: Vec<Novel> = novels
                    .into_iter()
                    .map(|mut novel| {
                        novel.img =
                            normalize_image_url(&novel.img, &self.static_base, &self.upload_prefix);
                        novel
                    })
                    .collect();
                log::info!("Loaded catalog with {} novels", novels.len());
                self.diagnostics
                    .record(format!("catalog loaded: {} items", novels.len()));
                self.catalog = Some(Arc::new(Catalog::new(novels)));
                self.last_error = None;
            }
            Err(err) => {
                log::error!("Failed to load catalog: {}", err);
                self.diagnostics
                    .record(format!("catalog load failed: {}", err));
                self.catalog = Some(Arc::new(Catalog::default()));
                self.last_error = Some(err.to_string());
            }
        }
        self.snapshot()
    }

    /// Returns the cached catalog if it is non-empty, loading otherwise.
    pub async fn ensure_loaded(&mut self) -> CatalogSnapshot {
        match &self.catalog {
            Some(catalog) if !catalog.is_empty() => self.snapshot(),
            _ => self.load().await,
        }
    }

    /// Drops the cached catalog so the next access refetches.
    pub fn invalidate(&mut self) {
        self.catalog = None;
        self.last_error = None;
    }

    /// The cached catalog, if any load has happened.
    pub fn current(&self) -> Option<Arc<Catalog>> {
        self.catalog.clone()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            catalog: self.catalog.clone().unwrap_or_default(),
            error: self.last_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{FakeApi, sample_catalog};

    fn cache(api: FakeApi) -> (CatalogCache, DiagnosticLog) {
        let diagnostics = DiagnosticLog::new(20);
        let config = ApiConfig {
            static_base_url: "https://cdn.example.com".to_string(),
            ..ApiConfig::default()
        };
        (
            CatalogCache::new(Arc::new(api), &config, diagnostics.clone()),
            diagnostics,
        )
    }

    #[tokio::test]
    async fn test_load_normalizes_images() {
        let (mut cache, _) = cache(FakeApi::new().with_catalog(sample_catalog()));
        let snapshot = cache.load().await;

        assert!(!snapshot.failed());
        let imgs: Vec<_> = snapshot.catalog.iter().map(|n| n.img.as_str()).collect();
        assert_eq!(
            imgs,
            vec![
                "https://cdn.example.com/uploads/great.jpg",
                "https://cdn.example.com/uploads/garden.jpg",
                "https://img.example.com/iron.png",
            ]
        );
    }

    #[tokio::test]
    async fn test_http_error_yields_empty_catalog() {
        let (mut cache, diagnostics) = cache(FakeApi::new().with_catalog_status(500));
        let snapshot = cache.load().await;

        assert!(snapshot.catalog.is_empty());
        assert!(snapshot.failed());
        assert!(cache.last_error().unwrap().contains("500"));
        assert!(diagnostics.entries()[0].message.contains("catalog load failed"));
    }

    #[tokio::test]
    async fn test_ensure_loaded_reuses_non_empty() {
        let api = FakeApi::new().with_catalog(sample_catalog());
        let (mut cache, _) = cache(api.clone());

        cache.ensure_loaded().await;
        cache.ensure_loaded().await;
        assert_eq!(api.catalog_calls(), 1);

        cache.load().await;
        assert_eq!(api.catalog_calls(), 2);

        cache.invalidate();
        assert!(cache.current().is_none());
        cache.ensure_loaded().await;
        assert_eq!(api.catalog_calls(), 3);
    }

    #[tokio::test]
    async fn test_ensure_loaded_retries_empty() {
        let api = FakeApi::new().with_catalog(Vec::new());
        let (mut cache, _) = cache(api.clone());

        cache.ensure_loaded().await;
        cache.ensure_loaded().await;
        assert_eq!(api.catalog_calls(), 2);
    }
}
