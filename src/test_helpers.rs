//! Shared test fixtures: an in-memory [`NovelApi`] and novel builders.

use crate::api::NovelApi;
use crate::error::ApiError;
use crate::images::CoverImage;
use crate::models::{Chapter, Novel};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// In-memory API. Clones share call counters.
#[derive(Clone, Default)]
pub struct FakeApi {
    catalog: Option<Vec<Novel>>,
    catalog_status: Option<u16>,
    catalog_delay: Option<Duration>,
    novels: HashMap<String, Novel>,
    novel_status: Option<u16>,
    images: HashMap<String, Result<Vec<u8>, u16>>,
    image_delays: HashMap<String, Duration>,
    catalog_calls: Arc<AtomicUsize>,
    image_calls: Arc<AtomicUsize>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, novels: Vec<Novel>) -> Self {
        self.catalog = Some(novels);
        self
    }

    /// Every catalog request answers with this HTTP status.
    pub fn with_catalog_status(mut self, status: u16) -> Self {
        self.catalog_status = Some(status);
        self
    }

    pub fn with_catalog_delay(mut self, delay: Duration) -> Self {
        self.catalog_delay = Some(delay);
        self
    }

    pub fn with_novel(mut self, novel: Novel) -> Self {
        self.novels.insert(novel.id.clone(), novel);
        self
    }

    /// Every single-novel request answers with this HTTP status.
    pub fn with_novel_status(mut self, status: u16) -> Self {
        self.novel_status = Some(status);
        self
    }

    pub fn with_image(mut self, url: &str, bytes: &[u8]) -> Self {
        self.images.insert(url.to_string(), Ok(bytes.to_vec()));
        self
    }

    pub fn with_broken_image(mut self, url: &str, status: u16) -> Self {
        self.images.insert(url.to_string(), Err(status));
        self
    }

    pub fn with_image_delay(mut self, url: &str, delay: Duration) -> Self {
        self.image_delays.insert(url.to_string(), delay);
        self
    }

    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }
}

fn status_error(status: u16) -> ApiError {
    ApiError::Status {
        status,
        message: "fake failure".to_string(),
    }
}

#[async_trait]
impl NovelApi for FakeApi {
    async fn fetch_catalog(&self) -> Result<Vec<Novel>, ApiError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.catalog_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(status) = self.catalog_status {
            return Err(status_error(status));
        }
        Ok(self.catalog.clone().unwrap_or_default())
    }

    async fn fetch_novel(&self, id: &str) -> Result<Option<Novel>, ApiError> {
        if let Some(status) = self.novel_status {
            return Err(status_error(status));
        }
        Ok(self.novels.get(id).cloned())
    }

    async fn fetch_image(&self, url: &str) -> Result<CoverImage, ApiError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.image_delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        match self.images.get(url) {
            Some(Ok(bytes)) => Ok(CoverImage {
                content_type: "image/png".to_string(),
                bytes: bytes.clone(),
            }),
            Some(Err(status)) => Err(status_error(*status)),
            None => Err(status_error(404)),
        }
    }
}

/// Builds a novel with the given genre slots and image reference.
pub fn novel(id: &str, title: &str, genres: [&str; 3], img: &str) -> Novel {
    Novel {
        id: id.to_string(),
        title: title.to_string(),
        status: "Ongoing".to_string(),
        year: "2024".to_string(),
        rating: "4.5".to_string(),
        genres: genres.map(str::to_string),
        img: img.to_string(),
        summary: format!("Summary of {}", title),
        chapters: Vec::new(),
    }
}

pub fn chapter(id: &str, title: &str, views: u64) -> Chapter {
    Chapter {
        id: id.to_string(),
        title: title.to_string(),
        views,
    }
}

/// Three novels with overlapping genres and upload-relative covers.
pub fn sample_catalog() -> Vec<Novel> {
    let mut great = novel(
        "n1",
        "The Great Tale",
        ["SciFi", "Drama", ""],
        "/uploads/great.jpg",
    );
    great.chapters = vec![chapter("c1", "Start", 10), chapter("c2", "Middle", 5)];

    vec![
        great,
        novel("n2", "Quiet Garden", ["Drama", "Romance", ""], "/uploads/garden.jpg"),
        novel("n3", "Iron Sky", ["SciFi", "", "Action"], "https://img.example.com/iron.png"),
    ]
}
