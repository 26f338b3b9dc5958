//! Cover image handling.
//!
//! Two separate concerns live here: pure URL normalization of stored image
//! references, and the credentialed fetch that turns a URL into an inline
//! `data:` URI. A failed fetch never propagates; the caller always gets
//! something it can put in an `<img src>`.

use crate::api::NovelApi;
use crate::config::ApiConfig;
use crate::diagnostics::DiagnosticLog;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use regex::Regex;
use std::sync::{Arc, LazyLock};

/// Matches a leading URI scheme such as `https:` or `data:`.
static SCHEME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("Invalid SCHEME_REGEX"));

/// Fallback graphic for result cards.
pub const CARD_PLACEHOLDER: &str = "data:image/svg+xml,%3Csvg xmlns=%22http://www.w3.org/2000/svg%22 width=%22200%22 height=%22280%22%3E%3Crect fill=%22%23ddd%22 width=%22200%22 height=%22280%22/%3E%3Ctext x=%2250%25%22 y=%2250%25%22 text-anchor=%22middle%22 dy=%22.3em%22 fill=%22%23999%22%3ENo Image%3C/text%3E%3C/svg%3E";

/// Fallback graphic for carousel slides.
pub const SLIDE_PLACEHOLDER: &str = "data:image/svg+xml,%3Csvg xmlns=%22http://www.w3.org/2000/svg%22 width=%22300%22 height=%22400%22%3E%3Crect fill=%22%23ddd%22 width=%22300%22 height=%22400%22/%3E%3Ctext x=%2250%25%22 y=%2250%25%22 text-anchor=%22middle%22 dy=%22.3em%22 fill=%22%23999%22%3EImage Not Available%3C/text%3E%3C/svg%3E";

/// Rewrites an image reference into a fetchable URL.
///
/// References with a scheme are returned unchanged, references under the
/// upload prefix are resolved against `static_base`, and anything else is
/// left alone. Applying this twice gives the same result as applying it once.
pub fn normalize_image_url(reference: &str, static_base: &str, upload_prefix: &str) -> String {
    if reference.is_empty() {
        return String::new();
    }
    if SCHEME_REGEX.is_match(reference) {
        return reference.to_string();
    }
    if !upload_prefix.is_empty() && reference.starts_with(upload_prefix) {
        return format!("{}{}", static_base.trim_end_matches('/'), reference);
    }
    reference.to_string()
}

/// Raw cover bytes fetched from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl CoverImage {
    /// Inline `data:` URI for the image.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, BASE64.encode(&self.bytes))
    }
}

/// Where a rendered `<img>` takes its pixels from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverSource {
    Fetched(CoverImage),
    Placeholder,
}

/// Which placeholder graphic a view uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Card,
    Slide,
}

impl CoverSource {
    /// `src` attribute value, substituting the placeholder when nothing was fetched.
    pub fn src(&self, kind: PlaceholderKind) -> String {
        match self {
            CoverSource::Fetched(image) => image.to_data_uri(),
            CoverSource::Placeholder => match kind {
                PlaceholderKind::Card => CARD_PLACEHOLDER.to_string(),
                PlaceholderKind::Slide => SLIDE_PLACEHOLDER.to_string(),
            },
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, CoverSource::Placeholder)
    }
}

/// Normalizes image references and fetches covers through the API.
#[derive(Clone)]
pub struct ImageResolver {
    api: Arc<dyn NovelApi>,
    static_base: String,
    upload_prefix: String,
    diagnostics: DiagnosticLog,
}

impl ImageResolver {
    pub fn new(api: Arc<dyn NovelApi>, config: &ApiConfig, diagnostics: DiagnosticLog) -> Self {
        Self {
            api,
            static_base: config.static_base_url.clone(),
            upload_prefix: config.upload_prefix.clone(),
            diagnostics,
        }
    }

    /// Applies [`normalize_image_url`] with the configured bases.
    pub fn normalize(&self, reference: &str) -> String {
        normalize_image_url(reference, &self.static_base, &self.upload_prefix)
    }

    /// Fetches a cover, degrading to the placeholder on any failure.
    pub async fn resolve(&self, url: &str) -> CoverSource {
        if url.is_empty() {
            return CoverSource::Placeholder;
        }

        match self.api.fetch_image(url).await {
            Ok(image) => CoverSource::Fetched(image),
            Err(err) => {
                log::warn!("Failed to fetch image {}: {}", url, err);
                self.diagnostics
                    .record(format!("image fetch failed for {}: {}", url, err));
                CoverSource::Placeholder
            }
        }
    }
}
