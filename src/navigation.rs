//! Navigation links and query parsing.
//!
//! Detail pages take the novel id in `id`; chapter pages take the novel id in
//! `id` and the chapter id in `ch`.

use crate::config::PagesConfig;
use crate::error::NavigationError;
use url::form_urlencoded;

/// Builds page links from the configured page names.
#[derive(Debug, Clone, Default)]
pub struct Links {
    pages: PagesConfig,
}

impl Links {
    pub fn new(pages: PagesConfig) -> Self {
        Self { pages }
    }

    pub fn home(&self) -> &str {
        &self.pages.home
    }

    /// `desk.html?id=<novel>`
    pub fn detail(&self, novel_id: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("id", novel_id)
            .finish();
        format!("{}?{}", self.pages.detail, query)
    }

    /// `ch.html?id=<novel>&ch=<chapter>`
    pub fn chapter(&self, novel_id: &str, chapter_id: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("id", novel_id)
            .append_pair("ch", chapter_id)
            .finish();
        format!("{}?{}", self.pages.chapter, query)
    }
}

/// Target of a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRoute {
    pub novel_id: String,
}

/// Target of a chapter page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRoute {
    pub novel_id: String,
    pub chapter_id: String,
}

impl DetailRoute {
    /// Parses `id` out of a location (`desk.html?id=..`, `?id=..`, or `id=..`).
    pub fn parse(location: &str) -> Result<Self, NavigationError> {
        Ok(Self {
            novel_id: required_param(location, "id")?,
        })
    }
}

impl ChapterRoute {
    pub fn parse(location: &str) -> Result<Self, NavigationError> {
        Ok(Self {
            novel_id: required_param(location, "id")?,
            chapter_id: required_param(location, "ch")?,
        })
    }
}

fn query_part(location: &str) -> &str {
    let without_fragment = location.split('#').next().unwrap_or_default();
    match without_fragment.split_once('?') {
        Some((_, query)) => query,
        None => without_fragment,
    }
}

fn required_param(location: &str, name: &'static str) -> Result<String, NavigationError> {
    form_urlencoded::parse(query_part(location).as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.trim().is_empty())
        .ok_or(NavigationError::MissingParameter(name))
}
