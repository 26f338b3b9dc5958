//! Catalog data types and their wire format.
//!
//! The API is loosely typed: years and ratings arrive as strings or numbers,
//! identifiers as `id` or `_id`, and view counts as numbers, numeric strings,
//! or nothing at all. Deserialization absorbs all of that so the rest of the
//! crate only sees plain text and integers.

use crate::error::ApiError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A single chapter entry embedded in a novel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RawChapter")]
pub struct Chapter {
    pub id: String,
    pub title: String,
    /// Never negative; absent or non-numeric counts are 0.
    pub views: u64,
}

/// A novel as delivered by the API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RawNovel")]
pub struct Novel {
    pub id: String,
    pub title: String,
    pub status: String,
    pub year: String,
    pub rating: String,
    /// The three fixed genre slots; empty strings are unused slots.
    pub genres: [String; 3],
    /// Image reference. Absolute once the novel has passed through the catalog loader.
    pub img: String,
    pub summary: String,
    pub chapters: Vec<Chapter>,
}

impl Novel {
    /// Sum of all chapter view counts.
    pub fn total_views(&self) -> u64 {
        self.chapters
            .iter()
            .fold(0u64, |sum, ch| sum.saturating_add(ch.views))
    }

    /// Non-empty genre slots, in slot order.
    pub fn genre_tags(&self) -> impl Iterator<Item = &str> {
        self.genres
            .iter()
            .map(String::as_str)
            .filter(|g| !g.is_empty())
    }

    /// Non-empty genre slots joined by `", "`.
    pub fn genre_line(&self) -> String {
        self.genre_tags().collect::<Vec<_>>().join(", ")
    }

    /// Exact, case-sensitive match against any of the three slots.
    pub fn has_genre(&self, genre: &str) -> bool {
        !genre.is_empty() && self.genres.iter().any(|g| g == genre)
    }

    /// Case-insensitive substring match on the title.
    ///
    /// `needle` is expected to be lowercased and trimmed already.
    pub fn title_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
    }
}

/// The in-memory collection of all novels, in API order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    novels: Vec<Novel>,
}

impl Catalog {
    pub fn new(novels: Vec<Novel>) -> Self {
        Self { novels }
    }

    pub fn len(&self) -> usize {
        self.novels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.novels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Novel> {
        self.novels.iter()
    }

    pub fn novels(&self) -> &[Novel] {
        &self.novels
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Novel;
    type IntoIter = std::slice::Iter<'a, Novel>;

    fn into_iter(self) -> Self::IntoIter {
        self.novels.iter()
    }
}

/// Parses a catalog response body.
///
/// Accepts a bare array or an object carrying a `novels` array. Anything else
/// is a shape error. Entries that are not objects are skipped.
pub fn parse_catalog(body: &str) -> Result<Vec<Novel>, ApiError> {
    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::Array(items) => Ok(novel_list(items)),
        Value::Object(mut map) => match map.remove("novels") {
            Some(Value::Array(items)) => Ok(novel_list(items)),
            Some(_) => Err(ApiError::Shape("\"novels\" is not an array".to_string())),
            None => Err(ApiError::Shape("object has no \"novels\" field".to_string())),
        },
        other => Err(ApiError::Shape(format!(
            "expected array or object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Parses a single-novel response body (`{ "novel": ... }`).
///
/// Returns `Ok(None)` when the envelope holds no novel.
pub fn parse_novel(body: &str) -> Result<Option<Novel>, ApiError> {
    #[derive(Deserialize)]
    struct Envelope {
        #[serde(default)]
        novel: Option<Novel>,
    }

    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(ApiError::Shape(format!(
            "expected object, got {}",
            json_kind(&value)
        )));
    }
    let envelope: Envelope = serde_json::from_value(value)?;
    Ok(envelope.novel)
}

fn novel_list(items: Vec<Value>) -> Vec<Novel> {
    items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawChapter {
    #[serde(deserialize_with = "text")]
    id: String,
    #[serde(rename = "_id", deserialize_with = "text")]
    object_id: String,
    #[serde(deserialize_with = "text")]
    title: String,
    #[serde(deserialize_with = "view_count")]
    views: u64,
}

impl From<RawChapter> for Chapter {
    fn from(raw: RawChapter) -> Self {
        Self {
            id: first_non_empty(raw.id, raw.object_id),
            title: raw.title,
            views: raw.views,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawNovel {
    #[serde(deserialize_with = "text")]
    id: String,
    #[serde(rename = "_id", deserialize_with = "text")]
    object_id: String,
    #[serde(deserialize_with = "text")]
    title: String,
    #[serde(deserialize_with = "text")]
    status: String,
    #[serde(deserialize_with = "text")]
    year: String,
    #[serde(deserialize_with = "text")]
    rating: String,
    #[serde(deserialize_with = "text")]
    genre1: String,
    #[serde(deserialize_with = "text")]
    genre2: String,
    #[serde(deserialize_with = "text")]
    genre3: String,
    #[serde(deserialize_with = "text")]
    img: String,
    #[serde(deserialize_with = "text")]
    summary: String,
    #[serde(deserialize_with = "chapter_list")]
    chapters: Vec<Chapter>,
}

impl From<RawNovel> for Novel {
    fn from(raw: RawNovel) -> Self {
        Self {
            id: first_non_empty(raw.id, raw.object_id),
            title: raw.title,
            status: raw.status,
            year: raw.year,
            rating: raw.rating,
            genres: [raw.genre1, raw.genre2, raw.genre3],
            img: raw.img,
            summary: raw.summary,
            chapters: raw.chapters,
        }
    }
}

fn first_non_empty(primary: String, fallback: String) -> String {
    if primary.is_empty() { fallback } else { primary }
}

/// Strings pass through, numbers and booleans are stringified, anything else is empty.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn view_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let as_count = |f: f64| (f.is_finite() && f > 0.0).then_some(f as u64);
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(as_count)),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(as_count),
        _ => None,
    }
    .unwrap_or(0))
}

/// A non-array chapter list is treated as empty; malformed entries are skipped.
fn chapter_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Chapter>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}
