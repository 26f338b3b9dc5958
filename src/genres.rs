//! Genre index and menu selection.

use crate::models::Catalog;
use std::collections::BTreeSet;

/// Distinct non-empty genres across all three slots, sorted.
///
/// Comparison is exact: tags differing only in case are distinct entries.
pub fn genre_index(catalog: &Catalog) -> Vec<String> {
    catalog
        .iter()
        .flat_map(|novel| novel.genre_tags())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Genre menu with exclusive selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreMenu {
    genres: Vec<String>,
    active: Option<String>,
}

impl GenreMenu {
    pub fn new(genres: Vec<String>) -> Self {
        Self {
            genres,
            active: None,
        }
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self, genre: &str) -> bool {
        self.active.as_deref() == Some(genre)
    }

    /// Marks `genre` active and every other entry inactive.
    ///
    /// A genre not in the menu clears the selection; returns whether it was found.
    pub fn select(&mut self, genre: &str) -> bool {
        let found = self.genres.iter().any(|g| g == genre);
        self.active = found.then(|| genre.to_string());
        found
    }

    /// Replaces the entries, keeping the selection only if it still exists.
    pub fn rebuild(&mut self, genres: Vec<String>) {
        self.genres = genres;
        if let Some(active) = self.active.take() {
            self.select(&active);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::novel;

    #[test]
    fn test_index_deduplicated_and_sorted() {
        let catalog = Catalog::new(vec![
            novel("1", "A", ["SciFi", "Drama", ""], ""),
            novel("2", "B", ["Drama", "Romance", ""], ""),
        ]);
        assert_eq!(genre_index(&catalog), vec!["Drama", "Romance", "SciFi"]);
    }

    #[test]
    fn test_index_keeps_case_variants() {
        let catalog = Catalog::new(vec![
            novel("1", "A", ["Drama", "", ""], ""),
            novel("2", "B", ["drama", "", "Action"], ""),
        ]);
        assert_eq!(genre_index(&catalog), vec!["Action", "Drama", "drama"]);
    }

    #[test]
    fn test_index_of_empty_catalog() {
        assert!(genre_index(&Catalog::default()).is_empty());
    }

    #[test]
    fn test_selection_is_exclusive() {
        let mut menu = GenreMenu::new(vec!["Drama".into(), "Romance".into(), "SciFi".into()]);
        assert!(menu.select("Drama"));
        assert!(menu.select("SciFi"));

        let active: Vec<_> = menu.genres().iter().filter(|g| menu.is_active(g)).collect();
        assert_eq!(active, vec!["SciFi"]);
    }

    #[test]
    fn test_unknown_selection_clears() {
        let mut menu = GenreMenu::new(vec!["Drama".into()]);
        menu.select("Drama");
        assert!(!menu.select("Horror"));
        assert_eq!(menu.active(), None);
    }

    #[test]
    fn test_rebuild_keeps_surviving_selection() {
        let mut menu = GenreMenu::new(vec!["Drama".into(), "SciFi".into()]);
        menu.select("SciFi");
        menu.rebuild(vec!["Action".into(), "SciFi".into()]);
        assert_eq!(menu.active(), Some("SciFi"));

        menu.rebuild(vec!["Action".into()]);
        assert_eq!(menu.active(), None);
    }
}
