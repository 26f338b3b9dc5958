//! HTML rendering.
//!
//! Uses [maud](https://maud.lambda.xyz/) templates, so every piece of catalog
//! text is escaped by the template layer; there is no string-built markup.

use crate::carousel::Carousel;
use crate::diagnostics::DiagnosticEntry;
use crate::images::PlaceholderKind;
use crate::navigation::Links;
use crate::views::{
    Card, CarouselView, ChapterOrder, Detail, DetailView, GenreMenuView, Notice, ResultsView,
};
use maud::{DOCTYPE, Markup, html};

/// Text shown for empty card fields.
const MISSING: &str = "-";

fn or_missing(value: &str) -> &str {
    if value.is_empty() { MISSING } else { value }
}

// ============================================================================
// Components
// ============================================================================

/// Wraps a fragment in a full HTML document.
pub fn document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body {
                (content)
            }
        }
    }
}

pub fn notice(notice: &Notice) -> Markup {
    html! {
        p class=(if notice.is_error() { "notice error" } else { "notice" }) { (notice.text()) }
    }
}

/// One search/genre result card, linking to the detail page.
pub fn novel_card(card: &Card, links: &Links) -> Markup {
    let novel = &card.novel;
    let genres = novel.genre_line();

    html! {
        div.novel-card {
            a href=(links.detail(&novel.id)) {
                img.cover-img src=(card.cover.src(PlaceholderKind::Card)) alt=(novel.title);
                h3 { (or_missing(&novel.title)) }
                p { strong { "Status:" } " " (or_missing(&novel.status)) }
                p { strong { "Year:" } " " (or_missing(&novel.year)) }
                p { strong { "Genre:" } " " (or_missing(&genres)) }
                p { strong { "Rating:" } " " (or_missing(&novel.rating)) }
                p { strong { "Total Views:" } " " (novel.total_views()) }
            }
        }
    }
}

/// The results container for search and genre views.
pub fn results(view: &ResultsView, links: &Links) -> Markup {
    html! {
        div id="searchResults" {
            @match view {
                ResultsView::Cards(cards) => {
                    @for card in cards {
                        (novel_card(card, links))
                    }
                }
                ResultsView::Message(message) => (notice(message)),
            }
        }
    }
}

pub fn genre_menu(view: &GenreMenuView) -> Markup {
    html! {
        div id="genreDropdown" {
            @match view {
                GenreMenuView::Menu(menu) => {
                    @for genre in menu.genres() {
                        a class=(if menu.is_active(genre) { "genre-item active" } else { "genre-item" })
                            href="#" data-genre=(genre) { (genre) }
                    }
                }
                GenreMenuView::Message(message) => (notice(message)),
            }
        }
    }
}

fn slide(card: &Card, class: &str, links: &Links) -> Markup {
    let novel = &card.novel;

    html! {
        div class={ "slide " (class) } {
            a href=(links.detail(&novel.id)) {
                img src=(card.cover.src(PlaceholderKind::Slide)) alt=(novel.title);
                div.slide-info {
                    span.status { (novel.status) }
                    h3 { (novel.title) }
                    div.tags {
                        span.rating { (novel.rating) }
                        span.views { (novel.total_views()) }
                        @for genre in novel.genre_tags() {
                            span.genre { (genre) }
                        }
                    }
                }
            }
        }
    }
}

/// The carousel strip, positioned and classified from `state`.
pub fn carousel(view: &CarouselView, links: &Links) -> Markup {
    html! {
        div.carousel {
            @match view {
                CarouselView::Slides { slides, state } => {
                    div id="carouselTrack" style=(track_style(state)) {
                        @for (i, card) in slides.iter().enumerate() {
                            (slide(card, state.classify(i).css(), links))
                        }
                    }
                }
                CarouselView::Message(message) => {
                    div id="carouselTrack" { (notice(message)) }
                }
            }
        }
    }
}

fn track_style(state: &Carousel) -> String {
    format!(
        "transition: {}; transform: {};",
        state.transition().css(),
        state.transform()
    )
}

fn order_button(id: &str, label: &str, active: bool) -> Markup {
    html! {
        button id=(id) class=[active.then_some("active")] type="button" { (label) }
    }
}

pub fn chapter_list(detail: &Detail, links: &Links) -> Markup {
    let order = detail.order();

    html! {
        div.chapter-controls {
            (order_button("btnNewest", "Newest", order == ChapterOrder::Newest))
            (order_button("btnOldest", "Oldest", order == ChapterOrder::Oldest))
        }
        div id="chapterList" {
            @for chapter in detail.ordered_chapters() {
                div.chapter-item {
                    a href=(links.chapter(&detail.novel.id, &chapter.id)) { (chapter.title) }
                    div.views { (chapter.views) }
                }
            }
        }
    }
}

/// Detail card, synopsis and chapter list.
pub fn detail(view: &DetailView, links: &Links) -> Markup {
    html! {
        div id="novel-slider" {
            @match view {
                DetailView::Ready(detail) => {
                    @let novel = &detail.novel;
                    div.card {
                        img src=(detail.cover.src(PlaceholderKind::Card)) alt=(novel.title);
                        h2 { (novel.title) }
                        div.meta {
                            span.rating { (novel.rating) }
                            " "
                            span.year { (novel.year) }
                            " "
                            span.status { (novel.status) }
                        }
                        div.genre { (novel.genre_line()) }
                        a.btn-back href=(links.home()) { "Back" }
                    }
                    div.section {
                        h3 { "Synopsis" }
                        p { (novel.summary) }
                    }
                    (chapter_list(detail, links))
                }
                DetailView::Message(message) => (notice(message)),
            }
        }
    }
}

/// On-page diagnostic log box, newest entry first.
pub fn diagnostic_log(entries: &[DiagnosticEntry]) -> Markup {
    html! {
        div id="logBox" {
            @for entry in entries {
                div { (entry.line()) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::SlideGeometry;
    use crate::config::Config;
    use crate::diagnostics::DiagnosticLog;
    use crate::genres::GenreMenu;
    use crate::images::{CARD_PLACEHOLDER, CoverImage, CoverSource};
    use crate::test_helpers::{FakeApi, chapter, novel};
    use crate::views::Library;
    use scraper::{Html, Selector};
    use std::sync::Arc;

    fn select_all(html: &str, selector: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        let selector = Selector::parse(selector).unwrap();
        doc.select(&selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect()
    }

    fn attr(html: &str, selector: &str, name: &str) -> Option<String> {
        let doc = Html::parse_document(html);
        let selector = Selector::parse(selector).unwrap();
        doc.select(&selector)
            .next()
            .and_then(|el| el.value().attr(name).map(str::to_string))
    }

    fn card(title: &str) -> Card {
        let mut n = novel("n&1", title, ["SciFi", "", "Drama"], "");
        n.chapters = vec![chapter("c1", "One", 4), chapter("c2", "Two", 6)];
        Card {
            novel: n,
            cover: CoverSource::Placeholder,
        }
    }

    #[test]
    fn test_card_fields() {
        let html = novel_card(&card("The Great Tale"), &Links::default()).into_string();

        assert_eq!(select_all(&html, "h3"), vec!["The Great Tale"]);
        let lines = select_all(&html, "p");
        assert!(lines.contains(&"Genre: SciFi, Drama".to_string()));
        assert!(lines.contains(&"Total Views: 10".to_string()));
        assert_eq!(attr(&html, "a", "href").as_deref(), Some("desk.html?id=n%261"));
        assert_eq!(attr(&html, "img", "src").as_deref(), Some(CARD_PLACEHOLDER));
    }

    #[test]
    fn test_card_missing_fields_show_dash() {
        let mut c = card("Untitled");
        c.novel.status.clear();
        c.novel.genres = Default::default();
        let html = novel_card(&c, &Links::default()).into_string();

        let lines = select_all(&html, "p");
        assert!(lines.contains(&"Status: -".to_string()));
        assert!(lines.contains(&"Genre: -".to_string()));
    }

    #[test]
    fn test_markup_in_catalog_text_is_escaped() {
        let evil = card("<script>alert(1)</script>");
        let links = Links::default();

        let rendered = [
            novel_card(&evil, &links).into_string(),
            results(&ResultsView::Cards(vec![evil.clone()]), &links).into_string(),
            carousel(
                &CarouselView::Slides {
                    slides: vec![evil.clone()],
                    state: Carousel::new(1, SlideGeometry {
                        slide_width: 300.0,
                        gap: 20.0,
                        viewport_width: 900.0,
                    }),
                },
                &links,
            )
            .into_string(),
        ];

        for html in rendered {
            assert!(!html.contains("<script>"), "{html}");
            assert!(html.contains("&lt;script&gt;"));
            assert!(select_all(&html, "script").is_empty());
        }
    }

    #[test]
    fn test_results_message() {
        let html = results(&ResultsView::Message(Notice::NoResults), &Links::default()).into_string();
        assert_eq!(select_all(&html, "#searchResults p"), vec!["No results"]);

        let html = results(&ResultsView::Message(Notice::LoadFailed), &Links::default()).into_string();
        assert_eq!(select_all(&html, "p.error"), vec!["Failed to load data."]);
    }

    #[test]
    fn test_genre_menu_active_item() {
        let mut menu = GenreMenu::new(vec!["Drama".into(), "Romance".into()]);
        menu.select("Romance");
        let html = genre_menu(&GenreMenuView::Menu(menu)).into_string();

        assert_eq!(select_all(&html, "a.genre-item"), vec!["Drama", "Romance"]);
        assert_eq!(select_all(&html, "a.active"), vec!["Romance"]);
        assert_eq!(attr(&html, "a.active", "data-genre").as_deref(), Some("Romance"));
    }

    #[test]
    fn test_carousel_classes_and_transform() {
        let mut state = Carousel::new(3, SlideGeometry {
            slide_width: 300.0,
            gap: 20.0,
            viewport_width: 900.0,
        });
        state.advance();
        let view = CarouselView::Slides {
            slides: vec![card("A"), card("B"), card("C")],
            state,
        };
        let html = carousel(&view, &Links::default()).into_string();

        assert_eq!(select_all(&html, ".slide.active h3"), vec!["B"]);
        assert_eq!(select_all(&html, ".slide.adjacent h3"), vec!["A", "C"]);
        let style = attr(&html, "#carouselTrack", "style").unwrap();
        assert!(style.contains("translateX(-20px)"));
        assert!(style.contains("transform .35s ease"));
        assert_eq!(select_all(&html, ".slide .genre"), vec!["SciFi", "Drama", "SciFi", "Drama", "SciFi", "Drama"]);
    }

    #[test]
    fn test_empty_carousel_has_no_slides() {
        let view = CarouselView::Slides {
            slides: Vec::new(),
            state: Carousel::new(0, SlideGeometry {
                slide_width: 300.0,
                gap: 20.0,
                viewport_width: 900.0,
            }),
        };
        let html = carousel(&view, &Links::default()).into_string();
        assert!(select_all(&html, ".slide").is_empty());
    }

    #[tokio::test]
    async fn test_detail_page_and_chapter_order() {
        let mut n = novel("n1", "Tale <b>", ["Drama", "", ""], "");
        n.summary = "It & ends".to_string();
        n.chapters = vec![chapter("c2", "Second", 7), chapter("c1", "First", 3)];
        let lib = Library::new(Arc::new(FakeApi::new().with_novel(n)), &Config::default());

        let DetailView::Ready(mut d) = lib.detail("?id=n1").await else {
            panic!("expected detail");
        };
        let html = detail(&DetailView::Ready(d.clone()), lib.links()).into_string();
        assert_eq!(select_all(&html, "h2"), vec!["Tale <b>"]);
        assert_eq!(select_all(&html, ".section p"), vec!["It & ends"]);
        assert_eq!(select_all(&html, "#chapterList a"), vec!["Second", "First"]);
        assert_eq!(select_all(&html, "button.active"), vec!["Newest"]);
        assert_eq!(attr(&html, "#chapterList a", "href").as_deref(), Some("ch.html?id=n1&ch=c2"));
        assert_eq!(attr(&html, "a.btn-back", "href").as_deref(), Some("index.html"));

        d.set_order(ChapterOrder::Oldest);
        let html = chapter_list(&d, lib.links()).into_string();
        assert_eq!(select_all(&html, "#chapterList a"), vec!["First", "Second"]);
        assert_eq!(select_all(&html, "button.active"), vec!["Oldest"]);
        assert_eq!(select_all(&html, ".views"), vec!["3", "7"]);
    }

    #[test]
    fn test_detail_message() {
        let html = detail(&DetailView::Message(Notice::NovelNotFound), &Links::default()).into_string();
        assert_eq!(select_all(&html, "#novel-slider p"), vec!["Novel not found."]);
    }

    #[test]
    fn test_fetched_cover_is_inlined() {
        let mut c = card("Pic");
        c.cover = CoverSource::Fetched(CoverImage {
            content_type: "image/jpeg".to_string(),
            bytes: vec![1, 2, 3],
        });
        let html = novel_card(&c, &Links::default()).into_string();
        assert_eq!(attr(&html, "img", "src").as_deref(), Some("data:image/jpeg;base64,AQID"));
    }

    #[test]
    fn test_document_and_log_box() {
        let log = DiagnosticLog::new(5);
        log.record("first");
        log.record("<second>");
        let doc = document("Lime", diagnostic_log(&log.entries())).into_string();

        assert!(doc.starts_with("<!DOCTYPE html>"));
        let lines = select_all(&doc, "#logBox div");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("<second>"));
        assert!(doc.contains("&lt;second&gt;"));
    }
}
