//! limenovel CLI - renders LimeNovel catalog views as HTML.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use limenovel::api::{HttpNovelApi, create_http_client};
use limenovel::config::Config;
use limenovel::console::Console;
use limenovel::render;
use limenovel::token::TokenStore;
use limenovel::views::{CarouselView, ChapterOrder, DetailView, GenreMenuView, Library, ResultsView};
use log::LevelFilter;
use maud::{Markup, html};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Renders LimeNovel catalog views as HTML.
#[derive(Parser, Debug)]
#[command(name = "limenovel")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Emit only the view fragment, without the surrounding document.
    #[arg(long, global = true)]
    fragment: bool,

    /// Append the diagnostic log box to the output.
    #[arg(long, global = true)]
    diagnostics: bool,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print errors to the terminal.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search novels by title.
    Search {
        query: String,

        /// Use live-search semantics (empty query shows "no results").
        #[arg(long)]
        live: bool,
    },

    /// Render the genre menu.
    Genres,

    /// List novels tagged with a genre (exact, case-sensitive).
    Genre { name: String },

    /// Render the carousel strip.
    Carousel {
        /// Advance the carousel this many slides before rendering.
        #[arg(long, default_value_t = 0)]
        advance: usize,
    },

    /// Render a novel's detail page from a location (`desk.html?id=..`) or a bare id.
    Detail {
        location: String,

        /// List chapters oldest first.
        #[arg(long)]
        oldest: bool,
    },

    /// Store a bearer token for authenticated requests.
    Login { token: String },

    /// Remove the stored bearer token.
    Logout,

    /// Print the config file location.
    ConfigPath,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let console = Console::new().quiet(args.quiet);

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let tokens = TokenStore::in_dir(&config_dir);

    match &args.command {
        Command::ConfigPath => {
            println!("{}", config_path.display());
            return Ok(());
        }
        Command::Login { token } => {
            tokens.set_token(token).context("Failed to store token")?;
            console.success(&format!("Token saved to {}", tokens.path().display()));
            return Ok(());
        }
        Command::Logout => {
            if tokens.clear_token().context("Failed to clear token")? {
                console.success("Token removed");
            } else {
                console.info("No token was stored");
            }
            return Ok(());
        }
        _ => {}
    }

    console.step("Loading configuration...");
    let config = Config::load_from(&config_path).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let token = tokens.token().unwrap_or_else(|err| {
        console.warning(&format!("Ignoring unreadable token storage: {}", err));
        None
    });
    if token.is_none() {
        log::debug!("no bearer token stored, sending unauthenticated requests");
    }

    let client = create_http_client(&config.http).context("Failed to create HTTP client")?;
    let api = HttpNovelApi::new(client, config.api.clone(), token);
    let library = Library::new(Arc::new(api), &config);

    let (title, content) = render_command(&args.command, &library, &console).await?;

    let content = if args.diagnostics {
        html! {
            (content)
            (render::diagnostic_log(&library.diagnostics().entries()))
        }
    } else {
        content
    };
    let page = if args.fragment {
        content.into_string()
    } else {
        render::document(&title, content).into_string()
    };

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, page)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            console.success(&format!("Wrote {}", path.display()));
        }
        None => println!("{}", page),
    }

    Ok(())
}

/// Runs one view command and returns the page title and rendered fragment.
async fn render_command(
    command: &Command,
    library: &Library,
    console: &Console,
) -> Result<(String, Markup)> {
    let links = library.links();

    match command {
        Command::Search { query, live } => {
            console.step(&format!("Searching for {:?}...", query));
            let outcome = if *live {
                library.search_live(query).await
            } else {
                library.search(query).await
            };
            let view = outcome.ready().context("Search was superseded")?;
            report_results(console, &view);
            Ok((format!("Search: {}", query), render::results(&view, links)))
        }
        Command::Genre { name } => {
            console.step(&format!("Loading genre {:?}...", name));
            let view = library
                .browse_genre(name)
                .await
                .ready()
                .context("Genre listing was superseded")?;
            report_results(console, &view);
            let menu = library.genre_menu().await;
            let content = html! {
                (render::genre_menu(&menu))
                (render::results(&view, links))
            };
            Ok((format!("Genre: {}", name), content))
        }
        Command::Genres => {
            console.step("Loading genres...");
            let view = library.genre_menu().await;
            match &view {
                GenreMenuView::Menu(menu) => console.success(&format!(
                    "{} genres",
                    console.count(menu.genres().len())
                )),
                GenreMenuView::Message(notice) => console.notice(notice),
            }
            Ok(("Genres".to_string(), render::genre_menu(&view)))
        }
        Command::Carousel { advance } => {
            console.step("Loading carousel...");
            let view = library
                .carousel()
                .await
                .ready()
                .context("Carousel load was superseded")?;
            let view = match view {
                CarouselView::Slides { slides, state } => {
                    library.with_carousel(|c| (0..*advance).for_each(|_| c.advance()));
                    let state = library.carousel_state().unwrap_or(state);
                    console.success(&format!(
                        "{} slides, showing {}",
                        console.count(slides.len()),
                        state.index()
                    ));
                    CarouselView::Slides { slides, state }
                }
                CarouselView::Message(notice) => {
                    console.notice(&notice);
                    CarouselView::Message(notice)
                }
            };
            library.unmount_carousel();
            Ok(("Carousel".to_string(), render::carousel(&view, links)))
        }
        Command::Detail { location, oldest } => {
            let location = if location.contains('=') {
                location.clone()
            } else {
                links.detail(location)
            };
            console.step(&format!("Loading {}...", location));
            let mut view = library.detail(&location).await;
            let title = match &mut view {
                DetailView::Ready(detail) => {
                    if *oldest {
                        detail.set_order(ChapterOrder::Oldest);
                    }
                    console.success(&format!(
                        "{} ({} chapters)",
                        detail.novel.title,
                        console.count(detail.novel.chapters.len())
                    ));
                    detail.novel.title.clone()
                }
                DetailView::Message(notice) => {
                    console.notice(notice);
                    "Novel".to_string()
                }
            };
            Ok((title, render::detail(&view, links)))
        }
        Command::Login { .. } | Command::Logout | Command::ConfigPath => {
            anyhow::bail!("{:?} does not render a view", command)
        }
    }
}

fn report_results(console: &Console, view: &ResultsView) {
    match view {
        ResultsView::Cards(cards) => {
            console.success(&format!("{} novels found", console.count(cards.len())))
        }
        ResultsView::Message(notice) => console.notice(notice),
    }
}
