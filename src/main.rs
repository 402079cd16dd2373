//! retro-news: a retro-styled terminal front page for a news API.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌────────────┐ LoadMsg{seq} ┌──────────┐  draw()  ┌──────────┐
//! │ loader.rs  │ ───────────► │  app.rs  │ ───────► │  ui.rs   │
//! │  (tokio)   │  (channel)   │ (state)  │          │ (render) │
//! └────────────┘              └──────────┘          └──────────┘
//!       ▲  request(seq, category)  ▲
//!       │                          │ handle_key_event()
//!       └──────── main loop ───────┤
//!                             ┌──────────┐
//!                             │ input.rs │
//!                             └──────────┘
//! ```
//!
//! * **`source/`**: the `NewsSource` trait, provider wire types, categories
//!   and the newsdata.io HTTP source.
//! * **`article`**: the display model and the provider → display transform.
//! * **`fallback`**: placeholder stories for when the wire is down.
//! * **`loader`**: never-failing fetch plus the background worker that
//!   makes sure only the latest request reaches the screen.
//! * **`bookmarks`**: bookmark set persisted through a key-value store.
//! * **`rotation`**: the featured-story carousel.
//! * **`app`**: owns all application state.
//! * **`ui`** / **`theme`**: pure rendering.
//! * **`input`**: maps key events to `App` mutations.
//! * **`config`**: config file and environment.
//! * **`main`**: wires everything together: parse args, set up logging,
//!   the runtime and the terminal, and run the event loop.

mod app;
mod article;
mod bookmarks;
mod config;
mod fallback;
mod input;
mod loader;
mod rotation;
mod source;
mod theme;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use app::App;
use bookmarks::{BookmarkStore, FileStore};
use config::{Config, API_KEY_ENV};
use loader::{FeedLoader, FeedWorker};
use source::NewsDataSource;

#[derive(Parser, Debug)]
#[command(name = "retro-news", version, about = "Retro terminal front page for the news")]
struct Args {
    /// Config file; bookmarks and the log default to its directory
    /// [default: ~/.config/retro-news/config.toml]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Section to open at startup (e.g. business, technology)
    #[arg(long, value_name = "NAME")]
    category: Option<String>,

    /// Override the news endpoint URL
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Log file [default: retro-news.log next to the config file]
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// RAII terminal guard, restores the terminal even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// `~/.config/retro-news/`, created (user-only on Unix) if missing.
///
/// Only consulted when `--config` is not given.
fn prepare_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("retro-news");
    std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(&config_dir, std::fs::Permissions::from_mode(0o700))
        {
            eprintln!(
                "warning: could not restrict permissions on {}: {e}",
                config_dir.display()
            );
        }
    }

    Ok(config_dir)
}

/// Bookmarks and the default log file live next to the config file.
fn data_dir_for(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Log to a file: stdout belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file '{}'", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("retro_news=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = match args.config.clone() {
        Some(path) => path,
        None => prepare_config_dir()?.join("config.toml"),
    };
    let data_dir = data_dir_for(&config_path);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create '{}'", data_dir.display()))?;

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir.join("retro-news.log"));
    init_logging(&log_path)?;

    // -- configuration -------------------------------------------------------
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(category) = args.category {
        config.default_category = category;
    }

    let api_key = config.resolve_api_key(std::env::var(API_KEY_ENV).ok())?;
    let source = NewsDataSource::new(config.endpoint_url()?, api_key, config.request_timeout())
        .context("Failed to build HTTP client")?;

    tracing::info!(?config, "Starting retro-news");

    // -- background loading --------------------------------------------------
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("retro-news-fetch")
        .build()
        .context("Failed to start async runtime")?;
    let (mut worker, rx) = FeedWorker::new(FeedLoader::new(source), runtime.handle().clone());

    let bookmarks = BookmarkStore::load(Box::new(FileStore::new(&data_dir)));
    let mut app = App::new(bookmarks, config.category());

    // -- terminal setup (RAII: Drop restores on exit or panic) --------------
    install_panic_hook();
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Hand any queued load to the worker.
    //   2. Apply finished loads (stale ones are dropped by the app).
    //   3. Advance the featured rotation and render.
    //   4. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        if let Some(request) = app.take_load_request() {
            worker.request(request.seq, request.category);
        }

        while let Ok(msg) = rx.try_recv() {
            app.apply_load(msg, Instant::now());
        }

        let now = Instant::now();
        app.on_tick(now);
        guard.terminal.draw(|f| ui::draw(&mut app, f, now))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key, Instant::now());
            }
        }

        if app.quit {
            break;
        }
    }

    app.rotation.disarm();
    drop(worker);
    drop(guard);
    runtime.shutdown_timeout(Duration::from_millis(500));
    tracing::info!("Exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_follows_config_file() {
        assert_eq!(
            data_dir_for(Path::new("/srv/news/config.toml")),
            PathBuf::from("/srv/news")
        );
    }

    #[test]
    fn bare_config_file_name_uses_current_dir() {
        assert_eq!(data_dir_for(Path::new("config.toml")), PathBuf::from("."));
    }
}
