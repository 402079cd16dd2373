use std::time::Instant;

use ratatui::widgets::ListState;

use crate::article::DisplayArticle;
use crate::bookmarks::BookmarkStore;
use crate::fallback::is_fallback;
use crate::loader::LoadMsg;
use crate::rotation::FeaturedRotation;
use crate::source::Category;

/// A load the main loop should hand to the feed worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub seq: u64,
    pub category: Category,
}

/// The open reading modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderState {
    /// Index into [`App::articles`].
    pub index: usize,
    /// Vertical scroll offset in lines.
    pub scroll: u16,
}

pub struct App {
    /// Section currently shown (or being loaded).
    pub category: Category,
    /// The current page.  Replaced wholesale on every load.
    pub articles: Vec<DisplayArticle>,
    /// List selection state for scrolling.
    pub list_state: ListState,
    pub bookmarks: BookmarkStore,
    pub rotation: FeaturedRotation,
    pub reader: Option<ReaderState>,
    /// A load has been requested and not yet applied.
    pub loading: bool,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
    /// Sequence number of the most recent load request.
    latest_seq: u64,
    pending: Option<LoadRequest>,
}

impl App {
    /// Create the app and queue the initial load for `category`.
    pub fn new(bookmarks: BookmarkStore, category: Category) -> Self {
        let mut app = Self {
            category,
            articles: Vec::new(),
            list_state: ListState::default(),
            bookmarks,
            rotation: FeaturedRotation::default(),
            reader: None,
            loading: false,
            quit: false,
            status: "Starting…".into(),
            latest_seq: 0,
            pending: None,
        };
        app.request_load();
        app
    }

    // -- loading -------------------------------------------------------------

    /// Take the queued load request, if any.
    pub fn take_load_request(&mut self) -> Option<LoadRequest> {
        self.pending.take()
    }

    /// Switch sections: selection and featured story go back to the top and
    /// a fresh load is queued.
    pub fn select_category(&mut self, category: Category, now: Instant) {
        self.category = category;
        self.reader = None;
        if !self.articles.is_empty() {
            self.list_state.select(Some(0));
        }
        self.rotation.reset(self.articles.len(), now);
        self.request_load();
    }

    pub fn next_category(&mut self, now: Instant) {
        self.select_category(self.category.next(), now);
    }

    pub fn previous_category(&mut self, now: Instant) {
        self.select_category(self.category.previous(), now);
    }

    /// Re-fetch the current section.
    pub fn reload(&mut self) {
        self.request_load();
    }

    fn request_load(&mut self) {
        self.latest_seq += 1;
        self.pending = Some(LoadRequest {
            seq: self.latest_seq,
            category: self.category,
        });
        self.loading = true;
        self.status = format!("Fetching {}…", self.category);
    }

    /// Apply a finished load.  Returns `false` (and changes nothing) when the
    /// result belongs to a request that has since been superseded.
    pub fn apply_load(&mut self, msg: LoadMsg, now: Instant) -> bool {
        if msg.seq != self.latest_seq {
            tracing::debug!(
                seq = msg.seq,
                latest = self.latest_seq,
                category = %msg.category,
                "Discarding stale feed result"
            );
            return false;
        }

        self.articles = msg.articles;
        self.loading = false;
        self.reader = None;
        self.list_state
            .select(if self.articles.is_empty() { None } else { Some(0) });
        self.rotation.reset(self.articles.len(), now);

        self.status = if self.is_demo() {
            "Wire service unavailable, showing demo content".into()
        } else {
            format!("{} stories in {}", self.articles.len(), msg.category)
        };
        true
    }

    /// Whether the page on screen is the fallback set.
    pub fn is_demo(&self) -> bool {
        is_fallback(&self.articles)
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.rotation.tick(now);
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.articles.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.articles.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.articles.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.articles.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.articles.is_empty() {
            self.list_state.select(Some(self.articles.len() - 1));
        }
    }

    // -- featured story ------------------------------------------------------

    pub fn featured_article(&self) -> Option<&DisplayArticle> {
        self.rotation.current().and_then(|i| self.articles.get(i))
    }

    pub fn next_featured(&mut self, now: Instant) {
        self.rotation.next(now);
    }

    pub fn jump_featured(&mut self, index: usize, now: Instant) {
        self.rotation.jump(index, now);
    }

    // -- articles & bookmarks ------------------------------------------------

    /// The article actions apply to: the one open in the reader, else the
    /// highlighted list entry.
    pub fn selected_article(&self) -> Option<&DisplayArticle> {
        let index = match self.reader {
            Some(reader) => Some(reader.index),
            None => self.list_state.selected(),
        };
        index.and_then(|i| self.articles.get(i))
    }

    pub fn is_bookmarked(&self, article: &DisplayArticle) -> bool {
        self.bookmarks.contains(&article.id)
    }

    pub fn toggle_bookmark_selected(&mut self) {
        let Some(id) = self.selected_article().map(|a| a.id.clone()) else {
            return;
        };
        self.status = if self.bookmarks.toggle(&id) {
            format!("Bookmarked ({} saved)", self.bookmarks.len())
        } else {
            format!("Bookmark removed ({} saved)", self.bookmarks.len())
        };
    }

    /// Open the selected article's source link in the system browser.
    pub fn open_link(&mut self) {
        let Some(link) = self
            .selected_article()
            .map(|a| a.link.clone())
            .filter(|l| !l.is_empty())
        else {
            self.status = "This story has no source link".into();
            return;
        };

        match open::that(&link) {
            Ok(()) => self.status = "Opened in browser".into(),
            Err(e) => {
                tracing::warn!(%link, error = %e, "Could not open browser");
                self.status = format!("Could not open browser: {e}");
            }
        }
    }

    // -- reader --------------------------------------------------------------

    pub fn reader_article(&self) -> Option<&DisplayArticle> {
        self.reader.and_then(|r| self.articles.get(r.index))
    }

    pub fn open_reader(&mut self) {
        if let Some(index) = self.list_state.selected() {
            self.open_reader_at(index);
        }
    }

    pub fn open_featured(&mut self) {
        if let Some(index) = self.rotation.current() {
            self.open_reader_at(index);
        }
    }

    fn open_reader_at(&mut self, index: usize) {
        if index < self.articles.len() {
            self.reader = Some(ReaderState { index, scroll: 0 });
        }
    }

    pub fn close_reader(&mut self) {
        self.reader = None;
    }

    pub fn scroll_reader_down(&mut self) {
        if let Some(reader) = self.reader.as_mut() {
            reader.scroll = reader.scroll.saturating_add(1);
        }
    }

    pub fn scroll_reader_up(&mut self) {
        if let Some(reader) = self.reader.as_mut() {
            reader.scroll = reader.scroll.saturating_sub(1);
        }
    }
}
