//! Movie browser state types.

use moviedeck_api::tmdb::{MovieDetails, MovieSummary};
use ratatui::widgets::TableState;

/// Shown when the popular list cannot be fetched.
pub const MSG_FETCH_FAILED: &str = "Failed to fetch movies.";
/// Shown when a search request fails.
pub const MSG_SEARCH_FAILED: &str = "Failed to search movies. Please try again.";
/// Shown when a search returns no movies.
pub const MSG_NO_RESULTS: &str = "No movies found. Try different keywords.";
/// Shown when a detail request fails.
pub const MSG_DETAILS_NOT_FOUND: &str = "Movie details not found.";
/// Shown in place of a blank overview.
pub const MSG_NO_OVERVIEW: &str = "No overview available.";

/// Screen the browser is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Welcome screen.
    Home,
    /// Movie list (popular or search results).
    Movies,
    /// Detail view for one movie ID.
    Movie(u64),
}

/// Input mode for the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Search text input mode.
    Search,
}

/// What the movie list currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListSource {
    /// The popular movies page.
    Popular,
    /// Results for the given query.
    Search(String),
}

/// Progress of a fetch-backed value.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    /// Nothing requested yet.
    Idle,
    /// Request in flight.
    Loading,
    /// Value available.
    Ready(T),
    /// Request failed; holds the user-facing message.
    Failed(&'static str),
}

impl<T> LoadState<T> {
    /// Returns `true` while a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// State rendered by the browser UI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Current route.
    pub route: Route,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Search box contents.
    pub query: String,
    /// Origin of the movie list.
    pub list_source: ListSource,
    /// Movie list.
    pub list: LoadState<Vec<MovieSummary>>,
    /// Table state for the movie list (handles selection and scroll).
    pub list_table_state: TableState,
    /// Detail view data.
    pub detail: LoadState<MovieDetails>,
    /// One-shot status line (cleared on the next key press).
    pub status: Option<String>,
    /// Poster size segment used for poster URLs.
    pub image_size: String,
    /// Rows visible in the list pane, updated on each draw.
    pub page_size: usize,
}

impl BrowserState {
    /// Creates an empty state on the home route.
    #[must_use]
    pub fn new(image_size: impl Into<String>) -> Self {
        Self {
            route: Route::Home,
            input_mode: InputMode::Normal,
            query: String::new(),
            list_source: ListSource::Popular,
            list: LoadState::Idle,
            list_table_state: TableState::default(),
            detail: LoadState::Idle,
            status: None,
            image_size: image_size.into(),
            page_size: 10,
        }
    }

    /// Returns the list cursor position.
    #[must_use]
    pub fn list_cursor(&self) -> usize {
        self.list_table_state.selected().unwrap_or(0)
    }

    /// Movies currently shown as cards (empty unless the list is ready).
    #[must_use]
    pub fn movies(&self) -> &[MovieSummary] {
        match &self.list {
            LoadState::Ready(movies) => movies,
            _ => &[],
        }
    }

    /// Returns the movie under the cursor (if any).
    #[must_use]
    pub fn selected_movie(&self) -> Option<&MovieSummary> {
        self.movies().get(self.list_cursor())
    }

    /// Returns the loaded movie details (if any).
    #[must_use]
    pub fn current_details(&self) -> Option<&MovieDetails> {
        match &self.detail {
            LoadState::Ready(details) => Some(details),
            _ => None,
        }
    }

    /// Heading of the list view, driven by what is typed in the search box.
    #[must_use]
    pub fn list_heading(&self) -> &'static str {
        if self.query.trim().is_empty() {
            "Popular Movies"
        } else {
            "Search Results"
        }
    }

    /// Replaces the list with fetched movies and selects the first one.
    pub fn set_movies(&mut self, source: ListSource, movies: Vec<MovieSummary>) {
        self.list_source = source;
        self.list_table_state
            .select(if movies.is_empty() { None } else { Some(0) });
        self.list = LoadState::Ready(movies);
    }

    /// Moves cursor up.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_up(&mut self) {
        let current = self.list_cursor();
        if current > 0 {
            self.list_table_state.select(Some(current - 1));
        }
    }

    /// Moves cursor down.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self) {
        let current = self.list_cursor();
        if current + 1 < self.movies().len() {
            self.list_table_state.select(Some(current + 1));
        }
    }

    /// Scrolls up by a page.
    pub fn page_up(&mut self) {
        let current = self.list_cursor();
        self.list_table_state
            .select(Some(current.saturating_sub(self.page_size)));
    }

    /// Scrolls down by a page.
    pub fn page_down(&mut self) {
        let max = self.movies().len().saturating_sub(1);
        let current = self.list_cursor();
        self.list_table_state
            .select(Some(current.saturating_add(self.page_size).min(max)));
    }
}

/// Formats a vote average as `x/10`.
#[must_use]
pub fn format_rating(vote_average: f64) -> String {
    format!("{vote_average}/10")
}
