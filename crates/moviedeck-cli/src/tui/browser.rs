//! Movie browser controller.
//!
//! Owns the render state, the search debouncer and the background fetcher,
//! and translates key presses and fetch results into state changes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use moviedeck_api::links::{google_search_url, poster_url, youtube_trailer_url};
use moviedeck_api::tmdb::{PopularParams, SearchMovieParams, TmdbApi};

use super::debounce::Debouncer;
use super::fetch::{FetchOutcome, FetchRequest, FetchResult, Fetcher, Slot};
use super::state::{
    BrowserState, InputMode, ListSource, LoadState, MSG_DETAILS_NOT_FOUND, MSG_FETCH_FAILED,
    MSG_SEARCH_FAILED, Route,
};

/// Options that shape requests and rendering.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// Response language for every request.
    pub language: String,
    /// Whether searches include adult titles.
    pub include_adult: bool,
    /// Poster size segment (e.g. `w500`).
    pub image_size: String,
    /// Quiet period before a typed query is searched.
    pub debounce: Duration,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Leave the browser.
    Quit,
    /// Open the URL in the system browser.
    Open(String),
}

/// Outbound link kinds offered on cards and the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    Google,
    Trailer,
    Poster,
}

/// Browser controller.
#[derive(Debug)]
pub struct Browser<C> {
    /// Render state.
    pub state: BrowserState,
    /// Background request runner.
    fetcher: Fetcher<C>,
    /// Search box debouncer.
    debouncer: Debouncer,
    /// Response language.
    language: String,
    /// Whether searches include adult titles.
    include_adult: bool,
}

impl<C> Browser<C>
where
    C: TmdbApi + Send + Sync + 'static,
{
    /// Creates a browser on the home route.
    #[must_use]
    pub fn new(client: Arc<C>, settings: BrowserSettings) -> Self {
        Self {
            state: BrowserState::new(settings.image_size),
            fetcher: Fetcher::new(client),
            debouncer: Debouncer::new(settings.debounce),
            language: settings.language,
            include_adult: settings.include_adult,
        }
    }

    /// Switches to `route`, starting whatever fetch the route needs.
    ///
    /// Entering the movie list from anywhere but a detail view mounts it
    /// afresh: the query is cleared and the popular page is fetched.
    /// Returning from a detail view keeps the list as it was.
    pub fn navigate(&mut self, route: Route) {
        let previous = self.state.route;
        if previous == route {
            return;
        }
        self.state.route = route;
        self.state.input_mode = InputMode::Normal;

        match route {
            Route::Home => {
                self.debouncer.cancel();
                self.fetcher.cancel(Slot::List);
                self.fetcher.cancel(Slot::Detail);
                self.state.list = LoadState::Idle;
            }
            Route::Movies => {
                let from_detail = matches!(previous, Route::Movie(_));
                if !from_detail || matches!(self.state.list, LoadState::Idle) {
                    self.state.query.clear();
                    self.debouncer.cancel();
                    self.load_popular();
                }
            }
            Route::Movie(movie_id) => {
                self.state.detail = LoadState::Loading;
                self.fetcher.spawn(FetchRequest::Details {
                    movie_id,
                    language: self.language.clone(),
                });
            }
        }
    }

    /// Fetches the popular page into the list.
    fn load_popular(&mut self) {
        self.state.list_source = ListSource::Popular;
        self.state.list = LoadState::Loading;
        let params = PopularParams::default().language(self.language.clone());
        self.fetcher.spawn(FetchRequest::Popular(params));
    }

    /// Searches `query` right away.
    fn search_now(&mut self, query: String) {
        self.state.list_source = ListSource::Search(query.clone());
        self.state.list = LoadState::Loading;
        let params = SearchMovieParams::new(query)
            .language(self.language.clone())
            .include_adult(self.include_adult);
        self.fetcher.spawn(FetchRequest::Search(params));
    }

    /// Reacts to an edit of the search box.
    ///
    /// A non-blank query is (re)scheduled on the debouncer; a blank one
    /// drops any pending search and brings the popular list back.
    pub fn on_query_changed(&mut self, now: Instant) {
        let trimmed = self.state.query.trim();
        if trimmed.is_empty() {
            self.debouncer.cancel();
            let showing_popular = self.state.list_source == ListSource::Popular
                && (self.state.list.is_loading()
                    || matches!(self.state.list, LoadState::Ready(_)));
            if !showing_popular {
                self.load_popular();
            }
        } else {
            self.debouncer.schedule(String::from(trimmed), now);
        }
    }

    /// Searches the current query immediately (Enter in the search box).
    pub fn submit_search(&mut self) {
        let trimmed = self.state.query.trim();
        if trimmed.is_empty() {
            return;
        }
        let query = String::from(trimmed);
        self.debouncer.cancel();
        self.search_now(query);
    }

    /// Fires a due debounced search and applies finished fetches.
    pub fn tick(&mut self, now: Instant) {
        if let Some(query) = self.debouncer.poll(now) {
            tracing::debug!(%query, "debounced search fired");
            self.search_now(query);
        }
        while let Some(outcome) = self.fetcher.try_next() {
            self.apply(outcome);
        }
    }

    /// Applies a finished fetch to the state.
    fn apply(&mut self, outcome: FetchOutcome) {
        match outcome.result {
            FetchResult::Popular(Ok(page)) => {
                self.state.set_movies(ListSource::Popular, page.results);
            }
            FetchResult::Popular(Err(e)) => {
                tracing::warn!(error = %format!("{e:#}"), "failed to fetch popular movies");
                self.state.list = LoadState::Failed(MSG_FETCH_FAILED);
            }
            FetchResult::Search {
                query,
                result: Ok(page),
            } => {
                tracing::debug!(%query, count = page.results.len(), "search results");
                self.state.set_movies(ListSource::Search(query), page.results);
            }
            FetchResult::Search { query, result: Err(e) } => {
                tracing::warn!(%query, error = %format!("{e:#}"), "failed to search movies");
                self.state.list = LoadState::Failed(MSG_SEARCH_FAILED);
            }
            FetchResult::Details {
                result: Ok(details),
                ..
            } => {
                self.state.detail = LoadState::Ready(details);
            }
            FetchResult::Details {
                movie_id,
                result: Err(e),
            } => {
                tracing::warn!(movie_id, error = %format!("{e:#}"), "failed to fetch movie details");
                self.state.detail = LoadState::Failed(MSG_DETAILS_NOT_FOUND);
            }
        }
    }

    /// Acknowledges an "add to favorites" request for the shown movie.
    pub fn add_favorite(&mut self) {
        if let Some(details) = self.state.current_details() {
            tracing::info!(movie_id = details.id, "add to favorites requested");
            self.state.status = Some(format!("Added {} to favorites!", details.title));
        }
    }

    /// Builds an outbound link for the movie in focus.
    fn link_action(&self, kind: LinkKind) -> Action {
        let target = match self.state.route {
            Route::Movies => self
                .state
                .selected_movie()
                .map(|m| (&m.title, m.year(), m.poster_path.as_deref())),
            Route::Movie(_) => self
                .state
                .current_details()
                .map(|d| (&d.title, d.year(), d.poster_path.as_deref())),
            Route::Home => None,
        };
        let Some((title, year, poster_path)) = target else {
            return Action::Continue;
        };

        let url = match kind {
            LinkKind::Google => google_search_url(title, year).map(String::from),
            LinkKind::Trailer => youtube_trailer_url(title, year).map(String::from),
            LinkKind::Poster => Ok(poster_url(poster_path, &self.state.image_size)),
        };
        match url {
            Ok(url) => Action::Open(url),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "failed to build link");
                Action::Continue
            }
        }
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        self.state.status = None;

        if self.state.route == Route::Movies && self.state.input_mode == InputMode::Search {
            self.handle_search_input(key, now);
            return Action::Continue;
        }

        match key.code {
            KeyCode::Char('q') => return Action::Quit,
            KeyCode::Char('1') => {
                self.navigate(Route::Home);
                return Action::Continue;
            }
            KeyCode::Char('2') => {
                self.navigate(Route::Movies);
                return Action::Continue;
            }
            _ => {}
        }

        match self.state.route {
            Route::Home => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char('m')) {
                    self.navigate(Route::Movies);
                }
                Action::Continue
            }
            Route::Movies => self.handle_list_input(key.code),
            Route::Movie(_) => self.handle_detail_input(key.code),
        }
    }

    /// Handles key input while typing a query.
    fn handle_search_input(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => {
                self.state.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                self.state.input_mode = InputMode::Normal;
                self.submit_search();
            }
            KeyCode::Backspace => {
                self.state.query.pop();
                self.on_query_changed(now);
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.state.query.push(c);
                self.on_query_changed(now);
            }
            _ => {}
        }
    }

    /// Handles key input on the movie list.
    fn handle_list_input(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.state.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.state.move_down(),
            KeyCode::PageUp => self.state.page_up(),
            KeyCode::PageDown => self.state.page_down(),
            KeyCode::Char('/') => self.state.input_mode = InputMode::Search,
            KeyCode::Enter => {
                if let Some(id) = self.state.selected_movie().map(|m| m.id) {
                    self.navigate(Route::Movie(id));
                }
            }
            KeyCode::Esc => self.navigate(Route::Home),
            KeyCode::Char('g') => return self.link_action(LinkKind::Google),
            KeyCode::Char('t') => return self.link_action(LinkKind::Trailer),
            KeyCode::Char('p') => return self.link_action(LinkKind::Poster),
            _ => {}
        }
        Action::Continue
    }

    /// Handles key input on the detail view.
    fn handle_detail_input(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                self.navigate(Route::Movies);
            }
            KeyCode::Char('f') => self.add_favorite(),
            KeyCode::Char('g') => return self.link_action(LinkKind::Google),
            KeyCode::Char('t') => return self.link_action(LinkKind::Trailer),
            KeyCode::Char('p') => return self.link_action(LinkKind::Poster),
            _ => {}
        }
        Action::Continue
    }
}
