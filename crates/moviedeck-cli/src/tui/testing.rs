//! In-memory TMDB double for browser tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, bail};
use moviedeck_api::tmdb::{
    MovieDetails, MovieSummary, PopularParams, SearchMovieParams, TmdbApi, TmdbGenre,
    TmdbMoviePage,
};

/// Canned TMDB responses keyed by request.
///
/// Anything not registered answers with an error.
#[derive(Debug, Default)]
pub struct MockTmdb {
    popular: Option<Vec<MovieSummary>>,
    searches: HashMap<String, Vec<MovieSummary>>,
    details: HashMap<u64, MovieDetails>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl MockTmdb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_popular(mut self, movies: Vec<MovieSummary>) -> Self {
        self.popular = Some(movies);
        self
    }

    pub fn with_search(mut self, query: &str, movies: Vec<MovieSummary>) -> Self {
        self.searches.insert(String::from(query), movies);
        self
    }

    pub fn with_details(mut self, details: MovieDetails) -> Self {
        self.details.insert(details.id, details);
        self
    }

    /// Delays the response to the search for `query`.
    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(String::from(query), delay);
        self
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    /// Every request seen so far, e.g. `popular`, `search:heat`, `details:7`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Queries of the search requests seen so far.
    pub fn search_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("search:").map(String::from))
            .collect()
    }
}

fn page(results: Vec<MovieSummary>) -> TmdbMoviePage {
    let total = u32::try_from(results.len()).unwrap_or(u32::MAX);
    TmdbMoviePage {
        page: 1,
        results,
        total_pages: 1,
        total_results: total,
    }
}

impl TmdbApi for MockTmdb {
    async fn popular_movies(&self, _params: &PopularParams) -> Result<TmdbMoviePage> {
        self.record(String::from("popular"));
        match &self.popular {
            Some(movies) => Ok(page(movies.clone())),
            None => bail!("TMDB API error (HTTP 500): mock has no popular list"),
        }
    }

    async fn search_movie(&self, params: &SearchMovieParams) -> Result<TmdbMoviePage> {
        self.record(format!("search:{}", params.query));
        if let Some(delay) = self.delays.get(&params.query) {
            tokio::time::sleep(*delay).await;
        }
        match self.searches.get(&params.query) {
            Some(movies) => Ok(page(movies.clone())),
            None => bail!("TMDB API error (HTTP 500): no canned search for {}", params.query),
        }
    }

    async fn movie_details(&self, movie_id: u64, _language: &str) -> Result<MovieDetails> {
        self.record(format!("details:{movie_id}"));
        match self.details.get(&movie_id) {
            Some(details) => Ok(details.clone()),
            None => bail!("TMDB API error (HTTP 404): code=34, message=not found"),
        }
    }
}

/// Movie summary released 2001-01-01 rated 7.5 with poster `/{id}.jpg`.
pub fn summary(id: u64, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: String::from(title),
        original_title: None,
        original_language: Some(String::from("en")),
        release_date: Some(String::from("2001-01-01")),
        overview: Some(format!("Overview of {title}")),
        popularity: 1.0,
        vote_average: 7.5,
        vote_count: 10,
        genre_ids: vec![18],
        adult: false,
        poster_path: Some(format!("/{id}.jpg")),
        backdrop_path: None,
    }
}

/// Movie details matching [`summary`].
pub fn details(id: u64, title: &str) -> MovieDetails {
    MovieDetails {
        id,
        title: String::from(title),
        original_title: None,
        original_language: Some(String::from("en")),
        release_date: Some(String::from("2001-01-01")),
        overview: Some(format!("Overview of {title}")),
        tagline: None,
        runtime: Some(120),
        status: Some(String::from("Released")),
        vote_average: 7.5,
        vote_count: 10,
        genres: vec![TmdbGenre {
            id: 18,
            name: String::from("Drama"),
        }],
        homepage: None,
        imdb_id: None,
        poster_path: Some(format!("/{id}.jpg")),
        backdrop_path: None,
    }
}
