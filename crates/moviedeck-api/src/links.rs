//! Outbound URL builders.
//!
//! Posters are served from the TMDB image host; web search and trailer
//! links point at Google and YouTube with the title and release year.

use anyhow::{Context, Result};
use url::Url;

/// Base URL of the TMDB image host.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Default poster size segment.
pub const DEFAULT_POSTER_SIZE: &str = "w500";

/// Image shown when a movie has no poster.
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/300x450?text=No+Image";

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";
const YOUTUBE_RESULTS_URL: &str = "https://www.youtube.com/results";

/// Extracts the year from a `YYYY-MM-DD` release date.
///
/// Returns `None` for a missing or empty date.
#[must_use]
pub fn release_year(release_date: Option<&str>) -> Option<&str> {
    release_date?
        .split('-')
        .next()
        .map(str::trim)
        .filter(|y| !y.is_empty())
}

/// Builds the poster URL for `poster_path` at the given size (e.g. `w500`).
///
/// Falls back to the placeholder image when the path is missing.
#[must_use]
pub fn poster_url(poster_path: Option<&str>, size: &str) -> String {
    match poster_path.filter(|p| !p.is_empty()) {
        Some(path) => format!("{IMAGE_BASE_URL}{size}{path}"),
        None => String::from(PLACEHOLDER_POSTER_URL),
    }
}

/// Builds the search text `"{title} {year} {suffix}"`, skipping a missing year.
fn search_text(title: &str, year: Option<&str>, suffix: &str) -> String {
    year.map_or_else(
        || format!("{title} {suffix}"),
        |y| format!("{title} {y} {suffix}"),
    )
}

/// Google web search for the movie.
///
/// # Errors
///
/// Returns an error if the URL cannot be built.
pub fn google_search_url(title: &str, year: Option<&str>) -> Result<Url> {
    let q = search_text(title, year, "movie");
    Url::parse_with_params(GOOGLE_SEARCH_URL, &[("q", q)]).context("failed to build Google URL")
}

/// YouTube search for the movie's official trailer.
///
/// # Errors
///
/// Returns an error if the URL cannot be built.
pub fn youtube_trailer_url(title: &str, year: Option<&str>) -> Result<Url> {
    let q = search_text(title, year, "official trailer");
    Url::parse_with_params(YOUTUBE_RESULTS_URL, &[("search_query", q)])
        .context("failed to build YouTube URL")
}
