//! API client library for moviedeck.
//!
//! Provides a client for the TMDB v3 movie endpoints and helpers that
//! build poster and outbound search URLs from movie records.

/// Outbound URL builders (posters, web search, trailers).
pub mod links;

/// TMDB API client.
pub mod tmdb;
