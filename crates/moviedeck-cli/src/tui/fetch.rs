//! Background TMDB requests for the browser.
//!
//! Each request runs in its own tokio task and reports back over an mpsc
//! channel. Requests are grouped into slots; starting a request aborts the
//! one already running in the same slot, and any result that still arrives
//! for a superseded request is dropped by sequence number.

use std::sync::Arc;

use anyhow::Result;
use moviedeck_api::tmdb::{
    MovieDetails, PopularParams, SearchMovieParams, TmdbApi, TmdbMoviePage,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Capacity of the result channel.
const CHANNEL_CAPACITY: usize = 16;

/// Independently cancellable request lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Popular list and search results.
    List,
    /// Movie detail view.
    Detail,
}

/// A request to run in the background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// `movie/popular`.
    Popular(PopularParams),
    /// `search/movie`.
    Search(SearchMovieParams),
    /// `movie/{id}`.
    Details {
        /// TMDB movie ID.
        movie_id: u64,
        /// Response language.
        language: String,
    },
}

impl FetchRequest {
    /// Slot this request occupies.
    #[must_use]
    pub const fn slot(&self) -> Slot {
        match self {
            Self::Popular(_) | Self::Search(_) => Slot::List,
            Self::Details { .. } => Slot::Detail,
        }
    }

    /// Executes the request against `client`.
    async fn run<C: TmdbApi + Sync>(self, client: &C) -> FetchResult {
        match self {
            Self::Popular(params) => FetchResult::Popular(client.popular_movies(&params).await),
            Self::Search(params) => {
                let result = client.search_movie(&params).await;
                FetchResult::Search {
                    query: params.query,
                    result,
                }
            }
            Self::Details { movie_id, language } => FetchResult::Details {
                movie_id,
                result: client.movie_details(movie_id, &language).await,
            },
        }
    }
}

/// Result of a background request.
#[derive(Debug)]
pub enum FetchResult {
    /// Popular list response.
    Popular(Result<TmdbMoviePage>),
    /// Search response for `query`.
    Search {
        /// Query that was searched.
        query: String,
        /// Response.
        result: Result<TmdbMoviePage>,
    },
    /// Detail response for `movie_id`.
    Details {
        /// Requested movie ID.
        movie_id: u64,
        /// Response.
        result: Result<MovieDetails>,
    },
}

impl FetchResult {
    /// Slot the originating request occupied.
    #[must_use]
    pub const fn slot(&self) -> Slot {
        match self {
            Self::Popular(_) | Self::Search { .. } => Slot::List,
            Self::Details { .. } => Slot::Detail,
        }
    }
}

/// A finished request tagged with its sequence number.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Sequence number assigned when the request was spawned.
    pub seq: u64,
    /// Request result.
    pub result: FetchResult,
}

/// Request currently running in a slot.
#[derive(Debug)]
struct InFlight {
    seq: u64,
    handle: JoinHandle<()>,
}

/// Spawns requests and hands back only the results that are still current.
#[derive(Debug)]
pub struct Fetcher<C> {
    /// Shared API client.
    client: Arc<C>,
    /// Sender cloned into each task.
    tx: mpsc::Sender<FetchOutcome>,
    /// Receiver polled by the UI loop.
    rx: mpsc::Receiver<FetchOutcome>,
    /// Last assigned sequence number.
    last_seq: u64,
    /// Running list request.
    list: Option<InFlight>,
    /// Running detail request.
    detail: Option<InFlight>,
}

impl<C> Fetcher<C>
where
    C: TmdbApi + Send + Sync + 'static,
{
    /// Creates a fetcher around a shared client.
    #[must_use]
    pub fn new(client: Arc<C>) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        Self {
            client,
            tx,
            rx,
            last_seq: 0,
            list: None,
            detail: None,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<InFlight> {
        match slot {
            Slot::List => &mut self.list,
            Slot::Detail => &mut self.detail,
        }
    }

    fn slot_ref(&self, slot: Slot) -> Option<&InFlight> {
        match slot {
            Slot::List => self.list.as_ref(),
            Slot::Detail => self.detail.as_ref(),
        }
    }

    /// Spawns `request`, aborting whatever was running in its slot.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&mut self, request: FetchRequest) -> u64 {
        self.last_seq = self.last_seq.wrapping_add(1);
        let seq = self.last_seq;
        let slot = request.slot();
        self.cancel(slot);

        tracing::debug!(seq, ?slot, ?request, "spawning TMDB request");

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let result = request.run(client.as_ref()).await;
            // Receiver is gone only when the browser has shut down.
            let _ = tx.send(FetchOutcome { seq, result }).await;
        });

        *self.slot_mut(slot) = Some(InFlight { seq, handle });
        seq
    }

    /// Aborts the request running in `slot`, if any.
    pub fn cancel(&mut self, slot: Slot) {
        if let Some(prev) = self.slot_mut(slot).take() {
            prev.handle.abort();
            tracing::debug!(seq = prev.seq, ?slot, "cancelled superseded request");
        }
    }

    /// Returns `true` if a request is running in `slot`.
    #[cfg(test)]
    #[must_use]
    pub fn is_pending(&self, slot: Slot) -> bool {
        self.slot_ref(slot).is_some()
    }

    /// Accepts `outcome` if it belongs to the request currently in its slot.
    fn accept(&mut self, outcome: FetchOutcome) -> Option<FetchOutcome> {
        let slot = outcome.result.slot();
        let current = self.slot_ref(slot).map(|f| f.seq);
        if current == Some(outcome.seq) {
            *self.slot_mut(slot) = None;
            Some(outcome)
        } else {
            tracing::debug!(seq = outcome.seq, ?slot, "dropping stale response");
            None
        }
    }

    /// Returns the next current outcome without blocking.
    pub fn try_next(&mut self) -> Option<FetchOutcome> {
        while let Ok(outcome) = self.rx.try_recv() {
            if let Some(accepted) = self.accept(outcome) {
                return Some(accepted);
            }
        }
        None
    }

    /// Waits for the next current outcome.
    #[cfg(test)]
    pub async fn next(&mut self) -> Option<FetchOutcome> {
        while let Some(outcome) = self.rx.recv().await {
            if let Some(accepted) = self.accept(outcome) {
                return Some(accepted);
            }
        }
        None
    }
}
