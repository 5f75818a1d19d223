//! Watchlist models for request and response payloads

use serde::{Deserialize, Serialize};

use crate::models::movie::Movie;

/// Request for adding a movie to the watchlist
///
/// The movie id is carried as a string so that a missing or malformed id
/// can be reported with the contract's status codes instead of a generic
/// body-rejection error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToWatchlistRequest {
    pub movie_id: Option<String>,
}

/// Query parameters for removing a movie from the watchlist
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromWatchlistQuery {
    pub movie_id: Option<String>,
}

/// Response for the watchlist listing endpoint
#[derive(Serialize)]
pub struct WatchlistResponse {
    pub watchlist: Vec<Movie>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}
