use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    Artist, ArtistForm, ArtistShow, Show, ShowForm, ShowListing, Venue, VenueForm, VenueShow,
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Venue {0} does not exist")]
    MissingVenue(i32),

    #[error("Artist {0} does not exist")]
    MissingArtist(i32),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for venues, artists and shows.
///
/// Listings and searches are ordered by id, except `list_shows` which is
/// ordered by start time, latest first. Every write runs in its own
/// transaction and leaves nothing behind when it fails.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn list_venues(&self) -> StoreResult<Vec<Venue>>;

    /// Case-insensitive substring match on the venue name.
    async fn search_venues(&self, term: &str) -> StoreResult<Vec<Venue>>;

    async fn venue(&self, id: i32) -> StoreResult<Option<Venue>>;

    async fn venue_shows(&self, venue_id: i32) -> StoreResult<Vec<VenueShow>>;

    async fn create_venue(&self, form: &VenueForm) -> StoreResult<Venue>;

    /// Overwrites every mutable field. `None` when the venue does not exist.
    async fn update_venue(&self, id: i32, form: &VenueForm) -> StoreResult<Option<Venue>>;

    /// Removes the venue and its shows, returning what was deleted.
    async fn delete_venue(&self, id: i32) -> StoreResult<Option<Venue>>;

    async fn list_artists(&self) -> StoreResult<Vec<Artist>>;

    async fn search_artists(&self, term: &str) -> StoreResult<Vec<Artist>>;

    async fn artist(&self, id: i32) -> StoreResult<Option<Artist>>;

    async fn artist_shows(&self, artist_id: i32) -> StoreResult<Vec<ArtistShow>>;

    async fn create_artist(&self, form: &ArtistForm) -> StoreResult<Artist>;

    async fn update_artist(&self, id: i32, form: &ArtistForm) -> StoreResult<Option<Artist>>;

    async fn list_shows(&self) -> StoreResult<Vec<ShowListing>>;

    /// Fails with `MissingVenue` or `MissingArtist` for dangling references.
    async fn create_show(&self, form: &ShowForm) -> StoreResult<Show>;

    /// Shows starting strictly after `now`, counted per venue id.
    async fn upcoming_counts_by_venue(&self, now: DateTime<Utc>)
        -> StoreResult<HashMap<i32, i64>>;

    /// Shows starting strictly after `now`, counted per artist id.
    async fn upcoming_counts_by_artist(
        &self,
        now: DateTime<Utc>,
    ) -> StoreResult<HashMap<i32, i64>>;
}
