use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{BookingStore, StoreError, StoreResult};
use crate::models::{
    Artist, ArtistForm, ArtistShow, Show, ShowForm, ShowListing, Venue, VenueForm, VenueShow,
};
use crate::services::booking::name_matches;

#[derive(Default)]
struct Tables {
    venues: Vec<Venue>,
    artists: Vec<Artist>,
    shows: Vec<Show>,
    next_venue_id: i32,
    next_artist_id: i32,
    next_show_id: i32,
}

/// In-process `BookingStore` for handler tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, as a lost connection would.
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn show_count(&self) -> usize {
        self.tables.read().unwrap().shows.len()
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes {
            Err(StoreError::Database(sqlx::Error::PoolClosed))
        } else {
            Ok(())
        }
    }
}

fn venue_from_form(id: i32, form: &VenueForm) -> Venue {
    Venue {
        id,
        name: form.name.clone(),
        city: form.city.clone(),
        state: form.state.clone(),
        address: form.address.clone(),
        phone: form.phone.clone(),
        image_link: form.image_link.clone(),
        genres: form.genres.clone(),
        facebook_link: form.facebook_link.clone(),
        website_link: form.website_link.clone(),
        seeking_talent: form.seeking_talent,
        seeking_description: form.seeking_description.clone(),
    }
}

fn artist_from_form(id: i32, form: &ArtistForm) -> Artist {
    Artist {
        id,
        name: form.name.clone(),
        city: form.city.clone(),
        state: form.state.clone(),
        phone: form.phone.clone(),
        image_link: form.image_link.clone(),
        genres: form.genres.clone(),
        facebook_link: form.facebook_link.clone(),
        website_link: form.website_link.clone(),
        seeking_venue: form.seeking_venue,
        seeking_description: form.seeking_description.clone(),
    }
}

fn count_upcoming(
    shows: &[Show],
    now: DateTime<Utc>,
    key: impl Fn(&Show) -> i32,
) -> HashMap<i32, i64> {
    let mut counts = HashMap::new();
    for show in shows.iter().filter(|show| show.start_time > now) {
        *counts.entry(key(show)).or_insert(0) += 1;
    }
    counts
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn list_venues(&self) -> StoreResult<Vec<Venue>> {
        Ok(self.tables.read().unwrap().venues.clone())
    }

    async fn search_venues(&self, term: &str) -> StoreResult<Vec<Venue>> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .venues
            .iter()
            .filter(|venue| name_matches(&venue.name, term))
            .cloned()
            .collect())
    }

    async fn venue(&self, id: i32) -> StoreResult<Option<Venue>> {
        let tables = self.tables.read().unwrap();
        Ok(tables.venues.iter().find(|venue| venue.id == id).cloned())
    }

    async fn venue_shows(&self, venue_id: i32) -> StoreResult<Vec<VenueShow>> {
        let tables = self.tables.read().unwrap();
        let mut shows: Vec<VenueShow> = tables
            .shows
            .iter()
            .filter(|show| show.venue_id == venue_id)
            .filter_map(|show| {
                let artist = tables.artists.iter().find(|a| a.id == show.artist_id)?;
                Some(VenueShow {
                    artist_id: artist.id,
                    artist_name: artist.name.clone(),
                    artist_image_link: artist.image_link.clone(),
                    start_time: show.start_time,
                })
            })
            .collect();
        shows.sort_by_key(|show| show.start_time);
        Ok(shows)
    }

    async fn create_venue(&self, form: &VenueForm) -> StoreResult<Venue> {
        self.check_writable()?;
        let mut tables = self.tables.write().unwrap();
        tables.next_venue_id += 1;
        let venue = venue_from_form(tables.next_venue_id, form);
        tables.venues.push(venue.clone());
        Ok(venue)
    }

    async fn update_venue(&self, id: i32, form: &VenueForm) -> StoreResult<Option<Venue>> {
        self.check_writable()?;
        let mut tables = self.tables.write().unwrap();
        Ok(tables
            .venues
            .iter_mut()
            .find(|venue| venue.id == id)
            .map(|venue| {
                *venue = venue_from_form(id, form);
                venue.clone()
            }))
    }

    async fn delete_venue(&self, id: i32) -> StoreResult<Option<Venue>> {
        self.check_writable()?;
        let mut tables = self.tables.write().unwrap();
        let Some(index) = tables.venues.iter().position(|venue| venue.id == id) else {
            return Ok(None);
        };
        tables.shows.retain(|show| show.venue_id != id);
        Ok(Some(tables.venues.remove(index)))
    }

    async fn list_artists(&self) -> StoreResult<Vec<Artist>> {
        Ok(self.tables.read().unwrap().artists.clone())
    }

    async fn search_artists(&self, term: &str) -> StoreResult<Vec<Artist>> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .artists
            .iter()
            .filter(|artist| name_matches(&artist.name, term))
            .cloned()
            .collect())
    }

    async fn artist(&self, id: i32) -> StoreResult<Option<Artist>> {
        let tables = self.tables.read().unwrap();
        Ok(tables.artists.iter().find(|artist| artist.id == id).cloned())
    }

    async fn artist_shows(&self, artist_id: i32) -> StoreResult<Vec<ArtistShow>> {
        let tables = self.tables.read().unwrap();
        let mut shows: Vec<ArtistShow> = tables
            .shows
            .iter()
            .filter(|show| show.artist_id == artist_id)
            .filter_map(|show| {
                let venue = tables.venues.iter().find(|v| v.id == show.venue_id)?;
                Some(ArtistShow {
                    venue_id: venue.id,
                    venue_name: venue.name.clone(),
                    venue_image_link: venue.image_link.clone(),
                    start_time: show.start_time,
                })
            })
            .collect();
        shows.sort_by_key(|show| show.start_time);
        Ok(shows)
    }

    async fn create_artist(&self, form: &ArtistForm) -> StoreResult<Artist> {
        self.check_writable()?;
        let mut tables = self.tables.write().unwrap();
        tables.next_artist_id += 1;
        let artist = artist_from_form(tables.next_artist_id, form);
        tables.artists.push(artist.clone());
        Ok(artist)
    }

    async fn update_artist(&self, id: i32, form: &ArtistForm) -> StoreResult<Option<Artist>> {
        self.check_writable()?;
        let mut tables = self.tables.write().unwrap();
        Ok(tables
            .artists
            .iter_mut()
            .find(|artist| artist.id == id)
            .map(|artist| {
                *artist = artist_from_form(id, form);
                artist.clone()
            }))
    }

    async fn list_shows(&self) -> StoreResult<Vec<ShowListing>> {
        let tables = self.tables.read().unwrap();
        let mut listing: Vec<ShowListing> = tables
            .shows
            .iter()
            .filter_map(|show| {
                let venue = tables.venues.iter().find(|v| v.id == show.venue_id)?;
                let artist = tables.artists.iter().find(|a| a.id == show.artist_id)?;
                Some(ShowListing {
                    id: show.id,
                    venue_id: venue.id,
                    venue_name: venue.name.clone(),
                    artist_id: artist.id,
                    artist_name: artist.name.clone(),
                    artist_image_link: artist.image_link.clone(),
                    start_time: show.start_time,
                })
            })
            .collect();
        listing.sort_by(|a, b| b.start_time.cmp(&a.start_time).then(b.id.cmp(&a.id)));
        Ok(listing)
    }

    async fn create_show(&self, form: &ShowForm) -> StoreResult<Show> {
        self.check_writable()?;
        let mut tables = self.tables.write().unwrap();
        if !tables.venues.iter().any(|v| v.id == form.venue_id) {
            return Err(StoreError::MissingVenue(form.venue_id));
        }
        if !tables.artists.iter().any(|a| a.id == form.artist_id) {
            return Err(StoreError::MissingArtist(form.artist_id));
        }
        tables.next_show_id += 1;
        let show = Show {
            id: tables.next_show_id,
            venue_id: form.venue_id,
            artist_id: form.artist_id,
            start_time: form.start_time,
        };
        tables.shows.push(show.clone());
        Ok(show)
    }

    async fn upcoming_counts_by_venue(
        &self,
        now: DateTime<Utc>,
    ) -> StoreResult<HashMap<i32, i64>> {
        let tables = self.tables.read().unwrap();
        Ok(count_upcoming(&tables.shows, now, |show| show.venue_id))
    }

    async fn upcoming_counts_by_artist(
        &self,
        now: DateTime<Utc>,
    ) -> StoreResult<HashMap<i32, i64>> {
        let tables = self.tables.read().unwrap();
        Ok(count_upcoming(&tables.shows, now, |show| show.artist_id))
    }
}
