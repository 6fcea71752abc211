//! Query-time booking rules: location grouping, past/upcoming split and
//! name search.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::models::{
    Artist, ArtistDetail, ArtistShow, LocationGroup, Scheduled, Venue, VenueDetail, VenueShow,
    VenueSummary,
};

/// Groups venues by `(city, state)`, ordered by city then state. Venues keep
/// their input order inside a group.
pub fn group_by_location(venues: Vec<Venue>, upcoming: &HashMap<i32, i64>) -> Vec<LocationGroup> {
    let mut groups: BTreeMap<(String, String), Vec<VenueSummary>> = BTreeMap::new();

    for venue in &venues {
        groups
            .entry((venue.city.clone(), venue.state.clone()))
            .or_default()
            .push(VenueSummary::new(venue, upcoming));
    }

    groups
        .into_iter()
        .map(|((city, state), venues)| LocationGroup {
            city,
            state,
            venues,
        })
        .collect()
}

/// Splits shows into `(past, upcoming)`. A show starting exactly at `now`
/// is past.
pub fn partition_shows<T: Scheduled>(shows: Vec<T>, now: DateTime<Utc>) -> (Vec<T>, Vec<T>) {
    shows.into_iter().partition(|show| show.start_time() <= now)
}

pub fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

/// `ILIKE` pattern matching `term` anywhere, with `%`, `_` and `\` literal.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub fn venue_detail(venue: Venue, shows: Vec<VenueShow>, now: DateTime<Utc>) -> VenueDetail {
    let (past_shows, upcoming_shows) = partition_shows(shows, now);
    VenueDetail {
        id: venue.id,
        name: venue.name,
        genres: venue.genres,
        address: venue.address,
        city: venue.city,
        state: venue.state,
        phone: venue.phone,
        website_link: venue.website_link,
        facebook_link: venue.facebook_link,
        seeking_talent: venue.seeking_talent,
        seeking_description: venue.seeking_description,
        image_link: venue.image_link,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    }
}

pub fn artist_detail(artist: Artist, shows: Vec<ArtistShow>, now: DateTime<Utc>) -> ArtistDetail {
    let (past_shows, upcoming_shows) = partition_shows(shows, now);
    ArtistDetail {
        id: artist.id,
        name: artist.name,
        genres: artist.genres,
        city: artist.city,
        state: artist.state,
        phone: artist.phone,
        website_link: artist.website_link,
        facebook_link: artist.facebook_link,
        seeking_venue: artist.seeking_venue,
        seeking_description: artist.seeking_description,
        image_link: artist.image_link,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    }
}
