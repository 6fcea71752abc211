use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::EntityRef;
use crate::utils::error::AppError;
use crate::utils::form::FormFields;
use crate::utils::validation::{parse_reference, parse_start_time, FieldErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Show {
    pub id: i32,
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: DateTime<Utc>,
}

/// Anything booked at a point in time.
pub trait Scheduled {
    fn start_time(&self) -> DateTime<Utc>;
}

/// A show as listed on its venue's page.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct VenueShow {
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

impl Scheduled for VenueShow {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

/// A show as listed on its artist's page.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ArtistShow {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

impl Scheduled for ArtistShow {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

/// One row of the `/shows` listing.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ShowListing {
    pub id: i32,
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShowForm {
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: DateTime<Utc>,
}

impl ShowForm {
    /// A blank `start_time` books the show at `now`. A field that fails to
    /// parse always records an error.
    pub fn parse(fields: &FormFields, now: DateTime<Utc>) -> Result<Self, AppError> {
        let mut errors = FieldErrors::new();

        let venue_id = reference(&mut errors, "venue_id", &fields.text("venue_id"));
        let artist_id = reference(&mut errors, "artist_id", &fields.text("artist_id"));
        let start_time = scheduled_at(&mut errors, &fields.text("start_time"), now);

        let (Some(venue_id), Some(artist_id), Some(start_time)) = (venue_id, artist_id, start_time)
        else {
            return Err(errors.into_error());
        };

        Ok(Self {
            venue_id,
            artist_id,
            start_time,
        })
    }
}

fn scheduled_at(
    errors: &mut FieldErrors,
    value: &str,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return Some(now);
    }
    let parsed = parse_start_time(value);
    if parsed.is_none() {
        errors.add("start_time", "Not a valid datetime value.");
    }
    parsed
}

fn reference(errors: &mut FieldErrors, field: &'static str, value: &str) -> Option<i32> {
    if value.is_empty() {
        errors.add(field, "This field is required.");
        return None;
    }
    let id = parse_reference(value);
    if id.is_none() {
        errors.add(field, "Not a valid identifier.");
    }
    id
}

/// Choices offered by the new-show form.
#[derive(Debug, Clone, Serialize)]
pub struct ShowFormPage {
    pub venues: Vec<EntityRef>,
    pub artists: Vec<EntityRef>,
    pub start_time: DateTime<Utc>,
}
