use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::choices::{is_genre, is_state};
use crate::models::show::VenueShow;
use crate::utils::error::AppError;
use crate::utils::form::FormFields;
use crate::utils::validation::{FieldErrors, LONG_TEXT, SHORT_TEXT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Venue {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// Every mutable venue field, as submitted through the create and edit forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueForm {
    pub fn from_fields(fields: &FormFields) -> Self {
        let seeking_talent = fields.flag("seeking_talent");
        Self {
            name: fields.text("name"),
            city: fields.text("city"),
            state: fields.text("state"),
            address: fields.text("address"),
            phone: fields.optional("phone"),
            image_link: fields.optional("image_link"),
            genres: fields.all("genres"),
            facebook_link: fields.optional("facebook_link"),
            website_link: fields.optional("website_link"),
            seeking_talent,
            seeking_description: fields
                .optional("seeking_description")
                .filter(|_| seeking_talent),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name);
        errors.require("city", &self.city);
        errors.choice("state", &self.state, is_state);
        errors.require("address", &self.address);
        errors.choices("genres", &self.genres, is_genre);
        errors.url("image_link", self.image_link.as_deref());
        errors.url("facebook_link", self.facebook_link.as_deref());
        errors.url("website_link", self.website_link.as_deref());
        errors.max_len("city", Some(self.city.as_str()), SHORT_TEXT);
        errors.max_len("address", Some(self.address.as_str()), SHORT_TEXT);
        errors.max_len("phone", self.phone.as_deref(), SHORT_TEXT);
        errors.max_len("image_link", self.image_link.as_deref(), LONG_TEXT);
        errors.max_len("facebook_link", self.facebook_link.as_deref(), SHORT_TEXT);
        errors.max_len("website_link", self.website_link.as_deref(), SHORT_TEXT);
        errors.max_len(
            "seeking_description",
            self.seeking_description.as_deref(),
            LONG_TEXT,
        );
        errors.into_result()
    }
}

impl From<&Venue> for VenueForm {
    fn from(venue: &Venue) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone(),
            image_link: venue.image_link.clone(),
            genres: venue.genres.clone(),
            facebook_link: venue.facebook_link.clone(),
            website_link: venue.website_link.clone(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueSummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: i64,
}

impl VenueSummary {
    pub fn new(venue: &Venue, upcoming: &HashMap<i32, i64>) -> Self {
        Self {
            id: venue.id,
            name: venue.name.clone(),
            num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
        }
    }
}

/// Venues sharing one `(city, state)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueDetail {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}
