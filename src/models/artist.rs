use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::choices::{is_genre, is_state};
use crate::models::show::ArtistShow;
use crate::utils::error::AppError;
use crate::utils::form::FormFields;
use crate::utils::validation::{FieldErrors, LONG_TEXT, SHORT_TEXT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Artist {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn from_fields(fields: &FormFields) -> Self {
        let seeking_venue = fields.flag("seeking_venue");
        Self {
            name: fields.text("name"),
            city: fields.text("city"),
            state: fields.text("state"),
            phone: fields.optional("phone"),
            image_link: fields.optional("image_link"),
            genres: fields.all("genres"),
            facebook_link: fields.optional("facebook_link"),
            website_link: fields.optional("website_link"),
            seeking_venue,
            seeking_description: fields
                .optional("seeking_description")
                .filter(|_| seeking_venue),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name);
        errors.require("city", &self.city);
        errors.choice("state", &self.state, is_state);
        errors.choices("genres", &self.genres, is_genre);
        errors.url("image_link", self.image_link.as_deref());
        errors.url("facebook_link", self.facebook_link.as_deref());
        errors.url("website_link", self.website_link.as_deref());
        errors.max_len("city", Some(self.city.as_str()), SHORT_TEXT);
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

impl From<&Artist> for ArtistForm {
    fn from(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone(),
            image_link: artist.image_link.clone(),
            genres: artist.genres.clone(),
            facebook_link: artist.facebook_link.clone(),
            website_link: artist.website_link.clone(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistSummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: i64,
}

impl ArtistSummary {
    pub fn new(artist: &Artist, upcoming: &HashMap<i32, i64>) -> Self {
        Self {
            id: artist.id,
            name: artist.name.clone(),
            num_upcoming_shows: upcoming.get(&artist.id).copied().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistDetail {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}
