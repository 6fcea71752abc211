use serde::Serialize;

pub mod artist;
pub mod choices;
pub mod show;
pub mod venue;

pub use artist::{Artist, ArtistDetail, ArtistForm, ArtistSummary};
pub use choices::FormChoices;
pub use show::{ArtistShow, Scheduled, Show, ShowForm, ShowFormPage, ShowListing, VenueShow};
pub use venue::{LocationGroup, Venue, VenueDetail, VenueForm, VenueSummary};

/// Identifier and display name, for listings and select boxes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRef {
    pub id: i32,
    pub name: String,
}

impl From<&Venue> for EntityRef {
    fn from(venue: &Venue) -> Self {
        Self {
            id: venue.id,
            name: venue.name.clone(),
        }
    }
}

impl From<&Artist> for EntityRef {
    fn from(artist: &Artist) -> Self {
        Self {
            id: artist.id,
            name: artist.name.clone(),
        }
    }
}

/// A create or edit form with the choices it offers.
#[derive(Debug, Clone, Serialize)]
pub struct FormPage<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub form: T,
    pub choices: FormChoices,
}

impl<T> FormPage<T> {
    pub fn blank(form: T) -> Self {
        Self {
            id: None,
            form,
            choices: FormChoices::default(),
        }
    }

    pub fn edit(id: i32, form: T) -> Self {
        Self {
            id: Some(id),
            form,
            choices: FormChoices::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults<T> {
    pub search_term: String,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> SearchResults<T> {
    pub fn new(search_term: impl Into<String>, data: Vec<T>) -> Self {
        Self {
            search_term: search_term.into(),
            count: data.len(),
            data,
        }
    }
}
