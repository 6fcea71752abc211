use axum::extract::{Path, State};
use axum::response::Response;
use chrono::Utc;
use tracing::info;

use crate::handlers::parse_id;
use crate::models::{ArtistForm, ArtistSummary, EntityRef, FormPage, SearchResults};
use crate::services::booking;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::form::FormFields;
use crate::utils::response::{created, success};

pub async fn list_artists(State(state): State<AppState>) -> Result<Response, AppError> {
    let artists: Vec<EntityRef> = state
        .store
        .list_artists()
        .await?
        .iter()
        .map(EntityRef::from)
        .collect();

    Ok(success(artists, "Artists loaded"))
}

pub async fn search_artists(
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<Response, AppError> {
    let term = fields.raw("search_term").unwrap_or_default().to_string();
    let artists = state.store.search_artists(&term).await?;
    let upcoming = state.store.upcoming_counts_by_artist(Utc::now()).await?;

    let data: Vec<ArtistSummary> = artists
        .iter()
        .map(|artist| ArtistSummary::new(artist, &upcoming))
        .collect();
    let results = SearchResults::new(term, data);
    let message = format!("{} artist(s) found", results.count);

    Ok(success(results, message))
}

pub async fn show_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&artist_id, "Artist")?;
    let artist = state
        .store
        .artist(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist {} was not found", id)))?;
    let shows = state.store.artist_shows(id).await?;

    Ok(success(
        booking::artist_detail(artist, shows, Utc::now()),
        "Artist loaded",
    ))
}

pub async fn create_artist_form() -> Response {
    success(FormPage::blank(ArtistForm::default()), "New artist form")
}

pub async fn create_artist(
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<Response, AppError> {
    let form = ArtistForm::from_fields(&fields);
    form.validate()?;

    let artist = state.store.create_artist(&form).await.map_err(|e| {
        AppError::transaction(
            e,
            format!("An error occurred. Artist {} could not be listed.", form.name),
        )
    })?;

    info!(artist_id = artist.id, name = %artist.name, "Artist created");
    let message = format!("Artist {} was successfully listed!", artist.name);
    Ok(created(artist, message))
}

pub async fn edit_artist_form(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&artist_id, "Artist")?;
    let artist = state
        .store
        .artist(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artist {} was not found", id)))?;

    Ok(success(
        FormPage::edit(id, ArtistForm::from(&artist)),
        "Edit artist form",
    ))
}

pub async fn edit_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
    fields: FormFields,
) -> Result<Response, AppError> {
    let id = parse_id(&artist_id, "Artist")?;
    let form = ArtistForm::from_fields(&fields);
    form.validate()?;

    let artist = state
        .store
        .update_artist(id, &form)
        .await
        .map_err(|e| AppError::transaction(e, "Edit failed. Please try again."))?
        .ok_or_else(|| AppError::NotFound(format!("Artist {} was not found", id)))?;

    info!(artist_id = id, "Artist updated");
    let message = format!("{} was successfully edited!", artist.name);
    Ok(success(artist, message))
}
