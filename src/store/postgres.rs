use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use super::{BookingStore, StoreError, StoreResult};
use crate::models::{
    Artist, ArtistForm, ArtistShow, Show, ShowForm, ShowListing, Venue, VenueForm, VenueShow,
};
use crate::services::booking::like_pattern;

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, image_link, genres, \
     facebook_link, website_link, seeking_talent, seeking_description";

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, image_link, genres, \
     facebook_link, website_link, seeking_venue, seeking_description";

/// `BookingStore` over a PostgreSQL pool. Connections are checked out per
/// call; writes run inside a transaction that rolls back when dropped.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upcoming_counts(
        &self,
        column: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<HashMap<i32, i64>> {
        let sql = format!(
            "SELECT {column}, COUNT(*) FROM show WHERE start_time > $1 GROUP BY {column}"
        );
        let rows: Vec<(i32, i64)> = sqlx::query_as(&sql)
            .bind(now)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().collect())
    }
}

async fn lock_venue(tx: &mut Transaction<'_, Postgres>, id: i32) -> StoreResult<bool> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM venue WHERE id = $1 FOR SHARE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row.is_some())
}

async fn lock_artist(tx: &mut Transaction<'_, Postgres>, id: i32) -> StoreResult<bool> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM artist WHERE id = $1 FOR SHARE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row.is_some())
}

#[async_trait]
impl BookingStore for PgStore {
    async fn list_venues(&self) -> StoreResult<Vec<Venue>> {
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venue ORDER BY id");
        Ok(sqlx::query_as::<_, Venue>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn search_venues(&self, term: &str) -> StoreResult<Vec<Venue>> {
        let sql = format!(
            "SELECT {VENUE_COLUMNS} FROM venue WHERE name ILIKE $1 ESCAPE '\\' ORDER BY id"
        );
        Ok(sqlx::query_as::<_, Venue>(&sql)
            .bind(like_pattern(term))
            .fetch_all(&self.pool)
            .await?)
    }

    async fn venue(&self, id: i32) -> StoreResult<Option<Venue>> {
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venue WHERE id = $1");
        Ok(sqlx::query_as::<_, Venue>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn venue_shows(&self, venue_id: i32) -> StoreResult<Vec<VenueShow>> {
        Ok(sqlx::query_as::<_, VenueShow>(
            "SELECT s.artist_id, a.name AS artist_name, a.image_link AS artist_image_link, s.start_time
             FROM show s
             JOIN artist a ON a.id = s.artist_id
             WHERE s.venue_id = $1
             ORDER BY s.start_time, s.id",
        )
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_venue(&self, form: &VenueForm) -> StoreResult<Venue> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            "INSERT INTO venue (name, city, state, address, phone, image_link, genres,
                 facebook_link, website_link, seeking_talent, seeking_description)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {VENUE_COLUMNS}"
        );
        let venue = sqlx::query_as::<_, Venue>(&sql)
            .bind(&form.name)
            .bind(&form.city)
            .bind(&form.state)
            .bind(&form.address)
            .bind(&form.phone)
            .bind(&form.image_link)
            .bind(&form.genres)
            .bind(&form.facebook_link)
            .bind(&form.website_link)
            .bind(form.seeking_talent)
            .bind(&form.seeking_description)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(venue)
    }

    async fn update_venue(&self, id: i32, form: &VenueForm) -> StoreResult<Option<Venue>> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            "UPDATE venue SET name = $2, city = $3, state = $4, address = $5, phone = $6,
                 image_link = $7, genres = $8, facebook_link = $9, website_link = $10,
                 seeking_talent = $11, seeking_description = $12
             WHERE id = $1
             RETURNING {VENUE_COLUMNS}"
        );
        let venue = sqlx::query_as::<_, Venue>(&sql)
            .bind(id)
            .bind(&form.name)
            .bind(&form.city)
            .bind(&form.state)
            .bind(&form.address)
            .bind(&form.phone)
            .bind(&form.image_link)
            .bind(&form.genres)
            .bind(&form.facebook_link)
            .bind(&form.website_link)
            .bind(form.seeking_talent)
            .bind(&form.seeking_description)
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(venue)
    }

    async fn delete_venue(&self, id: i32) -> StoreResult<Option<Venue>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM show WHERE venue_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let sql = format!("DELETE FROM venue WHERE id = $1 RETURNING {VENUE_COLUMNS}");
        let venue = sqlx::query_as::<_, Venue>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(venue)
    }

    async fn list_artists(&self) -> StoreResult<Vec<Artist>> {
        let sql = format!("SELECT {ARTIST_COLUMNS} FROM artist ORDER BY id");
        Ok(sqlx::query_as::<_, Artist>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn search_artists(&self, term: &str) -> StoreResult<Vec<Artist>> {
        let sql = format!(
            "SELECT {ARTIST_COLUMNS} FROM artist WHERE name ILIKE $1 ESCAPE '\\' ORDER BY id"
        );
        Ok(sqlx::query_as::<_, Artist>(&sql)
            .bind(like_pattern(term))
            .fetch_all(&self.pool)
            .await?)
    }

    async fn artist(&self, id: i32) -> StoreResult<Option<Artist>> {
        let sql = format!("SELECT {ARTIST_COLUMNS} FROM artist WHERE id = $1");
        Ok(sqlx::query_as::<_, Artist>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn artist_shows(&self, artist_id: i32) -> StoreResult<Vec<ArtistShow>> {
        Ok(sqlx::query_as::<_, ArtistShow>(
            "SELECT s.venue_id, v.name AS venue_name, v.image_link AS venue_image_link, s.start_time
             FROM show s
             JOIN venue v ON v.id = s.venue_id
             WHERE s.artist_id = $1
             ORDER BY s.start_time, s.id",
        )
        .bind(artist_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_artist(&self, form: &ArtistForm) -> StoreResult<Artist> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            "INSERT INTO artist (name, city, state, phone, image_link, genres,
                 facebook_link, website_link, seeking_venue, seeking_description)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {ARTIST_COLUMNS}"
        );
        let artist = sqlx::query_as::<_, Artist>(&sql)
            .bind(&form.name)
            .bind(&form.city)
            .bind(&form.state)
            .bind(&form.phone)
            .bind(&form.image_link)
            .bind(&form.genres)
            .bind(&form.facebook_link)
            .bind(&form.website_link)
            .bind(form.seeking_venue)
            .bind(&form.seeking_description)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(artist)
    }

    async fn update_artist(&self, id: i32, form: &ArtistForm) -> StoreResult<Option<Artist>> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            "UPDATE artist SET name = $2, city = $3, state = $4, phone = $5, image_link = $6,
                 genres = $7, facebook_link = $8, website_link = $9, seeking_venue = $10,
                 seeking_description = $11
             WHERE id = $1
             RETURNING {ARTIST_COLUMNS}"
        );
        let artist = sqlx::query_as::<_, Artist>(&sql)
            .bind(id)
            .bind(&form.name)
            .bind(&form.city)
            .bind(&form.state)
            .bind(&form.phone)
            .bind(&form.image_link)
            .bind(&form.genres)
            .bind(&form.facebook_link)
            .bind(&form.website_link)
            .bind(form.seeking_venue)
            .bind(&form.seeking_description)
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(artist)
    }

    async fn list_shows(&self) -> StoreResult<Vec<ShowListing>> {
        Ok(sqlx::query_as::<_, ShowListing>(
            "SELECT s.id, s.venue_id, v.name AS venue_name, s.artist_id, a.name AS artist_name,
                    a.image_link AS artist_image_link, s.start_time
             FROM show s
             JOIN venue v ON v.id = s.venue_id
             JOIN artist a ON a.id = s.artist_id
             ORDER BY s.start_time DESC, s.id DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_show(&self, form: &ShowForm) -> StoreResult<Show> {
        let mut tx = self.pool.begin().await?;

        if !lock_venue(&mut tx, form.venue_id).await? {
            return Err(StoreError::MissingVenue(form.venue_id));
        }
        if !lock_artist(&mut tx, form.artist_id).await? {
            return Err(StoreError::MissingArtist(form.artist_id));
        }

        let show = sqlx::query_as::<_, Show>(
            "INSERT INTO show (venue_id, artist_id, start_time)
             VALUES ($1, $2, $3)
             RETURNING id, venue_id, artist_id, start_time",
        )
        .bind(form.venue_id)
        .bind(form.artist_id)
        .bind(form.start_time)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(show)
    }

    async fn upcoming_counts_by_venue(
        &self,
        now: DateTime<Utc>,
    ) -> StoreResult<HashMap<i32, i64>> {
        self.upcoming_counts("venue_id", now).await
    }

    async fn upcoming_counts_by_artist(
        &self,
        now: DateTime<Utc>,
    ) -> StoreResult<HashMap<i32, i64>> {
        self.upcoming_counts("artist_id", now).await
    }
}
