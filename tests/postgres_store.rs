//! `PgStore` against a live PostgreSQL. Run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use fyyur_server::models::{ArtistForm, ShowForm, VenueForm};
use fyyur_server::store::{BookingStore, PgStore, StoreError};

fn venue_form(name: &str) -> VenueForm {
    VenueForm {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        address: "1015 Folsom Street".to_string(),
        genres: vec!["Jazz".to_string(), "Folk".to_string()],
        ..VenueForm::default()
    }
}

fn artist_form(name: &str) -> ArtistForm {
    ArtistForm {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        genres: vec!["Rock n Roll".to_string()],
        ..ArtistForm::default()
    }
}

async fn show_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM show")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[ignore = "requires DATABASE_URL"]
#[sqlx::test]
async fn search_matches_substrings_and_escapes_wildcards(pool: PgPool) {
    let store = PgStore::new(pool);
    store.create_venue(&venue_form("The Musical Hop")).await.unwrap();
    store
        .create_venue(&venue_form("Park Square Live Music & Coffee"))
        .await
        .unwrap();
    store.create_venue(&venue_form("100% Jazz")).await.unwrap();

    let names = |venues: Vec<fyyur_server::models::Venue>| -> Vec<String> {
        venues.into_iter().map(|v| v.name).collect()
    };

    assert_eq!(
        names(store.search_venues("hop").await.unwrap()),
        vec!["The Musical Hop"]
    );
    assert_eq!(
        names(store.search_venues("MUSIC").await.unwrap()),
        vec!["The Musical Hop", "Park Square Live Music & Coffee"]
    );
    assert_eq!(
        names(store.search_venues("0%").await.unwrap()),
        vec!["100% Jazz"]
    );
    assert!(store.search_venues("_").await.unwrap().is_empty());
}

#[ignore = "requires DATABASE_URL"]
#[sqlx::test]
async fn show_with_missing_artist_writes_nothing(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let venue = store.create_venue(&venue_form("The Musical Hop")).await.unwrap();

    let err = store
        .create_show(&ShowForm {
            venue_id: venue.id,
            artist_id: 999,
            start_time: Utc::now(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingArtist(999)));
    assert_eq!(show_count(&pool).await, 0);
}

#[ignore = "requires DATABASE_URL"]
#[sqlx::test]
async fn show_with_missing_venue_writes_nothing(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let artist = store.create_artist(&artist_form("Guns N Petals")).await.unwrap();

    let err = store
        .create_show(&ShowForm {
            venue_id: 999,
            artist_id: artist.id,
            start_time: Utc::now(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingVenue(999)));
    assert_eq!(show_count(&pool).await, 0);
}

#[ignore = "requires DATABASE_URL"]
#[sqlx::test]
async fn update_overwrites_fields_and_keeps_shows(pool: PgPool) {
    let store = PgStore::new(pool);
    let mut form = venue_form("The Musical Hop");
    form.phone = Some("123-123-1234".to_string());
    let venue = store.create_venue(&form).await.unwrap();
    let artist = store.create_artist(&artist_form("Guns N Petals")).await.unwrap();
    store
        .create_show(&ShowForm {
            venue_id: venue.id,
            artist_id: artist.id,
            start_time: Utc::now() + Duration::days(3),
        })
        .await
        .unwrap();

    let mut replacement = venue_form("The Loud Hop");
    replacement.genres = vec!["Punk".to_string()];
    let updated = store
        .update_venue(venue.id, &replacement)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, venue.id);
    assert_eq!(updated.name, "The Loud Hop");
    assert_eq!(updated.genres, vec!["Punk"]);
    assert_eq!(updated.phone, None);
    assert_eq!(store.venue_shows(venue.id).await.unwrap().len(), 1);
    assert!(store.update_venue(venue.id + 100, &replacement).await.unwrap().is_none());
}

#[ignore = "requires DATABASE_URL"]
#[sqlx::test]
async fn delete_cascades_and_tolerates_missing_ids(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let venue = store.create_venue(&venue_form("The Musical Hop")).await.unwrap();
    let artist = store.create_artist(&artist_form("Guns N Petals")).await.unwrap();
    for days in [-2, 2] {
        store
            .create_show(&ShowForm {
                venue_id: venue.id,
                artist_id: artist.id,
                start_time: Utc::now() + Duration::days(days),
            })
            .await
            .unwrap();
    }

    let counts = store.upcoming_counts_by_venue(Utc::now()).await.unwrap();
    assert_eq!(counts.get(&venue.id), Some(&1));

    let deleted = store.delete_venue(venue.id).await.unwrap();
    assert_eq!(deleted.map(|v| v.name).as_deref(), Some("The Musical Hop"));
    assert_eq!(show_count(&pool).await, 0);
    assert!(store.delete_venue(venue.id).await.unwrap().is_none());
}

#[ignore = "requires DATABASE_URL"]
#[sqlx::test]
async fn shows_are_listed_latest_first(pool: PgPool) {
    let store = PgStore::new(pool);
    let venue = store.create_venue(&venue_form("The Musical Hop")).await.unwrap();
    let artist = store.create_artist(&artist_form("Guns N Petals")).await.unwrap();
    for days in [-10, 30, 5] {
        store
            .create_show(&ShowForm {
                venue_id: venue.id,
                artist_id: artist.id,
                start_time: Utc::now() + Duration::days(days),
            })
            .await
            .unwrap();
    }

    let listing = store.list_shows().await.unwrap();
    assert_eq!(listing.len(), 3);
    assert!(listing
        .windows(2)
        .all(|pair| pair[0].start_time >= pair[1].start_time));
    assert_eq!(listing[0].venue_name, "The Musical Hop");
}
