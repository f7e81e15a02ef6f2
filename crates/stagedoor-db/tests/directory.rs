//! End-to-end tests for the directory data services, run against an
//! in-memory SQLite database with the real migrations applied.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use stagedoor_db::entities::{artist, show, venue};
use stagedoor_db::error::{DirectoryError, EntityKind};
use stagedoor_db::listings::{self, ShowParty};
use stagedoor_db::search;
use stagedoor_db::store::{self, ArtistInput, ShowInput, VenueInput};
use stagedoor_migration::{Migrator, MigratorTrait};

async fn setup() -> DatabaseConnection {
    // A single connection keeps every query on the same in-memory database.
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

fn fixed_clock() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0)
        .unwrap()
        .fixed_offset()
}

fn venue_input(name: &str, city: &str, state: &str) -> VenueInput {
    VenueInput {
        name: name.into(),
        city: city.into(),
        state: state.into(),
        address: "1 Main Street".into(),
        ..Default::default()
    }
}

fn artist_input(name: &str) -> ArtistInput {
    ArtistInput {
        name: name.into(),
        city: "San Francisco".into(),
        state: "CA".into(),
        ..Default::default()
    }
}

// ── Entity store ──────────────────────────────────────────────────────

#[tokio::test]
async fn venue_create_then_get_round_trips() {
    let db = setup().await;
    let input = VenueInput {
        name: "The Musical Hop".into(),
        city: "San Francisco".into(),
        state: "CA".into(),
        address: "1015 Folsom Street".into(),
        phone: Some("123-123-1234".into()),
        image_link: Some("https://img.example.com/hop.jpg".into()),
        website: Some("https://themusicalhop.com".into()),
        facebook_link: Some("https://facebook.com/themusicalhop".into()),
        seeking_talent: true,
        talent_description: Some("We are on the lookout for a local artist.".into()),
        genres: vec!["Jazz".into(), "Reggae".into(), "Swing".into()],
    };

    let created = store::create_venue(&db, &input).await.unwrap();
    let fetched = store::get_venue(&db, created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.name, "The Musical Hop");
    assert_eq!(fetched.phone.as_deref(), Some("123-123-1234"));
    assert!(fetched.seeking_talent);
    assert_eq!(fetched.genres.0, vec!["Jazz", "Reggae", "Swing"]);
}

#[tokio::test]
async fn get_venue_missing_is_not_found() {
    let db = setup().await;
    let err = store::get_venue(&db, 42).await.unwrap_err();
    assert!(matches!(
        err,
        DirectoryError::NotFound {
            kind: EntityKind::Venue,
            id: 42
        }
    ));
}

#[tokio::test]
async fn delete_venue_missing_is_not_found() {
    let db = setup().await;
    let err = store::delete_venue(&db, 99).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn create_venue_blank_name_is_rejected_and_not_persisted() {
    let db = setup().await;
    let err = store::create_venue(&db, &venue_input("   ", "San Francisco", "CA"))
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::Validation(_)));

    let count = venue::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn update_venue_replaces_all_mutable_fields() {
    let db = setup().await;
    let mut input = venue_input("The Musical Hop", "San Francisco", "CA");
    input.phone = Some("123-123-1234".into());
    input.genres = vec!["Jazz".into()];
    let created = store::create_venue(&db, &input).await.unwrap();

    // Full replace: fields absent from the new payload are cleared, not kept.
    let replacement = VenueInput {
        name: "The Musical Hop Annex".into(),
        city: "Oakland".into(),
        state: "CA".into(),
        address: "2 Side Street".into(),
        ..Default::default()
    };
    let updated = store::update_venue(&db, created.id, &replacement)
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "The Musical Hop Annex");
    assert_eq!(updated.city, "Oakland");
    assert_eq!(updated.phone, None);
    assert!(updated.genres.0.is_empty());
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn update_artist_missing_is_not_found() {
    let db = setup().await;
    let err = store::update_artist(&db, 7, &artist_input("Guns N Petals"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DirectoryError::NotFound {
            kind: EntityKind::Artist,
            id: 7
        }
    ));
}

#[tokio::test]
async fn artist_create_then_get_round_trips() {
    let db = setup().await;
    let input = ArtistInput {
        name: "Guns N Petals".into(),
        city: "San Francisco".into(),
        state: "CA".into(),
        phone: Some("326-123-5000".into()),
        seeking_venue: true,
        seeking_description: Some("Looking for shows to perform at".into()),
        genres: vec!["Rock n Roll".into()],
        ..Default::default()
    };

    let created = store::create_artist(&db, &input).await.unwrap();
    let fetched = store::get_artist(&db, created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert!(fetched.seeking_venue);
}

// ── Shows & referential integrity ─────────────────────────────────────

#[tokio::test]
async fn create_show_with_dangling_artist_persists_nothing() {
    let db = setup().await;
    let venue = store::create_venue(&db, &venue_input("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();

    let err = store::create_show(
        &db,
        &ShowInput {
            artist_id: 999,
            venue_id: venue.id,
            start_time: None,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        DirectoryError::NotFound {
            kind: EntityKind::Artist,
            id: 999
        }
    ));
    assert_eq!(show::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn create_show_with_dangling_venue_persists_nothing() {
    let db = setup().await;
    let artist = store::create_artist(&db, &artist_input("Guns N Petals"))
        .await
        .unwrap();

    let err = store::create_show(
        &db,
        &ShowInput {
            artist_id: artist.id,
            venue_id: 555,
            start_time: None,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        DirectoryError::NotFound {
            kind: EntityKind::Venue,
            id: 555
        }
    ));
    assert_eq!(show::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn create_show_rejects_non_positive_ids() {
    let db = setup().await;
    let err = store::create_show(
        &db,
        &ShowInput {
            artist_id: 0,
            venue_id: 1,
            start_time: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DirectoryError::Validation(_)));
}

#[tokio::test]
async fn create_show_defaults_start_time_to_now() {
    let db = setup().await;
    let venue = store::create_venue(&db, &venue_input("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let artist = store::create_artist(&db, &artist_input("Guns N Petals"))
        .await
        .unwrap();

    let before = Utc::now().fixed_offset() - Duration::seconds(1);
    let created = store::create_show(
        &db,
        &ShowInput {
            artist_id: artist.id,
            venue_id: venue.id,
            start_time: None,
        },
    )
    .await
    .unwrap();
    let after = Utc::now().fixed_offset() + Duration::seconds(1);

    assert!(created.start_time >= before && created.start_time <= after);
}

#[tokio::test]
async fn same_artist_venue_pair_can_be_booked_twice() {
    let db = setup().await;
    let venue = store::create_venue(&db, &venue_input("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let artist = store::create_artist(&db, &artist_input("The Wild Sax Band"))
        .await
        .unwrap();

    let t = fixed_clock();
    for offset_days in [7, 14] {
        store::create_show(
            &db,
            &ShowInput {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: Some(t + Duration::days(offset_days)),
            },
        )
        .await
        .unwrap();
    }

    assert_eq!(show::Entity::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn delete_venue_removes_dependent_shows() {
    let db = setup().await;
    let venue = store::create_venue(&db, &venue_input("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let artist = store::create_artist(&db, &artist_input("Guns N Petals"))
        .await
        .unwrap();
    store::create_show(
        &db,
        &ShowInput {
            artist_id: artist.id,
            venue_id: venue.id,
            start_time: Some(fixed_clock()),
        },
    )
    .await
    .unwrap();

    store::delete_venue(&db, venue.id).await.unwrap();

    assert_eq!(show::Entity::find().count(&db).await.unwrap(), 0);
    // The artist side is untouched.
    assert!(store::get_artist(&db, artist.id).await.is_ok());
}

#[tokio::test]
async fn delete_artist_removes_dependent_shows() {
    let db = setup().await;
    let venue = store::create_venue(&db, &venue_input("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let artist = store::create_artist(&db, &artist_input("Guns N Petals"))
        .await
        .unwrap();
    store::create_show(
        &db,
        &ShowInput {
            artist_id: artist.id,
            venue_id: venue.id,
            start_time: Some(fixed_clock()),
        },
    )
    .await
    .unwrap();

    store::delete_artist(&db, artist.id).await.unwrap();

    assert_eq!(show::Entity::find().count(&db).await.unwrap(), 0);
    assert!(store::get_venue(&db, venue.id).await.is_ok());
}

// ── Search ────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_venues_is_case_insensitive_substring_match() {
    let db = setup().await;
    let hop = store::create_venue(&db, &venue_input("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let park = store::create_venue(
        &db,
        &venue_input("Park Square Live Music & Coffee", "San Francisco", "CA"),
    )
    .await
    .unwrap();

    let results = search::search_venues(&db, "Hop", fixed_clock()).await.unwrap();
    assert_eq!(results.count, 1);
    assert_eq!(results.data[0].id, hop.id);
    assert_eq!(results.data[0].name, "The Musical Hop");

    let results = search::search_venues(&db, "music", fixed_clock())
        .await
        .unwrap();
    assert_eq!(results.count, 2);
    // Deterministic order: ascending id.
    assert_eq!(results.data[0].id, hop.id);
    assert_eq!(results.data[1].id, park.id);
}

#[tokio::test]
async fn search_artists_matches_fixture_expectations() {
    let db = setup().await;
    for name in ["Guns N Petals", "Matt Quevado", "The Wild Sax Band"] {
        store::create_artist(&db, &artist_input(name)).await.unwrap();
    }

    let results = search::search_artists(&db, "A", fixed_clock()).await.unwrap();
    assert_eq!(results.count, 3);

    let results = search::search_artists(&db, "band", fixed_clock())
        .await
        .unwrap();
    assert_eq!(results.count, 1);
    assert_eq!(results.data[0].name, "The Wild Sax Band");
}

#[tokio::test]
async fn search_treats_like_wildcards_literally() {
    let db = setup().await;
    store::create_venue(&db, &venue_input("AB Club", "San Francisco", "CA"))
        .await
        .unwrap();
    let literal = store::create_venue(&db, &venue_input("A%B Club", "San Francisco", "CA"))
        .await
        .unwrap();

    let results = search::search_venues(&db, "A%B", fixed_clock())
        .await
        .unwrap();
    assert_eq!(results.count, 1);
    assert_eq!(results.data[0].id, literal.id);
}

#[tokio::test]
async fn search_hits_carry_upcoming_show_counts_at_fixed_clock() {
    let db = setup().await;
    let venue = store::create_venue(&db, &venue_input("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let artist = store::create_artist(&db, &artist_input("The Wild Sax Band"))
        .await
        .unwrap();

    let t = fixed_clock();
    for start in [t - Duration::days(30), t + Duration::days(7), t + Duration::days(14)] {
        store::create_show(
            &db,
            &ShowInput {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: Some(start),
            },
        )
        .await
        .unwrap();
    }

    let results = search::search_venues(&db, "hop", t).await.unwrap();
    assert_eq!(results.data[0].num_upcoming_shows, 2);

    let results = search::search_artists(&db, "sax", t).await.unwrap();
    assert_eq!(results.data[0].num_upcoming_shows, 2);
}

// ── Aggregation ───────────────────────────────────────────────────────

#[tokio::test]
async fn upcoming_count_excludes_shows_at_or_before_the_clock() {
    let db = setup().await;
    let venue = store::create_venue(&db, &venue_input("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let artist = store::create_artist(&db, &artist_input("Guns N Petals"))
        .await
        .unwrap();

    let t = fixed_clock();
    // One strictly before, one exactly at, one strictly after the clock.
    for start in [t - Duration::hours(1), t, t + Duration::hours(1)] {
        store::create_show(
            &db,
            &ShowInput {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: Some(start),
            },
        )
        .await
        .unwrap();
    }

    let upcoming = listings::upcoming_show_count(&db, ShowParty::Venue(venue.id), t)
        .await
        .unwrap();
    assert_eq!(upcoming, 1);

    let past = listings::past_show_count(&db, ShowParty::Artist(artist.id), t)
        .await
        .unwrap();
    assert_eq!(past, 2);
}

#[tokio::test]
async fn group_venues_by_area_partitions_on_city_state() {
    let db = setup().await;
    let hop = store::create_venue(&db, &venue_input("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let park = store::create_venue(
        &db,
        &venue_input("Park Square Live Music & Coffee", "San Francisco", "CA"),
    )
    .await
    .unwrap();
    let dueling = store::create_venue(&db, &venue_input("The Dueling Pianos Bar", "New York", "NY"))
        .await
        .unwrap();

    let areas = listings::group_venues_by_area(&db).await.unwrap();
    assert_eq!(areas.len(), 2);

    // Groups ascend by (city, state): New York before San Francisco.
    assert_eq!(areas[0].city, "New York");
    assert_eq!(areas[0].state, "NY");
    assert_eq!(areas[0].venues.len(), 1);
    assert_eq!(areas[0].venues[0].id, dueling.id);

    assert_eq!(areas[1].city, "San Francisco");
    assert_eq!(areas[1].state, "CA");
    let ids: Vec<i32> = areas[1].venues.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![hop.id, park.id]);
}

#[tokio::test]
async fn group_venues_by_area_is_empty_without_venues() {
    let db = setup().await;
    let areas = listings::group_venues_by_area(&db).await.unwrap();
    assert!(areas.is_empty());
}

// ── Shows listing ─────────────────────────────────────────────────────

#[tokio::test]
async fn list_shows_joins_venue_and_artist_fields() {
    let db = setup().await;
    let venue = store::create_venue(&db, &venue_input("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let mut input = artist_input("Guns N Petals");
    input.image_link = Some("https://img.example.com/gnp.jpg".into());
    let artist = store::create_artist(&db, &input).await.unwrap();

    let t = fixed_clock();
    store::create_show(
        &db,
        &ShowInput {
            artist_id: artist.id,
            venue_id: venue.id,
            start_time: Some(t),
        },
    )
    .await
    .unwrap();

    let rows = listings::list_shows(&db).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.venue_id, venue.id);
    assert_eq!(row.venue_name, "The Musical Hop");
    assert_eq!(row.artist_id, artist.id);
    assert_eq!(row.artist_name, "Guns N Petals");
    assert_eq!(
        row.artist_image_link.as_deref(),
        Some("https://img.example.com/gnp.jpg")
    );
    assert_eq!(row.start_time, t);
}

#[tokio::test]
async fn list_shows_orders_by_start_time_then_id() {
    let db = setup().await;
    let venue = store::create_venue(&db, &venue_input("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    let artist = store::create_artist(&db, &artist_input("The Wild Sax Band"))
        .await
        .unwrap();

    let t = fixed_clock();
    // Inserted out of chronological order on purpose.
    for start in [t + Duration::days(14), t + Duration::days(1), t + Duration::days(7)] {
        store::create_show(
            &db,
            &ShowInput {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: Some(start),
            },
        )
        .await
        .unwrap();
    }

    let rows = listings::list_shows(&db).await.unwrap();
    let times: Vec<_> = rows.iter().map(|r| r.start_time).collect();
    assert_eq!(
        times,
        vec![
            t + Duration::days(1),
            t + Duration::days(7),
            t + Duration::days(14)
        ]
    );
}

#[tokio::test]
async fn list_shows_is_empty_without_shows() {
    let db = setup().await;
    // Entities without bookings contribute nothing to the join.
    store::create_venue(&db, &venue_input("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap();
    store::create_artist(&db, &artist_input("Guns N Petals"))
        .await
        .unwrap();

    let rows = listings::list_shows(&db).await.unwrap();
    assert!(rows.is_empty());
}

// Entities created through the store are visible to plain entity queries,
// which the HTTP layer relies on for its paginated listings.
#[tokio::test]
async fn stored_artists_are_visible_to_entity_queries() {
    let db = setup().await;
    store::create_artist(&db, &artist_input("Matt Quevado"))
        .await
        .unwrap();
    let all = artist::Entity::find().all(&db).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Matt Quevado");
}
