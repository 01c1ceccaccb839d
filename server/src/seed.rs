//! Sample venues, artists and shows for a fresh database.

use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    DbConn, DbErr, EntityTrait, PaginatorTrait, TransactionTrait,
};
use time::{macros::datetime, PrimitiveDateTime};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Seeded {
    pub venues: usize,
    pub artists: usize,
    pub shows: usize,
}

fn link(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn genres(values: &[&str]) -> entity::Genres {
    entity::Genres(values.iter().map(|g| g.to_string()).collect())
}

fn venues() -> Vec<entity::VenueActive> {
    vec![
        entity::VenueActive {
            id: NotSet,
            name: Set("The Musical Hop".to_string()),
            city: Set("San Francisco".to_string()),
            state: Set("CA".to_string()),
            address: Set("1015 Folsom Street".to_string()),
            phone: Set(link("123-123-1234")),
            image_link: Set(link("https://images.unsplash.com/photo-1543900694-133f37abaaa5?w=400")),
            facebook_link: Set(link("https://www.facebook.com/TheMusicalHop")),
            website: Set(link("https://www.themusicalhop.com")),
            genres: Set(genres(&["Jazz", "Reggae", "Classical", "Folk"])),
            seeking_talent: Set(true),
            seeking_description: Set(link(
                "We are on the lookout for a local artist to play every two weeks. Please call us.",
            )),
        },
        entity::VenueActive {
            id: NotSet,
            name: Set("The Dueling Pianos Bar".to_string()),
            city: Set("New York".to_string()),
            state: Set("NY".to_string()),
            address: Set("335 Delancey Street".to_string()),
            phone: Set(link("914-003-1132")),
            image_link: Set(link("https://images.unsplash.com/photo-1497032205916-ac775f0649ae?w=400")),
            facebook_link: Set(link("https://www.facebook.com/theduelingpianos")),
            website: Set(link("https://www.theduelingpianos.com")),
            genres: Set(genres(&["Classical", "R&B", "Hip-Hop"])),
            seeking_talent: Set(false),
            seeking_description: Set(None),
        },
        entity::VenueActive {
            id: NotSet,
            name: Set("Park Square Live Music & Coffee".to_string()),
            city: Set("San Francisco".to_string()),
            state: Set("CA".to_string()),
            address: Set("34 Whiskey Moore Ave".to_string()),
            phone: Set(link("415-000-1234")),
            image_link: Set(link("https://images.unsplash.com/photo-1485686531765-ba63b07845a7?w=400")),
            facebook_link: Set(link("https://www.facebook.com/ParkSquareLiveMusicAndCoffee")),
            website: Set(link("https://www.parksquarelivemusicandcoffee.com")),
            genres: Set(genres(&["Rock n Roll", "Jazz", "Classical", "Folk"])),
            seeking_talent: Set(false),
            seeking_description: Set(None),
        },
    ]
}

fn artists() -> Vec<entity::ArtistActive> {
    vec![
        entity::ArtistActive {
            id: NotSet,
            name: Set("Guns N Petals".to_string()),
            city: Set("San Francisco".to_string()),
            state: Set("CA".to_string()),
            phone: Set(link("326-123-5000")),
            image_link: Set(link("https://images.unsplash.com/photo-1549213783-8284d0336c4f?w=300")),
            facebook_link: Set(link("https://www.facebook.com/GunsNPetals")),
            website: Set(link("https://www.gunsnpetalsband.com")),
            genres: Set(genres(&["Rock n Roll"])),
            seeking_venue: Set(true),
            seeking_description: Set(link(
                "Looking for shows to perform at in the San Francisco Bay Area!",
            )),
        },
        entity::ArtistActive {
            id: NotSet,
            name: Set("Matt Quevedo".to_string()),
            city: Set("New York".to_string()),
            state: Set("NY".to_string()),
            phone: Set(link("300-400-5000")),
            image_link: Set(link("https://images.unsplash.com/photo-1495223153807-b916f75de8c5?w=334")),
            facebook_link: Set(link("https://www.facebook.com/mattquevedo923251523")),
            website: Set(None),
            genres: Set(genres(&["Jazz"])),
            seeking_venue: Set(false),
            seeking_description: Set(None),
        },
        entity::ArtistActive {
            id: NotSet,
            name: Set("The Wild Sax Band".to_string()),
            city: Set("San Francisco".to_string()),
            state: Set("CA".to_string()),
            phone: Set(link("432-325-5432")),
            image_link: Set(link("https://images.unsplash.com/photo-1558369981-f9ca78462e61?w=794")),
            facebook_link: Set(None),
            website: Set(None),
            genres: Set(genres(&["Jazz", "Classical"])),
            seeking_venue: Set(false),
            seeking_description: Set(None),
        },
    ]
}

/// Shows as (venue index, artist index, start time) into the lists above.
const SHOWS: [(usize, usize, PrimitiveDateTime); 5] = [
    (0, 0, datetime!(2019-05-21 21:30:00)),
    (2, 1, datetime!(2019-06-15 23:00:00)),
    (2, 2, datetime!(2035-04-01 20:00:00)),
    (2, 2, datetime!(2035-04-08 20:00:00)),
    (2, 2, datetime!(2035-04-15 20:00:00)),
];

/// Inserts the sample data unless the database already holds venues or
/// artists.
pub async fn seed(db: &DbConn) -> Result<Seeded, DbErr> {
    let existing = entity::VenueEntity::find().count(db).await?
        + entity::ArtistEntity::find().count(db).await?;
    if existing > 0 {
        tracing::info! {existing, "Database is not empty, skipping sample data"};
        return Ok(Seeded::default());
    }

    let tx = db.begin().await?;
    let mut venue_ids = Vec::new();
    for venue in venues() {
        venue_ids.push(venue.insert(&tx).await?.id);
    }
    let mut artist_ids = Vec::new();
    for artist in artists() {
        artist_ids.push(artist.insert(&tx).await?.id);
    }
    for (venue, artist, start_time) in SHOWS {
        entity::ShowActive {
            id: NotSet,
            venue_id: Set(venue_ids[venue]),
            artist_id: Set(artist_ids[artist]),
            start_time: Set(start_time),
        }
        .insert(&tx)
        .await?;
    }
    tx.commit().await?;

    let seeded = Seeded {
        venues: venue_ids.len(),
        artists: artist_ids.len(),
        shows: SHOWS.len(),
    };
    tracing::info! {?seeded, "Inserted sample data"};
    Ok(seeded)
}
