use axum::extract::State;
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};

use super::{
    session::{Page, Session},
    AppState, Error,
};
use crate::templates::{Home, Listed};

pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<Page<Home>, Error> {
    let venues = entity::VenueEntity::find()
        .order_by_desc(entity::VenueColumn::Id)
        .limit(state.recent_limit)
        .all(&state.db)
        .await?;
    let artists = entity::ArtistEntity::find()
        .order_by_desc(entity::ArtistColumn::Id)
        .limit(state.recent_limit)
        .all(&state.db)
        .await?;
    Ok(Page::new(
        &session,
        Home {
            ctx: session.context(),
            venues: venues.iter().map(Listed::from).collect(),
            artists: artists.iter().map(Listed::from).collect(),
        },
    ))
}

pub async fn not_found() -> Error {
    Error::NotFound
}
