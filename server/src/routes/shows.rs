use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use sea_orm::{
    ActiveModelTrait, DbConn, DbErr, EntityTrait, LoaderTrait, QueryOrder, TransactionTrait,
};

use super::{
    extract::Submission,
    session::{FlashRedirect, Page, Session},
    AppState, Error,
};
use crate::datetime::{self, DateStyle};
use crate::forms::{FormErrors, ShowForm};
use crate::templates::{ShowFormPage, ShowRow, Shows};

pub async fn shows(
    State(state): State<AppState>,
    session: Session,
) -> Result<Page<Shows>, Error> {
    let shows = entity::ShowEntity::find()
        .order_by_asc(entity::ShowColumn::Id)
        .all(&state.db)
        .await?;
    let venues = shows.load_one(entity::VenueEntity, &state.db).await?;
    let artists = shows.load_one(entity::ArtistEntity, &state.db).await?;
    let shows = shows
        .iter()
        .zip(venues.into_iter().zip(artists))
        .filter_map(|(show, related)| match related {
            (Some(venue), Some(artist)) => Some(ShowRow {
                venue_id: venue.id,
                venue_name: venue.name,
                artist_id: artist.id,
                artist_name: artist.name,
                artist_image_link: artist.image_link.unwrap_or_default(),
                start_time: datetime::format(show.start_time, DateStyle::Full),
            }),
            _ => None,
        })
        .collect();
    Ok(Page::new(
        &session,
        Shows {
            ctx: session.context(),
            shows,
        },
    ))
}

pub async fn create_form(session: Session) -> Page<ShowFormPage> {
    let page = ShowFormPage {
        ctx: session.context(),
        form: ShowForm::new(datetime::now()),
        errors: FormErrors::default(),
    };
    Page::new(&session, page)
}

async fn insert(db: &DbConn, show: entity::ShowActive) -> Result<entity::Show, DbErr> {
    let tx = db.begin().await?;
    let show = show.insert(&tx).await?;
    tx.commit().await?;
    Ok(show)
}

/// A missing artist or venue is reported by the foreign key constraints.
pub async fn create(
    State(state): State<AppState>,
    mut session: Session,
    Submission(fields): Submission,
) -> Response {
    let form = ShowForm::from_fields(&fields);
    let errors = match form.validate() {
        Ok(active) => match insert(&state.db, active).await {
            Ok(show) => {
                tracing::info! {
                    id = show.id,
                    venue = show.venue_id,
                    artist = show.artist_id,
                    "Listed show"
                };
                return FlashRedirect::new("/", "Show was successfully listed!").into_response();
            }
            Err(e) => {
                tracing::error! {error = %e, "Could not list show"};
                FormErrors::default()
            }
        },
        Err(errors) => errors,
    };
    session.flash("An error occurred. Show could not be listed.");
    let page = ShowFormPage {
        ctx: session.context(),
        form,
        errors,
    };
    Page::new(&session, page).into_response()
}
