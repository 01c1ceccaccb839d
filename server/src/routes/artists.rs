use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use super::{
    extract::{Path, Submission},
    name_contains,
    session::{FlashRedirect, Page, Session},
    AppState, Error,
};
use crate::datetime;
use crate::forms::{ArtistForm, FormErrors};
use crate::listing;
use crate::templates::{ArtistDetail, ArtistFormPage, Artists, Listed, Profile, Search, ShowEntry};

pub async fn artists(
    State(state): State<AppState>,
    session: Session,
) -> Result<Page<Artists>, Error> {
    let artists = entity::ArtistEntity::find()
        .order_by_asc(entity::ArtistColumn::Id)
        .all(&state.db)
        .await?;
    Ok(Page::new(
        &session,
        Artists {
            ctx: session.context(),
            artists: artists.iter().map(Listed::from).collect(),
        },
    ))
}

pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Submission(fields): Submission,
) -> Result<Page<Search>, Error> {
    let search_term = fields.text("search_term");
    let artists = entity::ArtistEntity::find()
        .filter(name_contains(entity::ArtistColumn::Name, &search_term))
        .order_by_asc(entity::ArtistColumn::Id)
        .all(&state.db)
        .await?;
    tracing::debug! {%search_term, count = artists.len(), "Searched artists"};
    Ok(Page::new(
        &session,
        Search {
            ctx: session.context(),
            kind: "artists",
            search_term,
            count: artists.len(),
            results: artists.iter().map(Listed::from).collect(),
        },
    ))
}

pub async fn artist(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Page<ArtistDetail>, Error> {
    let artist = entity::ArtistEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(Error::NotFound)?;
    let shows = entity::ShowEntity::find()
        .filter(entity::ShowColumn::ArtistId.eq(id))
        .order_by_asc(entity::ShowColumn::StartTime)
        .find_also_related(entity::VenueEntity)
        .all(&state.db)
        .await?;
    let split = listing::split_shows(
        shows
            .into_iter()
            .filter_map(|(show, venue)| venue.map(|v| (show, v))),
        datetime::now(),
        |(show, _)| show.start_time,
    );
    let entries = |shows: Vec<(entity::Show, entity::Venue)>| -> Vec<ShowEntry> {
        shows
            .iter()
            .map(|(show, venue)| ShowEntry::new(show, &Profile::from(venue)))
            .collect()
    };
    let past_shows = entries(split.past);
    let upcoming_shows = entries(split.upcoming);
    Ok(Page::new(
        &session,
        ArtistDetail {
            ctx: session.context(),
            artist: Profile::from(&artist),
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        },
    ))
}

fn form_page(
    session: &Session,
    form: ArtistForm,
    errors: FormErrors,
    id: Option<i32>,
) -> ArtistFormPage {
    let (title, action) = match id {
        Some(id) => ("Edit artist".to_string(), format!("/artists/{}/edit", id)),
        None => ("List a new artist".to_string(), "/artists/create".to_string()),
    };
    ArtistFormPage {
        ctx: session.context(),
        title,
        action,
        form,
        errors,
    }
}

pub async fn create_form(session: Session) -> Page<ArtistFormPage> {
    let page = form_page(&session, ArtistForm::new(), FormErrors::default(), None);
    Page::new(&session, page)
}

async fn insert(db: &DbConn, artist: entity::ArtistActive) -> Result<entity::Artist, DbErr> {
    let tx = db.begin().await?;
    let artist = artist.insert(&tx).await?;
    tx.commit().await?;
    Ok(artist)
}

async fn update(db: &DbConn, artist: entity::ArtistActive) -> Result<entity::Artist, DbErr> {
    let tx = db.begin().await?;
    let artist = artist.update(&tx).await?;
    tx.commit().await?;
    Ok(artist)
}

pub async fn create(
    State(state): State<AppState>,
    mut session: Session,
    Submission(fields): Submission,
) -> Response {
    let form = ArtistForm::from_fields(&fields);
    let errors = match form.validate() {
        Ok(active) => match insert(&state.db, active).await {
            Ok(artist) => {
                tracing::info! {id = artist.id, name = %artist.name, "Listed artist"};
                return FlashRedirect::new(
                    "/",
                    format!("Artist {} was successfully listed!", artist.name),
                )
                .into_response();
            }
            Err(e) => {
                tracing::error! {error = %e, "Could not list artist"};
                FormErrors::default()
            }
        },
        Err(errors) => errors,
    };
    if form.profile.name.is_empty() {
        session.flash("An error occurred.");
    } else {
        session.flash(format!(
            "An error occurred. Artist {} could not be listed.",
            form.profile.name
        ));
    }
    let page = form_page(&session, form, errors, None);
    Page::new(&session, page).into_response()
}

pub async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Page<ArtistFormPage>, Error> {
    let artist = entity::ArtistEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(Error::NotFound)?;
    let page = form_page(
        &session,
        ArtistForm::from_model(&artist),
        FormErrors::default(),
        Some(id),
    );
    Ok(Page::new(&session, page))
}

pub async fn edit(
    State(state): State<AppState>,
    mut session: Session,
    Path(id): Path<i32>,
    Submission(fields): Submission,
) -> Result<Response, Error> {
    entity::ArtistEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(Error::NotFound)?;
    let form = ArtistForm::from_fields(&fields);
    let errors = match form.validate() {
        Ok(mut active) => {
            active.id = Set(id);
            match update(&state.db, active).await {
                Ok(artist) => {
                    tracing::info! {id, name = %artist.name, "Updated artist"};
                    return Ok(FlashRedirect::new(
                        format!("/artists/{}", id),
                        format!("Artist \"{}\" was successfully updated!", artist.name),
                    )
                    .into_response());
                }
                Err(e) => {
                    tracing::error! {error = %e, id, "Could not update artist"};
                    FormErrors::default()
                }
            }
        }
        Err(errors) => errors,
    };
    session.flash("An error occurred.");
    let page = form_page(&session, form, errors, Some(id));
    Ok(Page::new(&session, page).into_response())
}
