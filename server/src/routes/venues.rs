use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DbConn, DbErr, EntityTrait, LoaderTrait,
    ModelTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use super::{
    extract::{CsrfHeader, Path, Submission},
    name_contains,
    session::{FlashRedirect, Page, Session},
    AppState, Error,
};
use crate::datetime;
use crate::forms::{FormErrors, VenueForm};
use crate::listing;
use crate::templates::{Listed, Profile, Search, ShowEntry, VenueDetail, VenueFormPage, Venues};

pub async fn venues(
    State(state): State<AppState>,
    session: Session,
) -> Result<Page<Venues>, Error> {
    let venues = entity::VenueEntity::find()
        .order_by_asc(entity::VenueColumn::Id)
        .all(&state.db)
        .await?;
    let shows = venues.load_many(entity::ShowEntity, &state.db).await?;
    let now = datetime::now();
    let areas = listing::group_by_area(
        venues
            .iter()
            .zip(shows.iter().map(|s| listing::count_upcoming(s, now))),
    );
    Ok(Page::new(
        &session,
        Venues {
            ctx: session.context(),
            areas,
        },
    ))
}

pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Submission(fields): Submission,
) -> Result<Page<Search>, Error> {
    let search_term = fields.text("search_term");
    let venues = entity::VenueEntity::find()
        .filter(name_contains(entity::VenueColumn::Name, &search_term))
        .order_by_asc(entity::VenueColumn::Id)
        .all(&state.db)
        .await?;
    tracing::debug! {%search_term, count = venues.len(), "Searched venues"};
    Ok(Page::new(
        &session,
        Search {
            ctx: session.context(),
            kind: "venues",
            search_term,
            count: venues.len(),
            results: venues.iter().map(Listed::from).collect(),
        },
    ))
}

pub async fn venue(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Page<VenueDetail>, Error> {
    let venue = entity::VenueEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(Error::NotFound)?;
    let shows = entity::ShowEntity::find()
        .filter(entity::ShowColumn::VenueId.eq(id))
        .order_by_asc(entity::ShowColumn::StartTime)
        .find_also_related(entity::ArtistEntity)
        .all(&state.db)
        .await?;
    let split = listing::split_shows(
        shows
            .into_iter()
            .filter_map(|(show, artist)| artist.map(|a| (show, a))),
        datetime::now(),
        |(show, _)| show.start_time,
    );
    let entries = |shows: Vec<(entity::Show, entity::Artist)>| -> Vec<ShowEntry> {
        shows
            .iter()
            .map(|(show, artist)| ShowEntry::new(show, &Profile::from(artist)))
            .collect()
    };
    let past_shows = entries(split.past);
    let upcoming_shows = entries(split.upcoming);
    Ok(Page::new(
        &session,
        VenueDetail {
            ctx: session.context(),
            venue: Profile::from(&venue),
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        },
    ))
}

fn form_page(
    session: &Session,
    form: VenueForm,
    errors: FormErrors,
    id: Option<i32>,
) -> VenueFormPage {
    let (title, action) = match id {
        Some(id) => ("Edit venue".to_string(), format!("/venues/{}/edit", id)),
        None => ("List a new venue".to_string(), "/venues/create".to_string()),
    };
    VenueFormPage {
        ctx: session.context(),
        title,
        action,
        form,
        errors,
    }
}

pub async fn create_form(session: Session) -> Page<VenueFormPage> {
    let page = form_page(&session, VenueForm::new(), FormErrors::default(), None);
    Page::new(&session, page)
}

async fn insert(db: &DbConn, venue: entity::VenueActive) -> Result<entity::Venue, DbErr> {
    let tx = db.begin().await?;
    let venue = venue.insert(&tx).await?;
    tx.commit().await?;
    Ok(venue)
}

pub async fn create(
    State(state): State<AppState>,
    mut session: Session,
    Submission(fields): Submission,
) -> Response {
    let form = VenueForm::from_fields(&fields);
    let errors = match form.validate() {
        Ok(active) => match insert(&state.db, active).await {
            Ok(venue) => {
                tracing::info! {id = venue.id, name = %venue.name, "Listed venue"};
                return FlashRedirect::new(
                    "/",
                    format!("Venue \"{}\" was successfully listed!", venue.name),
                )
                .into_response();
            }
            Err(e) => {
                tracing::error! {error = %e, "Could not list venue"};
                FormErrors::default()
            }
        },
        Err(errors) => errors,
    };
    if form.profile.name.is_empty() {
        session.flash("An error occurred.");
    } else {
        session.flash(format!(
            "An error occurred. Venue \"{}\" could not be listed.",
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
) -> Result<Page<VenueFormPage>, Error> {
    let venue = entity::VenueEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(Error::NotFound)?;
    let page = form_page(
        &session,
        VenueForm::from_model(&venue),
        FormErrors::default(),
        Some(id),
    );
    Ok(Page::new(&session, page))
}

async fn update(db: &DbConn, venue: entity::VenueActive) -> Result<entity::Venue, DbErr> {
    let tx = db.begin().await?;
    let venue = venue.update(&tx).await?;
    tx.commit().await?;
    Ok(venue)
}

pub async fn edit(
    State(state): State<AppState>,
    mut session: Session,
    Path(id): Path<i32>,
    Submission(fields): Submission,
) -> Result<Response, Error> {
    entity::VenueEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(Error::NotFound)?;
    let form = VenueForm::from_fields(&fields);
    let errors = match form.validate() {
        Ok(mut active) => {
            active.id = Set(id);
            match update(&state.db, active).await {
                Ok(venue) => {
                    tracing::info! {id, name = %venue.name, "Updated venue"};
                    return Ok(FlashRedirect::new(
                        format!("/venues/{}", id),
                        format!("Venue \"{}\" was successfully updated!", venue.name),
                    )
                    .into_response());
                }
                Err(e) => {
                    tracing::error! {error = %e, id, "Could not update venue"};
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

async fn remove(db: &DbConn, id: &str) -> Result<(), Error> {
    let id: i32 = id.parse().map_err(|_| Error::NotFound)?;
    let tx = db.begin().await?;
    let venue = entity::VenueEntity::find_by_id(id)
        .one(&tx)
        .await?
        .ok_or(Error::NotFound)?;
    venue.delete(&tx).await?;
    tx.commit().await?;
    Ok(())
}

/// Shows of the venue are removed along with it.
pub async fn delete(
    State(state): State<AppState>,
    _csrf: CsrfHeader,
    Path(id): Path<String>,
) -> FlashRedirect {
    match remove(&state.db, &id).await {
        Ok(()) => {
            tracing::info! {%id, "Deleted venue"};
            FlashRedirect::new("/", "Venue was deleted!")
        }
        Err(e) => {
            tracing::error! {error = %e, %id, "Could not delete venue"};
            FlashRedirect::new("/", "An error occurred.")
        }
    }
}
