mod artists;
pub mod error;
pub mod extract;
mod pages;
pub mod session;
mod shows;
mod venues;

use axum::{
    routing::{get, post},
    Router,
};
use base::setting::Settings;
pub use error::Error;
use sea_orm::{
    sea_query::{BinOper, Expr, Func, SimpleExpr},
    ColumnTrait, DbConn,
};
use std::path::Path;
use tower_http::{services::ServeDir, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub csrf: bool,
    pub recent_limit: u64,
}

impl AppState {
    pub fn new(db: DbConn, settings: &Settings) -> Self {
        Self {
            db,
            csrf: settings.csrf,
            recent_limit: settings.recent_limit,
        }
    }
}

pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/venues", get(venues::venues))
        .route("/venues/search", post(venues::search))
        .route(
            "/venues/create",
            get(venues::create_form).post(venues::create),
        )
        .route("/venues/:id", get(venues::venue).delete(venues::delete))
        .route("/venues/:id/edit", get(venues::edit_form).post(venues::edit))
        .route("/artists", get(artists::artists))
        .route("/artists/search", post(artists::search))
        .route(
            "/artists/create",
            get(artists::create_form).post(artists::create),
        )
        .route("/artists/:id", get(artists::artist))
        .route(
            "/artists/:id/edit",
            get(artists::edit_form).post(artists::edit),
        )
        .route("/shows", get(shows::shows))
        .route("/shows/create", get(shows::create_form).post(shows::create))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Case-insensitive substring match on a name column. Both sides are folded
/// by the database's `LOWER` so they always agree. `%` and `_` in the term
/// keep their wildcard meaning.
fn name_contains<C>(column: C, term: &str) -> SimpleExpr
where
    C: ColumnTrait,
{
    SimpleExpr::Binary(
        Box::new(Func::lower(Expr::col(column)).into()),
        BinOper::Like,
        Box::new(Func::lower(Expr::val(format!("%{}%", term))).into()),
    )
}
