use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;

use crate::templates::{Context, ErrorPage};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),
    #[error("Could not render page: {0}")]
    Template(#[from] askama::Error),

    #[error("Not found")]
    NotFound,
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("The CSRF token is missing or invalid")]
    Csrf,
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::BadRequest(_) | Error::Csrf => StatusCode::BAD_REQUEST,
            Error::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::DbErr(_) | Error::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn page(&self) -> ErrorPage {
        let status = self.status();
        let (title, message) = match self {
            Error::NotFound => (
                "Not Found",
                "The page you are looking for does not exist.".to_string(),
            ),
            Error::Csrf => ("CSRF Error", self.to_string()),
            Error::BadRequest(reason) => ("Bad Request", reason.to_owned()),
            Error::UnsupportedMediaType(reason) => ("Unsupported Media Type", reason.to_owned()),
            Error::DbErr(_) | Error::Template(_) => (
                "Internal Server Error",
                "Something went wrong on our end, please try again later.".to_string(),
            ),
        };
        ErrorPage {
            ctx: Context::default(),
            code: status.as_u16(),
            title: title.to_string(),
            message,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }
        match self.page().render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Could not render the error page");
                (status, status.to_string()).into_response()
            }
        }
    }
}
