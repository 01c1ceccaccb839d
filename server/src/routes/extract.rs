use axum::{
    async_trait,
    body::HttpBody,
    extract::{rejection::FormRejection, FromRequest, FromRequestParts, Path as AxumPath},
    http::{request::Parts, HeaderMap, Request},
    BoxError, Form,
};
use serde::de::DeserializeOwned;

use super::{
    session::{csrf_cookie, CSRF_FIELD, CSRF_HEADER},
    AppState, Error,
};
use crate::forms::Fields;

pub struct Path<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AxumPath(t) = AxumPath::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Invalid URL path");
                Error::NotFound
            })?;
        Ok(Self(t))
    }
}

fn verify_csrf(cookie: Option<&str>, submitted: Option<&str>) -> Result<(), Error> {
    match (cookie, submitted) {
        (Some(cookie), Some(submitted)) if !cookie.is_empty() && cookie == submitted => Ok(()),
        _ => Err(Error::Csrf),
    }
}

/// The fields of an urlencoded form, checked against the CSRF cookie.
pub struct Submission(pub Fields);

#[async_trait]
impl<B> FromRequest<AppState, B> for Submission
where
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = Error;

    async fn from_request(req: Request<B>, state: &AppState) -> Result<Self, Self::Rejection> {
        let cookie = csrf_cookie(req.headers());
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(|e| match e {
                FormRejection::InvalidFormContentType(e) => {
                    Error::UnsupportedMediaType(e.to_string())
                }
                e => Error::BadRequest(e.to_string()),
            })?;
        let fields = Fields::from(pairs);
        if state.csrf {
            verify_csrf(cookie.as_deref(), fields.get(CSRF_FIELD))?;
        }
        Ok(Self(fields))
    }
}

/// Guards requests without a body, which carry the token in a header.
pub struct CsrfHeader;

fn csrf_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok())
}

#[async_trait]
impl FromRequestParts<AppState> for CsrfHeader {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.csrf {
            let cookie = csrf_cookie(&parts.headers);
            verify_csrf(cookie.as_deref(), csrf_header(&parts.headers))?;
        }
        Ok(Self)
    }
}
