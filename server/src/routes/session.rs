//! Per-client state kept in cookies: the pending flash message and the CSRF
//! token.

use askama::Template;
use axum::{
    async_trait,
    extract::FromRequestParts,
    headers::{Cookie, HeaderMapExt},
    http::{
        header::{HeaderValue, SET_COOKIE},
        request::Parts,
        HeaderMap,
    },
    response::{Html, IntoResponse, Redirect, Response},
};
use rand::distributions::{Alphanumeric, DistString};
use std::convert::Infallible;

use super::Error;
use crate::templates::Context;

pub const FLASH_COOKIE: &str = "flash";
pub const CSRF_COOKIE: &str = "csrf_token";
pub const CSRF_FIELD: &str = "csrf_token";
pub const CSRF_HEADER: &str = "x-csrftoken";

const CSRF_TOKEN_LEN: usize = 32;

pub fn new_csrf_token() -> String {
    Alphanumeric.sample_string(&mut rand::thread_rng(), CSRF_TOKEN_LEN)
}

fn valid_token(token: &str) -> bool {
    token.len() == CSRF_TOKEN_LEN && token.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn csrf_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Cookie>()
        .and_then(|c| c.get(CSRF_COOKIE).map(String::from))
        .filter(|t| valid_token(t))
}

fn flash_cookie(message: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        FLASH_COOKIE,
        urlencoding::encode(message)
    )
}

fn append_cookies(response: &mut Response, cookies: &[String]) {
    for cookie in cookies {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Could not set cookie"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    messages: Vec<String>,
    consumed_flash: bool,
    csrf_token: String,
    issued_csrf: bool,
}

impl Session {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let flash = headers
            .typed_get::<Cookie>()
            .and_then(|c| c.get(FLASH_COOKIE).map(String::from))
            .filter(|f| !f.is_empty());
        let messages = flash
            .as_deref()
            .and_then(|f| urlencoding::decode(f).ok())
            .map(|m| vec![m.into_owned()])
            .unwrap_or_default();
        let (csrf_token, issued_csrf) = match csrf_cookie(headers) {
            Some(token) => (token, false),
            None => (new_csrf_token(), true),
        };
        Self {
            messages,
            consumed_flash: flash.is_some(),
            csrf_token,
            issued_csrf,
        }
    }

    /// Displays a message on the page rendered for this request.
    pub fn flash(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    pub fn context(&self) -> Context {
        Context {
            messages: self.messages.to_owned(),
            csrf_token: self.csrf_token.to_owned(),
        }
    }

    fn cookies(&self) -> Vec<String> {
        let mut cookies = Vec::new();
        if self.consumed_flash {
            cookies.push(format!("{}=; Path=/; Max-Age=0", FLASH_COOKIE));
        }
        if self.issued_csrf {
            cookies.push(format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                CSRF_COOKIE, self.csrf_token
            ));
        }
        cookies
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// A rendered template along with the session cookies to update.
pub struct Page<T> {
    template: T,
    cookies: Vec<String>,
}

impl<T> Page<T>
where
    T: Template,
{
    pub fn new(session: &Session, template: T) -> Self {
        Self {
            template,
            cookies: session.cookies(),
        }
    }
}

impl<T> IntoResponse for Page<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.template.render() {
            Ok(body) => {
                let mut response = Html(body).into_response();
                append_cookies(&mut response, &self.cookies);
                response
            }
            Err(e) => Error::Template(e).into_response(),
        }
    }
}

/// A `303 See Other` carrying a message for the next rendered page.
pub struct FlashRedirect {
    to: String,
    message: String,
}

impl FlashRedirect {
    pub fn new(to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for FlashRedirect {
    fn into_response(self) -> Response {
        let mut response = Redirect::to(&self.to).into_response();
        append_cookies(&mut response, &[flash_cookie(&self.message)]);
        response
    }
}
