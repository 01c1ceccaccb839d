use askama::Template;

use crate::datetime::{self, DateStyle};
use crate::forms::{ArtistForm, FormErrors, ShowForm, VenueForm};
use crate::listing::Area;

/// Values every page needs for the shared layout.
#[derive(Debug, Default, Clone)]
pub struct Context {
    pub messages: Vec<String>,
    pub csrf_token: String,
}

/// A venue or an artist flattened for display, missing values are empty.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub genres: Vec<String>,
    pub seeking: bool,
    pub seeking_description: String,
}

impl From<&entity::Venue> for Profile {
    fn from(v: &entity::Venue) -> Self {
        Self {
            id: v.id,
            name: v.name.to_owned(),
            city: v.city.to_owned(),
            state: v.state.to_owned(),
            address: v.address.to_owned(),
            phone: v.phone.to_owned().unwrap_or_default(),
            image_link: v.image_link.to_owned().unwrap_or_default(),
            facebook_link: v.facebook_link.to_owned().unwrap_or_default(),
            website: v.website.to_owned().unwrap_or_default(),
            genres: v.genres.0.to_owned(),
            seeking: v.seeking_talent,
            seeking_description: v.seeking_description.to_owned().unwrap_or_default(),
        }
    }
}

impl From<&entity::Artist> for Profile {
    fn from(a: &entity::Artist) -> Self {
        Self {
            id: a.id,
            name: a.name.to_owned(),
            city: a.city.to_owned(),
            state: a.state.to_owned(),
            address: String::new(),
            phone: a.phone.to_owned().unwrap_or_default(),
            image_link: a.image_link.to_owned().unwrap_or_default(),
            facebook_link: a.facebook_link.to_owned().unwrap_or_default(),
            website: a.website.to_owned().unwrap_or_default(),
            genres: a.genres.0.to_owned(),
            seeking: a.seeking_venue,
            seeking_description: a.seeking_description.to_owned().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listed {
    pub id: i32,
    pub name: String,
}

impl From<&entity::Venue> for Listed {
    fn from(v: &entity::Venue) -> Self {
        Self {
            id: v.id,
            name: v.name.to_owned(),
        }
    }
}

impl From<&entity::Artist> for Listed {
    fn from(a: &entity::Artist) -> Self {
        Self {
            id: a.id,
            name: a.name.to_owned(),
        }
    }
}

/// One show on a detail page, described by the other party of the show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowEntry {
    pub id: i32,
    pub name: String,
    pub image_link: String,
    pub start_time: String,
}

impl ShowEntry {
    pub fn new(show: &entity::Show, other: &Profile) -> Self {
        Self {
            id: other.id,
            name: other.name.to_owned(),
            image_link: other.image_link.to_owned(),
            start_time: datetime::format(show.start_time, DateStyle::Medium),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowRow {
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct Home {
    pub ctx: Context,
    pub venues: Vec<Listed>,
    pub artists: Vec<Listed>,
}

#[derive(Template)]
#[template(path = "pages/venues.html")]
pub struct Venues {
    pub ctx: Context,
    pub areas: Vec<Area>,
}

#[derive(Template)]
#[template(path = "pages/artists.html")]
pub struct Artists {
    pub ctx: Context,
    pub artists: Vec<Listed>,
}

#[derive(Template)]
#[template(path = "pages/shows.html")]
pub struct Shows {
    pub ctx: Context,
    pub shows: Vec<ShowRow>,
}

#[derive(Template)]
#[template(path = "pages/search.html")]
pub struct Search {
    pub ctx: Context,
    /// `venues` or `artists`, used for links and the search form action.
    pub kind: &'static str,
    pub search_term: String,
    pub count: usize,
    pub results: Vec<Listed>,
}

#[derive(Template)]
#[template(path = "pages/show_venue.html")]
pub struct VenueDetail {
    pub ctx: Context,
    pub venue: Profile,
    pub past_shows: Vec<ShowEntry>,
    pub upcoming_shows: Vec<ShowEntry>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Template)]
#[template(path = "pages/show_artist.html")]
pub struct ArtistDetail {
    pub ctx: Context,
    pub artist: Profile,
    pub past_shows: Vec<ShowEntry>,
    pub upcoming_shows: Vec<ShowEntry>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Template)]
#[template(path = "forms/venue.html")]
pub struct VenueFormPage {
    pub ctx: Context,
    pub title: String,
    pub action: String,
    pub form: VenueForm,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "forms/artist.html")]
pub struct ArtistFormPage {
    pub ctx: Context,
    pub title: String,
    pub action: String,
    pub form: ArtistForm,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "forms/show.html")]
pub struct ShowFormPage {
    pub ctx: Context,
    pub form: ShowForm,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "errors/error.html")]
pub struct ErrorPage {
    pub ctx: Context,
    pub code: u16,
    pub title: String,
    pub message: String,
}
