use sea_orm::ActiveValue::{NotSet, Set};
use std::collections::BTreeMap;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use time::PrimitiveDateTime;

use crate::datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum Genre {
    Alternative,
    Blues,
    Classical,
    Country,
    Electronic,
    Folk,
    Funk,
    #[strum(serialize = "Hip-Hop")]
    HipHop,
    #[strum(serialize = "Heavy Metal")]
    HeavyMetal,
    Instrumental,
    Jazz,
    #[strum(serialize = "Musical Theatre")]
    MusicalTheatre,
    Pop,
    Punk,
    #[strum(serialize = "R&B")]
    RnB,
    Reggae,
    #[strum(serialize = "Rock n Roll")]
    RockNRoll,
    Soul,
    Other,
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum UsState {
    AL,
    AK,
    AZ,
    AR,
    CA,
    CO,
    CT,
    DE,
    DC,
    FL,
    GA,
    HI,
    ID,
    IL,
    IN,
    IA,
    KS,
    KY,
    LA,
    ME,
    MT,
    NE,
    NV,
    NH,
    NJ,
    NM,
    NY,
    NC,
    ND,
    OH,
    OK,
    OR,
    MD,
    MA,
    MI,
    MN,
    MS,
    MO,
    PA,
    RI,
    SC,
    SD,
    TN,
    TX,
    UT,
    VT,
    VA,
    WA,
    WV,
    WI,
    WY,
}

/// An `<option>` of a select input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub selected: bool,
}

pub fn state_choices(selected: &str) -> Vec<Choice> {
    UsState::iter()
        .map(|s| s.to_string())
        .map(|value| Choice {
            selected: value == selected,
            value,
        })
        .collect()
}

pub fn genre_choices(selected: &[String]) -> Vec<Choice> {
    Genre::iter()
        .map(|g| g.to_string())
        .map(|value| Choice {
            selected: selected.contains(&value),
            value,
        })
        .collect()
}

/// Raw `application/x-www-form-urlencoded` pairs, keys may repeat.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Fields(Vec<(String, String)>);

impl From<Vec<(String, String)>> for Fields {
    fn from(value: Vec<(String, String)>) -> Self {
        Self(value)
    }
}

impl Fields {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().trim().to_string()
    }

    pub fn all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// Checkbox semantics: unchecked boxes are not submitted at all.
    pub fn checked(&self, key: &str) -> bool {
        matches!(
            self.get(key).map(|v| v.trim().to_ascii_lowercase()).as_deref(),
            Some("y" | "yes" | "on" | "true" | "1")
        )
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<&'static str, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// All the messages for a field, ready to be displayed.
    pub fn error(&self, field: &str) -> String {
        self.get(field).join(" ")
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn required(errors: &mut FormErrors, field: &'static str, value: &str) {
    if value.is_empty() {
        errors.add(field, "This field is required.");
    }
}

fn link(errors: &mut FormErrors, field: &'static str, value: &str) {
    if value.is_empty() {
        return;
    }
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => errors.add(field, "Invalid URL."),
    }
}

fn choice<T: FromStr>(errors: &mut FormErrors, field: &'static str, value: &str) {
    if !value.is_empty() && T::from_str(value).is_err() {
        errors.add(field, "Not a valid choice.");
    }
}

fn genres(errors: &mut FormErrors, values: &[String]) {
    if values.is_empty() {
        errors.add("genres", "This field is required.");
    }
    for value in values {
        if Genre::from_str(value).is_err() {
            errors.add("genres", format!("'{}' is not a valid choice for this field.", value));
        }
    }
}

/// Fields shared by venues and artists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub website: String,
    pub seeking_description: String,
}

impl Profile {
    fn from_fields(fields: &Fields) -> Self {
        Self {
            name: fields.text("name"),
            city: fields.text("city"),
            state: fields.text("state"),
            phone: fields.text("phone"),
            image_link: fields.text("image_link"),
            genres: fields.all("genres"),
            facebook_link: fields.text("facebook_link"),
            website: fields.text("website"),
            seeking_description: fields.text("seeking_description"),
        }
    }

    fn validate(&self, errors: &mut FormErrors) {
        required(errors, "name", &self.name);
        required(errors, "city", &self.city);
        required(errors, "state", &self.state);
        choice::<UsState>(errors, "state", &self.state);
        genres(errors, &self.genres);
        link(errors, "facebook_link", &self.facebook_link);
        link(errors, "website", &self.website);
    }

    pub fn state_choices(&self) -> Vec<Choice> {
        state_choices(&self.state)
    }

    pub fn genre_choices(&self) -> Vec<Choice> {
        genre_choices(&self.genres)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueForm {
    pub profile: Profile,
    pub address: String,
    pub seeking_talent: bool,
}

impl VenueForm {
    pub fn new() -> Self {
        Self {
            seeking_talent: true,
            ..Default::default()
        }
    }

    pub fn from_fields(fields: &Fields) -> Self {
        Self {
            profile: Profile::from_fields(fields),
            address: fields.text("address"),
            seeking_talent: fields.checked("seeking_talent"),
        }
    }

    pub fn from_model(venue: &entity::Venue) -> Self {
        Self {
            profile: Profile {
                name: venue.name.to_owned(),
                city: venue.city.to_owned(),
                state: venue.state.to_owned(),
                phone: venue.phone.to_owned().unwrap_or_default(),
                image_link: venue.image_link.to_owned().unwrap_or_default(),
                genres: venue.genres.0.to_owned(),
                facebook_link: venue.facebook_link.to_owned().unwrap_or_default(),
                website: venue.website.to_owned().unwrap_or_default(),
                seeking_description: venue.seeking_description.to_owned().unwrap_or_default(),
            },
            address: venue.address.to_owned(),
            seeking_talent: venue.seeking_talent,
        }
    }

    /// Checks the submitted values and, when they are valid, maps them to a
    /// row with every editable column set and the id left unset.
    pub fn validate(&self) -> Result<entity::VenueActive, FormErrors> {
        let mut errors = FormErrors::default();
        self.profile.validate(&mut errors);
        required(&mut errors, "address", &self.address);
        errors.into_result()?;

        let p = &self.profile;
        Ok(entity::VenueActive {
            id: NotSet,
            name: Set(p.name.to_owned()),
            city: Set(p.city.to_owned()),
            state: Set(p.state.to_owned()),
            address: Set(self.address.to_owned()),
            phone: Set(optional(&p.phone)),
            image_link: Set(optional(&p.image_link)),
            facebook_link: Set(optional(&p.facebook_link)),
            website: Set(optional(&p.website)),
            genres: Set(p.genres.to_owned().into()),
            seeking_talent: Set(self.seeking_talent),
            seeking_description: Set(optional(&p.seeking_description)),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistForm {
    pub profile: Profile,
    pub seeking_venue: bool,
}

impl ArtistForm {
    pub fn new() -> Self {
        Self {
            seeking_venue: true,
            ..Default::default()
        }
    }

    pub fn from_fields(fields: &Fields) -> Self {
        Self {
            profile: Profile::from_fields(fields),
            seeking_venue: fields.checked("seeking_venue"),
        }
    }

    pub fn from_model(artist: &entity::Artist) -> Self {
        Self {
            profile: Profile {
                name: artist.name.to_owned(),
                city: artist.city.to_owned(),
                state: artist.state.to_owned(),
                phone: artist.phone.to_owned().unwrap_or_default(),
                image_link: artist.image_link.to_owned().unwrap_or_default(),
                genres: artist.genres.0.to_owned(),
                facebook_link: artist.facebook_link.to_owned().unwrap_or_default(),
                website: artist.website.to_owned().unwrap_or_default(),
                seeking_description: artist.seeking_description.to_owned().unwrap_or_default(),
            },
            seeking_venue: artist.seeking_venue,
        }
    }

    pub fn validate(&self) -> Result<entity::ArtistActive, FormErrors> {
        let mut errors = FormErrors::default();
        self.profile.validate(&mut errors);
        errors.into_result()?;

        let p = &self.profile;
        Ok(entity::ArtistActive {
            id: NotSet,
            name: Set(p.name.to_owned()),
            city: Set(p.city.to_owned()),
            state: Set(p.state.to_owned()),
            phone: Set(optional(&p.phone)),
            image_link: Set(optional(&p.image_link)),
            facebook_link: Set(optional(&p.facebook_link)),
            website: Set(optional(&p.website)),
            genres: Set(p.genres.to_owned().into()),
            seeking_venue: Set(self.seeking_venue),
            seeking_description: Set(optional(&p.seeking_description)),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

impl ShowForm {
    /// An empty form with the start time defaulting to the current time.
    pub fn new(now: PrimitiveDateTime) -> Self {
        Self {
            start_time: datetime::to_input(now),
            ..Default::default()
        }
    }

    pub fn from_fields(fields: &Fields) -> Self {
        Self {
            artist_id: fields.text("artist_id"),
            venue_id: fields.text("venue_id"),
            start_time: fields.text("start_time"),
        }
    }

    pub fn validate(&self) -> Result<entity::ShowActive, FormErrors> {
        let mut errors = FormErrors::default();
        let artist_id = id(&mut errors, "artist_id", &self.artist_id);
        let venue_id = id(&mut errors, "venue_id", &self.venue_id);
        let start_time = if self.start_time.is_empty() {
            errors.add("start_time", "This field is required.");
            None
        } else {
            let parsed = datetime::parse(&self.start_time);
            if parsed.is_none() {
                errors.add("start_time", "Not a valid datetime value.");
            }
            parsed
        };

        match (artist_id, venue_id, start_time) {
            (Some(artist_id), Some(venue_id), Some(start_time)) if errors.is_empty() => {
                Ok(entity::ShowActive {
                    id: NotSet,
                    venue_id: Set(venue_id),
                    artist_id: Set(artist_id),
                    start_time: Set(start_time),
                })
            }
            _ => Err(errors),
        }
    }
}

fn id(errors: &mut FormErrors, field: &'static str, value: &str) -> Option<i32> {
    if value.is_empty() {
        errors.add(field, "This field is required.");
        return None;
    }
    match value.parse::<i32>() {
        Ok(id) if id > 0 => Some(id),
        _ => {
            errors.add(field, "Not a valid id.");
            None
        }
    }
}
