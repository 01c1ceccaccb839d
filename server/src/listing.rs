use std::collections::HashMap;
use time::PrimitiveDateTime;

/// A show is upcoming when it starts strictly after `now`, and past otherwise.
pub fn is_upcoming(start_time: PrimitiveDateTime, now: PrimitiveDateTime) -> bool {
    start_time > now
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split<T> {
    pub past: Vec<T>,
    pub upcoming: Vec<T>,
}

impl<T> Default for Split<T> {
    fn default() -> Self {
        Self {
            past: Vec::new(),
            upcoming: Vec::new(),
        }
    }
}

/// Partitions `items` in a single pass, preserving their relative order.
pub fn split_shows<T, I, F>(items: I, now: PrimitiveDateTime, start_time: F) -> Split<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> PrimitiveDateTime,
{
    let mut split = Split::default();
    for item in items {
        if is_upcoming(start_time(&item), now) {
            split.upcoming.push(item);
        } else {
            split.past.push(item);
        }
    }
    split
}

pub fn count_upcoming(shows: &[entity::Show], now: PrimitiveDateTime) -> usize {
    shows
        .iter()
        .filter(|s| is_upcoming(s.start_time, now))
        .count()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaVenue {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<AreaVenue>,
}

/// Groups venues by their (city, state) pair. Areas are ordered by the first
/// venue encountered in each of them.
pub fn group_by_area<'a, I>(venues: I) -> Vec<Area>
where
    I: IntoIterator<Item = (&'a entity::Venue, usize)>,
{
    let mut areas: Vec<Area> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    for (venue, num_upcoming_shows) in venues {
        let key = (venue.city.to_owned(), venue.state.to_owned());
        let i = *index.entry(key).or_insert_with(|| {
            areas.push(Area {
                city: venue.city.to_owned(),
                state: venue.state.to_owned(),
                venues: Vec::new(),
            });
            areas.len() - 1
        });
        areas[i].venues.push(AreaVenue {
            id: venue.id,
            name: venue.name.to_owned(),
            num_upcoming_shows,
        });
    }
    areas
}
