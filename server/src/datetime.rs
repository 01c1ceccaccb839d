use time::{
    format_description::FormatItem, macros::format_description, OffsetDateTime, PrimitiveDateTime,
};

static MEDIUM: &[FormatItem<'static>] = format_description!(
    "[weekday repr:short] [month], [day], [year] [hour repr:12 padding:none]:[minute][period]"
);
static FULL: &[FormatItem<'static>] = format_description!(
    "[weekday] [month repr:long], [day padding:none], [year] at [hour repr:12 padding:none]:[minute][period]"
);
static INPUT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

// accepted in addition to INPUT, the last one is what `datetime-local` inputs send
static ALTERNATIVE_INPUTS: [&[FormatItem<'static>]; 3] = [
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    #[default]
    Medium,
    Full,
}

/// Show times are stored without an offset and compared against UTC.
pub fn now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub fn format(value: PrimitiveDateTime, style: DateStyle) -> String {
    let description = match style {
        DateStyle::Medium => MEDIUM,
        DateStyle::Full => FULL,
    };
    value
        .format(description)
        .unwrap_or_else(|_| value.to_string())
}

/// The value used to prefill form inputs.
pub fn to_input(value: PrimitiveDateTime) -> String {
    value
        .format(INPUT)
        .unwrap_or_else(|_| value.to_string())
}

pub fn parse(value: &str) -> Option<PrimitiveDateTime> {
    let value = value.trim();
    std::iter::once(INPUT)
        .chain(ALTERNATIVE_INPUTS)
        .find_map(|description| PrimitiveDateTime::parse(value, description).ok())
}
