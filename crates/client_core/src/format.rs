use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Localized month abbreviations, indexed by zero-based month. Both juin and
/// juillet shorten to "Jui.", matching the portal's historical display form.
const MONTH_ABBR: [&str; 12] = [
    "Jan.", "Fév.", "Mar.", "Avr.", "Mai", "Jui.", "Jui.", "Aoû.", "Sep.", "Oct.", "Nov.", "Déc.",
];

#[derive(Debug, Error)]
#[error("unparsable date '{raw}'")]
pub struct DateParseError {
    raw: String,
}

/// Formats an ISO-ish date into the localized short form ("12 Avr. 23").
/// Total over its input: anything unparsable comes back as an error for the
/// caller to degrade on, never a panic.
pub fn format_date(raw: &str) -> Result<String, DateParseError> {
    let parsed = parse_iso_date(raw).ok_or_else(|| DateParseError { raw: raw.to_owned() })?;
    Ok(format!(
        "{:02} {} {:02}",
        parsed.day(),
        MONTH_ABBR[parsed.month0() as usize],
        parsed.year().rem_euclid(100),
    ))
}

fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    // Plain dates and datetimes with the date up front both qualify.
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Maps a raw status code through the fixed label table. Unrecognized codes
/// pass through unchanged.
pub fn format_status(raw: &str) -> String {
    match raw {
        "pending" => "En attente".to_owned(),
        "accepted" => "Accepté".to_owned(),
        other => other.to_owned(),
    }
}

/// Reads a localized short-form date back into a calendar date, for display
/// ordering. "Jui." is ambiguous between juin and juillet; it resolves to
/// June, which keeps the order total and deterministic.
pub(crate) fn parse_display_date(display: &str) -> Option<NaiveDate> {
    let mut parts = display.split_whitespace();
    let day: u32 = parts.next()?.parse().ok()?;
    let month_token = parts.next()?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let month = MONTH_ABBR.iter().position(|m| *m == month_token)? as u32 + 1;
    NaiveDate::from_ymd_opt(2000 + year, month, day)
}
