//! Parsing of the ISO 8601 durations the YouTube API reports for video lengths.

use jiff::fmt::temporal::SpanParser;
use jiff::{SpanRelativeTo, Unit};
use thiserror::Error;

// ISO 8601 only; `Span`'s `FromStr` would also take jiff's "friendly" format such as `5m`.
static PARSER: SpanParser = SpanParser::new();

/// Why a duration string could not be turned into a number of seconds.
///
/// Callers treat every variant the same way (skip the item), but the variants keep the cause
/// visible in trace logs.
#[derive(Debug, Error)]
pub enum DurationError {
    #[error("malformed duration '{text}'")]
    Malformed {
        text: String,
        #[source]
        source: jiff::Error,
    },
    #[error("duration '{0}' uses years or months, which have no fixed length")]
    Calendar(String),
    #[error("duration '{0}' is negative")]
    Negative(String),
}

/// Parses an ISO 8601 duration such as `PT15M33S` or `P1DT2H` into whole seconds.
///
/// Days and weeks count as 24 hours and 7 days respectively. Fractional seconds are truncated.
/// `P0D`, which the API reports for upcoming live streams, parses to 0; deciding that zero is
/// unusable is left to the caller.
pub fn parse_duration(text: &str) -> Result<u64, DurationError> {
    let trimmed = text.trim();
    let span = PARSER.parse_span(trimmed).map_err(|source| DurationError::Malformed {
        text: trimmed.to_string(),
        source,
    })?;

    if span.get_years() != 0 || span.get_months() != 0 {
        return Err(DurationError::Calendar(trimmed.to_string()));
    }
    if span.is_negative() {
        return Err(DurationError::Negative(trimmed.to_string()));
    }

    let seconds = span
        .total((Unit::Second, SpanRelativeTo::days_are_24_hours()))
        .map_err(|source| DurationError::Malformed {
            text: trimmed.to_string(),
            source,
        })?;

    Ok(seconds.trunc() as u64)
}
