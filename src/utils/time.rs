//! Timestamp parsing for engine-reported dates

use chrono::{FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Utc};

use crate::domain::model::Timestamp;

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_TIME_FRACTION_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Layout of a timestamp field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampGrammar {
    /// Zone abbreviation plus `YYYY-MM-DD HH:MM:SS`, e.g. `UTC 2020-01-15 10:30:00`
    Zoned,
    /// `YYYY-MM-DD HH:MM:SS` in the host's local zone
    Local,
}

/// Parser for the engine's two timestamp layouts
pub struct TimestampParser;

impl TimestampParser {
    /// Create a new timestamp parser
    pub fn new() -> Self {
        Self
    }
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampParser {
    /// Parse a raw timestamp with the given grammar
    pub fn parse(&self, raw: &str, grammar: TimestampGrammar) -> Result<Timestamp, String> {
        match grammar {
            TimestampGrammar::Zoned => self.parse_zoned(raw),
            TimestampGrammar::Local => self.parse_local(raw),
        }
    }

    /// Parse `ZONE YYYY-MM-DD HH:MM:SS`.
    ///
    /// Newer engine releases print the zone last (`2020-01-15 10:30:00 UTC`);
    /// both orders are accepted. Abbreviations carry no offset information, so
    /// every zone is read at offset zero.
    pub fn parse_zoned(&self, raw: &str) -> Result<Timestamp, String> {
        let parts: Vec<&str> = raw.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(format!("expected zone, date and time in {:?}", raw));
        }

        let (zone, date, time) = if is_zone_abbreviation(parts[0]) {
            (parts[0], parts[1], parts[2])
        } else if is_zone_abbreviation(parts[2]) {
            (parts[2], parts[0], parts[1])
        } else {
            return Err(format!("missing zone abbreviation in {:?}", raw));
        };

        let naive = parse_naive(&format!("{} {}", date, time))
            .map_err(|e| format!("{} in {:?}", e, raw))?;

        tracing::trace!("Read zone {} as offset zero", zone);
        Ok(Utc.fix().from_utc_datetime(&naive))
    }

    /// Parse `YYYY-MM-DD HH:MM:SS` as wall-clock time in the local zone
    pub fn parse_local(&self, raw: &str) -> Result<Timestamp, String> {
        let naive = parse_naive(raw.trim()).map_err(|e| format!("{} in {:?}", e, raw))?;

        match Local.from_local_datetime(&naive).earliest() {
            Some(local) => {
                let offset: FixedOffset = local.offset().fix();
                Ok(local.with_timezone(&offset))
            }
            // Wall-clock time skipped by a DST transition
            None => Ok(Utc.fix().from_utc_datetime(&naive)),
        }
    }
}

fn is_zone_abbreviation(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_alphabetic())
}

fn parse_naive(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, DATE_TIME_FRACTION_FORMAT))
}
