//! The "last updated" label.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use shelf_state::Metadata;

pub const LAST_UPDATED_PREFIX: &str = "Last updated:";

const DISPLAY_FORMAT: &str = "%b %d, %Y, %H:%M:%S %Z";

/// Parses a producer timestamp.
///
/// Accepts RFC 3339, a bare `YYYY-MM-DD` date (UTC midnight), and a date-time
/// without an offset (local time).
pub fn parse_updated_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|at| at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Formats `at` in `tz` with the label prefix.
pub fn format_in<Z: TimeZone>(at: DateTime<Utc>, tz: &Z) -> String
where
    Z::Offset: std::fmt::Display,
{
    format!(
        "{LAST_UPDATED_PREFIX} {}",
        at.with_timezone(tz).format(DISPLAY_FORMAT)
    )
}

/// Parses an IANA zone name. Accepts the `:Area/City` and zoneinfo path forms `TZ` allows.
pub fn zone_named(name: &str) -> Option<Tz> {
    let name = name.trim().trim_start_matches(':');
    let name = name.rsplit_once("zoneinfo/").map_or(name, |(_, zone)| zone);
    name.parse().ok()
}

/// The viewer's IANA zone: `TZ` when it names one, otherwise the system setting.
pub fn viewer_zone() -> Option<Tz> {
    if let Some(zone) = std::env::var("TZ").ok().as_deref().and_then(zone_named) {
        return Some(zone);
    }
    match iana_time_zone::get_timezone() {
        Ok(name) => zone_named(&name),
        Err(e) => {
            tracing::debug!("system timezone unavailable: {e}");
            None
        }
    }
}

/// Formats in `zone` so the label carries its abbreviation. Without a known zone the
/// local offset is shown instead.
fn format_for_viewer(at: DateTime<Utc>, zone: Option<Tz>) -> String {
    match zone {
        Some(zone) => format_in(at, &zone),
        None => format_in(at, &Local),
    }
}

/// Returns the label for `meta` in the viewer's timezone, or `None` if there is no
/// usable timestamp.
pub fn format_last_updated(meta: Option<&Metadata>) -> Option<String> {
    let raw = meta?.updated_at.as_deref()?;
    let Some(at) = parse_updated_at(raw) else {
        tracing::debug!("ignoring unparseable updated_at {raw:?}");
        return None;
    };
    Some(format_for_viewer(at, viewer_zone()))
}

/// The label text. Keeps whatever it showed last when given nothing usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastUpdated {
    text: Option<String>,
}

impl LastUpdated {
    pub fn update(&mut self, meta: Option<&Metadata>) {
        if let Some(text) = format_last_updated(meta) {
            self.text = Some(text);
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(updated_at: Option<&str>) -> Metadata {
        Metadata {
            updated_at: updated_at.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_rfc3339_with_offset_and_fraction() {
        let at = parse_updated_at("2024-05-01T12:30:00.123456+02:00").unwrap();
        assert_eq!(at.to_rfc3339(), "2024-05-01T10:30:00.123456+00:00");
    }

    #[test]
    fn test_parse_date_only_is_utc_midnight() {
        let at = parse_updated_at("2024-05-01").unwrap();
        assert_eq!(at.to_rfc3339(), "2024-05-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_without_offset_is_local() {
        let at = parse_updated_at("2024-05-01T12:30:00").unwrap();
        let local = at.with_timezone(&Local);
        assert_eq!(local.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-05-01 12:30:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_updated_at("not-a-date"), None);
        assert_eq!(parse_updated_at(""), None);
        assert_eq!(parse_updated_at("2024-13-45"), None);
    }

    #[test]
    fn test_format_has_date_time_and_zone() {
        let at = parse_updated_at("2024-05-01T10:00:00Z").unwrap();
        assert_eq!(format_in(at, &Utc), "Last updated: May 01, 2024, 10:00:00 UTC");
    }

    #[test]
    fn test_named_zone_shows_abbreviation() {
        let at = parse_updated_at("2024-05-01T10:00:00.123456+02:00").unwrap();
        let paris = zone_named("Europe/Paris");
        assert_eq!(
            format_for_viewer(at, paris),
            "Last updated: May 01, 2024, 10:00:00 CEST"
        );

        let winter = parse_updated_at("2024-01-15T18:00:00Z").unwrap();
        assert_eq!(
            format_in(winter, &chrono_tz::America::Los_Angeles),
            "Last updated: Jan 15, 2024, 10:00:00 PST"
        );
    }

    #[test]
    fn test_unknown_zone_falls_back_to_local_offset() {
        let at = parse_updated_at("2024-05-01T10:00:00Z").unwrap();
        assert_eq!(format_for_viewer(at, None), format_in(at, &Local));
    }

    #[test]
    fn test_zone_named_accepts_tz_forms() {
        assert_eq!(zone_named("Europe/Paris"), Some(chrono_tz::Europe::Paris));
        assert_eq!(zone_named(":Europe/Paris"), Some(chrono_tz::Europe::Paris));
        assert_eq!(
            zone_named("/usr/share/zoneinfo/Asia/Tokyo"),
            Some(chrono_tz::Asia::Tokyo)
        );
        assert_eq!(zone_named("Mars/Olympus_Mons"), None);
        assert_eq!(zone_named(""), None);
    }

    #[test]
    fn test_malformed_timestamp_leaves_label_unset() {
        let mut label = LastUpdated::default();
        label.update(Some(&meta(Some("not-a-date"))));
        assert_eq!(label.text(), None);
    }

    #[test]
    fn test_missing_metadata_keeps_previous_text() {
        let mut label = LastUpdated::default();
        label.update(Some(&meta(Some("2024-05-01T10:00:00Z"))));
        let before = label.text().map(str::to_string);
        assert!(before.as_deref().unwrap().starts_with("Last updated: "));

        label.update(None);
        label.update(Some(&meta(None)));
        label.update(Some(&meta(Some("not-a-date"))));
        assert_eq!(label.text().map(str::to_string), before);
    }
}
