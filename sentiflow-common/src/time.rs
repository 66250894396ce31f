//! Timestamp utilities
//!
//! Source dates arrive as `"<weekday> <month> <day> <HH:MM:SS> <tz> <year>"`,
//! e.g. `Mon May 11 03:17:40 UTC 2009`. Parsing is deliberately lossy: any
//! malformed input yields the current time instead of an error, so callers
//! must not assume the output reflects the true input time.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rand::Rng;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Maximum look-back of the timestamp simulator, in days
pub const SIMULATION_WINDOW_DAYS: i64 = 7;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp as ISO-8601 (RFC 3339, second precision, `Z` suffix)
pub fn to_iso8601(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time as ISO-8601
pub fn now_iso8601() -> String {
    to_iso8601(now())
}

/// UTC offset in hours for the zone abbreviations found in the dataset
fn zone_offset_hours(abbrev: &str) -> Option<i32> {
    match abbrev {
        "UTC" | "GMT" | "Z" => Some(0),
        "EST" => Some(-5),
        "EDT" => Some(-4),
        "CST" => Some(-6),
        "CDT" => Some(-5),
        "MST" => Some(-7),
        "MDT" => Some(-6),
        "PST" => Some(-8),
        "PDT" => Some(-7),
        _ => None,
    }
}

/// Parse a source date, returning `None` on any malformed token
///
/// The weekday token must be a valid abbreviation but is not checked against
/// the calendar date.
pub fn try_parse_source_date(raw: &str) -> Option<DateTime<Utc>> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let [weekday, month, day, clock, zone, year] = tokens.as_slice() else {
        return None;
    };

    if !WEEKDAYS.contains(weekday) {
        return None;
    }

    let offset_secs = zone_offset_hours(zone)? * 3600;
    let offset = FixedOffset::east_opt(offset_secs)?;

    let naive = NaiveDateTime::parse_from_str(
        &format!("{} {} {} {}", month, day, clock, year),
        "%b %d %H:%M:%S %Y",
    )
    .ok()?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a source date into ISO-8601, falling back to the current time
pub fn parse_source_date(raw: &str) -> String {
    match try_parse_source_date(raw) {
        Some(dt) => to_iso8601(dt),
        None => {
            tracing::debug!(raw_date = raw, "Unparseable source date, using current time");
            now_iso8601()
        }
    }
}

/// Produce `now` minus a random offset of up to 7 days, 23 hours and 59 minutes
///
/// Days, hours and minutes are drawn independently and uniformly from
/// [0,7], [0,23] and [0,59].
pub fn simulate_recent_timestamp<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> DateTime<Utc> {
    let days = rng.gen_range(0..=SIMULATION_WINDOW_DAYS);
    let hours = rng.gen_range(0..=23);
    let minutes = rng.gen_range(0..=59);

    now - (Duration::days(days) + Duration::hours(hours) + Duration::minutes(minutes))
}

/// Simulated recent timestamp relative to the current time, as ISO-8601
pub fn simulate_recent_iso8601<R: Rng + ?Sized>(rng: &mut R) -> String {
    to_iso8601(simulate_recent_timestamp(rng, now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_utc_date() {
        let parsed = try_parse_source_date("Mon May 11 03:17:40 UTC 2009").unwrap();
        assert_eq!(to_iso8601(parsed), "2009-05-11T03:17:40Z");
        assert_eq!(parse_source_date("Mon May 11 03:17:40 UTC 2009"), "2009-05-11T03:17:40Z");
    }

    #[test]
    fn test_parse_pacific_daylight_converts_to_utc() {
        let parsed = try_parse_source_date("Mon Apr 06 22:19:45 PDT 2009").unwrap();
        assert_eq!(to_iso8601(parsed), "2009-04-07T05:19:45Z");
    }

    #[test]
    fn test_weekday_not_cross_checked() {
        // 2009-05-11 was a Monday; a mismatched but valid weekday still parses
        assert!(try_parse_source_date("Fri May 11 03:17:40 UTC 2009").is_some());
    }

    #[test]
    fn test_malformed_inputs_rejected() {
        for raw in [
            "",
            "Mon May 11 03:17:40 2009",
            "Xyz May 11 03:17:40 UTC 2009",
            "Mon Foo 11 03:17:40 UTC 2009",
            "Mon May 11 03:17:40 ABC 2009",
            "Mon May 32 03:17:40 UTC 2009",
            "Mon May 11 25:17:40 UTC 2009",
            "Mon May 11 03:17:40 UTC 2009 extra",
        ] {
            assert!(try_parse_source_date(raw).is_none(), "should reject {:?}", raw);
        }
    }

    #[test]
    fn test_malformed_falls_back_to_now() {
        let before = now() - Duration::seconds(1);
        let fallback = parse_source_date("not a date");
        let parsed = DateTime::parse_from_rfc3339(&fallback).unwrap().with_timezone(&Utc);
        assert!(parsed >= before);
        assert!(parsed <= now() + Duration::seconds(1));
    }

    #[test]
    fn test_simulated_timestamp_within_window() {
        let mut rng = StdRng::seed_from_u64(7);
        let reference = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let earliest = reference - (Duration::days(7) + Duration::hours(23) + Duration::minutes(59));

        for _ in 0..1000 {
            let ts = simulate_recent_timestamp(&mut rng, reference);
            assert!(ts <= reference);
            assert!(ts >= earliest);
        }
    }

    #[test]
    fn test_simulated_timestamp_reproducible_with_seed() {
        let reference = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            assert_eq!(
                simulate_recent_timestamp(&mut a, reference),
                simulate_recent_timestamp(&mut b, reference)
            );
        }
    }

    #[test]
    fn test_iso8601_format() {
        let dt = Utc.with_ymd_and_hms(2009, 5, 11, 3, 17, 40).unwrap();
        assert_eq!(to_iso8601(dt), "2009-05-11T03:17:40Z");
    }
}
