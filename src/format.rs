//! Display helpers for durations, view counts and YouTube links.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// `PT#H#M#S` with every part optional, in that order
static ISO8601_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("duration pattern is valid")
});

/// Parses an ISO-8601 duration as returned by the YouTube API (`PT1H2M10S`) into seconds.
///
/// Only the hour/minute/second designators are understood; anything else,
/// including totals that overflow `u64`, yields `None`.
pub fn parse_iso8601_duration(iso: &str) -> Option<u64> {
    let captures = ISO8601_DURATION.captures(iso.trim())?;

    let part = |idx: usize| -> Option<u64> {
        match captures.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    part(1)?
        .checked_mul(3600)?
        .checked_add(part(2)?.checked_mul(60)?)?
        .checked_add(part(3)?)
}

/// Formats seconds as `h:mm:ss` when at least an hour long, otherwise `m:ss`.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Parses a display duration (`10:25`, `1:02:10`) back into seconds.
pub fn parse_clock_duration(clock: &str) -> Option<u64> {
    let parts: Vec<&str> = clock.trim().split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    parts.iter().try_fold(0u64, |acc, part| {
        let value: u64 = part.parse().ok()?;
        Some(acc * 60 + value)
    })
}

/// Compact view count: `1234567` -> `1.2M`, `1234` -> `1.2K`.
pub fn format_view_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

fn is_youtube_host(host: &str) -> bool {
    matches!(host, "youtube.com" | "www.youtube.com" | "m.youtube.com" | "youtu.be")
}

fn parse_link(link: &str) -> Option<Url> {
    let link = link.trim();
    let parsed = if link.starts_with("http://") || link.starts_with("https://") {
        Url::parse(link)
    } else {
        Url::parse(&format!("https://{}", link))
    };
    parsed.ok()
}

/// Whether the link points at youtube.com or youtu.be with a non-empty path.
pub fn is_valid_youtube_url(link: &str) -> bool {
    parse_link(link)
        .map(|url| {
            url.host_str().is_some_and(is_youtube_host) && url.path().len() > 1
        })
        .unwrap_or(false)
}

/// Extracts the 11-character video id from watch, embed, `v/` and short links.
pub fn extract_video_id(link: &str) -> Option<String> {
    let url = parse_link(link)?;
    let host = url.host_str()?;
    if !is_youtube_host(host) {
        return None;
    }

    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();

    let candidate = if host == "youtu.be" {
        segments.first().map(|s| s.to_string())
    } else if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
        Some(v.into_owned())
    } else {
        match segments.as_slice() {
            ["embed", id, ..] | ["v", id, ..] | ["e", id, ..] | ["shorts", id, ..] => {
                Some(id.to_string())
            }
            _ => None,
        }
    }?;

    let id: String = candidate.chars().take(11).collect();
    let valid = id.chars().count() == 11
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    valid.then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso8601_duration() {
        assert_eq!(parse_iso8601_duration("PT1H2M10S"), Some(3730));
        assert_eq!(parse_iso8601_duration("PT10M25S"), Some(625));
        assert_eq!(parse_iso8601_duration("PT45S"), Some(45));
        assert_eq!(parse_iso8601_duration("PT2H"), Some(7200));
        assert_eq!(parse_iso8601_duration("P1D"), None);
        assert_eq!(parse_iso8601_duration("garbage"), None);
    }

    #[test]
    fn test_parse_iso8601_duration_rejects_malformed() {
        assert_eq!(parse_iso8601_duration("PT1H1H"), None);
        assert_eq!(parse_iso8601_duration("PT5S3M"), None);
        assert_eq!(parse_iso8601_duration("PT10"), None);
        assert_eq!(parse_iso8601_duration("xPT10S"), None);
    }

    #[test]
    fn test_parse_iso8601_duration_overflow_is_none() {
        assert_eq!(parse_iso8601_duration("PT9999999999999999H"), None);
        assert_eq!(parse_iso8601_duration("PT99999999999999999999S"), None);
        assert_eq!(
            parse_iso8601_duration(&format!("PT{}M", u64::MAX / 60 + 1)),
            None
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(3730), "1:02:10");
        assert_eq!(format_duration(625), "10:25");
        assert_eq!(format_duration(5), "0:05");
    }

    #[test]
    fn test_parse_clock_duration() {
        assert_eq!(parse_clock_duration("10:25"), Some(625));
        assert_eq!(parse_clock_duration("1:02:10"), Some(3730));
        assert_eq!(parse_clock_duration("N/A"), None);
        assert_eq!(parse_clock_duration("42"), None);
    }

    #[test]
    fn test_format_view_count() {
        assert_eq!(format_view_count(1_234_567), "1.2M");
        assert_eq!(format_view_count(1_234), "1.2K");
        assert_eq!(format_view_count(999), "999");
    }

    #[test]
    fn test_youtube_links() {
        assert!(is_valid_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_valid_youtube_url("youtu.be/dQw4w9WgXcQ"));
        assert!(!is_valid_youtube_url("https://vimeo.com/123"));

        let expected = Some("dQw4w9WgXcQ".to_string());
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10"), expected);
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ"), expected);
        assert_eq!(extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"), expected);
        assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=short"), None);
    }
}
