// src/app/utils.rs
use chrono::{Local, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::{SystemTime, UNIX_EPOCH};

use super::data::CatalogKind;
use crate::config::is_http;

static RES_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)([pi])").expect("static regex"));

/// `1234567` -> `1,234,567` (en-US grouping).
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `sd`/`hd` upper-cased; `1080P` -> `1080p`; anything else untouched.
pub fn format_resolution(res: &str) -> String {
    let lower = res.to_ascii_lowercase();
    if lower == "sd" || lower == "hd" {
        return res.to_ascii_uppercase();
    }
    RES_SUFFIX
        .replace_all(res, |caps: &regex::Captures| {
            format!("{}{}", &caps[1], caps[2].to_ascii_lowercase())
        })
        .into_owned()
}

/// Comma-separated exporter field, trimmed, empties dropped.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Hard break every `width` characters.
pub fn wrap_text(text: &str, width: usize) -> String {
    let width = width.max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= width {
        return text.to_string();
    }
    chars
        .chunks(width)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Milliseconds since epoch, rendered in local time.
pub fn format_timestamp(ms: i64) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "—".into())
}

/// `<base>/<category>_image/<rating_key>.thumb.webp`
pub fn image_source(image_base: &str, kind: CatalogKind, rating_key: &str) -> Option<String> {
    let key = rating_key.trim();
    if key.is_empty() {
        return None;
    }
    let base = image_base.trim().trim_end_matches('/');
    let file = if is_http(base) {
        urlencoding::encode(key).into_owned()
    } else {
        key.to_string()
    };
    Some(format!(
        "{base}/{}_image/{file}.thumb.webp",
        kind.image_category()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn resolutions() {
        assert_eq!(format_resolution("sd"), "SD");
        assert_eq!(format_resolution("Hd"), "HD");
        assert_eq!(format_resolution("1080P"), "1080p");
        assert_eq!(format_resolution("480I"), "480i");
        assert_eq!(format_resolution("4k"), "4k");
    }

    #[test]
    fn wraps_every_n_chars() {
        assert_eq!(wrap_text("short", 20), "short");
        assert_eq!(
            wrap_text("abcdefghijklmnopqrstuvwxyz", 20),
            "abcdefghijklmnopqrst\nuvwxyz"
        );
        assert_eq!(wrap_text(&"x".repeat(40), 20).lines().count(), 2);
    }

    #[test]
    fn image_paths() {
        assert_eq!(
            image_source("assets/images/", CatalogKind::TvShows, "42").as_deref(),
            Some("assets/images/tv_image/42.thumb.webp")
        );
        assert_eq!(
            image_source("https://cdn.example.org/img", CatalogKind::Music, "a b").as_deref(),
            Some("https://cdn.example.org/img/music_image/a%20b.thumb.webp")
        );
        assert_eq!(image_source("x", CatalogKind::Movies, " "), None);
    }

    #[test]
    fn splits_lists() {
        assert_eq!(split_list("h264, hevc,,"), vec!["h264", "hevc"]);
    }
}
