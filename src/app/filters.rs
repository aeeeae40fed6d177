// src/app/filters.rs
use std::cmp::Ordering;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::data::{Catalog, CatalogKind};

static FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})").expect("static regex"));
static YEAR_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})-(\d{4})").expect("static regex"));

/// Human size string → MB-equivalent number. `"1.5 GB"` → 1536, `"2 TB"` → 2097152.
/// Any other unit (or none) keeps the raw number; unparsable input is 0.
/// Only the leading number of the first token counts, so `"1.5GB"` is 1.5.
pub fn parse_size(size_human: &str) -> f64 {
    let mut parts = size_human.split_whitespace();
    let value = parts.next().and_then(leading_number).unwrap_or(0.0);
    match parts.next() {
        Some("GB") => value * 1024.0,
        Some("TB") => value * 1024.0 * 1024.0,
        _ => value,
    }
}

fn leading_number(token: &str) -> Option<f64> {
    (1..=token.len())
        .rev()
        .filter(|&end| token.is_char_boundary(end))
        .find_map(|end| token[..end].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// First 4-digit run in a year range (`"1998-2004"` → 1998); 0 when absent.
pub fn parse_year_range(year_range: &str) -> i32 {
    FOUR_DIGITS
        .captures(year_range)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Collapses `"2019-2019"` to `"2019"`; anything else is shown as-is.
pub fn format_year_range(year_range: &str) -> String {
    if let Some(c) = YEAR_SPAN.captures(year_range) {
        if c[1] == c[2] {
            return c[1].to_string();
        }
    }
    year_range.to_string()
}

/// Base letters only: accents stripped (NFD minus combining marks), case folded.
fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Accent- and case-insensitive ordering, so "Élite" sorts among the E's and
/// "alien" sits next to "Alien". Ties fall back to the case-folded text, then
/// the raw text.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

// ---- sort controls ----
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Artist,
    Size,
    Date,
}

impl SortKey {
    pub const fn options(kind: CatalogKind) -> [Self; 3] {
        match kind {
            CatalogKind::Movies | CatalogKind::TvShows => [Self::Title, Self::Size, Self::Date],
            CatalogKind::Music => [Self::Artist, Self::Size, Self::Date],
        }
    }

    pub const fn default_for(kind: CatalogKind) -> Self {
        Self::options(kind)[0]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Artist => "artist",
            Self::Size => "size",
            Self::Date => "date",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "artist" => Some(Self::Artist),
            "size" => Some(Self::Size),
            "date" => Some(Self::Date),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Artist => "Artist",
            Self::Size => "Size",
            Self::Date => "Date",
        }
    }

    pub const fn arrow(self, direction: Direction) -> &'static str {
        let asc = matches!(direction, Direction::Ascending);
        match self {
            Self::Title | Self::Artist => {
                if asc {
                    "A→Z"
                } else {
                    "Z→A"
                }
            }
            Self::Size => {
                if asc {
                    "S→L"
                } else {
                    "L→S"
                }
            }
            Self::Date => {
                if asc {
                    "O→N"
                } else {
                    "N→O"
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    const fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Ascending => ord,
            Self::Descending => ord.reverse(),
        }
    }
}

/// Sort + search state for one catalog view. Owned by the view, never global.
#[derive(Clone, Debug)]
pub struct ViewState {
    pub kind: CatalogKind,
    pub key: SortKey,
    pub direction: Direction,
    pub query: String,
}

impl ViewState {
    pub fn new(kind: CatalogKind) -> Self {
        Self {
            kind,
            key: SortKey::default_for(kind),
            direction: Direction::Ascending,
            query: String::new(),
        }
    }

    /// Same key flips direction; a different key starts ascending.
    pub fn select_key(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = Direction::Ascending;
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }

    /// Filtered, then sorted, indices into `catalog`. The catalog itself is untouched.
    pub fn derive(&self, catalog: &Catalog) -> Vec<usize> {
        let needle = self.query.to_lowercase();
        let mut out: Vec<usize> = (0..catalog.len())
            .filter(|&i| {
                needle.is_empty() || catalog.primary_name(i).to_lowercase().contains(&needle)
            })
            .collect();
        match self.key {
            SortKey::Title | SortKey::Artist => {
                out.sort_by(|&a, &b| {
                    self.direction
                        .apply(locale_cmp(catalog.primary_name(a), catalog.primary_name(b)))
                });
            }
            SortKey::Size => {
                // parse once per item, not per comparison
                let mut keyed: Vec<(usize, f64)> = out
                    .iter()
                    .map(|&i| (i, parse_size(catalog.size_human(i))))
                    .collect();
                keyed.sort_by(|(_, a), (_, b)| {
                    self.direction.apply(a.partial_cmp(b).unwrap_or(Ordering::Equal))
                });
                out = keyed.into_iter().map(|(i, _)| i).collect();
            }
            SortKey::Date => {
                out.sort_by(|&a, &b| {
                    self.direction
                        .apply(catalog.date_key(a).cmp(&catalog.date_key(b)))
                });
            }
        }
        out
    }
}

/// Coalesces bursts of edits: `fire` reports true once the input has been
/// quiet for `delay`.
#[derive(Clone, Debug)]
pub struct Debouncer {
    delay: Duration,
    pending_since: Option<Instant>,
}

impl Debouncer {
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_since: None,
        }
    }

    pub fn touch(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    pub const fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending_since
            .map(|since| self.delay.saturating_sub(now.saturating_duration_since(since)))
    }

    pub fn fire(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(since) if now.saturating_duration_since(since) >= self.delay => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.pending_since = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::data::{Movie, MoviesSnapshot, Show, ShowsSnapshot};

    fn movies(rows: &[(&str, Option<i32>, &str)]) -> Catalog {
        Catalog::Movies(MoviesSnapshot {
            metadata: Default::default(),
            movies: rows
                .iter()
                .map(|(t, y, s)| Movie {
                    title: (*t).into(),
                    year: *y,
                    size_human: (*s).into(),
                    ..Default::default()
                })
                .collect(),
        })
    }

    fn titles(cat: &Catalog, idx: &[usize]) -> Vec<String> {
        idx.iter().map(|&i| cat.primary_name(i).to_string()).collect()
    }

    #[test]
    fn size_strings_parse_to_mb_baseline() {
        assert_eq!(parse_size("1.5 GB"), 1536.0);
        assert_eq!(parse_size("2 TB"), 2_097_152.0);
        assert_eq!(parse_size("500 MB"), 500.0);
        assert_eq!(parse_size("700"), 700.0);
        assert_eq!(parse_size(""), 0.0);
        assert_eq!(parse_size("n/a GB"), 0.0);
        assert_eq!(parse_size("1.5GB"), 1.5);
        assert_eq!(parse_size("42MB extra"), 42.0);
    }

    #[test]
    fn year_ranges_take_first_four_digit_run() {
        assert_eq!(parse_year_range("1998-2004"), 1998);
        assert_eq!(parse_year_range("c. 2011"), 2011);
        assert_eq!(parse_year_range("Unknown"), 0);
        assert_eq!(parse_year_range(""), 0);
        assert_eq!(format_year_range("2019-2019"), "2019");
        assert_eq!(format_year_range("2017-2020"), "2017-2020");
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let cat = movies(&[("The Dark Knight", Some(2008), "8 GB"), ("Up", Some(2009), "2 GB")]);
        let mut view = ViewState::new(CatalogKind::Movies);
        view.set_query("dark");
        assert_eq!(titles(&cat, &view.derive(&cat)), vec!["The Dark Knight"]);
        view.set_query("DARK");
        assert_eq!(view.derive(&cat).len(), 1);
    }

    #[test]
    fn same_key_flips_new_key_resets() {
        let mut view = ViewState::new(CatalogKind::Movies);
        assert_eq!(view.key, SortKey::Title);
        view.select_key(SortKey::Title);
        assert_eq!(view.direction, Direction::Descending);
        view.select_key(SortKey::Size);
        assert_eq!((view.key, view.direction), (SortKey::Size, Direction::Ascending));
        assert_eq!(ViewState::new(CatalogKind::Music).key, SortKey::Artist);
    }

    #[test]
    fn toggling_twice_restores_order_for_every_key() {
        let cat = movies(&[
            ("Heat", Some(1995), "9 GB"),
            ("alien", None, "700 MB"),
            ("Alien", Some(1979), "1.1 TB"),
            ("Brazil", Some(1985), "9 GB"),
        ]);
        for key in SortKey::options(CatalogKind::Movies) {
            let mut view = ViewState::new(CatalogKind::Movies);
            view.select_key(key);
            if view.direction == Direction::Descending {
                view.select_key(key);
            }
            let before = view.derive(&cat);
            view.select_key(key);
            view.select_key(key);
            assert_eq!(view.derive(&cat), before, "key {key:?}");
        }
    }

    #[test]
    fn accented_titles_sort_with_their_letter() {
        let cat = movies(&[
            ("Zodiac", None, ""),
            ("Élite", None, ""),
            ("Fargo", None, ""),
            ("Amélie", None, ""),
            ("Brazil", None, ""),
            ("elite", None, ""),
        ]);
        let view = ViewState::new(CatalogKind::Movies);
        assert_eq!(
            titles(&cat, &view.derive(&cat)),
            vec!["Amélie", "Brazil", "elite", "Élite", "Fargo", "Zodiac"]
        );
    }

    #[test]
    fn missing_years_sort_first_ascending() {
        let cat = Catalog::TvShows(ShowsSnapshot {
            metadata: Default::default(),
            shows: vec![
                Show { title: "B".into(), show_year_range: "2005-2010".into(), ..Default::default() },
                Show { title: "A".into(), show_year_range: "".into(), ..Default::default() },
                Show { title: "C".into(), show_year_range: "1998-2004".into(), ..Default::default() },
            ],
        });
        let mut view = ViewState::new(CatalogKind::TvShows);
        view.select_key(SortKey::Date);
        assert_eq!(titles(&cat, &view.derive(&cat)), vec!["A", "C", "B"]);
        view.select_key(SortKey::Date);
        assert_eq!(titles(&cat, &view.derive(&cat)), vec!["B", "C", "A"]);
    }

    #[test]
    fn size_sort_uses_parsed_units() {
        let cat = movies(&[("a", None, "1 TB"), ("b", None, "900 MB"), ("c", None, "1.5 GB")]);
        let mut view = ViewState::new(CatalogKind::Movies);
        view.select_key(SortKey::Size);
        assert_eq!(titles(&cat, &view.derive(&cat)), vec!["b", "c", "a"]);
    }

    #[test]
    fn filter_then_sort_then_toggle_scenario() {
        let cat = movies(&[("Dune", None, ""), ("Cobra", None, ""), ("Abba", None, "")]);
        let mut view = ViewState::new(CatalogKind::Movies);
        assert_eq!(titles(&cat, &view.derive(&cat)), vec!["Abba", "Cobra", "Dune"]);

        view.set_query("b");
        assert_eq!(titles(&cat, &view.derive(&cat)), vec!["Abba", "Cobra"]);

        view.select_key(SortKey::Title);
        assert_eq!(view.direction, Direction::Descending);
        assert_eq!(titles(&cat, &view.derive(&cat)), vec!["Cobra", "Abba"]);
        assert_eq!(view.query, "b");
        assert_eq!(cat.primary_name(0), "Dune");
    }

    #[test]
    fn debouncer_coalesces_bursts() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.touch(t0);
        d.touch(t0 + Duration::from_millis(200));
        assert!(!d.fire(t0 + Duration::from_millis(400)));
        assert!(d.fire(t0 + Duration::from_millis(500)));
        assert!(!d.fire(t0 + Duration::from_millis(900)));
        assert!(!d.is_pending());
    }
}
