// src/app/data.rs
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::filters::parse_year_range;

/// Accepts a string, number, bool or null; everything renders as display text.
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

fn lenient_year<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    })
}

fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_u64().unwrap_or_default(),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or_default(),
        _ => 0,
    })
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn lenient_string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
        _ => Vec::new(),
    })
}

// ---------- movies ----------
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Movie {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_year")]
    pub year: Option<i32>,
    #[serde(deserialize_with = "lenient_string")]
    pub rating_key: String,
    #[serde(deserialize_with = "lenient_string")]
    pub content_rating: String,
    #[serde(deserialize_with = "lenient_string")]
    pub duration_human: String,
    #[serde(deserialize_with = "lenient_string")]
    pub video_codec: String,
    #[serde(deserialize_with = "lenient_string")]
    pub audio_codec: String,
    #[serde(deserialize_with = "lenient_string")]
    pub container: String,
    #[serde(deserialize_with = "lenient_string")]
    pub video_resolution: String,
    #[serde(deserialize_with = "lenient_string")]
    pub size_human: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoviesMeta {
    #[serde(deserialize_with = "lenient_u64")]
    pub total_movies: u64,
    #[serde(deserialize_with = "lenient_string")]
    pub total_size_human: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MoviesSnapshot {
    pub metadata: MoviesMeta,
    pub movies: Vec<Movie>,
}

// ---------- tv shows ----------
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Season {
    #[serde(deserialize_with = "lenient_string")]
    pub season_number: String,
    #[serde(deserialize_with = "lenient_string")]
    pub season_rating_key: String,
    #[serde(deserialize_with = "lenient_string")]
    pub year_range: String,
    #[serde(deserialize_with = "lenient_string")]
    pub season_total_episode: String,
    #[serde(deserialize_with = "lenient_string")]
    pub avg_season_episode_duration: String,
    #[serde(deserialize_with = "lenient_string")]
    pub avg_season_video_codec: String,
    #[serde(deserialize_with = "lenient_string")]
    pub avg_season_container: String,
    #[serde(deserialize_with = "lenient_string")]
    pub avg_season_video_resolution: String,
    #[serde(deserialize_with = "lenient_string")]
    pub season_size_human: String,
}

impl Season {
    pub fn display_title(&self) -> String {
        let n = self.season_number.trim();
        if n.is_empty() || n.parse::<f64>().map(|v| v == 0.0).unwrap_or(false) {
            "Specials".into()
        } else {
            format!("Season {n}")
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Show {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub show_year_range: String,
    #[serde(deserialize_with = "lenient_string")]
    pub rating_key: String,
    #[serde(deserialize_with = "lenient_string")]
    pub content_rating: String,
    #[serde(deserialize_with = "lenient_string")]
    pub season_count: String,
    #[serde(deserialize_with = "lenient_string")]
    pub show_total_episode: String,
    #[serde(deserialize_with = "lenient_string")]
    pub avg_episode_duration: String,
    #[serde(deserialize_with = "lenient_string")]
    pub avg_video_resolutions: String,
    #[serde(deserialize_with = "lenient_string")]
    pub avg_video_codecs: String,
    #[serde(deserialize_with = "lenient_string")]
    pub avg_containers: String,
    #[serde(deserialize_with = "lenient_string")]
    pub show_size_human: String,
    #[serde(deserialize_with = "null_as_default")]
    pub seasons: Vec<Season>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShowsMeta {
    #[serde(rename = "totalShow", deserialize_with = "lenient_u64")]
    pub total_show: u64,
    #[serde(rename = "totalSeasonCount", deserialize_with = "lenient_u64")]
    pub total_season_count: u64,
    // the exporter really does capitalise this one
    #[serde(rename = "TotalEpisode", alias = "totalEpisode", deserialize_with = "lenient_u64")]
    pub total_episode: u64,
    #[serde(rename = "totalSizeHuman", deserialize_with = "lenient_string")]
    pub total_size_human: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShowsSnapshot {
    pub metadata: ShowsMeta,
    pub shows: Vec<Show>,
}

// ---------- music ----------
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Album {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub rating_key: String,
    #[serde(deserialize_with = "lenient_year")]
    pub year: Option<i32>,
    #[serde(deserialize_with = "lenient_string")]
    pub tracks: String,
    #[serde(deserialize_with = "lenient_string")]
    pub album_duration_human: String,
    #[serde(deserialize_with = "lenient_string_list")]
    pub album_containers: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub album_size_human: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Artist {
    #[serde(deserialize_with = "lenient_string")]
    pub artist_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub rating_key: String,
    #[serde(deserialize_with = "lenient_string")]
    pub year_range: String,
    #[serde(deserialize_with = "lenient_string")]
    pub total_albums: String,
    #[serde(deserialize_with = "lenient_string")]
    pub total_tracks: String,
    #[serde(deserialize_with = "lenient_string")]
    pub total_size_human: String,
    #[serde(deserialize_with = "null_as_default")]
    pub albums: Vec<Album>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MusicMeta {
    #[serde(deserialize_with = "lenient_u64")]
    pub total_artists: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub total_albums: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub total_tracks: u64,
    #[serde(deserialize_with = "lenient_string")]
    pub total_size_human: String,
    #[serde(deserialize_with = "lenient_string")]
    pub total_duration_human: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MusicSnapshot {
    pub metadata: MusicMeta,
    pub artists: Vec<Artist>,
}

// ---------- the three catalogs behind one face ----------
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CatalogKind {
    Movies,
    TvShows,
    Music,
}

impl CatalogKind {
    pub const ALL: [Self; 3] = [Self::Movies, Self::TvShows, Self::Music];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movies => "movies",
            Self::TvShows => "tvshows",
            Self::Music => "music",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "movies" => Some(Self::Movies),
            "tvshows" => Some(Self::TvShows),
            "music" => Some(Self::Music),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Movies => "Movies",
            Self::TvShows => "TV Shows",
            Self::Music => "Music",
        }
    }

    pub fn snapshot_file(self) -> String {
        format!("{}_ref.json", self.as_str())
    }

    /// Folder prefix under the image base: `<prefix>_image/`.
    pub const fn image_category(self) -> &'static str {
        match self {
            Self::Movies => "movie",
            Self::TvShows => "tv",
            Self::Music => "music",
        }
    }

    /// Fixed card footprint so placeholders and cards occupy the same rect.
    pub const fn card_height(self) -> f32 {
        match self {
            Self::Movies => 262.5,
            Self::TvShows | Self::Music => 217.5,
        }
    }

    pub const fn search_hint(self) -> &'static str {
        match self {
            Self::Movies | Self::TvShows => "Search titles…",
            Self::Music => "Search artists…",
        }
    }
}

#[derive(Clone, Debug)]
pub enum Catalog {
    Movies(MoviesSnapshot),
    TvShows(ShowsSnapshot),
    Music(MusicSnapshot),
}

impl Catalog {
    pub fn parse(kind: CatalogKind, bytes: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            CatalogKind::Movies => Self::Movies(serde_json::from_slice(bytes)?),
            CatalogKind::TvShows => Self::TvShows(serde_json::from_slice(bytes)?),
            CatalogKind::Music => Self::Music(serde_json::from_slice(bytes)?),
        })
    }

    pub const fn kind(&self) -> CatalogKind {
        match self {
            Self::Movies(_) => CatalogKind::Movies,
            Self::TvShows(_) => CatalogKind::TvShows,
            Self::Music(_) => CatalogKind::Music,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Movies(s) => s.movies.len(),
            Self::TvShows(s) => s.shows.len(),
            Self::Music(s) => s.artists.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The field search matches against (title / title / artist name).
    pub fn primary_name(&self, idx: usize) -> &str {
        match self {
            Self::Movies(s) => s.movies.get(idx).map_or("", |m| m.title.as_str()),
            Self::TvShows(s) => s.shows.get(idx).map_or("", |m| m.title.as_str()),
            Self::Music(s) => s.artists.get(idx).map_or("", |a| a.artist_name.as_str()),
        }
    }

    pub fn size_human(&self, idx: usize) -> &str {
        match self {
            Self::Movies(s) => s.movies.get(idx).map_or("", |m| m.size_human.as_str()),
            Self::TvShows(s) => s.shows.get(idx).map_or("", |m| m.show_size_human.as_str()),
            Self::Music(s) => s.artists.get(idx).map_or("", |a| a.total_size_human.as_str()),
        }
    }

    /// Sortable year; 0 when the record has none.
    pub fn date_key(&self, idx: usize) -> i32 {
        match self {
            Self::Movies(s) => s.movies.get(idx).and_then(|m| m.year).unwrap_or(0),
            Self::TvShows(s) => s
                .shows
                .get(idx)
                .map_or(0, |m| parse_year_range(&m.show_year_range)),
            Self::Music(s) => s
                .artists
                .get(idx)
                .map_or(0, |a| parse_year_range(&a.year_range)),
        }
    }

    pub fn rating_key(&self, idx: usize) -> &str {
        match self {
            Self::Movies(s) => s.movies.get(idx).map_or("", |m| m.rating_key.as_str()),
            Self::TvShows(s) => s.shows.get(idx).map_or("", |m| m.rating_key.as_str()),
            Self::Music(s) => s.artists.get(idx).map_or("", |a| a.rating_key.as_str()),
        }
    }

    /// Whether a card opens a detail overlay (shows and artists have children).
    pub const fn has_children(&self) -> bool {
        !matches!(self, Self::Movies(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exporter_shapes_with_gaps() {
        let raw = br#"{
            "metadata": { "totalShow": 2, "totalSeasonCount": "3", "TotalEpisode": 30,
                          "totalSizeHuman": "1.20 TB" },
            "shows": [
                { "title": "Dark", "showYearRange": "2017-2020", "ratingKey": 101,
                  "seasonCount": 3, "seasons": [
                    { "seasonNumber": 0, "seasonRatingKey": "s0", "yearRange": null },
                    { "seasonNumber": "2", "seasonRatingKey": "s2", "yearRange": "2019-2019" }
                  ] },
                { "title": null }
            ]
        }"#;
        let cat = Catalog::parse(CatalogKind::TvShows, raw).unwrap();
        let Catalog::TvShows(snap) = &cat else {
            panic!("wrong kind");
        };
        assert_eq!(snap.metadata.total_season_count, 3);
        assert_eq!(snap.metadata.total_episode, 30);
        assert_eq!(snap.shows[0].rating_key, "101");
        assert_eq!(snap.shows[0].season_count, "3");
        assert_eq!(snap.shows[0].seasons[0].display_title(), "Specials");
        assert_eq!(snap.shows[0].seasons[1].display_title(), "Season 2");
        assert_eq!(snap.shows[1].title, "");
        assert!(snap.shows[1].seasons.is_empty());
        assert_eq!(cat.date_key(0), 2017);
        assert_eq!(cat.date_key(1), 0);
    }

    #[test]
    fn album_containers_accept_list_or_csv() {
        let raw = br#"{ "artists": [ { "artistName": "Bjork", "albums": [
            { "title": "Post", "year": 1995, "albumContainers": ["flac", "mp3"] },
            { "title": "Debut", "year": null, "albumContainers": "flac, m4a" }
        ] } ] }"#;
        let Catalog::Music(snap) = Catalog::parse(CatalogKind::Music, raw).unwrap() else {
            panic!("wrong kind");
        };
        let albums = &snap.artists[0].albums;
        assert_eq!(albums[0].year, Some(1995));
        assert_eq!(albums[0].album_containers, vec!["flac", "mp3"]);
        assert_eq!(albums[1].year, None);
        assert_eq!(albums[1].album_containers, vec!["flac", "m4a"]);
    }

    #[test]
    fn kind_round_trips_through_names() {
        for kind in CatalogKind::ALL {
            assert_eq!(CatalogKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(CatalogKind::TvShows.snapshot_file(), "tvshows_ref.json");
    }
}
