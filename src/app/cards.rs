// src/app/cards.rs
use itertools::Itertools;

use super::data::{Album, Artist, Catalog, Movie, Season, Show};
use super::filters::format_year_range;
use super::utils::{format_resolution, split_list};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detail {
    pub label: Option<&'static str>,
    pub value: String,
}

impl Detail {
    fn labelled(label: &'static str, value: &str) -> Self {
        Self {
            label: Some(label),
            value: value.to_string(),
        }
    }

    fn bare(value: impl Into<String>) -> Self {
        Self {
            label: None,
            value: value.into(),
        }
    }
}

/// Year badge, heading and the detail rows under it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardText {
    pub year: String,
    pub title: String,
    pub details: Vec<Detail>,
}

pub fn movie_card(m: &Movie) -> CardText {
    CardText {
        year: m.year.map(|y| y.to_string()).unwrap_or_default(),
        title: m.title.clone(),
        details: vec![
            Detail::labelled("Rated", &m.content_rating),
            Detail::labelled("Runtime", &m.duration_human),
            Detail::labelled("Codec", &m.video_codec),
            Detail::labelled("Audio", &m.audio_codec),
            Detail::labelled("File Type", &m.container),
            Detail::bare(m.video_resolution.clone()),
            Detail::bare(m.size_human.clone()),
        ],
    }
}

pub fn show_card(s: &Show) -> CardText {
    let mut details = Vec::with_capacity(6);
    if !s.content_rating.trim().is_empty() {
        details.push(Detail::labelled("Rated", &s.content_rating));
    }
    let resolutions = split_list(&s.avg_video_resolutions)
        .iter()
        .map(|r| format_resolution(r))
        .join(", ");
    details.extend([
        Detail::labelled("Seasons", &s.season_count),
        Detail::labelled("Episodes", &s.show_total_episode),
        Detail::labelled("Runtime", &s.avg_episode_duration),
        Detail::bare(resolutions),
        Detail::bare(s.show_size_human.clone()),
    ]);
    CardText {
        year: format_year_range(&s.show_year_range),
        title: s.title.clone(),
        details,
    }
}

pub fn season_card(s: &Season) -> CardText {
    let mut details = vec![Detail::labelled("Episodes", &s.season_total_episode)];
    if !s.avg_season_episode_duration.trim().is_empty() {
        details.push(Detail::labelled("Runtime", &s.avg_season_episode_duration));
    }
    details.extend([
        Detail::labelled("Codec", &s.avg_season_video_codec),
        Detail::labelled("File Type", &format!(".{}", s.avg_season_container)),
        Detail::bare(format_resolution(&s.avg_season_video_resolution)),
        Detail::bare(s.season_size_human.clone()),
    ]);
    CardText {
        year: format_year_range(&s.year_range),
        title: s.display_title(),
        details,
    }
}

pub fn artist_card(a: &Artist) -> CardText {
    CardText {
        year: format_year_range(&a.year_range),
        title: a.artist_name.clone(),
        details: vec![
            Detail::labelled("Albums", &a.total_albums),
            Detail::labelled("Tracks", &a.total_tracks),
            Detail::bare(a.total_size_human.clone()),
        ],
    }
}

pub fn album_card(a: &Album) -> CardText {
    let exts = a
        .album_containers
        .iter()
        .map(|c| format!(".{}", c.trim_start_matches('.')))
        .join(", ");
    CardText {
        year: a
            .year
            .filter(|y| *y != 0)
            .map_or_else(|| "Unknown".to_string(), |y| y.to_string()),
        title: a.title.clone(),
        details: vec![
            Detail::labelled("Tracks", &a.tracks),
            Detail::labelled("Runtime", &a.album_duration_human),
            Detail::labelled("File Type", &exts),
            Detail::bare(a.album_size_human.clone()),
        ],
    }
}

/// Top-level card for the entry at `idx`.
pub fn catalog_card(catalog: &Catalog, idx: usize) -> Option<CardText> {
    match catalog {
        Catalog::Movies(s) => s.movies.get(idx).map(movie_card),
        Catalog::TvShows(s) => s.shows.get(idx).map(show_card),
        Catalog::Music(s) => s.artists.get(idx).map(artist_card),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_card_skips_missing_rating_and_formats_resolutions() {
        let show = Show {
            title: "Lost".into(),
            show_year_range: "2004-2010".into(),
            avg_video_resolutions: "sd, 1080P".into(),
            ..Show::default()
        };
        let card = show_card(&show);
        assert_eq!(card.year, "2004-2010");
        assert_eq!(card.details[0].label, Some("Seasons"));
        assert_eq!(card.details[3].value, "SD, 1080p");
    }

    #[test]
    fn season_card_collapses_single_year_and_optional_runtime() {
        let season = Season {
            season_number: "0".into(),
            year_range: "2019-2019".into(),
            avg_season_container: "mkv".into(),
            ..Season::default()
        };
        let card = season_card(&season);
        assert_eq!(card.title, "Specials");
        assert_eq!(card.year, "2019");
        assert!(card.details.iter().all(|d| d.label != Some("Runtime")));
        assert!(card.details.iter().any(|d| d.value == ".mkv"));
    }

    #[test]
    fn album_card_unknown_year_and_extensions() {
        let album = Album {
            title: "Homogenic".into(),
            album_containers: vec!["flac".into(), "mp3".into()],
            ..Album::default()
        };
        let card = album_card(&album);
        assert_eq!(card.year, "Unknown");
        assert_eq!(card.details[2].value, ".flac, .mp3");
    }
}
