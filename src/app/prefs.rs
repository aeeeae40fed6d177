// src/app/prefs.rs
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::data::CatalogKind;
use super::filters::{Direction, SortKey};
use super::types::Page;

/// What survives a restart: the last page and each catalog's sort.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiPrefs {
    pub page: Option<Page>,
    pub sorts: HashMap<CatalogKind, (SortKey, Direction)>,
}

pub fn parse_prefs(txt: &str) -> UiPrefs {
    let mut prefs = UiPrefs::default();
    let mut keys: HashMap<CatalogKind, SortKey> = HashMap::new();
    let mut descs: HashMap<CatalogKind, bool> = HashMap::new();

    for line in txt.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((k, v)) = line.split_once('=') else {
            continue;
        };
        let (k, v) = (k.trim(), v.trim());

        if k == "page" {
            prefs.page = Page::from_str(v);
        } else if let Some(kind) = k.strip_suffix("_sort").and_then(CatalogKind::from_str) {
            if let Some(key) = SortKey::from_str(v) {
                keys.insert(kind, key);
            }
        } else if let Some(kind) = k.strip_suffix("_desc").and_then(CatalogKind::from_str) {
            descs.insert(kind, matches!(v, "1" | "true" | "yes"));
        }
    }

    for (kind, key) in keys {
        let direction = if descs.get(&kind).copied().unwrap_or(false) {
            Direction::Descending
        } else {
            Direction::Ascending
        };
        prefs.sorts.insert(kind, (key, direction));
    }
    prefs
}

pub fn render_prefs(prefs: &UiPrefs) -> String {
    let mut txt = String::from("# mediashelf ui prefs\n");
    if let Some(page) = prefs.page {
        txt.push_str(&format!("page={}\n", page.as_str()));
    }
    for kind in CatalogKind::ALL {
        if let Some((key, direction)) = prefs.sorts.get(&kind) {
            txt.push_str(&format!(
                "{k}_sort={}\n{k}_desc={}\n",
                key.as_str(),
                if *direction == Direction::Descending { "1" } else { "0" },
                k = kind.as_str(),
            ));
        }
    }
    txt
}

pub fn read_prefs(path: &Path) -> UiPrefs {
    fs::read_to_string(path)
        .map(|txt| parse_prefs(&txt))
        .unwrap_or_default()
}

pub fn write_prefs(path: &Path, prefs: &UiPrefs) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_prefs(prefs))
}

pub fn prefs_path() -> PathBuf {
    crate::app::cache::cache_dir().join("ui_prefs.txt")
}

impl crate::app::ShelfApp {
    #[allow(clippy::missing_const_for_fn)]
    pub(crate) fn mark_dirty(&mut self) {
        self.prefs_dirty = true;
    }

    pub(crate) fn maybe_save_prefs(&mut self) {
        // debounce a bit to avoid writing every frame
        if self.prefs_dirty && self.prefs_last_write.elapsed() >= Duration::from_millis(300) {
            self.save_prefs();
            self.prefs_dirty = false;
            self.prefs_last_write = Instant::now();
        }
    }

    pub(crate) fn current_prefs(&self) -> UiPrefs {
        let sorts = CatalogKind::ALL
            .into_iter()
            .map(|kind| {
                let st = &self.views.get(kind).state;
                (kind, (st.key, st.direction))
            })
            .collect();
        UiPrefs {
            page: Some(self.page),
            sorts,
        }
    }

    pub(crate) fn apply_prefs(&mut self, prefs: &UiPrefs) {
        for (kind, (key, direction)) in &prefs.sorts {
            self.views.get_mut(*kind).restore_sort(*key, *direction);
        }
    }

    pub(crate) fn save_prefs(&self) {
        let path = prefs_path();
        match write_prefs(&path, &self.current_prefs()) {
            Ok(()) => debug!("saved {}", path.display()),
            Err(e) => warn!("could not save {}: {e}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys_and_ignores_junk() {
        let prefs = parse_prefs(
            "# comment\npage=tvshows\nmovies_sort=size\nmovies_desc=1\n\
             music_sort=title\nbogus\ntvshows_desc=1\n",
        );
        assert_eq!(prefs.page, Some(Page::Catalog(CatalogKind::TvShows)));
        assert_eq!(
            prefs.sorts.get(&CatalogKind::Movies),
            Some(&(SortKey::Size, Direction::Descending))
        );
        // a key is stored even if it is not valid for the catalog; the view filters it
        assert_eq!(
            prefs.sorts.get(&CatalogKind::Music),
            Some(&(SortKey::Title, Direction::Ascending))
        );
        // direction alone is not a sort
        assert!(!prefs.sorts.contains_key(&CatalogKind::TvShows));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ui_prefs.txt");
        assert_eq!(read_prefs(&path), UiPrefs::default());

        let mut prefs = UiPrefs {
            page: Some(Page::Recommend),
            ..UiPrefs::default()
        };
        prefs
            .sorts
            .insert(CatalogKind::Music, (SortKey::Date, Direction::Descending));
        write_prefs(&path, &prefs).unwrap();
        assert_eq!(read_prefs(&path), prefs);
    }
}
