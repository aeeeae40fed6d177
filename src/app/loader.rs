// src/app/loader.rs
// one guarded background fetch per catalog snapshot
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, error, info};

use super::data::{Catalog, CatalogKind};
use crate::config::{is_http, resolve_relative_path};

const HTTP_TIMEOUT_SECS: u64 = 30;

/// Where `<kind>_ref.json` snapshots live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotSource {
    Dir(PathBuf),
    Http(String),
}

impl SnapshotSource {
    pub fn from_config(raw: &str) -> Self {
        if is_http(raw) {
            Self::Http(raw.trim().trim_end_matches('/').to_string())
        } else {
            Self::Dir(resolve_relative_path(raw))
        }
    }

    pub fn location(&self, kind: CatalogKind) -> String {
        match self {
            Self::Dir(dir) => dir.join(kind.snapshot_file()).display().to_string(),
            Self::Http(base) => format!("{base}/{}", kind.snapshot_file()),
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, source: io::Error },
    Http { url: String, message: String },
    Status { url: String, status: u16 },
    Parse { kind: CatalogKind, source: serde_json::Error },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "read {}: {source}", path.display()),
            Self::Http { url, message } => write!(f, "GET {url}: {message}"),
            Self::Status { url, status } => write!(f, "HTTP {status} for {url}"),
            Self::Parse { kind, source } => {
                write!(f, "parse {} snapshot: {source}", kind.label())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Http { .. } | Self::Status { .. } => None,
        }
    }
}

fn read_bytes(source: &SnapshotSource, kind: CatalogKind) -> Result<Vec<u8>, LoadError> {
    match source {
        SnapshotSource::Dir(dir) => {
            let path = dir.join(kind.snapshot_file());
            fs::read(&path).map_err(|source| LoadError::Io { path, source })
        }
        SnapshotSource::Http(_) => {
            let url = source.location(kind);
            let client = Client::builder()
                .user_agent("mediashelf/loader")
                .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()
                .map_err(|e| LoadError::Http {
                    url: url.clone(),
                    message: format!("http client: {e}"),
                })?;
            let resp = client.get(&url).send().map_err(|e| LoadError::Http {
                url: url.clone(),
                message: e.to_string(),
            })?;
            if !resp.status().is_success() {
                return Err(LoadError::Status {
                    url,
                    status: resp.status().as_u16(),
                });
            }
            resp.bytes()
                .map(|b| b.to_vec())
                .map_err(|e| LoadError::Http {
                    url,
                    message: format!("read body: {e}"),
                })
        }
    }
}

/// Single read + parse of one snapshot. Blocking; call off the UI thread.
pub fn fetch_snapshot(source: &SnapshotSource, kind: CatalogKind) -> Result<Catalog, LoadError> {
    let bytes = read_bytes(source, kind)?;
    Catalog::parse(kind, &bytes).map_err(|source| LoadError::Parse { kind, source })
}

pub enum LoadMsg {
    Done(CatalogKind, Catalog),
    Failed(CatalogKind, String),
}

/// Per-catalog load state. Only an `Idle` slot accepts a request, so a
/// catalog is fetched at most once per session.
#[derive(Clone, Debug, Default)]
pub enum CatalogSlot {
    #[default]
    Idle,
    Loading,
    Ready(Arc<Catalog>),
    Failed(String),
}

impl CatalogSlot {
    pub fn request(&mut self) -> bool {
        if matches!(self, Self::Idle) {
            *self = Self::Loading;
            true
        } else {
            false
        }
    }

    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        match self {
            Self::Ready(c) => Some(c),
            _ => None,
        }
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Results handed back to the app after a poll.
pub enum LoadOutcome {
    Ready(CatalogKind, Arc<Catalog>),
    Failed(CatalogKind),
}

pub struct Loader {
    source: Arc<SnapshotSource>,
    slots: [CatalogSlot; 3],
    tx: Sender<LoadMsg>,
    rx: Receiver<LoadMsg>,
}

const fn slot_index(kind: CatalogKind) -> usize {
    match kind {
        CatalogKind::Movies => 0,
        CatalogKind::TvShows => 1,
        CatalogKind::Music => 2,
    }
}

impl Loader {
    pub fn new(source: SnapshotSource) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source: Arc::new(source),
            slots: Default::default(),
            tx,
            rx,
        }
    }

    pub fn slot(&self, kind: CatalogKind) -> &CatalogSlot {
        &self.slots[slot_index(kind)]
    }

    pub fn catalog(&self, kind: CatalogKind) -> Option<Arc<Catalog>> {
        self.slot(kind).catalog().cloned()
    }

    /// Spawns the fetch unless this kind was already requested.
    pub fn request(&mut self, kind: CatalogKind) -> bool {
        if !self.slots[slot_index(kind)].request() {
            debug!("{} already requested; ignoring", kind.label());
            return false;
        }
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        info!("loading {} from {}", kind.label(), source.location(kind));
        std::thread::spawn(move || {
            let msg = match fetch_snapshot(&source, kind) {
                Ok(catalog) => LoadMsg::Done(kind, catalog),
                Err(e) => LoadMsg::Failed(kind, e.to_string()),
            };
            let _ = tx.send(msg);
        });
        true
    }

    /// Drains up to `budget` finished loads.
    pub fn poll(&mut self, budget: usize) -> Vec<LoadOutcome> {
        let mut out = Vec::new();
        while out.len() < budget {
            let Ok(msg) = self.rx.try_recv() else {
                break;
            };
            match msg {
                LoadMsg::Done(kind, catalog) => {
                    info!("{} ready: {} entries", kind.label(), catalog.len());
                    let catalog = Arc::new(catalog);
                    self.slots[slot_index(kind)] = CatalogSlot::Ready(Arc::clone(&catalog));
                    out.push(LoadOutcome::Ready(kind, catalog));
                }
                LoadMsg::Failed(kind, err) => {
                    error!("failed to load {}: {err}", kind.label());
                    self.slots[slot_index(kind)] = CatalogSlot::Failed(err);
                    out.push(LoadOutcome::Failed(kind));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    const MOVIES: &str = r#"{
        "metadata": { "totalMovies": 2, "totalSizeHuman": "3 GB" },
        "movies": [
            { "title": "Heat", "year": 1995, "ratingKey": "11", "sizeHuman": "2 GB" },
            { "title": "Ran", "year": null, "ratingKey": 12 }
        ]
    }"#;

    fn wait_for(loader: &mut Loader) -> Vec<LoadOutcome> {
        let started = Instant::now();
        loop {
            let got = loader.poll(8);
            if !got.is_empty() || started.elapsed() > Duration::from_secs(5) {
                return got;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn reads_snapshot_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("movies_ref.json"), MOVIES).unwrap();
        let src = SnapshotSource::Dir(dir.path().to_path_buf());
        let catalog = fetch_snapshot(&src, CatalogKind::Movies).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.rating_key(1), "12");
    }

    #[test]
    fn missing_and_malformed_snapshots_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let src = SnapshotSource::Dir(dir.path().to_path_buf());
        assert!(matches!(
            fetch_snapshot(&src, CatalogKind::Music),
            Err(LoadError::Io { .. })
        ));
        fs::write(dir.path().join("music_ref.json"), "{ not json").unwrap();
        assert!(matches!(
            fetch_snapshot(&src, CatalogKind::Music),
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn second_request_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("movies_ref.json"), MOVIES).unwrap();
        let mut loader = Loader::new(SnapshotSource::Dir(dir.path().to_path_buf()));

        assert!(loader.request(CatalogKind::Movies));
        assert!(!loader.request(CatalogKind::Movies));
        let done = wait_for(&mut loader);
        assert_eq!(done.len(), 1);
        assert!(!loader.request(CatalogKind::Movies));

        // nothing else arrives and the entry count is untouched
        std::thread::sleep(Duration::from_millis(50));
        assert!(loader.poll(8).is_empty());
        assert_eq!(loader.catalog(CatalogKind::Movies).map(|c| c.len()), Some(2));
    }

    #[test]
    fn failure_is_terminal_for_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = Loader::new(SnapshotSource::Dir(dir.path().to_path_buf()));
        assert!(loader.request(CatalogKind::TvShows));
        let done = wait_for(&mut loader);
        assert!(matches!(done.as_slice(), [LoadOutcome::Failed(CatalogKind::TvShows)]));
        assert!(loader.slot(CatalogKind::TvShows).error().is_some());
        assert!(!loader.request(CatalogKind::TvShows));
    }

    #[test]
    fn source_from_config() {
        assert_eq!(
            SnapshotSource::from_config("https://cdn.example.org/data/"),
            SnapshotSource::Http("https://cdn.example.org/data".into())
        );
        assert_eq!(
            SnapshotSource::from_config("https://cdn.example.org/data")
                .location(CatalogKind::TvShows),
            "https://cdn.example.org/data/tvshows_ref.json"
        );
        assert!(matches!(
            SnapshotSource::from_config("data"),
            SnapshotSource::Dir(_)
        ));
    }
}
