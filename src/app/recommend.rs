// src/app/recommend.rs
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant, SystemTime};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::utils::{format_timestamp, wrap_text};

pub const EMPTY_MESSAGE: &str = "No recommendations yet.";
pub const WRAP_AT: usize = 20;
const TOAST_TTL: Duration = Duration::from_secs(6);
const WATCH_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Movies,
    TvShows,
    Music,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::Movies, Self::TvShows, Self::Music];

    /// Wire value of the `category` field.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Movies => "Movies",
            Self::TvShows => "TV Shows",
            Self::Music => "Music",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Movies" => Some(Self::Movies),
            "TV Shows" => Some(Self::TvShows),
            "Music" => Some(Self::Music),
            _ => None,
        }
    }

    pub const fn primary_label(self) -> &'static str {
        match self {
            Self::Movies => "Title",
            Self::TvShows => "Show",
            Self::Music => "Artist",
        }
    }

    pub const fn secondary_label(self) -> Option<&'static str> {
        match self {
            Self::Movies => None,
            Self::TvShows => Some("Season"),
            Self::Music => Some("Album"),
        }
    }

    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Movies => "Please enter a title.",
            Self::TvShows => "Please enter a show name.",
            Self::Music => "Please enter an artist name.",
        }
    }
}

/// One request as the store keeps it. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireRecord", try_from = "WireRecord")]
pub struct RecommendationRequest {
    pub category: Category,
    pub primary: String,
    pub secondary: Option<String>,
    /// Client clock, ms since epoch.
    pub timestamp: i64,
}

// {category, title|show|artist, season|album?, timestamp}
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct WireRecord {
    category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    show: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    album: Option<String>,
    #[serde(default)]
    timestamp: i64,
}

impl From<RecommendationRequest> for WireRecord {
    fn from(req: RecommendationRequest) -> Self {
        let mut w = Self {
            category: req.category.label().to_string(),
            timestamp: req.timestamp,
            ..Self::default()
        };
        match req.category {
            Category::Movies => w.title = Some(req.primary),
            Category::TvShows => {
                w.show = Some(req.primary);
                w.season = req.secondary;
            }
            Category::Music => {
                w.artist = Some(req.primary);
                w.album = req.secondary;
            }
        }
        w
    }
}

impl TryFrom<WireRecord> for RecommendationRequest {
    type Error = String;

    fn try_from(w: WireRecord) -> Result<Self, Self::Error> {
        let category = Category::from_label(&w.category)
            .ok_or_else(|| format!("unknown category `{}`", w.category))?;
        let (primary, secondary) = match category {
            Category::Movies => (w.title, None),
            Category::TvShows => (w.show, w.season),
            Category::Music => (w.artist, w.album),
        };
        Ok(Self {
            category,
            primary: primary.unwrap_or_default(),
            secondary: secondary.filter(|s| !s.is_empty()),
            timestamp: w.timestamp,
        })
    }
}

/// Full collection, newest first.
pub type Snapshot = Vec<RecommendationRequest>;

fn ordered(mut items: Vec<RecommendationRequest>) -> Snapshot {
    // stable: equal timestamps keep insertion order
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items
}

#[derive(Debug)]
pub enum StoreError {
    Io(String),
    Encode(String),
    Poisoned,
    Denied(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "store io: {e}"),
            Self::Encode(e) => write!(f, "store encoding: {e}"),
            Self::Poisoned => write!(f, "store lock poisoned"),
            Self::Denied(e) => write!(f, "permission denied: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Live feed handle. Dropping it (or calling `cancel`) stops delivery.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(f) = self.cancel.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

pub trait RecommendationStore: Send + Sync {
    fn write(&self, req: RecommendationRequest) -> Result<(), StoreError>;

    /// Pushes the current snapshot right away, then one per change.
    fn subscribe(&self, sink: Sender<Snapshot>) -> Result<Subscription, StoreError>;
}

// ---------- in-process store ----------
#[derive(Default)]
struct MemoryInner {
    items: Vec<RecommendationRequest>,
    sinks: Vec<(u64, Sender<Snapshot>)>,
    next_id: u64,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|g| g.items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecommendationStore for MemoryStore {
    fn write(&self, req: RecommendationRequest) -> Result<(), StoreError> {
        let mut g = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        g.items.push(req);
        let snap = ordered(g.items.clone());
        g.sinks.retain(|(_, tx)| tx.send(snap.clone()).is_ok());
        Ok(())
    }

    fn subscribe(&self, sink: Sender<Snapshot>) -> Result<Subscription, StoreError> {
        let mut g = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        let id = g.next_id;
        g.next_id += 1;
        let _ = sink.send(ordered(g.items.clone()));
        g.sinks.push((id, sink));

        let weak: Weak<Mutex<MemoryInner>> = Arc::downgrade(&self.inner);
        Ok(Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                if let Ok(mut g) = inner.lock() {
                    g.sinks.retain(|(sid, _)| *sid != id);
                }
            }
        }))
    }
}

// ---------- JSON file store ----------
/// A JSON array on disk. Writers replace it via tmp + rename; subscribers
/// poll its mtime from a watcher thread.
pub struct JsonFileStore {
    path: PathBuf,
    interval: Duration,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_interval(path, WATCH_INTERVAL)
    }

    pub fn with_interval(path: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            path: path.into(),
            interval,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Missing file reads as empty; entries that don't decode are skipped.
fn read_all(path: &Path) -> Result<Vec<RecommendationRequest>, StoreError> {
    let raw = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::Io(format!("read {}: {e}", path.display()))),
    };
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let values: Vec<Value> = serde_json::from_slice(&raw)
        .map_err(|e| StoreError::Encode(format!("{}: {e}", path.display())))?;
    let total = values.len();
    let items: Vec<RecommendationRequest> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    if items.len() != total {
        warn!(
            "skipped {} malformed recommendation(s) in {}",
            total - items.len(),
            path.display()
        );
    }
    Ok(items)
}

fn file_stamp(path: &Path) -> Option<(SystemTime, u64)> {
    let meta = fs::metadata(path).ok()?;
    Some((meta.modified().unwrap_or(SystemTime::UNIX_EPOCH), meta.len()))
}

impl RecommendationStore for JsonFileStore {
    fn write(&self, req: RecommendationRequest) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut items = read_all(&self.path)?;
        items.push(req);
        let body =
            serde_json::to_vec_pretty(&items).map_err(|e| StoreError::Encode(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("create {}: {e}", parent.display())))?;
        }
        let tmp = self.path.with_extension("json.part");
        fs::write(&tmp, body).map_err(|e| StoreError::Io(format!("write tmp: {e}")))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::Io(format!("rename: {e}")))?;
        debug!("recommendation stored ({} total)", items.len());
        Ok(())
    }

    fn subscribe(&self, sink: Sender<Snapshot>) -> Result<Subscription, StoreError> {
        let initial = read_all(&self.path)?;
        let _ = sink.send(ordered(initial));

        let stop = Arc::new(AtomicBool::new(false));
        let path = self.path.clone();
        let interval = self.interval;
        let flag = Arc::clone(&stop);
        let mut last = file_stamp(&path);

        std::thread::spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                std::thread::sleep(interval);
                if flag.load(Ordering::Relaxed) {
                    break;
                }
                let now = file_stamp(&path);
                if now == last {
                    continue;
                }
                last = now;
                match read_all(&path) {
                    Ok(items) => {
                        // a write racing the cancel must not be delivered
                        if flag.load(Ordering::Relaxed) {
                            break;
                        }
                        if sink.send(ordered(items)).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("recommendation watcher: {e}"),
                }
            }
            debug!("recommendation watcher stopped");
        });

        Ok(Subscription::new(move || stop.store(true, Ordering::Relaxed)))
    }
}

// ---------- submit form ----------
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected,
    Sent,
    WriteFailed,
}

#[derive(Clone, Debug)]
pub struct RecommendForm {
    pub category: Category,
    pub primary: String,
    pub secondary: String,
    pub prompt: Option<String>,
}

impl Default for RecommendForm {
    fn default() -> Self {
        Self {
            category: Category::Movies,
            primary: String::new(),
            secondary: String::new(),
            prompt: None,
        }
    }
}

impl RecommendForm {
    pub fn set_category(&mut self, category: Category) {
        if self.category != category {
            self.category = category;
            self.secondary.clear();
            self.prompt = None;
        }
    }

    /// Validates, timestamps and hands the request to the store. An empty
    /// primary field never reaches the store.
    pub fn submit(&mut self, store: &dyn RecommendationStore, now_ms: i64) -> SubmitOutcome {
        let primary = self.primary.trim();
        if primary.is_empty() {
            self.prompt = Some(self.category.prompt().to_string());
            return SubmitOutcome::Rejected;
        }
        let secondary = self
            .category
            .secondary_label()
            .map(|_| self.secondary.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let req = RecommendationRequest {
            category: self.category,
            primary: primary.to_string(),
            secondary,
            timestamp: now_ms,
        };
        self.prompt = None;
        self.primary.clear();
        self.secondary.clear();

        match store.write(req) {
            Ok(()) => {
                info!("recommendation submitted ({})", self.category.label());
                SubmitOutcome::Sent
            }
            Err(e) => {
                warn!("recommendation write failed: {e}");
                SubmitOutcome::WriteFailed
            }
        }
    }
}

// ---------- listener board ----------
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardEntry {
    pub heading: String,
    pub detail: Option<String>,
    pub when: String,
}

impl BoardEntry {
    fn from_request(req: &RecommendationRequest) -> Self {
        let detail = match (req.category.secondary_label(), req.secondary.as_deref()) {
            (Some(label), Some(value)) => Some(format!("{label}: {}", wrap_text(value, WRAP_AT))),
            _ => None,
        };
        Self {
            heading: wrap_text(&req.primary, WRAP_AT),
            detail,
            when: format_timestamp(req.timestamp),
        }
    }
}

fn request_key(req: &RecommendationRequest) -> (i64, Category, String) {
    (req.timestamp, req.category, req.primary.clone())
}

/// Per-category lists rebuilt from scratch on every snapshot.
#[derive(Debug, Default)]
pub struct RecommendationBoard {
    movies: Vec<BoardEntry>,
    tv: Vec<BoardEntry>,
    music: Vec<BoardEntry>,
    snapshots: usize,
    seen: HashSet<(i64, Category, String)>,
}

impl RecommendationBoard {
    /// Replaces all content. Returns requests that were not present in any
    /// earlier snapshot (always empty for the first one).
    pub fn apply(&mut self, snapshot: &[RecommendationRequest]) -> Vec<RecommendationRequest> {
        self.movies.clear();
        self.tv.clear();
        self.music.clear();

        let mut fresh = Vec::new();
        for req in snapshot {
            let entry = BoardEntry::from_request(req);
            match req.category {
                Category::Movies => self.movies.push(entry),
                Category::TvShows => self.tv.push(entry),
                Category::Music => self.music.push(entry),
            }
            if self.seen.insert(request_key(req)) && self.snapshots > 0 {
                fresh.push(req.clone());
            }
        }
        self.snapshots += 1;
        fresh
    }

    pub fn entries(&self, category: Category) -> &[BoardEntry] {
        match category {
            Category::Movies => &self.movies,
            Category::TvShows => &self.tv,
            Category::Music => &self.music,
        }
    }

    pub const fn has_snapshot(&self) -> bool {
        self.snapshots > 0
    }
}

// ---------- push channel ----------
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
}

impl NotificationPayload {
    pub fn for_request(req: &RecommendationRequest) -> Self {
        let body = match &req.secondary {
            Some(s) => format!("{} ({s})", req.primary),
            None => req.primary.clone(),
        };
        Self {
            title: format!("New {} recommendation", req.category.label()),
            body,
        }
    }
}

pub trait Notifier {
    /// Asks for permission to notify; returns a delivery token when granted.
    fn request_permission(&mut self) -> Result<Option<String>, StoreError>;
    fn on_message(&mut self, payload: NotificationPayload);
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub payload: NotificationPayload,
    pub shown_at: Instant,
}

/// In-app notifier: permission is implicit and messages become toasts.
#[derive(Debug, Default)]
pub struct ToastNotifier {
    token: Option<String>,
    toasts: VecDeque<Toast>,
}

impl ToastNotifier {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Live toasts; expired ones are dropped.
    pub fn visible(&mut self, now: Instant) -> impl Iterator<Item = &Toast> {
        while self
            .toasts
            .front()
            .is_some_and(|t| now.saturating_duration_since(t.shown_at) >= TOAST_TTL)
        {
            self.toasts.pop_front();
        }
        self.toasts.iter()
    }
}

impl Notifier for ToastNotifier {
    fn request_permission(&mut self) -> Result<Option<String>, StoreError> {
        if self.token.is_none() {
            let seed = format!("{}-{:?}", std::process::id(), SystemTime::now());
            self.token = Some(format!("local-{:x}", md5::compute(seed.as_bytes())));
            info!("notification permission granted (in-app)");
        }
        Ok(self.token.clone())
    }

    fn on_message(&mut self, payload: NotificationPayload) {
        info!("notification: {}: {}", payload.title, payload.body);
        self.toasts.push_back(Toast {
            payload,
            shown_at: Instant::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn req(
        category: Category,
        primary: &str,
        secondary: Option<&str>,
        ts: i64,
    ) -> RecommendationRequest {
        RecommendationRequest {
            category,
            primary: primary.into(),
            secondary: secondary.map(Into::into),
            timestamp: ts,
        }
    }

    #[test]
    fn empty_primary_never_writes() {
        let store = MemoryStore::new();
        let mut form = RecommendForm {
            category: Category::TvShows,
            primary: "   ".into(),
            secondary: "2".into(),
            prompt: None,
        };
        assert_eq!(form.submit(&store, 1), SubmitOutcome::Rejected);
        assert_eq!(form.prompt.as_deref(), Some("Please enter a show name."));
        assert!(store.is_empty());
        // input kept so the user can fix it
        assert_eq!(form.secondary, "2");
    }

    #[test]
    fn valid_submit_writes_and_clears() {
        let store = MemoryStore::new();
        let mut form = RecommendForm::default();
        form.set_category(Category::Music);
        form.primary = " Björk ".into();
        form.secondary = "Homogenic".into();
        assert_eq!(form.submit(&store, 1_700_000_000_000), SubmitOutcome::Sent);
        assert!(form.primary.is_empty() && form.secondary.is_empty());
        assert!(form.prompt.is_none());

        let (tx, rx) = mpsc::channel();
        let _sub = store.subscribe(tx).unwrap();
        let snap = rx.recv().unwrap();
        assert_eq!(
            snap,
            vec![req(Category::Music, "Björk", Some("Homogenic"), 1_700_000_000_000)]
        );
    }

    #[test]
    fn movies_ignore_secondary_field() {
        let store = MemoryStore::new();
        let mut form = RecommendForm {
            primary: "Heat".into(),
            secondary: "stale".into(),
            ..RecommendForm::default()
        };
        form.submit(&store, 5);
        let (tx, rx) = mpsc::channel();
        let _sub = store.subscribe(tx).unwrap();
        assert_eq!(rx.recv().unwrap()[0].secondary, None);
    }

    #[test]
    fn wire_format_uses_category_fields() {
        let json = serde_json::to_value(req(Category::TvShows, "Lost", Some("3"), 9)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "category": "TV Shows", "show": "Lost", "season": "3", "timestamp": 9 })
        );
        let back: RecommendationRequest = serde_json::from_value(
            serde_json::json!({ "category": "Movies", "title": "Heat", "timestamp": 4 }),
        )
        .unwrap();
        assert_eq!(back, req(Category::Movies, "Heat", None, 4));
        assert!(serde_json::from_value::<RecommendationRequest>(
            serde_json::json!({ "category": "Books", "title": "x" })
        )
        .is_err());
    }

    #[test]
    fn memory_subscription_is_ordered_and_cancellable() {
        let store = MemoryStore::new();
        let (tx, rx) = mpsc::channel();
        let sub = store.subscribe(tx).unwrap();
        assert!(rx.recv().unwrap().is_empty());

        store.write(req(Category::Movies, "Old", None, 10)).unwrap();
        store.write(req(Category::Movies, "New", None, 20)).unwrap();
        rx.recv().unwrap();
        let snap = rx.recv().unwrap();
        let titles: Vec<&str> = snap.iter().map(|r| r.primary.as_str()).collect();
        assert_eq!(titles, vec!["New", "Old"]);

        sub.cancel();
        store.write(req(Category::Movies, "Later", None, 30)).unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn file_store_round_trips_and_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            JsonFileStore::with_interval(dir.path().join("recs.json"), Duration::from_millis(20));
        let (tx, rx) = mpsc::channel();
        let sub = store.subscribe(tx).unwrap();
        assert!(rx.recv().unwrap().is_empty());

        store
            .write(req(Category::Music, "Air", Some("Moon Safari"), 7))
            .unwrap();
        let snap = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].secondary.as_deref(), Some("Moon Safari"));
        assert!(!dir.path().join("recs.json.part").exists());
        drop(sub);
    }

    #[test]
    fn file_store_cancel_stops_the_watcher() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            JsonFileStore::with_interval(dir.path().join("recs.json"), Duration::from_millis(20));
        let (tx, rx) = mpsc::channel();
        let sub = store.subscribe(tx).unwrap();
        assert!(rx.recv().unwrap().is_empty());

        sub.cancel();
        store.write(req(Category::TvShows, "Dark", None, 3)).unwrap();
        match rx.recv_timeout(Duration::from_millis(300)) {
            Err(mpsc::RecvTimeoutError::Disconnected | mpsc::RecvTimeoutError::Timeout) => {}
            Ok(snap) => panic!("snapshot after cancel: {snap:?}"),
        }
    }

    #[test]
    fn file_store_skips_malformed_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recs.json");
        fs::write(
            &path,
            r#"[{"category":"Movies","title":"Heat","timestamp":1},{"category":"??"}]"#,
        )
        .unwrap();
        assert_eq!(read_all(&path).unwrap().len(), 1);
    }

    #[test]
    fn board_replaces_content_and_reports_new_arrivals() {
        let mut board = RecommendationBoard::default();
        let first = vec![req(Category::TvShows, "A very long show title indeed", Some("1"), 2)];
        assert!(board.apply(&first).is_empty());
        assert_eq!(board.entries(Category::TvShows).len(), 1);
        assert_eq!(
            board.entries(Category::TvShows)[0].heading,
            "A very long show tit\nle indeed"
        );
        assert_eq!(
            board.entries(Category::TvShows)[0].detail.as_deref(),
            Some("Season: 1")
        );
        assert!(board.entries(Category::Movies).is_empty());

        let second = vec![req(Category::Movies, "Heat", None, 3), first[0].clone()];
        let fresh = board.apply(&second);
        assert_eq!(fresh, vec![req(Category::Movies, "Heat", None, 3)]);
        assert_eq!(board.entries(Category::Movies).len(), 1);

        board.apply(&[]);
        assert!(board.entries(Category::TvShows).is_empty());
    }

    #[test]
    fn toasts_expire() {
        let mut n = ToastNotifier::default();
        let token = n.request_permission().unwrap();
        assert!(token.is_some());
        assert_eq!(n.request_permission().unwrap(), token);

        n.on_message(NotificationPayload::for_request(&req(Category::Movies, "Heat", None, 1)));
        let now = Instant::now();
        assert_eq!(n.visible(now).count(), 1);
        assert_eq!(n.visible(now + TOAST_TTL + Duration::from_secs(1)).count(), 0);
    }
}
