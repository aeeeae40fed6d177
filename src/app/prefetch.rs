// src/app/prefetch.rs
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use eframe::egui::{self as eg, TextureHandle};
use tracing::{debug, warn};

use super::lazy::Ticket;
use super::types::{Artwork, ArtworkDone, ArtworkJob, GridId, PosterState};

pub struct ArtworkPool {
    work_tx: Sender<ArtworkJob>,
    done_rx: Receiver<ArtworkDone>,
}

impl ArtworkPool {
    /// Spawns `workers` threads sharing one HTTP client. Returns `None` if the
    /// client cannot be built; cards then keep their placeholder panels.
    pub fn start(workers: usize, dir: PathBuf) -> Option<Self> {
        let client = match reqwest::blocking::Client::builder()
            .user_agent("mediashelf/artwork")
            .timeout(Duration::from_secs(20))
            .pool_max_idle_per_host(16)
            .default_headers({
                use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
                let mut h = HeaderMap::new();
                h.insert(
                    ACCEPT,
                    HeaderValue::from_static("image/webp,image/*;q=0.8,*/*;q=0.5"),
                );
                h
            })
            .build()
        {
            Ok(c) => Arc::new(c),
            Err(e) => {
                warn!("artwork http client build failed: {e}");
                return None;
            }
        };

        let (work_tx, work_rx) = mpsc::channel::<ArtworkJob>();
        let (done_tx, done_rx) = mpsc::channel::<ArtworkDone>();
        let work_rx = Arc::new(Mutex::new(work_rx));
        let dir = Arc::new(dir);

        for _ in 0..workers.max(1) {
            let work_rx = Arc::clone(&work_rx);
            let done_tx = done_tx.clone();
            let client = Arc::clone(&client);
            let dir = Arc::clone(&dir);

            std::thread::spawn(move || loop {
                let job = {
                    let Ok(rx) = work_rx.lock() else {
                        break;
                    };
                    rx.recv()
                };
                let Ok(job) = job else {
                    break;
                };
                let result = super::cache::ensure_artwork(&client, &dir, &job.source);
                if let Err(e) = &result {
                    debug!("artwork {}: {e}", job.source);
                }
                let done = ArtworkDone {
                    grid: job.grid,
                    ticket: job.ticket,
                    source: job.source,
                    result,
                };
                if done_tx.send(done).is_err() {
                    break;
                }
            });
        }

        Some(Self { work_tx, done_rx })
    }

    pub fn enqueue(&self, job: ArtworkJob) {
        if self.work_tx.send(job).is_err() {
            warn!("artwork workers are gone; dropping job");
        }
    }

    /// Up to `budget` finished jobs.
    pub fn drain(&self, budget: usize) -> Vec<ArtworkDone> {
        let mut out = Vec::new();
        while out.len() < budget {
            match self.done_rx.try_recv() {
                Ok(done) => out.push(done),
                Err(_) => break,
            }
        }
        out
    }
}

/// Artwork state per source, shared by every grid. A source is fetched once;
/// later requests only move its ownership to the newest ticket.
pub struct ArtworkBook {
    pool: Option<ArtworkPool>,
    entries: HashMap<String, Artwork>,
    owners: HashMap<String, (GridId, Ticket)>,
}

impl ArtworkBook {
    pub fn new(pool: Option<ArtworkPool>) -> Self {
        Self {
            pool,
            entries: HashMap::new(),
            owners: HashMap::new(),
        }
    }

    pub fn state(&self, source: &str) -> Option<PosterState> {
        self.entries.get(source).map(|a| a.state)
    }

    pub fn pending(&self) -> usize {
        self.entries
            .values()
            .filter(|a| a.state == PosterState::Pending)
            .count()
    }

    pub fn request(&mut self, grid: GridId, ticket: Ticket, source: String) {
        match self.state(&source) {
            Some(PosterState::Pending) => {
                self.owners.insert(source, (grid, ticket));
            }
            Some(_) => {}
            None if self.pool.is_none() => {
                let mut art = Artwork::pending();
                art.state = PosterState::Failed;
                self.entries.insert(source, art);
            }
            None => {
                self.track(grid, ticket, source.clone());
                if let Some(pool) = &self.pool {
                    pool.enqueue(ArtworkJob {
                        grid,
                        ticket,
                        source,
                    });
                }
            }
        }
    }

    fn track(&mut self, grid: GridId, ticket: Ticket, source: String) {
        self.entries.insert(source.clone(), Artwork::pending());
        self.owners.insert(source, (grid, ticket));
    }

    /// Applies one completion. Results whose tickets all belong to torn-down
    /// passes are dropped and the entry forgotten, so a later pass asks again.
    pub fn finish(&mut self, done: ArtworkDone, is_live: impl Fn(GridId, Ticket) -> bool) -> bool {
        let owner = self.owners.remove(&done.source);
        let live = is_live(done.grid, done.ticket) || owner.is_some_and(|(g, t)| is_live(g, t));
        if !live {
            if self.state(&done.source) == Some(PosterState::Pending) {
                self.entries.remove(&done.source);
            }
            return false;
        }
        let entry = self
            .entries
            .entry(done.source)
            .or_insert_with(Artwork::pending);
        match done.result {
            Ok(path) => {
                entry.state = PosterState::Cached;
                entry.path = Some(path);
            }
            Err(_) => entry.state = PosterState::Failed,
        }
        true
    }

    /// Drains up to `budget` completions; returns how many were applied.
    pub fn pump(&mut self, budget: usize, is_live: impl Fn(GridId, Ticket) -> bool) -> usize {
        let Some(pool) = &self.pool else {
            return 0;
        };
        let mut applied = 0;
        for done in pool.drain(budget) {
            if self.finish(done, &is_live) {
                applied += 1;
            }
        }
        applied
    }

    /// Texture for `source`, uploading a cached file while `uploads_left` allows.
    pub fn texture(
        &mut self,
        ctx: &eg::Context,
        source: &str,
        uploads_left: &mut usize,
    ) -> Option<TextureHandle> {
        let art = self.entries.get_mut(source)?;
        match art.state {
            PosterState::Ready => art.tex.clone(),
            PosterState::Cached if *uploads_left > 0 => {
                *uploads_left -= 1;
                let path = art.path.clone()?;
                match super::gfx::load_texture_from_path(ctx, &path, source) {
                    Ok(tex) => {
                        art.state = PosterState::Ready;
                        art.tex = Some(tex.clone());
                        Some(tex)
                    }
                    Err(e) => {
                        warn!("artwork upload {}: {e}", path.display());
                        art.state = PosterState::Failed;
                        None
                    }
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn done(grid: GridId, pass: u64, source: &str, ok: bool) -> ArtworkDone {
        ArtworkDone {
            grid,
            ticket: Ticket { pass, position: 0 },
            source: source.into(),
            result: if ok {
                Ok(PathBuf::from(format!("/tmp/{source}.png")))
            } else {
                Err("404".into())
            },
        }
    }

    #[test]
    fn missing_source_reports_failure_with_its_ticket() {
        let dir = tempfile::tempdir().unwrap();
        let pool = ArtworkPool::start(2, dir.path().to_path_buf()).unwrap();
        let ticket = Ticket {
            pass: 3,
            position: 7,
        };
        pool.enqueue(ArtworkJob {
            grid: GridId::Detail,
            ticket,
            source: dir.path().join("nope.webp").to_string_lossy().into(),
        });

        let started = Instant::now();
        let done = loop {
            if let Some(d) = pool.drain(4).pop() {
                break d;
            }
            assert!(started.elapsed() < Duration::from_secs(5), "no completion");
            std::thread::sleep(Duration::from_millis(10));
        };
        assert_eq!(done.ticket, ticket);
        assert_eq!(done.grid, GridId::Detail);
        assert!(done.result.is_err());
    }

    #[test]
    fn no_pool_means_no_artwork() {
        let mut book = ArtworkBook::new(None);
        book.request(GridId::Main, Ticket { pass: 1, position: 0 }, "a".into());
        assert_eq!(book.state("a"), Some(PosterState::Failed));
        assert_eq!(book.pump(8, |_, _| true), 0);
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut book = ArtworkBook::new(None);
        book.track(GridId::Main, Ticket { pass: 1, position: 0 }, "a".into());
        let live = |_: GridId, t: Ticket| t.pass == 2;
        assert!(!book.finish(done(GridId::Main, 1, "a", true), live));
        assert_eq!(book.state("a"), None);
    }

    #[test]
    fn newer_owner_keeps_a_shared_source_alive() {
        let mut book = ArtworkBook::new(None);
        book.track(GridId::Main, Ticket { pass: 1, position: 0 }, "a".into());
        // the detail grid asked for the same source while it was in flight
        book.request(GridId::Detail, Ticket { pass: 5, position: 2 }, "a".into());
        assert_eq!(book.pending(), 1);
        let live = |g: GridId, t: Ticket| g == GridId::Detail && t.pass == 5;
        assert!(book.finish(done(GridId::Main, 1, "a", true), live));
        assert_eq!(book.state("a"), Some(PosterState::Cached));
    }

    #[test]
    fn failed_fetch_is_remembered() {
        let mut book = ArtworkBook::new(None);
        book.track(GridId::Main, Ticket { pass: 1, position: 0 }, "b".into());
        assert!(book.finish(done(GridId::Main, 1, "b", false), |_, _| true));
        assert_eq!(book.state("b"), Some(PosterState::Failed));
        assert_eq!(book.pending(), 0);
    }
}
