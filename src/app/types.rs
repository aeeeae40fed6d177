// src/app/types.rs
use eframe::egui::TextureHandle;
use std::path::PathBuf;

use super::data::CatalogKind;
use super::lazy::Ticket;

// ---- cross-thread messages ----
/// Which lazy grid issued a ticket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridId {
    Main,
    Detail,
}

#[derive(Clone, Debug)]
pub struct ArtworkJob {
    pub grid: GridId,
    pub ticket: Ticket,
    pub source: String,
}

#[derive(Debug)]
pub struct ArtworkDone {
    pub grid: GridId,
    pub ticket: Ticket,
    pub source: String,
    pub result: Result<PathBuf, String>,
}

// ---- artwork state, keyed by source ----
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PosterState {
    Pending, // queued or downloading
    Cached,  // file present on disk (ready to upload)
    Ready,   // texture uploaded
    Failed,  // fall back to the placeholder panel
}

pub struct Artwork {
    pub state: PosterState,
    pub path: Option<PathBuf>,
    pub tex: Option<TextureHandle>, // UI thread only
}

impl Artwork {
    pub const fn pending() -> Self {
        Self {
            state: PosterState::Pending,
            path: None,
            tex: None,
        }
    }
}

// ---- navigation ----
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Home,
    Catalog(CatalogKind),
    Recommend,
}

impl Page {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Catalog(kind) => kind.as_str(),
            Self::Recommend => "recommend",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "home" => Some(Self::Home),
            "recommend" => Some(Self::Recommend),
            other => CatalogKind::from_str(other).map(Self::Catalog),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Catalog(kind) => kind.label(),
            Self::Recommend => "Recommend",
        }
    }
}
