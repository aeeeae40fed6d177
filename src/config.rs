use std::{fs, path::Path, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_DATA_SOURCE: &str = "data";
pub const DEFAULT_IMAGE_BASE: &str = "assets/images";
pub const DEFAULT_CACHE_DIR: &str = ".mediashelf_cache";

pub const DEFAULT_LOOKAHEAD_PX: f32 = 200.0;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_ARTWORK_WORKERS: usize = 8;

/// How the session receives input. Decides overlay dismissal and the
/// child-grid render strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Auto,
    Pointer,
    Touch,
}

impl InputMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Some(Self::Auto),
            "pointer" | "mouse" | "desktop" => Some(Self::Pointer),
            "touch" | "mobile" => Some(Self::Touch),
            _ => None,
        }
    }
}

impl Default for InputMode {
    fn default() -> Self {
        Self::Auto
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Directory or http(s) base URL holding `<kind>_ref.json` snapshots.
    pub data_source: String,
    /// Directory or http(s) base URL holding `<category>_image/` folders.
    pub image_base: String,
    pub cache_dir: Option<String>,
    pub lookahead_px: f32,
    /// Filtered result sets at or below this size render eagerly.
    pub eager_threshold: usize,
    pub search_debounce_ms: u64,
    pub input_mode: InputMode,
    pub artwork_workers: usize,
    pub recommendations_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            cache_dir: None,
            lookahead_px: DEFAULT_LOOKAHEAD_PX,
            eager_threshold: usize::MAX,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            input_mode: InputMode::default(),
            artwork_workers: DEFAULT_ARTWORK_WORKERS,
            recommendations_file: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "data_dir")]
    data_source: Option<String>,
    image_base: Option<String>,
    cache_dir: Option<String>,
    lookahead_px: Option<f32>,
    eager_threshold: Option<usize>,
    search_debounce_ms: Option<u64>,
    input_mode: Option<String>,
    artwork_workers: Option<usize>,
    recommendations_file: Option<String>,
}

pub fn load_config() -> AppConfig {
    load_config_from(Path::new(CONFIG_FILE))
}

pub fn load_config_from(cfg_path: &Path) -> AppConfig {
    let mut cfg = AppConfig::default();

    match fs::read_to_string(cfg_path) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                if let Some(src) = parsed.data_source.filter(|s| !s.trim().is_empty()) {
                    cfg.data_source = src;
                    if raw.contains("\"data_dir\"") {
                        warn!("`data_dir` is deprecated; rename it to `data_source` in config.json.");
                    }
                }
                if let Some(base) = parsed.image_base.filter(|s| !s.trim().is_empty()) {
                    cfg.image_base = base;
                }
                if parsed.cache_dir.is_some() {
                    cfg.cache_dir = parsed.cache_dir;
                }
                if let Some(px) = parsed.lookahead_px {
                    if px.is_finite() && px >= 0.0 {
                        cfg.lookahead_px = px;
                    } else {
                        warn!("Ignoring invalid lookahead_px {px} in config.json.");
                    }
                }
                if let Some(n) = parsed.eager_threshold {
                    cfg.eager_threshold = n;
                }
                if let Some(ms) = parsed.search_debounce_ms {
                    cfg.search_debounce_ms = ms;
                }
                if let Some(mode) = parsed.input_mode {
                    match InputMode::from_str(&mode) {
                        Some(m) => cfg.input_mode = m,
                        None => warn!(
                            "Unknown input_mode `{mode}` in config.json; falling back to auto."
                        ),
                    }
                }
                if let Some(n) = parsed.artwork_workers {
                    cfg.artwork_workers = n.clamp(1, 32);
                }
                if parsed.recommendations_file.is_some() {
                    cfg.recommendations_file = parsed.recommendations_file;
                }
                info!("Loaded config from {}", cfg_path.display());
            }
            Err(err) => {
                warn!("Failed to parse {} ({}). Using defaults.", cfg_path.display(), err);
            }
        },
        Err(_) => {
            info!("No {} found; using defaults", cfg_path.display());
        }
    }

    cfg
}

/// Relative paths resolve against the working directory; absolute ones pass through.
pub fn resolve_relative_path(p: &str) -> PathBuf {
    let path = PathBuf::from(p);
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

pub fn is_http(s: &str) -> bool {
    let lower = s.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
