// src/app/cache.rs
// on-disk artwork cache (md5 keyed PNGs) and the cache root
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Once, OnceLock};
use std::time::{Duration, SystemTime};

use image::{imageops::FilterType, GenericImageView, ImageFormat};
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::config::{is_http, load_config, resolve_relative_path, DEFAULT_CACHE_DIR};

static CACHE_DIR_ONCE: OnceLock<PathBuf> = OnceLock::new();
static ARTWORK_DIR_ONCE: OnceLock<PathBuf> = OnceLock::new();
static ARTWORK_PRUNE_ONCE: Once = Once::new();

const ARTWORK_RETENTION_DAYS: u64 = 14;
const ARTWORK_RETENTION_SECS: u64 = ARTWORK_RETENTION_DAYS * 24 * 60 * 60;

/// Thumbnails wider than this are scaled down before caching.
pub const ARTWORK_MAX_W: u32 = 300;

pub fn cache_dir() -> PathBuf {
    CACHE_DIR_ONCE
        .get_or_init(|| {
            let cfg = load_config();
            let mut path = resolve_relative_path(
                cfg.cache_dir.as_deref().unwrap_or(DEFAULT_CACHE_DIR),
            );
            if let Err(e) = fs::create_dir_all(&path) {
                warn!("failed to create cache dir {}: {e}", path.display());
                path = resolve_relative_path(DEFAULT_CACHE_DIR);
                let _ = fs::create_dir_all(&path);
            }
            path
        })
        .clone()
}

/// `<cache>/artwork`, pruned of stale files once per session.
pub fn artwork_cache_dir() -> PathBuf {
    let dir = ARTWORK_DIR_ONCE.get_or_init(|| {
        let mut path = cache_dir().join("artwork");
        if let Err(e) = fs::create_dir_all(&path) {
            warn!("failed to create artwork dir {}: {e}", path.display());
            path = cache_dir();
        }
        path
    });

    ARTWORK_PRUNE_ONCE.call_once({
        let path = dir.clone();
        move || match prune_artwork_in_dir(&path) {
            Ok(n) if n > 0 => debug!("pruned {n} stale artwork file(s)"),
            Ok(_) => {}
            Err(err) => warn!("artwork cache prune failed: {err}"),
        }
    });

    dir.clone()
}

pub fn prune_artwork_in_dir(dir: &Path) -> std::io::Result<usize> {
    prune_older_than(dir, Duration::from_secs(ARTWORK_RETENTION_SECS))
}

fn prune_older_than(dir: &Path, max_age: Duration) -> std::io::Result<usize> {
    let cutoff = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);
    let mut removed = 0usize;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        // leftover partial writes always go
        let stale_part = ext.as_deref() == Some("part");
        if !stale_part && ext.as_deref() != Some("png") {
            continue;
        }
        let modified = entry
            .metadata()?
            .modified()
            .unwrap_or(SystemTime::UNIX_EPOCH);
        if stale_part || modified < cutoff {
            let _ = fs::remove_file(&path);
            removed += 1;
        }
    }
    Ok(removed)
}

pub fn url_to_cache_key(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

pub fn cached_artwork_path(dir: &Path, source: &str) -> PathBuf {
    dir.join(format!("{}.png", url_to_cache_key(source)))
}

/// Return (width, height, RGBA8 bytes) decoded from an image file.
pub fn load_rgba(path: &Path) -> Result<(u32, u32, Vec<u8>), String> {
    let img = image::ImageReader::open(path)
        .map_err(|e| format!("open image {}: {e}", path.display()))?
        .with_guessed_format()
        .map_err(|e| format!("guess format {}: {e}", path.display()))?
        .decode()
        .map_err(|e| format!("decode {}: {e}", path.display()))?;
    let (w, h) = img.dimensions();
    Ok((w, h, img.to_rgba8().into_raw()))
}

/// Raw bytes from an http(s) URL or a local file path.
fn fetch_source(client: &Client, source: &str) -> Result<Vec<u8>, String> {
    if is_http(source) {
        let resp = client
            .get(source)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| format!("GET {source}: {e}"))?;
        resp.bytes()
            .map(|b| b.to_vec())
            .map_err(|e| format!("read body: {e}"))
    } else {
        let path = resolve_relative_path(source);
        fs::read(&path).map_err(|e| format!("read {}: {e}", path.display()))
    }
}

/// Decode, shrink to `max_w` and write as PNG via a `.part` file.
pub fn store_artwork(bytes: &[u8], dest: &Path, max_w: u32) -> Result<(), String> {
    let img = image::load_from_memory(bytes).map_err(|e| format!("decode artwork: {e}"))?;
    let (w, h) = img.dimensions();
    let img = if w > max_w {
        let new_h = ((h as f32) * (max_w as f32 / w as f32)).round().max(1.0) as u32;
        img.resize_exact(max_w, new_h, FilterType::CatmullRom)
    } else {
        img
    };

    let mut png_bytes: Vec<u8> = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| format!("encode png: {e}"))?;

    if let Some(parent) = dest.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let tmp = dest.with_extension("png.part");
    fs::write(&tmp, &png_bytes).map_err(|e| format!("write {}: {e}", tmp.display()))?;
    fs::rename(&tmp, dest).map_err(|e| format!("rename {}: {e}", dest.display()))?;
    Ok(())
}

/// Cached path for `source`, fetching and converting it on a miss.
pub fn ensure_artwork(client: &Client, dir: &Path, source: &str) -> Result<PathBuf, String> {
    let dest = cached_artwork_path(dir, source);
    if dest.exists() {
        return Ok(dest);
    }
    let bytes = fetch_source(client, source)?;
    store_artwork(&bytes, &dest, ARTWORK_MAX_W)?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 10, 10, 255]));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn keys_are_stable_md5() {
        assert_eq!(url_to_cache_key("a"), "0cc175b9c0f1b6a831c399e269772661");
        let dir = Path::new("/tmp/x");
        assert_eq!(
            cached_artwork_path(dir, "a"),
            dir.join("0cc175b9c0f1b6a831c399e269772661.png")
        );
    }

    #[test]
    fn local_sources_are_converted_and_shrunk() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("42.thumb.webp");
        fs::write(&src, tiny_png(600, 900)).unwrap();

        let client = Client::new();
        let cache = dir.path().join("artwork");
        let src_str = src.to_string_lossy().to_string();
        let out = ensure_artwork(&client, &cache, &src_str).unwrap();
        let (w, h, rgba) = load_rgba(&out).unwrap();
        assert_eq!((w, h), (ARTWORK_MAX_W, 450));
        assert_eq!(rgba.len(), (w * h * 4) as usize);

        // second call is a cache hit even if the source disappears
        fs::remove_file(&src).unwrap();
        assert_eq!(ensure_artwork(&client, &cache, &src_str).unwrap(), out);
    }

    #[test]
    fn undecodable_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("bad.webp");
        fs::write(&src, b"not an image").unwrap();
        let res = ensure_artwork(
            &Client::new(),
            dir.path(),
            &src.to_string_lossy(),
        );
        assert!(res.is_err());
        assert!(fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .all(|e| e.path().extension().and_then(|x| x.to_str()) != Some("png")));
    }

    #[test]
    fn prune_drops_partials_and_keeps_fresh_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fresh.png"), b"x").unwrap();
        fs::write(dir.path().join("half.png.part"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        assert_eq!(prune_artwork_in_dir(dir.path()).unwrap(), 1);
        assert!(dir.path().join("fresh.png").exists());
        assert!(dir.path().join("notes.txt").exists());

        // everything png is stale with a zero retention window
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(prune_older_than(dir.path(), Duration::ZERO).unwrap(), 1);
    }
}
