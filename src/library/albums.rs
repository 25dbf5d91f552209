//! Album discovery.
//!
//! Every immediate subfolder of the music root is an album card. An optional
//! `info.json` inside the folder supplies a display title and description; a
//! `cover.*` image, when present, is recorded so UI layers can reference it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::model::Album;

/// Shape of the optional `info.json` inside an album folder.
#[derive(Debug, Deserialize)]
struct AlbumInfo {
    title: Option<String>,
    description: Option<String>,
}

const COVER_NAMES: [&str; 3] = ["cover.jpg", "cover.jpeg", "cover.png"];

/// List the album subfolders of `root`, sorted by title.
///
/// A missing or malformed `info.json` falls back to the folder name with no
/// description. An unreadable `root` yields an empty list, never an error.
pub fn list_albums(root: &Path) -> Vec<Album> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };

    let mut albums: Vec<Album> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .filter_map(|p| album_from_dir(&p))
        .collect();

    albums.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    albums
}

fn album_from_dir(dir: &Path) -> Option<Album> {
    let name = dir.file_name()?.to_str()?.to_string();
    // Dotfolders are never albums.
    if name.starts_with('.') {
        return None;
    }

    let info = read_info(dir);
    let title = info
        .as_ref()
        .and_then(|i| i.title.clone())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or(name);
    let description = info
        .and_then(|i| i.description)
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    Some(Album {
        folder: dir.to_path_buf(),
        title,
        description,
        cover: find_cover(dir),
    })
}

fn read_info(dir: &Path) -> Option<AlbumInfo> {
    let raw = fs::read_to_string(dir.join("info.json")).ok()?;
    serde_json::from_str(&raw).ok()
}

fn find_cover(dir: &Path) -> Option<PathBuf> {
    COVER_NAMES.iter().map(|n| dir.join(n)).find(|p| p.is_file())
}
