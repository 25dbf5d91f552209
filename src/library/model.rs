use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    pub display: String,
}

/// One album card: a subfolder of the music root, with optional metadata
/// from its `info.json` and a cover image when one exists.
#[derive(Clone)]
pub struct Album {
    pub folder: PathBuf,
    pub title: String,
    pub description: Option<String>,
    pub cover: Option<PathBuf>,
}
