//! Background folder loader.
//!
//! Scanning happens off the UI thread. Every result is tagged with the
//! folder it was requested for, so the event loop can drop results that
//! arrive after the user has already moved on to another folder.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::config::LibrarySettings;
use crate::library::{self, Album, Track};

pub enum LoaderCmd {
    /// Scan `folder` for tracks.
    LoadFolder { folder: PathBuf, autoplay: bool },
    /// List the album subfolders of `root`.
    ListAlbums { root: PathBuf },
}

pub enum LoaderEvent {
    FolderLoaded {
        /// The folder this result was computed for.
        folder: PathBuf,
        tracks: Vec<Track>,
        /// Start the first track immediately (album card click).
        autoplay: bool,
    },
    AlbumsListed {
        root: PathBuf,
        albums: Vec<Album>,
    },
}

pub struct LoaderHandle {
    tx: Sender<LoaderCmd>,
    rx: Receiver<LoaderEvent>,
}

impl LoaderHandle {
    pub fn request_folder(&self, folder: PathBuf, autoplay: bool) {
        let _ = self.tx.send(LoaderCmd::LoadFolder { folder, autoplay });
    }

    pub fn request_albums(&self, root: PathBuf) {
        let _ = self.tx.send(LoaderCmd::ListAlbums { root });
    }

    pub fn try_recv(&self) -> Option<LoaderEvent> {
        self.rx.try_recv().ok()
    }
}

pub fn spawn_loader(settings: LibrarySettings) -> LoaderHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoaderCmd>();
    let (ev_tx, ev_rx) = mpsc::channel::<LoaderEvent>();

    thread::spawn(move || {
        for cmd in cmd_rx {
            let event = match cmd {
                LoaderCmd::LoadFolder { folder, autoplay } => {
                    let tracks = library::scan(&folder, &settings);
                    LoaderEvent::FolderLoaded {
                        folder,
                        tracks,
                        autoplay,
                    }
                }
                LoaderCmd::ListAlbums { root } => {
                    let albums = library::list_albums(&root);
                    LoaderEvent::AlbumsListed { root, albums }
                }
            };
            if ev_tx.send(event).is_err() {
                break;
            }
        }
    });

    LoaderHandle {
        tx: cmd_tx,
        rx: ev_rx,
    }
}
