use std::path::PathBuf;

use crate::library::Album;

/// Which pane owns the cursor keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pane {
    Albums,
    Tracks,
}

/// The UI-side model: cursors, focus and the current folder.
///
/// Playback state lives in the controller; this holds only what the
/// rendering and key handling need on top of it.
pub struct App {
    pub albums: Vec<Album>,
    pub album_selected: usize,
    pub track_selected: usize,
    pub track_count: usize,
    pub pane: Pane,

    /// The folder whose albums are listed. Fixed at startup.
    pub root: PathBuf,
    /// The folder whose tracks are currently loaded (changes per album).
    pub current_folder: PathBuf,
    /// Cover image of the current album, when there is one.
    pub current_cover: Option<PathBuf>,

    pub loading: bool,
    pub follow_playback: bool,
}

impl App {
    pub fn new(root: PathBuf) -> Self {
        Self {
            albums: Vec::new(),
            album_selected: 0,
            track_selected: 0,
            track_count: 0,
            pane: Pane::Tracks,
            current_folder: root.clone(),
            current_cover: None,
            root,
            loading: false,
            follow_playback: true,
        }
    }

    /// Replace the album list, keeping the cursor in range.
    pub fn set_albums(&mut self, albums: Vec<Album>) {
        self.albums = albums;
        if self.album_selected >= self.albums.len() {
            self.album_selected = 0;
        }
    }

    /// Record the size of the loaded playlist, keeping the cursor in range.
    pub fn set_track_count(&mut self, count: usize) {
        self.track_count = count;
        if self.track_selected >= count {
            self.track_selected = 0;
        }
    }

    pub fn selected_album(&self) -> Option<&Album> {
        self.albums.get(self.album_selected)
    }

    pub fn has_tracks(&self) -> bool {
        self.track_count > 0
    }

    /// Move the cursor in the focused pane, wrapping around.
    pub fn cursor_down(&mut self) {
        match self.pane {
            Pane::Tracks => self.track_selected = step_down(self.track_selected, self.track_count),
            Pane::Albums => self.album_selected = step_down(self.album_selected, self.albums.len()),
        }
    }

    /// Move the cursor in the focused pane, wrapping around.
    pub fn cursor_up(&mut self) {
        match self.pane {
            Pane::Tracks => self.track_selected = step_up(self.track_selected, self.track_count),
            Pane::Albums => self.album_selected = step_up(self.album_selected, self.albums.len()),
        }
    }

    pub fn toggle_pane(&mut self) {
        self.pane = match self.pane {
            Pane::Albums => Pane::Tracks,
            Pane::Tracks => Pane::Albums,
        };
    }

    /// Put the track cursor on `idx` (used to follow the playing track).
    pub fn set_track_selected(&mut self, idx: usize) {
        if idx < self.track_count {
            self.track_selected = idx;
        }
    }

    /// Enable following playback (cursor follows the playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    /// Disable follow-playback while the user browses.
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }
}

fn step_down(cur: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (cur + 1) % len }
}

fn step_up(cur: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (cur + len - 1) % len }
}
