//! Track source: folder scanning and album discovery.
//!
//! `scan` lists the playable tracks under a folder; `list_albums` turns the
//! subfolders of the music root into album cards with optional `info.json`
//! metadata and cover images.

mod albums;
mod display;
mod model;
mod scan;

pub use albums::*;
pub use display::*;
pub use model::*;
pub use scan::*;
