//! Application module: the UI-side model.
//!
//! The `App` model lives in `app::model` and holds the album list, cursor
//! positions, pane focus and the current folder.

mod model;

pub use model::*;
