use std::path::Path;

use crate::config::TrackDisplayField;

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Build a display string for a track according to the configured `fields`.
///
/// Fields that have no value for this track are skipped; when nothing is
/// produced at all, the title is used as-is.
pub fn display_from_fields(
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Display => {
                // "display" used as a field means the default "artist - title".
                parts.extend(non_empty(artist));
                parts.extend(non_empty(Some(title)));
            }
            TrackDisplayField::Title => parts.extend(non_empty(Some(title))),
            TrackDisplayField::Artist => parts.extend(non_empty(artist)),
            TrackDisplayField::Album => parts.extend(non_empty(album)),
            TrackDisplayField::Filename => {
                parts.extend(non_empty(path.file_stem().and_then(|s| s.to_str())));
            }
            TrackDisplayField::Path => parts.push(path.display().to_string()),
        }
    }

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_configured_fields_in_order() {
        let fields = [TrackDisplayField::Artist, TrackDisplayField::Title];
        let s = display_from_fields(
            Path::new("/music/song.mp3"),
            "Song",
            Some("  Artist "),
            None,
            &fields,
            " - ",
        );
        assert_eq!(s, "Artist - Song");
    }

    #[test]
    fn skips_missing_fields_and_falls_back_to_title() {
        let fields = [TrackDisplayField::Artist, TrackDisplayField::Album];
        let s = display_from_fields(Path::new("/music/song.mp3"), "Song", None, None, &fields, "::");
        assert_eq!(s, "Song");
    }

    #[test]
    fn filename_field_uses_the_stem() {
        let fields = [TrackDisplayField::Filename];
        let s = display_from_fields(
            Path::new("/music/03 - take five.flac"),
            "Take Five",
            None,
            None,
            &fields,
            " - ",
        );
        assert_eq!(s, "03 - take five");
    }
}
