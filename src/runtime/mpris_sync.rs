use std::path::Path;

use crate::mpris::MprisHandle;
use crate::player::Player;

pub fn update_mpris(mpris: &MprisHandle, player: &Player, cover: Option<&Path>) {
    mpris.set_track_metadata(player.current_index(), player.current_track());
    mpris.set_art_url(cover);
    mpris.set_playback(player.state());
}
