use crate::mpris::MprisHandle;
use crate::playback::Player;

pub fn update_mpris(mpris: &MprisHandle, player: &Player) {
    let index = player.queue().current();
    mpris.set_track_metadata(index, player.queue().current_track());
    mpris.set_playback(player.state());
}
