//! Picks the sync sample a cut may start at.

use crate::atom::{Moov, Trak};
use crate::sample::find_mediatimes;

/// The media times of a track's sync samples in seconds, if it has any.
fn sync_seconds(trak: &Trak) -> Option<Vec<f64>> {
    let stbl = trak.stbl();
    let stss = stbl.stss.as_ref()?;
    if stss.samples.is_empty() {
        return None;
    }
    let ts = trak.mdia.mdhd.timescale as f64;
    Some(find_mediatimes(&stbl.stts.items, &stss.samples).iter().map(|mt| *mt as f64 / ts).collect())
}

/// The sync points of the movie in seconds.
///
/// Sync points come from a single track: the first video track carrying an `stss` atom, or
/// failing that the first track carrying one. Tracks without an `stss` atom contribute
/// nothing.
pub fn find_sync_points(moov: &Moov) -> Vec<f64> {
    let video = moov
        .trak
        .iter()
        .filter(|a| a.mdia.hdlr.as_ref().map_or(false, |h| h.is_video()))
        .find_map(sync_seconds);
    if let Some(syncs) = video {
        return syncs;
    }
    moov.trak.iter().find_map(sync_seconds).unwrap_or_default()
}

/// Snaps `t` to the nearest sync point.
///
/// Ties between two equidistant sync points resolve to the earlier one. Without any sync
/// points `t` is clamped to `[0, duration - 0.1s]`.
pub fn find_nearest_syncpoint(moov: &Moov, t: f64) -> f64 {
    let syncs = find_sync_points(moov);

    if syncs.is_empty() {
        let max_ts = moov.duration() - 0.1;
        return t.min(max_ts).max(0.0);
    }

    let mut found = 0.0;
    let mut other = 0.0;
    for ss in syncs {
        if ss > t {
            other = ss;
            break;
        }
        found = ss;
    }
    if (t - found).abs() <= (other - t).abs() {
        found
    } else {
        other
    }
}
