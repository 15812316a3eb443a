//! Moves the movie header in front of the media data so playback can start while the file is
//! still downloading.

use std::io::{Read, Seek, Write};

use log::debug;

use crate::atom::{copy_range, read_file, Moov, WriteAtom, WIDE};
use crate::cut::update_offsets;

/// Adds `data_offset` bytes to every chunk offset in every track.
pub(crate) fn change_chunk_offsets(moov: &mut Moov, data_offset: i64) {
    for trak in moov.trak.iter_mut() {
        update_offsets(trak, -data_offset);
    }
}

/// Rewrites the file with the movie header moved in front of the media data.
///
/// Returns `false` without writing anything if the header already precedes the media data;
/// applying the transform a second time is therefore a no-op. Chunk offsets grow by the size
/// of the movie header; 32 bit offset tables that would overflow are promoted to their 64 bit
/// form first, and the shift is recomputed until the header size settles.
pub fn move_header_and_write(
    src: &mut (impl Read + Seek),
    dst: &mut impl Write,
) -> crate::Result<bool> {
    let mut file = read_file(src)?;
    let moov_idx = file.moov_idx;
    let mdat_idx = file.mdat_idx();

    if moov_idx < mdat_idx {
        return Ok(false);
    }

    let mdat = &file.atoms[mdat_idx];
    let mut new_moov_idx = mdat_idx;
    // a wide atom glued to the media data stays glued
    if let Some(prev) = mdat_idx.checked_sub(1).map(|i| &file.atoms[i]) {
        if prev.fourcc() == WIDE && prev.end() == mdat.pos() {
            new_moov_idx = mdat_idx - 1;
        }
    }

    let mut data_offset = file.moov.len();
    loop {
        for trak in file.moov.trak.iter_mut() {
            let stbl = &mut trak.mdia.minf.stbl;
            let overflows = stbl.stco.as_ref().is_some_and(|stco| {
                stco.offsets.iter().any(|o| *o as u64 + data_offset > u32::MAX as u64)
            });
            if overflows {
                debug!("promoting an overflowing chunk offset table to 64 bits");
                stbl.promote_chunk_offsets();
            }
        }
        // promotions grow the header and with it the shift, so settle to a fixed point
        let promoted_offset = file.moov.len();
        if promoted_offset == data_offset {
            break;
        }
        data_offset = promoted_offset;
    }
    debug!("shifting chunk offsets by {data_offset} bytes");
    change_chunk_offsets(&mut file.moov, data_offset as i64);

    let mut order: Vec<usize> = (0..file.atoms.len()).filter(|i| *i != moov_idx).collect();
    let insert_at = order.iter().position(|i| *i == new_moov_idx).unwrap_or(order.len());
    order.insert(insert_at, moov_idx);

    for idx in order {
        if idx == moov_idx {
            file.moov.write(dst)?;
        } else {
            let a = &file.atoms[idx];
            copy_range(src, dst, a.pos(), a.len())?;
        }
    }

    Ok(true)
}
