//! Emits the output of a cut: the rewritten header followed by resized media data heads.
//!
//! The emitter only produces the bytes up to the media data; the surviving media bytes are
//! copied verbatim from the source by the caller (or by [`split_and_write`]), starting at the
//! returned offset.

use std::io::{self, Read, Seek, SeekFrom, Write};

use log::debug;

use crate::atom::{
    copy_range, read_file, write_head, AtomBounds, Head, Moov, Mp4File, WriteAtom, MEDIA_DATA,
};
use crate::cut::cut_moov;
use crate::sync::{find_nearest_syncpoint, find_sync_points};
use crate::ErrorKind;

/// Cuts the source at the sync point nearest to `t` seconds and writes the new header to
/// `dst`.
///
/// Returns the source offset of the first surviving media byte; the caller appends everything
/// from there to the end of the source.
pub fn split_atoms(
    src: &mut (impl Read + Seek),
    dst: &mut impl Write,
    t: f64,
) -> crate::Result<u64> {
    let file = read_file(src)?;
    let t = find_nearest_syncpoint(&file.moov, t);
    debug!("nearest sync point: {t}s");
    let (new_moov, delta, new_data_offset) = cut_moov(&file.moov, t)?;

    write_split_header(src, dst, &file, &new_moov, delta)?;

    Ok(new_data_offset)
}

/// Shrinks the media data heads spanning the discarded region by `size_delta` bytes in total,
/// preserving 64 bit size encodings.
fn update_mdat_atoms(atoms: &[&AtomBounds], size_delta: u64) -> crate::Result<Vec<Head>> {
    let mut updated = Vec::new();
    let mut to_remove = size_delta;
    for a in atoms {
        let size_change = a.content_len().min(to_remove);
        to_remove -= size_change;
        updated.push(Head::new(a.ext(), a.len() - size_change, a.fourcc()));
        if to_remove == 0 {
            break;
        }
    }
    if to_remove > 0 {
        return Err(crate::Error::new(
            ErrorKind::Parsing,
            format!("Media data atoms end {to_remove} bytes before the cut point"),
        ));
    }
    Ok(updated)
}

/// Writes every atom up to the media data, with the movie header replaced by `new_moov`,
/// followed by the resized media data heads.
fn write_split_header(
    reader: &mut (impl Read + Seek),
    writer: &mut impl Write,
    file: &Mp4File,
    new_moov: &Moov,
    size_delta: u64,
) -> crate::Result<()> {
    let mdat_idx = file.mdat_idx();
    if file.moov_idx > mdat_idx {
        return Err(crate::Error::new(
            ErrorKind::Parsing,
            "The movie header follows the media data; move the header to the front before cutting",
        ));
    }

    let mdat = &file.atoms[mdat_idx];
    let cut_offset = mdat.content_pos() + size_delta;
    let to_update: Vec<&AtomBounds> =
        file.atoms[mdat_idx..].iter().filter(|a| a.pos() < cut_offset).collect();
    if to_update.iter().any(|a| a.fourcc() != MEDIA_DATA) {
        return Err(crate::Error::new(
            ErrorKind::Parsing,
            "Media data and other atoms are interleaved across the discarded region",
        ));
    }
    let updated_mdats = update_mdat_atoms(&to_update, size_delta)?;

    for (i, a) in file.atoms[..mdat_idx].iter().enumerate() {
        if i == file.moov_idx {
            new_moov.write(writer)?;
        } else {
            copy_range(reader, writer, a.pos(), a.len())?;
        }
    }
    for head in updated_mdats {
        write_head(writer, head)?;
    }

    Ok(())
}

/// Cuts the source at the sync point nearest to `t` seconds.
///
/// Returns the rendered header bytes and the source offset from which the media bytes are
/// copied. Nothing is rendered if the cut fails.
pub fn split(src: &mut (impl Read + Seek), t: f64) -> crate::Result<(Vec<u8>, u64)> {
    let mut header = Vec::new();
    let new_data_offset = split_atoms(src, &mut header, t)?;
    Ok((header, new_data_offset))
}

/// Cuts the source at the sync point nearest to `t` seconds and writes the complete output
/// file to `dst`.
pub fn split_and_write(
    src: &mut (impl Read + Seek),
    dst: &mut impl Write,
    t: f64,
) -> crate::Result<()> {
    let (header, new_data_offset) = split(src, t)?;
    dst.write_all(&header)?;
    src.seek(SeekFrom::Start(new_data_offset))?;
    io::copy(src, dst)?;
    Ok(())
}

/// The sync points of the source in seconds.
pub fn get_sync_points(src: &mut (impl Read + Seek)) -> crate::Result<Vec<f64>> {
    let file = read_file(src)?;
    Ok(find_sync_points(&file.moov))
}

/// The sync point of the source nearest to `t` seconds.
pub fn get_nearest_syncpoint(src: &mut (impl Read + Seek), t: f64) -> crate::Result<f64> {
    let file = read_file(src)?;
    Ok(find_nearest_syncpoint(&file.moov, t))
}
