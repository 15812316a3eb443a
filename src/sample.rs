//! Pure arithmetic over the sample tables.
//!
//! Sample and chunk numbers are 1-based to match the on-disk model, media times are in the
//! track's timescale.

use crate::atom::{StscItem, SttsItem};

/// Finds the number of the sample covering media time `mt`.
///
/// A media time on a sample boundary resolves to the sample starting there. Media times past
/// the end of the table yield the total sample count plus one.
pub fn find_samplenum_stts(table: &[SttsItem], mt: u64) -> u32 {
    let mut ctime = 0u64;
    let mut samples = 1u64;
    for item in table {
        if mt == ctime {
            break;
        }
        let count = item.sample_count as u64;
        let delta = item.sample_delta as u64;
        let cdelta = count * delta;
        if mt < ctime + cdelta {
            samples += (mt - ctime).div_ceil(delta);
            break;
        }
        ctime += cdelta;
        samples += count;
    }
    samples as u32
}

/// Finds the media time at which `sample` starts decoding.
///
/// Samples past the end of the table yield the total duration.
pub fn find_mediatime_stts(table: &[SttsItem], sample: u32) -> u64 {
    let sample = sample as u64;
    let mut ctime = 0u64;
    let mut samples = 1u64;
    for item in table {
        let count = item.sample_count as u64;
        let delta = item.sample_delta as u64;
        if samples + count >= sample {
            return ctime + (sample - samples) * delta;
        }
        ctime += count * delta;
        samples += count;
    }
    ctime
}

/// Finds the media times of several samples in one table walk.
///
/// `samples` must be non-decreasing; entries past the end of the table produce no output.
pub fn find_mediatimes(table: &[SttsItem], samples: &[u32]) -> Vec<u64> {
    let mut ctime = 0u64;
    let mut total_samples = 1u64;
    let mut ret = Vec::with_capacity(samples.len());
    let mut i = 0;
    let mut j = 0;
    while i < table.len() && j < samples.len() {
        let count = table[i].sample_count as u64;
        let delta = table[i].sample_delta as u64;
        let sample = samples[j] as u64;
        if total_samples + count >= sample {
            ret.push(ctime + (sample - total_samples) * delta);
            j += 1;
            continue;
        }
        ctime += count * delta;
        total_samples += count;
        i += 1;
    }
    ret
}

/// Finds the number of the chunk containing `sample_num`.
///
/// Samples past the last range are resolved against that range's samples per chunk.
pub fn find_chunknum_stsc(table: &[StscItem], sample_num: u32) -> crate::Result<u32> {
    let sample = sample_num as u64;
    let mut current = 1u64;
    let mut per_chunk = 0u64;
    let mut samples = 1u64;
    for item in table {
        let next = item.first_chunk as u64;
        let samples_here = (next - current) * per_chunk;
        if samples + samples_here > sample {
            break;
        }
        samples += samples_here;
        current = next;
        per_chunk = item.samples_per_chunk as u64;
    }
    if per_chunk == 0 {
        return Err(crate::Error::new(
            crate::ErrorKind::Parsing,
            format!("Sample {sample_num} resolves to a chunk range with 0 samples per chunk"),
        ));
    }
    Ok(((sample - samples) / per_chunk + current) as u32)
}

/// Returns the file offset of the 1-based `chunk_num`.
pub fn get_chunk_offset(stco64: &[u64], chunk_num: u32) -> crate::Result<u64> {
    if chunk_num == 0 {
        return Err(crate::Error::new(crate::ErrorKind::Parsing, "Chunk numbers start at 1"));
    }
    stco64.get(chunk_num as usize - 1).copied().ok_or_else(|| {
        crate::Error::new(
            crate::ErrorKind::Parsing,
            format!(
                "Chunk {chunk_num} lies outside the offset table of {} chunks",
                stco64.len()
            ),
        )
    })
}
