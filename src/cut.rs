//! Rewrites a movie header so that playback starts at a cut sample.
//!
//! All tables of every track are rebuilt to stay mutually consistent: sample numbering, chunk
//! layout, decoding timestamps, sync sample numbers and chunk byte offsets. The rewrite never
//! mutates the parsed tree, it produces new boxes.

use log::debug;

use crate::atom::{
    Co64, Ctts, CttsItem, Moov, SampleSizes, Stco, Stsc, StscItem, Stss, Stsz, Stts, SttsItem,
    Stz2, Trak, WriteAtom,
};
use crate::sample::{
    find_chunknum_stsc, find_mediatime_stts, find_samplenum_stts, get_chunk_offset,
};
use crate::ErrorKind;

/// A table of runs counting consecutive samples, cuttable at a sample number.
trait SampleRun: Copy {
    fn count(&self) -> u32;
    fn with_count(self, count: u32) -> Self;
}

impl SampleRun for SttsItem {
    fn count(&self) -> u32 {
        self.sample_count
    }

    fn with_count(mut self, count: u32) -> Self {
        self.sample_count = count;
        self
    }
}

impl SampleRun for CttsItem {
    fn count(&self) -> u32 {
        self.sample_count
    }

    fn with_count(mut self, count: u32) -> Self {
        self.sample_count = count;
        self
    }
}

/// Where a cut lands inside one track.
struct CutInfo {
    /// The first surviving sample (1-based).
    sample: u32,
    /// The chunk containing it (1-based).
    chunk: u32,
    /// The offset of the track's first chunk.
    zero_offset: u64,
    /// The offset of the cut chunk.
    chunk_offset: u64,
}

fn find_cut_trak_info(trak: &Trak, t: f64) -> crate::Result<CutInfo> {
    let ts = trak.mdia.mdhd.timescale;
    let stbl = trak.stbl();
    let mt = (t * ts as f64).round() as u64;
    let sample = find_samplenum_stts(&stbl.stts.items, mt);
    let chunk = find_chunknum_stsc(&stbl.stsc.items, sample)?;
    let stco64 = stbl.chunk_offsets()?;
    let chunk_offset = get_chunk_offset(&stco64, chunk)?;
    let zero_offset = get_chunk_offset(&stco64, 1)?;
    Ok(CutInfo { sample, chunk, zero_offset, chunk_offset })
}

/// Drops the chunk offsets before `chunk_num` and moves the remaining ones down by
/// `offset_change`. `first_chunk_delta` skips the bytes of discarded lead samples inside the
/// first surviving chunk.
fn cut_stco64(
    stco64: &[u64],
    chunk_num: u32,
    offset_change: i64,
    first_chunk_delta: u64,
) -> Vec<u64> {
    let mut new_table: Vec<u64> = stco64[chunk_num as usize - 1..]
        .iter()
        .map(|offset| (*offset as i64 - offset_change) as u64)
        .collect();
    if let Some(first) = new_table.first_mut() {
        *first += first_chunk_delta;
    }
    new_table
}

/// Cuts the chunk offset and sample to chunk tables in one step.
///
/// The chunk layout is renumbered relative to the cut chunk. When the cut lands inside a chunk
/// the first surviving chunk holds fewer samples than its range prescribes, so the first row is
/// split into a single-chunk row and the continuation starting at chunk 2, and the first chunk
/// offset is advanced past the discarded lead samples.
fn cut_stco64_stsc(
    stco64: &[u64],
    stsc: &[StscItem],
    sizes: &SampleSizes<'_>,
    chunk_num: u32,
    sample_num: u32,
    offset_change: i64,
) -> crate::Result<(Vec<u64>, Vec<StscItem>)> {
    if chunk_num == 0 || chunk_num as usize > stco64.len() {
        return Err(crate::Error::new(
            ErrorKind::Parsing,
            format!("Cut chunk {chunk_num} lies outside the offset table of {} chunks", stco64.len()),
        ));
    }

    let mut new_stsc = None;
    let mut current = 1u64;
    let mut per_chunk = 0u64;
    let mut sdidx = 0u32;
    let mut samples = 1u64;

    for (i, item) in stsc.iter().enumerate() {
        let next = item.first_chunk as u64;
        if next > chunk_num as u64 {
            let offset = chunk_num - 1;
            let mut table = vec![StscItem {
                first_chunk: 1,
                samples_per_chunk: per_chunk as u32,
                sample_description_id: sdidx,
            }];
            table.extend(
                stsc[i..].iter().map(|r| StscItem { first_chunk: r.first_chunk - offset, ..*r }),
            );
            new_stsc = Some(table);
            break;
        }
        samples += (next - current) * per_chunk;
        current = next;
        per_chunk = item.samples_per_chunk as u64;
        sdidx = item.sample_description_id;
    }
    let mut new_stsc = new_stsc.unwrap_or_else(|| {
        vec![StscItem {
            first_chunk: 1,
            samples_per_chunk: per_chunk as u32,
            sample_description_id: sdidx,
        }]
    });

    if per_chunk == 0 {
        return Err(crate::Error::new(
            ErrorKind::Parsing,
            "Sample to chunk (stsc) table resolves to 0 samples per chunk at the cut",
        ));
    }
    let lead_samples = (sample_num as u64 - samples) % per_chunk;

    let mut bytes_offset = 0;
    if lead_samples > 0 {
        let cut_idx = sample_num as u64 - 1;
        if cut_idx > sizes.count() {
            return Err(crate::Error::new(
                ErrorKind::Parsing,
                format!(
                    "Sample size table of {} entries doesn't cover the cut sample {sample_num}",
                    sizes.count()
                ),
            ));
        }
        bytes_offset = sizes.sum(cut_idx - lead_samples..cut_idx);

        let fstsc = new_stsc[0];
        new_stsc[0] = StscItem {
            first_chunk: 1,
            samples_per_chunk: fstsc.samples_per_chunk - lead_samples as u32,
            sample_description_id: fstsc.sample_description_id,
        };
        let continuation = StscItem { first_chunk: 2, ..fstsc };
        if new_stsc.len() > 1 && new_stsc[1].first_chunk == 2 {
            // the cut chunk is the last of its range, the next row already covers chunk 2
        } else {
            new_stsc.insert(1, continuation);
        }
    }

    Ok((cut_stco64(stco64, chunk_num, offset_change, bytes_offset), new_stsc))
}

/// Cuts an `stts` or `ctts` run table at `sample`, keeping the tail of the run containing it.
fn cut_sctts<T: SampleRun>(table: &[T], sample: u32) -> crate::Result<Vec<T>> {
    let sample = sample as u64;
    let mut samples = 1u64;
    for (i, run) in table.iter().enumerate() {
        let count = run.count() as u64;
        if samples + count > sample {
            let mut new_table = Vec::with_capacity(table.len() - i);
            new_table.push(run.with_count((samples + count - sample) as u32));
            new_table.extend_from_slice(&table[i + 1..]);
            return Ok(new_table);
        }
        samples += count;
    }
    Err(crate::Error::new(
        ErrorKind::Parsing,
        format!("Sample {sample} lies past the end of the timing table"),
    ))
}

/// Drops sync samples before `sample` and renumbers the remaining ones so `sample` becomes 1.
fn cut_stss(stss: &[u32], sample: u32) -> Vec<u32> {
    stss.iter().filter(|s| **s >= sample).map(|s| s - sample + 1).collect()
}

/// Rebuilds a track's sample table so that `sample` becomes sample 1 and every chunk offset
/// moves down by `offset_change`.
fn cut_trak(trak: &Trak, sample: u32, offset_change: i64) -> crate::Result<Trak> {
    let stbl = trak.stbl();
    let chunk = find_chunknum_stsc(&stbl.stsc.items, sample)?;
    let media_time_diff = find_mediatime_stts(&stbl.stts.items, sample);
    let new_media_duration = trak.mdia.mdhd.duration.saturating_sub(media_time_diff);

    let stco64 = stbl.chunk_offsets()?;
    let sizes = stbl.sample_sizes()?;
    let (new_stco64, new_stsc) =
        cut_stco64_stsc(&stco64, &stbl.stsc.items, &sizes, chunk, sample, offset_change)?;

    let mut new_stbl = stbl.clone();
    new_stbl.stsc = Stsc { items: new_stsc };
    new_stbl.stts = Stts { items: cut_sctts(&stbl.stts.items, sample)? };
    if let Some(ctts) = &stbl.ctts {
        new_stbl.ctts =
            Some(Ctts { version: ctts.version, flags: ctts.flags, items: cut_sctts(&ctts.items, sample)? });
    }
    if let Some(stss) = &stbl.stss {
        new_stbl.stss = Some(Stss { samples: cut_stss(&stss.samples, sample) });
    }

    fn cut_sizes(sizes: &[u32], skip: u32) -> crate::Result<Vec<u32>> {
        sizes.get(skip as usize..).map(<[u32]>::to_vec).ok_or_else(|| {
            crate::Error::new(
                ErrorKind::Parsing,
                format!("Sample size table of {} entries ends before the cut sample", sizes.len()),
            )
        })
    }

    let skip = sample - 1;
    if let Some(stsz) = &stbl.stsz {
        new_stbl.stsz = Some(match stsz.sample_size {
            0 => {
                let sizes = cut_sizes(&stsz.sizes, skip)?;
                Stsz { sample_size: 0, sample_count: sizes.len() as u32, sizes }
            }
            s => Stsz {
                sample_size: s,
                sample_count: stsz.sample_count.saturating_sub(skip),
                sizes: Vec::new(),
            },
        });
    } else if let Some(stz2) = &stbl.stz2 {
        new_stbl.stz2 =
            Some(Stz2 { field_size: stz2.field_size, sizes: cut_sizes(&stz2.sizes, skip)? });
    }

    if stbl.stco.is_some() {
        new_stbl.stco = Some(Stco { offsets: new_stco64.iter().map(|o| *o as u32).collect() });
    } else {
        new_stbl.co64 = Some(Co64 { offsets: new_stco64 });
    }

    let mut new_trak = trak.clone();
    new_trak.mdia.mdhd.duration = new_media_duration;
    new_trak.mdia.minf.stbl = new_stbl;
    Ok(new_trak)
}

/// Moves every chunk offset of the track down by `offset_change`.
pub(crate) fn update_offsets(trak: &mut Trak, offset_change: i64) {
    let stbl = &mut trak.mdia.minf.stbl;
    if let Some(stco) = &mut stbl.stco {
        for o in stco.offsets.iter_mut() {
            *o = (*o as i64 - offset_change) as u32;
        }
    } else if let Some(co64) = &mut stbl.co64 {
        for o in co64.offsets.iter_mut() {
            *o = (*o as i64 - offset_change) as u64;
        }
    }
}

/// Rewrites the movie header for a cut at `t` seconds.
///
/// Returns the new header, the number of media bytes dropped before the first surviving chunk,
/// and the absolute source offset at which the surviving media data starts. Chunk offsets in
/// the returned header already account for the size change of the header itself.
pub fn cut_moov(moov: &Moov, t: f64) -> crate::Result<(Moov, u64, u64)> {
    let t = t.max(0.0);
    let ts = moov.mvhd.timescale;
    if t * ts as f64 >= moov.mvhd.duration as f64 {
        return Err(crate::Error::new(
            ErrorKind::ExceededDuration,
            format!("Cut time {t}s lies at or past the movie duration of {}s", moov.duration()),
        ));
    }

    let cut_info = moov
        .trak
        .iter()
        .map(|a| find_cut_trak_info(a, t))
        .collect::<crate::Result<Vec<_>>>()?;
    debug!("movie timescale: {ts}, tracks: {}", moov.trak.len());

    // min() is safe, a parsed moov carries at least one track
    let new_data_offset = cut_info.iter().map(|ci| ci.chunk_offset).min().unwrap_or(0);
    let zero_offset = cut_info.iter().map(|ci| ci.zero_offset).min().unwrap_or(0);
    if new_data_offset < zero_offset {
        return Err(crate::Error::new(
            ErrorKind::Parsing,
            "Chunk offsets decrease towards the cut point",
        ));
    }
    let data_offset_change = (new_data_offset - zero_offset) as i64;
    debug!("new data offset: {new_data_offset}, delta: {data_offset_change}");

    let new_traks = moov
        .trak
        .iter()
        .zip(cut_info.iter())
        .map(|(a, ci)| {
            debug!("cutting track at sample {} in chunk {}", ci.sample, ci.chunk);
            cut_trak(a, ci.sample, data_offset_change)
        })
        .collect::<crate::Result<Vec<_>>>()?;

    let mut new_moov = moov.clone();
    new_moov.trak = new_traks;

    let moov_size_diff = moov.len() as i64 - new_moov.len() as i64;
    debug!("moov size shrinks by {moov_size_diff} bytes");

    for trak in new_moov.trak.iter_mut() {
        let mdhd = &trak.mdia.mdhd;
        trak.tkhd.duration = mdhd.duration * ts as u64 / mdhd.timescale as u64;
        // the chunks land lower in the file once the smaller header is in place
        update_offsets(trak, moov_size_diff);
    }

    Ok((new_moov, (new_data_offset - zero_offset), new_data_offset))
}
