//! Builds small synthetic mp4 files through the crate's own box model.
#![allow(dead_code)]

use mp4cut::atom::*;

pub fn ftyp() -> Ftyp {
    Ftyp {
        major_brand: Fourcc(*b"isom"),
        minor_version: 512,
        rest: b"isomiso2avc1mp41".to_vec(),
    }
}

pub fn mvhd(timescale: u32, duration: u64) -> Mvhd {
    Mvhd { version: 0, flags: [0; 3], times: vec![0; 8], timescale, duration, rest: vec![0; 80] }
}

pub fn tkhd(id: u32, duration: u64) -> Tkhd {
    Tkhd {
        version: 0,
        flags: [0, 0, 7],
        times: vec![0; 8],
        id,
        reserved: [0; 4],
        duration,
        rest: vec![0; 60],
    }
}

pub fn mdhd(timescale: u32, duration: u64) -> Mdhd {
    Mdhd { version: 0, flags: [0; 3], times: vec![0; 8], timescale, duration, rest: vec![0; 4] }
}

pub fn hdlr(handler_type: &[u8; 4], name: &str) -> Hdlr {
    let mut rest = vec![0; 12];
    rest.extend_from_slice(name.as_bytes());
    rest.push(0);
    Hdlr { version: 0, flags: [0; 3], pre: [0; 4], handler_type: Fourcc(*handler_type), rest }
}

pub fn stts(items: &[(u32, u32)]) -> Stts {
    Stts {
        items: items
            .iter()
            .map(|(c, d)| SttsItem { sample_count: *c, sample_delta: *d })
            .collect(),
    }
}

pub fn stsc(items: &[(u32, u32, u32)]) -> Stsc {
    Stsc {
        items: items
            .iter()
            .map(|(f, s, i)| StscItem {
                first_chunk: *f,
                samples_per_chunk: *s,
                sample_description_id: *i,
            })
            .collect(),
    }
}

pub fn stsz_table(sizes: &[u32]) -> Stsz {
    Stsz { sample_size: 0, sample_count: sizes.len() as u32, sizes: sizes.to_vec() }
}

pub fn stsz_fixed(size: u32, count: u32) -> Stsz {
    Stsz { sample_size: size, sample_count: count, sizes: Vec::new() }
}

pub fn stss(samples: &[u32]) -> Stss {
    Stss { samples: samples.to_vec() }
}

pub fn stco(offsets: &[u32]) -> Stco {
    Stco { offsets: offsets.to_vec() }
}

pub fn trak(tkhd: Tkhd, mdhd: Mdhd, hdlr: Option<Hdlr>, stbl: Stbl) -> Trak {
    let mut mdia = Mdia::new(mdhd, Minf::new(stbl));
    mdia.hdlr = hdlr;
    Trak::new(tkhd, mdia)
}

/// The absolute offset of the first media data byte in a file built by [`build_file`].
pub fn data_start(moov: &Moov) -> u64 {
    ftyp().len() + moov.len() + 8
}

/// Renders `ftyp`, the movie header and a single `mdat` holding `body`.
pub fn build_file(moov: &Moov, body: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    ftyp().write(&mut buf).unwrap();
    moov.write(&mut buf).unwrap();
    write_head(&mut buf, Head::new(false, 8 + body.len() as u64, Fourcc(*b"mdat"))).unwrap();
    buf.extend_from_slice(body);
    buf
}

/// A deterministic media byte pattern, recognisable at any offset.
pub fn media_body(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// A two track movie: 100 seconds, 1 fps video with a sync sample every 10 samples and
/// constant rate audio, video chunks laid out before the audio chunks in a single `mdat`.
///
/// The audio chunks hold 48 samples, so a cut at a 10 second sync point (sample 401, 401, ...)
/// lands inside an audio chunk and discards lead samples there.
pub struct TwoTrackFile {
    pub bytes: Vec<u8>,
    pub data_start: u64,
    pub video_chunk_len: u64,
    pub audio_data_start: u64,
    pub audio_chunk_len: u64,
}

pub fn two_track_file() -> TwoTrackFile {
    let video_chunk_len = 10 * 500u64;
    let audio_chunk_len = 48 * 128u64;
    let audio_chunks = 4000u64.div_ceil(48);

    let mut video_stbl = Stbl::new(stts(&[(100, 3000)]), stsc(&[(1, 10, 1)]));
    video_stbl.stsz = Some(stsz_table(&[500; 100]));
    video_stbl.stss = Some(stss(&[1, 11, 21, 31, 41, 51, 61, 71, 81, 91]));
    video_stbl.stco = Some(stco(&[0; 10]));

    let mut audio_stbl = Stbl::new(stts(&[(4000, 200)]), stsc(&[(1, 48, 1)]));
    audio_stbl.stsz = Some(stsz_fixed(128, 4000));
    audio_stbl.stco = Some(stco(&vec![0; audio_chunks as usize]));

    let video = trak(tkhd(1, 60000), mdhd(3000, 300000), Some(hdlr(b"vide", "VideoHandler")), video_stbl);
    let audio = trak(tkhd(2, 60000), mdhd(8000, 800000), Some(hdlr(b"soun", "SoundHandler")), audio_stbl);
    let mut moov = Moov::new(mvhd(600, 60000), vec![video, audio]);

    // the chunk offsets depend on the header size, which doesn't depend on their values
    let ds = data_start(&moov);
    let video_offsets: Vec<u32> = (0..10).map(|i| (ds + i * video_chunk_len) as u32).collect();
    let audio_data_start = ds + 10 * video_chunk_len;
    let audio_offsets: Vec<u32> = (0..audio_chunks)
        .map(|i| (audio_data_start + i * audio_chunk_len) as u32)
        .collect();
    moov.trak[0].mdia.minf.stbl.stco = Some(stco(&video_offsets));
    moov.trak[1].mdia.minf.stbl.stco = Some(stco(&audio_offsets));

    let body = media_body((10 * video_chunk_len + 4000 * 128) as usize);
    let bytes = build_file(&moov, &body);
    assert_eq!(bytes.len() as u64, ds + body.len() as u64);

    TwoTrackFile { bytes, data_start: ds, video_chunk_len, audio_data_start, audio_chunk_len }
}
