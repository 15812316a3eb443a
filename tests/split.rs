mod common;

use std::io::{Cursor, Seek, SeekFrom, Write};

use common::*;
use mp4cut::atom::*;
use mp4cut::ErrorKind;

/// A 20 second, 20 sample video-only movie split across two chunks, with sync samples at 0 and
/// 10 seconds. Chunk offsets are left at 0, the caller places them.
fn video_only_moov(mvhd_duration: u64) -> Moov {
    let mut stbl = Stbl::new(stts(&[(20, 3000)]), stsc(&[(1, 10, 1)]));
    stbl.stsz = Some(stsz_table(&[500; 20]));
    stbl.stss = Some(stss(&[1, 11]));
    stbl.stco = Some(stco(&[0; 2]));
    let video =
        trak(tkhd(1, mvhd_duration), mdhd(3000, 60000), Some(hdlr(b"vide", "VideoHandler")), stbl);
    Moov::new(mvhd(600, mvhd_duration), vec![video])
}

#[test]
fn cut_at_a_sync_point() {
    let f = two_track_file();
    let mut src = Cursor::new(f.bytes.clone());
    let mut out = Vec::new();
    mp4cut::split_and_write(&mut src, &mut out, 10.0).unwrap();

    let parsed = read_file(&mut Cursor::new(&out)).unwrap();
    let video = &parsed.moov.trak[0];
    let audio = &parsed.moov.trak[1];

    // video: cut at sample 11, a chunk boundary
    let vstbl = video.stbl();
    assert_eq!(vstbl.stts.items, stts(&[(90, 3000)]).items);
    assert_eq!(
        vstbl.stss.as_ref().unwrap().samples,
        vec![1, 11, 21, 31, 41, 51, 61, 71, 81]
    );
    assert_eq!(vstbl.stsz.as_ref().unwrap().sample_count, 90);
    assert_eq!(video.mdia.mdhd.duration, 300000 - 30000);
    assert_eq!(video.tkhd.duration, 270000 * 600 / 3000);

    // audio: cut at sample 401, 16 samples into chunk 9
    let astbl = audio.stbl();
    assert_eq!(astbl.stts.items, stts(&[(3600, 200)]).items);
    assert_eq!(astbl.stsz.as_ref().unwrap().sample_count, 3600);
    assert_eq!(astbl.stsc.items, stsc(&[(1, 32, 1), (2, 48, 1)]).items);
    assert_eq!(audio.mdia.mdhd.duration, 800000 - 80000);
    assert_eq!(audio.tkhd.duration, 720000 * 600 / 8000);

    // the first surviving video chunk sits right behind the new header
    let mdat = &parsed.atoms[parsed.mdat_idx()];
    let out_data_start = mdat.content_pos();
    let vstco = vstbl.chunk_offsets().unwrap();
    assert_eq!(vstco.len(), 9);
    assert_eq!(vstco[0], out_data_start);
    for stbl in [vstbl, astbl] {
        for o in stbl.chunk_offsets().unwrap() {
            assert!(o >= out_data_start);
        }
    }

    // media bytes carried over verbatim, for both cut chunks
    let old_video_cut = (f.data_start + f.video_chunk_len) as usize;
    assert_eq!(&out[vstco[0] as usize..][..32], &f.bytes[old_video_cut..][..32]);

    let astco = astbl.chunk_offsets().unwrap();
    assert_eq!(astco.len(), 76);
    let old_audio_cut = (f.audio_data_start + 8 * f.audio_chunk_len + 16 * 128) as usize;
    assert_eq!(&out[astco[0] as usize..][..32], &f.bytes[old_audio_cut..][..32]);

    // every byte from the cut point to the end survives
    let dropped = f.data_start + f.video_chunk_len;
    assert_eq!(out.len() as u64, out_data_start + (f.bytes.len() as u64 - dropped));
    assert_eq!(&out[out_data_start as usize..], &f.bytes[dropped as usize..]);
}

#[test]
fn cut_at_zero_reproduces_the_file() {
    let f = two_track_file();
    let mut src = Cursor::new(f.bytes.clone());
    let mut out = Vec::new();
    mp4cut::split_and_write(&mut src, &mut out, 0.0).unwrap();

    assert_eq!(out, f.bytes);
}

#[test]
fn cut_keeps_tables_consistent() {
    for t in [0.0, 4.9, 10.0, 33.0, 99.0] {
        let f = two_track_file();
        let mut src = Cursor::new(f.bytes);
        let mut out = Vec::new();
        mp4cut::split_and_write(&mut src, &mut out, t).unwrap();

        let parsed = read_file(&mut Cursor::new(&out)).unwrap();
        for trak in parsed.moov.trak.iter() {
            let stbl = trak.stbl();
            let samples = stbl.stts.sample_count();
            let sizes = stbl.sample_sizes().unwrap();
            assert_eq!(sizes.count(), samples, "t={t}");
            assert_eq!(
                stbl.chunk_offsets().unwrap().len() as u64,
                stbl.stsc.chunk_count(samples),
                "t={t}"
            );
            if let Some(stss) = &stbl.stss {
                assert!(stss.samples.iter().all(|s| (1..=samples as u32).contains(s)), "t={t}");
            }
        }
    }
}

#[test]
fn cut_with_64_bit_chunk_offsets() {
    let mut moov = video_only_moov(12000);
    let stbl = &mut moov.trak[0].mdia.minf.stbl;
    stbl.stco = None;
    stbl.co64 = Some(Co64 { offsets: vec![0; 2] });
    let ds = data_start(&moov);
    moov.trak[0].mdia.minf.stbl.co64 = Some(Co64 { offsets: vec![ds, ds + 5000] });

    let bytes = build_file(&moov, &media_body(10000));
    let mut out = Vec::new();
    mp4cut::split_and_write(&mut Cursor::new(bytes), &mut out, 10.0).unwrap();

    let parsed = read_file(&mut Cursor::new(&out)).unwrap();
    let stbl = parsed.moov.trak[0].stbl();
    assert!(stbl.stco.is_none());
    let mdat = &parsed.atoms[parsed.mdat_idx()];
    assert_eq!(stbl.co64.as_ref().unwrap().offsets, vec![mdat.content_pos()]);
    assert_eq!(stbl.stts.items, stts(&[(10, 3000)]).items);
}

#[test]
fn cut_preserves_extended_media_data_heads() {
    let mut moov = video_only_moov(12000);
    let head_len = 16;
    let ds = ftyp().len() + moov.len() + head_len;
    moov.trak[0].mdia.minf.stbl.stco = Some(stco(&[ds as u32, ds as u32 + 5000]));

    let body = media_body(10000);
    let mut bytes = Vec::new();
    ftyp().write(&mut bytes).unwrap();
    moov.write(&mut bytes).unwrap();
    write_head(&mut bytes, Head::new(true, head_len + body.len() as u64, Fourcc(*b"mdat")))
        .unwrap();
    bytes.extend_from_slice(&body);

    let mut out = Vec::new();
    mp4cut::split_and_write(&mut Cursor::new(bytes), &mut out, 10.0).unwrap();

    let parsed = read_file(&mut Cursor::new(&out)).unwrap();
    let mdat = &parsed.atoms[parsed.mdat_idx()];
    assert!(mdat.ext());
    assert_eq!(mdat.content_len(), 5000);
    let stco64 = parsed.moov.trak[0].stbl().chunk_offsets().unwrap();
    assert_eq!(stco64, vec![mdat.content_pos()]);
}

#[test]
fn cut_past_the_movie_duration_fails_before_writing() {
    // the movie header claims 5 seconds, so the sync point at 10 seconds is out of reach
    let mut moov = video_only_moov(3000);
    let ds = data_start(&moov);
    moov.trak[0].mdia.minf.stbl.stco = Some(stco(&[ds as u32, ds as u32 + 5000]));
    let bytes = build_file(&moov, &media_body(10000));

    let mut out = Vec::new();
    let err = mp4cut::split_and_write(&mut Cursor::new(bytes), &mut out, 7.0).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ExceededDuration));
    assert!(out.is_empty());
}

#[test]
fn cut_requires_the_header_before_the_media_data() {
    let mut moov = video_only_moov(12000);
    let ds = ftyp().len() + 8;
    moov.trak[0].mdia.minf.stbl.stco = Some(stco(&[ds as u32, ds as u32 + 5000]));

    let body = media_body(10000);
    let mut bytes = Vec::new();
    ftyp().write(&mut bytes).unwrap();
    write_head(&mut bytes, Head::new(false, 8 + body.len() as u64, Fourcc(*b"mdat"))).unwrap();
    bytes.extend_from_slice(&body);
    moov.write(&mut bytes).unwrap();

    let mut out = Vec::new();
    let err = mp4cut::split_and_write(&mut Cursor::new(bytes), &mut out, 10.0).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Parsing));
    assert!(out.is_empty());
}

#[test]
fn cut_region_must_hold_only_media_data() {
    // chunk 2 lives in a second mdat behind a free atom, the discarded region crosses both
    let mut moov = video_only_moov(12000);
    let c1 = data_start(&moov);
    let c2 = c1 + 5000 + 12 + 8;
    moov.trak[0].mdia.minf.stbl.stco = Some(stco(&[c1 as u32, c2 as u32]));

    let body = media_body(5000);
    let mut bytes = Vec::new();
    ftyp().write(&mut bytes).unwrap();
    moov.write(&mut bytes).unwrap();
    write_head(&mut bytes, Head::new(false, 8 + 5000, Fourcc(*b"mdat"))).unwrap();
    bytes.extend_from_slice(&body);
    RawAtom { fourcc: Fourcc(*b"free"), ext: false, data: vec![0; 4] }
        .write(&mut bytes)
        .unwrap();
    write_head(&mut bytes, Head::new(false, 8 + 5000, Fourcc(*b"mdat"))).unwrap();
    bytes.extend_from_slice(&body);

    let mut out = Vec::new();
    let err = mp4cut::split_and_write(&mut Cursor::new(bytes), &mut out, 10.0).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Parsing));
}

#[test]
fn split_returns_header_and_data_offset() {
    let f = two_track_file();
    let mut src = Cursor::new(f.bytes.clone());
    let (header, new_data_offset) = mp4cut::split(&mut src, 10.0).unwrap();

    assert_eq!(new_data_offset, f.data_start + f.video_chunk_len);

    // gluing the header to the source tail gives the same file as split_and_write
    let mut glued = header;
    glued.extend_from_slice(&f.bytes[new_data_offset as usize..]);
    let mut direct = Vec::new();
    mp4cut::split_and_write(&mut Cursor::new(f.bytes), &mut direct, 10.0).unwrap();
    assert_eq!(glued, direct);
}

#[test]
fn split_through_real_files() {
    let f = two_track_file();
    let dir = tempfile::tempdir().unwrap();
    let src_path = dir.path().join("movie.mp4");
    let dst_path = dir.path().join("cut.mp4");
    std::fs::write(&src_path, &f.bytes).unwrap();

    let mut src = std::fs::File::open(&src_path).unwrap();
    let mut dst = std::fs::File::create(&dst_path).unwrap();
    mp4cut::split_and_write(&mut src, &mut dst, 33.0).unwrap();
    dst.flush().unwrap();

    let mut reread = std::fs::File::open(&dst_path).unwrap();
    let parsed = read_file(&mut reread).unwrap();
    // 33 seconds snap back to the sync point at 30
    assert_eq!(parsed.moov.trak[0].mdia.mdhd.duration, 300000 - 90000);

    reread.seek(SeekFrom::Start(0)).unwrap();
    assert_eq!(mp4cut::get_nearest_syncpoint(&mut reread, 0.0).unwrap(), 0.0);
}
