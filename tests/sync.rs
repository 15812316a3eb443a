mod common;

use std::io::Cursor;

use common::*;
use mp4cut::atom::*;

fn audio_stbl_with_stss(samples: Option<&[u32]>) -> Stbl {
    let mut stbl = Stbl::new(stts(&[(4000, 200)]), stsc(&[(1, 48, 1)]));
    stbl.stsz = Some(stsz_fixed(128, 4000));
    stbl.stco = Some(stco(&[0; 84]));
    stbl.stss = samples.map(stss);
    stbl
}

fn video_stbl() -> Stbl {
    let mut stbl = Stbl::new(stts(&[(100, 3000)]), stsc(&[(1, 10, 1)]));
    stbl.stsz = Some(stsz_table(&[500; 100]));
    stbl.stss = Some(stss(&[1, 11, 21]));
    stbl.stco = Some(stco(&[0; 10]));
    stbl
}

#[test]
fn sync_points_come_from_the_video_track() {
    let f = two_track_file();
    let mut src = Cursor::new(f.bytes);
    let syncs = mp4cut::get_sync_points(&mut src).unwrap();
    assert_eq!(syncs, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0]);
}

#[test]
fn video_track_wins_over_an_earlier_audio_track() {
    // the audio track comes first and has sync samples of its own
    let audio = trak(
        tkhd(1, 60000),
        mdhd(8000, 800000),
        Some(hdlr(b"soun", "SoundHandler")),
        audio_stbl_with_stss(Some(&[81])),
    );
    let video =
        trak(tkhd(2, 60000), mdhd(3000, 300000), Some(hdlr(b"vide", "VideoHandler")), video_stbl());
    let moov = Moov::new(mvhd(600, 60000), vec![audio, video]);

    assert_eq!(mp4cut::find_sync_points(&moov), vec![0.0, 10.0, 20.0]);
}

#[test]
fn first_track_with_sync_samples_wins_without_handlers() {
    let audio =
        trak(tkhd(1, 60000), mdhd(8000, 800000), None, audio_stbl_with_stss(Some(&[81])));
    let video = trak(tkhd(2, 60000), mdhd(3000, 300000), None, video_stbl());
    let moov = Moov::new(mvhd(600, 60000), vec![audio, video]);

    // sync sample 81 of the audio track starts at media time 16000, two seconds in
    assert_eq!(mp4cut::find_sync_points(&moov), vec![2.0]);
}

#[test]
fn tracks_without_sync_samples_contribute_nothing() {
    let audio = trak(
        tkhd(1, 60000),
        mdhd(8000, 800000),
        Some(hdlr(b"soun", "SoundHandler")),
        audio_stbl_with_stss(None),
    );
    let moov = Moov::new(mvhd(600, 60000), vec![audio]);

    assert_eq!(mp4cut::find_sync_points(&moov), Vec::<f64>::new());
}

#[test]
fn nearest_sync_point_without_any_clamps_to_duration() {
    let audio =
        trak(tkhd(1, 60000), mdhd(8000, 800000), None, audio_stbl_with_stss(None));
    let moov = Moov::new(mvhd(600, 60000), vec![audio]);

    assert_eq!(mp4cut::find_nearest_syncpoint(&moov, 5.0), 5.0);
    assert!((mp4cut::find_nearest_syncpoint(&moov, 200.0) - 99.9).abs() < 1e-9);
    assert_eq!(mp4cut::find_nearest_syncpoint(&moov, -3.0), 0.0);
}

#[test]
fn nearest_sync_point_resolves_ties_to_the_earlier_one() {
    let f = two_track_file();
    let moov = read_file(&mut Cursor::new(f.bytes)).unwrap().moov;

    assert_eq!(mp4cut::find_nearest_syncpoint(&moov, 5.0), 0.0);
    assert_eq!(mp4cut::find_nearest_syncpoint(&moov, 5.1), 10.0);
    assert_eq!(mp4cut::find_nearest_syncpoint(&moov, 4.9), 0.0);
    assert_eq!(mp4cut::find_nearest_syncpoint(&moov, 95.0), 90.0);
    assert_eq!(mp4cut::find_nearest_syncpoint(&moov, 0.0), 0.0);
}

#[test]
fn audio_only_file_has_no_sync_points() {
    let audio = trak(
        tkhd(1, 60000),
        mdhd(8000, 800000),
        Some(hdlr(b"soun", "SoundHandler")),
        audio_stbl_with_stss(None),
    );
    let mut moov = Moov::new(mvhd(600, 60000), vec![audio]);
    let ds = data_start(&moov);
    let offsets: Vec<u32> = (0..84).map(|i| (ds + i * 48 * 128) as u32).collect();
    moov.trak[0].mdia.minf.stbl.stco = Some(stco(&offsets));
    let bytes = build_file(&moov, &media_body(4000 * 128));

    let mut src = Cursor::new(bytes);
    assert_eq!(mp4cut::get_sync_points(&mut src).unwrap(), Vec::<f64>::new());
    assert_eq!(mp4cut::get_nearest_syncpoint(&mut src, 5.0).unwrap(), 5.0);
}
