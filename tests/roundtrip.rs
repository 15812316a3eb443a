mod common;

use std::io::Cursor;

use common::*;
use mp4cut::atom::*;

fn container(fourcc: &[u8; 4], children: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    write_head(&mut buf, Head::new(false, 8 + children.len() as u64, Fourcc(*fourcc))).unwrap();
    buf.extend_from_slice(children);
    buf
}

#[test]
fn reserializing_an_unmodified_tree_is_byte_identical() {
    let f = two_track_file();
    let parsed = read_file(&mut Cursor::new(f.bytes.clone())).unwrap();

    let ftyp_atom = &parsed.atoms[0];
    let mut buf = Vec::new();
    parsed.ftyp.write(&mut buf).unwrap();
    assert_eq!(buf, &f.bytes[ftyp_atom.pos() as usize..ftyp_atom.end() as usize]);

    let moov_atom = &parsed.atoms[parsed.moov_idx];
    let mut buf = Vec::new();
    parsed.moov.write(&mut buf).unwrap();
    assert_eq!(buf, &f.bytes[moov_atom.pos() as usize..moov_atom.end() as usize]);
}

/// A movie using the less common box variants: version 1 headers, composition offsets, packed
/// sample sizes, 64 bit chunk offsets, and unknown children interleaved at every level.
#[test]
fn exotic_box_variants_survive_a_reparse() {
    let mvhd = Mvhd {
        version: 1,
        flags: [0; 3],
        times: vec![7; 16],
        timescale: 600,
        duration: 60000,
        rest: (0..80).collect(),
    };
    let tkhd = Tkhd {
        version: 1,
        flags: [0, 0, 3],
        times: vec![9; 16],
        id: 1,
        reserved: [0; 4],
        duration: 60000,
        rest: (0..60).collect(),
    };
    let mdhd = Mdhd {
        version: 1,
        flags: [0; 3],
        times: vec![1; 16],
        timescale: 3000,
        duration: 300000,
        rest: vec![0x55, 0xc4, 0, 0],
    };
    let stts = stts(&[(5, 3000), (15, 2800)]);
    let ctts = Ctts {
        version: 1,
        flags: [0; 3],
        items: vec![
            CttsItem { sample_count: 5, sample_offset: 6000 },
            CttsItem { sample_count: 15, sample_offset: 0xffff_f448 },
        ],
    };
    let stz2 = Stz2 { field_size: 4, sizes: vec![7; 19] };
    let stsc = stsc(&[(1, 10, 1), (3, 5, 1)]);
    let co64 = Co64 { offsets: vec![4096, 8192] };
    let stsd = Stsd { version: 0, flags: [0; 3], data: vec![0, 0, 0, 1, 0xde, 0xad, 0xbe, 0xef] };
    let sdtp = RawAtom { fourcc: Fourcc(*b"sdtp"), ext: false, data: vec![0x20; 20] };
    let edts = RawAtom { fourcc: Fourcc(*b"edts"), ext: false, data: vec![3; 28] };
    let smhd = RawAtom { fourcc: Fourcc(*b"smhd"), ext: false, data: vec![0; 8] };
    let udta = RawAtom { fourcc: Fourcc(*b"udta"), ext: false, data: vec![1, 2, 3] };

    // children deliberately interleaved: unknown atoms between and before the known ones
    let mut stbl_children = Vec::new();
    stsd.write(&mut stbl_children).unwrap();
    stts.write(&mut stbl_children).unwrap();
    sdtp.write(&mut stbl_children).unwrap();
    ctts.write(&mut stbl_children).unwrap();
    stz2.write(&mut stbl_children).unwrap();
    stsc.write(&mut stbl_children).unwrap();
    co64.write(&mut stbl_children).unwrap();
    let stbl = container(b"stbl", &stbl_children);

    let mut minf_children = smhd.write_to_vec();
    minf_children.extend_from_slice(&stbl);
    let minf = container(b"minf", &minf_children);

    let mut mdia_children = Vec::new();
    mdhd.write(&mut mdia_children).unwrap();
    mdia_children.extend_from_slice(&minf);
    let mdia = container(b"mdia", &mdia_children);

    let mut trak_children = Vec::new();
    tkhd.write(&mut trak_children).unwrap();
    trak_children.extend_from_slice(&edts.write_to_vec());
    trak_children.extend_from_slice(&mdia);
    let trak = container(b"trak", &trak_children);

    let mut moov_children = udta.write_to_vec();
    mvhd.write(&mut moov_children).unwrap();
    moov_children.extend_from_slice(&trak);
    let moov = container(b"moov", &moov_children);

    let mut bytes = Vec::new();
    ftyp().write(&mut bytes).unwrap();
    RawAtom { fourcc: Fourcc(*b"free"), ext: false, data: vec![0; 16] }
        .write(&mut bytes)
        .unwrap();
    let moov_pos = bytes.len();
    bytes.extend_from_slice(&moov);
    write_head(&mut bytes, Head::new(false, 8 + 16, Fourcc(*b"mdat"))).unwrap();
    bytes.extend_from_slice(&media_body(16));

    let parsed = read_file(&mut Cursor::new(bytes.clone())).unwrap();

    // the parsed values are the ones that went in
    assert_eq!(parsed.moov.mvhd, mvhd);
    let t = &parsed.moov.trak[0];
    assert_eq!(t.tkhd, tkhd);
    assert_eq!(t.mdia.mdhd, mdhd);
    let stbl = t.stbl();
    assert_eq!(stbl.ctts.as_ref().unwrap(), &ctts);
    assert_eq!(stbl.stz2.as_ref().unwrap(), &stz2);
    assert_eq!(stbl.co64.as_ref().unwrap(), &co64);
    assert_eq!(stbl.stsd.as_ref().unwrap(), &stsd);
    assert_eq!(stbl.unknown, vec![sdtp]);
    assert_eq!(t.unknown, vec![edts]);
    assert_eq!(parsed.moov.unknown, vec![udta]);

    // and the tree re-serializes byte for byte, child order included
    let mut buf = Vec::new();
    parsed.moov.write(&mut buf).unwrap();
    assert_eq!(buf, &bytes[moov_pos..moov_pos + moov.len()]);
}

trait WriteToVec {
    fn write_to_vec(&self) -> Vec<u8>;
}

impl WriteToVec for RawAtom {
    fn write_to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write(&mut buf).unwrap();
        buf
    }
}
