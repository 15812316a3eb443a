//! Relevant structure of an mp4 file
//!
//! ```md
//! ftyp
//! moov
//! ├─ mvhd
//! └─ trak
//!    ├─ tkhd
//!    └─ mdia
//!       ├─ mdhd
//!       ├─ hdlr
//!       └─ minf
//!          └─ stbl
//!             ├─ stsd
//!             ├─ stts
//!             ├─ ctts
//!             ├─ stss
//!             ├─ stsz | stz2
//!             ├─ stsc
//!             └─ stco | co64
//! mdat
//! ```
//!
//! Everything else is carried through verbatim: unknown children of the containers above are
//! buffered as [`RawAtom`]s, unknown top level atoms (`wide`, `free`, `moof`, ...) are located
//! but left in the source and copied by byte range at write time.

use std::io::{Read, Seek, SeekFrom, Write};
use std::ops::Deref;

use crate::ErrorKind;

use head::*;
use util::*;

pub use co64::*;
pub use ctts::*;
pub use ftyp::*;
pub use hdlr::*;
pub use head::{parse_head, write_head, AtomBounds, Head, Size};
pub use ident::Fourcc;
pub use mdhd::*;
pub use mdia::*;
pub use minf::*;
pub use moov::*;
pub use mvhd::*;
pub use stbl::*;
pub use stco::*;
pub use stsc::*;
pub use stsd::*;
pub use stss::*;
pub use stsz::*;
pub use stts::*;
pub use stz2::*;
pub use tkhd::*;
pub use trak::*;
pub use util::{copy_range, ReadUtil, SeekUtil, WriteUtil};
pub use uuid::*;

pub(crate) use ident::*;

/// A module for working with identifiers.
pub mod ident;

mod head;
mod util;

mod co64;
mod ctts;
mod ftyp;
mod hdlr;
mod mdhd;
mod mdia;
mod minf;
mod moov;
mod mvhd;
mod stbl;
mod stco;
mod stsc;
mod stsd;
mod stss;
mod stsz;
mod stts;
mod stz2;
mod tkhd;
mod trak;
mod uuid;

pub trait Atom: Sized {
    const FOURCC: Fourcc;
}

pub trait ParseAtom: Atom {
    fn parse(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        match Self::parse_atom(reader, size) {
            Err(mut e) => {
                let mut d = e.description.into_owned();
                insert_str(&mut d, "Error parsing", Self::FOURCC);
                e.description = d.into();
                Err(e)
            }
            a => a,
        }
    }

    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self>;
}

pub trait WriteAtom: Atom {
    fn write(&self, writer: &mut impl Write) -> crate::Result<()> {
        match self.write_atom(writer) {
            Err(mut e) => {
                let mut d = e.description.into_owned();
                insert_str(&mut d, "Error writing", Self::FOURCC);
                e.description = d.into();
                Err(e)
            }
            a => a,
        }
    }

    fn write_head(&self, writer: &mut impl Write) -> crate::Result<()> {
        let head = Head::from(self.size(), Self::FOURCC);
        head::write_head(writer, head)
    }

    fn len(&self) -> u64 {
        self.size().len()
    }

    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()>;

    fn size(&self) -> Size;
}

fn insert_str(description: &mut String, msg: &str, fourcc: Fourcc) {
    description.reserve(msg.len() + 6);
    description.insert_str(0, ": ");
    fourcc.iter().for_each(|c| {
        description.insert(0, char::from(*c));
    });
    description.insert_str(0, msg);
}

trait LenOrZero {
    fn len_or_zero(&self) -> u64;
}

impl<T: WriteAtom> LenOrZero for Option<T> {
    fn len_or_zero(&self) -> u64 {
        self.as_ref().map_or(0, |a| a.len())
    }
}

/// Parses the head of an atom nested inside a container. A to-end-of-file length (0) is only
/// valid at the top level.
pub(crate) fn parse_nested_head(reader: &mut impl Read) -> crate::Result<Head> {
    let head = parse_head(reader)?;
    if head.len() == 0 {
        return Err(crate::Error::new(
            crate::ErrorKind::Parsing,
            "Zero sized atom inside a container",
        ));
    }
    Ok(head)
}

/// An atom buffered as an opaque byte blob and re-emitted verbatim.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawAtom {
    pub fourcc: Fourcc,
    /// Whether the original head carried a 64 bit length.
    pub ext: bool,
    /// The body bytes, including the 16 byte extended type for `uuid` atoms.
    pub data: Vec<u8>,
}

impl RawAtom {
    pub(crate) fn parse(reader: &mut (impl Read + Seek), head: Head) -> crate::Result<Self> {
        let data = reader.read_u8_vec(head.content_len())?;
        Ok(Self { fourcc: head.fourcc(), ext: head.ext(), data })
    }

    pub fn len(&self) -> u64 {
        let head_len = if self.ext { 16 } else { 8 };
        head_len + self.data.len() as u64
    }

    pub fn write(&self, writer: &mut impl Write) -> crate::Result<()> {
        head::write_head(writer, Head::new(self.ext, self.len(), self.fourcc))?;
        writer.write_all(&self.data)?;
        Ok(())
    }
}

/// The parsed top level structure of an mp4 file.
///
/// `ftyp` and `moov` are parsed into the box model, everything else stays in the source and is
/// referenced by its bounds.
#[derive(Clone, Debug)]
pub struct Mp4File {
    pub ftyp: Ftyp,
    pub moov: Moov,
    pub moov_idx: usize,
    pub atoms: Vec<AtomBounds>,
}

impl Mp4File {
    /// The index of the first `mdat` atom.
    pub fn mdat_idx(&self) -> usize {
        // read_file guarantees at least one
        self.atoms.iter().position(|a| a.fourcc() == MEDIA_DATA).unwrap_or(0)
    }
}

/// Scans the top level of the file and parses the `ftyp` and `moov` trees.
///
/// Requires exactly one `ftyp`, exactly one `moov` and at least one `mdat` atom.
pub fn read_file(reader: &mut (impl Read + Seek)) -> crate::Result<Mp4File> {
    reader.seek(SeekFrom::Start(0))?;
    let len = reader.remaining_stream_len()?;

    let mut ftyp = None;
    let mut moov = None;
    let mut moov_idx = 0;
    let mut mdat_found = false;
    let mut atoms = Vec::new();
    let mut pos = 0;

    while pos < len {
        reader.seek(SeekFrom::Start(pos))?;
        let mut head = parse_head(reader)?;
        if head.len() == 0 {
            // a zero length atom extends to the end of the source
            head = Head::new(head.ext(), len - pos, head.fourcc());
        }
        if pos + head.len() > len {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                format!(
                    "Atom '{}' at position {pos} overruns the end of the source",
                    head.fourcc()
                ),
            ));
        }

        match head.fourcc() {
            FILETYPE => {
                if ftyp.is_some() {
                    return Err(crate::Error::new(
                        crate::ErrorKind::Selection(FILETYPE),
                        "Multiple filetype (ftyp) atoms found",
                    ));
                }
                ftyp = Some(Ftyp::parse(reader, head.size())?);
            }
            MOVIE => {
                if moov.is_some() {
                    return Err(crate::Error::new(
                        crate::ErrorKind::Selection(MOVIE),
                        "Multiple movie (moov) atoms found",
                    ));
                }
                moov = Some(Moov::parse(reader, head.size())?);
                moov_idx = atoms.len();
            }
            MEDIA_DATA => mdat_found = true,
            _ => (),
        }

        atoms.push(AtomBounds::new(pos, head));
        pos += head.len();
    }

    let ftyp = ftyp.ok_or_else(|| {
        crate::Error::new(crate::ErrorKind::AtomNotFound(FILETYPE), "No filetype (ftyp) atom found")
    })?;
    let moov = moov.ok_or_else(|| {
        crate::Error::new(crate::ErrorKind::AtomNotFound(MOVIE), "No movie (moov) atom found")
    })?;
    if !mdat_found {
        return Err(crate::Error::new(
            crate::ErrorKind::AtomNotFound(MEDIA_DATA),
            "No media data (mdat) atom found",
        ));
    }

    Ok(Mp4File { ftyp, moov, moov_idx, atoms })
}
