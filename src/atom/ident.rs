use std::fmt;
use std::ops::{Deref, DerefMut};

/// (`ftyp`) Identifier of the atom carrying the filetype brand.
pub(crate) const FILETYPE: Fourcc = Fourcc(*b"ftyp");
/// (`mdat`) Identifier of an atom holding raw media sample bytes.
pub(crate) const MEDIA_DATA: Fourcc = Fourcc(*b"mdat");
/// (`moov`) Identifier of the atom containing the movie header tree.
pub(crate) const MOVIE: Fourcc = Fourcc(*b"moov");
/// (`mvhd`) Identifier of the atom containing information about the whole movie.
pub(crate) const MOVIE_HEADER: Fourcc = Fourcc(*b"mvhd");
/// (`trak`) Identifier of an atom containing information about a single track.
pub(crate) const TRACK: Fourcc = Fourcc(*b"trak");
/// (`tkhd`)
pub(crate) const TRACK_HEADER: Fourcc = Fourcc(*b"tkhd");
/// (`mdia`) Identifier of an atom containing information about a tracks media type and data.
pub(crate) const MEDIA: Fourcc = Fourcc(*b"mdia");
/// (`mdhd`)
pub(crate) const MEDIA_HEADER: Fourcc = Fourcc(*b"mdhd");
/// (`hdlr`) Identifier of the atom naming the handler that interprets the media.
pub(crate) const HANDLER_REFERENCE: Fourcc = Fourcc(*b"hdlr");
/// (`minf`)
pub(crate) const MEDIA_INFORMATION: Fourcc = Fourcc(*b"minf");
/// (`stbl`)
pub(crate) const SAMPLE_TABLE: Fourcc = Fourcc(*b"stbl");
/// (`stsd`)
pub(crate) const SAMPLE_TABLE_SAMPLE_DESCRIPTION: Fourcc = Fourcc(*b"stsd");
/// (`stts`)
pub(crate) const SAMPLE_TABLE_TIME_TO_SAMPLE: Fourcc = Fourcc(*b"stts");
/// (`ctts`)
pub(crate) const SAMPLE_TABLE_COMPOSITION_OFFSET: Fourcc = Fourcc(*b"ctts");
/// (`stss`)
pub(crate) const SAMPLE_TABLE_SYNC_SAMPLE: Fourcc = Fourcc(*b"stss");
/// (`stsz`)
pub(crate) const SAMPLE_TABLE_SAMPLE_SIZE: Fourcc = Fourcc(*b"stsz");
/// (`stz2`)
pub(crate) const SAMPLE_TABLE_COMPACT_SAMPLE_SIZE: Fourcc = Fourcc(*b"stz2");
/// (`stsc`)
pub(crate) const SAMPLE_TABLE_SAMPLE_TO_CHUNK: Fourcc = Fourcc(*b"stsc");
/// (`stco`)
pub(crate) const SAMPLE_TABLE_CHUNK_OFFSET: Fourcc = Fourcc(*b"stco");
/// (`co64`)
pub(crate) const SAMPLE_TABLE_CHUNK_OFFSET_64: Fourcc = Fourcc(*b"co64");
/// (`wide`) Placeholder atom kept adjacent to `mdat` by some muxers.
pub(crate) const WIDE: Fourcc = Fourcc(*b"wide");
/// (`uuid`) Identifier of atoms carrying a 16 byte extended type.
pub(crate) const EXTENDED: Fourcc = Fourcc(*b"uuid");
/// (`vide`) Handler type of video tracks.
pub(crate) const VIDEO_HANDLER: Fourcc = Fourcc(*b"vide");

/// A four byte atom identifier.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct Fourcc(pub [u8; 4]);

impl Deref for Fourcc {
    type Target = [u8; 4];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Fourcc {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl fmt::Debug for Fourcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fourcc({self})")
    }
}

impl fmt::Display for Fourcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.iter() {
            write!(f, "{}", char::from(*c))?;
        }
        Ok(())
    }
}
