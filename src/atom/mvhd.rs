use super::*;

/// A struct representing the movie header atom (`mvhd`).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Mvhd {
    pub version: u8,
    pub flags: [u8; 3],
    /// Creation and modification time, kept verbatim (8 bytes for version 0, 16 for version 1).
    pub times: Vec<u8>,
    pub timescale: u32,
    /// The duration in movie timescale units.
    pub duration: u64,
    /// Rate, volume, matrix and next track id, kept verbatim.
    pub rest: Vec<u8>,
}

impl Atom for Mvhd {
    const FOURCC: Fourcc = MOVIE_HEADER;
}

impl ParseAtom for Mvhd {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let mut mvhd = Self::default();

        let (version, flags) = parse_full_head(reader)?;
        mvhd.version = version;
        mvhd.flags = flags;
        let parsed = match version {
            0 => {
                // # Version 0
                // 1 byte version
                // 3 bytes flags
                // 4 bytes creation time
                // 4 bytes modification time
                // 4 bytes time scale
                // 4 bytes duration
                // ...
                mvhd.times = reader.read_u8_vec(8)?;
                mvhd.timescale = reader.read_be_u32()?;
                mvhd.duration = reader.read_be_u32()? as u64;
                4 + 8 + 4 + 4u64
            }
            1 => {
                // # Version 1
                // 1 byte version
                // 3 bytes flags
                // 8 bytes creation time
                // 8 bytes modification time
                // 4 bytes time scale
                // 8 bytes duration
                // ...
                mvhd.times = reader.read_u8_vec(16)?;
                mvhd.timescale = reader.read_be_u32()?;
                mvhd.duration = reader.read_be_u64()?;
                4 + 16 + 4 + 8u64
            }
            v => {
                return Err(crate::Error::new(
                    crate::ErrorKind::UnknownVersion(version),
                    format!("Unknown movie header (mvhd) version {v}"),
                ));
            }
        };
        if size.content_len() < parsed {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                "Movie header (mvhd) atom is shorter than its fixed fields",
            ));
        }
        mvhd.rest = reader.read_u8_vec(size.content_len() - parsed)?;

        Ok(mvhd)
    }
}

impl WriteAtom for Mvhd {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        write_full_head(writer, self.version, self.flags)?;

        writer.write_all(&self.times)?;
        writer.write_be_u32(self.timescale)?;
        match self.version {
            0 => writer.write_be_u32(self.duration as u32)?,
            1 => writer.write_be_u64(self.duration)?,
            v => {
                return Err(crate::Error::new(
                    crate::ErrorKind::UnknownVersion(v),
                    format!("Unknown movie header (mvhd) version {v}"),
                ));
            }
        }
        writer.write_all(&self.rest)?;

        Ok(())
    }

    fn size(&self) -> Size {
        let duration_len = match self.version {
            1 => 8,
            _ => 4,
        };
        let content_len = 4 + self.times.len() as u64 + 4 + duration_len + self.rest.len() as u64;
        Size::from(content_len)
    }
}
