use super::*;

/// A struct representing the track header atom (`tkhd`).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tkhd {
    pub version: u8,
    pub flags: [u8; 3],
    /// Creation and modification time, kept verbatim (8 bytes for version 0, 16 for version 1).
    pub times: Vec<u8>,
    pub id: u32,
    pub reserved: [u8; 4],
    /// The duration in movie timescale units.
    pub duration: u64,
    /// Layer, alternate group, volume, matrix, width and height, kept verbatim.
    pub rest: Vec<u8>,
}

impl Atom for Tkhd {
    const FOURCC: Fourcc = TRACK_HEADER;
}

impl ParseAtom for Tkhd {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let mut tkhd = Self::default();

        let (version, flags) = parse_full_head(reader)?;
        tkhd.version = version;
        tkhd.flags = flags;
        let parsed = match version {
            0 => {
                // # Version 0
                // 1 byte version
                // 3 bytes flags
                // 4 bytes creation time
                // 4 bytes modification time
                // 4 bytes track id
                // 4 bytes reserved
                // 4 bytes duration
                // ...
                tkhd.times = reader.read_u8_vec(8)?;
                tkhd.id = reader.read_be_u32()?;
                reader.read_exact(&mut tkhd.reserved)?;
                tkhd.duration = reader.read_be_u32()? as u64;
                4 + 8 + 4 + 4 + 4u64
            }
            1 => {
                // # Version 1
                // 1 byte version
                // 3 bytes flags
                // 8 bytes creation time
                // 8 bytes modification time
                // 4 bytes track id
                // 4 bytes reserved
                // 8 bytes duration
                // ...
                tkhd.times = reader.read_u8_vec(16)?;
                tkhd.id = reader.read_be_u32()?;
                reader.read_exact(&mut tkhd.reserved)?;
                tkhd.duration = reader.read_be_u64()?;
                4 + 16 + 4 + 4 + 8u64
            }
            v => {
                return Err(crate::Error::new(
                    crate::ErrorKind::UnknownVersion(version),
                    format!("Unknown track header (tkhd) version {v}"),
                ));
            }
        };
        if size.content_len() < parsed {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                "Track header (tkhd) atom is shorter than its fixed fields",
            ));
        }
        tkhd.rest = reader.read_u8_vec(size.content_len() - parsed)?;

        Ok(tkhd)
    }
}

impl WriteAtom for Tkhd {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        write_full_head(writer, self.version, self.flags)?;

        writer.write_all(&self.times)?;
        writer.write_be_u32(self.id)?;
        writer.write_all(&self.reserved)?;
        match self.version {
            0 => writer.write_be_u32(self.duration as u32)?,
            1 => writer.write_be_u64(self.duration)?,
            v => {
                return Err(crate::Error::new(
                    crate::ErrorKind::UnknownVersion(v),
                    format!("Unknown track header (tkhd) version {v}"),
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
        let content_len =
            4 + self.times.len() as u64 + 4 + 4 + duration_len + self.rest.len() as u64;
        Size::from(content_len)
    }
}
