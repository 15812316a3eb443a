use super::*;

/// A struct representing the chunk offset atom (`stco`).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stco {
    /// Absolute file offsets of each chunk.
    pub offsets: Vec<u32>,
}

impl Atom for Stco {
    const FOURCC: Fourcc = SAMPLE_TABLE_CHUNK_OFFSET;
}

impl ParseAtom for Stco {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let (version, _) = parse_full_head(reader)?;
        if version != 0 {
            return Err(crate::Error::new(
                crate::ErrorKind::UnknownVersion(version),
                "Unknown chunk offset (stco) version",
            ));
        }

        let entries = reader.read_be_u32()?;
        if 8 + 4 * entries as u64 != size.content_len() {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                "Chunk offset (stco) table size doesn't match atom length",
            ));
        }

        let mut offsets = Vec::with_capacity(entries as usize);
        for _ in 0..entries {
            offsets.push(reader.read_be_u32()?);
        }

        Ok(Self { offsets })
    }
}

impl WriteAtom for Stco {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        write_full_head(writer, 0, [0; 3])?;

        writer.write_be_u32(self.offsets.len() as u32)?;
        for o in self.offsets.iter() {
            writer.write_be_u32(*o)?;
        }

        Ok(())
    }

    fn size(&self) -> Size {
        let content_len = 8 + 4 * self.offsets.len() as u64;
        Size::from(content_len)
    }
}
