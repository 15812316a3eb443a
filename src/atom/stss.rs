use super::*;

/// A struct representing the sync sample atom (`stss`).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stss {
    /// 1-based numbers of the samples that are sync samples.
    pub samples: Vec<u32>,
}

impl Atom for Stss {
    const FOURCC: Fourcc = SAMPLE_TABLE_SYNC_SAMPLE;
}

impl ParseAtom for Stss {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let (version, _) = parse_full_head(reader)?;
        if version != 0 {
            return Err(crate::Error::new(
                crate::ErrorKind::UnknownVersion(version),
                "Unknown sync sample (stss) version",
            ));
        }

        let entries = reader.read_be_u32()?;
        if 8 + 4 * entries as u64 != size.content_len() {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                "Sync sample (stss) table size doesn't match atom length",
            ));
        }

        let mut samples = Vec::with_capacity(entries as usize);
        for _ in 0..entries {
            samples.push(reader.read_be_u32()?);
        }

        Ok(Self { samples })
    }
}

impl WriteAtom for Stss {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        write_full_head(writer, 0, [0; 3])?;

        writer.write_be_u32(self.samples.len() as u32)?;
        for s in self.samples.iter() {
            writer.write_be_u32(*s)?;
        }

        Ok(())
    }

    fn size(&self) -> Size {
        let content_len = 8 + 4 * self.samples.len() as u64;
        Size::from(content_len)
    }
}
