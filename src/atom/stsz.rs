use super::*;

/// A struct representing the sample size atom (`stsz`).
///
/// If `sample_size` is non zero all samples share it and the table is empty; `sample_count`
/// still carries the number of samples in that case.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stsz {
    pub sample_size: u32,
    pub sample_count: u32,
    pub sizes: Vec<u32>,
}

impl Atom for Stsz {
    const FOURCC: Fourcc = SAMPLE_TABLE_SAMPLE_SIZE;
}

impl ParseAtom for Stsz {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let (version, _) = parse_full_head(reader)?;
        if version != 0 {
            return Err(crate::Error::new(
                crate::ErrorKind::UnknownVersion(version),
                "Unknown sample size (stsz) version",
            ));
        }

        let sample_size = reader.read_be_u32()?;
        let sample_count = reader.read_be_u32()?;

        let mut sizes = Vec::new();
        if sample_size == 0 {
            if 12 + 4 * sample_count as u64 != size.content_len() {
                return Err(crate::Error::new(
                    crate::ErrorKind::Parsing,
                    "Sample size (stsz) table size doesn't match atom length",
                ));
            }
            sizes.reserve(sample_count as usize);
            for _ in 0..sample_count {
                sizes.push(reader.read_be_u32()?);
            }
        } else if size.content_len() != 12 {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                "Sample size (stsz) atom with a constant size carries a table",
            ));
        }

        Ok(Self { sample_size, sample_count, sizes })
    }
}

impl WriteAtom for Stsz {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        write_full_head(writer, 0, [0; 3])?;

        writer.write_be_u32(self.sample_size)?;
        writer.write_be_u32(self.sample_count)?;
        if self.sample_size == 0 {
            for s in self.sizes.iter() {
                writer.write_be_u32(*s)?;
            }
        }

        Ok(())
    }

    fn size(&self) -> Size {
        let content_len = match self.sample_size {
            0 => 12 + 4 * self.sizes.len() as u64,
            _ => 12,
        };
        Size::from(content_len)
    }
}
