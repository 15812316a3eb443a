use super::*;

/// A struct representing the time to sample atom (`stts`).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stts {
    pub items: Vec<SttsItem>,
}

/// A run of consecutive samples sharing the same decoding delta.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SttsItem {
    pub sample_count: u32,
    pub sample_delta: u32,
}

impl Atom for Stts {
    const FOURCC: Fourcc = SAMPLE_TABLE_TIME_TO_SAMPLE;
}

impl ParseAtom for Stts {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let (version, _) = parse_full_head(reader)?;
        if version != 0 {
            return Err(crate::Error::new(
                crate::ErrorKind::UnknownVersion(version),
                "Unknown time to sample (stts) version",
            ));
        }

        let entries = reader.read_be_u32()?;
        if 8 + 8 * entries as u64 != size.content_len() {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                "Time to sample (stts) table size doesn't match atom length",
            ));
        }

        let mut items = Vec::with_capacity(entries as usize);
        for _ in 0..entries {
            let item = SttsItem {
                sample_count: reader.read_be_u32()?,
                sample_delta: reader.read_be_u32()?,
            };
            if item.sample_count == 0 {
                return Err(crate::Error::new(
                    crate::ErrorKind::Parsing,
                    "Time to sample (stts) run with a sample count of 0",
                ));
            }
            items.push(item);
        }

        Ok(Self { items })
    }
}

impl WriteAtom for Stts {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        write_full_head(writer, 0, [0; 3])?;

        writer.write_be_u32(self.items.len() as u32)?;
        for i in self.items.iter() {
            writer.write_be_u32(i.sample_count)?;
            writer.write_be_u32(i.sample_delta)?;
        }

        Ok(())
    }

    fn size(&self) -> Size {
        let content_len = 8 + 8 * self.items.len() as u64;
        Size::from(content_len)
    }
}

impl Stts {
    /// The total number of samples covered by the table.
    pub fn sample_count(&self) -> u64 {
        self.items.iter().map(|i| i.sample_count as u64).sum()
    }
}
