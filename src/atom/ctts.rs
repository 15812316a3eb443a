use super::*;

/// A struct representing the composition offset atom (`ctts`).
///
/// Version 1 offsets are signed on disk but a cut never changes their values, so they are held
/// as raw big endian words.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Ctts {
    pub version: u8,
    pub flags: [u8; 3],
    pub items: Vec<CttsItem>,
}

/// A run of consecutive samples sharing the same composition offset.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CttsItem {
    pub sample_count: u32,
    pub sample_offset: u32,
}

impl Atom for Ctts {
    const FOURCC: Fourcc = SAMPLE_TABLE_COMPOSITION_OFFSET;
}

impl ParseAtom for Ctts {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let (version, flags) = parse_full_head(reader)?;
        if version > 1 {
            return Err(crate::Error::new(
                crate::ErrorKind::UnknownVersion(version),
                "Unknown composition offset (ctts) version",
            ));
        }

        let entries = reader.read_be_u32()?;
        if 8 + 8 * entries as u64 != size.content_len() {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                "Composition offset (ctts) table size doesn't match atom length",
            ));
        }

        let mut items = Vec::with_capacity(entries as usize);
        for _ in 0..entries {
            let item = CttsItem {
                sample_count: reader.read_be_u32()?,
                sample_offset: reader.read_be_u32()?,
            };
            if item.sample_count == 0 {
                return Err(crate::Error::new(
                    crate::ErrorKind::Parsing,
                    "Composition offset (ctts) run with a sample count of 0",
                ));
            }
            items.push(item);
        }

        Ok(Self { version, flags, items })
    }
}

impl WriteAtom for Ctts {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        write_full_head(writer, self.version, self.flags)?;

        writer.write_be_u32(self.items.len() as u32)?;
        for i in self.items.iter() {
            writer.write_be_u32(i.sample_count)?;
            writer.write_be_u32(i.sample_offset)?;
        }

        Ok(())
    }

    fn size(&self) -> Size {
        let content_len = 8 + 8 * self.items.len() as u64;
        Size::from(content_len)
    }
}
