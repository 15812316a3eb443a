use super::*;

/// A struct representing the compact sample size atom (`stz2`).
///
/// Sizes are packed with `field_size` bits per entry; for 4 bit fields two samples share a
/// byte, high nibble first.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stz2 {
    pub field_size: u8,
    pub sizes: Vec<u32>,
}

impl Atom for Stz2 {
    const FOURCC: Fourcc = SAMPLE_TABLE_COMPACT_SAMPLE_SIZE;
}

impl Stz2 {
    fn table_len(field_size: u8, entries: u64) -> u64 {
        match field_size {
            4 => entries.div_ceil(2),
            8 => entries,
            _ => 2 * entries,
        }
    }
}

impl ParseAtom for Stz2 {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let (version, _) = parse_full_head(reader)?;
        if version != 0 {
            return Err(crate::Error::new(
                crate::ErrorKind::UnknownVersion(version),
                "Unknown compact sample size (stz2) version",
            ));
        }

        // 3 bytes reserved, 1 byte field size
        let field_size = (reader.read_be_u32()? & 0xff) as u8;
        if !matches!(field_size, 4 | 8 | 16) {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                format!("Compact sample size (stz2) field size of {field_size} bits"),
            ));
        }
        let entries = reader.read_be_u32()?;
        if 12 + Self::table_len(field_size, entries as u64) != size.content_len() {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                "Compact sample size (stz2) table size doesn't match atom length",
            ));
        }

        let mut sizes = Vec::with_capacity(entries as usize);
        match field_size {
            4 => {
                for _ in 0..entries.div_ceil(2) {
                    let b = reader.read_u8()?;
                    sizes.push(((b >> 4) & 0x0f) as u32);
                    sizes.push((b & 0x0f) as u32);
                }
                sizes.truncate(entries as usize);
            }
            8 => {
                for _ in 0..entries {
                    sizes.push(reader.read_u8()? as u32);
                }
            }
            _ => {
                for _ in 0..entries {
                    sizes.push(reader.read_be_u16()? as u32);
                }
            }
        }

        Ok(Self { field_size, sizes })
    }
}

impl WriteAtom for Stz2 {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        write_full_head(writer, 0, [0; 3])?;

        writer.write_be_u32(self.field_size as u32)?;
        writer.write_be_u32(self.sizes.len() as u32)?;
        match self.field_size {
            4 => {
                for pair in self.sizes.chunks(2) {
                    let hi = (pair[0] & 0x0f) as u8;
                    let lo = pair.get(1).map_or(0, |s| (s & 0x0f) as u8);
                    writer.write_u8(hi << 4 | lo)?;
                }
            }
            8 => {
                for s in self.sizes.iter() {
                    writer.write_u8(*s as u8)?;
                }
            }
            16 => {
                for s in self.sizes.iter() {
                    writer.write_be_u16(*s as u16)?;
                }
            }
            fs => {
                return Err(crate::Error::new(
                    crate::ErrorKind::Parsing,
                    format!("Compact sample size (stz2) field size of {fs} bits"),
                ));
            }
        }

        Ok(())
    }

    fn size(&self) -> Size {
        let content_len = 12 + Self::table_len(self.field_size, self.sizes.len() as u64);
        Size::from(content_len)
    }
}
