use super::*;

/// A struct representing the sample to chunk atom (`stsc`).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stsc {
    pub items: Vec<StscItem>,
}

/// A run of chunks sharing the same sample count, starting at `first_chunk` (1-based) and
/// extending to the next item's `first_chunk`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StscItem {
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
    pub sample_description_id: u32,
}

impl Atom for Stsc {
    const FOURCC: Fourcc = SAMPLE_TABLE_SAMPLE_TO_CHUNK;
}

impl ParseAtom for Stsc {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let (version, _) = parse_full_head(reader)?;
        if version != 0 {
            return Err(crate::Error::new(
                crate::ErrorKind::UnknownVersion(version),
                "Unknown sample to chunk (stsc) version",
            ));
        }

        let entries = reader.read_be_u32()?;
        if 8 + 12 * entries as u64 != size.content_len() {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                "Sample to chunk (stsc) table size doesn't match atom length",
            ));
        }

        let mut items = Vec::with_capacity(entries as usize);
        let mut prev_first_chunk = 0;
        for _ in 0..entries {
            let item = StscItem {
                first_chunk: reader.read_be_u32()?,
                samples_per_chunk: reader.read_be_u32()?,
                sample_description_id: reader.read_be_u32()?,
            };
            // rows must start at chunk 1 and be sorted strictly by first chunk
            if prev_first_chunk == 0 && item.first_chunk != 1 {
                return Err(crate::Error::new(
                    crate::ErrorKind::Parsing,
                    "Sample to chunk (stsc) table doesn't start at chunk 1",
                ));
            }
            if prev_first_chunk != 0 && item.first_chunk <= prev_first_chunk {
                return Err(crate::Error::new(
                    crate::ErrorKind::Parsing,
                    "Sample to chunk (stsc) first chunk numbers aren't strictly increasing",
                ));
            }
            prev_first_chunk = item.first_chunk;
            items.push(item);
        }

        Ok(Self { items })
    }
}

impl WriteAtom for Stsc {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        write_full_head(writer, 0, [0; 3])?;

        writer.write_be_u32(self.items.len() as u32)?;
        for i in self.items.iter() {
            writer.write_be_u32(i.first_chunk)?;
            writer.write_be_u32(i.samples_per_chunk)?;
            writer.write_be_u32(i.sample_description_id)?;
        }

        Ok(())
    }

    fn size(&self) -> Size {
        let content_len = 8 + 12 * self.items.len() as u64;
        Size::from(content_len)
    }
}

impl Stsc {
    /// The total number of chunks implied by the table, given the number of samples in the
    /// track.
    pub fn chunk_count(&self, sample_count: u64) -> u64 {
        let mut chunks = 0u64;
        let mut samples = sample_count;
        let mut iter = self.items.iter().peekable();
        while let Some(item) = iter.next() {
            match iter.peek() {
                Some(next) => {
                    let range = (next.first_chunk - item.first_chunk) as u64;
                    chunks += range;
                    samples = samples.saturating_sub(range * item.samples_per_chunk as u64);
                }
                None => {
                    if item.samples_per_chunk != 0 {
                        chunks += samples.div_ceil(item.samples_per_chunk as u64);
                    }
                }
            }
        }
        chunks
    }
}
