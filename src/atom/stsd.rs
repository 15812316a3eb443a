use super::*;

/// A struct representing the sample description atom (`stsd`).
///
/// The sample entries carry codec configuration which a cut leaves untouched, so the whole body
/// is kept as an opaque blob.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stsd {
    pub version: u8,
    pub flags: [u8; 3],
    /// The entry count and sample entries, kept verbatim.
    pub data: Vec<u8>,
}

impl Atom for Stsd {
    const FOURCC: Fourcc = SAMPLE_TABLE_SAMPLE_DESCRIPTION;
}

impl ParseAtom for Stsd {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let (version, flags) = parse_full_head(reader)?;
        if size.content_len() < 4 {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                "Sample description (stsd) atom is shorter than its full head",
            ));
        }
        let data = reader.read_u8_vec(size.content_len() - 4)?;

        Ok(Self { version, flags, data })
    }
}

impl WriteAtom for Stsd {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        write_full_head(writer, self.version, self.flags)?;
        writer.write_all(&self.data)?;
        Ok(())
    }

    fn size(&self) -> Size {
        let content_len = 4 + self.data.len() as u64;
        Size::from(content_len)
    }
}
