use super::*;

/// A struct representing the filetype atom (`ftyp`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ftyp {
    pub major_brand: Fourcc,
    pub minor_version: u32,
    /// The compatible brand list, kept verbatim.
    pub rest: Vec<u8>,
}

impl Atom for Ftyp {
    const FOURCC: Fourcc = FILETYPE;
}

impl ParseAtom for Ftyp {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        if size.content_len() < 8 {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                "Filetype (ftyp) atom is shorter than 8 bytes",
            ));
        }

        let mut major_brand = Fourcc::default();
        reader.read_exact(&mut *major_brand)?;
        let minor_version = reader.read_be_u32()?;
        let rest = reader.read_u8_vec(size.content_len() - 8)?;

        Ok(Self { major_brand, minor_version, rest })
    }
}

impl WriteAtom for Ftyp {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        writer.write_all(&*self.major_brand)?;
        writer.write_be_u32(self.minor_version)?;
        writer.write_all(&self.rest)?;
        Ok(())
    }

    fn size(&self) -> Size {
        let content_len = 8 + self.rest.len() as u64;
        Size::from(content_len)
    }
}
