use super::*;

/// A struct representing the handler reference atom (`hdlr`).
///
/// Only the handler type is interpreted, it decides which track supplies the sync points.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Hdlr {
    pub version: u8,
    pub flags: [u8; 3],
    /// The component or predefined field, kept verbatim.
    pub pre: [u8; 4],
    pub handler_type: Fourcc,
    /// Reserved fields and the component name, kept verbatim.
    pub rest: Vec<u8>,
}

impl Atom for Hdlr {
    const FOURCC: Fourcc = HANDLER_REFERENCE;
}

impl Hdlr {
    pub fn is_video(&self) -> bool {
        self.handler_type == VIDEO_HANDLER
    }
}

impl ParseAtom for Hdlr {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let mut hdlr = Self::default();

        let (version, flags) = parse_full_head(reader)?;
        hdlr.version = version;
        hdlr.flags = flags;
        if size.content_len() < 12 {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                "Handler reference (hdlr) atom is shorter than 12 bytes",
            ));
        }
        reader.read_exact(&mut hdlr.pre)?;
        reader.read_exact(&mut *hdlr.handler_type)?;
        hdlr.rest = reader.read_u8_vec(size.content_len() - 12)?;

        Ok(hdlr)
    }
}

impl WriteAtom for Hdlr {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        write_full_head(writer, self.version, self.flags)?;

        writer.write_all(&self.pre)?;
        writer.write_all(&*self.handler_type)?;
        writer.write_all(&self.rest)?;

        Ok(())
    }

    fn size(&self) -> Size {
        let content_len = 12 + self.rest.len() as u64;
        Size::from(content_len)
    }
}
