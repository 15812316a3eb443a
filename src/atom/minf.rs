use super::*;

/// A struct representing the media information atom (`minf`).
#[derive(Clone, Debug)]
pub struct Minf {
    pub stbl: Stbl,
    pub unknown: Vec<RawAtom>,
    pub(crate) order: Vec<Fourcc>,
}

impl Atom for Minf {
    const FOURCC: Fourcc = MEDIA_INFORMATION;
}

impl Minf {
    pub fn new(stbl: Stbl) -> Self {
        Self { stbl, unknown: Vec::new(), order: vec![SAMPLE_TABLE] }
    }
}

impl ParseAtom for Minf {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let mut stbl = None;
        let mut unknown = Vec::new();
        let mut order = Vec::new();
        let mut parsed_bytes = 0;

        while parsed_bytes < size.content_len() {
            let head = parse_nested_head(reader)?;

            match head.fourcc() {
                SAMPLE_TABLE => {
                    if stbl.replace(Stbl::parse(reader, head.size())?).is_some() {
                        return Err(crate::Error::new(
                            crate::ErrorKind::Selection(SAMPLE_TABLE),
                            "Multiple sample table (stbl) atoms inside a media information atom",
                        ));
                    }
                }
                _ => unknown.push(RawAtom::parse(reader, head)?),
            }

            order.push(head.fourcc());
            parsed_bytes += head.len();
        }
        if parsed_bytes != size.content_len() {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                "Children overrun the media information (minf) atom",
            ));
        }

        let stbl = stbl.ok_or_else(|| {
            crate::Error::new(
                crate::ErrorKind::AtomNotFound(SAMPLE_TABLE),
                "Media information atom is missing a sample table (stbl) atom",
            )
        })?;

        Ok(Self { stbl, unknown, order })
    }
}

impl WriteAtom for Minf {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        let mut unknown = self.unknown.iter();
        for fourcc in self.order.iter() {
            match *fourcc {
                SAMPLE_TABLE => self.stbl.write(writer)?,
                _ => {
                    if let Some(a) = unknown.next() {
                        a.write(writer)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn size(&self) -> Size {
        let content_len = self.stbl.len() + self.unknown.iter().map(|a| a.len()).sum::<u64>();
        Size::from(content_len)
    }
}
