use super::*;

/// A struct representing the media atom (`mdia`).
#[derive(Clone, Debug)]
pub struct Mdia {
    pub mdhd: Mdhd,
    pub hdlr: Option<Hdlr>,
    pub minf: Minf,
    pub unknown: Vec<RawAtom>,
    pub(crate) order: Vec<Fourcc>,
}

impl Atom for Mdia {
    const FOURCC: Fourcc = MEDIA;
}

impl Mdia {
    pub fn new(mdhd: Mdhd, minf: Minf) -> Self {
        Self {
            mdhd,
            hdlr: None,
            minf,
            unknown: Vec::new(),
            order: vec![MEDIA_HEADER, HANDLER_REFERENCE, MEDIA_INFORMATION],
        }
    }
}

impl ParseAtom for Mdia {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let mut mdhd = None;
        let mut hdlr = None;
        let mut minf = None;
        let mut unknown = Vec::new();
        let mut order = Vec::new();
        let mut parsed_bytes = 0;

        while parsed_bytes < size.content_len() {
            let head = parse_nested_head(reader)?;

            match head.fourcc() {
                MEDIA_HEADER => {
                    if mdhd.replace(Mdhd::parse(reader, head.size())?).is_some() {
                        return Err(crate::Error::new(
                            crate::ErrorKind::Selection(MEDIA_HEADER),
                            "Multiple media header (mdhd) atoms inside a media atom",
                        ));
                    }
                }
                HANDLER_REFERENCE => {
                    if hdlr.replace(Hdlr::parse(reader, head.size())?).is_some() {
                        return Err(crate::Error::new(
                            crate::ErrorKind::Selection(HANDLER_REFERENCE),
                            "Multiple handler reference (hdlr) atoms inside a media atom",
                        ));
                    }
                }
                MEDIA_INFORMATION => {
                    if minf.replace(Minf::parse(reader, head.size())?).is_some() {
                        return Err(crate::Error::new(
                            crate::ErrorKind::Selection(MEDIA_INFORMATION),
                            "Multiple media information (minf) atoms inside a media atom",
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
                "Children overrun the media (mdia) atom",
            ));
        }

        let mdhd = mdhd.ok_or_else(|| {
            crate::Error::new(
                crate::ErrorKind::AtomNotFound(MEDIA_HEADER),
                "Media atom is missing a media header (mdhd) atom",
            )
        })?;
        let minf = minf.ok_or_else(|| {
            crate::Error::new(
                crate::ErrorKind::AtomNotFound(MEDIA_INFORMATION),
                "Media atom is missing a media information (minf) atom",
            )
        })?;

        Ok(Self { mdhd, hdlr, minf, unknown, order })
    }
}

impl WriteAtom for Mdia {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        let mut unknown = self.unknown.iter();
        for fourcc in self.order.iter() {
            match *fourcc {
                MEDIA_HEADER => self.mdhd.write(writer)?,
                HANDLER_REFERENCE => {
                    if let Some(a) = &self.hdlr {
                        a.write(writer)?;
                    }
                }
                MEDIA_INFORMATION => self.minf.write(writer)?,
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
        let content_len = self.mdhd.len()
            + self.hdlr.len_or_zero()
            + self.minf.len()
            + self.unknown.iter().map(|a| a.len()).sum::<u64>();
        Size::from(content_len)
    }
}
