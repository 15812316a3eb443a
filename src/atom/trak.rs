use super::*;

/// A struct representing the track atom (`trak`).
#[derive(Clone, Debug)]
pub struct Trak {
    pub tkhd: Tkhd,
    pub mdia: Mdia,
    pub unknown: Vec<RawAtom>,
    pub(crate) order: Vec<Fourcc>,
}

impl Atom for Trak {
    const FOURCC: Fourcc = TRACK;
}

impl Trak {
    pub fn new(tkhd: Tkhd, mdia: Mdia) -> Self {
        Self { tkhd, mdia, unknown: Vec::new(), order: vec![TRACK_HEADER, MEDIA] }
    }

    pub fn stbl(&self) -> &Stbl {
        &self.mdia.minf.stbl
    }
}

impl ParseAtom for Trak {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let mut tkhd = None;
        let mut mdia = None;
        let mut unknown = Vec::new();
        let mut order = Vec::new();
        let mut parsed_bytes = 0;

        while parsed_bytes < size.content_len() {
            let head = parse_nested_head(reader)?;

            match head.fourcc() {
                TRACK_HEADER => {
                    if tkhd.replace(Tkhd::parse(reader, head.size())?).is_some() {
                        return Err(crate::Error::new(
                            crate::ErrorKind::Selection(TRACK_HEADER),
                            "Multiple track header (tkhd) atoms inside a track atom",
                        ));
                    }
                }
                MEDIA => {
                    if mdia.replace(Mdia::parse(reader, head.size())?).is_some() {
                        return Err(crate::Error::new(
                            crate::ErrorKind::Selection(MEDIA),
                            "Multiple media (mdia) atoms inside a track atom",
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
                "Children overrun the track (trak) atom",
            ));
        }

        let tkhd = tkhd.ok_or_else(|| {
            crate::Error::new(
                crate::ErrorKind::AtomNotFound(TRACK_HEADER),
                "Track atom is missing a track header (tkhd) atom",
            )
        })?;
        let mdia = mdia.ok_or_else(|| {
            crate::Error::new(
                crate::ErrorKind::AtomNotFound(MEDIA),
                "Track atom is missing a media (mdia) atom",
            )
        })?;

        Ok(Self { tkhd, mdia, unknown, order })
    }
}

impl WriteAtom for Trak {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        let mut unknown = self.unknown.iter();
        for fourcc in self.order.iter() {
            match *fourcc {
                TRACK_HEADER => self.tkhd.write(writer)?,
                MEDIA => self.mdia.write(writer)?,
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
        let content_len = self.tkhd.len()
            + self.mdia.len()
            + self.unknown.iter().map(|a| a.len()).sum::<u64>();
        Size::from(content_len)
    }
}
