use super::*;

/// A struct representing the movie atom (`moov`).
#[derive(Clone, Debug)]
pub struct Moov {
    pub mvhd: Mvhd,
    pub trak: Vec<Trak>,
    pub unknown: Vec<RawAtom>,
    pub(crate) order: Vec<Fourcc>,
}

impl Atom for Moov {
    const FOURCC: Fourcc = MOVIE;
}

impl Moov {
    pub fn new(mvhd: Mvhd, trak: Vec<Trak>) -> Self {
        let mut order = vec![MOVIE_HEADER];
        order.extend(trak.iter().map(|_| TRACK));
        Self { mvhd, trak, unknown: Vec::new(), order }
    }

    /// The movie duration in seconds.
    pub fn duration(&self) -> f64 {
        self.mvhd.duration as f64 / self.mvhd.timescale as f64
    }
}

impl ParseAtom for Moov {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let mut mvhd = None;
        let mut trak = Vec::new();
        let mut unknown = Vec::new();
        let mut order = Vec::new();
        let mut parsed_bytes = 0;

        while parsed_bytes < size.content_len() {
            let head = parse_nested_head(reader)?;

            match head.fourcc() {
                MOVIE_HEADER => {
                    if mvhd.replace(Mvhd::parse(reader, head.size())?).is_some() {
                        return Err(crate::Error::new(
                            crate::ErrorKind::Selection(MOVIE_HEADER),
                            "Multiple movie header (mvhd) atoms inside a movie atom",
                        ));
                    }
                }
                TRACK => trak.push(Trak::parse(reader, head.size())?),
                _ => unknown.push(RawAtom::parse(reader, head)?),
            }

            order.push(head.fourcc());
            parsed_bytes += head.len();
        }
        if parsed_bytes != size.content_len() {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                "Children overrun the movie (moov) atom",
            ));
        }

        let mvhd = mvhd.ok_or_else(|| {
            crate::Error::new(
                crate::ErrorKind::AtomNotFound(MOVIE_HEADER),
                "Movie atom is missing a movie header (mvhd) atom",
            )
        })?;
        if trak.is_empty() {
            return Err(crate::Error::new(
                crate::ErrorKind::AtomNotFound(TRACK),
                "Movie atom contains no track (trak) atoms",
            ));
        }

        Ok(Self { mvhd, trak, unknown, order })
    }
}

impl WriteAtom for Moov {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        let mut trak = self.trak.iter();
        let mut unknown = self.unknown.iter();
        for fourcc in self.order.iter() {
            match *fourcc {
                MOVIE_HEADER => self.mvhd.write(writer)?,
                TRACK => {
                    if let Some(a) = trak.next() {
                        a.write(writer)?;
                    }
                }
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
        let content_len = self.mvhd.len()
            + self.trak.iter().map(|a| a.len()).sum::<u64>()
            + self.unknown.iter().map(|a| a.len()).sum::<u64>();
        Size::from(content_len)
    }
}
