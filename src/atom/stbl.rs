use std::ops::Range;

use super::*;

/// A struct representing the sample table atom (`stbl`).
///
/// `stts` and `stsc` are required; at most one of each of the remaining table kinds may be
/// present. Children are written back in the order they were parsed, unknown ones verbatim.
#[derive(Clone, Debug)]
pub struct Stbl {
    pub stsd: Option<Stsd>,
    pub stts: Stts,
    pub ctts: Option<Ctts>,
    pub stss: Option<Stss>,
    pub stsz: Option<Stsz>,
    pub stz2: Option<Stz2>,
    pub stsc: Stsc,
    pub stco: Option<Stco>,
    pub co64: Option<Co64>,
    pub unknown: Vec<RawAtom>,
    pub(crate) order: Vec<Fourcc>,
}

impl Atom for Stbl {
    const FOURCC: Fourcc = SAMPLE_TABLE;
}

impl Stbl {
    /// Creates a sample table with the two required children and a canonical child order.
    pub fn new(stts: Stts, stsc: Stsc) -> Self {
        Self {
            stsd: None,
            stts,
            ctts: None,
            stss: None,
            stsz: None,
            stz2: None,
            stsc,
            stco: None,
            co64: None,
            unknown: Vec::new(),
            order: vec![
                SAMPLE_TABLE_SAMPLE_DESCRIPTION,
                SAMPLE_TABLE_TIME_TO_SAMPLE,
                SAMPLE_TABLE_COMPOSITION_OFFSET,
                SAMPLE_TABLE_SYNC_SAMPLE,
                SAMPLE_TABLE_SAMPLE_SIZE,
                SAMPLE_TABLE_COMPACT_SAMPLE_SIZE,
                SAMPLE_TABLE_SAMPLE_TO_CHUNK,
                SAMPLE_TABLE_CHUNK_OFFSET,
                SAMPLE_TABLE_CHUNK_OFFSET_64,
            ],
        }
    }

    /// The chunk offsets as 64 bit values, regardless of the box kind carrying them.
    pub fn chunk_offsets(&self) -> crate::Result<Vec<u64>> {
        if let Some(a) = &self.stco {
            Ok(a.offsets.iter().map(|o| *o as u64).collect())
        } else if let Some(a) = &self.co64 {
            Ok(a.offsets.clone())
        } else {
            Err(crate::Error::new(
                crate::ErrorKind::AtomNotFound(SAMPLE_TABLE_CHUNK_OFFSET),
                "Sample table carries neither a chunk offset (stco) nor a co64 atom",
            ))
        }
    }

    /// A unified view over the sample sizes, regardless of the box kind carrying them.
    pub fn sample_sizes(&self) -> crate::Result<SampleSizes<'_>> {
        if let Some(a) = &self.stsz {
            match a.sample_size {
                0 => Ok(SampleSizes::Table(&a.sizes)),
                s => Ok(SampleSizes::Fixed { size: s, count: a.sample_count }),
            }
        } else if let Some(a) = &self.stz2 {
            Ok(SampleSizes::Table(&a.sizes))
        } else {
            Err(crate::Error::new(
                crate::ErrorKind::AtomNotFound(SAMPLE_TABLE_SAMPLE_SIZE),
                "Sample table carries neither a sample size (stsz) nor a stz2 atom",
            ))
        }
    }

    /// Converts a 32 bit chunk offset table into its 64 bit counterpart, keeping the child
    /// position.
    pub(crate) fn promote_chunk_offsets(&mut self) {
        if let Some(stco) = self.stco.take() {
            self.co64 = Some(Co64 { offsets: stco.offsets.iter().map(|o| *o as u64).collect() });
            for f in self.order.iter_mut() {
                if *f == SAMPLE_TABLE_CHUNK_OFFSET {
                    *f = SAMPLE_TABLE_CHUNK_OFFSET_64;
                }
            }
        }
    }
}

impl ParseAtom for Stbl {
    fn parse_atom(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Self> {
        let mut stsd = None;
        let mut stts = None;
        let mut ctts = None;
        let mut stss = None;
        let mut stsz = None;
        let mut stz2 = None;
        let mut stsc = None;
        let mut stco = None;
        let mut co64 = None;
        let mut unknown = Vec::new();
        let mut order = Vec::new();
        let mut parsed_bytes = 0;

        fn set<T>(slot: &mut Option<T>, val: T, fourcc: Fourcc) -> crate::Result<()> {
            if slot.replace(val).is_some() {
                return Err(crate::Error::new(
                    crate::ErrorKind::Selection(fourcc),
                    format!("Multiple '{fourcc}' atoms inside a sample table"),
                ));
            }
            Ok(())
        }

        while parsed_bytes < size.content_len() {
            let head = parse_nested_head(reader)?;
            let fourcc = head.fourcc();
            match fourcc {
                SAMPLE_TABLE_SAMPLE_DESCRIPTION => {
                    set(&mut stsd, Stsd::parse(reader, head.size())?, fourcc)?
                }
                SAMPLE_TABLE_TIME_TO_SAMPLE => {
                    set(&mut stts, Stts::parse(reader, head.size())?, fourcc)?
                }
                SAMPLE_TABLE_COMPOSITION_OFFSET => {
                    set(&mut ctts, Ctts::parse(reader, head.size())?, fourcc)?
                }
                SAMPLE_TABLE_SYNC_SAMPLE => {
                    set(&mut stss, Stss::parse(reader, head.size())?, fourcc)?
                }
                SAMPLE_TABLE_SAMPLE_SIZE => {
                    set(&mut stsz, Stsz::parse(reader, head.size())?, fourcc)?
                }
                SAMPLE_TABLE_COMPACT_SAMPLE_SIZE => {
                    set(&mut stz2, Stz2::parse(reader, head.size())?, fourcc)?
                }
                SAMPLE_TABLE_SAMPLE_TO_CHUNK => {
                    set(&mut stsc, Stsc::parse(reader, head.size())?, fourcc)?
                }
                SAMPLE_TABLE_CHUNK_OFFSET => {
                    set(&mut stco, Stco::parse(reader, head.size())?, fourcc)?
                }
                SAMPLE_TABLE_CHUNK_OFFSET_64 => {
                    set(&mut co64, Co64::parse(reader, head.size())?, fourcc)?
                }
                _ => unknown.push(RawAtom::parse(reader, head)?),
            }

            order.push(fourcc);
            parsed_bytes += head.len();
        }
        if parsed_bytes != size.content_len() {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                "Children overrun the sample table (stbl) atom",
            ));
        }

        let stts = stts.ok_or_else(|| {
            crate::Error::new(
                crate::ErrorKind::AtomNotFound(SAMPLE_TABLE_TIME_TO_SAMPLE),
                "Sample table is missing a time to sample (stts) atom",
            )
        })?;
        let stsc = stsc.ok_or_else(|| {
            crate::Error::new(
                crate::ErrorKind::AtomNotFound(SAMPLE_TABLE_SAMPLE_TO_CHUNK),
                "Sample table is missing a sample to chunk (stsc) atom",
            )
        })?;

        Ok(Self { stsd, stts, ctts, stss, stsz, stz2, stsc, stco, co64, unknown, order })
    }
}

impl WriteAtom for Stbl {
    fn write_atom(&self, writer: &mut impl Write) -> crate::Result<()> {
        self.write_head(writer)?;
        let mut unknown = self.unknown.iter();
        for fourcc in self.order.iter() {
            match *fourcc {
                SAMPLE_TABLE_SAMPLE_DESCRIPTION => {
                    if let Some(a) = &self.stsd {
                        a.write(writer)?;
                    }
                }
                SAMPLE_TABLE_TIME_TO_SAMPLE => self.stts.write(writer)?,
                SAMPLE_TABLE_COMPOSITION_OFFSET => {
                    if let Some(a) = &self.ctts {
                        a.write(writer)?;
                    }
                }
                SAMPLE_TABLE_SYNC_SAMPLE => {
                    if let Some(a) = &self.stss {
                        a.write(writer)?;
                    }
                }
                SAMPLE_TABLE_SAMPLE_SIZE => {
                    if let Some(a) = &self.stsz {
                        a.write(writer)?;
                    }
                }
                SAMPLE_TABLE_COMPACT_SAMPLE_SIZE => {
                    if let Some(a) = &self.stz2 {
                        a.write(writer)?;
                    }
                }
                SAMPLE_TABLE_SAMPLE_TO_CHUNK => self.stsc.write(writer)?,
                SAMPLE_TABLE_CHUNK_OFFSET => {
                    if let Some(a) = &self.stco {
                        a.write(writer)?;
                    }
                }
                SAMPLE_TABLE_CHUNK_OFFSET_64 => {
                    if let Some(a) = &self.co64 {
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
        let content_len = self.stsd.len_or_zero()
            + self.stts.len()
            + self.ctts.len_or_zero()
            + self.stss.len_or_zero()
            + self.stsz.len_or_zero()
            + self.stz2.len_or_zero()
            + self.stsc.len()
            + self.stco.len_or_zero()
            + self.co64.len_or_zero()
            + self.unknown.iter().map(|a| a.len()).sum::<u64>();
        Size::from(content_len)
    }
}

/// A unified view over the `stsz`/`stz2` sample sizes of a track.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SampleSizes<'a> {
    /// All samples share the same size.
    Fixed { size: u32, count: u32 },
    /// One size per sample.
    Table(&'a [u32]),
}

impl SampleSizes<'_> {
    /// The number of samples in the track.
    pub fn count(&self) -> u64 {
        match self {
            Self::Fixed { count, .. } => *count as u64,
            Self::Table(sizes) => sizes.len() as u64,
        }
    }

    /// The summed byte size of the samples in the 0-based index range.
    pub fn sum(&self, range: Range<u64>) -> u64 {
        match self {
            Self::Fixed { size, .. } => (range.end - range.start) * *size as u64,
            Self::Table(sizes) => {
                sizes[range.start as usize..range.end as usize].iter().map(|s| *s as u64).sum()
            }
        }
    }
}
