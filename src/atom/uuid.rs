use super::*;

/// Extended type of the box announcing the absolute timestamp and duration of the current
/// fragment in a live smooth streaming manifest.
const CURRENT_FRAGMENT_EXTENDED_TYPE: [u8; 16] = [
    0x6d, 0x1d, 0x9b, 0x05, 0x42, 0xd5, 0x44, 0xe6, 0x80, 0xe2, 0x14, 0x1d, 0xaf, 0xf7, 0x57, 0xb2,
];

/// Extended type of the box announcing the timestamps and durations of upcoming fragments.
const NEXT_FRAGMENTS_EXTENDED_TYPE: [u8; 16] = [
    0xd4, 0x80, 0x7e, 0xf2, 0xca, 0x39, 0x46, 0x95, 0x8e, 0x54, 0x26, 0xcb, 0x9e, 0x46, 0xa7, 0x9f,
];

fn write_extended_head(
    writer: &mut impl Write,
    size: Size,
    extended_type: &[u8; 16],
) -> crate::Result<()> {
    write_head(writer, Head::from(size, EXTENDED))?;
    writer.write_all(extended_type)?;
    write_full_head(writer, 1, [0; 3])
}

/// The smooth streaming `uuid` box carrying the timing of the current fragment.
///
/// Encode only; timestamps and durations are in the media timescale.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SsCurrent {
    pub timestamp: u64,
    pub duration: u64,
}

impl SsCurrent {
    pub fn write(&self, writer: &mut impl Write) -> crate::Result<()> {
        write_extended_head(writer, self.size(), &CURRENT_FRAGMENT_EXTENDED_TYPE)?;
        writer.write_be_u64(self.timestamp)?;
        writer.write_be_u64(self.duration)?;
        Ok(())
    }

    pub fn size(&self) -> Size {
        Size::from(16 + 4 + 16)
    }

    pub fn len(&self) -> u64 {
        self.size().len()
    }
}

/// The smooth streaming `uuid` box announcing upcoming fragments.
///
/// Encode only; at most 255 entries fit the count byte.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SsNext {
    pub entries: Vec<SsFragment>,
}

/// A single upcoming fragment, in media timescale units.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SsFragment {
    pub timestamp: u64,
    pub duration: u64,
}

impl SsNext {
    pub fn write(&self, writer: &mut impl Write) -> crate::Result<()> {
        if self.entries.len() > u8::MAX as usize {
            return Err(crate::Error::new(
                crate::ErrorKind::Parsing,
                format!("Fragment announcement with {} entries", self.entries.len()),
            ));
        }
        write_extended_head(writer, self.size(), &NEXT_FRAGMENTS_EXTENDED_TYPE)?;
        writer.write_u8(self.entries.len() as u8)?;
        for e in self.entries.iter() {
            writer.write_be_u64(e.timestamp)?;
            writer.write_be_u64(e.duration)?;
        }
        Ok(())
    }

    pub fn size(&self) -> Size {
        Size::from(16 + 4 + 1 + 16 * self.entries.len() as u64)
    }

    pub fn len(&self) -> u64 {
        self.size().len()
    }
}
