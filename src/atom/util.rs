use std::io::{self, Read, Seek, SeekFrom, Write};

pub trait ReadUtil: Read {
    /// Attempts to read an unsigned 8 bit integer from the reader.
    fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Attempts to read an unsigned 16 bit big endian integer from the reader.
    fn read_be_u16(&mut self) -> io::Result<u16> {
        let mut buf = [0; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Attempts to read an unsigned 32 bit big endian integer from the reader.
    fn read_be_u32(&mut self) -> io::Result<u32> {
        let mut buf = [0; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Attempts to read an unsigned 64 bit big endian integer from the reader.
    fn read_be_u64(&mut self) -> io::Result<u64> {
        let mut buf = [0; 8];
        self.read_exact(&mut buf)?;
        Ok(u64::from_be_bytes(buf))
    }

    /// Attempts to read 8 bit unsigned integers from the reader to a vector of size length.
    fn read_u8_vec(&mut self, len: u64) -> io::Result<Vec<u8>> {
        let mut buf = vec![0; len as usize];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }
}

impl<T: Read> ReadUtil for T {}

pub trait SeekUtil: Seek {
    /// Attempts to read the remaining stream length and returns to the starting position.
    fn remaining_stream_len(&mut self) -> io::Result<u64> {
        let current_pos = self.stream_position()?;
        let complete_len = self.seek(SeekFrom::End(0))?;
        let len = complete_len - current_pos;

        self.seek(SeekFrom::Start(current_pos))?;

        Ok(len)
    }

    fn skip(&mut self, offset: i64) -> io::Result<()> {
        self.seek(SeekFrom::Current(offset))?;
        Ok(())
    }
}

impl<T: Seek> SeekUtil for T {}

pub trait WriteUtil: Write {
    fn write_u8(&mut self, val: u8) -> io::Result<()> {
        self.write_all(&[val])
    }

    fn write_be_u16(&mut self, val: u16) -> io::Result<()> {
        self.write_all(&val.to_be_bytes())
    }

    fn write_be_u32(&mut self, val: u32) -> io::Result<()> {
        self.write_all(&val.to_be_bytes())
    }

    fn write_be_u64(&mut self, val: u64) -> io::Result<()> {
        self.write_all(&val.to_be_bytes())
    }
}

impl<T: Write> WriteUtil for T {}

/// Copies `len` bytes starting at `pos` from the reader to the writer.
pub fn copy_range(
    reader: &mut (impl Read + Seek),
    writer: &mut impl Write,
    pos: u64,
    len: u64,
) -> crate::Result<()> {
    reader.seek(SeekFrom::Start(pos))?;
    let copied = io::copy(&mut reader.take(len), writer)?;
    if copied != len {
        return Err(crate::Error::new(
            crate::ErrorKind::Parsing,
            format!("Truncated source: expected {len} bytes at position {pos}, found {copied}"),
        ));
    }
    Ok(())
}
