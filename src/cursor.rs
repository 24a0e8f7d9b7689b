use crate::boxes::FourCC;
use crate::error::{Error, Result};
use byteorder::ByteOrder;
use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

#[derive(Clone, Copy)]
enum Source<'a> {
    Memory(&'a [u8]),
    File(&'a File),
}

/// Forward reader over a bounded window of an in-memory buffer or an open file.
///
/// A cursor only ever sees `[start, end)` of its source. Sub-cursors created
/// with [`ByteCursor::sub_cursor`] share the source but get their own window,
/// so a box can never read into its siblings no matter what its fields claim.
///
/// File-backed cursors track their own position and seek the shared handle
/// before every read; nested cursors therefore never disturb each other.
#[derive(Clone)]
pub struct ByteCursor<'a> {
    source: Source<'a>,
    start: u64,
    pos: u64,
    end: u64,
}

impl fmt::Debug for ByteCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.source {
            Source::Memory(_) => "memory",
            Source::File(_) => "file",
        };
        f.debug_struct("ByteCursor")
            .field("source", &kind)
            .field("start", &self.start)
            .field("pos", &self.pos)
            .field("end", &self.end)
            .finish()
    }
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            source: Source::Memory(data),
            start: 0,
            pos: 0,
            end: data.len() as u64,
        }
    }

    pub fn from_file(file: &'a File) -> Result<Self> {
        let len = file.metadata()?.len();
        Ok(Self {
            source: Source::File(file),
            start: 0,
            pos: 0,
            end: len,
        })
    }

    pub fn is_file_backed(&self) -> bool {
        matches!(self.source, Source::File(_))
    }

    /// Size of the whole window, consumed or not.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position relative to the start of this cursor's window.
    pub fn position(&self) -> u64 {
        self.pos - self.start
    }

    pub fn remaining_bytes(&self) -> u64 {
        self.end - self.pos
    }

    pub fn has_bytes_available(&self) -> bool {
        self.remaining_bytes() > 0
    }

    fn ensure(&self, requested: u64) -> Result<()> {
        let available = self.remaining_bytes();
        if requested > available {
            return Err(Error::InsufficientData {
                requested,
                available,
            });
        }
        Ok(())
    }

    fn fill(&self, at: u64, buf: &mut [u8]) -> Result<()> {
        match self.source {
            Source::Memory(data) => {
                let from = at as usize;
                let src = data
                    .get(from..from + buf.len())
                    .ok_or(Error::InsufficientData {
                        requested: buf.len() as u64,
                        available: (data.len() as u64).saturating_sub(at),
                    })?;
                buf.copy_from_slice(src);
            }
            Source::File(file) => {
                let mut file = file;
                file.seek(SeekFrom::Start(at))?;
                file.read_exact(buf)?;
            }
        }
        Ok(())
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.ensure(buf.len() as u64)?;
        self.fill(self.pos, buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    /// Consume exactly `n` bytes.
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        self.ensure(n as u64)?;
        let mut v = vec![0u8; n];
        self.read_exact(&mut v)?;
        Ok(v)
    }

    /// Consume everything left in the window.
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        let n = usize::try_from(self.remaining_bytes()).map_err(|_| Error::InsufficientData {
            requested: self.remaining_bytes(),
            available: usize::MAX as u64,
        })?;
        self.read(n)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut b = [0u8; N];
        self.read_exact(&mut b)?;
        Ok(b)
    }

    /// Look at `n` bytes starting `offset` bytes ahead without consuming anything.
    pub fn peek(&self, offset: u64, n: usize) -> Result<Vec<u8>> {
        self.ensure(offset.saturating_add(n as u64))?;
        let mut v = vec![0u8; n];
        self.fill(self.pos + offset, &mut v)?;
        Ok(v)
    }

    pub fn skip(&mut self, n: u64) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Move within the window. `SeekFrom::Start` is relative to the window start.
    /// Returns the new window-relative position.
    pub fn seek(&mut self, to: SeekFrom) -> Result<u64> {
        let target: i128 = match to {
            SeekFrom::Start(off) => self.start as i128 + off as i128,
            SeekFrom::Current(delta) => self.pos as i128 + delta as i128,
            SeekFrom::End(delta) => self.end as i128 + delta as i128,
        };
        if target < self.start as i128 || target > self.end as i128 {
            return Err(Error::InvalidSeek(target - self.start as i128));
        }
        self.pos = target as u64;
        Ok(self.position())
    }

    /// Split off the next `len` bytes as an independent cursor and advance past them.
    ///
    /// The returned cursor can never see more than `len` bytes even when the
    /// parent window is larger.
    pub fn sub_cursor(&mut self, len: u64) -> Result<ByteCursor<'a>> {
        self.ensure(len)?;
        let sub = ByteCursor {
            source: self.source,
            start: self.pos,
            pos: self.pos,
            end: self.pos + len,
        };
        self.pos += len;
        Ok(sub)
    }

    // ---------- Integers ----------

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16<B: ByteOrder>(&mut self) -> Result<u16> {
        Ok(B::read_u16(&self.read_array::<2>()?))
    }

    pub fn read_i16<B: ByteOrder>(&mut self) -> Result<i16> {
        Ok(B::read_i16(&self.read_array::<2>()?))
    }

    pub fn read_u24<B: ByteOrder>(&mut self) -> Result<u32> {
        Ok(B::read_u24(&self.read_array::<3>()?))
    }

    pub fn read_u32<B: ByteOrder>(&mut self) -> Result<u32> {
        Ok(B::read_u32(&self.read_array::<4>()?))
    }

    pub fn read_i32<B: ByteOrder>(&mut self) -> Result<i32> {
        Ok(B::read_i32(&self.read_array::<4>()?))
    }

    pub fn read_u64<B: ByteOrder>(&mut self) -> Result<u64> {
        Ok(B::read_u64(&self.read_array::<8>()?))
    }

    pub fn read_i64<B: ByteOrder>(&mut self) -> Result<i64> {
        Ok(B::read_i64(&self.read_array::<8>()?))
    }

    /// Unsigned integer stored in `nbytes` bytes (1..=8).
    pub fn read_uint<B: ByteOrder>(&mut self, nbytes: usize) -> Result<u64> {
        if nbytes == 0 || nbytes > 8 {
            return Ok(0);
        }
        let mut b = [0u8; 8];
        self.read_exact(&mut b[..nbytes])?;
        Ok(B::read_uint(&b[..nbytes], nbytes))
    }

    /// Fixed-point number with the given integer/fraction split (16.16, 8.8, 2.30 ...).
    ///
    /// 16-bit layouts read a u16, everything else a u32.
    pub fn read_fixed_point<B: ByteOrder>(
        &mut self,
        integer_bits: u32,
        fractional_bits: u32,
    ) -> Result<f32> {
        let n = if integer_bits + fractional_bits == 16 {
            self.read_u16::<B>()? as u64
        } else {
            self.read_u32::<B>()? as u64
        };
        let fractional_bits = fractional_bits.min(32);
        let mask = (1u64 << fractional_bits) - 1;
        let integer = n >> fractional_bits;
        let fraction = (n & mask) as f64 / (1u64 << fractional_bits) as f64;
        Ok((integer as f64 + fraction) as f32)
    }

    // ---------- Text ----------

    pub fn read_fourcc(&mut self) -> Result<FourCC> {
        Ok(FourCC(self.read_array::<4>()?))
    }

    /// Bytes up to the first NUL (consumed, not returned). The end of the
    /// window also terminates the string.
    pub fn read_null_terminated_string(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        while self.has_bytes_available() {
            match self.read_u8()? {
                0 => break,
                c => bytes.push(c),
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// One length byte followed by that many bytes.
    pub fn read_pascal_string(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        let bytes = self.read(len)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Fixed-width field, cut at the first NUL.
    pub fn read_fixed_string(&mut self, len: usize) -> Result<String> {
        let bytes = self.read(len)?;
        let text = bytes.split(|&b| b == 0).next().unwrap_or(&[]);
        Ok(String::from_utf8_lossy(text).into_owned())
    }
}
