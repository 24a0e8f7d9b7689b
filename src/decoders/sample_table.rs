//! Sample table boxes found under `stbl`, plus the edit list.

use crate::boxes::{FourCC, FullBoxHeader, IsoBox};
use crate::container::read_boxes;
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::parser::Parser;
use byteorder::BigEndian;
use serde::Serialize;

/// `stsd`: entry count followed by one sample entry box per codec.
#[derive(Debug, Default, Serialize)]
pub struct Stsd {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub entry_count: u32,
    #[serde(skip)]
    boxes: Vec<Box<dyn IsoBox>>,
}

impl IsoBox for Stsd {
    fn box_type(&self) -> FourCC {
        FourCC(*b"stsd")
    }

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        self.entry_count = cur.read_u32::<BigEndian>()?;
        self.boxes = read_boxes(parser, cur)?;
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }

    fn boxes(&self) -> &[Box<dyn IsoBox>] {
        &self.boxes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SttsEntry {
    pub sample_count: u32,
    pub sample_delta: u32,
}

// stts: decoding time deltas, run-length coded
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stts {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub entries: Vec<SttsEntry>,
}

impl Stts {
    pub fn sample_count(&self) -> u64 {
        self.entries.iter().map(|e| e.sample_count as u64).sum()
    }
}

impl IsoBox for Stts {
    fn box_type(&self) -> FourCC {
        FourCC(*b"stts")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        let count = cur.read_u32::<BigEndian>()?;
        self.entries.clear();
        for _ in 0..count {
            let sample_count = cur.read_u32::<BigEndian>()?;
            let sample_delta = cur.read_u32::<BigEndian>()?;
            self.entries.push(SttsEntry {
                sample_count,
                sample_delta,
            });
        }
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}

// stss: 1-based numbers of the sync samples
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stss {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub sample_numbers: Vec<u32>,
}

impl IsoBox for Stss {
    fn box_type(&self) -> FourCC {
        FourCC(*b"stss")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        let count = cur.read_u32::<BigEndian>()?;
        self.sample_numbers.clear();
        for _ in 0..count {
            self.sample_numbers.push(cur.read_u32::<BigEndian>()?);
        }
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CttsEntry {
    pub sample_count: u32,
    pub sample_offset: i64,
}

// ctts: composition offsets; unsigned in version 0, signed in version 1
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ctts {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub entries: Vec<CttsEntry>,
}

impl IsoBox for Ctts {
    fn box_type(&self) -> FourCC {
        FourCC(*b"ctts")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        let count = cur.read_u32::<BigEndian>()?;
        self.entries.clear();
        for _ in 0..count {
            let sample_count = cur.read_u32::<BigEndian>()?;
            let sample_offset = if self.full.version == 0 {
                cur.read_u32::<BigEndian>()? as i64
            } else {
                cur.read_i32::<BigEndian>()? as i64
            };
            self.entries.push(CttsEntry {
                sample_count,
                sample_offset,
            });
        }
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}

// stsz: one constant size, or a size per sample when that is 0
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stsz {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub sample_size: u32,
    pub sample_count: u32,
    pub sample_sizes: Vec<u32>,
}

impl Stsz {
    /// Size of the 1-based sample `n`.
    pub fn size_of(&self, n: u32) -> Option<u32> {
        if n == 0 || n > self.sample_count {
            return None;
        }
        if self.sample_size != 0 {
            return Some(self.sample_size);
        }
        self.sample_sizes.get(n as usize - 1).copied()
    }
}

impl IsoBox for Stsz {
    fn box_type(&self) -> FourCC {
        FourCC(*b"stsz")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        self.sample_size = cur.read_u32::<BigEndian>()?;
        self.sample_count = cur.read_u32::<BigEndian>()?;
        self.sample_sizes.clear();
        if self.sample_size == 0 {
            for _ in 0..self.sample_count {
                self.sample_sizes.push(cur.read_u32::<BigEndian>()?);
            }
        }
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StscEntry {
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
    pub sample_description_index: u32,
}

// stsc: sample-to-chunk runs
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stsc {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub entries: Vec<StscEntry>,
}

impl IsoBox for Stsc {
    fn box_type(&self) -> FourCC {
        FourCC(*b"stsc")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        let count = cur.read_u32::<BigEndian>()?;
        self.entries.clear();
        for _ in 0..count {
            self.entries.push(StscEntry {
                first_chunk: cur.read_u32::<BigEndian>()?,
                samples_per_chunk: cur.read_u32::<BigEndian>()?,
                sample_description_index: cur.read_u32::<BigEndian>()?,
            });
        }
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}

// stco: 32-bit chunk offsets
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stco {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub chunk_offsets: Vec<u32>,
}

impl IsoBox for Stco {
    fn box_type(&self) -> FourCC {
        FourCC(*b"stco")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        let count = cur.read_u32::<BigEndian>()?;
        self.chunk_offsets.clear();
        for _ in 0..count {
            self.chunk_offsets.push(cur.read_u32::<BigEndian>()?);
        }
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}

// co64: 64-bit chunk offsets
#[derive(Debug, Clone, Default, Serialize)]
pub struct Co64 {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub chunk_offsets: Vec<u64>,
}

impl IsoBox for Co64 {
    fn box_type(&self) -> FourCC {
        FourCC(*b"co64")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        let count = cur.read_u32::<BigEndian>()?;
        self.chunk_offsets.clear();
        for _ in 0..count {
            self.chunk_offsets.push(cur.read_u64::<BigEndian>()?);
        }
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElstEntry {
    pub segment_duration: u64,
    /// -1 marks an empty edit.
    pub media_time: i64,
    pub media_rate_integer: i16,
    pub media_rate_fraction: i16,
}

// elst: edit list, 32- or 64-bit times by version
#[derive(Debug, Clone, Default, Serialize)]
pub struct Elst {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub entries: Vec<ElstEntry>,
}

impl IsoBox for Elst {
    fn box_type(&self) -> FourCC {
        FourCC(*b"elst")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        let count = cur.read_u32::<BigEndian>()?;
        self.entries.clear();
        for _ in 0..count {
            let (segment_duration, media_time) = if self.full.version == 1 {
                (cur.read_u64::<BigEndian>()?, cur.read_i64::<BigEndian>()?)
            } else {
                (
                    cur.read_u32::<BigEndian>()? as u64,
                    cur.read_i32::<BigEndian>()? as i64,
                )
            };
            self.entries.push(ElstEntry {
                segment_duration,
                media_time,
                media_rate_integer: cur.read_i16::<BigEndian>()?,
                media_rate_fraction: cur.read_i16::<BigEndian>()?,
            });
        }
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}
