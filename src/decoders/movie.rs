use crate::boxes::{FourCC, FullBoxHeader, IsoBox};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::parser::{Parser, StringType};
use crate::util::lang_from_u16;
use byteorder::BigEndian;
use serde::Serialize;

/// 3x3 transformation matrix stored as `a b u c d v x y w`.
///
/// `u`, `v` and `w` are 2.30 fixed point, the rest 16.16.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Matrix(pub [u32; 9]);

impl Default for Matrix {
    fn default() -> Self {
        Matrix([0x0001_0000, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000])
    }
}

impl Matrix {
    pub fn read(cur: &mut ByteCursor<'_>) -> Result<Self> {
        let mut m = [0u32; 9];
        for v in m.iter_mut() {
            *v = cur.read_u32::<BigEndian>()?;
        }
        Ok(Matrix(m))
    }

    pub fn is_identity(&self) -> bool {
        *self == Matrix::default()
    }
}

// times are 32-bit in version 0, 64-bit otherwise
fn read_time(cur: &mut ByteCursor<'_>, version: u8) -> Result<u64> {
    if version == 1 {
        cur.read_u64::<BigEndian>()
    } else {
        Ok(cur.read_u32::<BigEndian>()? as u64)
    }
}

// mvhd: movie-wide timing and defaults
#[derive(Debug, Clone, Default, Serialize)]
pub struct Mvhd {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    /// 16.16 fixed point, 0x00010000 is normal speed.
    pub rate: u32,
    /// 8.8 fixed point, 0x0100 is full volume.
    pub volume: u16,
    pub matrix: Matrix,
    pub next_track_id: u32,
}

impl Mvhd {
    pub fn rate_f32(&self) -> f32 {
        self.rate as f32 / 65536.0
    }

    pub fn volume_f32(&self) -> f32 {
        self.volume as f32 / 256.0
    }
}

impl IsoBox for Mvhd {
    fn box_type(&self) -> FourCC {
        FourCC(*b"mvhd")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        let v = self.full.version;
        self.creation_time = read_time(cur, v)?;
        self.modification_time = read_time(cur, v)?;
        self.timescale = cur.read_u32::<BigEndian>()?;
        self.duration = read_time(cur, v)?;
        self.rate = cur.read_u32::<BigEndian>()?;
        self.volume = cur.read_u16::<BigEndian>()?;
        cur.skip(2 + 4 * 2)?; // reserved
        self.matrix = Matrix::read(cur)?;
        cur.skip(4 * 6)?; // pre_defined
        self.next_track_id = cur.read_u32::<BigEndian>()?;
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}

// tkhd: per-track header with presentation size
#[derive(Debug, Clone, Default, Serialize)]
pub struct Tkhd {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub creation_time: u64,
    pub modification_time: u64,
    pub track_id: u32,
    pub duration: u64,
    pub layer: i16,
    pub alternate_group: i16,
    pub volume: u16,
    pub matrix: Matrix,
    pub width: f32,
    pub height: f32,
}

impl Tkhd {
    pub const FLAG_ENABLED: u32 = 0x1;
    pub const FLAG_IN_MOVIE: u32 = 0x2;
    pub const FLAG_IN_PREVIEW: u32 = 0x4;

    pub fn is_enabled(&self) -> bool {
        self.full.has_flag(Self::FLAG_ENABLED)
    }
}

impl IsoBox for Tkhd {
    fn box_type(&self) -> FourCC {
        FourCC(*b"tkhd")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        let v = self.full.version;
        self.creation_time = read_time(cur, v)?;
        self.modification_time = read_time(cur, v)?;
        self.track_id = cur.read_u32::<BigEndian>()?;
        cur.skip(4)?; // reserved
        self.duration = read_time(cur, v)?;
        cur.skip(4 * 2)?; // reserved
        self.layer = cur.read_i16::<BigEndian>()?;
        self.alternate_group = cur.read_i16::<BigEndian>()?;
        self.volume = cur.read_u16::<BigEndian>()?;
        cur.skip(2)?; // reserved
        self.matrix = Matrix::read(cur)?;
        self.width = cur.read_fixed_point::<BigEndian>(16, 16)?;
        self.height = cur.read_fixed_point::<BigEndian>(16, 16)?;
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}

// mdhd: media timescale, duration, language
#[derive(Debug, Clone, Default, Serialize)]
pub struct Mdhd {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    pub pad: bool,
    /// Three 5-bit letters, each offset from 0x60.
    pub language_codes: [u8; 3],
    pub pre_defined: u16,
}

impl Mdhd {
    /// ISO-639-2/T code such as `eng`, or `und` when unset.
    pub fn language(&self) -> String {
        let [a, b, c] = self.language_codes;
        lang_from_u16(((a as u16) << 10) | ((b as u16) << 5) | c as u16)
    }
}

impl IsoBox for Mdhd {
    fn box_type(&self) -> FourCC {
        FourCC(*b"mdhd")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        let v = self.full.version;
        self.creation_time = read_time(cur, v)?;
        self.modification_time = read_time(cur, v)?;
        self.timescale = cur.read_u32::<BigEndian>()?;
        self.duration = read_time(cur, v)?;

        let lang = cur.read_u16::<BigEndian>()?;
        self.pad = lang & 0x8000 != 0;
        self.language_codes = [
            ((lang >> 10) & 0x1f) as u8,
            ((lang >> 5) & 0x1f) as u8,
            (lang & 0x1f) as u8,
        ];
        self.pre_defined = cur.read_u16::<BigEndian>()?;
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}

// hdlr: handler type + name
#[derive(Debug, Clone, Default, Serialize)]
pub struct Hdlr {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub pre_defined: u32,
    pub handler_type: FourCC,
    pub reserved: [u32; 3],
    pub name: String,
}

impl IsoBox for Hdlr {
    fn box_type(&self) -> FourCC {
        FourCC(*b"hdlr")
    }

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        self.pre_defined = cur.read_u32::<BigEndian>()?;
        self.handler_type = cur.read_fourcc()?;
        for r in self.reserved.iter_mut() {
            *r = cur.read_u32::<BigEndian>()?;
        }

        // QuickTime handlers ("mhlr"/"dhlr", manufacturer "appl") use counted names
        let quicktime = self.pre_defined == u32::from_be_bytes(*b"mhlr")
            || self.reserved[0] == u32::from_be_bytes(*b"appl");
        self.name = if !cur.has_bytes_available() {
            String::new()
        } else if quicktime || parser.string_type() == StringType::Pascal {
            cur.read_pascal_string()?
        } else {
            cur.read_null_terminated_string()?
        };
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}
