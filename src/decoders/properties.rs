//! Item properties: the `ipco` container and the property boxes it holds.

use crate::boxes::{self, FourCC, FullBoxHeader, IsoBox};
use crate::container::read_boxes;
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::parser::Parser;
use crate::util::serialize_hex;
use byteorder::BigEndian;
use serde::Serialize;

/// `ipco`: ordered property boxes, addressed 1-based from `ipma`.
#[derive(Debug, Default, Serialize)]
pub struct Ipco {
    #[serde(skip)]
    boxes: Vec<Box<dyn IsoBox>>,
}

impl Ipco {
    /// Property number `index` as used by `ipma`; index 0 means "none".
    pub fn property(&self, index: u16) -> Option<&dyn IsoBox> {
        let i = (index as usize).checked_sub(1)?;
        self.boxes.get(i).map(|b| &**b)
    }

    /// First property of type `T`.
    pub fn get<T: IsoBox>(&self) -> Option<&T> {
        boxes::child(&self.boxes)
    }
}

impl IsoBox for Ipco {
    fn box_type(&self) -> FourCC {
        FourCC(*b"ipco")
    }

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.boxes = read_boxes(parser, cur)?;
        Ok(())
    }

    fn boxes(&self) -> &[Box<dyn IsoBox>] {
        &self.boxes
    }
}

// ispe: image width and height in pixels
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ispe {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub image_width: u32,
    pub image_height: u32,
}

impl IsoBox for Ispe {
    fn box_type(&self) -> FourCC {
        FourCC(*b"ispe")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        self.image_width = cur.read_u32::<BigEndian>()?;
        self.image_height = cur.read_u32::<BigEndian>()?;
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}

/// Decoded body of a `colr` box, by colour type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColourInfo {
    Nclx {
        colour_primaries: u16,
        transfer_characteristics: u16,
        matrix_coefficients: u16,
        full_range: bool,
    },
    /// `rICC` or `prof`.
    Icc {
        #[serde(serialize_with = "serialize_hex")]
        profile: Vec<u8>,
    },
    Other {
        #[serde(serialize_with = "serialize_hex")]
        data: Vec<u8>,
    },
}

impl Default for ColourInfo {
    fn default() -> Self {
        ColourInfo::Other { data: Vec::new() }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Colr {
    pub colour_type: FourCC,
    pub info: ColourInfo,
}

impl IsoBox for Colr {
    fn box_type(&self) -> FourCC {
        FourCC(*b"colr")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.colour_type = cur.read_fourcc()?;
        self.info = match self.colour_type.as_bytes() {
            b"nclx" => ColourInfo::Nclx {
                colour_primaries: cur.read_u16::<BigEndian>()?,
                transfer_characteristics: cur.read_u16::<BigEndian>()?,
                matrix_coefficients: cur.read_u16::<BigEndian>()?,
                full_range: cur.read_u8()? & 0x80 != 0,
            },
            b"rICC" | b"prof" => ColourInfo::Icc {
                profile: cur.read_all()?,
            },
            _ => ColourInfo::Other {
                data: cur.read_all()?,
            },
        };
        Ok(())
    }
}

// pixi: bits per channel
#[derive(Debug, Clone, Default, Serialize)]
pub struct Pixi {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub bits_per_channel: Vec<u8>,
}

impl IsoBox for Pixi {
    fn box_type(&self) -> FourCC {
        FourCC(*b"pixi")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        let count = cur.read_u8()?;
        self.bits_per_channel.clear();
        for _ in 0..count {
            self.bits_per_channel.push(cur.read_u8()?);
        }
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}

// irot: rotation in steps of 90 degrees, anti-clockwise
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Irot {
    pub angle: u8,
}

impl Irot {
    pub fn degrees(&self) -> u32 {
        self.angle as u32 * 90
    }
}

impl IsoBox for Irot {
    fn box_type(&self) -> FourCC {
        FourCC(*b"irot")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.angle = cur.read_u8()? & 0x3;
        Ok(())
    }
}
