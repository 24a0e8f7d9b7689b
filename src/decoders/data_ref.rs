use crate::boxes::{FourCC, FullBoxHeader, IsoBox};
use crate::container::read_boxes;
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::parser::Parser;
use byteorder::BigEndian;
use serde::Serialize;

/// Flag bit: the media data lives in the same file as the box.
pub const SELF_CONTAINED: u32 = 0x1;

/// `dref`: entry count followed by `url ` / `urn ` entries.
#[derive(Debug, Default, Serialize)]
pub struct Dref {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub entry_count: u32,
    #[serde(skip)]
    boxes: Vec<Box<dyn IsoBox>>,
}

impl IsoBox for Dref {
    fn box_type(&self) -> FourCC {
        FourCC(*b"dref")
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

#[derive(Debug, Clone, Default, Serialize)]
pub struct Url {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub location: Option<String>,
}

impl Url {
    pub fn is_self_contained(&self) -> bool {
        self.full.has_flag(SELF_CONTAINED)
    }
}

impl IsoBox for Url {
    fn box_type(&self) -> FourCC {
        FourCC(*b"url ")
    }

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        self.location = if self.is_self_contained() || !cur.has_bytes_available() {
            None
        } else {
            Some(parser.read_string(cur)?)
        };
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Urn {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub name: String,
    pub location: Option<String>,
}

impl IsoBox for Urn {
    fn box_type(&self) -> FourCC {
        FourCC(*b"urn ")
    }

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        self.name = parser.read_string(cur)?;
        self.location = if cur.has_bytes_available() {
            Some(parser.read_string(cur)?)
        } else {
            None
        };
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}
