use crate::boxes::{FourCC, FullBoxHeader, IsoBox};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::parser::Parser;
use byteorder::BigEndian;
use serde::Serialize;

// frma: the sample entry type before protection was applied
#[derive(Debug, Clone, Default, Serialize)]
pub struct Frma {
    pub original_format: FourCC,
}

impl IsoBox for Frma {
    fn box_type(&self) -> FourCC {
        FourCC(*b"frma")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.original_format = cur.read_fourcc()?;
        Ok(())
    }
}

// schm: protection scheme, URI present when flag bit 0 is set
#[derive(Debug, Clone, Default, Serialize)]
pub struct Schm {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub scheme_type: FourCC,
    pub scheme_version: u32,
    pub scheme_uri: Option<String>,
}

impl IsoBox for Schm {
    fn box_type(&self) -> FourCC {
        FourCC(*b"schm")
    }

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        self.scheme_type = cur.read_fourcc()?;
        self.scheme_version = cur.read_u32::<BigEndian>()?;
        self.scheme_uri = if self.full.has_flag(0x1) {
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
