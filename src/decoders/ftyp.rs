use crate::boxes::{FourCC, IsoBox};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::parser::{Parser, StringType};
use byteorder::BigEndian;
use serde::Serialize;

/// `ftyp`: major brand, minor version and compatible brands.
///
/// Decoding also fixes the string encoding for the rest of the parse:
/// QuickTime files (`qt  `) use Pascal strings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ftyp {
    pub major_brand: FourCC,
    pub minor_version: u32,
    pub compatible_brands: Vec<FourCC>,
}

impl Ftyp {
    pub fn is_compatible_with(&self, brand: FourCC) -> bool {
        self.major_brand == brand || self.compatible_brands.contains(&brand)
    }
}

impl IsoBox for Ftyp {
    fn box_type(&self) -> FourCC {
        FourCC(*b"ftyp")
    }

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.major_brand = cur.read_fourcc()?;
        parser.set_string_type(if self.major_brand == b"qt  " {
            StringType::Pascal
        } else {
            StringType::NulTerminated
        });
        self.minor_version = cur.read_u32::<BigEndian>()?;

        self.compatible_brands.clear();
        while cur.remaining_bytes() >= 4 {
            self.compatible_brands.push(cur.read_fourcc()?);
        }
        Ok(())
    }
}
