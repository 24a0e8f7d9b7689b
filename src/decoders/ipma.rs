use crate::boxes::{FourCC, FullBoxHeader, IsoBox};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::parser::Parser;
use byteorder::BigEndian;
use serde::Serialize;

/// Flag bit: associations are 16 bits wide instead of 8.
pub const LARGE_PROPERTY_INDEX: u32 = 0x1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Association {
    pub essential: bool,
    /// 1-based index into `ipco`; 0 means "no property".
    pub property_index: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IpmaEntry {
    pub item_id: u32,
    pub associations: Vec<Association>,
}

/// `ipma`: which `ipco` properties apply to which items.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ipma {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub entries: Vec<IpmaEntry>,
}

impl Ipma {
    pub fn entry(&self, item_id: u32) -> Option<&IpmaEntry> {
        self.entries.iter().find(|e| e.item_id == item_id)
    }

    fn read_association(&self, cur: &mut ByteCursor<'_>) -> Result<Association> {
        Ok(if self.full.has_flag(LARGE_PROPERTY_INDEX) {
            let v = cur.read_u16::<BigEndian>()?;
            Association {
                essential: v & 0x8000 != 0,
                property_index: v & 0x7fff,
            }
        } else {
            let v = cur.read_u8()?;
            Association {
                essential: v & 0x80 != 0,
                property_index: (v & 0x7f) as u16,
            }
        })
    }
}

impl IsoBox for Ipma {
    fn box_type(&self) -> FourCC {
        FourCC(*b"ipma")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        let count = cur.read_u32::<BigEndian>()?;

        self.entries.clear();
        for _ in 0..count {
            let item_id = if self.full.version < 1 {
                cur.read_u16::<BigEndian>()? as u32
            } else {
                cur.read_u32::<BigEndian>()?
            };
            let n = cur.read_u8()?;
            let mut entry = IpmaEntry {
                item_id,
                associations: Vec::with_capacity(n as usize),
            };
            for _ in 0..n {
                entry.associations.push(self.read_association(cur)?);
            }
            self.entries.push(entry);
        }
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}
