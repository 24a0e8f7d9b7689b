use crate::boxes::{FourCC, FullBoxHeader, IsoBox};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::parser::Parser;
use byteorder::BigEndian;
use serde::Serialize;

/// Where an item's bytes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConstructionMethod {
    /// Offsets are relative to the file (or the referenced data entry).
    File,
    /// Offsets point into the `idat` box of the same `meta`.
    Idat,
    /// Extents are resolved through item references.
    Item,
    Other(u8),
}

impl From<u8> for ConstructionMethod {
    fn from(v: u8) -> Self {
        match v {
            0 => ConstructionMethod::File,
            1 => ConstructionMethod::Idat,
            2 => ConstructionMethod::Item,
            n => ConstructionMethod::Other(n),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Extent {
    pub index: u64,
    pub offset: u64,
    pub length: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemLocation {
    pub item_id: u32,
    pub construction_method: u8,
    pub data_reference_index: u16,
    pub base_offset: u64,
    pub extents: Vec<Extent>,
}

impl ItemLocation {
    pub fn method(&self) -> ConstructionMethod {
        self.construction_method.into()
    }

    /// Sum of all extent lengths.
    pub fn total_length(&self) -> u64 {
        self.extents.iter().map(|e| e.length).sum()
    }
}

/// `iloc`: item location table.
///
/// Every numeric field width inside an item is set by the four size nibbles
/// of the box header. Only 0, 2, 4 and 8 are meaningful; any other value is
/// treated like 0 (field absent, decoded as zero).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Iloc {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub offset_size: u8,
    pub length_size: u8,
    pub base_offset_size: u8,
    pub index_size: u8,
    pub items: Vec<ItemLocation>,
}

// width in bytes of a size-nibble field; anything unexpected reads nothing
fn field_width(nibble: u8) -> usize {
    match nibble {
        2 | 4 | 8 => nibble as usize,
        _ => 0,
    }
}

impl Iloc {
    pub fn item(&self, item_id: u32) -> Option<&ItemLocation> {
        self.items.iter().find(|i| i.item_id == item_id)
    }

    fn read_item(&self, cur: &mut ByteCursor<'_>) -> Result<ItemLocation> {
        let version = self.full.version;
        let mut item = ItemLocation {
            item_id: if version < 2 {
                cur.read_u16::<BigEndian>()? as u32
            } else {
                cur.read_u32::<BigEndian>()?
            },
            ..Default::default()
        };
        if version == 1 || version == 2 {
            item.construction_method = (cur.read_u16::<BigEndian>()? & 0x000f) as u8;
        }
        item.data_reference_index = cur.read_u16::<BigEndian>()?;
        item.base_offset = cur.read_uint::<BigEndian>(field_width(self.base_offset_size))?;

        let extent_count = cur.read_u16::<BigEndian>()?;
        for _ in 0..extent_count {
            let mut extent = Extent::default();
            if (version == 1 || version == 2) && self.index_size > 0 {
                extent.index = cur.read_uint::<BigEndian>(field_width(self.index_size))?;
            }
            extent.offset = cur.read_uint::<BigEndian>(field_width(self.offset_size))?;
            extent.length = cur.read_uint::<BigEndian>(field_width(self.length_size))?;
            item.extents.push(extent);
        }
        Ok(item)
    }
}

impl IsoBox for Iloc {
    fn box_type(&self) -> FourCC {
        FourCC(*b"iloc")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;

        let b = cur.read_u8()?;
        self.offset_size = b >> 4;
        self.length_size = b & 0x0f;
        let b = cur.read_u8()?;
        self.base_offset_size = b >> 4;
        // reserved in version 0, never used there
        self.index_size = b & 0x0f;

        let count = if self.full.version < 2 {
            cur.read_u16::<BigEndian>()? as u32
        } else {
            cur.read_u32::<BigEndian>()?
        };

        self.items.clear();
        for _ in 0..count {
            let item = self.read_item(cur)?;
            self.items.push(item);
        }
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}
