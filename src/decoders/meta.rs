//! HEIF item structure: `meta` and the item boxes it carries.

use crate::boxes::{self, FourCC, FullBoxHeader, IsoBox};
use crate::container::read_boxes;
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::parser::{IrefContext, Parser};
use crate::util::serialize_hex;
use byteorder::BigEndian;
use serde::Serialize;

/// `meta`: a full box in ISO files, a plain box in QuickTime files.
///
/// The QuickTime layout is recognised by an `hdlr` type code right where the
/// version/flags word would otherwise be.
#[derive(Debug, Default, Serialize)]
pub struct Meta {
    #[serde(skip)]
    pub full: Option<FullBoxHeader>,
    #[serde(skip)]
    boxes: Vec<Box<dyn IsoBox>>,
}

impl IsoBox for Meta {
    fn box_type(&self) -> FourCC {
        FourCC(*b"meta")
    }

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        let quicktime = matches!(cur.peek(4, 4), Ok(t) if t == b"hdlr");
        self.full = if quicktime {
            None
        } else {
            Some(FullBoxHeader::read(cur)?)
        };
        self.boxes = read_boxes(parser, cur)?;
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        self.full
    }

    fn boxes(&self) -> &[Box<dyn IsoBox>] {
        &self.boxes
    }
}

// pitm: primary item id
#[derive(Debug, Clone, Default, Serialize)]
pub struct Pitm {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub item_id: u32,
}

impl IsoBox for Pitm {
    fn box_type(&self) -> FourCC {
        FourCC(*b"pitm")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        self.item_id = if self.full.version == 0 {
            cur.read_u16::<BigEndian>()? as u32
        } else {
            cur.read_u32::<BigEndian>()?
        };
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}

/// `iinf`: entry count followed by `infe` boxes.
#[derive(Debug, Default, Serialize)]
pub struct Iinf {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub entry_count: u32,
    #[serde(skip)]
    boxes: Vec<Box<dyn IsoBox>>,
}

impl Iinf {
    pub fn entries(&self) -> impl Iterator<Item = &Infe> {
        boxes::children_of(&self.boxes)
    }

    pub fn item_info(&self, item_id: u32) -> Option<&Infe> {
        self.entries().find(|e| e.item_id == item_id)
    }
}

impl IsoBox for Iinf {
    fn box_type(&self) -> FourCC {
        FourCC(*b"iinf")
    }

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        self.entry_count = if self.full.version == 0 {
            cur.read_u16::<BigEndian>()? as u32
        } else {
            cur.read_u32::<BigEndian>()?
        };
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

/// `infe`: one item's id, type and naming.
///
/// Versions 0 and 1 identify content by name/MIME type; versions 2 and 3
/// carry a four-character item type (`hvc1`, `grid`, `Exif`, `mime` ...).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Infe {
    #[serde(skip)]
    pub full: FullBoxHeader,
    pub item_id: u32,
    pub item_protection_index: u16,
    pub item_type: Option<FourCC>,
    pub item_name: String,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub item_uri_type: Option<String>,
}

impl Infe {
    /// Flag bit: the item is hidden from presentation.
    pub const HIDDEN: u32 = 0x1;

    pub fn is_hidden(&self) -> bool {
        self.full.has_flag(Self::HIDDEN)
    }
}

fn read_optional_string(parser: &Parser, cur: &mut ByteCursor<'_>) -> Result<Option<String>> {
    if cur.has_bytes_available() {
        Ok(Some(parser.read_string(cur)?))
    } else {
        Ok(None)
    }
}

impl IsoBox for Infe {
    fn box_type(&self) -> FourCC {
        FourCC(*b"infe")
    }

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        if self.full.version < 2 {
            self.item_id = cur.read_u16::<BigEndian>()? as u32;
            self.item_protection_index = cur.read_u16::<BigEndian>()?;
            self.item_name = parser.read_string(cur)?;
            self.content_type = read_optional_string(parser, cur)?;
            self.content_encoding = read_optional_string(parser, cur)?;
            return Ok(());
        }

        self.item_id = if self.full.version == 2 {
            cur.read_u16::<BigEndian>()? as u32
        } else {
            cur.read_u32::<BigEndian>()?
        };
        self.item_protection_index = cur.read_u16::<BigEndian>()?;
        let item_type = cur.read_fourcc()?;
        self.item_type = Some(item_type);
        self.item_name = parser.read_string(cur)?;
        if item_type == b"mime" {
            self.content_type = Some(parser.read_string(cur)?);
            self.content_encoding = read_optional_string(parser, cur)?;
        } else if item_type == b"uri " {
            self.item_uri_type = Some(parser.read_string(cur)?);
        }
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }
}

/// `iref`: typed references between items.
///
/// The children (`dimg`, `thmb`, `cdsc` ...) take their item-id width from
/// this box's version, which is published to them through the parser.
#[derive(Debug, Default, Serialize)]
pub struct Iref {
    #[serde(skip)]
    pub full: FullBoxHeader,
    #[serde(skip)]
    boxes: Vec<Box<dyn IsoBox>>,
}

impl Iref {
    pub fn references(&self) -> impl Iterator<Item = &SingleItemTypeReference> {
        boxes::children_of(&self.boxes)
    }

    /// All references of one type leaving `from_item_id`.
    pub fn references_from(
        &self,
        typ: FourCC,
        from_item_id: u32,
    ) -> impl Iterator<Item = &SingleItemTypeReference> {
        self.references()
            .filter(move |r| r.box_type() == typ && r.from_item_id == from_item_id)
    }
}

impl IsoBox for Iref {
    fn box_type(&self) -> FourCC {
        FourCC(*b"iref")
    }

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.full = FullBoxHeader::read(cur)?;
        let ctx = IrefContext {
            version: self.full.version,
        };
        self.boxes = parser.with_iref_context(ctx, |p| read_boxes(p, cur))?;
        Ok(())
    }

    fn full_header(&self) -> Option<FullBoxHeader> {
        Some(self.full)
    }

    fn boxes(&self) -> &[Box<dyn IsoBox>] {
        &self.boxes
    }
}

/// One reference list inside `iref`: `from_item_id` refers to `to_item_ids`.
///
/// Outside an `iref` the layout is unknown and the payload is kept raw.
#[derive(Debug, Clone, Serialize)]
pub struct SingleItemTypeReference {
    typ: FourCC,
    pub from_item_id: u32,
    pub to_item_ids: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_opt_hex")]
    raw: Option<Vec<u8>>,
}

fn serialize_opt_hex<S: serde::Serializer>(
    v: &Option<Vec<u8>>,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    match v {
        Some(bytes) => serialize_hex(bytes, s),
        None => s.serialize_none(),
    }
}

impl SingleItemTypeReference {
    pub fn new(typ: FourCC) -> Self {
        Self {
            typ,
            from_item_id: 0,
            to_item_ids: Vec::new(),
            raw: None,
        }
    }

    pub(crate) fn boxed(typ: FourCC) -> Box<dyn IsoBox> {
        Box::new(Self::new(typ))
    }
}

impl IsoBox for SingleItemTypeReference {
    fn box_type(&self) -> FourCC {
        self.typ
    }

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        let Some(ctx) = parser.iref_context() else {
            self.raw = Some(cur.read_all()?);
            return Ok(());
        };

        let wide = ctx.version != 0;
        let read_id = |cur: &mut ByteCursor<'_>| -> Result<u32> {
            if wide {
                cur.read_u32::<BigEndian>()
            } else {
                Ok(cur.read_u16::<BigEndian>()? as u32)
            }
        };
        self.from_item_id = read_id(cur)?;
        let count = cur.read_u16::<BigEndian>()?;
        self.to_item_ids.clear();
        for _ in 0..count {
            self.to_item_ids.push(read_id(cur)?);
        }
        Ok(())
    }

    fn raw_data(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }
}

// idat: item data addressed by construction method 1
#[derive(Debug, Clone, Default, Serialize)]
pub struct Idat {
    #[serde(serialize_with = "serialize_hex")]
    pub data: Vec<u8>,
}

impl Idat {
    /// Bytes `[offset, offset + length)` of the item data, if in range.
    pub fn slice(&self, offset: u64, length: u64) -> Option<&[u8]> {
        let start = usize::try_from(offset).ok()?;
        let end = start.checked_add(usize::try_from(length).ok()?)?;
        self.data.get(start..end)
    }
}

impl IsoBox for Idat {
    fn box_type(&self) -> FourCC {
        FourCC(*b"idat")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.data = cur.read_all()?;
        Ok(())
    }
}

/// Payload of a `grid` derived image item (stored in `idat` or `mdat`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImageGrid {
    pub version: u8,
    pub flags: u8,
    pub rows_minus_one: u8,
    pub columns_minus_one: u8,
    pub output_width: u32,
    pub output_height: u32,
}

impl ImageGrid {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cur = ByteCursor::new(data);
        let mut grid = ImageGrid {
            version: cur.read_u8()?,
            flags: cur.read_u8()?,
            rows_minus_one: cur.read_u8()?,
            columns_minus_one: cur.read_u8()?,
            ..Default::default()
        };
        // flag bit 0 selects 32-bit output dimensions
        if grid.flags & 0x1 == 0 {
            grid.output_width = cur.read_u16::<BigEndian>()? as u32;
            grid.output_height = cur.read_u16::<BigEndian>()? as u32;
        } else {
            grid.output_width = cur.read_u32::<BigEndian>()?;
            grid.output_height = cur.read_u32::<BigEndian>()?;
        }
        Ok(grid)
    }

    pub fn rows(&self) -> u32 {
        self.rows_minus_one as u32 + 1
    }

    pub fn columns(&self) -> u32 {
        self.columns_minus_one as u32 + 1
    }

    /// Number of tiles the grid is assembled from.
    pub fn tile_count(&self) -> u32 {
        self.rows() * self.columns()
    }
}
