use crate::boxes::{FourCC, IsoBox};
use crate::container::read_boxes;
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::parser::Parser;
use byteorder::BigEndian;
use serde::Serialize;

/// Video sample entry (`hvc1`, `hev1`, `avc1`, `avc3`, `av01`).
///
/// The codec configuration (`hvcC`, `avcC`, `av1C`) and optional boxes such
/// as `colr` or `pasp` follow the fixed fields as children.
#[derive(Debug, Serialize)]
pub struct VisualSampleEntry {
    typ: FourCC,
    pub data_reference_index: u16,
    pub width: u16,
    pub height: u16,
    pub horizontal_resolution: f32,
    pub vertical_resolution: f32,
    pub frame_count: u16,
    pub compressor_name: String,
    pub depth: u16,
    #[serde(skip)]
    boxes: Vec<Box<dyn IsoBox>>,
}

impl VisualSampleEntry {
    pub fn new(typ: FourCC) -> Self {
        Self {
            typ,
            data_reference_index: 0,
            width: 0,
            height: 0,
            horizontal_resolution: 0.0,
            vertical_resolution: 0.0,
            frame_count: 0,
            compressor_name: String::new(),
            depth: 0,
            boxes: Vec::new(),
        }
    }

    pub(crate) fn boxed(typ: FourCC) -> Box<dyn IsoBox> {
        Box::new(Self::new(typ))
    }
}

impl IsoBox for VisualSampleEntry {
    fn box_type(&self) -> FourCC {
        self.typ
    }

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        cur.skip(6)?; // reserved
        self.data_reference_index = cur.read_u16::<BigEndian>()?;
        cur.skip(2 + 2 + 4 * 3)?; // pre_defined, reserved, pre_defined[3]
        self.width = cur.read_u16::<BigEndian>()?;
        self.height = cur.read_u16::<BigEndian>()?;
        self.horizontal_resolution = cur.read_fixed_point::<BigEndian>(16, 16)?;
        self.vertical_resolution = cur.read_fixed_point::<BigEndian>(16, 16)?;
        cur.skip(4)?; // reserved
        self.frame_count = cur.read_u16::<BigEndian>()?;

        // 32-byte field holding a counted string
        let name = cur.read(32)?;
        let len = (name[0] as usize).min(31);
        self.compressor_name = String::from_utf8_lossy(&name[1..1 + len]).into_owned();

        self.depth = cur.read_u16::<BigEndian>()?;
        cur.skip(2)?; // pre_defined = -1
        self.boxes = read_boxes(parser, cur)?;
        Ok(())
    }

    fn boxes(&self) -> &[Box<dyn IsoBox>] {
        &self.boxes
    }
}

// mp4a: audio sample entry
#[derive(Debug, Default, Serialize)]
pub struct Mp4a {
    pub data_reference_index: u16,
    /// QuickTime sound description version; 0 for plain ISO files.
    pub sound_version: u16,
    pub channel_count: u16,
    pub sample_size: u16,
    /// 16.16 fixed point.
    pub sample_rate: u32,
    #[serde(skip)]
    boxes: Vec<Box<dyn IsoBox>>,
}

impl Mp4a {
    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate >> 16
    }
}

impl IsoBox for Mp4a {
    fn box_type(&self) -> FourCC {
        FourCC(*b"mp4a")
    }

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        cur.skip(6)?; // reserved
        self.data_reference_index = cur.read_u16::<BigEndian>()?;
        self.sound_version = cur.read_u16::<BigEndian>()?;
        cur.skip(2 + 4)?; // revision, vendor
        self.channel_count = cur.read_u16::<BigEndian>()?;
        self.sample_size = cur.read_u16::<BigEndian>()?;
        cur.skip(2 + 2)?; // pre_defined, reserved
        self.sample_rate = cur.read_u32::<BigEndian>()?;

        // QuickTime v1/v2 sound descriptions carry extra fields before the children
        match self.sound_version {
            1 => cur.skip(16)?,
            2 => cur.skip(36)?,
            _ => {}
        }
        self.boxes = read_boxes(parser, cur)?;
        Ok(())
    }

    fn boxes(&self) -> &[Box<dyn IsoBox>] {
        &self.boxes
    }
}
