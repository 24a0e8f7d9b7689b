use crate::boxes::{FourCC, IsoBox};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::parser::Parser;
use crate::util::serialize_hex;
use byteorder::BigEndian;
use log::warn;
use serde::Serialize;

/// One parameter-set NAL unit, stored without its length prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NalUnit {
    #[serde(serialize_with = "serialize_hex")]
    pub data: Vec<u8>,
}

impl NalUnit {
    /// u16 length then that many bytes.
    pub fn read(cur: &mut ByteCursor<'_>) -> Result<Self> {
        let len = cur.read_u16::<BigEndian>()? as usize;
        Ok(NalUnit {
            data: cur.read(len)?,
        })
    }
}

/// Read NAL units until `count` are collected or the input runs out.
///
/// Returns `false` when the list was cut short.
pub(crate) fn read_nal_units(
    cur: &mut ByteCursor<'_>,
    count: usize,
    out: &mut Vec<NalUnit>,
) -> Result<bool> {
    for _ in 0..count {
        if !cur.has_bytes_available() {
            return Ok(false);
        }
        match NalUnit::read(cur) {
            Ok(nal) => out.push(nal),
            Err(e) if e.is_insufficient_data() => return Ok(false),
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HvccArray {
    pub array_completeness: bool,
    pub nal_unit_type: u8,
    pub nal_units: Vec<NalUnit>,
}

/// `hvcC`: HEVC decoder configuration record.
///
/// Truncated records are common in the wild. When the array list runs out
/// of input the arrays decoded so far are kept and `truncated` is set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Hvcc {
    pub configuration_version: u8,
    pub general_profile_space: u8,
    pub general_tier_flag: bool,
    pub general_profile_idc: u8,
    pub general_profile_compatibility_flags: u32,
    /// 48 bits.
    pub general_constraint_indicator_flags: u64,
    pub general_level_idc: u8,
    pub min_spatial_segmentation_idc: u16,
    pub parallelism_type: u8,
    pub chroma_format: u8,
    pub bit_depth_luma_minus8: u8,
    pub bit_depth_chroma_minus8: u8,
    pub avg_frame_rate: u16,
    pub constant_frame_rate: u8,
    pub num_temporal_layers: u8,
    pub temporal_id_nested: bool,
    pub length_size_minus_one: u8,
    pub arrays: Vec<HvccArray>,
    pub truncated: bool,
}

impl Hvcc {
    /// All NAL units of the given type (32 = VPS, 33 = SPS, 34 = PPS).
    pub fn nal_units_of_type(&self, nal_unit_type: u8) -> impl Iterator<Item = &NalUnit> {
        self.arrays
            .iter()
            .filter(move |a| a.nal_unit_type == nal_unit_type)
            .flat_map(|a| a.nal_units.iter())
    }

    fn read_arrays(&mut self, cur: &mut ByteCursor<'_>) -> Result<bool> {
        let count = cur.read_u8()?;
        for _ in 0..count {
            if !cur.has_bytes_available() {
                return Ok(false);
            }
            let b = cur.read_u8()?;
            let mut array = HvccArray {
                array_completeness: b & 0x80 != 0,
                nal_unit_type: b & 0x3f,
                nal_units: Vec::new(),
            };
            let complete = match cur.read_u16::<BigEndian>() {
                Ok(n) => read_nal_units(cur, n as usize, &mut array.nal_units)?,
                Err(e) if e.is_insufficient_data() => false,
                Err(e) => return Err(e),
            };
            self.arrays.push(array);
            if !complete {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl IsoBox for Hvcc {
    fn box_type(&self) -> FourCC {
        FourCC(*b"hvcC")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.configuration_version = cur.read_u8()?;

        let b = cur.read_u8()?;
        self.general_profile_space = b >> 6;
        self.general_tier_flag = (b >> 5) & 0x1 != 0;
        self.general_profile_idc = b & 0x1f;
        self.general_profile_compatibility_flags = cur.read_u32::<BigEndian>()?;

        let hi = cur.read_u16::<BigEndian>()? as u64;
        let lo = cur.read_u32::<BigEndian>()? as u64;
        self.general_constraint_indicator_flags = (hi << 32) | lo;
        self.general_level_idc = cur.read_u8()?;

        self.min_spatial_segmentation_idc = cur.read_u16::<BigEndian>()? & 0x0fff;
        self.parallelism_type = cur.read_u8()? & 0x03;
        self.chroma_format = cur.read_u8()? & 0x03;
        self.bit_depth_luma_minus8 = cur.read_u8()? & 0x07;
        self.bit_depth_chroma_minus8 = cur.read_u8()? & 0x07;
        self.avg_frame_rate = cur.read_u16::<BigEndian>()?;

        let b = cur.read_u8()?;
        self.constant_frame_rate = (b >> 6) & 0x03;
        self.num_temporal_layers = (b >> 3) & 0x07;
        self.temporal_id_nested = (b >> 2) & 0x01 != 0;
        self.length_size_minus_one = b & 0x03;

        self.arrays.clear();
        self.truncated = !self.read_arrays(cur)?;
        if self.truncated {
            warn!(
                "hvcC: input ended after {} parameter set arrays",
                self.arrays.len()
            );
        }
        Ok(())
    }
}
