use crate::boxes::{FourCC, IsoBox};
use crate::cursor::ByteCursor;
use crate::decoders::hvcc::{NalUnit, read_nal_units};
use crate::error::Result;
use crate::parser::Parser;
use log::warn;
use serde::Serialize;

/// `avcC`: AVC decoder configuration record with its SPS and PPS lists.
///
/// Same leniency as `hvcC`: lists cut short by the end of the box are kept
/// as far as they go and `truncated` is set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Avcc {
    pub configuration_version: u8,
    pub avc_profile_indication: u8,
    pub profile_compatibility: u8,
    pub avc_level_indication: u8,
    pub length_size_minus_one: u8,
    pub sequence_parameter_sets: Vec<NalUnit>,
    pub picture_parameter_sets: Vec<NalUnit>,
    pub truncated: bool,
}

impl Avcc {
    fn read_parameter_sets(&mut self, cur: &mut ByteCursor<'_>) -> Result<bool> {
        let sps_count = (cur.read_u8()? & 0x1f) as usize;
        if !read_nal_units(cur, sps_count, &mut self.sequence_parameter_sets)? {
            return Ok(false);
        }
        if !cur.has_bytes_available() {
            // no PPS count at all
            return Ok(false);
        }
        let pps_count = cur.read_u8()? as usize;
        read_nal_units(cur, pps_count, &mut self.picture_parameter_sets)
    }
}

impl IsoBox for Avcc {
    fn box_type(&self) -> FourCC {
        FourCC(*b"avcC")
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.configuration_version = cur.read_u8()?;
        self.avc_profile_indication = cur.read_u8()?;
        self.profile_compatibility = cur.read_u8()?;
        self.avc_level_indication = cur.read_u8()?;
        self.length_size_minus_one = cur.read_u8()? & 0x03;

        self.sequence_parameter_sets.clear();
        self.picture_parameter_sets.clear();
        self.truncated = !self.read_parameter_sets(cur)?;
        if self.truncated {
            warn!(
                "avcC: input ended after {} SPS / {} PPS",
                self.sequence_parameter_sets.len(),
                self.picture_parameter_sets.len()
            );
        }
        Ok(())
    }
}
