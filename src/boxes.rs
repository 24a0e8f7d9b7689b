use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::parser::Parser;
use byteorder::BigEndian;
use serde::{Serialize, Serializer};
use std::any::Any;
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const fn new(code: [u8; 4]) -> Self {
        FourCC(code)
    }
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
    pub fn as_str_lossy(&self) -> String {
        self.0.iter().map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect()
    }
}
impl fmt::Debug for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }
impl fmt::Display for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }

impl FromStr for FourCC {
    type Err = Error;

    /// Box names must be exactly four bytes; anything else is a configuration error.
    fn from_str(s: &str) -> Result<Self> {
        let b = s.as_bytes();
        if b.len() == 4 {
            Ok(FourCC([b[0], b[1], b[2], b[3]]))
        } else {
            Err(Error::Configuration(s.to_string()))
        }
    }
}

impl PartialEq<&[u8; 4]> for FourCC {
    fn eq(&self, other: &&[u8; 4]) -> bool {
        &self.0 == *other
    }
}

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&self.as_str_lossy())
    }
}

/// The 8- or 16-byte header in front of every box payload.
#[derive(Debug, Clone)]
pub struct BoxHeader {
    pub size: u64,        // total size including header
    pub typ: FourCC,
    pub header_size: u64, // 8, or 16 with a 64-bit size
    pub start: u64,       // header offset inside the enclosing box list
}

impl BoxHeader {
    pub fn payload_size(&self) -> u64 {
        self.size - self.header_size
    }
}

/// Version and flags prefixed to the payload of a "full box".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FullBoxHeader {
    pub version: u8,
    pub flags: u32,
}

impl FullBoxHeader {
    pub fn read(cur: &mut ByteCursor<'_>) -> Result<Self> {
        let vf = cur.read_u32::<BigEndian>()?;
        Ok(FullBoxHeader {
            version: (vf >> 24) as u8,
            flags: vf & 0x00ff_ffff,
        })
    }

    pub fn has_flag(&self, bit: u32) -> bool {
        self.flags & bit != 0
    }
}

pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Decoded fields of a box as a JSON value. Implemented for every `Serialize` box.
pub trait BoxFields {
    fn fields(&self) -> serde_json::Value;
}

impl<T: Serialize> BoxFields for T {
    fn fields(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// One node of the box tree.
///
/// The registry builds an empty value, the enclosing box list calls [`IsoBox::read`]
/// exactly once with a cursor bounded to the payload, and the value is only
/// queried after that. Decoders fill `self` field by field, so a decoder that
/// fails halfway leaves the fields read so far in place.
pub trait IsoBox: Any + AsAny + BoxFields + fmt::Debug {
    fn box_type(&self) -> FourCC;

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()>;

    /// Version/flags for full boxes.
    fn full_header(&self) -> Option<FullBoxHeader> {
        None
    }

    /// Child boxes, for boxes that carry a nested box list.
    fn boxes(&self) -> &[Box<dyn IsoBox>] {
        &[]
    }

    /// Undecoded payload bytes, for boxes without a specific decoder.
    fn raw_data(&self) -> Option<&[u8]> {
        None
    }
}

impl dyn IsoBox {
    pub fn is<T: IsoBox>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Typed view of this box, if it actually is a `T`.
    pub fn downcast_ref<T: IsoBox>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// First direct child of type `typ`.
    pub fn find(&self, typ: FourCC) -> Option<&dyn IsoBox> {
        find(self.boxes(), typ)
    }

    /// First direct child decoded as `T`.
    pub fn child<T: IsoBox>(&self) -> Option<&T> {
        child(self.boxes())
    }

    pub fn children_of<T: IsoBox>(&self) -> impl Iterator<Item = &T> {
        children_of(self.boxes())
    }
}

pub(crate) fn find(boxes: &[Box<dyn IsoBox>], typ: FourCC) -> Option<&dyn IsoBox> {
    boxes.iter().map(|b| &**b).find(|b| b.box_type() == typ)
}

pub(crate) fn child<T: IsoBox>(boxes: &[Box<dyn IsoBox>]) -> Option<&T> {
    boxes.iter().find_map(|b| (**b).downcast_ref::<T>())
}

pub(crate) fn children_of<T: IsoBox>(boxes: &[Box<dyn IsoBox>]) -> impl Iterator<Item = &T> {
    boxes.iter().filter_map(|b| (**b).downcast_ref::<T>())
}

/// Fallback for type codes without a registered decoder: the payload is kept verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct RawBox {
    typ: FourCC,
    #[serde(serialize_with = "crate::util::serialize_hex")]
    data: Vec<u8>,
}

impl RawBox {
    pub fn new(typ: FourCC) -> Self {
        Self { typ, data: Vec::new() }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl IsoBox for RawBox {
    fn box_type(&self) -> FourCC {
        self.typ
    }

    fn read(&mut self, _parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.data = cur.read_all()?;
        Ok(())
    }

    fn raw_data(&self) -> Option<&[u8]> {
        Some(&self.data)
    }
}
