//! Typed decoders for the leaf and structured boxes in the default registry.

pub mod avcc;
pub mod data_ref;
pub mod ftyp;
pub mod hvcc;
pub mod iloc;
pub mod ipma;
pub mod meta;
pub mod movie;
pub mod properties;
pub mod protection;
pub mod sample_entry;
pub mod sample_table;

pub use avcc::Avcc;
pub use data_ref::{Dref, Url, Urn};
pub use ftyp::Ftyp;
pub use hvcc::{Hvcc, HvccArray, NalUnit};
pub use iloc::{ConstructionMethod, Extent, Iloc, ItemLocation};
pub use ipma::{Association, Ipma, IpmaEntry};
pub use meta::{Idat, Iinf, ImageGrid, Infe, Iref, Meta, Pitm, SingleItemTypeReference};
pub use movie::{Hdlr, Matrix, Mdhd, Mvhd, Tkhd};
pub use properties::{ColourInfo, Colr, Ipco, Irot, Ispe, Pixi};
pub use protection::{Frma, Schm};
pub use sample_entry::{Mp4a, VisualSampleEntry};
pub use sample_table::{
    Co64, Ctts, CttsEntry, Elst, ElstEntry, Stco, Stsc, StscEntry, Stsd, Stss, Stsz, Stts,
    SttsEntry,
};
