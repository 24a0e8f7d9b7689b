pub mod boxes;
pub mod container;
pub mod cursor;
pub mod decoders;
pub mod error;
pub mod file;
pub mod json_api;
pub mod known_boxes;
pub mod parser;
pub mod registry;
pub mod util;

pub use boxes::{BoxHeader, FourCC, FullBoxHeader, IsoBox, RawBox};
pub use container::{ContainerBox, read_box_header, read_boxes};
pub use cursor::ByteCursor;
pub use error::{Error, Result};
pub use file::File;
pub use json_api::{JsonBox, analyze_file};
pub use parser::{IrefContext, ParseOptions, Parser, StringType, parse_bytes, parse_path};
pub use registry::{BoxConstructor, Registry, default_registry};
