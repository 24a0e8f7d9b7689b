use crate::{
    boxes::{BoxFields, IsoBox},
    file::File,
    known_boxes::KnownBox,
    parser::{ParseOptions, Parser},
};
use serde::Serialize;
use std::path::Path;

/// A JSON-serializable view of one box and its subtree.
///
/// Used by `isodump --json`, and handy for UIs that only want plain data.
#[derive(Debug, Serialize)]
pub struct JsonBox {
    pub typ: String,
    pub full_name: String,
    pub version: Option<u8>,
    pub flags: Option<u32>,
    pub kind: String,
    pub fields: serde_json::Value,
    pub children: Option<Vec<JsonBox>>,
}

impl JsonBox {
    pub fn from_box(b: &dyn IsoBox) -> Self {
        let kb = KnownBox::from(b.box_type());
        let full = b.full_header();
        let kids = b.boxes();

        let kind = if b.raw_data().is_some() {
            "raw"
        } else if !kids.is_empty() || kb.is_container() {
            "container"
        } else if full.is_some() {
            "full"
        } else {
            "leaf"
        };

        JsonBox {
            typ: b.box_type().to_string(),
            full_name: kb.full_name().to_string(),
            version: full.map(|h| h.version),
            flags: full.map(|h| h.flags),
            kind: kind.to_string(),
            fields: b.fields(),
            children: if kids.is_empty() {
                None
            } else {
                Some(kids.iter().map(|c| JsonBox::from_box(&**c)).collect())
            },
        }
    }
}

/// JSON tree of every top-level box in `file`.
pub fn to_json_tree(file: &File) -> Vec<JsonBox> {
    file.boxes().iter().map(|b| JsonBox::from_box(&**b)).collect()
}

/// Parse `path` and return its box tree.
pub fn analyze_file(path: impl AsRef<Path>, options: ParseOptions) -> anyhow::Result<Vec<JsonBox>> {
    let mut parser = Parser::new().with_options(options);
    let file = parser.parse_path(path)?;
    Ok(to_json_tree(&file))
}
