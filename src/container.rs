use crate::boxes::{BoxHeader, FourCC, IsoBox};
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::parser::Parser;
use byteorder::BigEndian;
use log::debug;
use serde::Serialize;

/// A box whose whole payload is a list of child boxes (`moov`, `trak`, `iprp` ...).
#[derive(Debug, Serialize)]
pub struct ContainerBox {
    typ: FourCC,
    #[serde(skip)]
    boxes: Vec<Box<dyn IsoBox>>,
}

impl ContainerBox {
    pub fn new(typ: FourCC) -> Self {
        Self {
            typ,
            boxes: Vec::new(),
        }
    }
}

impl IsoBox for ContainerBox {
    fn box_type(&self) -> FourCC {
        self.typ
    }

    fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.boxes = read_boxes(parser, cur)?;
        Ok(())
    }

    fn boxes(&self) -> &[Box<dyn IsoBox>] {
        &self.boxes
    }
}

/// Read one box header at the current position.
///
/// `Ok(None)` means the list ended with a 4-byte zero terminator.
pub fn read_box_header(cur: &mut ByteCursor<'_>) -> Result<Option<BoxHeader>> {
    let start = cur.position();
    if cur.remaining_bytes() == 4 && cur.peek(0, 4)? == [0, 0, 0, 0] {
        cur.skip(4)?;
        return Ok(None);
    }

    let size32 = cur.read_u32::<BigEndian>()?;
    let typ = cur.read_fourcc()?;
    let (size, header_size) = if size32 == 1 {
        (cur.read_u64::<BigEndian>()?, 16)
    } else {
        (size32 as u64, 8)
    };

    if size == 0 {
        return Err(Error::malformed(typ, "box size is 0"));
    }
    if size < header_size {
        return Err(Error::malformed(
            typ,
            format!("box size {size} is smaller than its {header_size}-byte header"),
        ));
    }
    let payload = size - header_size;
    if payload > cur.remaining_bytes() {
        return Err(Error::malformed(
            typ,
            format!(
                "box payload of {payload} bytes exceeds the {} bytes left in its parent",
                cur.remaining_bytes()
            ),
        ));
    }

    Ok(Some(BoxHeader {
        size,
        typ,
        header_size,
        start,
    }))
}

/// Decode every box in `cur` until the window is exhausted.
///
/// Each child reads from a sub-cursor spanning exactly its payload, and the
/// parent always resumes right after the child's declared end.
pub fn read_boxes(parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<Vec<Box<dyn IsoBox>>> {
    parser.enter_box_list()?;
    let res = read_box_list(parser, cur);
    parser.leave_box_list();
    res
}

fn read_box_list(parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<Vec<Box<dyn IsoBox>>> {
    let mut kids = Vec::new();
    while cur.has_bytes_available() {
        let Some(h) = read_box_header(cur)? else {
            break;
        };

        let mut b = parser.create_box(h.typ);
        if h.typ == b"mdat" && parser.options().skip_mdat_data {
            debug!("skipping {} bytes of mdat payload at {}", h.payload_size(), h.start);
            cur.skip(h.payload_size())?;
            kids.push(b);
            continue;
        }

        let mut sub = cur.sub_cursor(h.payload_size())?;
        b.read(parser, &mut sub)?;
        if sub.has_bytes_available() {
            debug!(
                "'{}' at {}: {} trailing payload bytes left unread",
                h.typ,
                h.start,
                sub.remaining_bytes()
            );
        }
        kids.push(b);
    }
    Ok(kids)
}
