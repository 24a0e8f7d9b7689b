use crate::boxes::{self, FourCC, IsoBox};
use crate::container::read_boxes;
use crate::cursor::ByteCursor;
use crate::decoders::Ftyp;
use crate::error::Result;
use crate::parser::Parser;

/// Root of a parsed input: the ordered list of top-level boxes.
#[derive(Debug, Default)]
pub struct File {
    boxes: Vec<Box<dyn IsoBox>>,
}

impl File {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&mut self, parser: &mut Parser, cur: &mut ByteCursor<'_>) -> Result<()> {
        self.boxes = read_boxes(parser, cur)?;
        Ok(())
    }

    pub fn boxes(&self) -> &[Box<dyn IsoBox>] {
        &self.boxes
    }

    /// First top-level box of type `typ`.
    pub fn find(&self, typ: FourCC) -> Option<&dyn IsoBox> {
        boxes::find(&self.boxes, typ)
    }

    pub fn child<T: IsoBox>(&self) -> Option<&T> {
        boxes::child(&self.boxes)
    }

    pub fn children_of<T: IsoBox>(&self) -> impl Iterator<Item = &T> {
        boxes::children_of(&self.boxes)
    }

    pub fn major_brand(&self) -> Option<FourCC> {
        self.child::<Ftyp>().map(|f| f.major_brand)
    }

    /// True when the major brand is `heic`, i.e. the file carries HEIF image items.
    pub fn is_heic(&self) -> bool {
        self.major_brand() == Some(FourCC(*b"heic"))
    }
}
