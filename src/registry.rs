use crate::boxes::{FourCC, IsoBox};
use crate::container::ContainerBox;
use crate::decoders::*;
use crate::error::Result;
use crate::known_boxes::KnownBox;
use std::collections::HashMap;

/// Builds an empty box for the given type code, ready for [`IsoBox::read`].
pub type BoxConstructor = fn(FourCC) -> Box<dyn IsoBox>;

#[derive(Clone, Copy)]
enum Entry {
    Box(BoxConstructor),
    Container,
}

/// Maps four-character type codes to box constructors.
///
/// Registering a code that is already present replaces the previous entry,
/// so callers can override any of the defaults before parsing.
#[derive(Clone, Default)]
pub struct Registry {
    map: HashMap<FourCC, Entry>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut codes: Vec<String> = self.map.keys().map(|k| k.to_string()).collect();
        codes.sort();
        f.debug_struct("Registry").field("types", &codes).finish()
    }
}

impl Registry {
    /// An empty registry; every box decodes as raw data.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn with_box(mut self, typ: FourCC, ctor: BoxConstructor) -> Self {
        self.map.insert(typ, Entry::Box(ctor));
        self
    }

    pub fn with_container(mut self, typ: FourCC) -> Self {
        self.map.insert(typ, Entry::Container);
        self
    }

    /// Register a decoder by name. The name must be exactly four bytes.
    pub fn register_box(&mut self, name: &str, ctor: BoxConstructor) -> Result<()> {
        let typ: FourCC = name.parse()?;
        self.map.insert(typ, Entry::Box(ctor));
        Ok(())
    }

    /// Register a type whose payload is nothing but child boxes.
    pub fn register_container_box(&mut self, name: &str) -> Result<()> {
        let typ: FourCC = name.parse()?;
        self.map.insert(typ, Entry::Container);
        Ok(())
    }

    pub fn contains(&self, typ: FourCC) -> bool {
        self.map.contains_key(&typ)
    }

    pub fn is_container(&self, typ: FourCC) -> bool {
        matches!(self.map.get(&typ), Some(Entry::Container))
    }

    /// Instantiate a registered box, or `None` when `typ` is unknown.
    pub fn create(&self, typ: FourCC) -> Option<Box<dyn IsoBox>> {
        match self.map.get(&typ)? {
            Entry::Box(ctor) => Some(ctor(typ)),
            Entry::Container => Some(Box::new(ContainerBox::new(typ))),
        }
    }
}

fn ctor<T: IsoBox + Default>(_: FourCC) -> Box<dyn IsoBox> {
    Box::new(T::default())
}

/// Registry with every box type this crate knows how to decode.
pub fn default_registry() -> Registry {
    let mut reg = Registry::new();
    for kb in KnownBox::ALL.iter().filter(|kb| kb.is_container()) {
        reg = reg.with_container(kb.fourcc());
    }

    reg.with_box(FourCC(*b"ftyp"), ctor::<Ftyp>)
        // movie
        .with_box(FourCC(*b"mvhd"), ctor::<Mvhd>)
        .with_box(FourCC(*b"tkhd"), ctor::<Tkhd>)
        .with_box(FourCC(*b"mdhd"), ctor::<Mdhd>)
        .with_box(FourCC(*b"hdlr"), ctor::<Hdlr>)
        // sample tables
        .with_box(FourCC(*b"stsd"), ctor::<Stsd>)
        .with_box(FourCC(*b"stts"), ctor::<Stts>)
        .with_box(FourCC(*b"stss"), ctor::<Stss>)
        .with_box(FourCC(*b"ctts"), ctor::<Ctts>)
        .with_box(FourCC(*b"stsz"), ctor::<Stsz>)
        .with_box(FourCC(*b"stsc"), ctor::<Stsc>)
        .with_box(FourCC(*b"stco"), ctor::<Stco>)
        .with_box(FourCC(*b"co64"), ctor::<Co64>)
        .with_box(FourCC(*b"elst"), ctor::<Elst>)
        // sample entries
        .with_box(FourCC(*b"hvc1"), VisualSampleEntry::boxed)
        .with_box(FourCC(*b"hev1"), VisualSampleEntry::boxed)
        .with_box(FourCC(*b"avc1"), VisualSampleEntry::boxed)
        .with_box(FourCC(*b"avc3"), VisualSampleEntry::boxed)
        .with_box(FourCC(*b"av01"), VisualSampleEntry::boxed)
        .with_box(FourCC(*b"mp4a"), ctor::<Mp4a>)
        .with_box(FourCC(*b"hvcC"), ctor::<Hvcc>)
        .with_box(FourCC(*b"avcC"), ctor::<Avcc>)
        // data references / protection
        .with_box(FourCC(*b"dref"), ctor::<Dref>)
        .with_box(FourCC(*b"url "), ctor::<Url>)
        .with_box(FourCC(*b"urn "), ctor::<Urn>)
        .with_box(FourCC(*b"frma"), ctor::<Frma>)
        .with_box(FourCC(*b"schm"), ctor::<Schm>)
        // HEIF items
        .with_box(FourCC(*b"meta"), ctor::<Meta>)
        .with_box(FourCC(*b"pitm"), ctor::<Pitm>)
        .with_box(FourCC(*b"iinf"), ctor::<Iinf>)
        .with_box(FourCC(*b"infe"), ctor::<Infe>)
        .with_box(FourCC(*b"iloc"), ctor::<Iloc>)
        .with_box(FourCC(*b"iref"), ctor::<Iref>)
        .with_box(FourCC(*b"dimg"), SingleItemTypeReference::boxed)
        .with_box(FourCC(*b"thmb"), SingleItemTypeReference::boxed)
        .with_box(FourCC(*b"cdsc"), SingleItemTypeReference::boxed)
        .with_box(FourCC(*b"idat"), ctor::<Idat>)
        .with_box(FourCC(*b"ipma"), ctor::<Ipma>)
        .with_box(FourCC(*b"ipco"), ctor::<Ipco>)
        .with_box(FourCC(*b"ispe"), ctor::<Ispe>)
        .with_box(FourCC(*b"colr"), ctor::<Colr>)
        .with_box(FourCC(*b"pixi"), ctor::<Pixi>)
        .with_box(FourCC(*b"irot"), ctor::<Irot>)
}
