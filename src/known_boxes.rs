use crate::boxes::FourCC;

macro_rules! known_boxes {
    ($($variant:ident => $code:literal, $name:literal;)*) => {
        /// Classification of the box types this crate has names for.
        ///
        /// Anything not in this list becomes `KnownBox::Unknown(fourcc)`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum KnownBox {
            $($variant,)*
            Unknown(FourCC),
        }

        impl KnownBox {
            /// Every named variant, in declaration order.
            pub const ALL: &'static [KnownBox] = &[$(KnownBox::$variant,)*];

            pub fn fourcc(&self) -> FourCC {
                match self {
                    $(KnownBox::$variant => FourCC(*$code),)*
                    KnownBox::Unknown(cc) => *cc,
                }
            }

            /// Human-readable box name, e.g. "Movie Header Box".
            pub fn full_name(&self) -> &'static str {
                match self {
                    $(KnownBox::$variant => $name,)*
                    KnownBox::Unknown(_) => "Unknown Box",
                }
            }
        }

        impl From<FourCC> for KnownBox {
            fn from(cc: FourCC) -> Self {
                match &cc.0 {
                    $($code => KnownBox::$variant,)*
                    _ => KnownBox::Unknown(cc),
                }
            }
        }
    };
}

known_boxes! {
    // file level
    Ftyp => b"ftyp", "File Type Box";
    Moov => b"moov", "Movie Box";
    Mdat => b"mdat", "Media Data Box";
    Free => b"free", "Free Space Box";
    Skip => b"skip", "Free Space Box";
    Wide => b"wide", "Wide Box";
    Pnot => b"pnot", "Preview Box";
    Meta => b"meta", "Meta Box";
    Uuid => b"uuid", "User Extension Box";

    // movie structure
    Mvhd => b"mvhd", "Movie Header Box";
    Trak => b"trak", "Track Box";
    Tkhd => b"tkhd", "Track Header Box";
    Tref => b"tref", "Track Reference Box";
    Edts => b"edts", "Edit Box";
    Elst => b"elst", "Edit List Box";
    Mdia => b"mdia", "Media Box";
    Mdhd => b"mdhd", "Media Header Box";
    Hdlr => b"hdlr", "Handler Reference Box";
    Minf => b"minf", "Media Information Box";
    Vmhd => b"vmhd", "Video Media Header Box";
    Smhd => b"smhd", "Sound Media Header Box";
    Dinf => b"dinf", "Data Information Box";
    Dref => b"dref", "Data Reference Box";
    Url => b"url ", "Data Entry URL Box";
    Urn => b"urn ", "Data Entry URN Box";
    Udta => b"udta", "User Data Box";
    Tapt => b"tapt", "Track Aperture Mode Dimensions Box";

    // sample tables
    Stbl => b"stbl", "Sample Table Box";
    Stsd => b"stsd", "Sample Description Box";
    Stts => b"stts", "Decoding Time to Sample Box";
    Ctts => b"ctts", "Composition Time to Sample Box";
    Stsc => b"stsc", "Sample To Chunk Box";
    Stsz => b"stsz", "Sample Size Box";
    Stco => b"stco", "Chunk Offset Box";
    Co64 => b"co64", "Chunk Large Offset Box";
    Stss => b"stss", "Sync Sample Box";

    // fragments
    Mvex => b"mvex", "Movie Extends Box";
    Moof => b"moof", "Movie Fragment Box";
    Traf => b"traf", "Track Fragment Box";
    Mfra => b"mfra", "Movie Fragment Random Access Box";

    // meta relations / partitions
    Meco => b"meco", "Additional Metadata Container Box";
    Mere => b"mere", "Metabox Relation Box";
    Fiin => b"fiin", "FD Item Information Box";
    Paen => b"paen", "Partition Entry";
    Strk => b"strk", "Sub Track Box";

    // protection
    Ipro => b"ipro", "Item Protection Box";
    Sinf => b"sinf", "Protection Scheme Information Box";
    Frma => b"frma", "Original Format Box";
    Schm => b"schm", "Scheme Type Box";
    Schi => b"schi", "Scheme Information Box";

    // HEIF items
    Pitm => b"pitm", "Primary Item Box";
    Iloc => b"iloc", "Item Location Box";
    Iinf => b"iinf", "Item Information Box";
    Infe => b"infe", "Item Information Entry";
    Iref => b"iref", "Item Reference Box";
    Dimg => b"dimg", "Derived Image Reference";
    Thmb => b"thmb", "Thumbnail Reference";
    Cdsc => b"cdsc", "Content Description Reference";
    Idat => b"idat", "Item Data Box";
    Iprp => b"iprp", "Item Properties Box";
    Ipco => b"ipco", "Item Property Container Box";
    Ipma => b"ipma", "Item Property Association Box";
    Ispe => b"ispe", "Image Spatial Extents Property";
    Colr => b"colr", "Colour Information Box";
    Pixi => b"pixi", "Pixel Information Property";
    Irot => b"irot", "Image Rotation Property";

    // sample entries and codec configuration
    Hvc1 => b"hvc1", "HEVC Sample Entry";
    Hev1 => b"hev1", "HEVC Sample Entry";
    Avc1 => b"avc1", "AVC Sample Entry";
    Avc3 => b"avc3", "AVC Sample Entry";
    Av01 => b"av01", "AV1 Sample Entry";
    Mp4a => b"mp4a", "MPEG-4 Audio Sample Entry";
    Hvcc => b"hvcC", "HEVC Configuration Box";
    Avcc => b"avcC", "AVC Configuration Box";
}

impl KnownBox {
    /// Does this box's payload consist of child boxes only?
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            KnownBox::Moov
                | KnownBox::Trak
                | KnownBox::Edts
                | KnownBox::Mdia
                | KnownBox::Minf
                | KnownBox::Stbl
                | KnownBox::Mvex
                | KnownBox::Moof
                | KnownBox::Traf
                | KnownBox::Mfra
                | KnownBox::Meco
                | KnownBox::Mere
                | KnownBox::Dinf
                | KnownBox::Ipro
                | KnownBox::Sinf
                | KnownBox::Iprp
                | KnownBox::Ipco
                | KnownBox::Fiin
                | KnownBox::Paen
                | KnownBox::Strk
                | KnownBox::Tapt
                | KnownBox::Schi
                | KnownBox::Udta
        )
    }

    /// Is this a FullBox (version + flags)?
    pub fn is_full_box(&self) -> bool {
        matches!(
            self,
            KnownBox::Mvhd
                | KnownBox::Tkhd
                | KnownBox::Elst
                | KnownBox::Mdhd
                | KnownBox::Hdlr
                | KnownBox::Vmhd
                | KnownBox::Smhd
                | KnownBox::Dref
                | KnownBox::Url
                | KnownBox::Urn
                | KnownBox::Stsd
                | KnownBox::Stts
                | KnownBox::Ctts
                | KnownBox::Stsc
                | KnownBox::Stsz
                | KnownBox::Stco
                | KnownBox::Co64
                | KnownBox::Stss
                | KnownBox::Schm
                | KnownBox::Pitm
                | KnownBox::Iloc
                | KnownBox::Iinf
                | KnownBox::Infe
                | KnownBox::Iref
                | KnownBox::Ipma
                | KnownBox::Ispe
                | KnownBox::Pixi
        )
    }
}
