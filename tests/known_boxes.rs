use isobmff::FourCC;
use isobmff::known_boxes::KnownBox;

#[test]
fn known_box_properties() {
    let ftyp = KnownBox::from(FourCC(*b"ftyp"));
    assert_eq!(ftyp, KnownBox::Ftyp);
    assert_eq!(ftyp.full_name(), "File Type Box");
    assert!(!ftyp.is_container());
    assert!(!ftyp.is_full_box());

    let moov = KnownBox::from(FourCC(*b"moov"));
    assert!(moov.is_container());
    assert!(!moov.is_full_box());

    let mvhd = KnownBox::from(FourCC(*b"mvhd"));
    assert_eq!(mvhd.full_name(), "Movie Header Box");
    assert!(mvhd.is_full_box());
}

#[test]
fn heif_boxes() {
    assert!(KnownBox::from(FourCC(*b"iprp")).is_container());
    assert!(KnownBox::from(FourCC(*b"ipco")).is_container());
    assert!(KnownBox::from(FourCC(*b"iloc")).is_full_box());
    assert!(KnownBox::from(FourCC(*b"ipma")).is_full_box());
    assert!(!KnownBox::from(FourCC(*b"idat")).is_full_box());
}

#[test]
fn unknown_box_keeps_its_code() {
    let kb = KnownBox::from(FourCC(*b"zzzz"));
    assert_eq!(kb, KnownBox::Unknown(FourCC(*b"zzzz")));
    assert_eq!(kb.fourcc(), FourCC(*b"zzzz"));
    assert_eq!(kb.full_name(), "Unknown Box");
    assert!(!kb.is_container());
}

#[test]
fn every_variant_round_trips_its_code() {
    for kb in KnownBox::ALL {
        assert_eq!(KnownBox::from(kb.fourcc()), *kb, "{}", kb.fourcc());
    }
}
