use isobmff::decoders::{
    Co64, Ctts, Dref, Elst, Ftyp, Hdlr, Mdhd, Mvhd, Stco, Stsc, Stss, Stsz, Stts, Tkhd, Url,
};
use isobmff::{ByteCursor, FourCC, FullBoxHeader, IsoBox, Parser, StringType, parse_bytes};

fn make_box(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&(8 + payload.len() as u32).to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

fn decode(typ: &[u8; 4], payload: &[u8]) -> Box<dyn IsoBox> {
    let mut parser = Parser::new();
    let mut b = parser.create_box(FourCC(*typ));
    b.read(&mut parser, &mut ByteCursor::new(payload))
        .expect("decode failed");
    b
}

fn be32(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

const IDENTITY: [u32; 9] = [0x0001_0000, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000];

#[test]
fn movie_header() {
    let mut p = be32(&[0, 0xe400_b334, 0xe400_b334, 10_000, 0x3702, 0x0001_0000]);
    p.extend_from_slice(&[0x01, 0x00]);
    p.extend_from_slice(&[0; 10]);
    p.extend(be32(&IDENTITY));
    p.extend_from_slice(&[0; 24]);
    p.extend(be32(&[3]));
    assert_eq!(p.len(), 100);

    let b = decode(b"mvhd", &p);
    let mvhd = b.downcast_ref::<Mvhd>().unwrap();
    assert_eq!(b.full_header(), Some(FullBoxHeader { version: 0, flags: 0 }));
    assert_eq!(mvhd.creation_time, 3_825_251_124);
    assert_eq!(mvhd.modification_time, 3_825_251_124);
    assert_eq!(mvhd.timescale, 10_000);
    assert_eq!(mvhd.duration, 14_082);
    assert_eq!(mvhd.rate, 0x0001_0000);
    assert_eq!(mvhd.rate_f32(), 1.0);
    assert_eq!(mvhd.volume, 0x0100);
    assert_eq!(mvhd.volume_f32(), 1.0);
    assert!(mvhd.matrix.is_identity());
    assert_eq!(mvhd.next_track_id, 3);
}

#[test]
fn movie_header_version_1() {
    let mut p = be32(&[0x0100_0000]);
    p.extend_from_slice(&(1u64 << 33).to_be_bytes());
    p.extend_from_slice(&(1u64 << 34).to_be_bytes());
    p.extend(be32(&[600]));
    p.extend_from_slice(&(1u64 << 35).to_be_bytes());
    p.extend(be32(&[0x0002_0000]));
    p.extend_from_slice(&[0x00, 0x80]);
    p.extend_from_slice(&[0; 10]);
    p.extend(be32(&IDENTITY));
    p.extend_from_slice(&[0; 24]);
    p.extend(be32(&[2]));

    let b = decode(b"mvhd", &p);
    let mvhd = b.downcast_ref::<Mvhd>().unwrap();
    assert_eq!(mvhd.full.version, 1);
    assert_eq!(mvhd.creation_time, 1 << 33);
    assert_eq!(mvhd.modification_time, 1 << 34);
    assert_eq!(mvhd.duration, 1 << 35);
    assert_eq!(mvhd.rate_f32(), 2.0);
    assert_eq!(mvhd.volume_f32(), 0.5);
    assert_eq!(mvhd.next_track_id, 2);
}

#[test]
fn track_header() {
    let mut p = be32(&[0x0000_0007, 0xe400_b334, 0xe400_b334, 1, 0, 0x3702]);
    p.extend_from_slice(&[0; 16]);
    p.extend(be32(&IDENTITY));
    p.extend(be32(&[0x06c0_0000, 0x0900_0000]));
    assert_eq!(p.len(), 84);

    let b = decode(b"tkhd", &p);
    let tkhd = b.downcast_ref::<Tkhd>().unwrap();
    assert_eq!(tkhd.full.flags, 7);
    assert!(tkhd.is_enabled());
    assert!(tkhd.full.has_flag(Tkhd::FLAG_IN_PREVIEW));
    assert_eq!(tkhd.creation_time, 3_825_251_124);
    assert_eq!(tkhd.modification_time, 3_825_251_124);
    assert_eq!(tkhd.track_id, 1);
    assert_eq!(tkhd.duration, 0x3702);
    assert_eq!(tkhd.layer, 0);
    assert_eq!(tkhd.volume, 0);
    assert!(tkhd.matrix.is_identity());
    assert_eq!(tkhd.width, 1728.0);
    assert_eq!(tkhd.height, 2304.0);
}

#[test]
fn media_header_fields_in_order() {
    // payload as found in a damaged file: starts with a copy of the box header
    let p = [
        0x00, 0x00, 0x00, 0x20, 0x6d, 0x64, 0x68, 0x64, 0x00, 0x00, 0x00, 0x00, 0xe4, 0x00, 0xb3,
        0x34, 0xe4, 0x00, 0xb3, 0x34, 0x00, 0x01, 0x5f, 0x90, 0x00, 0x01, 0xef, 0x13, 0x00, 0x00,
        0x00, 0x00,
    ];
    let b = decode(b"mdhd", &p);
    let mdhd = b.downcast_ref::<Mdhd>().unwrap();
    assert_eq!(mdhd.full.version, 0);
    assert_eq!(mdhd.full.flags, 0x20);
    assert_eq!(mdhd.creation_time, 1_835_296_868);
    assert_eq!(mdhd.modification_time, 0);
    assert_eq!(mdhd.timescale, 0xe400_b334);
    assert_eq!(mdhd.duration, 0xe400_b334);
    assert!(!mdhd.pad);
    assert_eq!(mdhd.language_codes, [0, 0, 1]);
    assert_eq!(mdhd.pre_defined, 24_464);
}

#[test]
fn media_header_language() {
    // "eng" packed as three 5-bit letters
    let mut p = be32(&[0, 0, 0, 90_000, 180_000]);
    p.extend_from_slice(&0x15c7u16.to_be_bytes());
    p.extend_from_slice(&[0, 0]);
    let b = decode(b"mdhd", &p);
    let mdhd = b.downcast_ref::<Mdhd>().unwrap();
    assert_eq!(mdhd.timescale, 90_000);
    assert_eq!(mdhd.language(), "eng");
}

#[test]
fn truncated_media_header_keeps_decoded_fields() {
    let p = be32(&[0, 1, 2, 48_000]);
    let mut parser = Parser::new();
    let mut b = parser.create_box(FourCC(*b"mdhd"));
    let err = b.read(&mut parser, &mut ByteCursor::new(&p)).unwrap_err();
    assert!(err.is_insufficient_data());

    let mdhd = b.downcast_ref::<Mdhd>().unwrap();
    assert_eq!(mdhd.creation_time, 1);
    assert_eq!(mdhd.modification_time, 2);
    assert_eq!(mdhd.timescale, 48_000);
    assert_eq!(mdhd.duration, 0);
}

#[test]
fn handler_with_empty_name() {
    let mut p = be32(&[0, 0]);
    p.extend_from_slice(b"mdta");
    p.extend_from_slice(&[0; 12]);
    p.push(0);

    let b = decode(b"hdlr", &p);
    let hdlr = b.downcast_ref::<Hdlr>().unwrap();
    assert_eq!(hdlr.handler_type, FourCC(*b"mdta"));
    assert_eq!(hdlr.name, "");

    // no name bytes at all
    let b = decode(b"hdlr", &p[..p.len() - 1]);
    assert_eq!(b.downcast_ref::<Hdlr>().unwrap().name, "");
}

#[test]
fn handler_names() {
    let mut p = be32(&[0, 0]);
    p.extend_from_slice(b"vide");
    p.extend_from_slice(&[0; 12]);
    p.extend_from_slice(b"VideoHandler\0");
    let b = decode(b"hdlr", &p);
    assert_eq!(b.downcast_ref::<Hdlr>().unwrap().name, "VideoHandler");

    // QuickTime media handler: counted string
    let mut p = be32(&[0]);
    p.extend_from_slice(b"mhlrsoun");
    p.extend_from_slice(b"appl");
    p.extend_from_slice(&[0; 8]);
    p.push(13);
    p.extend_from_slice(b"Apple Handler");
    let b = decode(b"hdlr", &p);
    let hdlr = b.downcast_ref::<Hdlr>().unwrap();
    assert_eq!(hdlr.pre_defined, u32::from_be_bytes(*b"mhlr"));
    assert_eq!(hdlr.handler_type, FourCC(*b"soun"));
    assert_eq!(hdlr.name, "Apple Handler");
}

#[test]
fn file_type() {
    let p = [
        0x6d, 0x70, 0x34, 0x32, 0x00, 0x00, 0x00, 0x00, 0x69, 0x73, 0x6f, 0x6d, 0x6d, 0x70, 0x34,
        0x32,
    ];
    let mut parser = Parser::new();
    let mut b = parser.create_box(FourCC(*b"ftyp"));
    b.read(&mut parser, &mut ByteCursor::new(&p)).unwrap();

    let ftyp = b.downcast_ref::<Ftyp>().unwrap();
    assert_eq!(ftyp.major_brand, FourCC(*b"mp42"));
    assert_eq!(ftyp.minor_version, 0);
    assert_eq!(ftyp.compatible_brands, vec![FourCC(*b"isom"), FourCC(*b"mp42")]);
    assert!(ftyp.is_compatible_with(FourCC(*b"isom")));
    assert!(!ftyp.is_compatible_with(FourCC(*b"heic")));
    assert_eq!(parser.string_type(), StringType::NulTerminated);
}

#[test]
fn quicktime_brand_switches_to_counted_strings() {
    let mut data = make_box(b"ftyp", b"qt  \x20\x05\x03\x00qt  ");
    let mut hdlr = be32(&[0, 0]);
    hdlr.extend_from_slice(b"vide");
    hdlr.extend_from_slice(&[0; 12]);
    hdlr.push(5);
    hdlr.extend_from_slice(b"Video");
    data.extend(make_box(b"hdlr", &hdlr));

    let mut parser = Parser::new();
    let file = parser.parse_bytes(&data).unwrap();
    assert_eq!(parser.string_type(), StringType::Pascal);
    assert_eq!(file.child::<Hdlr>().unwrap().name, "Video");

    // a new parse starts over with NUL-terminated strings
    let mut other = make_box(b"ftyp", b"isom\0\0\0\0");
    other.extend(make_box(b"free", &[]));
    parser.parse_bytes(&other).unwrap();
    assert_eq!(parser.string_type(), StringType::NulTerminated);
}

#[test]
fn time_to_sample() {
    let mut p = be32(&[0, 9]);
    let runs = [
        (8, 3000),
        (1, 3746),
        (20, 3000),
        (2, 2991),
        (2, 3008),
        (2, 2992),
        (2, 3007),
        (2, 2992),
        (3, 3007),
    ];
    for (count, delta) in runs {
        p.extend(be32(&[count, delta]));
    }

    let b = decode(b"stts", &p);
    let stts = b.downcast_ref::<Stts>().unwrap();
    assert_eq!(stts.entries.len(), 9);
    for (entry, (count, delta)) in stts.entries.iter().zip(runs) {
        assert_eq!(entry.sample_count, count);
        assert_eq!(entry.sample_delta, delta);
    }
    assert_eq!(stts.sample_count(), 42);
}

#[test]
fn sync_samples() {
    let b = decode(b"stss", &be32(&[0, 2, 1, 31]));
    let stss = b.downcast_ref::<Stss>().unwrap();
    assert_eq!(stss.sample_numbers, vec![1, 31]);
}

const CTTS_ENTRIES: [(u32, u32); 41] = [
    (1, 1024), (1, 2560), (1, 1024), (1, 0), (1, 512), (1, 2560), (1, 1024), (1, 0), (1, 512),
    (1, 2688), (1, 1152), (1, 0), (1, 512), (1, 2560), (1, 1024), (1, 0), (1, 512), (1, 2560),
    (1, 1024), (1, 0), (1, 512), (1, 2560), (1, 1024), (1, 0), (1, 512), (1, 2560), (1, 1024),
    (1, 0), (1, 512), (1, 2560), (1, 1024), (1, 0), (1, 512), (1, 2560), (1, 1024), (1, 0),
    (1, 512), (1, 2048), (2, 512), (1, 1536), (1, 512),
];

#[test]
fn composition_offsets() {
    let mut p = be32(&[0, 41]);
    for (count, offset) in CTTS_ENTRIES {
        p.extend(be32(&[count, offset]));
    }
    assert_eq!(p.len(), 336);

    let b = decode(b"ctts", &p);
    let ctts = b.downcast_ref::<Ctts>().unwrap();
    assert_eq!(b.full_header(), Some(FullBoxHeader::default()));
    assert_eq!(ctts.entries.len(), 41);
    assert_eq!((ctts.entries[0].sample_count, ctts.entries[0].sample_offset), (1, 1024));
    assert_eq!((ctts.entries[1].sample_count, ctts.entries[1].sample_offset), (1, 2560));
    assert_eq!((ctts.entries[3].sample_count, ctts.entries[3].sample_offset), (1, 0));
    assert_eq!((ctts.entries[38].sample_count, ctts.entries[38].sample_offset), (2, 512));
}

#[test]
fn signed_composition_offsets() {
    let p = be32(&[0x0100_0000, 2, 1, (-512i32) as u32, 3, 0xffff_ffff]);
    let b = decode(b"ctts", &p);
    let ctts = b.downcast_ref::<Ctts>().unwrap();
    assert_eq!(ctts.entries[0].sample_offset, -512);
    assert_eq!(ctts.entries[1].sample_offset, -1);

    // version 0 reads the same bits unsigned
    let p = be32(&[0, 1, 1, 0xffff_ffff]);
    let b = decode(b"ctts", &p);
    assert_eq!(b.downcast_ref::<Ctts>().unwrap().entries[0].sample_offset, 0xffff_ffff);
}

#[test]
fn sample_sizes() {
    let b = decode(b"stsz", &be32(&[0, 0, 3, 1000, 2000, 3000]));
    let stsz = b.downcast_ref::<Stsz>().unwrap();
    assert_eq!(stsz.sample_sizes, vec![1000, 2000, 3000]);
    assert_eq!(stsz.size_of(2), Some(2000));
    assert_eq!(stsz.size_of(0), None);
    assert_eq!(stsz.size_of(4), None);

    let b = decode(b"stsz", &be32(&[0, 512, 10]));
    let stsz = b.downcast_ref::<Stsz>().unwrap();
    assert!(stsz.sample_sizes.is_empty());
    assert_eq!(stsz.size_of(10), Some(512));
}

#[test]
fn chunk_tables() {
    let b = decode(b"stsc", &be32(&[0, 2, 1, 5, 1, 10, 3, 1]));
    let stsc = b.downcast_ref::<Stsc>().unwrap();
    assert_eq!(stsc.entries.len(), 2);
    assert_eq!(stsc.entries[1].first_chunk, 10);
    assert_eq!(stsc.entries[1].samples_per_chunk, 3);
    assert_eq!(stsc.entries[1].sample_description_index, 1);

    let b = decode(b"stco", &be32(&[0, 2, 48, 1_000_000]));
    assert_eq!(b.downcast_ref::<Stco>().unwrap().chunk_offsets, vec![48, 1_000_000]);

    let mut p = be32(&[0, 1]);
    p.extend_from_slice(&(5u64 << 32).to_be_bytes());
    let b = decode(b"co64", &p);
    assert_eq!(b.downcast_ref::<Co64>().unwrap().chunk_offsets, vec![5u64 << 32]);
}

#[test]
fn edit_list() {
    let mut p = be32(&[0, 2, 1000, (-1i32) as u32]);
    p.extend_from_slice(&[0, 1, 0, 0]);
    p.extend(be32(&[5000, 2048]));
    p.extend_from_slice(&[0, 1, 0, 0]);

    let b = decode(b"elst", &p);
    let elst = b.downcast_ref::<Elst>().unwrap();
    assert_eq!(elst.entries.len(), 2);
    assert_eq!(elst.entries[0].segment_duration, 1000);
    assert_eq!(elst.entries[0].media_time, -1);
    assert_eq!(elst.entries[1].media_time, 2048);
    assert_eq!(elst.entries[1].media_rate_integer, 1);
    assert_eq!(elst.entries[1].media_rate_fraction, 0);
}

#[test]
fn data_reference() {
    // dref holding one self-contained url entry
    let data = [
        0x00, 0x00, 0x00, 0x1c, 0x64, 0x72, 0x65, 0x66, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x01, 0x00, 0x00, 0x00, 0x0c, 0x75, 0x72, 0x6c, 0x20, 0x00, 0x00, 0x00, 0x01,
    ];
    let b = decode(b"dref", &data[8..]);
    let dref = b.downcast_ref::<Dref>().unwrap();
    assert_eq!(dref.entry_count, 1);
    assert_eq!(b.boxes().len(), 1);

    let url = b.child::<Url>().unwrap();
    assert_eq!(url.full, FullBoxHeader { version: 0, flags: 1 });
    assert!(url.is_self_contained());
    assert_eq!(url.location, None);
}

#[test]
fn external_url() {
    let mut p = be32(&[0]);
    p.extend_from_slice(b"http://example.com/media.mp4\0");
    let b = decode(b"url ", &p);
    let url = b.downcast_ref::<Url>().unwrap();
    assert!(!url.is_self_contained());
    assert_eq!(url.location.as_deref(), Some("http://example.com/media.mp4"));
}

fn track(handler: &[u8; 4], timescale: u32) -> Vec<u8> {
    let mut tkhd = be32(&[0x0000_0003, 0, 0, 1, 0, 100]);
    tkhd.extend_from_slice(&[0; 16]);
    tkhd.extend(be32(&IDENTITY));
    tkhd.extend(be32(&[0x0140_0000, 0x00f0_0000]));

    let mut mdhd = be32(&[0, 0, 0, timescale, 100]);
    mdhd.extend_from_slice(&[0x55, 0xc4, 0, 0]);

    let mut hdlr = be32(&[0, 0]);
    hdlr.extend_from_slice(handler);
    hdlr.extend_from_slice(&[0; 12]);
    hdlr.push(0);

    let mut stbl = make_box(b"stsd", &be32(&[0, 0]));
    stbl.extend(make_box(b"stts", &be32(&[0, 1, 100, 1])));

    let mut minf = make_box(b"dinf", &make_box(b"dref", &be32(&[0, 0])));
    minf.extend(make_box(b"stbl", &stbl));

    let mut mdia = make_box(b"mdhd", &mdhd);
    mdia.extend(make_box(b"hdlr", &hdlr));
    mdia.extend(make_box(b"minf", &minf));

    let mut trak = make_box(b"tkhd", &tkhd);
    trak.extend(make_box(b"mdia", &mdia));
    make_box(b"trak", &trak)
}

#[test]
fn movie_tree_navigation() {
    let mut data = make_box(b"ftyp", b"isom\0\0\0\x01isomiso2");
    let mut mvhd = be32(&[0, 0, 0, 1000, 100, 0x0001_0000]);
    mvhd.extend_from_slice(&[0x01, 0x00]);
    mvhd.extend_from_slice(&[0; 10]);
    mvhd.extend(be32(&IDENTITY));
    mvhd.extend_from_slice(&[0; 24]);
    mvhd.extend(be32(&[3]));
    let mut moov = make_box(b"mvhd", &mvhd);
    moov.extend(track(b"vide", 12_800));
    moov.extend(track(b"soun", 44_100));
    data.extend(make_box(b"moov", &moov));

    let file = parse_bytes(&data).unwrap();
    let moov = file.find(FourCC(*b"moov")).unwrap();
    assert_eq!(moov.child::<Mvhd>().unwrap().timescale, 1000);

    let traks: Vec<_> = moov
        .boxes()
        .iter()
        .filter(|b| b.box_type() == FourCC(*b"trak"))
        .collect();
    assert_eq!(traks.len(), 2);

    let mdia = traks[1].find(FourCC(*b"mdia")).unwrap();
    assert_eq!(mdia.child::<Mdhd>().unwrap().timescale, 44_100);
    assert_eq!(mdia.child::<Mdhd>().unwrap().language(), "und");
    assert_eq!(mdia.child::<Hdlr>().unwrap().handler_type, FourCC(*b"soun"));

    let tkhd = traks[0].child::<Tkhd>().unwrap();
    assert_eq!((tkhd.width, tkhd.height), (320.0, 240.0));

    let stts = traks[0]
        .find(FourCC(*b"mdia"))
        .and_then(|b| b.find(FourCC(*b"minf")))
        .and_then(|b| b.find(FourCC(*b"stbl")))
        .and_then(|b| b.child::<Stts>())
        .unwrap();
    assert_eq!(stts.sample_count(), 100);
}
