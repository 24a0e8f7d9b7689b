use clap::{ArgAction, Parser as ClapParser};
use isobmff::{
    FourCC, IsoBox, ParseOptions, Parser,
    boxes::BoxFields,
    json_api::{JsonBox, to_json_tree},
    known_boxes::KnownBox,
    util::hex_dump,
};
use log::info;
use std::path::PathBuf;

#[derive(ClapParser, Debug)]
#[command(version, about = "ISOBMFF (MP4 / HEIF / HEIC) box tree dumper")]
struct Args {
    /// Files to dump
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Emit JSON instead of a human-readable tree
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Buffer mdat payloads instead of skipping them
    #[arg(long, action = ArgAction::SetTrue)]
    keep_mdat: bool,

    /// Reject files whose boxes nest deeper than this
    #[arg(long, default_value_t = 64)]
    max_depth: usize,

    /// Hex-dump the raw payload of every undecoded box of this type (e.g. --raw uuid)
    #[arg(long = "raw")]
    raw: Option<String>,

    /// Bytes to show per raw dump (0 means the entire payload)
    #[arg(long, default_value_t = 0)]
    bytes: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let raw_type: Option<FourCC> = args.raw.as_deref().map(str::parse::<FourCC>).transpose()?;
    let options = ParseOptions::default()
        .skip_mdat_data(!args.keep_mdat)
        .max_depth(args.max_depth);

    let mut json_files = Vec::new();
    for path in &args.paths {
        info!("parsing {}", path.display());
        let mut parser = Parser::new().with_options(options.clone());
        let file = parser.parse_path(path)?;

        if args.json {
            json_files.push(to_json_tree(&file));
            continue;
        }

        if args.paths.len() > 1 {
            println!("{}:", path.display());
        }
        for b in file.boxes() {
            print_box(&**b, 0);
        }
        if let Some(typ) = raw_type {
            for b in file.boxes() {
                dump_raw(&**b, typ, args.bytes);
            }
        }
    }

    if args.json {
        // one file prints a bare tree, several print one tree per file
        if json_files.len() == 1 {
            let tree: Vec<JsonBox> = json_files.remove(0);
            println!("{}", serde_json::to_string_pretty(&tree)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&json_files)?);
        }
    }
    Ok(())
}

// ---------- Human-readable tree ----------

fn print_box(b: &dyn IsoBox, depth: usize) {
    let indent = "  ".repeat(depth);
    let kb = KnownBox::from(b.box_type());

    let mut line = format!("{indent}{}  {}", b.box_type(), kb.full_name());
    if let Some(h) = b.full_header() {
        line.push_str(&format!(" (ver={}, flags=0x{:06x})", h.version, h.flags));
    }
    if let Some(data) = b.raw_data() {
        line.push_str(&format!("  [{} bytes]", data.len()));
    } else {
        let fields = b.fields();
        if fields.as_object().is_some_and(|m| !m.is_empty()) {
            line.push_str(&format!("  {fields}"));
        }
    }
    println!("{line}");

    for c in b.boxes() {
        print_box(&**c, depth + 1);
    }
}

// ---------- Raw dump ----------

fn dump_raw(b: &dyn IsoBox, typ: FourCC, max_bytes: usize) {
    if b.box_type() == typ {
        if let Some(data) = b.raw_data() {
            let n = if max_bytes == 0 {
                data.len()
            } else {
                max_bytes.min(data.len())
            };
            println!("\n== {} payload ({} of {} bytes) ==", typ, n, data.len());
            print!("{}", hex_dump(&data[..n], 0));
        }
    }
    for c in b.boxes() {
        dump_raw(&**c, typ, max_bytes);
    }
}
