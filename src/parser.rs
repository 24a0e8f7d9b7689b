use crate::boxes::{FourCC, IsoBox, RawBox};
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::file::File;
use crate::registry::{BoxConstructor, Registry, default_registry};
use log::debug;
use std::path::Path;

/// Type codes accepted as the first box of a file.
const SIGNATURES: [&[u8; 4]; 8] = [
    b"ftyp", b"sinf", b"wide", b"free", b"skip", b"mdat", b"moov", b"pnot",
];

/// How variable-length strings are stored in the file being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringType {
    #[default]
    NulTerminated,
    /// One length byte then the text; written by QuickTime-era muxers.
    Pascal,
}

#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Advance past `mdat` payloads instead of buffering them.
    pub skip_mdat_data: bool,
    /// Maximum nesting of box lists before the file is rejected.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            skip_mdat_data: false,
            max_depth: 64,
        }
    }
}

impl ParseOptions {
    pub fn skip_mdat_data(mut self, skip: bool) -> Self {
        self.skip_mdat_data = skip;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// State published by an `iref` box while its reference children are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrefContext {
    pub version: u8,
}

/// Owns the registry and the per-parse state threaded through every decoder.
#[derive(Debug)]
pub struct Parser {
    registry: Registry,
    options: ParseOptions,
    string_type: StringType,
    iref: Option<IrefContext>,
    depth: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::with_registry(default_registry())
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            options: ParseOptions::default(),
            string_type: StringType::default(),
            iref: None,
            depth: 0,
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ParseOptions) {
        self.options = options;
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn register_box(&mut self, name: &str, ctor: BoxConstructor) -> Result<()> {
        self.registry.register_box(name, ctor)
    }

    pub fn register_container_box(&mut self, name: &str) -> Result<()> {
        self.registry.register_container_box(name)
    }

    /// Instantiate the box registered for `typ`, or a [`RawBox`] for unknown codes.
    pub fn create_box(&self, typ: FourCC) -> Box<dyn IsoBox> {
        self.registry.create(typ).unwrap_or_else(|| {
            debug!("no decoder for '{}', keeping raw payload", typ);
            Box::new(RawBox::new(typ))
        })
    }

    pub fn string_type(&self) -> StringType {
        self.string_type
    }

    pub fn set_string_type(&mut self, t: StringType) {
        self.string_type = t;
    }

    /// Read a variable-length string in the current file's string encoding.
    pub fn read_string(&self, cur: &mut ByteCursor<'_>) -> Result<String> {
        match self.string_type {
            StringType::NulTerminated => cur.read_null_terminated_string(),
            StringType::Pascal => cur.read_pascal_string(),
        }
    }

    /// The enclosing `iref` box, while its children are being decoded.
    pub fn iref_context(&self) -> Option<IrefContext> {
        self.iref
    }

    /// Run `f` with `ctx` installed; the previous context comes back afterwards
    /// whether `f` succeeds or not.
    pub fn with_iref_context<T>(
        &mut self,
        ctx: IrefContext,
        f: impl FnOnce(&mut Parser) -> Result<T>,
    ) -> Result<T> {
        let saved = self.iref.replace(ctx);
        let res = f(self);
        self.iref = saved;
        res
    }

    pub(crate) fn enter_box_list(&mut self) -> Result<()> {
        if self.depth >= self.options.max_depth {
            return Err(Error::malformed(
                FourCC::default(),
                format!("boxes nested deeper than {} levels", self.options.max_depth),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave_box_list(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn parse_path(&mut self, path: impl AsRef<Path>) -> Result<File> {
        let f = std::fs::File::open(path)?;
        let mut cur = ByteCursor::from_file(&f)?;
        self.parse_cursor(&mut cur)
    }

    pub fn parse_bytes(&mut self, data: &[u8]) -> Result<File> {
        let mut cur = ByteCursor::new(data);
        self.parse_cursor(&mut cur)
    }

    /// Parse every top-level box left in `cur`.
    pub fn parse_cursor(&mut self, cur: &mut ByteCursor<'_>) -> Result<File> {
        let sig = cur.peek(4, 4).map_err(|_| Error::NotIsoMedia)?;
        if !SIGNATURES.iter().any(|s| sig.as_slice() == &s[..]) {
            return Err(Error::NotIsoMedia);
        }

        self.string_type = StringType::default();
        self.iref = None;
        self.depth = 0;

        let mut file = File::new();
        file.read(self, cur)?;
        Ok(file)
    }
}

/// Parse a file with a default parser.
pub fn parse_path(path: impl AsRef<Path>) -> Result<File> {
    Parser::new().parse_path(path)
}

/// Parse an in-memory buffer with a default parser.
pub fn parse_bytes(data: &[u8]) -> Result<File> {
    Parser::new().parse_bytes(data)
}
