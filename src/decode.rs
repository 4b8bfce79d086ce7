//! Source decoding into straight-alpha RGBA pixel buffers.
//!
//! Encoded raster bytes go through `image` (format sniffed from content);
//! SVG markup is parsed with `usvg` and rasterized by `resvg` at its
//! intrinsic size, then un-premultiplied so it reads back the same way a
//! browser canvas would.

use once_cell::sync::Lazy;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use std::sync::Arc;
use thiserror::Error;

/// Fonts for `<text>` in markup sources, loaded on first use.
static SYSTEM_FONTS: Lazy<Arc<fontdb::Database>> = Lazy::new(|| Arc::new(system_fonts()));

fn system_fonts() -> fontdb::Database {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    log::debug!("loaded {} font faces", db.len());

    // Generic families default to Times New Roman/Arial/Courier New, which
    // many hosts lack; point the missing ones at any installed family.
    let fallback = db
        .faces()
        .find_map(|face| face.families.first())
        .map(|(name, _)| name.clone());
    let Some(fallback) = fallback else {
        log::warn!("no system fonts found, text in markup will not render");
        return db;
    };
    let missing = |db: &fontdb::Database, family: fontdb::Family<'_>| {
        let query = fontdb::Query { families: &[family], ..fontdb::Query::default() };
        db.query(&query).is_none()
    };
    if missing(&db, fontdb::Family::Serif) {
        db.set_serif_family(fallback.clone());
    }
    if missing(&db, fontdb::Family::SansSerif) {
        db.set_sans_serif_family(fallback.clone());
    }
    if missing(&db, fontdb::Family::Monospace) {
        db.set_monospace_family(fallback);
    }
    db
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("source is empty")]
    Empty,
    #[error("markup is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("markup error: {0}")]
    Markup(#[from] usvg::Error),
    #[error("image has no pixels ({0}x{1})")]
    ZeroSize(u32, u32),
    #[error("could not allocate a {0}x{1} pixel surface")]
    Surface(u32, u32),
    #[error("expected {expected} RGBA bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

/// Decoded image at its natural size, row-major RGBA from the top-left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::ZeroSize(width, height));
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(DecodeError::Length { expected, actual: data.len() });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGBA at (x, y), or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// An image to decode: SVG markup text or encoded raster bytes.
#[derive(Clone, Copy, Debug)]
pub enum Source<'a> {
    Markup(&'a str),
    Encoded(&'a [u8]),
}

impl<'a> Source<'a> {
    /// Build a source from raw bytes plus the markup flag settings UIs carry.
    pub fn new(bytes: &'a [u8], is_markup: bool) -> Result<Self, DecodeError> {
        if is_markup {
            Ok(Source::Markup(std::str::from_utf8(bytes)?))
        } else {
            Ok(Source::Encoded(bytes))
        }
    }

    pub fn is_markup(&self) -> bool {
        matches!(self, Source::Markup(_))
    }
}

/// Host capability turning a source into pixels.
pub trait ImageDecoder {
    fn decode(&self, source: &Source<'_>) -> Result<PixelBuffer, DecodeError>;
}

/// Decoder backed by `image` and `resvg`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeDecoder;

impl ImageDecoder for NativeDecoder {
    fn decode(&self, source: &Source<'_>) -> Result<PixelBuffer, DecodeError> {
        let buffer = match *source {
            Source::Markup(text) => decode_markup(text)?,
            Source::Encoded(bytes) => decode_encoded(bytes)?,
        };
        log::debug!("decoded {}x{} source", buffer.width, buffer.height);
        Ok(buffer)
    }
}

fn decode_encoded(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_rgba(width, height, rgba.into_raw())
}

fn decode_markup(text: &str) -> Result<PixelBuffer, DecodeError> {
    if text.trim().is_empty() {
        return Err(DecodeError::Empty);
    }
    let mut options = usvg::Options::default();
    options.fontdb = Arc::clone(&SYSTEM_FONTS);
    let tree = usvg::Tree::from_str(text, &options)?;
    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    let mut pixmap = Pixmap::new(width, height).ok_or(DecodeError::Surface(width, height))?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    let mut data = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    PixelBuffer::from_rgba(width, height, data)
}
