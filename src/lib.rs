//! Image to text-glyph SVG converter.
//!
//! A source image is decoded at its natural size, sampled on a square grid
//! and every surviving sample becomes one `<text>` element in an SVG
//! document of the same dimensions.

pub mod decode;
pub mod sample;
pub mod session;
pub mod settings;
pub mod svg;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use decode::{DecodeError, ImageDecoder, NativeDecoder, PixelBuffer, Source};
pub use sample::{Glyph, GlyphPicker, GridSampler, RandomPicker};
pub use session::{Outcome, Session, Ticket};
pub use settings::{Settings, ValueStrategy};

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlyphtypeError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GlyphtypeError>;

/// Finished document plus the source's natural dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub svg_content: String,
    pub width: u32,
    pub height: u32,
}

/// Decode `source`, sample it and serialize the glyphs.
pub fn generate(
    source: &Source<'_>,
    settings: &Settings,
    decoder: &impl ImageDecoder,
    picker: &mut impl GlyphPicker,
) -> Result<GenerationResult> {
    settings.validate()?;
    let buffer = decoder.decode(source)?;
    Ok(render(&buffer, settings, picker))
}

fn render(
    buffer: &PixelBuffer,
    settings: &Settings,
    picker: &mut impl GlyphPicker,
) -> GenerationResult {
    let glyphs = GridSampler::new(settings).glyphs(buffer, picker);

    let mut body = String::with_capacity(glyphs.len() * 128);
    for glyph in &glyphs {
        svg::write_glyph(&mut body, glyph);
    }

    let (width, height) = (buffer.width(), buffer.height());
    GenerationResult {
        svg_content: svg::document(width, height, &settings.background_color, &body),
        width,
        height,
    }
}

/// Main converter holding validated settings
pub struct Converter {
    settings: Settings,
    seed: Option<u64>,
}

impl Converter {
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings, seed: None })
    }

    /// Make glyph choice reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn convert(&self, buffer: &PixelBuffer) -> GenerationResult {
        match self.seed {
            Some(seed) => render(buffer, &self.settings, &mut RandomPicker::seeded(seed)),
            None => render(buffer, &self.settings, &mut RandomPicker::new()),
        }
    }

    pub fn convert_source(
        &self,
        source: &Source<'_>,
        decoder: &impl ImageDecoder,
    ) -> Result<GenerationResult> {
        let buffer = decoder.decode(source)?;
        Ok(self.convert(&buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Cycle(usize);

    impl GlyphPicker for Cycle {
        fn pick(&mut self, palette: &[char]) -> char {
            let ch = palette[self.0 % palette.len()];
            self.0 += 1;
            ch
        }
    }

    struct Failing;

    impl ImageDecoder for Failing {
        fn decode(&self, _: &Source<'_>) -> std::result::Result<PixelBuffer, DecodeError> {
            Err(DecodeError::Empty)
        }
    }

    struct Fixed(PixelBuffer);

    impl ImageDecoder for Fixed {
        fn decode(&self, _: &Source<'_>) -> std::result::Result<PixelBuffer, DecodeError> {
            Ok(self.0.clone())
        }
    }

    fn gray(width: u32, height: u32, v: u8) -> PixelBuffer {
        let data = [v, v, v, 255].repeat(width as usize * height as usize);
        PixelBuffer::from_rgba(width, height, data).unwrap()
    }

    #[test]
    fn renders_exact_document() {
        let settings = Settings {
            glyph_color: "#fff".to_string(),
            background_color: "#000".to_string(),
            base_font_size: 10.0,
            grid_spacing: 2,
            character_palette: vec!['&', 'a'],
            invert: false,
            threshold: 0,
            value_strategy: ValueStrategy::Luminance,
            variable_size: false,
        };
        let result = render(&gray(3, 2, 255), &settings, &mut Cycle(0));
        assert_eq!((result.width, result.height), (3, 2));
        assert_eq!(
            result.svg_content,
            concat!(
                r##"<svg width="3" height="2" viewBox="0 0 3 2" xmlns="http://www.w3.org/2000/svg" style="background-color: #000">"##,
                r##"<text x="0" y="0" font-size="10.00" fill="#fff" text-anchor="middle" dominant-baseline="middle">&amp;</text>"##,
                r##"<text x="2" y="0" font-size="10.00" fill="#fff" text-anchor="middle" dominant-baseline="middle">a</text>"##,
                "</svg>\n"
            )
        );
    }

    #[test]
    fn empty_palette_fails_before_decoding() {
        let settings = Settings { character_palette: Vec::new(), ..Settings::default() };
        let err = generate(&Source::Encoded(&[1]), &settings, &Failing, &mut Cycle(0)).unwrap_err();
        assert!(matches!(err, GlyphtypeError::InvalidSettings(_)));
        assert!(Converter::new(settings).is_err());
    }

    #[test]
    fn decode_errors_propagate() {
        let settings = Settings::default();
        let err = generate(&Source::Markup("x"), &settings, &Failing, &mut Cycle(0)).unwrap_err();
        assert!(matches!(err, GlyphtypeError::Decode(DecodeError::Empty)));
    }

    #[test]
    fn all_below_threshold_yields_bare_document() {
        let settings = Settings { threshold: 200, ..Settings::default() };
        let decoder = Fixed(gray(16, 16, 40));
        let result = generate(&Source::Encoded(&[0]), &settings, &decoder, &mut Cycle(0)).unwrap();
        assert!(!result.svg_content.contains("<text"));
        assert!(result.svg_content.contains("background-color: #000000"));
        assert_eq!((result.width, result.height), (16, 16));
    }

    #[test]
    fn only_characters_vary_between_runs() {
        let settings = Settings { grid_spacing: 3, ..Settings::default() };
        let converter = Converter::new(settings).unwrap();
        let buffer = gray(20, 11, 180);
        let strip = |svg: &str| -> Vec<String> {
            svg.split("<text")
                .skip(1)
                .map(|el| el.split('>').next().unwrap_or_default().to_string())
                .collect()
        };
        let a = converter.convert(&buffer);
        let b = converter.convert(&buffer);
        assert_eq!(strip(&a.svg_content), strip(&b.svg_content));
        assert_eq!(strip(&a.svg_content).len(), 7 * 4);
    }

    #[test]
    fn seeded_converter_is_deterministic() {
        let converter = Converter::new(Settings::default()).unwrap().with_seed(42);
        let buffer = gray(64, 64, 128);
        assert_eq!(converter.convert(&buffer), converter.convert(&buffer));
    }

    #[test]
    fn result_serializes_with_camel_case() {
        let result = GenerationResult { svg_content: "<svg/>".to_string(), width: 4, height: 5 };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["svgContent"], "<svg/>");
        assert_eq!(json["width"], 4);
    }
}
