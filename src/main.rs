//! glyphtype CLI - Convert images to SVG text-glyph art

use clap::{Parser, ValueEnum};
use glyphtype::settings::{FONT_SIZE_RANGE, GRID_SPACING_RANGE};
use glyphtype::svg::DOWNLOAD_FILE_NAME;
use glyphtype::{Converter, GlyphtypeError, NativeDecoder, Settings, Source, ValueStrategy};
use std::io::Write;
use std::path::PathBuf;

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    Luminance,
    Opacity,
}

impl From<Strategy> for ValueStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Luminance => ValueStrategy::Luminance,
            Strategy::Opacity => ValueStrategy::Opacity,
        }
    }
}

#[derive(Parser)]
#[command(name = "glyphtype", about = "Convert images to SVG text-glyph art")]
struct Args {
    /// Input image file (raster or SVG)
    input: PathBuf,
    /// Output SVG file, `-` for stdout
    #[arg(short, long, default_value = DOWNLOAD_FILE_NAME)]
    output: PathBuf,
    /// Treat the input as SVG markup regardless of extension
    #[arg(long)]
    markup: bool,
    /// JSON settings file used as the base for the flags below
    #[arg(short, long)]
    settings: Option<PathBuf>,
    /// Glyph color
    #[arg(long)]
    color: Option<String>,
    /// Background color
    #[arg(long)]
    background: Option<String>,
    /// Base font size
    #[arg(short, long)]
    font_size: Option<f32>,
    /// Pixel distance between samples
    #[arg(long)]
    spacing: Option<u32>,
    /// Characters to pick from
    #[arg(short, long)]
    chars: Option<String>,
    /// Invert sample values
    #[arg(short, long, overrides_with = "no_invert")]
    invert: bool,
    /// Do not invert sample values
    #[arg(long, overrides_with = "invert")]
    no_invert: bool,
    /// Drop samples whose value is below this (0-255)
    #[arg(short, long)]
    threshold: Option<u8>,
    /// Channel combination producing sample values
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,
    /// Draw every glyph at the base font size
    #[arg(long, overrides_with = "variable_size")]
    fixed_size: bool,
    /// Scale glyphs with their sample value
    #[arg(long, overrides_with = "fixed_size")]
    variable_size: bool,
    /// Seed for reproducible glyph choice
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn settings(&self) -> Result<Settings, GlyphtypeError> {
        let mut settings = match &self.settings {
            Some(path) => Settings::from_json_file(path)?,
            None => Settings::default(),
        };
        if let Some(color) = &self.color {
            settings.glyph_color = color.clone();
        }
        if let Some(background) = &self.background {
            settings.background_color = background.clone();
        }
        if let Some(size) = self.font_size {
            settings.base_font_size = size;
        }
        if let Some(spacing) = self.spacing {
            settings.grid_spacing = spacing;
        }
        if let Some(chars) = &self.chars {
            settings.character_palette = chars.chars().collect();
        }
        if let Some(threshold) = self.threshold {
            settings.threshold = threshold;
        }
        if let Some(strategy) = self.strategy {
            settings.value_strategy = strategy.into();
        }
        if let Some(invert) = switch(self.invert, self.no_invert) {
            settings.invert = invert;
        }
        if let Some(variable) = switch(self.variable_size, self.fixed_size) {
            settings.variable_size = variable;
        }
        Ok(settings)
    }

    fn is_markup(&self) -> bool {
        self.markup
            || self
                .input
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
    }
}

/// Resolve an `--x`/`--no-x` pair; `None` keeps the base setting.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn main() -> Result<(), GlyphtypeError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings = args.settings()?;
    if !FONT_SIZE_RANGE.contains(&settings.base_font_size) {
        log::warn!(
            "font size {} is outside the usual {FONT_SIZE_RANGE:?}",
            settings.base_font_size
        );
    }
    if !GRID_SPACING_RANGE.contains(&settings.grid_spacing) {
        log::warn!(
            "grid spacing {} is outside the usual {GRID_SPACING_RANGE:?}",
            settings.grid_spacing
        );
    }

    let mut converter = Converter::new(settings)?;
    if let Some(seed) = args.seed {
        converter = converter.with_seed(seed);
    }

    let bytes = std::fs::read(&args.input)?;
    let source = Source::new(&bytes, args.is_markup())?;
    let result = converter.convert_source(&source, &NativeDecoder)?;

    if args.output.as_os_str() == "-" {
        std::io::stdout().write_all(result.svg_content.as_bytes())?;
    } else {
        std::fs::write(&args.output, &result.svg_content)?;
        log::info!(
            "wrote {}x{} document to {}",
            result.width,
            result.height,
            args.output.display()
        );
    }
    Ok(())
}
