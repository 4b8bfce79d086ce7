//! Grid sampling and glyph mapping.
//!
//! The buffer is walked row-major on a fixed step. Each visited cell reads
//! the single pixel at its top-left corner, turns it into a value in
//! [0, 255] and either drops the cell or emits one glyph centered on it.

use crate::decode::PixelBuffer;
use crate::settings::{Settings, ValueStrategy};
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Glyphs smaller than this are not drawn in variable-size mode.
pub const MIN_FONT_SIZE: f32 = 0.5;

/// BT.709 luma weights, scaled by `LUMA_SCALE` so gray levels stay exact.
const LUMA_WEIGHTS: [u32; 3] = [2126, 7152, 722];
const LUMA_SCALE: f32 = 10_000.0;

/// One positioned character, ready for serialization.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph<'a> {
    pub x: u32,
    pub y: u32,
    pub font_size: f32,
    pub ch: char,
    pub color: &'a str,
}

/// Chooses the character drawn for each emitted glyph.
pub trait GlyphPicker {
    /// `palette` is never empty.
    fn pick(&mut self, palette: &[char]) -> char;
}

/// Uniform random choice over the palette.
pub struct RandomPicker<R = ThreadRng> {
    rng: R,
}

impl RandomPicker<ThreadRng> {
    pub fn new() -> Self {
        Self { rng: rand::thread_rng() }
    }
}

impl Default for RandomPicker<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPicker<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl<R: Rng> GlyphPicker for RandomPicker<R> {
    fn pick(&mut self, palette: &[char]) -> char {
        palette[self.rng.gen_range(0..palette.len())]
    }
}

pub struct GridSampler<'a> {
    settings: &'a Settings,
}

impl<'a> GridSampler<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Scalar value of one RGBA pixel after inversion.
    pub fn value(&self, [r, g, b, a]: [u8; 4]) -> f32 {
        let value = match self.settings.value_strategy {
            ValueStrategy::Opacity => a as f32,
            ValueStrategy::Luminance if a == 0 => 0.0,
            ValueStrategy::Luminance => {
                let weighted = LUMA_WEIGHTS[0] * r as u32
                    + LUMA_WEIGHTS[1] * g as u32
                    + LUMA_WEIGHTS[2] * b as u32;
                weighted as f32 / LUMA_SCALE
            }
        };
        if self.settings.invert {
            255.0 - value
        } else {
            value
        }
    }

    /// Font size for a value, or `None` when the sample is dropped.
    pub fn font_size(&self, value: f32) -> Option<f32> {
        if value < self.settings.threshold as f32 {
            return None;
        }
        if !self.settings.variable_size {
            return Some(self.settings.base_font_size);
        }
        let size = self.settings.base_font_size * (value / 255.0);
        (size >= MIN_FONT_SIZE).then_some(size)
    }

    /// Every emitted glyph, in row-major order.
    pub fn glyphs(&self, buffer: &PixelBuffer, picker: &mut impl GlyphPicker) -> Vec<Glyph<'a>> {
        let step = self.settings.step() as usize;
        let palette = &self.settings.character_palette;
        let mut glyphs = Vec::new();
        let mut visited = 0usize;

        for y in (0..buffer.height()).step_by(step) {
            for x in (0..buffer.width()).step_by(step) {
                visited += 1;
                let Some(pixel) = buffer.pixel(x, y) else {
                    continue;
                };
                let value = self.value(pixel);
                let Some(font_size) = self.font_size(value) else {
                    continue;
                };
                glyphs.push(Glyph {
                    x,
                    y,
                    font_size,
                    ch: picker.pick(palette),
                    color: &self.settings.glyph_color,
                });
            }
        }

        log::debug!(
            "sampled {visited} cells at step {step}, emitted {} glyphs",
            glyphs.len()
        );
        glyphs
    }
}
