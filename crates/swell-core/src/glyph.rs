//! Glyph encoding: collapse the pixel buffers into character cells of
//! 2×4 pixels, pick a density glyph per cell, quantize color, and merge
//! same-colored neighbors into per-row runs.

use crate::config::{ColorMode, WaveConfig};
use crate::math::wrap;
use crate::raster::PixelBuffers;
use serde::Serialize;

/// Density ramp over the 8-dot braille block, from empty to full. Index
/// with a level in 0..=8.
pub const DENSITY_GLYPHS: [char; 9] = [
    '\u{2800}', '\u{2801}', '\u{2821}', '\u{2825}', '\u{282d}', '\u{282f}', '\u{286f}',
    '\u{28ef}', '\u{28ff}',
];

/// Pixels per cell, horizontally and vertically.
pub const CELL_W: usize = 2;
pub const CELL_H: usize = 4;

const HUE_STEP: f32 = 12.0;
const LIGHT_STEP: f32 = 6.0;
/// Hue drift rate in phase color mode, degrees per second.
const PHASE_DRIFT: f32 = 25.0;

/// A quantized output color. Quantization bounds the palette so adjacent
/// cells often share a color and merge into one span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellColor {
    /// Quantized hue in degrees, [0, 360).
    pub hue: u16,
    /// Saturation percentage, 0 to 100.
    pub saturation: u8,
    /// Quantized lightness percentage, 0 to 100.
    pub lightness: u8,
}

/// A horizontal run of glyphs sharing one color. Blank cells carry no
/// color, so in mono mode each row is a single uncolored span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphSpan {
    pub text: String,
    pub color: Option<CellColor>,
}

/// One encoded frame: `rows.len()` rows of spans, each row covering
/// `columns` cells in total.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GlyphFrame {
    pub columns: usize,
    pub rows: Vec<Vec<GlyphSpan>>,
}

impl GlyphFrame {
    /// Plain-text rendition, one line per row, colors dropped.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.rows.len() * (self.columns + 1) * 3);
        for row in &self.rows {
            for span in row {
                out.push_str(&span.text);
            }
            out.push('\n');
        }
        out
    }
}

/// Encode the pixel buffers into a `columns` × `rows` glyph grid.
///
/// Per cell, only pixels the rasterizer actually hit contribute to the
/// averages; a cell with no hits is blank and colorless. Average luminance
/// picks one of 9 density levels; average height maps into a hue offset
/// across the configured range.
pub fn encode(
    buffers: &PixelBuffers,
    columns: usize,
    rows: usize,
    cfg: &WaveConfig,
    t: f32,
) -> GlyphFrame {
    let use_color = cfg.color_mode != ColorMode::Mono;
    let saturation = cfg.saturation.round().clamp(0.0, 100.0) as u8;
    let hue_shift = if cfg.color_mode == ColorMode::Phase { t * PHASE_DRIFT } else { 0.0 };
    let amp = cfg.amplitude;

    let mut frame = GlyphFrame { columns, rows: Vec::with_capacity(rows) };

    for cy in 0..rows {
        let mut row: Vec<GlyphSpan> = Vec::new();

        for cx in 0..columns {
            let mut lum_total = 0.0f32;
            let mut height_total = 0.0f32;
            let mut count = 0u32;

            for dy in 0..CELL_H {
                for dx in 0..CELL_W {
                    let idx = buffers.idx(cx * CELL_W + dx, cy * CELL_H + dy);
                    if buffers.inv_depth[idx] > 0.0 {
                        lum_total += buffers.luminance[idx];
                        height_total += buffers.surface_height[idx];
                        count += 1;
                    }
                }
            }

            let (glyph, color) = if count > 0 {
                let avg_lum = lum_total / count as f32;
                let level = ((avg_lum * 9.0).floor() as usize).min(8);
                let color = if use_color {
                    let avg_height = height_total / count as f32;
                    let height_norm = ((avg_height + amp) / (2.0 * amp)).clamp(0.0, 1.0);
                    let hue = wrap(cfg.hue + height_norm * cfg.hue_range + hue_shift, 360.0);
                    let lightness = (15.0 + avg_lum * 70.0).clamp(8.0, 90.0);
                    Some(quantize(hue, lightness, saturation))
                } else {
                    None
                };
                (DENSITY_GLYPHS[level], color)
            } else {
                (DENSITY_GLYPHS[0], None)
            };

            match row.last_mut() {
                Some(span) if span.color == color => span.text.push(glyph),
                _ => row.push(GlyphSpan { text: glyph.to_string(), color }),
            }
        }

        frame.rows.push(row);
    }

    frame
}

/// Snap hue to a 12° grid and lightness to a 6% grid.
fn quantize(hue: f32, lightness: f32, saturation: u8) -> CellColor {
    let hue_q = wrap((hue / HUE_STEP).round() * HUE_STEP, 360.0);
    let light_q = ((lightness / LIGHT_STEP).round() * LIGHT_STEP).clamp(0.0, 100.0);
    CellColor {
        hue: hue_q as u16,
        saturation,
        lightness: light_q as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorMode, WaveConfig};
    use crate::raster::PixelBuffers;

    fn lit_buffers(columns: usize, rows: usize) -> PixelBuffers {
        let mut b = PixelBuffers::new();
        b.prepare(columns * CELL_W, rows * CELL_H);
        b
    }

    fn light_cell(b: &mut PixelBuffers, cx: usize, cy: usize, lum: f32, height: f32) {
        for dy in 0..CELL_H {
            for dx in 0..CELL_W {
                let idx = b.idx(cx * CELL_W + dx, cy * CELL_H + dy);
                b.inv_depth[idx] = 0.5;
                b.luminance[idx] = lum;
                b.surface_height[idx] = height;
            }
        }
    }

    #[test]
    fn empty_buffers_encode_to_an_all_blank_grid() {
        let b = lit_buffers(10, 10);
        let frame = encode(&b, 10, 10, &WaveConfig::default().sanitized(), 0.0);
        assert_eq!(frame.rows.len(), 10);
        for row in &frame.rows {
            assert_eq!(row.len(), 1, "blank row merges into one span");
            assert_eq!(row[0].text, DENSITY_GLYPHS[0].to_string().repeat(10));
            assert_eq!(row[0].color, None);
        }
    }

    #[test]
    fn unhit_pixels_do_not_dilute_the_cell_average() {
        let mut b = lit_buffers(2, 1);
        // One bright pixel in an otherwise unhit cell.
        let idx = b.idx(0, 0);
        b.inv_depth[idx] = 1.0;
        b.luminance[idx] = 0.95;
        let frame = encode(&b, 2, 1, &WaveConfig::default().sanitized(), 0.0);
        let text: String = frame.rows[0].iter().map(|s| s.text.as_str()).collect();
        let first = text.chars().next().unwrap();
        // Average over hit pixels only: 0.95 maps to the top level.
        assert_eq!(first, DENSITY_GLYPHS[8]);
    }

    #[test]
    fn luminance_maps_onto_the_nine_level_ramp() {
        let cfg = WaveConfig::default().sanitized();
        for (lum, expect) in [(0.0, 0), (0.11, 0), (0.12, 1), (0.5, 4), (0.99, 8), (1.0, 8)] {
            let mut b = lit_buffers(1, 1);
            light_cell(&mut b, 0, 0, lum, 0.0);
            let frame = encode(&b, 1, 1, &cfg, 0.0);
            let ch = frame.rows[0][0].text.chars().next().unwrap();
            assert_eq!(ch, DENSITY_GLYPHS[expect], "lum {lum}");
        }
    }

    #[test]
    fn mono_mode_yields_one_uncolored_span_per_row() {
        let mut b = lit_buffers(6, 2);
        for cx in 0..6 {
            light_cell(&mut b, cx, 0, (cx as f32) / 6.0, 0.0);
        }
        let cfg = WaveConfig { color_mode: ColorMode::Mono, ..WaveConfig::default() }.sanitized();
        let frame = encode(&b, 6, 2, &cfg, 0.0);
        for row in &frame.rows {
            assert_eq!(row.len(), 1);
            assert_eq!(row[0].color, None);
            assert_eq!(row[0].text.chars().count(), 6);
        }
    }

    #[test]
    fn same_quantized_color_merges_into_one_run() {
        let mut b = lit_buffers(4, 1);
        for cx in 0..4 {
            light_cell(&mut b, cx, 0, 0.5, 0.3);
        }
        let cfg = WaveConfig { color_mode: ColorMode::Depth, ..WaveConfig::default() }.sanitized();
        let frame = encode(&b, 4, 1, &cfg, 0.0);
        assert_eq!(frame.rows[0].len(), 1);
        assert!(frame.rows[0][0].color.is_some());
        assert_eq!(frame.rows[0][0].text.chars().count(), 4);
    }

    #[test]
    fn height_contrast_splits_colored_runs() {
        let mut b = lit_buffers(4, 1);
        light_cell(&mut b, 0, 0, 0.5, -2.0);
        light_cell(&mut b, 1, 0, 0.5, -2.0);
        light_cell(&mut b, 2, 0, 0.5, 2.0);
        light_cell(&mut b, 3, 0, 0.5, 2.0);
        let cfg = WaveConfig { color_mode: ColorMode::Depth, ..WaveConfig::default() }.sanitized();
        let frame = encode(&b, 4, 1, &cfg, 0.0);
        assert_eq!(frame.rows[0].len(), 2);
        assert_ne!(frame.rows[0][0].color, frame.rows[0][1].color);
        // Trough maps to the base hue, crest to base + range, both on the
        // 12 degree grid.
        let lo = frame.rows[0][0].color.unwrap();
        let hi = frame.rows[0][1].color.unwrap();
        assert_eq!(lo.hue % 12, 0);
        assert_eq!(hi.hue % 12, 0);
        assert_eq!(lo.hue, 204);
        assert_eq!(hi.hue, 312);
    }

    #[test]
    fn phase_mode_drifts_hue_over_time() {
        let mut b = lit_buffers(1, 1);
        light_cell(&mut b, 0, 0, 0.5, 0.0);
        let cfg = WaveConfig { color_mode: ColorMode::Phase, ..WaveConfig::default() }.sanitized();
        let early = encode(&b, 1, 1, &cfg, 0.0);
        let late = encode(&b, 1, 1, &cfg, 1.0);
        let c0 = early.rows[0][0].color.unwrap();
        let c1 = late.rows[0][0].color.unwrap();
        assert_ne!(c0.hue, c1.hue);
        // 25 degrees of drift lands two 12 degree steps away.
        assert_eq!((c1.hue + 360 - c0.hue) % 360, 24);
    }

    #[test]
    fn quantized_colors_stay_in_range() {
        for hue in [-700.0, -1.0, 0.0, 359.9, 5000.0] {
            for light in [-10.0f32, 8.0, 55.5, 200.0] {
                let c = quantize(wrap(hue, 360.0), light.clamp(8.0, 90.0), 70);
                assert!(c.hue < 360);
                assert!(c.lightness <= 100);
            }
        }
    }

    #[test]
    fn to_text_renders_one_line_per_row() {
        let b = lit_buffers(3, 2);
        let frame = encode(&b, 3, 2, &WaveConfig::default().sanitized(), 0.0);
        let text = frame.to_text();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|l| l.chars().count() == 3));
    }
}
