//! Frame orchestration: owns the cross-frame state (pixel buffers, cached
//! spectrum, basin solver) and turns (config, time, cell grid) into a
//! [`GlyphFrame`].

use crate::basin::{BasinKey, BasinState};
use crate::config::{WaveConfig, WaveModel};
use crate::glyph::{self, GlyphFrame, CELL_H, CELL_W};
use crate::raster::Rasterizer;
use crate::sampler::{SurfaceSampler, TrochoidalWave};
use crate::spectrum::{Spectrum, SpectrumKey};
use crate::tsunami::TsunamiField;

/// The renderer is the only long-lived object in the crate. The caller
/// holds one across frames and calls [`WaveRenderer::render`] with a
/// monotonically increasing time; everything else is frame-scoped.
#[derive(Default)]
pub struct WaveRenderer {
    raster: Rasterizer,
    spectrum: Option<Spectrum>,
    basin: Option<BasinState>,
}

impl WaveRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one frame into a `columns` × `rows` glyph grid.
    ///
    /// The config is sanitized here; callers may pass raw settings. The
    /// cached spectrum survives wind changes (re-aimed in place) and the
    /// basin survives any change that keeps its key, so interactive
    /// parameter tweaks stay cheap.
    pub fn render(&mut self, cfg: &WaveConfig, t: f32, columns: usize, rows: usize) -> GlyphFrame {
        let cfg = cfg.sanitized();
        let columns = columns.max(1);
        let rows = rows.max(1);
        let pw = columns * CELL_W;
        let ph = rows * CELL_H;

        let Self { raster, spectrum, basin } = self;

        let mut tsunami = None;
        let sampler = match cfg.model {
            WaveModel::Trochoidal => {
                SurfaceSampler::Trochoidal(TrochoidalWave::from_config(&cfg))
            }
            WaveModel::Spectrum => {
                let spec = match spectrum {
                    Some(s) if *s.key() == SpectrumKey::from_config(&cfg) => s,
                    slot => slot.insert(Spectrum::build(&cfg)),
                };
                spec.orient(cfg.wind_dir);
                SurfaceSampler::Spectrum {
                    components: &spec.components,
                    amp: cfg.amplitude,
                    steepness: cfg.steepness,
                    speed: cfg.speed,
                }
            }
            WaveModel::Basin => {
                let key = BasinKey::from_config(&cfg);
                let state = match basin {
                    Some(b) if *b.key() == key => b,
                    slot => slot.insert(BasinState::new(key)),
                };
                state.advance(cfg.speed, cfg.basin_modes);
                SurfaceSampler::Basin { state, amp: cfg.amplitude }
            }
            WaveModel::Tsunami => {
                let field = tsunami.insert(TsunamiField::new(&cfg, t));
                SurfaceSampler::Tsunami(field)
            }
        };

        raster.render_surface(&sampler, t, pw, ph);
        if let Some(field) = &tsunami {
            raster.render_spray(field, t);
        }

        glyph::encode(&raster.buffers, columns, rows, &cfg, t)
    }
}
