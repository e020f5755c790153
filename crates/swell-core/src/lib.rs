//! Procedural animated ocean surface rendered into a coarse glyph grid.
//!
//! The crate is a pure computational core: it receives a configuration
//! record, a simulation time, and an output cell count, and returns a grid
//! of density glyphs with optional quantized color. Everything around it
//! (the settings UI, the timer that advances time, the layout that picks
//! the cell count, the code that turns glyph runs into text) lives in
//! boundary crates.
//!
//! Per-frame data flow:
//!   configuration + time
//!     → surface sampler (trochoidal / spectrum / basin / tsunami)
//!     → dense pixel buffers (inverse depth, luminance, height)
//!     → glyph encoder (2×4 cells, 9 density levels, run-merged color)
//!     → [`glyph::GlyphFrame`]

pub mod basin;
pub mod config;
pub mod glyph;
pub mod grid;
pub mod math;
pub mod raster;
pub mod renderer;
pub mod rng;
pub mod sampler;
pub mod spectrum;
pub mod tsunami;

pub use config::{ColorMode, EdgeMode, WaveConfig, WaveModel};
pub use glyph::{CellColor, GlyphFrame, GlyphSpan, DENSITY_GLYPHS};
pub use renderer::WaveRenderer;

/// Half-extent of the simulated patch of sea in plan-view units. The
/// surface is sampled over `[-EXTENT_HALF, EXTENT_HALF]²`.
pub const EXTENT_HALF: f32 = 3.5;
