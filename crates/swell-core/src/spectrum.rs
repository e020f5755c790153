//! Dispersive wave spectrum: a seeded set of weighted Gerstner components.
//!
//! The set is expensive to regenerate (it consumes the seeded stream) but
//! cheap to re-aim: wind changes only re-rotate the stored base directions,
//! so the renderer caches one `Spectrum` per [`SpectrumKey`] and calls
//! [`Spectrum::orient`] every frame.

use crate::config::WaveConfig;
use crate::math::wrap;
use crate::rng::Mulberry32;

/// Gravitational acceleration for the deep-water dispersion relation.
pub const GRAVITY: f32 = 9.81;

/// One wave train of the spectrum.
#[derive(Debug, Clone)]
pub struct SpectrumComponent {
    /// Unit direction before wind rotation.
    pub dir_x0: f32,
    pub dir_z0: f32,
    /// Unit direction after wind rotation (what evaluation uses).
    pub dir_x: f32,
    pub dir_z: f32,
    /// Wavenumber 2π/λ.
    pub k: f32,
    /// Angular frequency from ω = √(g·k).
    pub omega: f32,
    /// Normalized weight; weights across the set sum to 1.
    pub weight: f32,
    /// Phase offset in [0, 2π).
    pub phase: f32,
}

/// The inputs whose change forces a full spectrum rebuild. Wind direction
/// is deliberately absent.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumKey {
    pub seed: u32,
    pub components: u32,
    pub min_wavelength: f32,
    pub max_wavelength: f32,
    pub spread: f32,
}

impl SpectrumKey {
    /// Expects a sanitized config.
    pub fn from_config(cfg: &WaveConfig) -> Self {
        Self {
            seed: cfg.seed,
            components: cfg.components,
            min_wavelength: cfg.min_wavelength,
            max_wavelength: cfg.max_wavelength,
            spread: cfg.spread,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spectrum {
    key: SpectrumKey,
    pub components: Vec<SpectrumComponent>,
}

impl Spectrum {
    /// Generate the component set from a sanitized config and aim it at the
    /// config's wind direction.
    ///
    /// Per component, in stream order: wavelength log-uniform in
    /// [min λ, max λ), direction offset uniform in ±spread, raw weight
    /// (0.3 + 0.7·r)·(λ/λmax)^1.25 favoring long waves, phase uniform in
    /// [0, 2π). Weights are normalized afterwards.
    pub fn build(cfg: &WaveConfig) -> Self {
        let key = SpectrumKey::from_config(cfg);
        let mut rng = Mulberry32::new(cfg.seed);
        let min_wl = cfg.min_wavelength;
        let max_wl = cfg.max_wavelength;
        let spread = cfg.spread.to_radians();

        let mut components = Vec::with_capacity(cfg.components as usize);
        for _ in 0..cfg.components {
            let lambda = min_wl * (max_wl / min_wl).powf(rng.next_f32());
            let k = std::f32::consts::TAU / lambda;
            let omega = (GRAVITY * k).sqrt();
            let angle = (rng.next_f32() - 0.5) * spread * 2.0;
            let weight = (0.3 + 0.7 * rng.next_f32()) * (lambda / max_wl).powf(1.25);
            let phase = rng.next_f32() * std::f32::consts::TAU;
            components.push(SpectrumComponent {
                dir_x0: angle.cos(),
                dir_z0: angle.sin(),
                dir_x: angle.cos(),
                dir_z: angle.sin(),
                k,
                omega,
                weight,
                phase,
            });
        }

        let sum: f32 = components.iter().map(|c| c.weight).sum();
        let norm = if sum > 0.0 { sum } else { 1.0 };
        for c in &mut components {
            c.weight /= norm;
        }

        let mut spectrum = Self { key, components };
        spectrum.orient(cfg.wind_dir);
        spectrum
    }

    pub fn key(&self) -> &SpectrumKey {
        &self.key
    }

    /// Rotate every component's base direction by the wind angle without
    /// touching the generated shape.
    pub fn orient(&mut self, wind_deg: f32) {
        let wind = wrap(wind_deg, 360.0).to_radians();
        let (s, c) = wind.sin_cos();
        for comp in &mut self.components {
            comp.dir_x = comp.dir_x0 * c - comp.dir_z0 * s;
            comp.dir_z = comp.dir_x0 * s + comp.dir_z0 * c;
        }
    }
}
