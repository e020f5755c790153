//! Frame configuration: the immutable-per-frame settings record.
//!
//! All numeric fields are clamped into their documented ranges by
//! [`WaveConfig::sanitized`] before the core uses them; callers may pass
//! anything finite without producing non-finite output downstream.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which height-field generator drives the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveModel {
    /// Single-direction closed-form Gerstner wave.
    Trochoidal,
    /// Multi-component dispersive spectrum (Gerstner superposition).
    Spectrum,
    /// Finite-difference wave-equation basin, stateful across frames.
    Basin,
    /// Procedural traveling tsunami profile with a spray pass.
    Tsunami,
}

/// Boundary policy for the basin solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// Zero-slope edges: out-of-grid neighbors mirror the center value.
    Free,
    /// Zero-height edges: border cells are pinned to 0 every sub-step.
    Fixed,
}

/// Output color policy for the glyph encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// No color descriptors; glyph levels only.
    Mono,
    /// Cell height mapped into a hue offset.
    Depth,
    /// As `Depth`, plus a 25°/s time-driven hue drift.
    Phase,
}

/// Failure to parse one of the settings enums from its external string form.
#[derive(Debug, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseVariantError {
    kind: &'static str,
    value: String,
}

macro_rules! impl_variant_strings {
    ($ty:ident, $kind:literal, { $($name:literal => $variant:ident),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = ParseVariantError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(ParseVariantError { kind: $kind, value: s.to_string() }),
                }
            }
        }
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($name),)+
                }
            }
        }
    };
}

impl_variant_strings!(WaveModel, "wave model", {
    "trochoidal" => Trochoidal,
    "spectrum" => Spectrum,
    "basin" => Basin,
    "tsunami" => Tsunami,
});

impl_variant_strings!(EdgeMode, "edge mode", {
    "free" => Free,
    "fixed" => Fixed,
});

impl_variant_strings!(ColorMode, "color mode", {
    "mono" => Mono,
    "depth" => Depth,
    "phase" => Phase,
});

/// The full per-frame settings record.
///
/// Serde defaults match [`WaveConfig::default`], so a boundary can supply a
/// partial JSON record and get documented behavior for the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaveConfig {
    pub model: WaveModel,
    /// Wave height scale. Clamped to ≥ 0.001 so height normalization never
    /// divides by zero.
    pub amplitude: f32,
    /// Trochoidal wavelength. Clamped to ≥ 0.5.
    pub wavelength: f32,
    /// Time scale for all models, 0.05 to 2.5.
    pub speed: f32,
    /// Gerstner horizontal-displacement factor, 0 to 1.
    pub steepness: f32,
    /// Spectrum component count, 1 to 24.
    pub components: u32,
    /// Shortest spectrum wavelength, 0.4 to 12.
    pub min_wavelength: f32,
    /// Longest spectrum wavelength, at least min + 0.2, at most 12.
    pub max_wavelength: f32,
    /// Wind direction in degrees, normalized into [0, 360).
    pub wind_dir: f32,
    /// Angular spread of spectrum components around the wind, 0 to 180°.
    pub spread: f32,
    /// Seed for the spectrum and the basin forcing. Zero is treated as 1.
    pub seed: u32,
    /// Basin forcing strength control, 1 to 48.
    pub basin_modes: u32,
    /// Basin still-water depth scale, 0.2 to 10.
    pub basin_depth: f32,
    pub basin_edge: EdgeMode,
    /// Tsunami crest width, 0.3 to 1.6.
    pub crest_width: f32,
    /// Tsunami curling strength, 0 to 1.4.
    pub curl: f32,
    /// Tsunami cross-axis ripple strength, 0 to 0.4.
    pub ripple: f32,
    pub color_mode: ColorMode,
    /// Base hue in degrees.
    pub hue: f32,
    /// Hue span mapped across the height range, degrees.
    pub hue_range: f32,
    /// Output saturation percentage, 0 to 100.
    pub saturation: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            model: WaveModel::Spectrum,
            amplitude: 2.2,
            wavelength: 3.2,
            speed: 0.6,
            steepness: 0.75,
            components: 12,
            min_wavelength: 0.8,
            max_wavelength: 5.5,
            wind_dir: 20.0,
            spread: 120.0,
            seed: 1337,
            basin_modes: 28,
            basin_depth: 2.2,
            basin_edge: EdgeMode::Free,
            crest_width: 0.8,
            curl: 0.7,
            ripple: 0.12,
            color_mode: ColorMode::Mono,
            hue: 200.0,
            hue_range: 120.0,
            saturation: 70.0,
        }
    }
}

impl WaveConfig {
    /// Return a copy with every field clamped into its documented range.
    /// Non-finite inputs collapse to the nearest bound, so downstream math
    /// never sees NaN or infinity.
    pub fn sanitized(&self) -> Self {
        let min_wl = finite_clamp(self.min_wavelength, 0.4, 12.0);
        Self {
            model: self.model,
            amplitude: finite_clamp(self.amplitude, 0.001, f32::MAX),
            wavelength: finite_clamp(self.wavelength, 0.5, f32::MAX),
            speed: finite_clamp(self.speed, 0.05, 2.5),
            steepness: finite_clamp(self.steepness, 0.0, 1.0),
            components: self.components.clamp(1, 24),
            min_wavelength: min_wl,
            max_wavelength: finite_clamp(self.max_wavelength, min_wl + 0.2, 12.0),
            wind_dir: crate::math::wrap(if self.wind_dir.is_finite() { self.wind_dir } else { 0.0 }, 360.0),
            spread: finite_clamp(self.spread, 0.0, 180.0),
            seed: self.seed.max(1),
            basin_modes: self.basin_modes.clamp(1, 48),
            basin_depth: finite_clamp(self.basin_depth, 0.2, 10.0),
            basin_edge: self.basin_edge,
            crest_width: finite_clamp(self.crest_width, 0.3, 1.6),
            curl: finite_clamp(self.curl, 0.0, 1.4),
            ripple: finite_clamp(self.ripple, 0.0, 0.4),
            color_mode: self.color_mode,
            hue: if self.hue.is_finite() { self.hue } else { 0.0 },
            hue_range: if self.hue_range.is_finite() { self.hue_range } else { 0.0 },
            saturation: finite_clamp(self.saturation, 0.0, 100.0).round(),
        }
    }

    /// Trochoidal wavenumber k = 2π / λ, with λ already clamped ≥ 0.5.
    pub fn wavenumber(&self) -> f32 {
        std::f32::consts::TAU / self.wavelength.max(0.5)
    }

    /// Wind direction in radians.
    pub fn wind_radians(&self) -> f32 {
        crate::math::wrap(self.wind_dir, 360.0).to_radians()
    }
}

fn finite_clamp(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() {
        lo
    } else {
        v.clamp(lo, hi)
    }
}
