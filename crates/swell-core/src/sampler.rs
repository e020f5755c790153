//! Surface evaluation: plan-view (u, v) + time → world position and shaded
//! luminance, one evaluation routine per wave model behind a common enum.
//!
//! The Gerstner models (trochoidal, spectrum) derive foam and the surface
//! normal from the analytic Jacobian of the horizontal displacement; the
//! grid/procedural models (basin, tsunami) use small forward differences.
//! Luminance is always clamped into [0, 1].

use crate::basin::BasinState;
use crate::spectrum::{SpectrumComponent, GRAVITY};
use crate::tsunami::TsunamiField;
use crate::config::WaveConfig;

/// Fixed light direction for diffuse shading (not normalized; the original
/// renderer dots against it as-is).
pub const LIGHT_DIR: [f32; 3] = [0.3, 1.0, -0.4];

/// Jacobian determinant below which a Gerstner surface counts as breaking.
const BREAK_JACOBIAN: f32 = 0.55;

/// Result of evaluating the surface at one plan-view point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub luminance: f32,
}

/// Single-direction Gerstner wave parameters.
#[derive(Debug, Clone, Copy)]
pub struct TrochoidalWave {
    pub amp: f32,
    pub k: f32,
    pub omega: f32,
    pub steepness: f32,
    pub dir_x: f32,
    pub dir_z: f32,
    pub speed: f32,
}

impl TrochoidalWave {
    /// Expects a sanitized config.
    pub fn from_config(cfg: &WaveConfig) -> Self {
        let k = cfg.wavenumber();
        let wind = cfg.wind_radians();
        Self {
            amp: cfg.amplitude,
            k,
            omega: (GRAVITY * k).sqrt(),
            steepness: cfg.steepness,
            dir_x: wind.cos(),
            dir_z: wind.sin(),
            speed: cfg.speed,
        }
    }
}

/// One frame's surface evaluator. Borrows the cross-frame state it needs;
/// the renderer constructs a fresh one each frame.
pub enum SurfaceSampler<'a> {
    /// Neutral surface: zero height, zero luminance. Used when a model has
    /// nothing to contribute (for example an empty spectrum).
    Still,
    Trochoidal(TrochoidalWave),
    Spectrum {
        components: &'a [SpectrumComponent],
        amp: f32,
        steepness: f32,
        speed: f32,
    },
    Basin {
        state: &'a BasinState,
        amp: f32,
    },
    Tsunami(&'a TsunamiField),
}

impl SurfaceSampler<'_> {
    pub fn sample(&self, u: f32, v: f32, t: f32) -> WaveSample {
        match self {
            Self::Still => WaveSample { x: u, y: 0.0, z: v, luminance: 0.0 },
            Self::Trochoidal(wave) => sample_trochoidal(wave, u, v, t),
            Self::Spectrum { components, amp, steepness, speed } => {
                if components.is_empty() {
                    WaveSample { x: u, y: 0.0, z: v, luminance: 0.0 }
                } else {
                    sample_spectrum(components, *amp, *steepness, *speed, u, v, t)
                }
            }
            Self::Basin { state, amp } => sample_basin(state, *amp, u, v),
            Self::Tsunami(field) => sample_tsunami(field, u, v),
        }
    }
}

/// Diffuse term from an unnormalized normal, plus foam and an ambient
/// floor, clamped into [0, 1]. A zero-length normal falls back to unit
/// scale rather than dividing by zero.
fn shade(nx: f32, ny: f32, nz: f32, foam: f32) -> f32 {
    let len = (nx * nx + ny * ny + nz * nz).sqrt();
    let len = if len > 0.0 { len } else { 1.0 };
    let diffuse =
        (nx * LIGHT_DIR[0] + ny * LIGHT_DIR[1] + nz * LIGHT_DIR[2]) / len;
    (diffuse * 0.6 + foam + 0.08).clamp(0.0, 1.0)
}

fn sample_trochoidal(wave: &TrochoidalWave, u: f32, v: f32, t: f32) -> WaveSample {
    let phase = wave.k * (wave.dir_x * u + wave.dir_z * v) - wave.omega * t * wave.speed;
    let (sin_p, cos_p) = phase.sin_cos();

    let qa = wave.steepness / wave.k;
    let x = u + wave.dir_x * qa * cos_p;
    let z = v + wave.dir_z * qa * cos_p;
    let y = wave.amp * sin_p;

    let steep_sin = wave.steepness * sin_p;
    let dx_dx0 = 1.0 - steep_sin * wave.dir_x * wave.dir_x;
    let dx_dz0 = -steep_sin * wave.dir_x * wave.dir_z;
    let dz_dx0 = -steep_sin * wave.dir_z * wave.dir_x;
    let dz_dz0 = 1.0 - steep_sin * wave.dir_z * wave.dir_z;
    let dy_dx0 = wave.amp * wave.k * cos_p * wave.dir_x;
    let dy_dz0 = wave.amp * wave.k * cos_p * wave.dir_z;

    let jacobian = dx_dx0 * dz_dz0 - dx_dz0 * dz_dx0;
    let breaking = ((BREAK_JACOBIAN - jacobian) * 2.2).clamp(0.0, 1.0);
    let crestness = (y / (wave.amp * 0.85)).clamp(0.0, 1.0);
    let foam = breaking * crestness * 0.3;

    let nx = dy_dz0 * dz_dx0 - dz_dz0 * dy_dx0;
    let ny = dz_dz0 * dx_dx0 - dx_dz0 * dz_dx0;
    let nz = dx_dz0 * dy_dx0 - dy_dz0 * dx_dx0;

    WaveSample { x, y, z, luminance: shade(nx, ny, nz, foam) }
}

fn sample_spectrum(
    components: &[SpectrumComponent],
    amp: f32,
    steepness: f32,
    speed: f32,
    u: f32,
    v: f32,
    t: f32,
) -> WaveSample {
    let mut x = u;
    let mut z = v;
    let mut y = 0.0f32;

    // Jacobian of the displaced position w.r.t. the undisplaced (u, v),
    // accumulated analytically in component order. The order is part of
    // the determinism contract.
    let mut dx_dx0 = 1.0f32;
    let mut dx_dz0 = 0.0f32;
    let mut dz_dx0 = 0.0f32;
    let mut dz_dz0 = 1.0f32;
    let mut dy_dx0 = 0.0f32;
    let mut dy_dz0 = 0.0f32;

    for wave in components {
        let a = amp * wave.weight;
        let phase =
            wave.k * (wave.dir_x * u + wave.dir_z * v) - wave.omega * t * speed + wave.phase;
        let (sin_p, cos_p) = phase.sin_cos();

        y += a * sin_p;

        let qa = steepness * wave.weight / wave.k;
        x += wave.dir_x * qa * cos_p;
        z += wave.dir_z * qa * cos_p;

        let common = qa * wave.k * sin_p;
        dx_dx0 -= common * wave.dir_x * wave.dir_x;
        dx_dz0 -= common * wave.dir_x * wave.dir_z;
        dz_dx0 -= common * wave.dir_z * wave.dir_x;
        dz_dz0 -= common * wave.dir_z * wave.dir_z;

        let dy_common = a * wave.k * cos_p;
        dy_dx0 += dy_common * wave.dir_x;
        dy_dz0 += dy_common * wave.dir_z;
    }

    let jacobian = dx_dx0 * dz_dz0 - dx_dz0 * dz_dx0;
    let breaking = ((BREAK_JACOBIAN - jacobian) * 2.2).clamp(0.0, 1.0);
    let crestness = (y / (amp * 0.85)).clamp(0.0, 1.0);
    let foam = breaking * crestness * 0.35;

    let nx = dy_dz0 * dz_dx0 - dz_dz0 * dy_dx0;
    let ny = dz_dz0 * dx_dx0 - dx_dz0 * dz_dx0;
    let nz = dx_dz0 * dy_dx0 - dy_dz0 * dx_dx0;

    WaveSample { x, y, z, luminance: shade(nx, ny, nz, foam) }
}

fn sample_basin(state: &BasinState, amp: f32, u: f32, v: f32) -> WaveSample {
    const EPS: f32 = 0.055;
    let grid = state.surface();
    let y = grid.sample(u, v) * amp;
    let hu = grid.sample(u + EPS, v) * amp;
    let hv = grid.sample(u, v + EPS) * amp;
    let dx = (hu - y) / EPS;
    let dz = (hv - y) / EPS;

    let slope = dx.hypot(dz);
    let foam = ((slope - 0.75) * 0.28).clamp(0.0, 0.32);

    WaveSample { x: u, y, z: v, luminance: shade(-dx, 1.0, -dz, foam) }
}

fn sample_tsunami(field: &TsunamiField, u: f32, v: f32) -> WaveSample {
    const EPS: f32 = 0.05;
    let amp = field.amp;
    let y = field.height(u, v);
    let hu = field.height(u + EPS, v);
    let hv = field.height(u, v + EPS);
    let dx = (hu - y) / EPS;
    let dz = (hv - y) / EPS;

    let slope = dx.hypot(dz);
    let crestness = ((y - amp * 0.15) / (amp * 0.85)).clamp(0.0, 1.0);
    let breaking = ((slope - 0.85) * 0.75 + crestness * 1.15).clamp(0.0, 1.0);
    let foam = breaking * 0.38;

    WaveSample { x: u, y, z: v, luminance: shade(-dx, 1.0, -dz, foam) }
}
