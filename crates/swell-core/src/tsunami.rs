//! Procedural tsunami: a closed-form traveling wave along a wind-rotated
//! axis, rebuilt per frame from the configuration and time.

use crate::config::WaveConfig;
use crate::math::{smoothstep, wrap_signed};
use crate::EXTENT_HALF;

/// Plan-view lattice used to estimate the rest level of the profile.
const BASELINE_COORDS: [f32; 4] = [-3.0, -1.0, 1.0, 3.0];

/// Precomputed per-frame tsunami profile.
#[derive(Debug, Clone)]
pub struct TsunamiField {
    /// Travel axis (wind direction), unit length.
    pub dir_x: f32,
    pub dir_z: f32,
    /// Wrap period of the moving center along the axis.
    pub period: f32,
    /// Speed-scaled simulation time.
    pub time: f32,
    /// Along-axis position of the crest, wrapped into [-period/2, period/2).
    pub center: f32,
    pub amp: f32,
    crest_width: f32,
    curl: f32,
    ripple: f32,
    baseline: f32,
}

impl TsunamiField {
    /// Expects a sanitized config. The baseline is the mean profile height
    /// over a fixed 4×4 lattice, subtracted so the rest state sits near
    /// zero for any parameter choice.
    pub fn new(cfg: &WaveConfig, t: f32) -> Self {
        let wind = cfg.wind_radians();
        let dir_x = wind.cos();
        let dir_z = wind.sin();
        let abs_sum = (dir_x.abs() + dir_z.abs()).max(0.25);
        let period = 2.0 * EXTENT_HALF * abs_sum;
        let time = t * cfg.speed;

        let mut field = Self {
            dir_x,
            dir_z,
            period,
            time,
            center: wrap_signed(0.55 - time * 1.35, period),
            amp: cfg.amplitude,
            crest_width: cfg.crest_width,
            curl: cfg.curl,
            ripple: cfg.ripple,
            baseline: 0.0,
        };

        let mut sum = 0.0;
        for u in BASELINE_COORDS {
            for v in BASELINE_COORDS {
                sum += field.raw_height(u, v);
            }
        }
        field.baseline = sum / (BASELINE_COORDS.len() * BASELINE_COORDS.len()) as f32;
        field
    }

    /// Baseline-corrected surface height at a plan-view point.
    pub fn height(&self, u: f32, v: f32) -> f32 {
        self.raw_height(u, v) - self.baseline
    }

    /// The raw profile: leading Gaussian crest, trailing drawdown, a curl
    /// term active only near high crest, a smoothstep-gated trailing wake,
    /// a crest-masked cross-axis ripple, and a small two-sine texture.
    fn raw_height(&self, u: f32, v: f32) -> f32 {
        let s = self.dir_x * u + self.dir_z * v;
        let q = -self.dir_z * u + self.dir_x * v;
        let d = wrap_signed(s - self.center, self.period);

        let cw = self.crest_width * 1.1;
        let crest = self.amp * (-(d * d) * cw).exp();
        let drawdown = -self.amp * 0.62 * (-((d + 1.45) * (d + 1.45)) * cw * 0.55).exp();

        let curl_factor = (crest - self.amp * 0.52).max(0.0);
        let curl_term = ((s + self.time) * 2.6 + 0.5).sin() * curl_factor * self.curl;

        let wake_gate = smoothstep(0.0, 2.8, d);
        let wake_term = (s * 1.55 + self.time * 2.0).sin()
            * (0.22 + 0.08 * self.curl)
            * wake_gate
            * (-(d * d) * 0.22).exp();

        let crest_mask = 1.0 - (crest / (self.amp * 1.1)).clamp(0.0, 1.0);
        let ripple_term = (q * 2.45 + self.time * 1.65).sin() * self.ripple * crest_mask;

        let texture = ((u * 5.0 + v * 3.0 + self.time * 2.0).sin()
            + (u * 7.0 - v * 4.0 + self.time * 2.8).sin() * 0.6)
            * 0.04;

        crest + drawdown + curl_term + wake_term + ripple_term + texture
    }
}
