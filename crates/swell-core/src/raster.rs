//! Software rasterizer: rotates sampled surface points through a drifting
//! camera, projects them with a perspective divide, and resolves occlusion
//! with an inverse-depth buffer. Also owns the tsunami spray pass, which
//! writes particles straight into the buffers at full brightness.

use crate::sampler::SurfaceSampler;
use crate::tsunami::TsunamiField;
use crate::EXTENT_HALF;

const CAMERA_DISTANCE: f32 = 7.0;
const FIELD_OF_VIEW: f32 = 75.0;
/// Samples at or behind this depth are discarded before the divide.
const DEPTH_EPSILON: f32 = 0.1;
const PIXEL_SCALE: f32 = 4.0;
const SPRAY_COUNT: usize = 90;

/// Pixel width the sampling step is calibrated against.
const REFERENCE_PIXEL_WIDTH: f32 = 180.0;

/// Camera orientation for one frame: a slow autonomous yaw plus a small
/// pitch oscillation, both driven by raw frame time.
#[derive(Debug, Clone, Copy)]
pub struct FrameRotation {
    c_a: f32,
    s_a: f32,
    c_b: f32,
    s_b: f32,
}

impl FrameRotation {
    pub fn at_time(t: f32) -> Self {
        let pitch = 0.4 + (t * 0.2).sin() * 0.2;
        let yaw = (t * 0.08).sin() * 0.35;
        Self {
            c_a: pitch.cos(),
            s_a: pitch.sin(),
            c_b: yaw.cos(),
            s_b: yaw.sin(),
        }
    }

    /// Pitch about the x axis, then yaw about the y axis.
    #[inline]
    pub fn apply(&self, x: f32, y: f32, z: f32) -> (f32, f32, f32) {
        let y1 = y * self.c_a - z * self.s_a;
        let z1 = y * self.s_a + z * self.c_a;
        let x2 = x * self.c_b + z1 * self.s_b;
        let z2 = -x * self.s_b + z1 * self.c_b;
        (x2, y1, z2)
    }
}

/// Dense per-pixel state for one frame. Reused across frames; storage only
/// grows, never shrinks.
#[derive(Debug, Default)]
pub struct PixelBuffers {
    width: usize,
    height: usize,
    pub inv_depth: Vec<f32>,
    pub luminance: Vec<f32>,
    pub surface_height: Vec<f32>,
}

impl PixelBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt the frame's resolution and clear every pixel. Reallocates only
    /// when the required size exceeds current capacity.
    pub fn prepare(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        let size = width * height;
        if self.inv_depth.len() < size {
            self.inv_depth.resize(size, 0.0);
            self.luminance.resize(size, 0.0);
            self.surface_height.resize(size, 0.0);
        }
        self.inv_depth[..size].fill(0.0);
        self.luminance[..size].fill(0.0);
        self.surface_height[..size].fill(0.0);
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn idx(&self, px: usize, py: usize) -> usize {
        py * self.width + px
    }
}

#[derive(Debug, Default)]
pub struct Rasterizer {
    pub buffers: PixelBuffers,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan-view sampling step for a given pixel width: finer for larger
    /// outputs so sample count tracks resolution, bounded to keep both
    /// quality and cost in check.
    pub fn sample_step(pixel_width: usize) -> f32 {
        let pw = (pixel_width.max(1)) as f32;
        (0.05 * (REFERENCE_PIXEL_WIDTH / pw).sqrt()).clamp(0.03, 0.07)
    }

    /// Sample the surface over the full extent and z-buffer it into the
    /// pixel grid. Clears and resizes the buffers first.
    pub fn render_surface(
        &mut self,
        sampler: &SurfaceSampler<'_>,
        t: f32,
        pixel_width: usize,
        pixel_height: usize,
    ) {
        self.buffers.prepare(pixel_width, pixel_height);
        let rotation = FrameRotation::at_time(t);
        let step = Self::sample_step(pixel_width);

        let mut u = -EXTENT_HALF;
        while u <= EXTENT_HALF {
            let mut v = -EXTENT_HALF;
            while v <= EXTENT_HALF {
                let s = sampler.sample(u, v, t);
                if let Some((idx, depth)) = self.project(&rotation, s.x, s.y, s.z) {
                    self.deposit(idx, depth, s.luminance, s.y);
                }
                v += step;
            }
            u += step;
        }
    }

    /// Scatter spray particles along the tsunami crest. Particle positions
    /// are fixed functions of the particle index and the field's scaled
    /// time; visibility flickers on raw frame time. Visible particles
    /// overwrite whatever the surface pass put at their pixel.
    pub fn render_spray(&mut self, field: &TsunamiField, t: f32) {
        let rotation = FrameRotation::at_time(t);
        let amp = field.amp;

        for i in 0..SPRAY_COUNT {
            let fi = i as f32;
            let q = (fi * 1.31).sin() * 3.1;
            let s = field.center + (fi * 0.73 + field.time * 0.6).sin() * 0.24;
            let sx = field.dir_x * s - field.dir_z * q + (fi * 2.1).sin() * 0.12;
            let sz = field.dir_z * s + field.dir_x * q + (fi * 1.7).cos() * 0.12;

            let crest = field.height(sx, sz);
            if crest <= amp * 0.72 {
                continue;
            }
            let sy = crest + 0.25 + (field.time * 10.0 + fi).sin() * 0.22;

            if let Some((idx, _)) = self.project(&rotation, sx, sy, sz) {
                if (t * 10.0 + fi * 0.7).sin() > 0.0 {
                    self.buffers.luminance[idx] = 1.0;
                    self.buffers.inv_depth[idx] = 1.0;
                    self.buffers.surface_height[idx] = sy;
                }
            }
        }
    }

    /// Keep the nearest surface per pixel: a write lands only if its
    /// inverse depth beats the stored one.
    #[inline]
    fn deposit(&mut self, idx: usize, depth: f32, luminance: f32, height: f32) {
        let inv_z = 1.0 / depth;
        if inv_z > self.buffers.inv_depth[idx] {
            self.buffers.inv_depth[idx] = inv_z;
            self.buffers.luminance[idx] = luminance;
            self.buffers.surface_height[idx] = height;
        }
    }

    /// Rotate, depth-cull, and project a world point to a buffer index.
    fn project(&self, rotation: &FrameRotation, x: f32, y: f32, z: f32) -> Option<(usize, f32)> {
        let (x2, y2, z2) = rotation.apply(x, y, z);
        let depth = z2 + CAMERA_DISTANCE;
        if depth <= DEPTH_EPSILON {
            return None;
        }

        let scale = FIELD_OF_VIEW / depth;
        let pw = self.buffers.width();
        let ph = self.buffers.height();
        let px = (pw as f32 / 2.0 + x2 * scale * PIXEL_SCALE).floor();
        let py = (ph as f32 / 2.0 - y2 * scale * PIXEL_SCALE).floor();
        // Positive-form check: NaN fails every comparison and is dropped.
        if px >= 0.0 && px < pw as f32 && py >= 0.0 && py < ph as f32 {
            Some((self.buffers.idx(px as usize, py as usize), depth))
        } else {
            None
        }
    }
}
