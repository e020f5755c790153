//! Square height grid over a centered physical extent, stored row-major.

/// A square N×N grid of f32 heights spanning `[-half, half]²` in plan view.
#[derive(Debug, Clone)]
pub struct HeightGrid {
    pub data: Vec<f32>,
    n: usize,
    half: f32,
}

impl HeightGrid {
    pub fn new(n: usize, half: f32) -> Self {
        Self { data: vec![0.0; n * n], n, half }
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        j * self.n + i
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[j * self.n + i]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, v: f32) {
        self.data[j * self.n + i] = v;
    }

    pub fn fill(&mut self, v: f32) {
        self.data.fill(v);
    }

    /// Bilinear sample at plan-view coordinates, clamped at the edges.
    /// Exact at grid nodes: sampling at a node coordinate returns the
    /// stored node value.
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        let n = self.n;
        let span = self.half * 2.0;
        let last = (n - 1) as f32;

        let fx = (((x + self.half) / span) * last).clamp(0.0, last);
        let fz = (((z + self.half) / span) * last).clamp(0.0, last);

        let x0 = fx.floor() as usize;
        let z0 = fz.floor() as usize;
        let x1 = (x0 + 1).min(n - 1);
        let z1 = (z0 + 1).min(n - 1);
        let tx = fx - x0 as f32;
        let tz = fz - z0 as f32;

        let a = self.data[z0 * n + x0] * (1.0 - tx) + self.data[z0 * n + x1] * tx;
        let b = self.data[z1 * n + x0] * (1.0 - tx) + self.data[z1 * n + x1] * tx;
        a * (1.0 - tz) + b * tz
    }

    /// Plan-view coordinate of grid column/row `i` (same spacing on both axes).
    pub fn coord(&self, i: usize) -> f32 {
        (i as f32 / (self.n - 1) as f32 - 0.5) * self.half * 2.0
    }
}
