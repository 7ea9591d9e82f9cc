//! Forward DCT and quantization of one 8x8 channel tile.
//!
//! The transform is the direct two-dimensional type-II DCT,
//!
//! ```text
//! F(u,v) = a(u) a(v) sum_x sum_y s(x,y) cos((2x+1)u*pi/16) cos((2y+1)v*pi/16)
//! a(0) = 1/sqrt(8), a(k) = 1/2
//! ```
//!
//! evaluated in `f32`. The cosine factors are tabulated once, which yields
//! the same `f32` values as evaluating them inline, so output is unchanged.

use crate::quant::QuantizationTable;
use crate::tables::{BLOCK_SIZE, ZIG_ZAG};

/// Quantized coefficients in zig-zag order; index 0 is DC.
pub type CoefficientBlock = [i16; BLOCK_SIZE];

const PI: f32 = 3.1415926;

/// Tabulated cosine and normalization factors.
#[derive(Clone, Debug)]
pub struct ForwardDct {
    /// `cos[x][u] = cos((2x+1) * u * pi / 16)`
    cos: [[f32; 8]; 8],
    alpha: [f32; 8],
}

impl ForwardDct {
    pub fn new() -> Self {
        let mut cos = [[0f32; 8]; 8];
        for (x, row) in cos.iter_mut().enumerate() {
            for (u, c) in row.iter_mut().enumerate() {
                *c = (((2 * x + 1) * u) as f32 * PI / 16.0).cos();
            }
        }
        let mut alpha = [0.5f32; 8];
        alpha[0] = 1.0 / 8f32.sqrt();
        ForwardDct { cos, alpha }
    }

    /// Transforms `samples` (row-major, centered) and divides each
    /// coefficient by its entry in `qt`.
    pub fn quantize(&self, samples: &[i8; BLOCK_SIZE], qt: &QuantizationTable) -> CoefficientBlock {
        let mut out = [0i16; BLOCK_SIZE];
        for v in 0..8 {
            for u in 0..8 {
                let mut temp = 0f32;
                for x in 0..8 {
                    for y in 0..8 {
                        let mut data = samples[y * 8 + x] as f32;
                        data *= self.cos[x][u];
                        data *= self.cos[y][v];
                        temp += data;
                    }
                }

                let zz = ZIG_ZAG[v * 8 + u];
                temp *= self.alpha[u] * self.alpha[v] / qt[zz] as f32;
                out[zz] = round_biased(temp);
            }
        }
        out
    }
}

impl Default for ForwardDct {
    fn default() -> Self {
        Self::new()
    }
}

/// Rounds half up by biasing into positive range before truncating.
#[inline]
fn round_biased(value: f32) -> i16 {
    ((value as f64 + 16384.5) as i16 as i32 - 16384) as i16
}
