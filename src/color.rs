//! RGB to YCbCr conversion for one 8x8 tile.

use crate::tables::BLOCK_SIZE;

/// Centered luma and chroma samples for one tile, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YCbCrTile {
    pub y: [i8; BLOCK_SIZE],
    pub cb: [i8; BLOCK_SIZE],
    pub cr: [i8; BLOCK_SIZE],
}

/// Converts the 8x8 tile whose top-left pixel starts at byte `origin` of a
/// B,G,R buffer with `stride` bytes per row.
///
/// Samples are narrowed with a truncating cast, so results lean toward zero.
pub fn convert_tile(bgr: &[u8], origin: usize, stride: usize) -> YCbCrTile {
    let mut tile = YCbCrTile {
        y: [0; BLOCK_SIZE],
        cb: [0; BLOCK_SIZE],
        cr: [0; BLOCK_SIZE],
    };

    for row in 0..8 {
        let start = origin + row * stride;
        let pixels = bgr[start..start + 8 * 3].chunks_exact(3);
        for (col, px) in pixels.enumerate() {
            let b = px[0] as f32;
            let g = px[1] as f32;
            let r = px[2] as f32;

            let idx = row * 8 + col;
            tile.y[idx] = (0.299 * r + 0.587 * g + 0.114 * b - 128.0) as i8;
            tile.cb[idx] = (-0.1687 * r - 0.3313 * g + 0.5 * b) as i8;
            tile.cr[idx] = (0.5 * r - 0.4187 * g - 0.0813 * b) as i8;
        }
    }
    tile
}
