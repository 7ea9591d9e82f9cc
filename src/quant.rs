//! Quality-scaled quantization tables.

use crate::tables::{BASE_QT_CHROMA, BASE_QT_LUMA, BLOCK_SIZE, ZIG_ZAG};

/// 64 divisors stored in zig-zag order, matching coefficient storage.
pub type QuantizationTable = [u8; BLOCK_SIZE];

/// Clamps a caller-supplied quality into 1..=99.
pub fn clamp_quality(quality: i32) -> i32 {
    quality.clamp(1, 99)
}

/// Scales `base` (row-major) by `quality` and permutes it into zig-zag order.
pub fn scale_table(base: &[u8; BLOCK_SIZE], quality: i32) -> QuantizationTable {
    let quality = clamp_quality(quality);
    let mut table = [0u8; BLOCK_SIZE];
    for i in 0..BLOCK_SIZE {
        let scaled = (base[i] as i32 * quality + 50) / 100;
        table[ZIG_ZAG[i]] = scaled.clamp(1, 255) as u8;
    }
    table
}

/// The luma/chroma table pair used for one encode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantTables {
    pub luma: QuantizationTable,
    pub chroma: QuantizationTable,
}

impl QuantTables {
    pub fn new(quality: i32) -> Self {
        QuantTables {
            luma: scale_table(&BASE_QT_LUMA, quality),
            chroma: scale_table(&BASE_QT_CHROMA, quality),
        }
    }
}
