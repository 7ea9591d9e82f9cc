//! Huffman entropy coding of quantized blocks.
//!
//! Each block becomes a short sequence of [`Codeword`]s: the DC difference
//! against the channel's predictor, then run-length coded AC symbols. The
//! sequence is handed to the bit writer unchanged.

use crate::dct::CoefficientBlock;
use crate::huffman::{Codeword, TablePair};

/// AC symbol for End-Of-Block.
const EOB: u8 = 0x00;
/// AC symbol for a run of sixteen zeros.
const ZRL: u8 = 0xF0;

/// Magnitude category of `value` and its extra bits.
///
/// Negative values are stored as `(1 << length) + value - 1`, the one's
/// complement of `|value|` in `length` bits.
pub fn magnitude_codeword(value: i32) -> Codeword {
    let mut abs = value.unsigned_abs();
    let mut length = 0u8;
    while abs != 0 {
        abs >>= 1;
        length += 1;
    }

    let bits = if value > 0 {
        value
    } else {
        (1 << length) + value - 1
    };
    Codeword::new(length, bits as u16)
}

/// Appends the codewords for `block` to `out`.
///
/// `pred` holds the previous DC coefficient of this channel and is replaced
/// with this block's DC coefficient.
pub fn encode_block(
    block: &CoefficientBlock,
    pred: &mut i16,
    tables: TablePair<'_>,
    out: &mut Vec<Codeword>,
) {
    // DC
    let diff = block[0] as i32 - *pred as i32;
    *pred = block[0];
    if diff == 0 {
        out.push(tables.dc.get(0));
    } else {
        let bits = magnitude_codeword(diff);
        out.push(tables.dc.get(bits.length));
        out.push(bits);
    }

    // AC
    let mut end_pos = 63;
    while end_pos > 0 && block[end_pos] == 0 {
        end_pos -= 1;
    }

    let mut i = 1;
    while i <= end_pos {
        let start = i;
        while i <= end_pos && block[i] == 0 {
            i += 1;
        }

        let mut zeros = i - start;
        if zeros >= 16 {
            for _ in 0..zeros / 16 {
                out.push(tables.ac.get(ZRL));
            }
            zeros %= 16;
        }

        let bits = magnitude_codeword(block[i] as i32);
        debug_assert!(bits.length <= 10);
        out.push(tables.ac.get(((zeros as u8) << 4) | bits.length));
        out.push(bits);
        i += 1;
    }

    if end_pos != 63 {
        out.push(tables.ac.get(EOB));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::HuffmanTables;

    fn encode(block: &CoefficientBlock, pred: &mut i16) -> Vec<Codeword> {
        let tables = HuffmanTables::standard();
        let mut out = Vec::new();
        encode_block(block, pred, tables.luma(), &mut out);
        out
    }

    #[test]
    fn magnitude_categories() {
        assert_eq!(magnitude_codeword(0), Codeword::new(0, 0));
        assert_eq!(magnitude_codeword(1), Codeword::new(1, 1));
        assert_eq!(magnitude_codeword(-1), Codeword::new(1, 0));
        assert_eq!(magnitude_codeword(5), Codeword::new(3, 0b101));
        assert_eq!(magnitude_codeword(-5), Codeword::new(3, 0b010));
        assert_eq!(magnitude_codeword(-128), Codeword::new(8, 0b0111_1111));
        assert_eq!(magnitude_codeword(2047), Codeword::new(11, 0x7FF));
        assert_eq!(magnitude_codeword(-2047), Codeword::new(11, 0));
    }

    #[test]
    fn dc_only_block() {
        let tables = HuffmanTables::standard();
        let mut block = [0i16; 64];
        block[0] = 5;
        let mut pred = 0;
        let out = encode(&block, &mut pred);

        assert_eq!(pred, 5);
        assert_eq!(
            out,
            vec![
                tables.luma_dc.get(3),
                Codeword::new(3, 0b101),
                // The last non-zero index is 0, not 63, so EOB follows.
                tables.luma_ac.get(EOB),
            ]
        );
    }

    #[test]
    fn unchanged_dc_emits_size_zero() {
        let tables = HuffmanTables::standard();
        let block = [0i16; 64];
        let mut pred = 0;
        let out = encode(&block, &mut pred);
        assert_eq!(out, vec![tables.luma_dc.get(0), tables.luma_ac.get(EOB)]);
    }

    #[test]
    fn dc_is_coded_against_the_predictor() {
        let tables = HuffmanTables::standard();
        let mut block = [0i16; 64];
        block[0] = -3;
        let mut pred = 4;
        let out = encode(&block, &mut pred);
        // -7 is category 3, bits 000.
        assert_eq!(out[0], tables.luma_dc.get(3));
        assert_eq!(out[1], Codeword::new(3, 0));
        assert_eq!(pred, -3);
    }

    #[test]
    fn long_zero_run_uses_zrl() {
        let tables = HuffmanTables::standard();
        let mut block = [0i16; 64];
        // Positions 1..=17 are zero, 18 holds the coefficient.
        block[18] = 3;
        let mut pred = 0;
        let out = encode(&block, &mut pred);

        assert_eq!(
            out,
            vec![
                tables.luma_dc.get(0),
                tables.luma_ac.get(ZRL),
                tables.luma_ac.get((1 << 4) | 2),
                Codeword::new(2, 0b11),
                tables.luma_ac.get(EOB),
            ]
        );
    }

    #[test]
    fn run_of_exactly_sixteen() {
        let tables = HuffmanTables::standard();
        let mut block = [0i16; 64];
        block[17] = -1;
        let mut pred = 0;
        let out = encode(&block, &mut pred);
        assert_eq!(out[1], tables.luma_ac.get(ZRL));
        assert_eq!(out[2], tables.luma_ac.get(0x01));
        assert_eq!(out[3], Codeword::new(1, 0));
    }

    #[test]
    fn full_block_has_no_eob() {
        let tables = HuffmanTables::standard();
        let block = [1i16; 64];
        let mut pred = 1;
        let out = encode(&block, &mut pred);
        // DC unchanged, then 63 (run 0, size 1) pairs.
        assert_eq!(out.len(), 1 + 63 * 2);
        assert_eq!(out[0], tables.luma_dc.get(0));
        assert!(out[1..]
            .chunks(2)
            .all(|pair| pair[0] == tables.luma_ac.get(0x01) && pair[1] == Codeword::new(1, 1)));
    }

    #[test]
    fn last_coefficient_without_eob() {
        let tables = HuffmanTables::standard();
        let mut block = [0i16; 64];
        block[63] = 2;
        let mut pred = 0;
        let out = encode(&block, &mut pred);
        // 62 zeros: three ZRLs, then run 14.
        assert_eq!(
            out,
            vec![
                tables.luma_dc.get(0),
                tables.luma_ac.get(ZRL),
                tables.luma_ac.get(ZRL),
                tables.luma_ac.get(ZRL),
                tables.luma_ac.get((14 << 4) | 2),
                Codeword::new(2, 0b10),
            ]
        );
    }
}
