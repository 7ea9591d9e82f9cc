//! Canonical Huffman tables for encoding.
//!
//! The DHT segment carries each table as 16 per-length code counts followed
//! by the symbols in code order. Encoding needs the inverse view: for every
//! symbol, the code bits and their length. [`HuffmanTable::from_spec`]
//! expands the first form into the second.

use crate::tables::{
    HT_CHROMA_AC, HT_CHROMA_AC_LEN, HT_CHROMA_DC, HT_CHROMA_DC_LEN, HT_LUMA_AC, HT_LUMA_AC_LEN,
    HT_LUMA_DC, HT_LUMA_DC_LEN,
};

/// A right-justified bit pattern of `length` bits.
///
/// `length == 0` marks a Huffman symbol that has no code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Codeword {
    pub length: u8,
    pub value: u16,
}

impl Codeword {
    pub fn new(length: u8, value: u16) -> Self {
        Codeword { length, value }
    }
}

/// Symbol-indexed code lookup. DC tables only populate symbols 0..=11.
#[derive(Clone, Debug)]
pub struct HuffmanTable {
    codes: [Codeword; 256],
}

impl HuffmanTable {
    /// Assigns canonical codes: within each length the symbols get
    /// consecutive values, and the running value is shifted left by one
    /// before moving to the next length.
    pub fn from_spec(counts: &[u8; 16], symbols: &[u8]) -> Self {
        debug_assert_eq!(
            counts.iter().map(|&n| n as usize).sum::<usize>(),
            symbols.len()
        );

        let mut codes = [Codeword::default(); 256];
        let mut code = 0u16;
        let mut k = 0usize;
        for (i, &count) in counts.iter().enumerate() {
            let length = (i + 1) as u8;
            for _ in 0..count {
                codes[symbols[k] as usize] = Codeword::new(length, code);
                k += 1;
                code = code.wrapping_add(1);
            }
            code <<= 1;
        }
        HuffmanTable { codes }
    }

    #[inline]
    pub fn get(&self, symbol: u8) -> Codeword {
        self.codes[symbol as usize]
    }
}

/// A DC/AC table pair serving one component class.
#[derive(Clone, Copy, Debug)]
pub struct TablePair<'a> {
    pub dc: &'a HuffmanTable,
    pub ac: &'a HuffmanTable,
}

/// The four standard tables: DC and AC for luma and chroma.
#[derive(Clone, Debug)]
pub struct HuffmanTables {
    pub luma_dc: HuffmanTable,
    pub luma_ac: HuffmanTable,
    pub chroma_dc: HuffmanTable,
    pub chroma_ac: HuffmanTable,
}

impl HuffmanTables {
    pub fn standard() -> Self {
        HuffmanTables {
            luma_dc: HuffmanTable::from_spec(&HT_LUMA_DC_LEN, &HT_LUMA_DC),
            luma_ac: HuffmanTable::from_spec(&HT_LUMA_AC_LEN, &HT_LUMA_AC),
            chroma_dc: HuffmanTable::from_spec(&HT_CHROMA_DC_LEN, &HT_CHROMA_DC),
            chroma_ac: HuffmanTable::from_spec(&HT_CHROMA_AC_LEN, &HT_CHROMA_AC),
        }
    }

    pub fn luma(&self) -> TablePair<'_> {
        TablePair {
            dc: &self.luma_dc,
            ac: &self.luma_ac,
        }
    }

    pub fn chroma(&self) -> TablePair<'_> {
        TablePair {
            dc: &self.chroma_dc,
            ac: &self.chroma_ac,
        }
    }
}

impl Default for HuffmanTables {
    fn default() -> Self {
        Self::standard()
    }
}
