//! Bit packing for the entropy-coded segment.

use std::io::{self, Write};

use crate::huffman::Codeword;

/// Packs codewords MSB-first into bytes, stuffing a `0x00` after every
/// `0xFF` so the data cannot be mistaken for a marker.
pub struct BitWriter<W: Write> {
    output: W,
    /*
         v-- location
        [                     ]   <-- bit buffer
       32                     0

       Bits are pushed from the top down. Whenever a full byte sits at the
       top it is written out and the buffer shifts left by eight. */
    bitbuffer: u32,
    location: u32,
}

impl<W: Write> BitWriter<W> {
    pub fn new(output: W) -> Self {
        BitWriter {
            output,
            bitbuffer: 0,
            location: 0,
        }
    }

    /// Appends the low `cw.length` bits of `cw.value`.
    pub fn put(&mut self, cw: Codeword) -> io::Result<()> {
        debug_assert!(cw.length <= 16);
        if cw.length == 0 {
            return Ok(());
        }

        let bits = cw.value as u32 & ((1u32 << cw.length) - 1);
        let nloc = self.location + cw.length as u32;
        self.bitbuffer |= bits << (32 - nloc);
        self.location = nloc;
        while self.location >= 8 {
            let c = (self.bitbuffer >> 24) as u8;
            self.output.write_all(&[c])?;
            if c == 0xFF {
                self.output.write_all(&[0x00])?;
            }
            self.bitbuffer <<= 8;
            self.location -= 8;
        }
        Ok(())
    }

    pub fn put_all(&mut self, codewords: &[Codeword]) -> io::Result<()> {
        for &cw in codewords {
            self.put(cw)?;
        }
        Ok(())
    }

    /// Writes any partial byte as-is (low bits zero, no stuffing) and
    /// returns the sink.
    pub fn finish(mut self) -> io::Result<W> {
        if self.location > 0 {
            let c = (self.bitbuffer >> 24) as u8;
            self.output.write_all(&[c])?;
            self.bitbuffer = 0;
            self.location = 0;
        }
        Ok(self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(codewords: &[Codeword]) -> Vec<u8> {
        let mut writer = BitWriter::new(Vec::new());
        writer.put_all(codewords).unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn msb_first_across_byte_boundaries() {
        let out = pack(&[
            Codeword::new(3, 0b101),
            Codeword::new(7, 0b1100110),
            Codeword::new(6, 0b001111),
        ]);
        assert_eq!(out, vec![0b1011_1001, 0b1000_1111]);
    }

    #[test]
    fn ff_is_stuffed() {
        let out = pack(&[Codeword::new(4, 0xF), Codeword::new(4, 0xF), Codeword::new(2, 0b01)]);
        assert_eq!(out, vec![0xFF, 0x00, 0b0100_0000]);
    }

    #[test]
    fn ff_inside_a_long_code_is_stuffed() {
        let out = pack(&[Codeword::new(16, 0x7FFF), Codeword::new(8, 0x80)]);
        // 0111_1111 1111_1111 1000_0000
        assert_eq!(out, vec![0x7F, 0xFF, 0x00, 0x80]);
    }

    #[test]
    fn partial_byte_is_zero_padded() {
        let out = pack(&[Codeword::new(1, 1)]);
        assert_eq!(out, vec![0x80]);
    }

    #[test]
    fn empty_codewords_write_nothing() {
        let mut writer = BitWriter::new(Vec::new());
        writer.put(Codeword::new(0, 0)).unwrap();
        assert!(writer.finish().unwrap().is_empty());
    }

    #[test]
    fn full_bytes_leave_without_finish() {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        writer.put(Codeword::new(5, 0b10101)).unwrap();
        writer.put(Codeword::new(5, 0b10101)).unwrap();
        drop(writer);
        // 10101 101|01: only the first byte is complete
        assert_eq!(out, vec![0b1010_1101]);
    }
}
