//! Baseline JPEG encoder for 24-bit B,G,R rasters.
//!
//! Images are encoded 4:4:4 with the standard Huffman tables and a single
//! sequential scan. Width and height must be multiples of 8.
//!
//! ```no_run
//! use tiny_bmp_jpeg::JpegEncoder;
//!
//! let mut encoder = JpegEncoder::new();
//! encoder.read_bmp("in.bmp")?;
//! encoder.encode_to_file("out.jpg", 75)?;
//! # Ok::<(), tiny_bmp_jpeg::Error>(())
//! ```

pub mod bitstream;
pub mod bmp;
pub mod color;
pub mod dct;
pub mod entropy;
mod error;
pub mod huffman;
pub mod marker;
pub mod quant;
mod raster;
pub mod tables;

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use crate::bitstream::BitWriter;
use crate::dct::ForwardDct;
use crate::huffman::{Codeword, HuffmanTables, TablePair};
use crate::quant::{QuantTables, QuantizationTable};
use crate::tables::BLOCK_SIZE;

pub use crate::error::{BitmapError, Error, Result};
pub use crate::raster::RasterImage;

fn encode_channel<W: Write>(
    dct: &ForwardDct,
    samples: &[i8; BLOCK_SIZE],
    qt: &QuantizationTable,
    tables: TablePair<'_>,
    pred: &mut i16,
    codewords: &mut Vec<Codeword>,
    writer: &mut BitWriter<W>,
) -> Result<()> {
    let block = dct.quantize(samples, qt);
    codewords.clear();
    entropy::encode_block(&block, pred, tables, codewords);
    writer.put_all(codewords)?;
    Ok(())
}

fn encode_main<W: Write>(
    huffman: &HuffmanTables,
    raster: &RasterImage,
    quality: i32,
    mut out: W,
) -> Result<W> {
    let (w, h) = (raster.width(), raster.height());
    if raster.is_empty() {
        return Err(Error::EmptyImage {
            width: w,
            height: h,
        });
    }
    let (sof_width, sof_height) = match (u16::try_from(w), u16::try_from(h)) {
        (Ok(sw), Ok(sh)) => (sw, sh),
        _ => {
            return Err(Error::DimensionsTooLarge {
                width: w,
                height: h,
            })
        }
    };

    log::debug!(
        "encoding {}x{} at quality {} (requested {})",
        w,
        h,
        quant::clamp_quality(quality),
        quality
    );

    let qt = QuantTables::new(quality);
    marker::write_header(&mut out, &qt, sof_width, sof_height)?;

    let dct = ForwardDct::new();
    let mut writer = BitWriter::new(out);
    let mut codewords = Vec::with_capacity(128);
    let (mut pred_y, mut pred_cb, mut pred_cr) = (0i16, 0i16, 0i16);

    let data = raster.as_bytes();
    let stride = raster.stride();
    for y in (0..h as usize).step_by(8) {
        log::trace!("tile row {}", y / 8);
        for x in (0..w as usize).step_by(8) {
            let tile = color::convert_tile(data, y * stride + x * 3, stride);

            let channels = [
                (&tile.y, &qt.luma, huffman.luma(), &mut pred_y),
                (&tile.cb, &qt.chroma, huffman.chroma(), &mut pred_cb),
                (&tile.cr, &qt.chroma, huffman.chroma(), &mut pred_cr),
            ];
            for (samples, table, pair, pred) in channels {
                encode_channel(&dct, samples, table, pair, pred, &mut codewords, &mut writer)?;
            }
        }
    }

    let mut out = writer.finish()?;
    marker::write_eoi(&mut out)?;

    log::debug!("encoded {} tiles", (w as usize / 8) * (h as usize / 8));
    Ok(out)
}

/// An encoder session: standard Huffman tables plus the raster to encode.
///
/// The tables are built once in [`JpegEncoder::new`] and reused by every
/// encode call.
#[derive(Clone, Debug, Default)]
pub struct JpegEncoder {
    huffman: HuffmanTables,
    raster: Option<RasterImage>,
}

impl JpegEncoder {
    pub fn new() -> Self {
        JpegEncoder {
            huffman: HuffmanTables::standard(),
            raster: None,
        }
    }

    /// Drops the loaded raster, if any.
    pub fn clear(&mut self) {
        self.raster = None;
    }

    pub fn set_raster(&mut self, raster: RasterImage) {
        self.raster = Some(raster);
    }

    pub fn raster(&self) -> Option<&RasterImage> {
        self.raster.as_ref()
    }

    /// Loads a 24-bit bitmap from disk, replacing the current raster.
    ///
    /// The previous raster is dropped even if loading fails.
    pub fn read_bmp<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.clear();
        self.raster = Some(bmp::read_bmp_file(path)?);
        Ok(())
    }

    /// Like [`JpegEncoder::read_bmp`], reading from any seekable source.
    pub fn read_bmp_from<R: Read + Seek>(&mut self, reader: R) -> Result<()> {
        self.clear();
        self.raster = Some(bmp::read_bmp(reader)?);
        Ok(())
    }

    fn loaded(&self) -> Result<&RasterImage> {
        self.raster.as_ref().ok_or(Error::NotLoaded)
    }

    /// Returns the JPEG encoding of the loaded raster.
    pub fn encode(&self, quality: i32) -> Result<Vec<u8>> {
        encode_main(&self.huffman, self.loaded()?, quality, Vec::new())
    }

    /// Streams the JPEG encoding of the loaded raster into `sink`.
    pub fn encode_to_writer<W: Write>(&self, quality: i32, sink: W) -> Result<W> {
        encode_main(&self.huffman, self.loaded()?, quality, sink)
    }

    /// Writes the JPEG encoding of the loaded raster to `dest`.
    ///
    /// Nothing is created on disk unless encoding succeeds.
    pub fn encode_to_file<P: AsRef<Path>>(&self, dest: P, quality: i32) -> Result<()> {
        let encoded_bytes = self.encode(quality)?;
        let mut f = File::create(dest)?;
        f.write_all(&encoded_bytes)?;
        Ok(())
    }
}

/// Returns a JPEG-encoded buffer for `raster`.
///
/// `quality` scales the quantization steps and is clamped to 1..=99.
/// Larger values quantize more coarsely and give smaller output.
pub fn encode(raster: &RasterImage, quality: i32) -> Result<Vec<u8>> {
    encode_to_writer(raster, quality, Vec::new())
}

/// Streams the JPEG encoding of `raster` into `sink` and hands it back.
pub fn encode_to_writer<W: Write>(raster: &RasterImage, quality: i32, sink: W) -> Result<W> {
    encode_main(&HuffmanTables::standard(), raster, quality, sink)
}

/// Takes a raster and writes a JPEG-encoded image to disk.
pub fn encode_to_file<P: AsRef<Path>>(dest: P, raster: &RasterImage, quality: i32) -> Result<()> {
    let encoded_bytes = encode(raster, quality)?;
    let mut f = File::create(dest)?;
    f.write_all(&encoded_bytes)?;
    Ok(())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Small block-aligned rasters with random pixels.
    fn raster_strategy() -> impl Strategy<Value = RasterImage> {
        (1u32..=3, 1u32..=3).prop_flat_map(|(bw, bh)| {
            let (w, h) = (bw * 8, bh * 8);
            let size = (w * h * 3) as usize;
            prop::collection::vec(any::<u8>(), size..=size)
                .prop_map(move |px| RasterImage::new(w, h, px).unwrap())
        })
    }

    proptest! {
        #[test]
        fn prop_output_is_framed(raster in raster_strategy(), quality in -20i32..=120) {
            let jpeg = encode(&raster, quality).unwrap();
            prop_assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
            prop_assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
            prop_assert!(jpeg.len() > 607 + 2);
        }

        #[test]
        fn prop_deterministic(raster in raster_strategy(), quality in 1i32..=99) {
            prop_assert_eq!(encode(&raster, quality).unwrap(), encode(&raster, quality).unwrap());
        }

        #[test]
        fn prop_clamping_is_idempotent(raster in raster_strategy(), low in i32::MIN..=0, high in 100i32..) {
            prop_assert_eq!(encode(&raster, low).unwrap(), encode(&raster, 1).unwrap());
            prop_assert_eq!(encode(&raster, high).unwrap(), encode(&raster, 99).unwrap());
        }

        #[test]
        fn prop_scan_is_stuffed(raster in raster_strategy(), quality in 1i32..=99) {
            let jpeg = encode(&raster, quality).unwrap();
            let scan = &jpeg[607..jpeg.len() - 2];
            for w in scan.windows(2) {
                if w[0] == 0xFF {
                    prop_assert_eq!(w[1], 0x00);
                }
            }
        }
    }
}
