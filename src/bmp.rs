//! Reader for 24-bit uncompressed Windows bitmaps.
//!
//! Only the subset the encoder can take is accepted: `BITMAPINFOHEADER`
//! files with 24 bits per pixel, no compression, and both sides a multiple
//! of 8. With such widths every row is a multiple of four bytes long, so
//! rows carry no padding.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{BitmapError, Error, Result};
use crate::raster::RasterImage;

const BMP_MAGIC: u16 = 0x4D42;

struct FileHeader {
    magic: u16,
    pixel_offset: u32,
}

impl FileHeader {
    fn read<R: Read>(r: &mut R) -> Result<Self> {
        let magic = r.read_u16::<LittleEndian>()?;
        let _file_size = r.read_u32::<LittleEndian>()?;
        let _reserved1 = r.read_u16::<LittleEndian>()?;
        let _reserved2 = r.read_u16::<LittleEndian>()?;
        let pixel_offset = r.read_u32::<LittleEndian>()?;
        Ok(FileHeader {
            magic,
            pixel_offset,
        })
    }
}

struct InfoHeader {
    width: i32,
    height: i32,
    bit_count: u16,
    compression: u32,
}

impl InfoHeader {
    fn read<R: Read>(r: &mut R) -> Result<Self> {
        let _size = r.read_u32::<LittleEndian>()?;
        let width = r.read_i32::<LittleEndian>()?;
        let height = r.read_i32::<LittleEndian>()?;
        let _planes = r.read_u16::<LittleEndian>()?;
        let bit_count = r.read_u16::<LittleEndian>()?;
        let compression = r.read_u32::<LittleEndian>()?;
        let _image_size = r.read_u32::<LittleEndian>()?;
        let _x_pels_per_meter = r.read_i32::<LittleEndian>()?;
        let _y_pels_per_meter = r.read_i32::<LittleEndian>()?;
        let _colors_used = r.read_u32::<LittleEndian>()?;
        let _colors_important = r.read_u32::<LittleEndian>()?;
        Ok(InfoHeader {
            width,
            height,
            bit_count,
            compression,
        })
    }
}

/// Reads a bitmap and returns its pixels top row first.
pub fn read_bmp<R: Read + Seek>(mut reader: R) -> Result<RasterImage> {
    let file_header = FileHeader::read(&mut reader)?;
    if file_header.magic != BMP_MAGIC {
        return Err(BitmapError::BadMagic(file_header.magic).into());
    }

    let info = InfoHeader::read(&mut reader)?;
    if info.bit_count != 24 || info.compression != 0 {
        return Err(BitmapError::UnsupportedFormat {
            bit_count: info.bit_count,
            compression: info.compression,
        }
        .into());
    }

    let bottom_up = info.height > 0;
    let width = u32::try_from(info.width).map_err(|_| BitmapError::NegativeWidth(info.width))?;
    let height = info.height.unsigned_abs();
    if width % 8 != 0 || height % 8 != 0 {
        return Err(Error::InvalidDimensions { width, height });
    }

    log::debug!(
        "bitmap {}x{}, {}, pixel data at {}",
        width,
        height,
        if bottom_up { "bottom-up" } else { "top-down" },
        file_header.pixel_offset
    );

    let rows = height as usize;
    let (stride, size) = (width as usize)
        .checked_mul(3)
        .and_then(|stride| Some((stride, stride.checked_mul(rows)?)))
        .ok_or(Error::InvalidDimensions { width, height })?;

    // Refuse to allocate more than the stream can supply.
    let end = reader.seek(SeekFrom::End(0))?;
    let available = end.saturating_sub(file_header.pixel_offset as u64);
    if (size as u64) > available {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("bitmap needs {} bytes of pixel data, stream holds {}", size, available),
        )
        .into());
    }

    let mut bgr = vec![0u8; size];
    reader.seek(SeekFrom::Start(file_header.pixel_offset as u64))?;
    if bottom_up {
        for i in 0..rows {
            let start = (rows - 1 - i) * stride;
            reader.read_exact(&mut bgr[start..start + stride])?;
        }
    } else {
        reader.read_exact(&mut bgr)?;
    }

    RasterImage::new(width, height, bgr)
}

/// Opens `path` and reads it with [`read_bmp`].
pub fn read_bmp_file<P: AsRef<Path>>(path: P) -> Result<RasterImage> {
    let file = File::open(path)?;
    read_bmp(BufReader::new(file))
}
