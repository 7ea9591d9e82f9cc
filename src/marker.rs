//! JFIF container framing: SOI, APP0, DQT, SOF0, DHT, SOS and EOI.

use std::io::{self, Write};

use byteorder::{BigEndian, WriteBytesExt};

use crate::quant::QuantTables;
use crate::tables::{
    HT_CHROMA_AC, HT_CHROMA_AC_LEN, HT_CHROMA_DC, HT_CHROMA_DC_LEN, HT_LUMA_AC, HT_LUMA_AC_LEN,
    HT_LUMA_DC, HT_LUMA_DC_LEN,
};

pub const SOI: u16 = 0xFFD8;
pub const APP0: u16 = 0xFFE0;
pub const DQT: u16 = 0xFFDB;
pub const SOF0: u16 = 0xFFC0;
pub const DHT: u16 = 0xFFC4;
pub const SOS: u16 = 0xFFDA;
pub const EOI: u16 = 0xFFD9;

/// Component ids 1, 2, 3 with their quantization table (SOF0) and
/// DC/AC table selectors (SOS).
const COMPONENTS: [(u8, u8, u8); 3] = [(1, 0, 0x00), (2, 1, 0x11), (3, 1, 0x11)];

fn append_app0<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_u16::<BigEndian>(APP0)?;
    // 2(len) + 5(id) + 2(version) + 1(units) + 4(density) + 2(thumb)
    out.write_u16::<BigEndian>(16)?;
    out.write_all(b"JFIF\0")?;
    // Version 1.1
    out.write_u8(1)?;
    out.write_u8(1)?;
    // No units, 1:1 aspect
    out.write_u8(0)?;
    out.write_u16::<BigEndian>(1)?;
    out.write_u16::<BigEndian>(1)?;
    // No thumbnail
    out.write_u8(0)?;
    out.write_u8(0)
}

fn append_dqt<W: Write>(out: &mut W, qt: &QuantTables) -> io::Result<()> {
    out.write_u16::<BigEndian>(DQT)?;
    // 2(len) + 2 * (1(id) + 64(matrix)) = 132
    out.write_u16::<BigEndian>(132)?;
    out.write_u8(0)?;
    out.write_all(&qt.luma)?;
    out.write_u8(1)?;
    out.write_all(&qt.chroma)
}

fn append_sof0<W: Write>(out: &mut W, width: u16, height: u16) -> io::Result<()> {
    out.write_u16::<BigEndian>(SOF0)?;
    // 8 + 3 * 3 = 17
    out.write_u16::<BigEndian>(17)?;
    // Precision
    out.write_u8(8)?;
    out.write_u16::<BigEndian>(height)?;
    out.write_u16::<BigEndian>(width)?;
    out.write_u8(COMPONENTS.len() as u8)?;
    for &(id, qt_id, _) in COMPONENTS.iter() {
        out.write_u8(id)?;
        // 1x1 sampling
        out.write_u8(0x11)?;
        out.write_u8(qt_id)?;
    }
    Ok(())
}

fn append_huffman_spec<W: Write>(out: &mut W, tc_th: u8, counts: &[u8; 16], values: &[u8]) -> io::Result<()> {
    out.write_u8(tc_th)?;
    out.write_all(counts)?;
    out.write_all(values)
}

fn append_dht<W: Write>(out: &mut W) -> io::Result<()> {
    let specs: [(u8, &[u8; 16], &[u8]); 4] = [
        (0x00, &HT_LUMA_DC_LEN, &HT_LUMA_DC),
        (0x10, &HT_LUMA_AC_LEN, &HT_LUMA_AC),
        (0x01, &HT_CHROMA_DC_LEN, &HT_CHROMA_DC),
        (0x11, &HT_CHROMA_AC_LEN, &HT_CHROMA_AC),
    ];

    // 2(len) + per table: 1(tc_th) + 16(counts) + values
    let len = 2 + specs.iter().map(|(_, _, v)| 17 + v.len()).sum::<usize>();
    debug_assert_eq!(len, 0x01A2);

    out.write_u16::<BigEndian>(DHT)?;
    out.write_u16::<BigEndian>(len as u16)?;
    for (tc_th, counts, values) in specs.iter() {
        append_huffman_spec(out, *tc_th, counts, values)?;
    }
    Ok(())
}

fn append_sos<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_u16::<BigEndian>(SOS)?;
    // 6 + 2 * 3 = 12
    out.write_u16::<BigEndian>(12)?;
    out.write_u8(COMPONENTS.len() as u8)?;
    for &(id, _, tables) in COMPONENTS.iter() {
        out.write_u8(id)?;
        out.write_u8(tables)?;
    }
    // Spectral selection 0..63, no successive approximation
    out.write_u8(0)?;
    out.write_u8(0x3F)?;
    out.write_u8(0)
}

/// Writes everything from SOI through the SOS header.
pub fn write_header<W: Write>(out: &mut W, qt: &QuantTables, width: u16, height: u16) -> io::Result<()> {
    out.write_u16::<BigEndian>(SOI)?;
    append_app0(out)?;
    append_dqt(out, qt)?;
    append_sof0(out, width, height)?;
    append_dht(out)?;
    append_sos(out)
}

pub fn write_eoi<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_u16::<BigEndian>(EOI)
}
