//! CRC-8 checksum used in the mayako packet header.
//!
//! Parameters (CRC-8/BLUETOOTH):
//!
//! ```text
//! width=8  poly=0xA7  init=0x00  refin=true  refout=true  xorout=0x00
//! check("123456789") = 0x26
//! ```
//!
//! With reflected input and output the register shifts right and uses the
//! bit-reversed polynomial `0xE5`.

/// Generator polynomial in normal (MSB-first) notation.
pub const CRC8_POLY: u8 = 0xA7;

/// Bit-reversed generator polynomial used by the reflected algorithm.
const CRC8_POLY_REFLECTED: u8 = CRC8_POLY.reverse_bits();

static CRC8_TABLE: [u8; 256] = build_table();

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        #[allow(clippy::cast_possible_truncation)]
        let mut crc = i as u8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x01 != 0 {
                (crc >> 1) ^ CRC8_POLY_REFLECTED
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Calculate the CRC-8 checksum of `data`.
///
/// Any input is valid, the empty slice yields `0x00`.
pub fn crc8(data: &[u8]) -> u8 {
    data.iter()
        .fold(0x00, |crc, &byte| CRC8_TABLE[usize::from(crc ^ byte)])
}
