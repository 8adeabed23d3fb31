//! Byte-mode bit stream construction: header, payload, terminator and padding.

use core::convert::TryFrom;

use log::debug;

use crate::encoder::EncodeOptions;
use crate::error::{EncodeError, Result};
use crate::tables::num_data_codewords;
use crate::types::{QrCodeEcc, Version};

/// Mode indicator for 8-bit byte mode.
const BYTE_MODE_BITS: u32 = 0x4;

/// Filler codewords appended alternately once the terminator is written.
const PAD_BYTES: [u32; 2] = [0xec, 0x11];

/// Appends bits MSB-first into a caller-provided byte buffer.
pub struct BitBuffer<'a> {
    data: &'a mut [u8],
    length: usize,
}

impl<'a> BitBuffer<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            data: buffer,
            length: 0,
        }
    }

    /// Number of bits appended so far.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Appends the `len` low-order bits of `val`, most significant first.
    ///
    /// # Panics
    ///
    /// Panics if `len > 31`, if `val` has bits set above `len`, or if the buffer is full.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0, "Value out of range");
        for i in (0..len).rev() {
            let index: usize = self.length >> 3;
            let shift: u8 = 7 - ((self.length as u8) & 7);
            let bit: u8 = ((val >> i) as u8) & 1;
            // The first bit of each byte overwrites, so the buffer needs no clearing.
            if shift == 7 {
                self.data[index] = bit << shift;
            } else {
                self.data[index] |= bit << shift;
            }
            self.length += 1;
        }
    }
}

/// Width of the byte-mode character count field.
pub fn num_char_count_bits(ver: Version) -> u8 {
    if ver.value() < 10 {
        8
    } else {
        16
    }
}

/// Bits needed for a byte-mode segment of `datalen` bytes at `version`, or `None` if
/// `datalen` does not fit the character count field.
pub fn total_bits(datalen: usize, ver: Version) -> Option<usize> {
    let ccbits = num_char_count_bits(ver);
    if datalen >= 1usize << ccbits {
        return None;
    }
    datalen.checked_mul(8)?.checked_add(4 + usize::from(ccbits))
}

/// Outcome of the bit stream stage: the first `len` bytes of the output buffer hold
/// the data codewords for `version` at level `ecl`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataCodewords {
    pub len: usize,
    pub ecl: QrCodeEcc,
    pub version: Version,
}

/// Picks the smallest version in the configured range that fits `data`, boosts the
/// error correction level if allowed, and writes the padded data codewords into
/// `outbuffer`.
///
/// On a capacity failure `outbuffer[0]` is set to 0, which is never a valid side length.
/// A length that no allowed count field can hold is rejected without touching `outbuffer`.
pub(crate) fn encode_data_codewords(
    data: &[u8],
    outbuffer: &mut [u8],
    options: &EncodeOptions,
) -> Result<DataCodewords> {
    let mut ecl = options.ecl;

    // Find the minimal version number to use
    let mut version: Version = options.min_version;
    let datausedbits: usize = loop {
        let datacapacitybits: usize = num_data_codewords(version, ecl) * 8;
        let dataused: Option<usize> = total_bits(data.len(), version);
        match dataused {
            Some(n) if n <= datacapacitybits => break n,
            _ if version >= options.max_version => {
                let err = match dataused {
                    // A length the count field cannot express is a bad parameter: leave the buffer alone
                    None => EncodeError::SegmentTooLong {
                        len: data.len(),
                        count_bits: num_char_count_bits(version),
                    },
                    Some(n) => {
                        outbuffer[0] = 0;
                        EncodeError::CapacityOverflow {
                            used_bits: n,
                            capacity_bits: datacapacitybits,
                        }
                    }
                };
                debug!("no version up to {} fits: {}", version.value(), err);
                return Err(err);
            }
            _ => match version.next() {
                Some(next) => version = next,
                None => unreachable!("max_version is at most Version::MAX"),
            },
        }
    };
    debug!(
        "selected version {} at {:?}: {} data bits",
        version.value(),
        ecl,
        datausedbits
    );

    // Increase the error correction level while the data still fits
    if options.boost_ecl {
        for &newecl in &[QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
            if newecl > ecl && datausedbits <= num_data_codewords(version, newecl) * 8 {
                ecl = newecl;
            }
        }
        if ecl != options.ecl {
            debug!("boosted error correction from {:?} to {:?}", options.ecl, ecl);
        }
    }

    let datacapacitybits: usize = num_data_codewords(version, ecl) * 8;
    let mut bb = BitBuffer::new(&mut outbuffer[..datacapacitybits / 8]);
    bb.append_bits(BYTE_MODE_BITS, 4);
    // total_bits() already rejected lengths wider than the count field
    let numchars = u32::try_from(data.len()).unwrap_or(u32::MAX);
    bb.append_bits(numchars, num_char_count_bits(version));
    for &b in data {
        bb.append_bits(u32::from(b), 8);
    }
    debug_assert_eq!(bb.len(), datausedbits);

    // Add terminator and pad up to a byte if applicable
    let numzerobits: usize = core::cmp::min(4, datacapacitybits - bb.len());
    bb.append_bits(0, numzerobits as u8);
    let numzerobits: usize = bb.len().wrapping_neg() & 7;
    bb.append_bits(0, numzerobits as u8);
    debug_assert_eq!(bb.len() % 8, 0);

    // Pad with alternating bytes until data capacity is reached
    for &padbyte in PAD_BYTES.iter().cycle() {
        if bb.len() >= datacapacitybits {
            break;
        }
        bb.append_bits(padbyte, 8);
    }
    Ok(DataCodewords {
        len: bb.len() / 8,
        ecl,
        version,
    })
}
