//! Drawing of function patterns: timing, finders, alignment, version and format information.

use crate::mask::Mask;
use crate::matrix::{get_bit, QrCode};
use crate::tables::alignment_pattern_positions;
use crate::types::{QrCodeEcc, Version};

/// BCH generator for the 10-bit format remainder.
const FORMAT_GENERATOR: u32 = 0x537;
/// XORed onto the format bits so they are never all zero.
const FORMAT_MASK: u32 = 0x5412;
/// BCH generator for the 12-bit version remainder.
const VERSION_GENERATOR: u32 = 0x1f25;

/// The 15 format bits for a level and mask, BCH remainder and mask pattern included.
pub fn format_bits(ecl: QrCodeEcc, mask: Mask) -> u32 {
    let data = u32::from((ecl.format_bits() << 3) | mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * FORMAT_GENERATOR);
    }
    ((data << 10) | rem) ^ FORMAT_MASK
}

/// The 18 version bits (6 data bits and a 12-bit BCH remainder). Only drawn for version 7 and up.
pub fn version_bits(ver: Version) -> u32 {
    let v = u32::from(ver.value());
    let mut rem: u32 = v;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * VERSION_GENERATOR);
    }
    (v << 12) | rem
}

/// Whether alignment pattern (i, j) of an n-by-n grid sits on a finder corner.
fn overlaps_finder(i: usize, j: usize, n: usize) -> bool {
    (i == 0 && j == 0) || (i == 0 && j == n - 1) || (i == n - 1 && j == 0)
}

impl<'a> QrCode<'a> {
    /// Clears `outbuffer` to a light grid of the given version, then marks every
    /// function module dark.
    pub(crate) fn function_modules_marked(outbuffer: &'a mut [u8], ver: Version) -> Self {
        let mut result = QrCode::blank(outbuffer, ver);
        let size: u8 = ver.size();

        // Timing patterns
        result.fill_rectangle(6, 0, 1, size);
        result.fill_rectangle(0, 6, size, 1);

        // Three finder patterns with their separators and format bits. The two
        // off-corner boxes are one module narrower to leave the timing row alone.
        result.fill_rectangle(0, 0, 9, 9);
        result.fill_rectangle(size - 8, 0, 8, 9);
        result.fill_rectangle(0, size - 8, 9, 8);

        let mut alignpatposbuf = [0u8; 7];
        let alignpatpos: &[u8] = alignment_pattern_positions(ver, &mut alignpatposbuf);
        let n = alignpatpos.len();
        for (i, &pos0) in alignpatpos.iter().enumerate() {
            for (j, &pos1) in alignpatpos.iter().enumerate() {
                if !overlaps_finder(i, j, n) {
                    result.fill_rectangle(pos0 - 2, pos1 - 2, 5, 5);
                }
            }
        }

        if ver.value() >= 7 {
            result.fill_rectangle(size - 11, 0, 3, 6);
            result.fill_rectangle(0, size - 11, 6, 3);
        }
        result
    }

    /// Draws the light parts of the function patterns and the version information.
    ///
    /// Only correct on a grid freshly marked by `function_modules_marked`, because
    /// modules that stay dark are not redrawn. Format bits are left to `draw_format_bits`.
    pub(crate) fn draw_light_function_modules(&mut self) {
        let size: u8 = self.version().size();
        for i in (7..size - 7).step_by(2) {
            self.set_module_bounded(6, i, false);
            self.set_module_bounded(i, 6, false);
        }

        // Finder rings sit at Chebyshev distance 2 and 4 from each centre
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let dist: i32 = dx.abs().max(dy.abs());
                if dist == 2 || dist == 4 {
                    self.set_module_unbounded(3 + dx, 3 + dy, false);
                    self.set_module_unbounded(i32::from(size) - 4 + dx, 3 + dy, false);
                    self.set_module_unbounded(3 + dx, i32::from(size) - 4 + dy, false);
                }
            }
        }

        let ver = self.version();
        let mut alignpatposbuf = [0u8; 7];
        let alignpatpos: &[u8] = alignment_pattern_positions(ver, &mut alignpatposbuf);
        let n = alignpatpos.len();
        for (i, &pos0) in alignpatpos.iter().enumerate() {
            for (j, &pos1) in alignpatpos.iter().enumerate() {
                if overlaps_finder(i, j, n) {
                    continue;
                }
                for dy in 0..3u8 {
                    for dx in 0..3u8 {
                        self.set_module_bounded(pos0 - 1 + dx, pos1 - 1 + dy, dx == 1 && dy == 1);
                    }
                }
            }
        }

        if ver.value() >= 7 {
            let bits: u32 = version_bits(ver);
            for i in 0u8..18 {
                let bit: bool = get_bit(bits, i);
                let a: u8 = size - 11 + (i % 3);
                let b: u8 = i / 3;
                self.set_module_bounded(a, b, bit);
                self.set_module_bounded(b, a, bit);
            }
        }
    }

    /// Draws both copies of the format bits and the always-dark module.
    pub(crate) fn draw_format_bits(&mut self, ecl: QrCodeEcc, mask: Mask) {
        let bits: u32 = format_bits(ecl, mask);

        // First copy, around the top left finder
        for i in 0..6 {
            self.set_module_bounded(8, i, get_bit(bits, i));
        }
        self.set_module_bounded(8, 7, get_bit(bits, 6));
        self.set_module_bounded(8, 8, get_bit(bits, 7));
        self.set_module_bounded(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_module_bounded(14 - i, 8, get_bit(bits, i));
        }

        // Second copy, split between the other two finders
        let size: u8 = self.version().size();
        for i in 0..8 {
            self.set_module_bounded(size - 1 - i, 8, get_bit(bits, i));
        }
        for i in 8..15 {
            self.set_module_bounded(8, size - 15 + i, get_bit(bits, i));
        }
        self.set_module_bounded(8, size - 8, true);
    }
}
