//! The module grid, packed one bit per module into a caller-owned buffer.

use core::convert::TryFrom;

use crate::mask::Mask;
use crate::types::{padded_width, QrCodeEcc, Version};

/// A QR Code symbol, representing a square grid of dark and light modules.
///
/// The symbol is a view over a byte buffer laid out as:
///
/// - byte 0: the side length in modules (`version * 4 + 17`),
/// - then one bit per module, row-major, every row padded up to a multiple of
///   8 modules. Module (x, y) is bit `index % 8` (LSB first) of byte
///   `1 + index / 8`, where `index = y * padded_width + x`.
///
/// Instances are produced by the encode functions and are immutable to callers.
///
/// # Example
///
/// ```rust
/// use qrforge::{EncodeOptions, QrCode, QrCodeEcc, Version};
///
/// let mut outbuffer = vec![0u8; Version::MAX.buffer_len()];
/// let mut tempbuffer = vec![0u8; Version::MAX.buffer_len()];
///
/// let qr = QrCode::encode_binary(
///     b"Hello, World!",
///     &mut tempbuffer,
///     &mut outbuffer,
///     &EncodeOptions::new().ecl(QrCodeEcc::Low),
/// ).unwrap();
///
/// assert_eq!(qr.size(), 21);
/// assert!(qr.get_module(0, 0)); // finder corner
/// assert!(!qr.get_module(-1, 0));
/// ```
pub struct QrCode<'a> {
    buf: &'a mut [u8],
}

impl<'a> QrCode<'a> {
    /// Takes over `buffer`, sizes it for `ver` and clears every module to light.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is shorter than `ver.buffer_len()`.
    pub(crate) fn blank(buffer: &'a mut [u8], ver: Version) -> Self {
        let buf = &mut buffer[..ver.buffer_len()];
        buf.fill(0);
        buf[0] = ver.size();
        Self { buf }
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        Version::new((self.buf[0] - 17) / 4)
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        i32::from(self.buf[0])
    }

    /// Returns this QR Code's error correction level, read back from the format bits.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        // Top two of the five data bits, stored at (0, 8) and (1, 8), masked with 0b10
        let bits = (u8::from(self.get_module_bounded(0, 8)) << 1)
            | u8::from(self.get_module_bounded(1, 8));
        QrCodeEcc::from_format_bits(bits ^ 0b10)
    }

    /// Returns this QR Code's mask, read back from the format bits.
    pub fn mask(&self) -> Mask {
        // Stored at (2, 8), (3, 8), (4, 8) and masked with 0b101
        let bits = (u8::from(self.get_module_bounded(2, 8)) << 2)
            | (u8::from(self.get_module_bounded(3, 8)) << 1)
            | u8::from(self.get_module_bounded(4, 8));
        match Mask::try_from(bits ^ 0b101) {
            Ok(mask) => mask,
            Err(_) => unreachable!("three bits always form a valid mask"),
        }
    }

    /// Returns the color of the module at the given coordinates.
    ///
    /// Returns `true` for dark modules and `false` for light modules. Coordinates outside
    /// the QR code's bounds return `false`.
    ///
    /// # Arguments
    ///
    /// * `x` - X-coordinate (0 is left).
    /// * `y` - Y-coordinate (0 is top).
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size();
        range.contains(&x) && range.contains(&y) && self.get_module_bounded(x as u8, y as u8)
    }

    /// The packed buffer, header byte included.
    pub fn as_bytes(&self) -> &[u8] {
        self.buf
    }

    /// Number of dark modules.
    pub(crate) fn dark_count(&self) -> u32 {
        // Padding columns are never set, so every set bit is a real module
        self.buf[1..].iter().map(|b| b.count_ones()).sum()
    }

    fn bit_position(&self, x: u8, y: u8) -> (usize, u8) {
        let size = self.buf[0];
        let range = 0..size;
        assert!(range.contains(&x) && range.contains(&y), "Module out of bounds");
        let index = usize::from(y) * padded_width(size) + usize::from(x);
        ((index >> 3) + 1, (index & 7) as u8)
    }

    pub(crate) fn get_module_bounded(&self, x: u8, y: u8) -> bool {
        let (byteindex, bitindex) = self.bit_position(x, y);
        get_bit(self.buf[byteindex].into(), bitindex)
    }

    pub(crate) fn set_module_bounded(&mut self, x: u8, y: u8, isdark: bool) {
        let (byteindex, bitindex) = self.bit_position(x, y);
        if isdark {
            self.buf[byteindex] |= 1u8 << bitindex;
        } else {
            self.buf[byteindex] &= !(1u8 << bitindex);
        }
    }

    /// Like `set_module_bounded`, but silently ignores coordinates off the grid.
    pub(crate) fn set_module_unbounded(&mut self, x: i32, y: i32, isdark: bool) {
        let range = 0..self.size();
        if range.contains(&x) && range.contains(&y) {
            self.set_module_bounded(x as u8, y as u8, isdark);
        }
    }

    /// Sets every module of the rectangle dark.
    pub(crate) fn fill_rectangle(&mut self, left: u8, top: u8, width: u8, height: u8) {
        for dy in 0..height {
            for dx in 0..width {
                self.set_module_bounded(left + dx, top + dy, true);
            }
        }
    }
}

impl PartialEq for QrCode<'_> {
    fn eq(&self, other: &QrCode<'_>) -> bool {
        *self.buf == *other.buf
    }
}

impl Eq for QrCode<'_> {}

impl core::fmt::Debug for QrCode<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QrCode")
            .field("size", &self.size())
            .field("dark_modules", &self.dark_count())
            .finish()
    }
}

pub(crate) fn get_bit(x: u32, i: u8) -> bool {
    ((x >> i) & 1) != 0
}
