use core::convert::TryFrom;

use crate::error::EncodeError;

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl QrCodeEcc {
    /// All levels, from least to most redundancy.
    pub const ALL: [QrCodeEcc; 4] = [
        QrCodeEcc::Low,
        QrCodeEcc::Medium,
        QrCodeEcc::Quartile,
        QrCodeEcc::High,
    ];

    /// Returns an unsigned 2-bit integer (in the range 0 to 3).
    pub(crate) fn ordinal(self) -> usize {
        use QrCodeEcc::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// Returns the 2-bit code stored in the format information.
    pub(crate) fn format_bits(self) -> u8 {
        use QrCodeEcc::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }

    pub(crate) fn from_format_bits(bits: u8) -> Self {
        use QrCodeEcc::*;
        [Medium, Low, High, Quartile][usize::from(bits & 3)]
    }
}

impl TryFrom<u8> for QrCodeEcc {
    type Error = EncodeError;

    /// Converts an ordinal (0 = Low ... 3 = High).
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        QrCodeEcc::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(EncodeError::InvalidEcc(value))
    }
}

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// A lower ceiling for hosts that can only spare
    /// `COMPACT_MAX.buffer_len()` bytes per buffer.
    pub const COMPACT_MAX: Version = Version(27);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40]. Use `Version::try_from`
    /// for unchecked input.
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the side length in modules, `version * 4 + 17`.
    pub const fn size(self) -> u8 {
        self.0 * 4 + 17
    }

    /// Rows are addressed as if they were this many modules wide.
    pub(crate) const fn padded_size(self) -> usize {
        padded_width(self.size())
    }

    /// Returns the minimum length required for the output and temporary
    /// buffers when creating a QR Code of this version number.
    ///
    /// One header byte holding the side length, then one bit per module with
    /// every row padded up to a multiple of 8 modules.
    pub const fn buffer_len(self) -> usize {
        self.padded_size() * (self.size() as usize) / 8 + 1
    }

    /// The version following this one, if any.
    pub(crate) fn next(self) -> Option<Version> {
        (self < Version::MAX).then(|| Version(self.0 + 1))
    }
}

pub(crate) const fn padded_width(size: u8) -> usize {
    ((size as usize) + 7) & !7
}

impl TryFrom<u8> for Version {
    type Error = EncodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Version::MIN.value()..=Version::MAX.value()).contains(&value) {
            Ok(Version(value))
        } else {
            Err(EncodeError::InvalidVersion(value))
        }
    }
}

impl From<Version> for u8 {
    fn from(version: Version) -> u8 {
        version.value()
    }
}
