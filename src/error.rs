use thiserror::Error;

/// Everything that can stop an encode.
///
/// [`EncodeError::CapacityOverflow`] means the payload is valid but too big for the
/// allowed versions. Every other variant is a bad parameter and is reported before
/// any buffer is touched (see [`EncodeError::is_invalid_parameter`]).
///
/// Ways to handle a capacity overflow:
///
/// - Decrease the error correction level if it was greater than `QrCodeEcc::Low`.
/// - Increase the maximum version if it was less than `Version::MAX`.
/// - Make the payload shorter.
/// - Propagate the error upward to the caller/user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("data length = {used_bits} bits, max capacity = {capacity_bits} bits")]
    CapacityOverflow { used_bits: usize, capacity_bits: usize },
    #[error("payload of {len} bytes does not fit a {count_bits}-bit character count field")]
    SegmentTooLong { len: usize, count_bits: u8 },
    #[error("mask value {0} out of range")]
    InvalidMask(u8),
    #[error("version number {0} out of range")]
    InvalidVersion(u8),
    #[error("error correction level {0} out of range")]
    InvalidEcc(u8),
    #[error("minimum version {min} is greater than maximum version {max}")]
    InvalidVersionRange { min: u8, max: u8 },
    #[error("buffer of {actual} bytes is too small, {needed} bytes required")]
    BufferTooSmall { needed: usize, actual: usize },
}

impl EncodeError {
    /// Returns `true` for every error that is caused by the arguments rather than by
    /// the payload outgrowing the largest allowed version.
    pub fn is_invalid_parameter(&self) -> bool {
        !matches!(self, Self::CapacityOverflow { .. })
    }
}

pub type Result<T> = core::result::Result<T, EncodeError>;
