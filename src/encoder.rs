//! Encode entry points and their configuration.

use log::debug;

use crate::bitstream::{encode_data_codewords, DataCodewords};
use crate::error::{EncodeError, Result};
use crate::gf256::{BitwiseMultiplier, FieldMultiplier};
use crate::interleave::add_ecc_and_interleave;
use crate::mask::MaskSelect;
use crate::matrix::QrCode;
use crate::types::{QrCodeEcc, Version};

/// Parameters of an encode.
///
/// ```rust
/// use qrforge::{EncodeOptions, Mask, QrCodeEcc, Version};
///
/// let options = EncodeOptions::new()
///     .ecl(QrCodeEcc::Medium)
///     .boost_ecl(false)
///     .mask(Mask::Pattern2)
///     .max_version(Version::COMPACT_MAX);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncodeOptions {
    /// Requested error correction level.
    pub ecl: QrCodeEcc,
    /// Raise `ecl` as far as the data still fits the chosen version.
    pub boost_ecl: bool,
    pub mask: MaskSelect,
    /// Smallest version the search starts at.
    pub min_version: Version,
    /// Largest version the search may pick. Buffers must hold `max_version.buffer_len()` bytes.
    pub max_version: Version,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            ecl: QrCodeEcc::Low,
            boost_ecl: true,
            mask: MaskSelect::Auto,
            min_version: Version::MIN,
            max_version: Version::MAX,
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ecl(mut self, ecl: QrCodeEcc) -> Self {
        self.ecl = ecl;
        self
    }

    pub fn boost_ecl(mut self, boost: bool) -> Self {
        self.boost_ecl = boost;
        self
    }

    /// Accepts a [`Mask`](crate::Mask), `Option<Mask>` (`None` = auto) or a [`MaskSelect`].
    pub fn mask(mut self, mask: impl Into<MaskSelect>) -> Self {
        self.mask = mask.into();
        self
    }

    pub fn min_version(mut self, version: Version) -> Self {
        self.min_version = version;
        self
    }

    pub fn max_version(mut self, version: Version) -> Self {
        self.max_version = version;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_version > self.max_version {
            return Err(EncodeError::InvalidVersionRange {
                min: self.min_version.value(),
                max: self.max_version.value(),
            });
        }
        Ok(())
    }

    /// Checks that both buffers can hold a symbol of `max_version`.
    fn check_buffers(&self, tempbuffer: &[u8], outbuffer: &[u8]) -> Result<()> {
        let needed = self.max_version.buffer_len();
        let actual = tempbuffer.len().min(outbuffer.len());
        if actual < needed {
            return Err(EncodeError::BufferTooSmall { needed, actual });
        }
        Ok(())
    }
}

impl<'a> QrCode<'a> {
    /// Encodes a text string into a QR code, as the bytes of its UTF-8 encoding.
    ///
    /// See [`QrCode::encode_binary`].
    pub fn encode_text<'b>(
        text: &str,
        tempbuffer: &'b mut [u8],
        outbuffer: &'a mut [u8],
        options: &EncodeOptions,
    ) -> Result<QrCode<'a>> {
        QrCode::encode_binary(text.as_bytes(), tempbuffer, outbuffer, options)
    }

    /// Encodes binary data into a QR code in byte mode.
    ///
    /// The smallest version in `options.min_version..=options.max_version` that holds the
    /// data is chosen. Both buffers must be at least `options.max_version.buffer_len()`
    /// bytes; the symbol is returned as a view into `outbuffer`.
    ///
    /// # Errors
    ///
    /// Bad options, short buffers and payloads too long for every allowed character count
    /// field ([`EncodeError::SegmentTooLong`]) are rejected before either buffer is written.
    /// If the data does not fit, `outbuffer[0]` is set to 0 and
    /// [`EncodeError::CapacityOverflow`] is returned.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qrforge::{EncodeOptions, QrCode, QrCodeEcc, Version};
    ///
    /// let mut outbuffer = vec![0u8; Version::MAX.buffer_len()];
    /// let mut tempbuffer = vec![0u8; Version::MAX.buffer_len()];
    ///
    /// let options = EncodeOptions::new().ecl(QrCodeEcc::Low).boost_ecl(false);
    /// let qr = QrCode::encode_binary(b"HELLO", &mut tempbuffer, &mut outbuffer, &options).unwrap();
    ///
    /// assert_eq!(qr.version(), Version::MIN);
    /// assert_eq!(qr.error_correction_level(), QrCodeEcc::Low);
    /// ```
    pub fn encode_binary<'b>(
        data: &[u8],
        tempbuffer: &'b mut [u8],
        outbuffer: &'a mut [u8],
        options: &EncodeOptions,
    ) -> Result<QrCode<'a>> {
        QrCode::encode_binary_with(&BitwiseMultiplier, data, tempbuffer, outbuffer, options)
    }

    /// Like [`QrCode::encode_binary`], with Reed–Solomon arithmetic done by `field`.
    pub fn encode_binary_with<'b, F: FieldMultiplier>(
        field: &F,
        data: &[u8],
        tempbuffer: &'b mut [u8],
        outbuffer: &'a mut [u8],
        options: &EncodeOptions,
    ) -> Result<QrCode<'a>> {
        options.validate()?;
        options.check_buffers(tempbuffer, outbuffer)?;
        let encoded = encode_data_codewords(data, outbuffer, options)?;
        Ok(QrCode::encode_codewords(field, outbuffer, encoded, tempbuffer, options.mask))
    }

    /// Builds the data codewords for `data` into `outbuffer` without drawing anything.
    ///
    /// This is the first half of [`QrCode::encode_binary`]; pass the result on to
    /// [`QrCode::encode_codewords`].
    pub fn encode_to_codewords(
        data: &[u8],
        outbuffer: &mut [u8],
        options: &EncodeOptions,
    ) -> Result<DataCodewords> {
        options.validate()?;
        let needed = options.max_version.buffer_len();
        if outbuffer.len() < needed {
            return Err(EncodeError::BufferTooSmall {
                needed,
                actual: outbuffer.len(),
            });
        }
        encode_data_codewords(data, outbuffer, options)
    }

    /// Creates a QR Code from data codewords already sitting at the start of
    /// `datacodewordsandoutbuffer`: adds error correction, draws all modules, and masks.
    ///
    /// This is a low-level API that most users should not use directly.
    ///
    /// # Panics
    ///
    /// Panics if either buffer is shorter than `encoded.version.buffer_len()` or if
    /// `encoded` does not describe the buffer contents.
    pub fn encode_codewords<'b, F: FieldMultiplier>(
        field: &F,
        mut datacodewordsandoutbuffer: &'a mut [u8],
        encoded: DataCodewords,
        mut tempbuffer: &'b mut [u8],
        mask: MaskSelect,
    ) -> QrCode<'a> {
        let DataCodewords { len, ecl, version } = encoded;
        datacodewordsandoutbuffer = &mut datacodewordsandoutbuffer[..version.buffer_len()];
        tempbuffer = &mut tempbuffer[..version.buffer_len()];

        // Compute ECC
        let (data, temp) = datacodewordsandoutbuffer.split_at_mut(len);
        let allcodewords = add_ecc_and_interleave(field, data, version, ecl, temp, tempbuffer);

        // Draw modules
        let mut result: QrCode = QrCode::function_modules_marked(datacodewordsandoutbuffer, version);
        result.draw_codewords(allcodewords);
        result.draw_light_function_modules();
        let funcmods: QrCode = QrCode::function_modules_marked(tempbuffer, version);

        // Do masking
        result.apply_best_mask(&funcmods, ecl, mask);
        debug!(
            "encoded version {} at {:?} with mask {}",
            version.value(),
            ecl,
            result.mask().value()
        );
        result
    }
}

/// Owns one pair of scratch buffers sized for a maximum version, so repeated encodes
/// never allocate.
///
/// Each context is used by one encode at a time; give concurrent encoders a context each.
///
/// ```rust
/// use qrforge::{EncodeContext, EncodeOptions, Version};
///
/// let mut ctx = EncodeContext::new(EncodeOptions::new().max_version(Version::COMPACT_MAX)).unwrap();
/// let size = ctx.encode(b"https://example.com").unwrap().size();
/// assert_eq!(size, 25);
/// ```
pub struct EncodeContext<F = BitwiseMultiplier> {
    field: F,
    options: EncodeOptions,
    outbuffer: Box<[u8]>,
    tempbuffer: Box<[u8]>,
}

impl EncodeContext<BitwiseMultiplier> {
    /// Allocates buffers for `options.max_version`.
    pub fn new(options: EncodeOptions) -> Result<Self> {
        Self::with_field(BitwiseMultiplier, options)
    }
}

impl<F: FieldMultiplier> EncodeContext<F> {
    /// Like [`EncodeContext::new`], with Reed–Solomon arithmetic done by `field`.
    pub fn with_field(field: F, options: EncodeOptions) -> Result<Self> {
        options.validate()?;
        let len = options.max_version.buffer_len();
        Ok(Self {
            field,
            options,
            outbuffer: vec![0u8; len].into_boxed_slice(),
            tempbuffer: vec![0u8; len].into_boxed_slice(),
        })
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Replaces the options. The new `max_version` may not exceed the one the
    /// buffers were sized for.
    pub fn set_options(&mut self, options: EncodeOptions) -> Result<()> {
        options.validate()?;
        options.check_buffers(&self.tempbuffer, &self.outbuffer)?;
        self.options = options;
        Ok(())
    }

    pub fn encode(&mut self, data: &[u8]) -> Result<QrCode<'_>> {
        QrCode::encode_binary_with(
            &self.field,
            data,
            &mut self.tempbuffer,
            &mut self.outbuffer,
            &self.options,
        )
    }

    pub fn encode_text(&mut self, text: &str) -> Result<QrCode<'_>> {
        self.encode(text.as_bytes())
    }
}
