//! # qrforge
//!
//! A QR Code encoder for byte payloads that does all of its work in caller-provided
//! buffers.
//!
//! `qrforge` turns a byte payload into a QR Code Model 2 symbol: it picks the smallest
//! version that fits, optionally raises the error correction level, adds Reed–Solomon
//! error correction, draws the function patterns and data, and selects the mask with the
//! lowest penalty. Nothing is allocated while encoding; the symbol is a view into the
//! output buffer in a packed one-bit-per-module layout.
//!
//! ## Features
//!
//! - Single-segment byte mode, versions 1 to 40 (with a configurable ceiling).
//! - Four error correction levels, with optional boosting.
//! - Automatic or fixed mask selection.
//! - Pluggable GF(2^8) multiplication ([`gf256::FieldMultiplier`]).
//! - Optional `serde` support for the option types.
//! - Safe Rust implementation with no unsafe code.
//!
//! Rendering the symbol is left to the caller; [`QrCode::get_module`] and
//! [`QrCode::as_bytes`] expose it.
//!
//! ## Example
//!
//! ```rust
//! use qrforge::{EncodeOptions, QrCode, QrCodeEcc, Version};
//!
//! let mut outbuffer = vec![0u8; Version::MAX.buffer_len()];
//! let mut tempbuffer = vec![0u8; Version::MAX.buffer_len()];
//!
//! let options = EncodeOptions::new().ecl(QrCodeEcc::Medium);
//! let qr = QrCode::encode_text("Hello, World!", &mut tempbuffer, &mut outbuffer, &options).unwrap();
//!
//! for y in 0..qr.size() {
//!     let row: String = (0..qr.size())
//!         .map(|x| if qr.get_module(x, y) { '#' } else { ' ' })
//!         .collect();
//!     println!("{}", row);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`gf256`]: GF(2^8) multiplication providers.
//! - [`reed_solomon`]: generator polynomials and ECC remainders.
//! - [`tables`]: capacity tables and formulas.
//! - [`bitstream`]: the byte-mode bit stream.
//! - [`interleave`]: block splitting and interleaving.

#![forbid(unsafe_code)]

pub mod bitstream;
mod encoder;
mod error;
pub mod gf256;
pub mod interleave;
mod mask;
mod matrix;
mod patterns;
mod placement;
pub mod reed_solomon;
pub mod tables;
mod types;

pub use bitstream::DataCodewords;
pub use encoder::{EncodeContext, EncodeOptions};
pub use error::{EncodeError, Result};
pub use mask::{Mask, MaskSelect};
pub use matrix::QrCode;
pub use patterns::{format_bits, version_bits};
pub use types::{QrCodeEcc, Version};
