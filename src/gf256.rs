//! Multiplication in GF(2^8) modulo the QR field polynomial.
//!
//! The encoder never multiplies field elements itself; it goes through a
//! [`FieldMultiplier`]. Hosts with a faster primitive (a hardware table, a
//! lookup in banked memory, ...) can plug it in with [`FnMultiplier`].

/// The reducing polynomial x^8 + x^4 + x^3 + x^2 + 1.
pub const FIELD_POLYNOMIAL: u16 = 0x11d;

/// Multiplies two elements of GF(2^8/0x11D).
///
/// Implementations must be deterministic and must not allocate. They are not
/// required to run in constant time.
pub trait FieldMultiplier {
    fn multiply(&self, x: u8, y: u8) -> u8;
}

impl<T: FieldMultiplier + ?Sized> FieldMultiplier for &T {
    fn multiply(&self, x: u8, y: u8) -> u8 {
        (**self).multiply(x, y)
    }
}

/// Shift-and-add multiplication. Needs no tables at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitwiseMultiplier;

impl FieldMultiplier for BitwiseMultiplier {
    fn multiply(&self, x: u8, y: u8) -> u8 {
        let mut z: u8 = 0;
        for i in (0..8).rev() {
            z = (z << 1) ^ ((z >> 7) * 0x1d);
            z ^= ((y >> i) & 1) * x;
        }
        z
    }
}

/// Log/antilog table multiplication. Both tables are built at compile time.
#[derive(Clone, Copy, Debug, Default)]
pub struct TableMultiplier;

struct Tables {
    exp: [u8; 255],
    log: [u8; 256],
}

const fn build_tables() -> Tables {
    let mut exp = [0u8; 255];
    let mut log = [0u8; 256];
    let mut value: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = value as u8;
        log[value as usize] = i as u8;
        value <<= 1;
        if value & 0x100 != 0 {
            value ^= FIELD_POLYNOMIAL;
        }
        i += 1;
    }
    Tables { exp, log }
}

static TABLES: Tables = build_tables();

impl FieldMultiplier for TableMultiplier {
    fn multiply(&self, x: u8, y: u8) -> u8 {
        if x == 0 || y == 0 {
            return 0;
        }
        let sum = usize::from(TABLES.log[usize::from(x)]) + usize::from(TABLES.log[usize::from(y)]);
        TABLES.exp[sum % 255]
    }
}

/// Adapts a plain function or closure into a [`FieldMultiplier`].
///
/// ```rust
/// use qrforge::gf256::{BitwiseMultiplier, FieldMultiplier, FnMultiplier};
///
/// let platform = FnMultiplier(|x, y| BitwiseMultiplier.multiply(x, y));
/// assert_eq!(platform.multiply(0x80, 0x02), 0x1d);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FnMultiplier<F>(pub F);

impl<F: Fn(u8, u8) -> u8> FieldMultiplier for FnMultiplier<F> {
    fn multiply(&self, x: u8, y: u8) -> u8 {
        (self.0)(x, y)
    }
}
