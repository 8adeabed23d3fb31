//! Reed–Solomon error correction codewords over GF(2^8/0x11D).

use crate::gf256::FieldMultiplier;
use crate::tables::REED_SOLOMON_DEGREE_MAX;

/// A generator (divisor) polynomial of a given degree, bound to the field
/// primitive used to build it.
///
/// Coefficients are stored from highest to lowest power, excluding the leading
/// term which is always 1. For example x^3 + 255x^2 + 8x + 93 is stored as
/// `[255, 8, 93]`.
pub struct ReedSolomonGenerator<'f, F: FieldMultiplier> {
    field: &'f F,
    divisor: [u8; REED_SOLOMON_DEGREE_MAX],
    degree: usize,
}

impl<'f, F: FieldMultiplier> ReedSolomonGenerator<'f, F> {
    /// Computes the product (x - r^0)(x - r^1)...(x - r^{degree-1}) with r = 0x02.
    ///
    /// # Panics
    ///
    /// Panics if `degree` is outside [1, 30].
    pub fn new(field: &'f F, degree: usize) -> Self {
        assert!((1..=REED_SOLOMON_DEGREE_MAX).contains(&degree), "Degree out of range");
        let mut result = Self {
            field,
            divisor: [0u8; REED_SOLOMON_DEGREE_MAX],
            degree,
        };
        let divisor: &mut [u8] = &mut result.divisor[..degree];
        divisor[degree - 1] = 1; // Start off with the monomial x^0
        let mut root: u8 = 1;
        for _ in 0..degree {
            // Multiply the current product by (x - r^i)
            for j in 0..degree {
                divisor[j] = field.multiply(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = field.multiply(root, 0x02);
        }
        result
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn divisor(&self) -> &[u8] {
        &self.divisor[..self.degree]
    }

    /// Stores in `result` the remainder of `data` (followed by `degree` zero
    /// codewords) divided by the generator.
    ///
    /// # Panics
    ///
    /// Panics if `result.len() != self.degree()`.
    pub fn compute_remainder(&self, data: &[u8], result: &mut [u8]) {
        assert_eq!(result.len(), self.degree);
        result.fill(0);
        for b in data {
            let factor: u8 = b ^ result[0];
            result.copy_within(1.., 0);
            result[self.degree - 1] = 0;
            for (x, &y) in result.iter_mut().zip(self.divisor()) {
                *x ^= self.field.multiply(y, factor);
            }
        }
    }
}
