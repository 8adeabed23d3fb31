//! Mask patterns, the penalty score, and the search for the best mask.

use core::convert::TryFrom;

use log::{debug, trace};

use crate::error::EncodeError;
use crate::matrix::QrCode;
use crate::types::QrCodeEcc;

// For automatic mask pattern selection.
const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

/// One of the eight data mask patterns.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum Mask {
    /// (x + y) mod 2 == 0
    Pattern0,
    /// y mod 2 == 0
    Pattern1,
    /// x mod 3 == 0
    Pattern2,
    /// (x + y) mod 3 == 0
    Pattern3,
    /// (x / 3 + y / 2) mod 2 == 0
    Pattern4,
    /// xy mod 2 + xy mod 3 == 0
    Pattern5,
    /// (xy mod 2 + xy mod 3) mod 2 == 0
    Pattern6,
    /// ((x + y) mod 2 + xy mod 3) mod 2 == 0
    Pattern7,
}

impl Mask {
    pub const ALL: [Mask; 8] = [
        Mask::Pattern0,
        Mask::Pattern1,
        Mask::Pattern2,
        Mask::Pattern3,
        Mask::Pattern4,
        Mask::Pattern5,
        Mask::Pattern6,
        Mask::Pattern7,
    ];

    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7]. Use `Mask::try_from` for
    /// unchecked input.
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Mask::ALL[mask as usize]
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Whether the data module at (x, y) is inverted by this mask.
    pub fn inverts(self, x: i32, y: i32) -> bool {
        use Mask::*;
        match self {
            Pattern0 => (x + y) % 2 == 0,
            Pattern1 => y % 2 == 0,
            Pattern2 => x % 3 == 0,
            Pattern3 => (x + y) % 3 == 0,
            Pattern4 => (x / 3 + y / 2) % 2 == 0,
            Pattern5 => (x * y) % 2 + (x * y) % 3 == 0,
            Pattern6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
            Pattern7 => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
        }
    }
}

impl TryFrom<u8> for Mask {
    type Error = EncodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Mask::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(EncodeError::InvalidMask(value))
    }
}

impl From<Mask> for u8 {
    fn from(mask: Mask) -> u8 {
        mask.value()
    }
}

/// Which mask to apply: the lowest-penalty one, or a fixed choice.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaskSelect {
    #[default]
    Auto,
    Fixed(Mask),
}

impl From<Mask> for MaskSelect {
    fn from(mask: Mask) -> Self {
        MaskSelect::Fixed(mask)
    }
}

impl From<Option<Mask>> for MaskSelect {
    fn from(mask: Option<Mask>) -> Self {
        mask.map_or(MaskSelect::Auto, MaskSelect::Fixed)
    }
}

impl QrCode<'_> {
    /// XORs every data module with `mask`. Function modules are those set in
    /// `functionmodules`. Applying the same mask twice restores the grid.
    pub(crate) fn apply_mask(&mut self, functionmodules: &QrCode, mask: Mask) {
        let size = self.version().size();
        for y in 0..size {
            for x in 0..size {
                if functionmodules.get_module_bounded(x, y) {
                    continue;
                }
                let invert: bool = mask.inverts(i32::from(x), i32::from(y));
                self.set_module_bounded(x, y, self.get_module_bounded(x, y) ^ invert);
            }
        }
    }

    /// Applies the chosen mask for good and draws the matching format bits.
    ///
    /// With `MaskSelect::Auto` every mask is tried in turn (apply, draw format bits,
    /// score, apply again to undo) and the first one with the lowest penalty wins.
    pub(crate) fn apply_best_mask(
        &mut self,
        functionmodules: &QrCode,
        ecl: QrCodeEcc,
        select: MaskSelect,
    ) -> Mask {
        let msk = match select {
            MaskSelect::Fixed(mask) => mask,
            MaskSelect::Auto => {
                let mut best = Mask::Pattern0;
                let mut minpenalty = i32::MAX;
                for mask in Mask::ALL {
                    self.apply_mask(functionmodules, mask);
                    self.draw_format_bits(ecl, mask);
                    let penalty: i32 = self.penalty_score();
                    trace!("mask {} penalty {}", mask.value(), penalty);
                    if penalty < minpenalty {
                        best = mask;
                        minpenalty = penalty;
                    }
                    self.apply_mask(functionmodules, mask); // Undoes the mask due to XOR
                }
                best
            }
        };
        self.apply_mask(functionmodules, msk);
        self.draw_format_bits(ecl, msk);
        debug!(
            "applied mask {} ({})",
            msk.value(),
            if select == MaskSelect::Auto { "auto" } else { "fixed" }
        );
        msk
    }

    /// Penalty score of the current modules; lower is better.
    pub fn penalty_score(&self) -> i32 {
        let mut result: i32 = 0;
        let size: u8 = self.version().size();

        // Adjacent modules in row having same color, and finder-like patterns
        for y in 0..size {
            result += self.line_penalty(|i| (i, y));
        }
        // Adjacent modules in column having same color, and finder-like patterns
        for x in 0..size {
            result += self.line_penalty(|i| (x, i));
        }

        // 2*2 blocks of modules having same color
        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let color: bool = self.get_module_bounded(x, y);
                if color == self.get_module_bounded(x + 1, y)
                    && color == self.get_module_bounded(x, y + 1)
                    && color == self.get_module_bounded(x + 1, y + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }

        // Balance of dark and light modules
        let dark = self.dark_count() as i32;
        let total = i32::from(size) * i32::from(size); // Odd, so dark/total != 1/2
        // Smallest k >= 0 such that (45-5k)% <= dark/total <= (55+5k)%
        let k: i32 = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        result += k * PENALTY_N4;
        result
    }

    /// Run and finder-like penalties along one row or column; `at(i)` maps the
    /// position along the line to (x, y).
    fn line_penalty(&self, at: impl Fn(u8) -> (u8, u8)) -> i32 {
        let size: u8 = self.version().size();
        let mut result: i32 = 0;
        let mut runcolor = false;
        let mut runlen: i32 = 0;
        let mut runhistory = FinderPenalty::new(size);
        for i in 0..size {
            let (x, y) = at(i);
            let color = self.get_module_bounded(x, y);
            if color == runcolor {
                runlen += 1;
                if runlen == 5 {
                    result += PENALTY_N1;
                } else if runlen > 5 {
                    result += 1;
                }
            } else {
                runhistory.add_history(runlen);
                if !runcolor {
                    result += runhistory.count_patterns() * PENALTY_N3;
                }
                runcolor = color;
                runlen = 1;
            }
        }
        result + runhistory.terminate_and_count(runcolor, runlen) * PENALTY_N3
    }
}

/// The seven most recent run lengths of a line, newest first.
struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: u8) -> Self {
        Self {
            qr_size: i32::from(size),
            run_history: [0; 7],
        }
    }

    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size; // Add light border to initial run
        }
        let len: usize = self.run_history.len();
        self.run_history.copy_within(0..len - 1, 1);
        self.run_history[0] = currentrunlength;
    }

    /// Can only be called right after a light run is added. Returns 0, 1 or 2.
    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n)
            + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    /// Must be called at the end of a line.
    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            // Terminate dark run
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size; // Add light border to final run
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}
