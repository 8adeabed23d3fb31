use crate::matrix::{get_bit, QrCode};
use crate::tables::num_raw_data_modules;

impl QrCode<'_> {
    /// Draws the interleaved codewords onto every module that is not a function module,
    /// in the standard zigzag order.
    ///
    /// The grid must come straight from `function_modules_marked`: a dark module is
    /// taken to be a function module. Remainder bits stay light.
    pub(crate) fn draw_codewords(&mut self, data: &[u8]) {
        assert_eq!(
            data.len(),
            num_raw_data_modules(self.version()) / 8,
            "Illegal argument"
        );
        let size: i32 = self.size();
        let mut i: usize = 0; // Bit index into the data
        // Column pairs from right to left; the vertical timing column is skipped
        let mut right: i32 = size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            let upward: bool = ((right + 1) & 2) == 0;
            for vert in 0..size {
                for j in 0..2 {
                    let x = (right - j) as u8;
                    let y = (if upward { size - 1 - vert } else { vert }) as u8;
                    if !self.get_module_bounded(x, y) && i < data.len() * 8 {
                        self.set_module_bounded(x, y, get_bit(data[i >> 3].into(), 7 - ((i as u8) & 7)));
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
        debug_assert_eq!(i, data.len() * 8);
    }
}
