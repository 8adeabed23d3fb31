//! Splitting data codewords into blocks, adding ECC, and interleaving the blocks.

use crate::gf256::FieldMultiplier;
use crate::reed_solomon::ReedSolomonGenerator;
use crate::tables::{
    ecc_codewords_per_block, num_data_codewords, num_error_correction_blocks, num_raw_data_modules,
};
use crate::types::{QrCodeEcc, Version};

/// Appends error correction bytes to each block of `data`, then interleaves the bytes of
/// all blocks into `resultbuf`. `temp` is scratch space of at least one block's ECC length.
///
/// Returns the `num_raw_data_modules(ver) / 8` bytes written to `resultbuf`.
///
/// # Panics
///
/// Panics if `data` is not exactly `num_data_codewords(ver, ecl)` bytes long, or if
/// either buffer is too short.
pub fn add_ecc_and_interleave<'b, F: FieldMultiplier>(
    field: &F,
    data: &[u8],
    ver: Version,
    ecl: QrCodeEcc,
    temp: &mut [u8],
    resultbuf: &'b mut [u8],
) -> &'b [u8] {
    assert_eq!(data.len(), num_data_codewords(ver, ecl));
    let numblocks: usize = num_error_correction_blocks(ver, ecl);
    let blockecclen: usize = ecc_codewords_per_block(ver, ecl);
    let rawcodewords: usize = num_raw_data_modules(ver) / 8;
    let numshortblocks: usize = numblocks - (rawcodewords % numblocks);
    let shortblockdatalen: usize = rawcodewords / numblocks - blockecclen;

    let result = &mut resultbuf[..rawcodewords];
    let rs = ReedSolomonGenerator::new(field, blockecclen);
    let mut dat: &[u8] = data;
    let ecc: &mut [u8] = &mut temp[..blockecclen];
    for i in 0..numblocks {
        let datlen: usize = shortblockdatalen + usize::from(i >= numshortblocks);
        rs.compute_remainder(&dat[..datlen], ecc);
        // Long blocks have one extra byte, which lands after all the short blocks ran out
        let mut k: usize = i;
        for (j, &b) in dat[..datlen].iter().enumerate() {
            if j == shortblockdatalen {
                k -= numshortblocks;
            }
            result[k] = b;
            k += numblocks;
        }
        let mut k: usize = data.len() + i;
        for &b in ecc.iter() {
            result[k] = b;
            k += numblocks;
        }
        dat = &dat[datlen..];
    }
    debug_assert_eq!(dat.len(), 0);
    result
}
