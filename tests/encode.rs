//! End-to-end tests of the public encode API.

use qrforge::gf256::{FnMultiplier, TableMultiplier};
use qrforge::tables::{alignment_pattern_positions, num_data_codewords};
use qrforge::{
    format_bits, version_bits, EncodeContext, EncodeError, EncodeOptions, Mask, QrCode, QrCodeEcc,
    Version,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn buffers() -> (Vec<u8>, Vec<u8>) {
    (
        vec![0u8; Version::MAX.buffer_len()],
        vec![0u8; Version::MAX.buffer_len()],
    )
}

fn bit(bits: u32, i: i32) -> bool {
    (bits >> i) & 1 != 0
}

/// Checks every function module of `qr` against the layout for its version.
fn assert_function_patterns(qr: &QrCode) {
    let size = qr.size();
    let ver = qr.version();
    assert_eq!(size, i32::from(ver.value()) * 4 + 17);

    for &(cx, cy) in &[(3, 3), (size - 4, 3), (3, size - 4)] {
        for dy in -4..=4 {
            for dx in -4..=4 {
                let (x, y) = (cx + dx, cy + dy);
                if (0..size).contains(&x) && (0..size).contains(&y) {
                    let dist = i32::max(dx.abs(), dy.abs());
                    assert_eq!(qr.get_module(x, y), dist != 2 && dist != 4, "finder at ({}, {})", x, y);
                }
            }
        }
    }

    for i in 8..size - 8 {
        assert_eq!(qr.get_module(6, i), i % 2 == 0, "timing at (6, {})", i);
        assert_eq!(qr.get_module(i, 6), i % 2 == 0, "timing at ({}, 6)", i);
    }

    let mut posbuf = [0u8; 7];
    let pos = alignment_pattern_positions(ver, &mut posbuf);
    let n = pos.len();
    for (i, &px) in pos.iter().enumerate() {
        for (j, &py) in pos.iter().enumerate() {
            if (i == 0 && j == 0) || (i == 0 && j == n - 1) || (i == n - 1 && j == 0) {
                continue;
            }
            for dy in -2..=2i32 {
                for dx in -2..=2i32 {
                    let dist = i32::max(dx.abs(), dy.abs());
                    let (x, y) = (i32::from(px) + dx, i32::from(py) + dy);
                    assert_eq!(qr.get_module(x, y), dist != 1, "alignment at ({}, {})", x, y);
                }
            }
        }
    }

    assert!(qr.get_module(8, size - 8), "dark module");

    let format = format_bits(qr.error_correction_level(), qr.mask());
    for i in 0..6 {
        assert_eq!(qr.get_module(8, i), bit(format, i));
    }
    assert_eq!(qr.get_module(8, 7), bit(format, 6));
    assert_eq!(qr.get_module(8, 8), bit(format, 7));
    assert_eq!(qr.get_module(7, 8), bit(format, 8));
    for i in 9..15 {
        assert_eq!(qr.get_module(14 - i, 8), bit(format, i));
    }
    for i in 0..8 {
        assert_eq!(qr.get_module(size - 1 - i, 8), bit(format, i));
    }
    for i in 8..15 {
        assert_eq!(qr.get_module(8, size - 15 + i), bit(format, i));
    }

    if ver.value() >= 7 {
        let bits = version_bits(ver);
        for i in 0..18 {
            assert_eq!(qr.get_module(size - 11 + i % 3, i / 3), bit(bits, i));
            assert_eq!(qr.get_module(i / 3, size - 11 + i % 3), bit(bits, i));
        }
    }
}

#[test]
fn test_hello_selects_version_1_and_best_mask() {
    init_logger();
    let options = EncodeOptions::new().ecl(QrCodeEcc::Low).boost_ecl(false);

    let (mut out, mut temp) = buffers();
    let encoded = QrCode::encode_to_codewords(b"HELLO", &mut out, &options).unwrap();
    assert_eq!(encoded.version, Version::MIN);
    assert_eq!(encoded.len, 19);
    // Mode 0100, then an 8-bit count of 5
    assert_eq!(&out[..2], &[0x40, 0x54]);

    let (mut out_auto, mut temp_auto) = buffers();
    let auto = QrCode::encode_binary(b"HELLO", &mut temp_auto, &mut out_auto, &options).unwrap();
    assert_eq!(auto.version(), Version::MIN);
    assert_eq!(auto.error_correction_level(), QrCodeEcc::Low);
    assert_function_patterns(&auto);

    // The chosen mask is the first one with the lowest penalty
    let mut best: Option<(i32, Mask)> = None;
    for mask in Mask::ALL {
        let fixed = QrCode::encode_binary(b"HELLO", &mut temp, &mut out, &options.mask(mask)).unwrap();
        let penalty = fixed.penalty_score();
        if best.map_or(true, |(p, _)| penalty < p) {
            best = Some((penalty, mask));
        }
        if mask == auto.mask() {
            // Same modules as a single, direct application of that mask
            assert_eq!(fixed, auto);
        }
    }
    assert_eq!(best.map(|(_, m)| m), Some(auto.mask()));
}

#[test]
fn test_empty_payload() {
    init_logger();
    let (mut out, mut temp) = buffers();
    let options = EncodeOptions::new().ecl(QrCodeEcc::Low).boost_ecl(false);
    let qr = QrCode::encode_binary(&[], &mut temp, &mut out, &options).unwrap();
    assert_eq!(qr.size(), 21);
    assert_function_patterns(&qr);
}

#[test]
fn test_structure_for_every_version_and_level() {
    let (mut out, mut temp) = buffers();
    for v in 1..=40u8 {
        let ver = Version::new(v);
        for ecl in QrCodeEcc::ALL {
            let options = EncodeOptions::new()
                .ecl(ecl)
                .boost_ecl(false)
                .min_version(ver)
                .max_version(ver)
                .mask(Mask::new(v % 8));
            let qr = QrCode::encode_text("qr", &mut temp, &mut out, &options).unwrap();
            assert_eq!(qr.version(), ver);
            assert_eq!(qr.error_correction_level(), ecl);
            assert_eq!(qr.mask(), Mask::new(v % 8));
            assert_eq!(qr.as_bytes().len(), ver.buffer_len());
            assert_function_patterns(&qr);
        }
    }
}

#[test]
fn test_auto_mask_on_larger_versions() {
    let (mut out, mut temp) = buffers();
    for len in [100usize, 500, 1500] {
        let data: Vec<u8> = (0..len).map(|i| (i * 31 % 251) as u8).collect();
        let qr = QrCode::encode_binary(&data, &mut temp, &mut out, &EncodeOptions::new()).unwrap();
        assert_function_patterns(&qr);
    }
}

#[test]
fn test_boost_keeps_version_and_raises_level() {
    let (mut out, mut temp) = buffers();
    for len in [0usize, 5, 17, 60, 300] {
        let data = vec![b'z'; len];
        let plain_options = EncodeOptions::new().ecl(QrCodeEcc::Low).boost_ecl(false);
        let plain_version = QrCode::encode_binary(&data, &mut temp, &mut out, &plain_options)
            .unwrap()
            .version();
        let boosted = QrCode::encode_binary(&data, &mut temp, &mut out, &plain_options.boost_ecl(true)).unwrap();
        assert_eq!(boosted.version(), plain_version);
        assert!(boosted.error_correction_level() >= QrCodeEcc::Low);
    }

    // 4 + 8 + 40 bits fit the 9 data codewords of 1-H
    let boosted = QrCode::encode_binary(b"zzzzz", &mut temp, &mut out, &EncodeOptions::new()).unwrap();
    assert_eq!(boosted.version(), Version::MIN);
    assert_eq!(boosted.error_correction_level(), QrCodeEcc::High);

    // 60 bytes need version 4 at Low (80 codewords) and still fit 4-M (64 codewords)
    let data = [b'z'; 60];
    let boosted = QrCode::encode_binary(&data, &mut temp, &mut out, &EncodeOptions::new()).unwrap();
    assert_eq!(boosted.version(), Version::new(4));
    assert_eq!(boosted.error_correction_level(), QrCodeEcc::Medium);
}

#[test]
fn test_hello_matches_reference_symbol() {
    // HELLO at 1-L with mask 3, packed as: size byte, then 21 rows padded to 24 modules
    const EXPECTED: [u8; 64] = [
        0x15, 0x7f, 0xdd, 0x1f, 0x41, 0x4c, 0x10, 0x5d, 0x4b, 0x17, 0x5d, 0x53,
        0x17, 0x5d, 0x49, 0x17, 0x41, 0x5e, 0x10, 0x7f, 0xd5, 0x1f, 0x00, 0x18,
        0x00, 0x4f, 0x3f, 0x17, 0xab, 0x79, 0x06, 0x74, 0x08, 0x18, 0x2b, 0xcb,
        0x0b, 0x79, 0x91, 0x14, 0x00, 0x49, 0x14, 0x7f, 0x98, 0x00, 0x41, 0x86,
        0x0f, 0x5d, 0xf4, 0x1b, 0x5d, 0x4b, 0x0f, 0x5d, 0xd1, 0x04, 0x41, 0xa1,
        0x11, 0x7f, 0xa3, 0x00,
    ];
    let (mut out, mut temp) = buffers();
    let options = EncodeOptions::new()
        .ecl(QrCodeEcc::Low)
        .boost_ecl(false)
        .mask(Mask::Pattern3);
    let qr = QrCode::encode_binary(b"HELLO", &mut temp, &mut out, &options).unwrap();
    assert_eq!(qr.as_bytes(), &EXPECTED[..]);

    let rows = [
        "#######.#.###.#######",
        "#.....#...##..#.....#",
        "#.###.#.##.#..#.###.#",
        "#.###.#.##..#.#.###.#",
        "#.###.#.#..#..#.###.#",
        "#.....#..####.#.....#",
        "#######.#.#.#.#######",
        "...........##........",
        "####..#.######..###.#",
        "##.#.#.##..####..##..",
        "..#.###....#.......##",
        "##.#.#..##.#..####.#.",
        "#..####.#...#..#..#.#",
        "........#..#..#...#.#",
        "#######....##..#.....",
        "#.....#..##....#####.",
        "#.###.#...#.######.##",
        "#.###.#.##.#..#.####.",
        "#.###.#.#...#.##..#..",
        "#.....#.#....#.##...#",
        "#######.##...#.#.....",
    ];
    for (y, row) in rows.iter().enumerate() {
        for (x, c) in row.chars().enumerate() {
            assert_eq!(qr.get_module(x as i32, y as i32), c == '#', "({}, {})", x, y);
        }
    }
}

#[test]
fn test_count_field_limit() {
    let (mut out, mut temp) = buffers();
    let capped = EncodeOptions::new().boost_ecl(false).max_version(Version::new(9));

    out.fill(0xaa);
    temp.fill(0xaa);
    let err = QrCode::encode_binary(&[7u8; 256], &mut temp, &mut out, &capped).unwrap_err();
    assert_eq!(err, EncodeError::SegmentTooLong { len: 256, count_bits: 8 });
    assert!(err.is_invalid_parameter());
    assert!(out.iter().chain(temp.iter()).all(|&b| b == 0xaa));

    // 255 bytes fit the count field but not the 9-L data capacity
    let err = QrCode::encode_binary(&[7u8; 255], &mut temp, &mut out, &capped).unwrap_err();
    assert!(!err.is_invalid_parameter());

    // The largest payload 9-L holds is still counted in 8 bits
    let fits = num_data_codewords(Version::new(9), QrCodeEcc::Low) - 2;
    let qr = QrCode::encode_binary(&vec![7u8; fits], &mut temp, &mut out, &capped).unwrap();
    assert_eq!(qr.version(), Version::new(9));

    let qr = QrCode::encode_binary(&[7u8; 256], &mut temp, &mut out, &EncodeOptions::new()).unwrap();
    assert_eq!(qr.version(), Version::new(10));
}

#[test]
fn test_capacity_limits_at_version_40() {
    let (mut out, mut temp) = buffers();
    let options = EncodeOptions::new().ecl(QrCodeEcc::Low).boost_ecl(false);

    let qr = QrCode::encode_binary(&vec![0x55u8; 2953], &mut temp, &mut out, &options).unwrap();
    assert_eq!(qr.version(), Version::MAX);

    let err = QrCode::encode_binary(&vec![0x55u8; 2954], &mut temp, &mut out, &options).unwrap_err();
    assert_eq!(
        err,
        EncodeError::CapacityOverflow {
            used_bits: 4 + 16 + 2954 * 8,
            capacity_bits: 2956 * 8
        }
    );
    assert_eq!(out[0], 0);
}

#[test]
fn test_compact_ceiling() {
    let mut ctx = EncodeContext::new(EncodeOptions::new().max_version(Version::COMPACT_MAX)).unwrap();
    let cap = num_data_codewords(Version::COMPACT_MAX, QrCodeEcc::Low) - 3;
    assert_eq!(ctx.encode(&vec![1u8; cap]).unwrap().version(), Version::COMPACT_MAX);
    let err = ctx.encode(&vec![1u8; cap + 1]).unwrap_err();
    assert!(matches!(err, EncodeError::CapacityOverflow { .. }));
}

#[test]
fn test_field_providers_agree() {
    let data = b"the same symbol whichever multiplier builds the ECC";
    let options = EncodeOptions::new().ecl(QrCodeEcc::High);

    let (mut out1, mut temp1) = buffers();
    let bitwise = QrCode::encode_binary(data, &mut temp1, &mut out1, &options).unwrap();

    let (mut out2, mut temp2) = buffers();
    let table = QrCode::encode_binary_with(&TableMultiplier, data, &mut temp2, &mut out2, &options).unwrap();
    assert_eq!(bitwise, table);

    let platform = FnMultiplier(|x: u8, y: u8| {
        use qrforge::gf256::FieldMultiplier;
        TableMultiplier.multiply(x, y)
    });
    let mut ctx = EncodeContext::with_field(platform, options).unwrap();
    assert_eq!(ctx.encode(data).unwrap(), bitwise);
}

#[test]
fn test_packed_layout_matches_accessor() {
    let (mut out, mut temp) = buffers();
    let qr = QrCode::encode_text("layout", &mut temp, &mut out, &EncodeOptions::new()).unwrap();
    let bytes = qr.as_bytes();
    let size = qr.size();
    assert_eq!(i32::from(bytes[0]), size);
    let padded = (size + 7) / 8 * 8;
    for y in 0..size {
        for x in 0..padded {
            let index = (y * padded + x) as usize;
            let packed = (bytes[1 + index / 8] >> (index % 8)) & 1 != 0;
            // Padding columns stay light
            assert_eq!(packed, qr.get_module(x, y), "({}, {})", x, y);
        }
    }
}

#[test]
fn test_invalid_parameters() {
    assert_eq!(Mask::try_from(9), Err(EncodeError::InvalidMask(9)));
    assert_eq!(QrCodeEcc::try_from(4), Err(EncodeError::InvalidEcc(4)));
    assert_eq!(Version::try_from(41), Err(EncodeError::InvalidVersion(41)));
    assert!(EncodeError::InvalidMask(9).is_invalid_parameter());
}

#[cfg(feature = "serde")]
#[test]
fn test_options_from_json() {
    let options: EncodeOptions =
        serde_json::from_str(r#"{"ecl":"Quartile","mask":{"Fixed":3},"max_version":27}"#).unwrap();
    assert_eq!(options.ecl, QrCodeEcc::Quartile);
    assert_eq!(options.mask, qrforge::MaskSelect::Fixed(Mask::Pattern3));
    assert_eq!(options.max_version, Version::COMPACT_MAX);
    assert!(options.boost_ecl);

    assert!(serde_json::from_str::<EncodeOptions>(r#"{"max_version":41}"#).is_err());
}
