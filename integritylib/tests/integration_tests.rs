use integritylib::{
    FILL_BYTE, FirmwareIntegrityRecord, ImageError, ImageSource, RecordErrorKind,
    build_hex_image, combine_hex_files, crc32,
};

const APP_BASE: u32 = 0x0800_8000;

#[test]
fn test_hex_file_to_trailer() {
    // Arrange
    let source = ImageSource::from_path("tests/fixtures/app.hex", APP_BASE).unwrap();

    // Act
    let image = source.build(APP_BASE).unwrap();
    let record = FirmwareIntegrityRecord::from_image(&image, "heater-shaker");

    // Assert - two 16-byte rows, a 16-byte 0xFF gap, then four bytes
    assert_eq!(image.len(), 52);
    assert!(image.as_bytes()[0x20..0x30].iter().all(|&b| b == FILL_BYTE));
    assert_eq!(&image.as_bytes()[0x30..], [0xAA, 0xBB, 0xCC, 0xDD]);

    assert_eq!(record.crc, 0x1C7E_B676);
    assert_eq!(record.size, 52);
    assert_eq!(record.start_address, APP_BASE);

    let bytes = record.serialize();
    assert_eq!(bytes.len(), 12 + "heater-shaker".len() + 1);
    assert_eq!(bytes[0..4], 0x1C7E_B676u32.to_le_bytes());
    assert_eq!(*bytes.last().unwrap(), 0x00);
}

#[test]
fn test_malformed_hex_aborts_with_line_number() {
    // Arrange - fixture's second line is truncated mid-payload
    let source = ImageSource::from_path("tests/fixtures/app_malformed.hex", APP_BASE).unwrap();

    // Act
    let res = source.build(APP_BASE);

    // Assert
    match res {
        Err(e) => {
            let img_err = e
                .downcast_ref::<ImageError>()
                .expect("Error was not an ImageError");
            assert_eq!(
                img_err,
                &ImageError::ParseRecordError(RecordErrorKind::LengthMismatch(16, 15), 2)
            );
        }
        Ok(_) => panic!("Expected an error, but got Ok"),
    }
}

#[test]
fn test_binary_file_to_trailer() {
    // Arrange - 2048-byte file based at 0x08008000, CRC from 1024 bytes in
    let source = ImageSource::from_path("tests/fixtures/app.bin", APP_BASE).unwrap();

    // Act
    let image = source.build(0x0800_8400).unwrap();
    let record = FirmwareIntegrityRecord::from_image(&image, "tempdeck");

    // Assert
    assert_eq!(image.start_address(), 0x0800_8400);
    assert_eq!(image.len(), 1024);
    assert_eq!(image.as_bytes()[0], 0x00); // file offset 1024 in the rolling pattern
    assert_eq!(record.crc, 0xA741_1CF7);
    assert_eq!(record.size, 1024);
    assert_eq!(record.start_address, 0x0800_8400);
}

#[test]
fn test_two_line_scenario() {
    // Arrange - linear offset 0x08000000, one 16-byte record at 0x0400
    let text = ":020000040800F2\n:10040000000102030405060708090A0B0C0D0E0F74\n";

    // Act
    let image = build_hex_image(text, 0x0800_0400).unwrap();

    // Assert
    assert_eq!(image.len(), 16);
    assert_eq!(image.as_bytes(), (0x00..=0x0F).collect::<Vec<u8>>());
    assert_eq!(crc32(image.as_bytes()), 0xDD8A_5622);
}

#[test]
fn test_combine_hex_files() {
    // Arrange
    let out_path = "build/t1/combined.hex";

    // Act
    let res = combine_hex_files(
        out_path,
        &["tests/fixtures/boot.hex", "tests/fixtures/app.hex"],
    );

    // Assert
    assert!(res.is_ok());

    let combined = std::fs::read_to_string(out_path).unwrap();
    let lines: Vec<&str> = combined.lines().collect();

    // Data/offset records from both sources, in order, one trailing EOF
    assert_eq!(lines.first(), Some(&":10010000214601360121470136007EFE09D2190140"));
    assert_eq!(lines.last(), Some(&":00000001FF"));
    assert_eq!(
        lines.iter().filter(|l| l.ends_with("01FF") && l.len() == 11).count(),
        1
    );
    assert!(lines.contains(&":020000040800F2"));
    assert!(lines.contains(&":04803000AABBCCDD3E"));
}

#[test]
fn test_combine_rejects_malformed_source() {
    // Arrange
    let out_path = "build/t2/combined.hex";

    // Act
    let res = combine_hex_files(
        out_path,
        &["tests/fixtures/boot.hex", "tests/fixtures/app_malformed.hex"],
    );

    // Assert - aborted, nothing written
    assert!(res.is_err());
    assert!(!std::path::Path::new(out_path).exists());
}
