use digit_camera::{FormatError, PlaneKind, Plane, PlanarFrame};

#[test]
fn test_from_i420_splits_planes() {
    // 4x2: 8 luma, 2 U, 2 V
    let data: Vec<u8> = (0..12).collect();
    let frame = PlanarFrame::from_i420(4, 2, 4, &data).unwrap();
    assert_eq!(frame.y().data(), &[0, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(frame.u().data(), &[8, 9]);
    assert_eq!(frame.v().data(), &[10, 11]);
    assert_eq!(frame.chroma_width(), 2);
    assert_eq!(frame.chroma_height(), 1);
}

#[test]
fn test_from_i420_ignores_trailing_bytes() {
    let data = vec![7u8; 100];
    let frame = PlanarFrame::from_i420(4, 2, 4, &data).unwrap();
    assert_eq!(frame.y().len(), 8);
    assert_eq!(frame.v().len(), 2);
}

#[test]
fn test_from_i420_short_buffer() {
    let err = PlanarFrame::from_i420(4, 4, 4, &[0; 20]).unwrap_err();
    assert_eq!(
        err,
        FormatError::PlaneSize {
            plane: PlaneKind::V,
            expected: 24,
            got: 20
        }
    );
}

#[test]
fn test_from_i420_zero_size() {
    assert!(matches!(
        PlanarFrame::from_i420(0, 4, 0, &[]),
        Err(FormatError::Dimensions { .. })
    ));
}

#[test]
fn test_validate_rejects_zero_pixel_stride() {
    let frame = PlanarFrame::new(
        2,
        2,
        Plane::packed(vec![0; 4], 2),
        Plane::new(vec![0; 4], 1, 0),
        Plane::packed(vec![0; 1], 1),
    );
    assert!(matches!(
        frame.validate(),
        Err(FormatError::Stride { plane: PlaneKind::U, .. })
    ));
}

#[test]
fn test_validate_rejects_narrow_row_stride() {
    let frame = PlanarFrame::new(
        4,
        2,
        Plane::packed(vec![0; 8], 3),
        Plane::packed(vec![0; 2], 2),
        Plane::packed(vec![0; 2], 2),
    );
    assert!(matches!(
        frame.validate(),
        Err(FormatError::Stride { plane: PlaneKind::Y, .. })
    ));
}

#[test]
fn test_validate_accepts_truncated_last_row() {
    // Semi-planar chroma views are one byte short of a full row.
    let frame = PlanarFrame::new(
        4,
        4,
        Plane::packed(vec![0; 16], 4),
        Plane::new(vec![0; 7], 4, 2),
        Plane::new(vec![0; 7], 4, 2),
    );
    assert!(frame.validate().is_ok());
}
