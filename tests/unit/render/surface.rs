use super::*;

#[test]
fn transparent_frame_and_pixel_access() {
    let mut f = FrameRGBA::transparent(3, 2);
    assert_eq!(f.data.len(), 24);
    assert!(f.premultiplied);
    f.data[((1 * 3 + 2) * 4)..((1 * 3 + 2) * 4 + 4)].copy_from_slice(&[1, 2, 3, 4]);
    assert_eq!(f.pixel(2, 1), Some([1, 2, 3, 4]));
    assert_eq!(f.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(f.pixel(3, 0), None);
    assert_eq!(f.pixel(0, 2), None);
}

#[test]
fn pixmap_dims_reject_zero_and_oversized() {
    assert_eq!(pixmap_dims(4, 5).unwrap(), (4, 5));
    assert!(matches!(
        pixmap_dims(0, 5),
        Err(KitError::InvalidDimensions(_))
    ));
    assert!(matches!(
        pixmap_dims(70_000, 5),
        Err(KitError::SurfaceUnavailable(_))
    ));
}

#[test]
fn pixmap_round_trips_premul_bytes() {
    let bytes = vec![10, 20, 30, 40, 0, 0, 0, 0];
    let p = pixmap_from_premul_bytes(&bytes, 2, 1).unwrap();
    assert_eq!(p.data_as_u8_slice(), bytes.as_slice());
    assert!(pixmap_from_premul_bytes(&bytes, 3, 1).is_err());
}
