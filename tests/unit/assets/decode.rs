use std::io::Cursor;

use super::*;

fn encode(img: image::DynamicImage, fmt: image::ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), fmt).unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100, 50, 200, 128]).unwrap();
    let bytes = encode(image::DynamicImage::ImageRgba8(img), image::ImageFormat::Png);

    let prepared = decode_image(&bytes).unwrap();
    assert_eq!((prepared.width, prepared.height), (1, 1));
    assert!(prepared.has_alpha);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn opaque_rgb_source_reports_no_alpha() {
    let img = image::RgbImage::from_pixel(3, 2, image::Rgb([9, 8, 7]));
    let bytes = encode(image::DynamicImage::ImageRgb8(img), image::ImageFormat::Png);
    let prepared = decode_image(&bytes).unwrap();
    assert_eq!((prepared.width, prepared.height), (3, 2));
    assert!(!prepared.has_alpha);
    assert_eq!(&prepared.rgba8_premul[..4], &[9, 8, 7, 255]);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn svg_parse_ok_and_err() {
    let db = Arc::new(usvg::fontdb::Database::new());
    let ok = br#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2"></svg>"#;
    let svg = parse_svg(ok, db.clone()).unwrap();
    assert_eq!(svg.intrinsic_size(), (4, 2));

    assert!(parse_svg(br#"<svg"#, db).is_err());
}

#[test]
fn svg_rasterizes_stretched_to_target() {
    let db = Arc::new(usvg::fontdb::Database::new());
    let src = br##"<svg xmlns="http://www.w3.org/2000/svg" width="2" height="2">
        <rect x="0" y="0" width="1" height="2" fill="#ffffff"/>
    </svg>"##;
    let svg = parse_svg(src, db).unwrap();
    let px = rasterize_svg_to_premul_rgba8(&svg.tree, 8, 4).unwrap();
    assert_eq!(px.len(), 8 * 4 * 4);
    // Left half covered, right half empty.
    assert_eq!(px[3], 255);
    assert_eq!(px[(7 * 4) + 3], 0);
    assert_eq!(px[((3 * 8 + 1) * 4) + 3], 255);
}

#[test]
fn svg_sniffing() {
    assert!(looks_like_svg("masks/full.SVG", b""));
    assert!(looks_like_svg("blob", b"  <svg xmlns='x'/>"));
    assert!(looks_like_svg("blob", b"<?xml version='1.0'?><svg/>"));
    assert!(!looks_like_svg("photo.png", b"\x89PNG\r\n"));
}

#[test]
fn unpremultiply_inverts_premultiply_for_opaque_and_clear() {
    let mut px = vec![10, 20, 30, 255, 40, 50, 60, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![10, 20, 30, 255, 0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![10, 20, 30, 255, 0, 0, 0, 0]);

    let mut half = vec![50, 25, 0, 128];
    unpremultiply_rgba8_in_place(&mut half);
    assert_eq!(half, vec![100, 50, 0, 128]);
}
