use super::*;

const EPS: f64 = 1e-9;

#[test]
fn wider_image_fits_height_and_centers_horizontally() {
    let r = cover_fit((800.0, 600.0), (400.0, 400.0)).unwrap();
    assert!((r.x - (-66.666_666_666)).abs() < 1e-6);
    assert_eq!(r.y, 0.0);
    assert!((r.width - 533.333_333_333).abs() < 1e-6);
    assert_eq!(r.height, 400.0);
}

#[test]
fn taller_image_fits_width_and_centers_vertically() {
    let r = cover_fit((600.0, 800.0), (400.0, 400.0)).unwrap();
    assert_eq!(r.x, 0.0);
    assert_eq!(r.width, 400.0);
    assert!((r.height - 533.333_333_333).abs() < 1e-6);
    assert!((r.y - (-66.666_666_666)).abs() < 1e-6);
}

#[test]
fn equal_aspect_is_exact() {
    let r = cover_fit((1000.0, 500.0), (400.0, 200.0)).unwrap();
    assert_eq!(
        r,
        DrawRect {
            x: 0.0,
            y: 0.0,
            width: 400.0,
            height: 200.0
        }
    );
}

#[test]
fn cover_fit_covers_surface_and_keeps_aspect() {
    let sizes = [1.0, 3.0, 17.0, 64.0, 333.0, 400.0, 512.0, 1080.0, 4096.0];
    for &iw in &sizes {
        for &ih in &sizes {
            for &sw in &sizes {
                for &sh in &sizes {
                    let r = cover_fit((iw, ih), (sw, sh)).unwrap();
                    let tol = EPS * sw.max(sh).max(r.width).max(r.height);
                    assert!(r.x <= tol && r.y <= tol, "{r:?}");
                    assert!(r.x + r.width >= sw - tol, "{r:?} vs {sw}x{sh}");
                    assert!(r.y + r.height >= sh - tol, "{r:?} vs {sw}x{sh}");
                    // Exactly one axis is flush with the surface.
                    assert!(
                        (r.width - sw).abs() <= tol || (r.height - sh).abs() <= tol,
                        "{r:?}"
                    );
                    let aspect = r.width / r.height;
                    assert!(((aspect - iw / ih) / (iw / ih)).abs() < 1e-9);
                    // Centered on both axes.
                    assert!((r.center_x() - sw / 2.0).abs() <= tol);
                    assert!((r.y + r.height / 2.0 - sh / 2.0).abs() <= tol);
                }
            }
        }
    }
}

#[test]
fn degenerate_sizes_are_invalid_dimensions() {
    for (img, surf) in [
        ((800.0, 0.0), (400.0, 400.0)),
        ((800.0, 600.0), (400.0, 0.0)),
        ((0.0, 600.0), (400.0, 400.0)),
        ((800.0, 600.0), (0.0, 400.0)),
        ((f64::NAN, 600.0), (400.0, 400.0)),
    ] {
        assert!(matches!(
            cover_fit(img, surf),
            Err(KitError::InvalidDimensions(_))
        ));
    }
}

#[test]
fn fractions_and_scaling() {
    let r = DrawRect {
        x: -10.0,
        y: 0.0,
        width: 200.0,
        height: 100.0,
    };
    let p = r.at_fraction(0.5, 0.55);
    assert_eq!(p.x, 90.0);
    assert!((p.y - 55.0).abs() < EPS);
    let s = r.scaled(2.0);
    assert_eq!((s.x, s.width, s.height), (-20.0, 400.0, 200.0));
    assert_eq!(r.to_rect().x1, 190.0);
}
