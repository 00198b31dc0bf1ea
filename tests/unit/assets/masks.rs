use super::*;

#[test]
fn builtin_catalog_selects_by_silhouette_only() {
    let c = MaskCatalog::builtin();
    let p = DesignParameters::new("j.png");
    assert_eq!(c.select(&p), Some(BUILTIN_MASK_FULL));

    let half = p
        .clone()
        .with_modes(SilhouetteMode::Half, CollarMode::Collared);
    assert_eq!(c.select(&half), Some(BUILTIN_MASK_HALF));
    let half_regular = p.with_modes(SilhouetteMode::Half, CollarMode::Regular);
    assert_eq!(c.select(&half_regular), Some(BUILTIN_MASK_HALF));
}

#[test]
fn explicit_mask_overrides_catalog() {
    let c = MaskCatalog::builtin();
    let p = DesignParameters::new("j.png").with_mask("masks/custom.png");
    assert_eq!(c.select(&p), Some("masks/custom.png"));
    let off = DesignParameters::new("j.png").with_mask("  ");
    assert_eq!(c.select(&off), None);
}

#[test]
fn empty_catalog_and_custom_entries() {
    let mut c = MaskCatalog::empty();
    let p = DesignParameters::new("j.png")
        .with_modes(SilhouetteMode::Full, CollarMode::Collared);
    assert_eq!(c.select(&p), None);
    c.set(SilhouetteMode::Full, CollarMode::Collared, "polo.svg");
    assert_eq!(c.select(&p), Some("polo.svg"));
    assert_eq!(c.lookup(SilhouetteMode::Full, CollarMode::Regular), None);
}

#[test]
fn builtin_bytes_are_parseable_svg() {
    let db = std::sync::Arc::new(usvg::fontdb::Database::new());
    for r in [BUILTIN_MASK_FULL, BUILTIN_MASK_HALF] {
        let bytes = builtin_mask_bytes(r).unwrap();
        let svg = crate::assets::decode::parse_svg(bytes, db.clone()).unwrap();
        assert_eq!(svg.intrinsic_size(), (100, 100));
    }
    assert!(builtin_mask_bytes("builtin:nope").is_none());
    assert!(builtin_mask_bytes("mask_full").is_none());
}
