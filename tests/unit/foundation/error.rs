use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        KitError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        KitError::asset_load("x")
            .to_string()
            .contains("asset load failure:")
    );
    assert!(
        KitError::invalid_dimensions("x")
            .to_string()
            .contains("invalid dimensions:")
    );
    assert!(
        KitError::surface_unavailable("x")
            .to_string()
            .contains("surface unavailable:")
    );
    assert!(KitError::encode("x").to_string().contains("encode error:"));
    assert!(KitError::busy("x").to_string().contains("scheduler busy:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = KitError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
