use super::*;

#[test]
fn defaults_match_storefront_preview() {
    let cfg = PreviewConfig::default();
    assert_eq!(cfg.debounce_ms, 100);
    assert_eq!(cfg.debounce(), std::time::Duration::from_millis(100));
    assert_eq!(cfg.texture_size, 512);
    assert_eq!(cfg.placeholder_fill.to_hex(), "#F3F4F6");
    assert_eq!(cfg.placeholder_text_color.to_hex(), "#6B7280");
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_json_fills_defaults() {
    let cfg: PreviewConfig =
        serde_json::from_str(r##"{"debounce_ms": 250, "placeholder_fill": "#000000"}"##).unwrap();
    assert_eq!(cfg.debounce_ms, 250);
    assert_eq!(cfg.placeholder_fill, Rgb8::BLACK);
    assert_eq!(cfg.max_surface_dim, 1024);
}

#[test]
fn from_path_reads_and_validates() {
    let dir = std::env::temp_dir().join(format!("kitcanvas_cfg_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let good = dir.join("good.json");
    std::fs::write(&good, r#"{"texture_size": 256, "load_system_fonts": false}"#).unwrap();
    let cfg = PreviewConfig::from_path(&good).unwrap();
    assert_eq!(cfg.texture_size, 256);
    assert!(!cfg.load_system_fonts);

    let bad = dir.join("bad.json");
    std::fs::write(&bad, r#"{"max_surface_dim": 0}"#).unwrap();
    assert!(matches!(
        PreviewConfig::from_path(&bad),
        Err(KitError::Validation(_))
    ));

    let unknown = dir.join("unknown.json");
    std::fs::write(&unknown, r#"{"debounce": 5}"#).unwrap();
    assert!(PreviewConfig::from_path(&unknown).is_err());

    assert!(PreviewConfig::from_path(&dir.join("missing.json")).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}
