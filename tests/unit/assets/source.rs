use super::*;

#[test]
fn normalize_rel_path_rules() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("../up.png").is_err());
    assert!(normalize_rel_path("a/../b.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./.").is_err());
}

#[test]
fn fs_source_reads_below_root_and_rejects_escapes() {
    let dir = std::env::temp_dir().join(format!("kitcanvas_source_{}", std::process::id()));
    std::fs::create_dir_all(dir.join("products")).unwrap();
    std::fs::write(dir.join("products/shirt.bin"), b"abc").unwrap();

    let src = FsAssetSource::new(&dir);
    assert_eq!(src.fetch("products/shirt.bin").unwrap(), b"abc");
    assert!(src.fetch("products/missing.bin").is_err());
    assert!(src.fetch("../etc/passwd").is_err());
    assert!(matches!(
        src.fetch("/etc/passwd"),
        Err(KitError::Validation(_))
    ));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn memory_source_fails_closed() {
    let mut src = MemoryAssetSource::new().with("base", vec![1, 2, 3]);
    assert_eq!(src.fetch("base").unwrap(), vec![1, 2, 3]);
    assert!(matches!(src.fetch("other"), Err(KitError::AssetLoad(_))));
    assert!(src.remove("base"));
    assert!(src.fetch("base").is_err());
}
