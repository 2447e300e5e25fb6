use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "drape_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn resolve_joins_relative_paths_onto_base() {
    assert_eq!(
        resolve_asset_ref("http://localhost:5000", "/uploads/front.png"),
        "http://localhost:5000/uploads/front.png"
    );
    assert_eq!(
        resolve_asset_ref("http://localhost:5000/", "uploads/front.png"),
        "http://localhost:5000/uploads/front.png"
    );
}

#[test]
fn resolve_keeps_absolute_references() {
    assert_eq!(
        resolve_asset_ref("http://localhost:5000", "https://cdn.example/a.png"),
        "https://cdn.example/a.png"
    );
    assert_eq!(
        resolve_asset_ref("http://localhost:5000", "data:image/png;base64,AAAA"),
        "data:image/png;base64,AAAA"
    );
    assert_eq!(resolve_asset_ref("", "a.png"), "a.png");
}

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn fs_source_reads_below_root_and_rejects_traversal() {
    let tmp = temp_dir("fs_source");
    std::fs::create_dir_all(tmp.join("uploads")).unwrap();
    std::fs::write(tmp.join("uploads/front.png"), b"bytes").unwrap();

    let src = FsAssetSource::new(&tmp);
    let ok = AssetRef::resolve("/uploads/front.png", "http://localhost:5000");
    assert_eq!(src.fetch(&ok).unwrap(), b"bytes");

    let missing = AssetRef::resolve("uploads/none.png", "");
    assert!(matches!(src.fetch(&missing), Err(DrapeError::Asset(_))));

    let escape = AssetRef::resolve("../secret.png", "");
    assert!(matches!(src.fetch(&escape), Err(DrapeError::Asset(_))));

    let remote = AssetRef::resolve("https://cdn.example/a.png", "");
    assert!(src.fetch(&remote).is_err());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn memory_source_matches_raw_or_resolved() {
    let src = MemoryAssetSource::new()
        .with("front.png", vec![1, 2, 3])
        .with("http://cdn/back.png", vec![4]);
    assert_eq!(src.len(), 2);

    let front = AssetRef::resolve("front.png", "http://localhost:5000");
    assert_eq!(src.fetch(&front).unwrap(), vec![1, 2, 3]);

    let back = AssetRef::resolve("http://cdn/back.png", "http://localhost:5000");
    assert_eq!(src.fetch(&back).unwrap(), vec![4]);

    let missing = AssetRef::resolve("nope.png", "");
    assert!(src.fetch(&missing).is_err());
}
