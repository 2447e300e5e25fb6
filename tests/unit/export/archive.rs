use super::*;
use std::io::Read;

fn raster(fill: u8) -> Raster {
    Raster {
        width: 2,
        height: 2,
        data: vec![fill; 2 * 2 * 4],
    }
}

fn cfg() -> ArchiveConfig {
    ArchiveConfig {
        product_id: "tee".to_string(),
        width: 2,
        height: 2,
        multiplier: 1.0,
    }
}

#[test]
fn entry_names_use_file_stems() {
    assert_eq!(entry_name(View::Front), "front.png");
    assert_eq!(entry_name(View::OutsideLabel), "outside_label.png");
}

#[test]
fn in_memory_archive_keeps_push_order() {
    let mut a = InMemoryArchive::new();
    a.begin(cfg()).unwrap();
    a.push_view(View::Front, &raster(255)).unwrap();
    a.push_view(View::Back, &raster(0)).unwrap();
    a.end().unwrap();

    assert_eq!(a.views(), [View::Front, View::Back]);
    assert_eq!(a.get(View::Back), Some(&raster(0)));
    assert!(a.get(View::LeftSleeve).is_none());
    assert_eq!(a.config().map(|c| c.product_id.as_str()), Some("tee"));
}

#[test]
fn zip_bytes_contain_one_png_per_view() {
    let mut a = InMemoryArchive::new();
    a.begin(cfg()).unwrap();
    a.push_view(View::Front, &raster(255)).unwrap();
    a.push_view(View::RightSleeve, &raster(255)).unwrap();

    let bytes = a.to_zip_bytes().unwrap();
    let mut zip = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(zip.len(), 2);
    let mut png = Vec::new();
    zip.by_name("right_sleeve.png")
        .unwrap()
        .read_to_end(&mut png)
        .unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn zip_sink_writes_file() {
    let dir = std::env::temp_dir().join(format!("drape-archive-{}", std::process::id()));
    let path = dir.join("nested").join("design.zip");
    let mut sink = ZipArchiveSink::new(&path);
    sink.begin(cfg()).unwrap();
    sink.push_view(View::InsideLabel, &raster(0)).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.written(), 1);

    let file = std::fs::File::open(&path).unwrap();
    let mut zip = zip::ZipArchive::new(file).unwrap();
    assert!(zip.by_name("inside_label.png").is_ok());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn zip_sink_rejects_push_before_begin() {
    let mut sink = ZipArchiveSink::new(std::env::temp_dir().join("never.zip"));
    assert!(sink.push_view(View::Front, &raster(0)).is_err());
}

#[test]
fn aborted_zip_sink_leaves_no_file() {
    let path = std::env::temp_dir().join(format!("drape-abort-{}.zip", std::process::id()));
    let mut sink = ZipArchiveSink::new(&path);
    sink.begin(cfg()).unwrap();
    sink.push_view(View::Front, &raster(255)).unwrap();
    assert!(path.exists());

    sink.abort();
    assert!(!path.exists());
    assert_eq!(sink.written(), 0);
    assert!(sink.end().is_err());
}
