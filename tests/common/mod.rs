#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use drape::{AssetRef, AssetSource, DesignSession, DrapeResult, EngineConfig, MemoryAssetSource, Product};

pub const FRONT: &str = "/uploads/tee-front.png";
pub const BACK: &str = "/uploads/tee-back.png";
pub const LABEL: &str = "/uploads/tee-label.png";
pub const STAR: &str = "clipart/star.png";

/// Encode a solid `w` x `h` PNG.
pub fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

/// Small viewport, no system fonts, short load timeout.
pub fn config() -> EngineConfig {
    EngineConfig {
        viewport: drape::Viewport::new(50, 58).unwrap(),
        load_system_fonts: false,
        load_timeout_ms: 5_000,
        ..EngineConfig::default()
    }
}

pub const WAIT: Duration = Duration::from_secs(5);

/// Tee with photographs for Front, Back and InsideLabel; the sleeves and OutsideLabel have none.
pub fn tee() -> Product {
    Product::from_json(
        &serde_json::json!({
            "_id": "tee-1",
            "title": "Heavyweight Tee",
            "price": 29.0,
            "category": "T-Shirts",
            "colors": ["#ffffff", "#000000"],
            "sizes": ["S", "M"],
            "images": [FRONT],
            "views": { "back": BACK, "insideLabel": LABEL }
        })
        .to_string(),
    )
    .unwrap()
}

pub fn assets() -> MemoryAssetSource {
    MemoryAssetSource::new()
        .with(FRONT, png(20, 20, [255, 255, 255, 255]))
        .with(BACK, png(40, 20, [200, 200, 200, 255]))
        .with(LABEL, png(10, 10, [255, 255, 255, 255]))
        .with(STAR, png(12, 6, [0, 0, 255, 255]))
}

pub fn open() -> DesignSession {
    DesignSession::open(tee(), Arc::new(assets()), config()).unwrap()
}

/// Asset source whose gated references block until the test releases (or drops) their gate.
#[derive(Debug)]
pub struct GatedSource {
    inner: MemoryAssetSource,
    gates: Mutex<HashMap<String, mpsc::Receiver<()>>>,
}

impl GatedSource {
    pub fn new(inner: MemoryAssetSource) -> Self {
        Self {
            inner,
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Gate the first fetch of `reference`; send on (or drop) the returned sender to release it.
    pub fn gate(&self, reference: &str) -> mpsc::Sender<()> {
        let (tx, rx) = mpsc::channel();
        self.gates
            .lock()
            .unwrap()
            .insert(reference.to_string(), rx);
        tx
    }
}

impl AssetSource for GatedSource {
    fn fetch(&self, asset: &AssetRef) -> DrapeResult<Vec<u8>> {
        let gate = self.gates.lock().unwrap().remove(asset.raw());
        if let Some(rx) = gate {
            let _ = rx.recv();
        }
        self.inner.fetch(asset)
    }
}

/// Session over a gated source, opened and idle on Front.
pub fn open_gated() -> (DesignSession, Arc<GatedSource>) {
    let source = Arc::new(GatedSource::new(assets()));
    let session = DesignSession::open(tee(), source.clone(), config()).unwrap();
    (session, source)
}

/// Poll until `f` holds or `timeout` passes.
pub fn poll_until(session: &mut DesignSession, timeout: Duration, f: impl Fn(&DesignSession) -> bool) -> bool {
    let deadline = std::time::Instant::now() + timeout;
    loop {
        session.poll();
        if f(session) {
            return true;
        }
        if std::time::Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}
