//! Drape is a multi-view apparel design canvas engine.
//!
//! A [`DesignSession`] edits one product across a fixed set of views (front, back, sleeves,
//! labels). Each view shows the product photograph composited under a session-global tint, with
//! user-placed text, images and shapes on top:
//!
//! - Load a [`Product`] and open a [`DesignSession`] over an [`AssetSource`]
//! - Switch views with [`DesignSession::request_view`]; objects of the view being left are saved
//!   and restored on return
//! - Export the active view as a [`Raster`], or every view into an [`ArchiveSink`]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod catalog;
mod config;
mod export;
mod foundation;
mod render;
mod scene;
mod session;

pub use crate::foundation::core::{Affine, Point, Rect, Vec2, Viewport};
pub use crate::foundation::error::{DrapeError, DrapeResult};

#[cfg(feature = "http")]
pub use crate::assets::source::HttpAssetSource;
pub use crate::assets::color::Color;
pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::source::{
    AssetRef, AssetSource, FsAssetSource, MemoryAssetSource, resolve_asset_ref,
};
pub use crate::catalog::product::{Product, ProductViews};
pub use crate::config::EngineConfig;
pub use crate::export::archive::{
    ArchiveConfig, ArchiveSink, InMemoryArchive, ZipArchiveSink, entry_name,
};
pub use crate::export::checkout::CheckoutPayload;
pub use crate::export::exporter::{ExportOpts, ExportStats};
pub use crate::render::composite::BlendMode;
pub use crate::render::compositor::{CompositeContext, PhotoOutcome, build_backgrounds, fit_placement};
pub use crate::render::raster::Raster;
pub use crate::scene::background::{
    BackgroundKind, BackgroundLayer, BackgroundStack, BackgroundStatus,
};
pub use crate::scene::object::{
    DesignObject, FontStyle, Geometry, ObjectId, ObjectKind, PropertyUpdate, ShapeKind,
    TextConfig, TextStyle,
};
pub use crate::scene::presets::{
    BASIC_SHAPES, FILL_SWATCHES, TextPreset, find_text_preset, font_combinations, quotes,
};
pub use crate::scene::stage::Selection;
pub use crate::scene::store::{DesignDocument, ObjectRecord, Restored, SceneStore, ViewState};
pub use crate::scene::view::View;
pub use crate::session::controller::ControllerState;
pub use crate::session::design::DesignSession;
