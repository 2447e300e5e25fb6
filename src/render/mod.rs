pub(crate) mod composite;
pub(crate) mod compositor;
pub(crate) mod draw;
pub(crate) mod raster;
pub(crate) mod text;
