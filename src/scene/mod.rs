pub(crate) mod background;
pub(crate) mod object;
pub(crate) mod presets;
pub(crate) mod stage;
pub(crate) mod store;
pub(crate) mod view;
