pub(crate) mod controller;
pub(crate) mod design;
pub(crate) mod objects;
