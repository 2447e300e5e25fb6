pub(crate) mod product;
