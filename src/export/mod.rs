pub(crate) mod archive;
pub(crate) mod checkout;
pub(crate) mod exporter;
