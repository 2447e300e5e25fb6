/// Crate-wide result alias.
pub type DrapeResult<T> = Result<T, DrapeError>;

/// Errors produced by the design engine.
///
/// Most variants are recoverable: asset and restore failures are handled locally with
/// placeholders or skipped records, `Busy` rejects a single call, and `Timeout` leaves the view
/// usable. Only missing product data is fatal for a session.
#[derive(thiserror::Error, Debug)]
pub enum DrapeError {
    /// Invalid caller input (unknown view, malformed color, bad multiplier, empty product).
    #[error("validation error: {0}")]
    Validation(String),

    /// An image or background asset could not be fetched or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Rasterization or raster encoding failed.
    #[error("render error: {0}")]
    Render(String),

    /// A design object record could not be serialized or reconstructed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// The stage is being rebuilt by a view transition.
    #[error("busy: {0}")]
    Busy(String),

    /// A view load did not reach idle within the configured timeout.
    #[error("timeout: view '{view}' did not finish loading within {waited_ms} ms")]
    Timeout {
        /// Key of the view that was loading (`"back"`, `"leftSleeve"`, ...).
        view: String,
        /// Time waited before giving up, in milliseconds.
        waited_ms: u64,
    },

    /// Wrapped lower-level failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DrapeError {
    /// Build a [`DrapeError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DrapeError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`DrapeError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`DrapeError::Busy`].
    pub fn busy(msg: impl Into<String>) -> Self {
        Self::Busy(msg.into())
    }

    /// Return `true` for conditions the session recovers from on its own.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Validation(_) | Self::Other(_))
    }
}

impl From<serde_json::Error> for DrapeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
