/// Convenience result type used across kitcanvas.
pub type KitResult<T> = Result<T, KitError>;

/// Top-level error taxonomy used by compositor, loader, scheduler and session APIs.
#[derive(thiserror::Error, Debug)]
pub enum KitError {
    /// Invalid caller-provided parameters or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A base or mask asset could not be fetched or decoded.
    #[error("asset load failure: {0}")]
    AssetLoad(String),

    /// A zero-sized source image or target surface.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// The drawing surface for a render pass could not be acquired.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Encoding the export surface failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// A render pass was requested while another one was still running.
    #[error("scheduler busy: {0}")]
    Busy(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KitError {
    /// Build a [`KitError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KitError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`KitError::InvalidDimensions`] value.
    pub fn invalid_dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions(msg.into())
    }

    /// Build a [`KitError::SurfaceUnavailable`] value.
    pub fn surface_unavailable(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    /// Build a [`KitError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`KitError::Busy`] value.
    pub fn busy(msg: impl Into<String>) -> Self {
        Self::Busy(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
