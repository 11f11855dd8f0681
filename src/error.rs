//! Error types for the logo pipeline.
//!
//! Most public entry points never surface these: transforms fail open and
//! exports fold failures into an [`ExportResult`](crate::ExportResult). The
//! enum exists so the internals can use `?` and so callers that drive stages
//! or save targets directly get a precise reason.

use thiserror::Error;

/// Errors produced while parsing, transforming, rasterizing or exporting logos.
#[derive(Debug, Error)]
pub enum Error {
    /// The markup is not well-formed XML.
    #[error("failed to parse SVG markup: {0}")]
    Parse(#[from] roxmltree::Error),

    /// The document parsed but its root element is not `<svg>`.
    #[error("document has no root <svg> element")]
    MissingRoot,

    /// The tree could not be written back to text.
    #[error("failed to serialize SVG markup: {0}")]
    Serialize(String),

    /// The markup could not be decoded or rendered to pixels.
    #[error("failed to rasterize SVG: {0}")]
    Raster(String),

    /// Rendered pixels could not be encoded as PNG.
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    /// The batch archive could not be written.
    #[error("failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Filesystem failure in a save target or asset source.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A registry, config or profile could not be (de)serialized.
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
