use std::io;

use thiserror::Error;

/// Terminal failures for one export run.
///
/// Every variant aborts the export outright. Assembly happens entirely in
/// memory before the destination is touched, so none of these paths leave a
/// partial file behind.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid version number [{expected} != {found}]")]
    SchemaMismatch {
        expected: &'static str,
        found: String,
    },
    #[error("invalid size [width {width} != height {height}]")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("can't find or open shape template {shape:?}")]
    ShapeResolution { shape: String },
    #[error("can't write to {path}: {source}")]
    WriteFailure { path: String, source: io::Error },
    #[error("glTF serialization error: {0}")]
    Serialize(String),
}
