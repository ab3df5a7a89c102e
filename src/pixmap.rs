//! The input document format produced by the pixel editor.

use serde::Deserialize;

use crate::error::ExportError;

/// The one pixmap schema revision this exporter understands.
pub const SUPPORTED_VERSION: &str = "1.0";

/// A saved pixel-grid document.
#[derive(Debug, Clone, Deserialize)]
pub struct Pixmap {
    pub version: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub pixels: Vec<Vec<Pixel>>,
}

/// One grid cell. A cell missing any of the three fields (absent or `null`)
/// is empty and produces no geometry — sparse grids are expected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pixel {
    pub shape: Option<String>,
    pub color: Option<String>,
    pub depth: Option<i32>,
}

impl Pixmap {
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }

    /// Preconditions checked before any assembly work happens.
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.version != SUPPORTED_VERSION {
            return Err(ExportError::SchemaMismatch {
                expected: SUPPORTED_VERSION,
                found: self.version.clone(),
            });
        }
        if self.width != self.height {
            return Err(ExportError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}
