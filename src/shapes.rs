//! Shape template repository.
//!
//! Each template is a self-contained glTF fragment describing one unit shape
//! spanning −1..1: exactly one buffer, three buffer views and three accessors
//! (position, normal, indices, in that order). The assembler's accessor
//! numbering depends on that cardinality, so a template that deviates from it
//! produces a document with dangling accessor references.

use std::fs;
use std::path::PathBuf;

use gltf_json as json;
use serde::Deserialize;

use crate::error::ExportError;

/// Geometry arrays lifted verbatim from a template file.
#[derive(Debug, Clone, Deserialize)]
pub struct ShapeTemplate {
    pub buffers: Vec<json::Buffer>,
    #[serde(rename = "bufferViews")]
    pub buffer_views: Vec<json::buffer::View>,
    pub accessors: Vec<json::Accessor>,
}

/// Resolves a shape identifier to its geometry template.
pub trait ShapeSource {
    fn resolve(&self, shape: &str) -> Result<ShapeTemplate, ExportError>;
}

const CUBE_TEMPLATE: &str = include_str!("shapes/cube.gltf");

/// Templates compiled into the binary. Currently just the unit cube.
#[derive(Debug, Default)]
pub struct BuiltinShapes;

impl ShapeSource for BuiltinShapes {
    fn resolve(&self, shape: &str) -> Result<ShapeTemplate, ExportError> {
        let raw = match shape {
            "cube" => CUBE_TEMPLATE,
            _ => return Err(not_found(shape)),
        };
        serde_json::from_str(raw).map_err(|_| not_found(shape))
    }
}

/// Loads `<dir>/<shape>.gltf` from an on-disk template directory.
#[derive(Debug, Clone)]
pub struct ShapeDir {
    root: PathBuf,
}

impl ShapeDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ShapeSource for ShapeDir {
    fn resolve(&self, shape: &str) -> Result<ShapeTemplate, ExportError> {
        let path = self.root.join(format!("{shape}.gltf"));
        let raw = fs::read_to_string(&path).map_err(|_| not_found(shape))?;
        serde_json::from_str(&raw).map_err(|_| not_found(shape))
    }
}

fn not_found(shape: &str) -> ExportError {
    ExportError::ShapeResolution {
        shape: shape.to_string(),
    }
}
