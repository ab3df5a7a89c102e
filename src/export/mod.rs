//! Assembly and writing of the output glTF document.

pub mod gltf_export;

pub use gltf_export::{ExportStatus, export, export_to_file};
