//! Converts 2D pixel-grid documents into instanced voxel glTF 2.0 assets.
//!
//! Every non-empty grid cell becomes a node instancing a shared unit-shape
//! mesh, translated to its grid position and scaled along one axis by the
//! cell's depth. Shapes, colors and (shape, color) mesh pairings are interned
//! into dense index tables so the glTF cross references
//! (nodes → meshes → materials, meshes → accessors) resolve by construction.

/// Parsing of editor color strings into RGBA factors.
pub mod color;
/// Error definitions.
pub mod error;
/// glTF document assembly and writing.
pub mod export;
/// Order-preserving value interning.
pub mod intern;
/// The input pixel-grid document format.
pub mod pixmap;
/// The grid scan pass producing placements and index tables.
pub mod scan;
/// Shape template repository.
pub mod shapes;
