//! Assembles the glTF 2.0 document for a scanned pixel grid.
//!
//! Index conventions the assembly relies on:
//! * node `i` (for `i < placements.len()`) instances `meshes[placements[i].mesh]`;
//! * the wrapper node sits at index `placements.len()` and is the scene's
//!   only root;
//! * mesh accessor indices are `shape_idx * 3 + {0, 1, 2}` for position,
//!   normal and indices — valid because exactly one shape template (one
//!   buffer, three buffer views, three accessors) is merged per export.
//!   Merging several templates would require per-shape base offsets computed
//!   from the cumulative accessor counts instead of the static multiply.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use gltf_json as json;
use json::validation::Checked::Valid;
use tracing::debug;

use crate::color;
use crate::error::ExportError;
use crate::pixmap::Pixmap;
use crate::scan::{self, ScanOutput};
use crate::shapes::ShapeSource;

/// Generator string stamped into the asset metadata.
pub const GENERATOR: &str = "Pixel Model Maker";
/// Output format revision.
pub const GLTF_VERSION: &str = "2.0";
/// Wrapper node orientation: a fixed −90° rotation about Z.
pub const WRAPPER_ROTATION: [f32; 4] = [0.0, 0.0, -0.707_106_83, 0.707_106_83];
/// Fixed PBR factors for generated materials; the input only carries a color.
pub const METALLIC_FACTOR: f32 = 0.0;
pub const ROUGHNESS_FACTOR: f32 = 1.0;

/// Accessors contributed by one shape template, in template order
/// (position, normal, indices).
const ACCESSORS_PER_SHAPE: usize = 3;

/// Outcome reported to the caller, mirroring the editor's exported/error
/// notification pair.
#[derive(Debug)]
pub enum ExportStatus {
    Exported {
        destination: PathBuf,
    },
    Failed {
        destination: PathBuf,
        message: String,
    },
}

/// Run the full pipeline and persist the result at `destination`.
///
/// The document is assembled and serialized entirely in memory before the
/// destination is opened, so no failure path leaves a partial file behind.
pub fn export_to_file(
    pixmap: &Pixmap,
    destination: &Path,
    shapes: &dyn ShapeSource,
) -> ExportStatus {
    match write_model(pixmap, destination, shapes) {
        Ok(()) => ExportStatus::Exported {
            destination: destination.to_path_buf(),
        },
        Err(err) => ExportStatus::Failed {
            destination: destination.to_path_buf(),
            message: err.to_string(),
        },
    }
}

fn write_model(
    pixmap: &Pixmap,
    destination: &Path,
    shapes: &dyn ShapeSource,
) -> Result<(), ExportError> {
    let root = export(pixmap, shapes)?;
    let data =
        json::serialize::to_string(&root).map_err(|e| ExportError::Serialize(e.to_string()))?;
    fs::write(destination, data).map_err(|source| ExportError::WriteFailure {
        path: destination.display().to_string(),
        source,
    })?;
    debug!(destination = %destination.display(), "wrote glTF export");
    Ok(())
}

/// Build the complete export document in memory.
pub fn export(pixmap: &Pixmap, shapes: &dyn ShapeSource) -> Result<json::Root, ExportError> {
    pixmap.validate()?;
    let scanned = scan::scan(pixmap);

    let mut root = json::Root::default();
    root.asset = json::Asset {
        version: GLTF_VERSION.to_string(),
        generator: Some(GENERATOR.to_string()),
        ..Default::default()
    };

    push_nodes(&mut root, &scanned, pixmap.height);
    push_scene(&mut root, scanned.placements.len());
    push_meshes(&mut root, &scanned);
    push_materials(&mut root, scanned.colors.values());
    merge_shape_data(&mut root, &scanned, shapes)?;

    Ok(root)
}

/// One node per placement, then exactly one wrapper node parenting them all.
fn push_nodes(root: &mut json::Root, scanned: &ScanOutput, height: u32) {
    for p in &scanned.placements {
        // depth <= 0 is passed through untouched and produces a flat or
        // inverted scale; the editor never emits it but the format allows it.
        root.push(json::Node {
            mesh: Some(json::Index::new(p.mesh as u32)),
            translation: Some([(2 * p.row + 1) as f32, (2 * p.col + 1) as f32, 0.0]),
            scale: Some([1.0, 1.0, (2 * p.depth - 1) as f32]),
            ..Default::default()
        });
    }

    let children: Vec<json::Index<json::Node>> = (0..scanned.placements.len())
        .map(|i| json::Index::new(i as u32))
        .collect();
    root.push(json::Node {
        children: Some(children),
        translation: Some([0.0, (2 * height) as f32, 0.0]),
        rotation: Some(json::scene::UnitQuaternion(WRAPPER_ROTATION)),
        ..Default::default()
    });
}

/// One scene whose single root is the wrapper node (the last node pushed).
fn push_scene(root: &mut json::Root, num_placements: usize) {
    let scene = root.push(json::Scene {
        nodes: vec![json::Index::new(num_placements as u32)],
        name: None,
        extensions: Default::default(),
        extras: Default::default(),
    });
    root.scene = Some(scene);
}

/// One mesh per interned (shape, color) pair, in mesh-table order.
fn push_meshes(root: &mut json::Root, scanned: &ScanOutput) {
    for &(shape_idx, color_idx) in scanned.meshes.values() {
        let base = (shape_idx * ACCESSORS_PER_SHAPE) as u32;
        let mut attributes = BTreeMap::new();
        attributes.insert(
            Valid(json::mesh::Semantic::Positions),
            json::Index::new(base),
        );
        attributes.insert(
            Valid(json::mesh::Semantic::Normals),
            json::Index::new(base + 1),
        );
        root.push(json::Mesh {
            primitives: vec![json::mesh::Primitive {
                attributes,
                indices: Some(json::Index::new(base + 2)),
                material: Some(json::Index::new(color_idx as u32)),
                mode: Valid(json::mesh::Mode::Triangles),
                targets: None,
                extensions: None,
                extras: Default::default(),
            }],
            weights: None,
            name: None,
            extensions: Default::default(),
            extras: Default::default(),
        });
    }
}

/// One material per interned color, in color-table order.
fn push_materials(root: &mut json::Root, colors: &[String]) {
    for text in colors {
        let rgba = color::parse(text).unwrap_or(color::FALLBACK);
        root.push(json::Material {
            pbr_metallic_roughness: json::material::PbrMetallicRoughness {
                base_color_factor: json::material::PbrBaseColorFactor(rgba),
                metallic_factor: json::material::StrengthFactor(METALLIC_FACTOR),
                roughness_factor: json::material::StrengthFactor(ROUGHNESS_FACTOR),
                ..Default::default()
            },
            ..Default::default()
        });
    }
}

/// Merge the shape template's geometry arrays into the document verbatim.
///
/// Only the first interned shape is resolved; see the module docs for the
/// single-template limitation.
fn merge_shape_data(
    root: &mut json::Root,
    scanned: &ScanOutput,
    shapes: &dyn ShapeSource,
) -> Result<(), ExportError> {
    // An all-empty grid references no geometry at all; nothing to merge.
    let Some(shape) = scanned.shapes.values().first() else {
        return Ok(());
    };
    let template = shapes.resolve(shape)?;
    root.buffers = template.buffers;
    root.buffer_views = template.buffer_views;
    root.accessors = template.accessors;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixmap::Pixel;
    use crate::shapes::BuiltinShapes;

    fn px(shape: &str, color: &str, depth: i32) -> Pixel {
        Pixel {
            shape: Some(shape.to_string()),
            color: Some(color.to_string()),
            depth: Some(depth),
        }
    }

    fn pixmap(pixels: Vec<Vec<Pixel>>) -> Pixmap {
        let dim = pixels.len() as u32;
        Pixmap {
            version: "1.0".to_string(),
            width: dim,
            height: dim,
            pixels,
        }
    }

    /// The reference 2×2 scenario: two cells sharing one shape and color.
    fn two_by_two() -> Pixmap {
        pixmap(vec![
            vec![px("cube", "#ff0000", 1), Pixel::default()],
            vec![Pixel::default(), px("cube", "#ff0000", 2)],
        ])
    }

    #[test]
    fn two_by_two_document_layout() {
        let root = export(&two_by_two(), &BuiltinShapes).unwrap();

        // Two placements plus the wrapper.
        assert_eq!(root.nodes.len(), 3);
        assert_eq!(root.meshes.len(), 1);
        assert_eq!(root.materials.len(), 1);

        assert_eq!(root.nodes[0].translation, Some([1.0, 1.0, 0.0]));
        assert_eq!(root.nodes[0].scale, Some([1.0, 1.0, 1.0]));
        assert_eq!(root.nodes[1].translation, Some([3.0, 3.0, 0.0]));
        assert_eq!(root.nodes[1].scale, Some([1.0, 1.0, 3.0]));
        assert_eq!(root.nodes[0].mesh.map(|m| m.value()), Some(0));
        assert_eq!(root.nodes[1].mesh.map(|m| m.value()), Some(0));
    }

    #[test]
    fn wrapper_node_parents_every_placement() {
        let root = export(&two_by_two(), &BuiltinShapes).unwrap();
        let wrapper = root.nodes.last().unwrap();

        let children: Vec<usize> = wrapper
            .children
            .as_ref()
            .unwrap()
            .iter()
            .map(|c| c.value())
            .collect();
        assert_eq!(children, vec![0, 1]);
        assert_eq!(wrapper.translation, Some([0.0, 4.0, 0.0]));
        assert_eq!(wrapper.rotation.map(|r| r.0), Some(WRAPPER_ROTATION));
        assert!(wrapper.mesh.is_none());

        // The wrapper is the scene's only root.
        assert_eq!(root.scenes.len(), 1);
        let scene_nodes: Vec<usize> = root.scenes[0].nodes.iter().map(|n| n.value()).collect();
        assert_eq!(scene_nodes, vec![root.nodes.len() - 1]);
        assert_eq!(root.scene.map(|s| s.value()), Some(0));
    }

    #[test]
    fn asset_metadata_is_constant() {
        let root = export(&two_by_two(), &BuiltinShapes).unwrap();
        assert_eq!(root.asset.version, GLTF_VERSION);
        assert_eq!(root.asset.generator.as_deref(), Some(GENERATOR));
    }

    #[test]
    fn mesh_references_follow_the_accessor_convention() {
        let doc = pixmap(vec![
            vec![px("cube", "#ff0000", 1), px("cube", "#00ff00", 1)],
            vec![px("cube", "#ff0000", 1), Pixel::default()],
        ]);
        let root = export(&doc, &BuiltinShapes).unwrap();

        assert_eq!(root.meshes.len(), 2);
        for (i, mesh) in root.meshes.iter().enumerate() {
            let prim = &mesh.primitives[0];
            let positions = prim.attributes[&Valid(json::mesh::Semantic::Positions)];
            let normals = prim.attributes[&Valid(json::mesh::Semantic::Normals)];
            assert_eq!(positions.value(), 0);
            assert_eq!(normals.value(), 1);
            assert_eq!(prim.indices.map(|a| a.value()), Some(2));
            assert_eq!(prim.material.map(|m| m.value()), Some(i));
        }
    }

    #[test]
    fn all_cross_references_are_in_bounds() {
        let doc = pixmap(vec![
            vec![px("cube", "#ff0000", 1), px("cube", "#00ff00", 2)],
            vec![px("cube", "#0000ff", 3), px("cube", "#ff0000", 4)],
        ]);
        let root = export(&doc, &BuiltinShapes).unwrap();

        for node in root.nodes.iter().take(root.nodes.len() - 1) {
            assert!(node.mesh.unwrap().value() < root.meshes.len());
        }
        for mesh in &root.meshes {
            let prim = &mesh.primitives[0];
            assert!(prim.material.unwrap().value() < root.materials.len());
            assert!(prim.indices.unwrap().value() < root.accessors.len());
            for accessor in prim.attributes.values() {
                assert!(accessor.value() < root.accessors.len());
            }
        }
        for view in &root.buffer_views {
            assert!(view.buffer.value() < root.buffers.len());
        }
    }

    #[test]
    fn materials_carry_parsed_colors_and_fixed_factors() {
        let doc = pixmap(vec![vec![px("cube", "#ff0000", 1)]]);
        let root = export(&doc, &BuiltinShapes).unwrap();

        let pbr = &root.materials[0].pbr_metallic_roughness;
        assert_eq!(pbr.base_color_factor.0, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(pbr.metallic_factor.0, METALLIC_FACTOR);
        assert_eq!(pbr.roughness_factor.0, ROUGHNESS_FACTOR);
    }

    #[test]
    fn empty_grid_still_exports() {
        let doc = pixmap(vec![
            vec![Pixel::default(), Pixel::default()],
            vec![Pixel::default(), Pixel::default()],
        ]);
        let root = export(&doc, &BuiltinShapes).unwrap();

        assert_eq!(root.nodes.len(), 1);
        let wrapper = &root.nodes[0];
        assert_eq!(wrapper.children.as_deref(), Some(&[][..]));
        assert!(root.meshes.is_empty());
        assert!(root.materials.is_empty());
        assert!(root.buffers.is_empty());
        assert!(root.accessors.is_empty());
        let scene_nodes: Vec<usize> = root.scenes[0].nodes.iter().map(|n| n.value()).collect();
        assert_eq!(scene_nodes, vec![0]);
    }

    #[test]
    fn zero_and_negative_depth_pass_through() {
        let doc = pixmap(vec![vec![
            px("cube", "#ff0000", 0),
            px("cube", "#ff0000", -1),
        ]]);
        let root = export(&doc, &BuiltinShapes).unwrap();
        assert_eq!(root.nodes[0].scale, Some([1.0, 1.0, -1.0]));
        assert_eq!(root.nodes[1].scale, Some([1.0, 1.0, -3.0]));
    }

    #[test]
    fn version_mismatch_aborts() {
        let mut doc = two_by_two();
        doc.version = "2.0".to_string();
        let err = export(&doc, &BuiltinShapes).unwrap_err();
        assert!(matches!(err, ExportError::SchemaMismatch { .. }));
    }

    #[test]
    fn non_square_grid_aborts() {
        let mut doc = two_by_two();
        doc.height = 3;
        let err = export(&doc, &BuiltinShapes).unwrap_err();
        assert!(matches!(err, ExportError::InvalidDimensions { .. }));
    }

    #[test]
    fn unresolvable_shape_aborts() {
        let doc = pixmap(vec![vec![px("icosahedron", "#ff0000", 1)]]);
        let err = export(&doc, &BuiltinShapes).unwrap_err();
        assert!(matches!(err, ExportError::ShapeResolution { shape } if shape == "icosahedron"));
    }

    #[test]
    fn export_to_file_writes_parseable_json() {
        let destination =
            std::env::temp_dir().join(format!("pixelmodel-test-{}.gltf", std::process::id()));
        let status = export_to_file(&two_by_two(), &destination, &BuiltinShapes);
        assert!(matches!(status, ExportStatus::Exported { .. }));

        let raw = fs::read_to_string(&destination).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        for key in [
            "asset",
            "scene",
            "scenes",
            "nodes",
            "meshes",
            "materials",
            "buffers",
            "bufferViews",
            "accessors",
        ] {
            assert!(value.get(key).is_some(), "missing top-level key {key}");
        }
        fs::remove_file(&destination).ok();
    }

    #[test]
    fn unwritable_destination_reports_failure() {
        let destination = Path::new("/nonexistent-dir/out.gltf");
        let status = export_to_file(&two_by_two(), destination, &BuiltinShapes);
        let ExportStatus::Failed {
            destination: dest,
            message,
        } = status
        else {
            panic!("expected failure");
        };
        assert_eq!(dest, destination);
        assert!(message.contains("can't write"), "{message}");
    }

    #[test]
    fn failed_validation_writes_nothing() {
        let destination =
            std::env::temp_dir().join(format!("pixelmodel-never-{}.gltf", std::process::id()));
        let mut doc = two_by_two();
        doc.version = "2.0".to_string();
        let status = export_to_file(&doc, &destination, &BuiltinShapes);
        assert!(matches!(status, ExportStatus::Failed { .. }));
        assert!(!destination.exists());
    }
}
