//! The single scan pass over the pixel grid.
//!
//! Builds the dense shape/color/mesh index tables and a flat placement list
//! in row-major scan order. That order fixes node emission order downstream,
//! so the whole output is deterministic for a given document.

use tracing::debug;

use crate::intern::InternTable;
use crate::pixmap::Pixmap;

/// One shape instance to place in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index into the mesh table (and into `meshes` in the output document).
    pub mesh: usize,
    pub depth: i32,
    pub row: usize,
    pub col: usize,
}

/// Everything the document assembler needs: the placements plus the three
/// interning tables that fix shape, color and mesh index assignments.
#[derive(Debug)]
pub struct ScanOutput {
    pub placements: Vec<Placement>,
    pub shapes: InternTable<String>,
    pub colors: InternTable<String>,
    /// Deduplicated (shape index, color index) pairs; two cells with the same
    /// shape and color always resolve to the same mesh index.
    pub meshes: InternTable<(usize, usize)>,
}

/// Walk the grid once, skipping incomplete cells.
pub fn scan(pixmap: &Pixmap) -> ScanOutput {
    let mut placements = Vec::new();
    let mut shapes = InternTable::new();
    let mut colors = InternTable::new();
    let mut meshes = InternTable::new();

    for (row, cells) in pixmap.pixels.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let (Some(shape), Some(color), Some(depth)) =
                (cell.shape.as_deref(), cell.color.as_deref(), cell.depth)
            else {
                continue;
            };
            let shape_idx = shapes.intern(shape.to_string());
            let color_idx = colors.intern(color.to_string());
            let mesh = meshes.intern((shape_idx, color_idx));
            placements.push(Placement {
                mesh,
                depth,
                row,
                col,
            });
        }
    }

    debug!(
        placements = placements.len(),
        shapes = shapes.len(),
        colors = colors.len(),
        meshes = meshes.len(),
        "scanned pixel grid"
    );

    ScanOutput {
        placements,
        shapes,
        colors,
        meshes,
    }
}
