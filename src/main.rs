use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pixelmodel::export::{ExportStatus, export_to_file};
use pixelmodel::pixmap::Pixmap;
use pixelmodel::shapes::{BuiltinShapes, ShapeDir, ShapeSource};

/// Convert a pixel-grid document into a glTF 2.0 model.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pixel document to convert (.json)
    input: PathBuf,

    /// Destination .gltf file
    output: PathBuf,

    /// Directory containing shape templates (<name>.gltf). Falls back to the
    /// built-in templates when not given.
    #[clap(short, long)]
    shape_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let raw = match fs::read_to_string(&args.input) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("can't read {}: {err}", args.input.display());
            return ExitCode::FAILURE;
        }
    };
    let pixmap = match Pixmap::from_json(&raw) {
        Ok(pixmap) => pixmap,
        Err(err) => {
            eprintln!("{}: {err}", args.input.display());
            return ExitCode::FAILURE;
        }
    };

    let dir;
    let shapes: &dyn ShapeSource = match &args.shape_dir {
        Some(path) => {
            dir = ShapeDir::new(path);
            &dir
        }
        None => &BuiltinShapes,
    };

    match export_to_file(&pixmap, &args.output, shapes) {
        ExportStatus::Exported { destination } => {
            println!("exported {}", destination.display());
            ExitCode::SUCCESS
        }
        ExportStatus::Failed {
            destination,
            message,
        } => {
            eprintln!("{}: {message}", destination.display());
            ExitCode::FAILURE
        }
    }
}
