use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use facegrid::detection::{faces, ocr};
use facegrid::prompt::{prompt_keyword, validate_keyword};
use facegrid::{
    FaceSearch, FacegridError, FilePresenter, ImageOutcome, OcrsRecognizer, RustfaceDetector,
    SearchConfig,
};

#[derive(Parser)]
#[command(name = "facegrid")]
#[command(about = "Find images mentioning a keyword and tile the faces in them into a mosaic")]
struct Cli {
    /// Folder of images to search
    #[arg(value_name = "FOLDER", default_value = "small_img")]
    folder: PathBuf,

    /// Keyword to search for (prompted for when omitted)
    #[arg(short, long)]
    keyword: Option<String>,

    /// Number of matching images to build mosaics for
    #[arg(long, default_value_t = 1, conflicts_with = "all")]
    max_results: usize,

    /// Build a mosaic for every matching image
    #[arg(long)]
    all: bool,

    /// Face detector score threshold (higher means fewer false positives)
    #[arg(long, default_value_t = 4.0)]
    sensitivity: f64,

    /// Smallest face size in pixels
    #[arg(long, default_value_t = 20)]
    min_face_size: u32,

    /// Keep images in color for text search instead of converting to grayscale
    #[arg(long)]
    color: bool,

    /// Directory the mosaics are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Directory holding text-detection.rten and text-recognition.rten
    #[arg(long, value_name = "DIR")]
    ocr_models: Option<PathBuf>,

    /// SeetaFace frontal face model file
    #[arg(long, value_name = "FILE")]
    face_model: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    facegrid::init_tracing(args.verbose);

    let keyword = match &args.keyword {
        Some(keyword) => validate_keyword(keyword)?,
        None => prompt_keyword(std::io::stdin().lock(), std::io::stdout())?,
    };

    let ocr_models = match args.ocr_models {
        Some(dir) => dir,
        None => ocr::default_models_dir()?,
    };
    let face_model = match args.face_model {
        Some(path) => path,
        None => faces::default_face_model_path()?,
    };

    let config = SearchConfig::new(&args.folder, keyword)
        .with_max_results((!args.all).then_some(args.max_results))
        .with_sensitivity(args.sensitivity)
        .with_min_face_size(args.min_face_size)
        .with_grayscale(!args.color)
        .with_debug_out(args.debug_out);

    let detector = RustfaceDetector::from_file(&face_model)?.with_min_face_size(config.min_face_size);
    let search = FaceSearch::new(
        config,
        Arc::new(OcrsRecognizer::new(ocr_models)),
        Arc::new(detector),
        Box::new(FilePresenter::new(args.output_dir)),
    );

    let report = match search.run() {
        Ok(report) => report,
        Err(err) => {
            if let Some(FacegridError::EmptyResult { keyword }) = err.downcast_ref() {
                println!("No images mention \"{keyword}\". Nothing to do.");
                return Ok(());
            }
            return Err(err);
        }
    };

    println!("\n=== Face Mosaic Results ===");
    println!(
        "Searched {} images, {} matched",
        report.loaded,
        report.matched.len()
    );
    for outcome in &report.outcomes {
        match outcome {
            ImageOutcome::Presented { path, faces } => {
                println!("  {}: mosaic of {} faces", path.display(), faces);
            }
            ImageOutcome::NoFaces { path } => {
                println!("  {}: no faces detected", path.display());
            }
        }
    }

    Ok(())
}
