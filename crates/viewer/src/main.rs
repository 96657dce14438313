mod app;
mod worker;

use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use facetag_core::capture::domain::frame_source::FrameSource;
use facetag_core::capture::infrastructure::camera_source::CameraSource;
use facetag_core::classification::infrastructure::heuristic_gender_classifier::HeuristicGenderClassifier;
use facetag_core::classification::infrastructure::onnx_gender_classifier::OnnxGenderClassifier;
use facetag_core::detection::infrastructure::onnx_face_detector::OnnxFaceDetector;
use facetag_core::detection::infrastructure::skin_window_detector::SkinWindowDetector;
use facetag_core::io::infrastructure::image_file_writer::ImageFileWriter;
use facetag_core::io::snapshot_writer::SnapshotWriter;
use facetag_core::pipeline::analyze_use_case::AnalyzeFrameUseCase;
use facetag_core::shared::config::Config;
use facetag_core::shared::constants::{
    FACE_MODEL_NAME, FACE_MODEL_URL, GENDER_MODEL_NAME, GENDER_MODEL_URL,
};
use facetag_core::shared::model_resolver;

use crate::app::ViewerApp;

/// Live webcam window with face boxes and gender labels.
#[derive(Parser)]
#[command(name = "facetag-live")]
struct Cli {
    /// Analysis engine: pretrained models or the pixel heuristics.
    #[arg(long, value_enum, default_value = "model")]
    engine: Engine,

    /// JSON configuration file (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory with pre-downloaded model files.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Where `S` saves snapshots.
    #[arg(long, default_value = ".")]
    snapshot_dir: PathBuf,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Engine {
    Model,
    Heuristic,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // The live window needs a real camera; there is no synthetic fallback
    // here, unlike the menu flow.
    let source = CameraSource::open(&config.capture)?;
    let (width, height) = source.resolution();
    let use_case = build_use_case(&cli, &config)?;

    let stop = Arc::new(AtomicBool::new(false));
    let rx = worker::spawn(Box::new(source), use_case, stop.clone());
    let snapshots = SnapshotWriter::new(&cli.snapshot_dir, Box::new(ImageFileWriter::new()));
    let viewer = ViewerApp::new(rx, stop.clone(), snapshots);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("facetag live")
            .with_inner_size([width as f32, height as f32 + 40.0]),
        ..Default::default()
    };
    let result = eframe::run_native(
        "facetag live",
        options,
        Box::new(move |_cc| Ok(Box::new(viewer))),
    );
    stop.store(true, Ordering::Relaxed);
    result.map_err(|e| format!("viewer failed: {e}"))?;
    Ok(())
}

fn build_use_case(
    cli: &Cli,
    config: &Config,
) -> Result<AnalyzeFrameUseCase, Box<dyn std::error::Error>> {
    match cli.engine {
        Engine::Heuristic => Ok(AnalyzeFrameUseCase::new(
            Box::new(SkinWindowDetector::new(config.detector.clone())),
            Box::new(HeuristicGenderClassifier::new(config.classifier.clone())),
        )),
        Engine::Model => {
            let face_model = resolve_model(FACE_MODEL_NAME, FACE_MODEL_URL, cli)?;
            let gender_model = resolve_model(GENDER_MODEL_NAME, GENDER_MODEL_URL, cli)?;
            Ok(AnalyzeFrameUseCase::new(
                Box::new(OnnxFaceDetector::new(
                    &face_model,
                    config.detector.confidence,
                )?),
                Box::new(OnnxGenderClassifier::new(&gender_model)?),
            ))
        }
    }
}

fn resolve_model(
    name: &str,
    url: &str,
    cli: &Cli,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {name}");
    let path = model_resolver::resolve(
        name,
        url,
        cli.model_dir.as_deref(),
        Some(Box::new(download_progress)),
    )?;
    eprintln!();
    Ok(path)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model... {pct}%");
    } else {
        eprint!("\rDownloading model... {downloaded} bytes");
    }
}
