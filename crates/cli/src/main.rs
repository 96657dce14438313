mod menu;

use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use facetag_core::annotate::frame_annotator::FrameAnnotator;
use facetag_core::capture::domain::frame_source::FrameSource;
use facetag_core::capture::infrastructure::camera_source::CameraSource;
use facetag_core::capture::infrastructure::image_file_source::ImageFileSource;
use facetag_core::capture::infrastructure::synthetic_source::SyntheticSource;
use facetag_core::classification::infrastructure::heuristic_gender_classifier::HeuristicGenderClassifier;
use facetag_core::classification::infrastructure::onnx_gender_classifier::OnnxGenderClassifier;
use facetag_core::detection::infrastructure::onnx_face_detector::OnnxFaceDetector;
use facetag_core::detection::infrastructure::skin_window_detector::SkinWindowDetector;
use facetag_core::io::domain::image_writer::ImageWriter;
use facetag_core::io::infrastructure::image_file_writer::ImageFileWriter;
use facetag_core::io::snapshot_writer::SnapshotWriter;
use facetag_core::pipeline::analyze_use_case::AnalyzeFrameUseCase;
use facetag_core::pipeline::report::format_report;
use facetag_core::shared::config::Config;
use facetag_core::shared::constants::{
    FACE_MODEL_NAME, FACE_MODEL_URL, GENDER_MODEL_NAME, GENDER_MODEL_URL,
};
use facetag_core::shared::model_resolver;

use crate::menu::MenuLoop;

/// Face detection and gender labeling for webcam frames and images.
#[derive(Parser)]
#[command(name = "facetag")]
struct Cli {
    /// Analysis engine: pretrained models or the pixel heuristics.
    #[arg(long, value_enum, default_value = "heuristic")]
    engine: Engine,

    /// JSON configuration file (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory with pre-downloaded model files.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Engine {
    /// ONNX face detector + gender network.
    Model,
    /// Skin-window detector + four-feature rulebook.
    Heuristic,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a single image file and print the result table.
    Analyze {
        image: PathBuf,

        /// Also write an annotated copy here.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Grab one webcam frame, analyze it, print the result table.
    Capture {
        /// Save an annotated snapshot of the frame.
        #[arg(long)]
        save: bool,

        /// Where snapshots land.
        #[arg(long, default_value = ".")]
        snapshot_dir: PathBuf,
    },
    /// Interactive numbered menu (capture, analyze file, exit).
    Menu,
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

    match cli.command {
        Command::Analyze { ref image, ref output } => {
            run_analyze(&cli, &config, image, output.as_deref())
        }
        Command::Capture {
            save,
            ref snapshot_dir,
        } => run_capture(&cli, &config, save, snapshot_dir),
        Command::Menu => run_menu(&cli, &config),
    }
}

fn run_analyze(
    cli: &Cli,
    config: &Config,
    image: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = ImageFileSource::open(image)?;
    let frame = source.next_frame()?;

    let mut use_case = build_use_case(cli, config)?;
    let analyses = use_case.execute(&frame)?;
    print!("{}", format_report(&analyses));

    if let Some(path) = output {
        let mut annotated = frame.clone();
        FrameAnnotator::default().annotate(&mut annotated, &analyses);
        ImageFileWriter::new().write(path, &annotated)?;
        log::info!("annotated copy written to {}", path.display());
    }

    Ok(())
}

fn run_capture(
    cli: &Cli,
    config: &Config,
    save: bool,
    snapshot_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = CameraSource::open(&config.capture)?;
    let frame = source.next_frame()?;

    let mut use_case = build_use_case(cli, config)?;
    let analyses = use_case.execute(&frame)?;
    print!("{}", format_report(&analyses));

    if save {
        let mut annotated = frame.clone();
        FrameAnnotator::default().annotate(&mut annotated, &analyses);
        let mut snapshots = SnapshotWriter::new(snapshot_dir, Box::new(ImageFileWriter::new()));
        let path = snapshots.save(&annotated)?;
        println!("Saved {}", path.display());
    }

    Ok(())
}

fn run_menu(cli: &Cli, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // The menu keeps running without a camera; the synthetic pattern
    // stands in so the flow stays usable.
    let source: Box<dyn FrameSource> = match CameraSource::open(&config.capture) {
        Ok(camera) => Box::new(camera),
        Err(e) => {
            log::warn!("camera unavailable, using synthetic test pattern: {e}");
            Box::new(SyntheticSource::default())
        }
    };

    let use_case = build_use_case(cli, config)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    MenuLoop::new(source, use_case).run(&mut stdin.lock(), &mut stdout.lock())?;
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

fn resolve_model(name: &str, url: &str, cli: &Cli) -> Result<PathBuf, Box<dyn std::error::Error>> {
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
