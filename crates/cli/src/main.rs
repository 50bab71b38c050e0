use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use duker_core::detection::domain::face_detector::FaceDetector;
use duker_core::detection::infrastructure::cascade_face_detector::{
    CascadeFaceDetector, DetectorSettings,
};
use duker_core::detection::infrastructure::model_resolver;
use duker_core::messaging::domain::queue_message::QueueMessage;
use duker_core::messaging::infrastructure::listener_pool::ListenerPool;
use duker_core::pipeline::duke_image_use_case::{DukeImageUseCase, OutputFormat};
use duker_core::shared::constants::{
    DEFAULT_MIN_FACE_SIZE, DEFAULT_SCORE_THRESH, IMAGE_EXTENSIONS, MAX_LISTENER_CONCURRENCY,
    SEETA_MODEL_NAME, SEETA_MODEL_URL,
};

/// Paint Duke masks over the faces in images.
#[derive(Parser)]
#[command(name = "duker")]
struct Cli {
    /// Cascade classifier model file (downloaded to the cache when omitted).
    #[arg(long, global = true)]
    classifier_file: Option<PathBuf>,

    /// Smallest face size to detect, in pixels (at least 20).
    #[arg(long, global = true, default_value_t = DEFAULT_MIN_FACE_SIZE)]
    min_face_size: u32,

    /// Cascade score threshold (must be positive).
    #[arg(long, global = true, default_value_t = DEFAULT_SCORE_THRESH)]
    score_thresh: f64,

    /// Number of queue listeners (1-5).
    #[arg(long, global = true, default_value_t = MAX_LISTENER_CONCURRENCY)]
    workers: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mask the faces in one image and write the result.
    Convert {
        /// Input image file.
        input: PathBuf,

        /// Output image file.
        output: PathBuf,

        /// Output format: same, png or jpeg.
        #[arg(long, default_value = "same")]
        format: String,
    },
    /// Queue images for background masking; results are discarded.
    Queue {
        /// Image files or directories of images.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Queue a text message for the listeners to log.
    #[command(name = "send")]
    SendMessage {
        /// Message body.
        msg: String,
    },
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
    validate(&cli)?;

    match &cli.command {
        Command::Convert {
            input,
            output,
            format,
        } => {
            let format = OutputFormat::parse(format)
                .ok_or_else(|| format!("Unknown output format '{format}'"))?;
            let use_case = DukeImageUseCase::new(build_detector(&cli)?, format);
            run_convert(input, output, &use_case)
        }
        Command::Queue { inputs } => {
            let files = collect_images(inputs)?;
            let use_case = DukeImageUseCase::new(build_detector(&cli)?, OutputFormat::default());
            run_queue(&files, Arc::new(use_case), cli.workers)
        }
        Command::SendMessage { msg } => {
            let pool = ListenerPool::start_text_only(cli.workers);
            pool.send(QueueMessage::Hello(msg.clone()))?;
            pool.shutdown();
            println!("OK");
            Ok(())
        }
    }
}

fn run_convert(
    input: &Path,
    output: &Path,
    use_case: &DukeImageUseCase,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = fs::read(input)?;
    let processed = use_case.process(&raw)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, processed)?;
    log::info!("Output written to {}", output.display());
    Ok(())
}

fn run_queue(
    files: &[PathBuf],
    use_case: Arc<DukeImageUseCase>,
    workers: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = ListenerPool::start(use_case, workers);
    for path in files {
        let raw = fs::read(path)?;
        pool.send(QueueMessage::FaceConverter(raw))?;
        log::info!("Queued {}", path.display());
    }
    println!("OK");

    let stats = pool.shutdown();
    eprintln!(
        "Processed {} images ({} failed)",
        stats.converted + stats.failed,
        stats.failed
    );
    Ok(())
}

fn build_detector(cli: &Cli) -> Result<Arc<dyn FaceDetector>, Box<dyn std::error::Error>> {
    log::info!("Resolving classifier: {SEETA_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        cli.classifier_file.as_deref(),
        SEETA_MODEL_NAME,
        SEETA_MODEL_URL,
        Some(Box::new(download_progress)),
    )?;

    let settings = DetectorSettings {
        min_face_size: cli.min_face_size,
        score_thresh: cli.score_thresh,
        ..DetectorSettings::default()
    };
    Ok(Arc::new(CascadeFaceDetector::load(&model_path, settings)?))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.min_face_size < DEFAULT_MIN_FACE_SIZE {
        return Err(format!(
            "Min face size must be at least {DEFAULT_MIN_FACE_SIZE}, got {}",
            cli.min_face_size
        )
        .into());
    }
    if cli.score_thresh.is_nan() || cli.score_thresh <= 0.0 {
        return Err(format!("Score threshold must be positive, got {}", cli.score_thresh).into());
    }
    if !(1..=MAX_LISTENER_CONCURRENCY).contains(&cli.workers) {
        return Err(format!(
            "Workers must be between 1 and {MAX_LISTENER_CONCURRENCY}, got {}",
            cli.workers
        )
        .into());
    }
    match &cli.command {
        Command::Convert { input, format, .. } => {
            if !input.exists() {
                return Err(format!("Input file not found: {}", input.display()).into());
            }
            if OutputFormat::parse(format).is_none() {
                return Err(format!(
                    "Output format must be 'same', 'png' or 'jpeg', got '{format}'"
                )
                .into());
            }
        }
        Command::Queue { inputs } => {
            if let Some(missing) = inputs.iter().find(|p| !p.exists()) {
                return Err(format!("Input not found: {}", missing.display()).into());
            }
        }
        Command::SendMessage { .. } => {}
    }
    Ok(())
}

/// Expands directories into the image files they contain, sorted by name.
fn collect_images(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_image(p))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    if files.is_empty() {
        return Err("No images to queue".into());
    }
    Ok(files)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading classifier model... {pct}%");
    } else {
        eprint!("\rDownloading classifier model... {downloaded} bytes");
    }
}
