use clap::{ArgGroup, Parser};
use std::error::Error;
use std::path::{Path, PathBuf};

use red_roi::batch::{BATCH_DIR, discover_images, process_images};
use red_roi::roi::hsv::{DEFAULT_LOWER, DEFAULT_UPPER};
use red_roi::roi::{HsvPixel, HsvRange, RoiConfig, mask_image_file};

#[derive(Parser, Debug)]
#[command(
    name = "cover_red",
    about = "Black out everything outside the red ellipse marker of an image",
    version,
    group(
        ArgGroup::new("mode")
            .required(true)
            .args(["image", "batch"])
    )
)]
struct Cli {
    /// Image to process
    image: Option<PathBuf>,

    /// Process every unprocessed image in the `red_circle` directory
    #[arg(long)]
    batch: bool,

    /// Inclusive lower HSV bound (hue 0..=179, saturation and value 0..=255)
    #[arg(long, value_name = "H,S,V", default_value_t = DEFAULT_LOWER)]
    lower: HsvPixel,

    /// Inclusive upper HSV bound
    #[arg(long, value_name = "H,S,V", default_value_t = DEFAULT_UPPER)]
    upper: HsvPixel,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn run_single(path: &Path, config: &RoiConfig, json: bool) -> Result<(), Box<dyn Error>> {
    let outcome = mask_image_file(path, config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!(
            "Bounding-box (x_left, y_top, x_right, y_bottom): {}",
            outcome.bbox
        );
        println!("Masked image saved to: {}", outcome.output.display());
    }
    Ok(())
}

fn run_batch(dir: &Path, config: &RoiConfig, json: bool) -> Result<(), Box<dyn Error>> {
    let images = discover_images(dir, config)?;

    if !json {
        if images.is_empty() {
            println!("No image files found in {}", dir.display());
            return Ok(());
        }
        println!("Found {} images to process...", images.len());
    }

    let report = process_images(dir, &images, config, |path, result| {
        if json {
            return;
        }
        match result {
            Ok(outcome) => println!(
                "✓ {}: bbox={}, saved to {}",
                file_name(path),
                outcome.bbox,
                file_name(&outcome.output)
            ),
            Err(e) => println!("✗ {}: Error - {e}", file_name(path)),
        }
    });

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "\nProcessing complete! Successfully processed {}/{} images.",
        report.succeeded, report.total
    );
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = RoiConfig::with_range(HsvRange::new(cli.lower, cli.upper)?);

    if cli.batch {
        return run_batch(Path::new(BATCH_DIR), &config, cli.json);
    }

    match cli.image {
        Some(path) => run_single(&path, &config, cli.json),
        None => Err("either an image path or --batch is required".into()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
