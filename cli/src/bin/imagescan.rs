use clap::{Parser, Subcommand};
use cli::ScanConfig;
use color_eyre::eyre::{eyre, Result};
use scan::{DetectionReport, Pipeline, PipelineBuilder, RegionSet, ScanCommand, ScanManager, ScanOutput};
use scan_common::utils;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count objects in one or more images
    Count {
        /// Images to scan
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Path to a TOML or JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
        /// Write each image with detected bounding boxes drawn into this directory
        #[arg(long)]
        overlay_dir: Option<PathBuf>,
    },
    /// Report the dominant color of an image
    Color {
        image: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Write a binarized copy of an image suitable for OCR
    PrepareOcr {
        image: PathBuf,
        /// Output image path
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run a JSON-encoded command against an image
    Exec {
        image: PathBuf,
        /// e.g. '{"type": "count_objects_with", "params": {"min_area": 300, "area_tolerance": 100}}'
        #[arg(long)]
        command: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output path for commands that produce an image
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Answer an arithmetic question, e.g. "Quanto é 2 + 2?"
    Ask {
        question: String,
        /// Recognized text the question may refer to
        #[arg(long, conflicts_with = "text_file")]
        text: Option<String>,
        /// Read the recognized text from a file
        #[arg(long)]
        text_file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// List available commands with their JSON schema
    Commands,
    /// Write a configuration file with default values
    InitConfig {
        /// Destination (.toml or .json)
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Serialize)]
struct ImageReport {
    path: String,
    #[serde(flatten)]
    report: DetectionReport,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Count { images, config, json, overlay_dir } => {
            let config = ScanConfig::load_or_default(config.as_ref())?;
            count_images(images, &config, *json, overlay_dir.as_deref()).await?;
        }
        Commands::Color { image, config, json } => {
            let config = ScanConfig::load_or_default(config.as_ref())?;
            let output = execute_on_file(&config, image, ScanCommand::DominantColor).await?;
            print_output(&output, *json, None)?;
        }
        Commands::PrepareOcr { image, output, config } => {
            let config = ScanConfig::load_or_default(config.as_ref())?;
            let result = execute_on_file(&config, image, ScanCommand::PrepareForOcr).await?;
            print_output(&result, false, Some(output))?;
        }
        Commands::Exec { image, command, config, output } => {
            let config = ScanConfig::load_or_default(config.as_ref())?;
            let command: ScanCommand = serde_json::from_str(command)?;
            let result = execute_on_file(&config, image, command).await?;
            print_output(&result, true, output.as_deref())?;
        }
        Commands::Ask { question, text, text_file, json } => {
            let extracted_text = match text_file {
                Some(path) => Some(std::fs::read_to_string(path)?),
                None => text.clone(),
            };
            let command = ScanCommand::AnswerQuestion { question: question.clone(), extracted_text };
            let output = ScanManager::new().execute(command)?;
            print_output(&output, *json, None)?;
        }
        Commands::Commands => list_commands()?,
        Commands::InitConfig { output } => {
            ScanConfig::default().to_file(output)?;
            info!("✅ Default configuration written to {:?}", output);
        }
    }

    Ok(())
}

/// Detect regions in every image on the blocking pool, reporting in input order
async fn count_images(
    images: &[PathBuf],
    config: &ScanConfig,
    json: bool,
    overlay_dir: Option<&Path>,
) -> Result<()> {
    let pipeline = Arc::new(PipelineBuilder::build_with_config(&config.detector));

    if let Some(dir) = overlay_dir {
        utils::ensure_output_dir(&dir.to_string_lossy())?;
    }

    let tasks: Vec<_> = images
        .iter()
        .cloned()
        .map(|path| {
            if !utils::is_image_file(&path.to_string_lossy()) {
                warn!("{:?} does not have a known image extension", path);
            }
            let pipeline = Arc::clone(&pipeline);
            let overlay = overlay_dir.map(|dir| overlay_path(dir, &path));
            tokio::task::spawn_blocking(move || detect_file(&pipeline, &path, overlay.as_deref()))
        })
        .collect();

    let mut reports = Vec::new();
    let mut failures = 0usize;

    for (path, task) in images.iter().zip(tasks) {
        match task.await? {
            Ok(regions) => {
                info!("{:?}: {}", path, regions.summary());
                if json {
                    reports.push(ImageReport {
                        path: path.to_string_lossy().to_string(),
                        report: regions.to_report(),
                    });
                } else {
                    println!("{}: {}", path.display(), regions.summary());
                }
            }
            Err(err) => {
                error!("Failed to scan {:?}: {}", path, err);
                failures += 1;
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    if failures > 0 {
        return Err(eyre!("{} of {} images failed", failures, images.len()));
    }

    info!("✅ Scanned {} images", images.len());
    Ok(())
}

fn detect_file(pipeline: &Pipeline, path: &Path, overlay: Option<&Path>) -> scan::Result<RegionSet> {
    let image = image::open(path)?.to_rgba8();
    let regions = pipeline.process(&image)?;

    if let Some(overlay) = overlay {
        regions.save_overlay(&image, overlay)?;
        info!("Overlay saved to {:?}", overlay);
    }

    Ok(regions)
}

/// `<dir>/<stem>_regions.png`
fn overlay_path(dir: &Path, image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    dir.join(format!("{}_regions.png", stem))
}

/// Load one image into a manager and run a command off the async runtime
async fn execute_on_file(config: &ScanConfig, image: &Path, command: ScanCommand) -> Result<ScanOutput> {
    let mut manager = config.manager();
    let image = image.to_path_buf();

    let output = tokio::task::spawn_blocking(move || {
        manager.load_image(&image)?;
        manager.execute(command)
    })
    .await??;

    Ok(output)
}

fn print_output(output: &ScanOutput, json: bool, destination: Option<&Path>) -> Result<()> {
    match output {
        ScanOutput::Regions(regions) if json => println!("{}", regions.to_json()?),
        ScanOutput::Color(color) if json => println!("{}", color.to_json()?),
        ScanOutput::Answer(answer) if json => println!("{}", serde_json::to_string_pretty(answer)?),
        ScanOutput::OcrImage(image) => {
            let destination = destination
                .ok_or_else(|| eyre!("This command produces an image; pass --output"))?;
            image.save(destination)?;
            info!("✅ {} saved to {:?}", output.summary(), destination);
        }
        _ => println!("{}", output.summary()),
    }
    Ok(())
}

fn list_commands() -> Result<()> {
    println!("Available commands:");
    for (i, name) in ScanCommand::command_names().iter().enumerate() {
        println!("   {}. {}", i + 1, name);
    }

    println!("\nCommand details:");
    for cmd in ScanCommand::examples() {
        println!("   {}", cmd);
        println!("     Description: {}", cmd.description());

        let params = cmd.parameters_info();
        if params.is_empty() {
            println!("     Parameters: None");
        } else {
            println!("     Parameters:");
            for (name, desc, required) in params {
                let req_marker = if required { "*" } else { " " };
                println!("       {}{}: {}", req_marker, name, desc);
            }
        }
        println!("     JSON: {}", serde_json::to_string(&cmd)?);
    }

    println!("\nJSON Schema for ScanCommand:");
    println!("{}", serde_json::to_string_pretty(&ScanCommand::schema())?);
    Ok(())
}
