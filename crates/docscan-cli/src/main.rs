// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan — photograph of a page in, straightened page and its text out.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use docscan_core::ScanConfig;
use docscan_core::error::ScanError;
use docscan_core::human_errors::humanize_error;
use docscan_core::types::Quad;
use docscan_document::{DocumentScanner, TextRecognizer};
use docscan_document::image::loader;

#[derive(Parser)]
#[command(name = "docscan")]
#[command(about = "Detect, straighten and read a document in a photo")]
struct Cli {
    /// Path to the photo
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// JSON configuration file (defaults are used when omitted)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding text-detection.rten and text-recognition.rten
    #[arg(long, value_name = "DIR")]
    model_dir: Option<PathBuf>,

    /// Save the edge map
    #[arg(long, value_name = "PNG")]
    edges_out: Option<PathBuf>,

    /// Save the photo with the detected outline drawn on it
    #[arg(long, value_name = "PNG")]
    outline_out: Option<PathBuf>,

    /// Save the perspective-corrected page
    #[arg(long, value_name = "PNG")]
    rectified_out: Option<PathBuf>,

    /// Save the thresholded page handed to OCR
    #[arg(long, value_name = "PNG")]
    enhanced_out: Option<PathBuf>,

    /// Write recognised text to a file instead of only printing it
    #[arg(long, value_name = "TXT")]
    text_out: Option<PathBuf>,

    /// Stop after enhancement; do not load OCR models
    #[arg(long)]
    skip_ocr: bool,

    /// Print a JSON summary of the scan instead of the raw text
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ScanConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ScanConfig::default(),
    };
    let model_dir = cli.model_dir.clone().or_else(|| config.ocr.model_dir.clone());

    let photo = loader::open(&cli.image_path)?;
    tracing::info!(
        path = %cli.image_path.display(),
        width = photo.width(),
        height = photo.height(),
        "Photo loaded"
    );

    let scanner = DocumentScanner::new(config)?;

    // The edge map is written before detection so it is available even when
    // no outline is found.
    let edges = scanner.edge_map(&photo);
    if let Some(path) = &cli.edges_out {
        edges
            .save(path)
            .with_context(|| format!("saving edge map to {}", path.display()))?;
    }

    let mut output = scanner.scan_with_edges(&photo, edges)?;

    if let Some(path) = &cli.outline_out {
        draw_outline(&photo, &output.quad)
            .save(path)
            .with_context(|| format!("saving outline to {}", path.display()))?;
    }
    if let Some(path) = &cli.rectified_out {
        output
            .rectified
            .save(path)
            .with_context(|| format!("saving rectified page to {}", path.display()))?;
    }
    if let Some(path) = &cli.enhanced_out {
        output
            .enhanced
            .save(path)
            .with_context(|| format!("saving enhanced page to {}", path.display()))?;
    }

    // Models load only once a page has been found and its images are saved.
    if !cli.skip_ocr {
        if let Some(recognizer) = load_recognizer(model_dir)? {
            output.text = Some(recognizer.recognize_text(&output.enhanced)?);
        }
    }

    if let (Some(path), Some(text)) = (&cli.text_out, &output.text) {
        std::fs::write(path, text).with_context(|| format!("writing text to {}", path.display()))?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output.summary())?);
    } else if let Some(text) = &output.text {
        println!("{text}");
    }
    Ok(())
}

#[cfg(feature = "ocr")]
fn load_recognizer(model_dir: Option<PathBuf>) -> anyhow::Result<Option<Box<dyn TextRecognizer>>> {
    use docscan_document::scan::ocr::default_model_dir;

    let dir = model_dir.unwrap_or_else(default_model_dir);
    let engine = docscan_document::OcrEngine::from_model_dir(&dir)?;
    Ok(Some(Box::new(engine)))
}

#[cfg(not(feature = "ocr"))]
fn load_recognizer(_model_dir: Option<PathBuf>) -> anyhow::Result<Option<Box<dyn TextRecognizer>>> {
    tracing::warn!("Built without the `ocr` feature; text recognition is skipped");
    Ok(None)
}

/// Copy of `photo` with the quadrilateral traced in green.
fn draw_outline(photo: &RgbImage, quad: &Quad) -> RgbImage {
    let mut canvas = photo.clone();
    let corners = quad.ordered().as_array();
    for i in 0..corners.len() {
        let next = corners[(i + 1) % corners.len()];
        // Two adjacent one-pixel lines give a visible stroke.
        for offset in [0.0, 1.0] {
            draw_line_segment_mut(
                &mut canvas,
                (corners[i].0 + offset, corners[i].1),
                (next.0 + offset, next.1),
                Rgb([0, 255, 0]),
            );
        }
    }
    canvas
}

/// Print a failure for a person: plain message and suggestion for scan
/// errors, the full context chain for everything else.
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<ScanError>() {
        Some(scan_err) => {
            let human = humanize_error(scan_err);
            eprintln!("{}", human.message);
            eprintln!("{}", human.suggestion);
            tracing::debug!(error = %scan_err, "Scan failed");
        }
        None => eprintln!("error: {err:#}"),
    }
}
