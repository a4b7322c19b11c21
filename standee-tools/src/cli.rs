use crate::config::Config;
use anyhow::Result;
use clap::{Args, Parser, ValueHint};
use image_matte::{
    BatchProcessor, BorderWidth, Color, ColorKeyConfig, ImageJob, SubjectBorderConfig, Tolerance,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct Source {
    /// Input image file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Input directory containing images
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub directory: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CommonArgs {
    #[command(flatten)]
    pub source: Source,

    /// Output file path (single image) or directory (batch)
    #[arg(short, long, value_hint = ValueHint::AnyPath)]
    pub output: PathBuf,

    /// Number of parallel workers in directory mode, 0 = one per CPU
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// TOML file with default settings
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn batch_processor(&self, config: &Config) -> BatchProcessor {
        BatchProcessor::new()
            .with_jobs(self.jobs.unwrap_or(config.batch.jobs))
            .with_extensions(config.batch.extensions.clone())
    }
}

/// Make a background color transparent.
#[derive(Parser, Debug)]
#[command(name = "color-key", version, about, long_about = None)]
pub struct ColorKeyArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Background color to remove, hex format [default: #8DC5FE]
    #[arg(short, long)]
    pub color: Option<String>,

    /// Maximum RGB distance treated as background, 0-255 [default: 30]
    #[arg(short, long)]
    pub tolerance: Option<i64>,
}

impl ColorKeyArgs {
    pub fn job(&self, config: &Config) -> Result<ImageJob> {
        let color: Color = self
            .color
            .as_deref()
            .unwrap_or(config.color_key.color.as_str())
            .parse()?;
        let tolerance = Tolerance::try_from(self.tolerance.unwrap_or(config.color_key.tolerance))?;

        Ok(ImageJob::ColorKey(
            ColorKeyConfig::new()
                .with_color(color)
                .with_tolerance(tolerance),
        ))
    }
}

/// Draw a border around the non-transparent subject of transparent images.
#[derive(Parser, Debug)]
#[command(name = "subject-border", version, about, long_about = None)]
pub struct SubjectBorderArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Border color, hex format [default: #FF0000]
    #[arg(short, long)]
    pub color: Option<String>,

    /// Border width in pixels, 1-100 [default: 2]
    #[arg(short, long)]
    pub width: Option<i64>,
}

impl SubjectBorderArgs {
    pub fn job(&self, config: &Config) -> Result<ImageJob> {
        let color: Color = self
            .color
            .as_deref()
            .unwrap_or(config.subject_border.color.as_str())
            .parse()?;
        let width = BorderWidth::try_from(self.width.unwrap_or(config.subject_border.width))?;

        Ok(ImageJob::SubjectBorder(
            SubjectBorderConfig::new().with_color(color).with_width(width),
        ))
    }
}
