pub mod batch;
pub mod color;
pub mod color_key_effect;
pub mod image_io;
pub mod subject_border_effect;

pub use batch::{BatchProcessor, BatchReport, FileOutcome};
pub use color::{BorderWidth, Color, Tolerance};
pub use color_key_effect::ColorKeyConfig;
pub use subject_border_effect::{BoundingBox, SubjectBorderConfig};

use image::RgbaImage;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image {path}: {reason}")]
    ImageWrite { path: PathBuf, reason: String },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No non-transparent pixels found")]
    NoSubjectFound,

    #[error("Image has no alpha channel, a transparent image is expected")]
    MissingAlpha,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait Effect {
    fn apply(&self, image: &mut RgbaImage) -> Result<()>;
}

/// One transformation of the pipeline, dispatched per input file.
#[derive(Debug, Clone)]
pub enum ImageJob {
    ColorKey(ColorKeyConfig),
    SubjectBorder(SubjectBorderConfig),
}

impl ImageJob {
    /// Suffix appended to the input stem for batch outputs.
    pub fn suffix(&self) -> &'static str {
        match self {
            ImageJob::ColorKey(_) => "_transparent",
            ImageJob::SubjectBorder(_) => "_bordered",
        }
    }

    pub fn requires_alpha(&self) -> bool {
        matches!(self, ImageJob::SubjectBorder(_))
    }

    /// Load `input`, transform it and write the PNG result to `output`.
    ///
    /// Nothing is written when any step fails.
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<()> {
        let decoded = image_io::load_image(input)?;

        if self.requires_alpha() && !decoded.color().has_alpha() {
            return Err(Error::MissingAlpha);
        }

        let mut image = decoded.into_rgba8();
        log::debug!(
            "{}: {}x{} pixels",
            input.display(),
            image.width(),
            image.height()
        );

        self.apply(&mut image)?;
        image_io::save_png(&image, output)
    }
}

impl Effect for ImageJob {
    fn apply(&self, image: &mut RgbaImage) -> Result<()> {
        match self {
            ImageJob::ColorKey(config) => config.apply(image),
            ImageJob::SubjectBorder(config) => config.apply(image),
        }
    }
}
