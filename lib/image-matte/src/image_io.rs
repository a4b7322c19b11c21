//! Reading inputs, writing PNG outputs and locating batch files.

use crate::{Error, Result};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader, RgbaImage};
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Extensions picked up in directory mode when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "bmp"];

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let load_error = |source: ImageError| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    };

    ImageReader::open(path)
        .map_err(|e| load_error(ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| load_error(ImageError::IoError(e)))?
        .decode()
        .map_err(load_error)
}

/// Encode `image` as PNG at `path`, creating missing parent directories.
///
/// The bytes go to a temporary file next to `path` that is renamed into place
/// once fully written, so a failed call leaves nothing behind.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let write_error = |reason: String| Error::ImageWrite {
        path: path.to_path_buf(),
        reason,
    };

    if path.file_name().is_none() {
        return Err(write_error("path has no file name".to_string()));
    }

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| write_error(e.to_string()))?;

    let tmp = tempfile::Builder::new()
        .prefix(".matte-")
        .suffix(".png.tmp")
        .tempfile_in(dir)
        .map_err(|e| write_error(e.to_string()))?;

    let mut writer = BufWriter::new(tmp);
    image
        .write_to(&mut writer, ImageFormat::Png)
        .map_err(|e| write_error(e.to_string()))?;
    writer.flush().map_err(|e| write_error(e.to_string()))?;

    let tmp = writer
        .into_inner()
        .map_err(|e| write_error(e.error().to_string()))?;
    tmp.persist(path)
        .map_err(|e| write_error(e.error.to_string()))?;

    Ok(())
}

/// `<out_dir>/<stem><suffix>.png`
pub fn output_path(input: &Path, out_dir: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    out_dir.join(format!("{stem}{suffix}.png"))
}

pub fn has_png_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// Regular files directly inside `dir` whose extension matches one of
/// `extensions` (case-insensitive), sorted by path.
pub fn list_images<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            if !path.is_file() {
                return None;
            }

            let ext = path.extension()?.to_str()?;
            extensions
                .iter()
                .any(|allowed| allowed.as_ref().eq_ignore_ascii_case(ext))
                .then_some(path)
        })
        .collect();

    files.sort();
    Ok(files)
}
