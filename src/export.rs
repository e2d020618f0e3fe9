// src/export.rs
// Output format selection and image encoding for "save to file".

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use image::{DynamicImage, ImageBuffer, Rgba};
use serde::{Deserialize, Serialize};

use crate::error::CaptureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPEG",
        }
    }

    /// Case-insensitive lookup of a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            _ => None,
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            ExportFormat::Png => image::ImageFormat::Png,
            ExportFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// Where and how a capture will be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub path: PathBuf,
    pub format: ExportFormat,
    /// The extension was missing or unknown and `format` is the fallback.
    pub defaulted: bool,
}

/// Picks the format from the path's extension. Without a recognised one the
/// fallback's extension is appended, so `shot` becomes `shot.png` and
/// `shot.bmp` becomes `shot.bmp.png`. A trailing dot (`shot.`) is dropped first.
pub fn resolve_target(path: PathBuf, fallback: ExportFormat) -> ExportTarget {
    let known = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ExportFormat::from_extension);

    match known {
        Some(format) => ExportTarget { path, format, defaulted: false },
        None => {
            let base = match path.to_str() {
                Some(s) if s.ends_with('.') => PathBuf::from(s.trim_end_matches('.')),
                _ => path,
            };
            let mut name = base.into_os_string();
            name.push(".");
            name.push(fallback.extension());
            ExportTarget {
                path: PathBuf::from(name),
                format: fallback,
                defaulted: true,
            }
        }
    }
}

/// `screenshot-20240131-235959.png`
pub fn timestamp_file_name(at: NaiveDateTime, format: ExportFormat) -> String {
    format!("screenshot-{}.{}", at.format("%Y%m%d-%H%M%S"), format.extension())
}

pub fn timestamp_path(dir: &Path, at: NaiveDateTime, format: ExportFormat) -> PathBuf {
    dir.join(timestamp_file_name(at, format))
}

/// `path` if nothing is there yet, otherwise the first free `name-N.ext`.
pub fn next_free_path(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());
    let mut n = 1u32;
    loop {
        let name = match &ext {
            Some(ext) => format!("{stem}-{n}.{ext}"),
            None => format!("{stem}-{n}"),
        };
        let candidate = path.with_file_name(name);
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

pub fn write_image(
    image: &ImageBuffer<Rgba<u8>, Vec<u8>>,
    target: &ExportTarget,
) -> Result<(), CaptureError> {
    let result = match target.format {
        ExportFormat::Png => image.save_with_format(&target.path, target.format.image_format()),
        // JPEG has no alpha channel
        ExportFormat::Jpeg => DynamicImage::ImageRgba8(image.clone())
            .to_rgb8()
            .save_with_format(&target.path, target.format.image_format()),
    };
    result.map_err(|source| CaptureError::Write {
        path: target.path.clone(),
        source,
    })
}
