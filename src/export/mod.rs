//! Single-file and batch export.
//!
//! [`download_selected_logos`] is the entry point a UI calls: no entries is a
//! failure, one entry is saved directly, and two or more are bundled into a
//! zip archive. PNG conversions that fail inside a batch are counted in
//! [`ExportResult::failed`] and do not abort the batch.
//!
//! ```
//! use bank_logo_studio::export::{ExportFormat, MemoryTarget, download_selected_logos};
//!
//! let logo = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0h24v24H0z"/></svg>"#;
//! let mut target = MemoryTarget::new();
//!
//! let result = download_selected_logos(&[("banco-itau", logo)], 64, ExportFormat::Svg, &mut target);
//! assert!(result.success);
//! assert_eq!(target.files[0].name, "banco-itau-64px.svg");
//! ```

pub mod raster;
pub mod target;

pub use raster::{rasterize_png, svg_to_png};
pub use target::{DirectoryTarget, MemoryTarget, SaveTarget};

use std::fmt;
use std::io::{Cursor, Write};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::svg::create_webflow_optimized_svg;

/// Media type of zip archives.
pub const ZIP_MEDIA_TYPE: &str = "application/zip";

// ============================================================================
// Types
// ============================================================================

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Svg,
    Png,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A named blob ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn new(name: impl Into<String>, format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: format.media_type(),
            bytes,
        }
    }
}

/// Outcome of an export call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub success: bool,
    /// Files exported.
    pub count: usize,
    /// PNG conversions that failed.
    pub failed: usize,
}

impl ExportResult {
    pub(crate) fn failure(failed: usize) -> Self {
        Self {
            success: false,
            count: 0,
            failed,
        }
    }
}

/// Batch export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    /// Folder inside the archive that holds the files.
    pub archive_folder: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            archive_folder: "logos".to_string(),
        }
    }
}

// ============================================================================
// Naming
// ============================================================================

/// `{id}-{size}px.{ext}`
pub fn file_name(id: &str, size: u32, format: ExportFormat) -> String {
    format!("{id}-{size}px.{}", format.extension())
}

/// `logos-{size}px-{ext}.zip`
pub fn archive_name(size: u32, format: ExportFormat) -> String {
    format!("logos-{size}px-{}.zip", format.extension())
}

// ============================================================================
// Export
// ============================================================================

/// Produces the export file for one logo: optimized markup for SVG, a
/// rasterized image for PNG.
///
/// Returns `None` only when PNG conversion fails.
pub fn render_file(id: &str, markup: &str, size: u32, format: ExportFormat) -> Option<ExportFile> {
    let bytes = match format {
        ExportFormat::Svg => create_webflow_optimized_svg(markup).into_bytes(),
        ExportFormat::Png => svg_to_png(markup, size)?,
    };
    Some(ExportFile::new(file_name(id, size, format), format, bytes))
}

/// Hands `file` to `target`, logging a failure. Returns true on success.
pub fn download_file(file: ExportFile, target: &mut dyn SaveTarget) -> bool {
    let name = file.name.clone();
    match target.save(file) {
        Ok(()) => true,
        Err(error) => {
            error!(%error, file = %name, "could not save export");
            false
        }
    }
}

/// Exports one logo directly, without an archive.
pub fn download_single(
    id: &str,
    markup: &str,
    size: u32,
    format: ExportFormat,
    target: &mut dyn SaveTarget,
) -> ExportResult {
    let Some(file) = render_file(id, markup, size, format) else {
        warn!(id, "png conversion failed, nothing to download");
        return ExportResult::failure(1);
    };
    if download_file(file, target) {
        ExportResult {
            success: true,
            count: 1,
            failed: 0,
        }
    } else {
        ExportResult::failure(0)
    }
}

/// Zip archive of every entry, plus `(written, failed)` counts.
///
/// Entries land under `options.archive_folder`. Failed PNG conversions are
/// skipped and counted.
pub fn build_archive(
    entries: &[(&str, &str)],
    size: u32,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<(Vec<u8>, usize, usize)> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let file_options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let (mut written, mut failed) = (0, 0);
    for (id, markup) in entries {
        let Some(file) = render_file(id, markup, size, format) else {
            warn!(id, "png conversion failed, skipping in archive");
            failed += 1;
            continue;
        };
        zip.start_file(format!("{}/{}", options.archive_folder, file.name), file_options)?;
        zip.write_all(&file.bytes)?;
        written += 1;
    }

    let bytes = zip.finish()?.into_inner();
    Ok((bytes, written, failed))
}

/// Bundles every entry into one archive and saves it.
pub fn download_batch(
    entries: &[(&str, &str)],
    size: u32,
    format: ExportFormat,
    options: &ExportOptions,
    target: &mut dyn SaveTarget,
) -> ExportResult {
    let (bytes, written, failed) = match build_archive(entries, size, format, options) {
        Ok(archive) => archive,
        Err(error) => {
            error!(%error, "could not build archive");
            return ExportResult::failure(0);
        }
    };

    if failed > 0 {
        warn!(failed, written, "some logos could not be converted");
    }

    let archive = ExportFile {
        name: archive_name(size, format),
        media_type: ZIP_MEDIA_TYPE,
        bytes,
    };
    let saved = download_file(archive, target);
    info!(written, failed, format = %format, "batch export finished");

    ExportResult {
        success: saved && written > 0,
        count: if saved { written } else { 0 },
        failed,
    }
}

/// Exports the selected logos: nothing for zero entries, a direct download
/// for one, an archive for more.
pub fn download_selected_logos(
    entries: &[(&str, &str)],
    size: u32,
    format: ExportFormat,
    target: &mut dyn SaveTarget,
) -> ExportResult {
    download_selected_logos_with(entries, size, format, &ExportOptions::default(), target)
}

/// [`download_selected_logos`] with explicit batch options.
pub fn download_selected_logos_with(
    entries: &[(&str, &str)],
    size: u32,
    format: ExportFormat,
    options: &ExportOptions,
    target: &mut dyn SaveTarget,
) -> ExportResult {
    match entries {
        [] => ExportResult::failure(0),
        [(id, markup)] => download_single(id, markup, size, format, target),
        _ => download_batch(entries, size, format, options, target),
    }
}
