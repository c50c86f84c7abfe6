use crate::config::ImageSettings;
use crate::errors::ImageWarning;
use crate::progress::ProgressSink;
use crate::utils::{CellRange, CellRef};
use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use umya_spreadsheet::Worksheet;
use umya_spreadsheet::structs::Image;
use umya_spreadsheet::structs::drawing::spreadsheet::MarkerType;

/// Largest logo side accepted, in pixels
pub const MAX_LOGO_SIDE: u32 = 4096;

/// What happened to the logo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedOutcome {
    Embedded {
        anchor: String,
        width: u32,
        height: u32,
        merged: bool,
    },
    Skipped(ImageWarning),
}

/// Resized logo re-encoded as PNG
#[derive(Debug, Clone)]
pub struct PreparedLogo {
    pub name: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Height keeping the aspect ratio of `width` x `height` at `target_width`
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> Option<u32> {
    if width == 0 || height == 0 || target_width == 0 {
        return None;
    }
    let scaled = (f64::from(target_width) * f64::from(height) / f64::from(width)).round();
    Some((scaled as u32).max(1))
}

/// Locate the image file.
///
/// Absolute paths are taken as-is. Relative paths are tried against the working
/// directory first, then against the template's directory.
pub fn resolve_image_path(path: &Path, template_dir: Option<&Path>) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        return None;
    }
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    if path.is_absolute() {
        return None;
    }
    template_dir
        .map(|dir| dir.join(path))
        .filter(|candidate| candidate.is_file())
}

/// Decode, resize to `target_width` with Lanczos3, and re-encode as PNG in memory
pub fn prepare_logo(path: &Path, target_width: u32) -> Result<PreparedLogo, ImageWarning> {
    let original = image::open(path).map_err(|e| ImageWarning::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let (width, height) = original.dimensions();
    let invalid_size = ImageWarning::InvalidSize {
        width,
        height,
        target: target_width,
    };
    if target_width > MAX_LOGO_SIDE {
        return Err(invalid_size);
    }
    let target_height = scaled_height(width, height, target_width)
        .filter(|h| *h <= MAX_LOGO_SIDE)
        .ok_or(invalid_size)?;

    let resized = original.resize_exact(target_width, target_height, FilterType::Lanczos3);
    let mut bytes = Vec::new();
    resized
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ImageWarning::Encode(e.to_string()))?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("logo");

    ::log::debug!(
        "Resized {} from {}x{} to {}x{}",
        path.display(),
        width,
        height,
        target_width,
        target_height
    );

    Ok(PreparedLogo {
        name: format!("{}.png", stem),
        bytes,
        width: target_width,
        height: target_height,
    })
}

/// Embed the logo into `sheet`, anchored at the top-left cell of the merge range.
///
/// Every failure is reported through `progress` and returned as
/// [`EmbedOutcome::Skipped`]; nothing here aborts the run.
pub fn embed_logo(
    sheet: &mut Worksheet,
    settings: &ImageSettings,
    template_dir: Option<&Path>,
    progress: &mut dyn ProgressSink,
) -> EmbedOutcome {
    let Some(path) = resolve_image_path(&settings.path, template_dir) else {
        ::log::warn!("Logo {} not found", settings.path.display());
        progress.emit(&format!(
            "Image not found at '{}'; skipping logo.",
            settings.path.display()
        ));
        return EmbedOutcome::Skipped(ImageWarning::NotFound(settings.path.clone()));
    };

    if settings.merge_range.trim().is_empty() {
        let warning = ImageWarning::InvalidRange(settings.merge_range.clone());
        ::log::warn!("No logo cell range configured");
        progress.emit("No cell range configured for the logo; skipping logo.");
        return EmbedOutcome::Skipped(warning);
    }

    let logo = match prepare_logo(&path, settings.width_px) {
        Ok(logo) => logo,
        Err(warning) => return skip(warning, progress),
    };

    let (anchor, merged) = match CellRange::parse(&settings.merge_range) {
        Some(range) => (range.start, merge(sheet, &range)),
        None => {
            let warning = ImageWarning::InvalidRange(settings.merge_range.clone());
            ::log::warn!("{}", warning);
            progress.emit(&format!(
                "Could not merge cells: {}; inserting the logo anyway.",
                warning
            ));
            match settings.merge_range.split(':').next().and_then(CellRef::parse) {
                Some(cell) => (cell, false),
                None => return skip(warning, progress),
            }
        }
    };

    let anchor = anchor.to_string();
    let mut marker = MarkerType::default();
    marker.set_coordinate(anchor.as_str());

    let mut image = Image::default();
    image.new_image_with_dimensions(logo.height, logo.width, &logo.name, logo.bytes, marker);
    sheet.add_image(image);

    ::log::info!(
        "Embedded logo {}x{} at {}{}",
        logo.width,
        logo.height,
        anchor,
        if merged { " (merged)" } else { "" }
    );

    EmbedOutcome::Embedded {
        anchor,
        width: logo.width,
        height: logo.height,
        merged,
    }
}

/// Merge a multi-cell range unless the template already merges it
fn merge(sheet: &mut Worksheet, range: &CellRange) -> bool {
    if !range.is_multi_cell() {
        return false;
    }
    let text = range.to_string();
    let already = sheet
        .get_merge_cells()
        .iter()
        .any(|existing| existing.get_range() == text);
    if !already {
        sheet.add_merge_cells(text.as_str());
    }
    true
}

fn skip(warning: ImageWarning, progress: &mut dyn ProgressSink) -> EmbedOutcome {
    ::log::warn!("Logo skipped: {}", warning);
    progress.emit(&format!("Could not embed logo: {}", warning));
    EmbedOutcome::Skipped(warning)
}
