use crate::config::{FixedFields, TemplateLayout};
use crate::errors::ReportError;
use crate::progress::ProgressSink;
use crate::results::AlertRecord;
use std::path::{Path, PathBuf};
use umya_spreadsheet::{Spreadsheet, Worksheet};

/// Columns receiving data on every written row. G is left to the template.
pub const DATE_COLUMN: &str = "A";
pub const IDENTIFIER_COLUMN: &str = "B";
pub const DEVICE_LABEL_COLUMN: &str = "C";
pub const NAME_COLUMN: &str = "D";
pub const INSTITUTION_COLUMN: &str = "E";
pub const ACTIONS_COLUMN: &str = "F";
pub const REVIEWER_COLUMN: &str = "H";

/// How many of the fetched records landed in the template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub fetched: usize,
    pub capacity: usize,
    pub written: usize,
}

impl WriteSummary {
    pub fn truncated(&self) -> bool {
        self.fetched > self.written
    }
}

/// Number of records that fit: `min(records, capacity)`
pub fn rows_to_write(records: usize, capacity: usize) -> usize {
    records.min(capacity)
}

/// A workbook loaded from the template file, mutated in memory
pub struct Template {
    source: PathBuf,
    book: Spreadsheet,
}

impl Template {
    /// Load the template; the file on disk is never written back
    pub fn open(path: &Path) -> Result<Self, ReportError> {
        if !path.is_file() {
            return Err(ReportError::TemplateNotFound {
                path: path.to_path_buf(),
            });
        }

        let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| {
            ReportError::Spreadsheet {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        ::log::debug!("Loaded template {}", path.display());
        Ok(Self {
            source: path.to_path_buf(),
            book,
        })
    }

    /// Path the template was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Sheet that receives the data (the workbook's active sheet)
    pub fn sheet_mut(&mut self) -> &mut Worksheet {
        self.book.get_active_sheet_mut()
    }

    /// Write records into the data rows, truncating to the template's capacity
    pub fn write_records(
        &mut self,
        records: &[AlertRecord],
        layout: TemplateLayout,
        fixed: &FixedFields,
        progress: &mut dyn ProgressSink,
    ) -> WriteSummary {
        write_rows(self.sheet_mut(), records, layout, fixed, progress)
    }

    /// Save the workbook under `output`, creating missing parent directories
    pub fn save(&self, output: &Path) -> Result<(), ReportError> {
        let spreadsheet_error = |reason: String| ReportError::Spreadsheet {
            path: output.to_path_buf(),
            reason,
        };

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| spreadsheet_error(e.to_string()))?;
            }
        }

        umya_spreadsheet::writer::xlsx::write(&self.book, output)
            .map_err(|e| spreadsheet_error(e.to_string()))?;
        ::log::info!("Saved workbook to {}", output.display());
        Ok(())
    }
}

/// Project records onto `sheet` starting at `layout.start_row`.
///
/// Record `i` lands on row `start_row + i`; rows past the written block keep
/// whatever the template holds.
pub fn write_rows(
    sheet: &mut Worksheet,
    records: &[AlertRecord],
    layout: TemplateLayout,
    fixed: &FixedFields,
    progress: &mut dyn ProgressSink,
) -> WriteSummary {
    let capacity = layout.capacity();
    let written = rows_to_write(records.len(), capacity);

    if records.len() > capacity {
        ::log::warn!(
            "Truncating {} records to {} template rows",
            records.len(),
            capacity
        );
        progress.emit(&format!(
            "Extracted {} alerts, but the template has room for {}. Writing the first {}.",
            records.len(),
            capacity,
            capacity
        ));
    }

    for (index, record) in records.iter().take(written).enumerate() {
        let row = layout.start_row + index as u32;
        let cells = [
            (DATE_COLUMN, record.date.as_str()),
            (IDENTIFIER_COLUMN, record.identifier.as_str()),
            (DEVICE_LABEL_COLUMN, fixed.device_label.as_str()),
            (NAME_COLUMN, record.name.as_str()),
            (INSTITUTION_COLUMN, fixed.institution_applies.as_str()),
            (ACTIONS_COLUMN, fixed.actions_taken.as_str()),
            (REVIEWER_COLUMN, fixed.reviewer.as_str()),
        ];
        for (column, value) in cells {
            sheet
                .get_cell_mut(format!("{}{}", column, row).as_str())
                .set_value_string(value);
        }
    }

    ::log::debug!(
        "Wrote {} rows starting at row {}",
        written,
        layout.start_row
    );

    WriteSummary {
        fetched: records.len(),
        capacity,
        written,
    }
}
