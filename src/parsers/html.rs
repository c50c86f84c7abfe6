use crate::config::Markers;
use crate::errors::ReportError;
use crate::parsers::text::join_fragments;
use crate::results::AlertRecord;
use scraper::{ElementRef, Html, Selector};

/// Result of extracting one field from an alert entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// Marker element found with non-empty text
    Found(String),
    /// Marker element found but it holds no text
    Blank,
    /// No element matched the marker inside the entry
    Missing,
}

impl FieldOutcome {
    /// Text for the spreadsheet cell; anything but `Found` is the empty string
    pub fn into_text(self) -> String {
        match self {
            FieldOutcome::Found(text) => text,
            FieldOutcome::Blank | FieldOutcome::Missing => String::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FieldOutcome::Found(_))
    }
}

/// Per-field outcomes for one alert entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordExtraction {
    pub name: FieldOutcome,
    pub identifier: FieldOutcome,
    pub date: FieldOutcome,
}

impl RecordExtraction {
    pub fn into_record(self) -> AlertRecord {
        AlertRecord {
            name: self.name.into_text(),
            identifier: self.identifier.into_text(),
            date: self.date.into_text(),
        }
    }
}

/// Parses listing pages into alert records using precompiled selectors
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    container: Selector,
    name: Selector,
    identifier: Selector,
    date: Selector,
}

impl RecordExtractor {
    /// Compile the CSS markers; an invalid selector is a configuration error
    pub fn new(markers: &Markers) -> Result<Self, ReportError> {
        Ok(Self {
            container: compile(&markers.container)?,
            name: compile(&markers.name)?,
            identifier: compile(&markers.identifier)?,
            date: compile(&markers.date)?,
        })
    }

    /// Extract every alert entry of the page.
    ///
    /// A page without entries yields an empty vector; fields that cannot be found
    /// are left empty without affecting the rest of the entry or the page.
    pub fn extract(&self, html: &str) -> Vec<AlertRecord> {
        self.extract_detailed(html)
            .into_iter()
            .map(RecordExtraction::into_record)
            .collect()
    }

    /// Same walk as [`extract`](Self::extract), keeping each field's outcome
    pub fn extract_detailed(&self, html: &str) -> Vec<RecordExtraction> {
        let doc = Html::parse_document(html);

        let entries: Vec<RecordExtraction> = doc
            .select(&self.container)
            .map(|entry| RecordExtraction {
                name: field(entry, &self.name),
                identifier: field(entry, &self.identifier),
                date: field(entry, &self.date),
            })
            .collect();

        ::log::debug!("HTML parser found {} alert entries", entries.len());
        let incomplete = entries
            .iter()
            .filter(|e| !(e.name.is_found() && e.identifier.is_found() && e.date.is_found()))
            .count();
        if incomplete > 0 {
            ::log::debug!("{} entries have at least one empty field", incomplete);
        }

        entries
    }
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new(&Markers::default()).expect("Default markers should be valid selectors")
    }
}

fn compile(marker: &str) -> Result<Selector, ReportError> {
    Selector::parse(marker)
        .map_err(|e| ReportError::config("markers", format!("'{}': {}", marker, e)))
}

/// First descendant of `entry` matching `selector`, as trimmed text
fn field(entry: ElementRef<'_>, selector: &Selector) -> FieldOutcome {
    match entry.select(selector).next() {
        Some(element) => {
            let text = join_fragments(element.text());
            if text.is_empty() {
                FieldOutcome::Blank
            } else {
                FieldOutcome::Found(text)
            }
        }
        None => FieldOutcome::Missing,
    }
}
