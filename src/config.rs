use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::errors::ReportError;

/// Configuration for one report run.
///
/// Serialized as the flat JSON sidecar the desktop frontend keeps next to the
/// executable; key names follow that file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Listing URL; the page index is appended as a query parameter
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Maximum number of listing pages to request
    #[serde(default = "default_num_pages")]
    pub num_pages: u32,

    /// Request headers sent with every page request
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,

    /// Pause between page requests, in seconds
    #[serde(default = "default_delay")]
    pub delay: f64,

    /// Per-request timeout, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Spreadsheet template to fill (never modified)
    #[serde(rename = "plantilla_path", default = "default_template_path")]
    pub template_path: PathBuf,

    /// Where the filled report is saved
    #[serde(rename = "salida_path", default = "default_output_path")]
    pub output_path: PathBuf,

    /// First data row of the template (1-based)
    #[serde(rename = "fila_inicial", default = "default_start_row")]
    pub start_row: u32,

    /// Last data row of the template (inclusive)
    #[serde(rename = "ultima_fila_datos", default = "default_end_row")]
    pub end_row: u32,

    /// Text written to column C of every row
    #[serde(rename = "medicamento_dispositivo", default = "default_device_label")]
    pub device_label: String,

    /// Text written to column E of every row
    #[serde(rename = "aplica_institucion", default = "default_institution_applies")]
    pub institution_applies: String,

    /// Text written to column F of every row
    #[serde(rename = "acciones_ejecutadas", default = "default_actions_taken")]
    pub actions_taken: String,

    /// Text written to column H of every row
    #[serde(rename = "responsable_revision", default)]
    pub reviewer: String,

    /// Logo image embedded when the template has none
    #[serde(default = "default_image_path")]
    pub image_path: PathBuf,

    /// Target logo width in pixels; height follows the aspect ratio
    #[serde(default = "default_image_width")]
    pub image_width_px: u32,

    /// Cell range the logo is anchored to (top-left cell), merged first
    #[serde(default = "default_merge_range")]
    pub image_merge_range: String,

    /// Skip logo embedding entirely
    #[serde(default)]
    pub template_has_logo: bool,

    /// CSS markers used to find alert entries in the listing markup
    #[serde(default)]
    pub markers: Markers,
}

/// CSS selectors locating one alert entry and its fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    #[serde(default = "default_container_marker")]
    pub container: String,
    #[serde(default = "default_name_marker")]
    pub name: String,
    #[serde(default = "default_identifier_marker")]
    pub identifier: String,
    #[serde(default = "default_date_marker")]
    pub date: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            container: default_container_marker(),
            name: default_name_marker(),
            identifier: default_identifier_marker(),
            date: default_date_marker(),
        }
    }
}

/// Row range of the template that receives data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateLayout {
    pub start_row: u32,
    pub end_row: u32,
}

impl TemplateLayout {
    /// Number of rows available for data; zero for an inverted range
    pub fn capacity(&self) -> usize {
        if self.end_row < self.start_row {
            return 0;
        }
        (self.end_row - self.start_row + 1) as usize
    }
}

/// Texts repeated on every written row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedFields {
    pub device_label: String,
    pub institution_applies: String,
    pub actions_taken: String,
    pub reviewer: String,
}

/// Logo embedding settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSettings {
    pub path: PathBuf,
    pub width_px: u32,
    pub merge_range: String,
}

fn default_base_url() -> String {
    "https://app.invima.gov.co/alertas/dispositivos-medicos-invima?field_tipo_de_documento_value=1&field_a_o_value=1".to_string()
}

fn default_num_pages() -> u32 {
    2
}

fn default_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(
        "User-Agent".to_string(),
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36".to_string(),
    );
    headers.insert(
        "Accept".to_string(),
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7".to_string(),
    );
    headers
}

fn default_delay() -> f64 {
    1.0
}

fn default_request_timeout() -> u64 {
    15
}

fn default_template_path() -> PathBuf {
    PathBuf::from("plantilla.xlsx")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("reporte_invima_lleno.xlsx")
}

fn default_start_row() -> u32 {
    6
}

fn default_end_row() -> u32 {
    34
}

fn default_device_label() -> String {
    "DISPOSITIVO MÉDICO".to_string()
}

fn default_institution_applies() -> String {
    "NO".to_string()
}

fn default_actions_taken() -> String {
    "N/A".to_string()
}

fn default_image_path() -> PathBuf {
    PathBuf::from("logo.png")
}

fn default_image_width() -> u32 {
    150
}

fn default_merge_range() -> String {
    "A1:B4".to_string()
}

fn default_container_marker() -> String {
    "div.alertas-invima-list".to_string()
}

fn default_name_marker() -> String {
    ".views-field-title".to_string()
}

fn default_identifier_marker() -> String {
    ".views-field-field-numero-de-id-d-m".to_string()
}

fn default_date_marker() -> String {
    ".views-field-field-a-o".to_string()
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            num_pages: default_num_pages(),
            headers: default_headers(),
            delay: default_delay(),
            request_timeout_secs: default_request_timeout(),
            template_path: default_template_path(),
            output_path: default_output_path(),
            start_row: default_start_row(),
            end_row: default_end_row(),
            device_label: default_device_label(),
            institution_applies: default_institution_applies(),
            actions_taken: default_actions_taken(),
            reviewer: String::new(),
            image_path: default_image_path(),
            image_width_px: default_image_width(),
            image_merge_range: default_merge_range(),
            template_has_logo: false,
            markers: Markers::default(),
        }
    }
}

impl ScrapeConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check every field once, before any network or file work starts
    pub fn validate(&self) -> Result<(), ReportError> {
        Url::parse(&self.base_url)
            .map_err(|e| ReportError::config("base_url", e.to_string()))?;

        if self.num_pages == 0 {
            return Err(ReportError::config("num_pages", "must be at least 1"));
        }
        Duration::try_from_secs_f64(self.delay).map_err(|e| {
            ReportError::config(
                "delay",
                format!("{} is not a usable number of seconds: {}", self.delay, e),
            )
        })?;
        if self.request_timeout_secs == 0 {
            return Err(ReportError::config(
                "request_timeout_secs",
                "must be at least 1",
            ));
        }
        for (name, value) in &self.headers {
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ReportError::config("headers", format!("{}: {}", name, e)))?;
            HeaderValue::from_str(value)
                .map_err(|e| ReportError::config("headers", format!("{}: {}", name, e)))?;
        }

        if self.start_row == 0 {
            return Err(ReportError::config("fila_inicial", "rows are 1-based"));
        }
        if self.start_row > self.end_row {
            return Err(ReportError::config(
                "ultima_fila_datos",
                format!(
                    "last data row {} is before the first data row {}",
                    self.end_row, self.start_row
                ),
            ));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ReportError::config("salida_path", "must not be empty"));
        }
        if same_file(&self.template_path, &self.output_path) {
            return Err(ReportError::config(
                "salida_path",
                "output must differ from the template path",
            ));
        }

        Ok(())
    }

    /// Delay between page requests; zero when the value is unusable
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay).unwrap_or(Duration::ZERO)
    }

    /// Per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn layout(&self) -> TemplateLayout {
        TemplateLayout {
            start_row: self.start_row,
            end_row: self.end_row,
        }
    }

    pub fn fixed_fields(&self) -> FixedFields {
        FixedFields {
            device_label: self.device_label.clone(),
            institution_applies: self.institution_applies.clone(),
            actions_taken: self.actions_taken.clone(),
            reviewer: self.reviewer.clone(),
        }
    }

    pub fn image_settings(&self) -> ImageSettings {
        ImageSettings {
            path: self.image_path.clone(),
            width_px: self.image_width_px,
            merge_range: self.image_merge_range.clone(),
        }
    }
}

/// Compare two paths, resolving them when both exist
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
