use alert_report::ScrapeConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "alert-report")]
#[command(about = "Scrapes sanitary alert listings into a spreadsheet report template")]
#[command(version)]
pub struct Args {
    /// JSON configuration file; defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listing URL (the page index is appended as `page=N`)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Maximum number of listing pages to request
    #[arg(short, long)]
    pub pages: Option<u32>,

    /// Spreadsheet template to fill
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Where the filled report is written
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// First data row of the template
    #[arg(long)]
    pub start_row: Option<u32>,

    /// Last data row of the template (inclusive)
    #[arg(long)]
    pub end_row: Option<u32>,

    /// Seconds to wait between page requests
    #[arg(long)]
    pub delay: Option<f64>,

    /// Name written to the reviewer column
    #[arg(long)]
    pub reviewer: Option<String>,

    /// Logo image embedded in the report
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Logo width in pixels
    #[arg(long)]
    pub image_width: Option<u32>,

    /// The template already carries a logo; do not embed one
    #[arg(long)]
    pub template_has_logo: bool,

    /// Write the effective configuration to this file before running
    #[arg(long)]
    pub save_config: Option<PathBuf>,
}

impl Args {
    /// Overlay the command-line values on a loaded configuration
    pub fn apply(&self, config: &mut ScrapeConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(pages) = self.pages {
            config.num_pages = pages;
        }
        if let Some(template) = &self.template {
            config.template_path = template.clone();
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(start_row) = self.start_row {
            config.start_row = start_row;
        }
        if let Some(end_row) = self.end_row {
            config.end_row = end_row;
        }
        if let Some(delay) = self.delay {
            config.delay = delay;
        }
        if let Some(reviewer) = &self.reviewer {
            config.reviewer = reviewer.clone();
        }
        if let Some(image) = &self.image {
            config.image_path = image.clone();
        }
        if let Some(width) = self.image_width {
            config.image_width_px = width;
        }
        if self.template_has_logo {
            config.template_has_logo = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_loaded_config() {
        let args = Args::parse_from([
            "alert-report",
            "--pages",
            "4",
            "--end-row",
            "40",
            "--reviewer",
            "Ana",
            "--template-has-logo",
        ]);
        let mut config = ScrapeConfig::default();
        args.apply(&mut config);

        assert_eq!(config.num_pages, 4);
        assert_eq!(config.start_row, 6);
        assert_eq!(config.end_row, 40);
        assert_eq!(config.reviewer, "Ana");
        assert!(config.template_has_logo);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::parse_from(["alert-report"]);
        let mut config = ScrapeConfig::default();
        config.template_has_logo = true;
        args.apply(&mut config);
        assert_eq!(config, {
            let mut expected = ScrapeConfig::default();
            expected.template_has_logo = true;
            expected
        });
    }
}
