// Modules
pub mod config;
pub mod crawlers;
pub mod errors;
pub mod parsers;
pub mod progress;
pub mod results;
pub mod sheet;
pub mod utils;


// Re-export commonly used types for convenience
pub use config::ScrapeConfig;
pub use errors::{FetchError, ImageWarning, ReportError};
pub use progress::{LogSink, NullSink, ProgressSink};
pub use results::AlertRecord;
pub use sheet::EmbedOutcome;

use crawlers::{HttpFetcher, PageFetcher, PagePlan, StopReason, collect_alerts};
use parsers::RecordExtractor;
use sheet::Template;
use std::path::{Path, PathBuf};
use url::Url;

/// Stages of a report run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Init,
    Fetching,
    FailedNoData,
    ExtractingDone,
    WritingTemplate,
    EmbeddingImage,
    Saving,
    Done,
}

impl RunStage {
    fn enter(self) -> Self {
        ::log::debug!("Run stage: {:?}", self);
        self
    }
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub output_path: PathBuf,
    pub records_fetched: usize,
    pub rows_written: usize,
    pub pages_attempted: u32,
    pub stop: StopReason,
    /// `None` when the template already carries a logo
    pub logo: Option<EmbedOutcome>,
}

/// Main builder for one report run
pub struct Report {
    config: ScrapeConfig,
}

impl Report {
    pub fn new(config: ScrapeConfig) -> Self {
        Self { config }
    }

    /// Override the number of listing pages to request
    pub fn with_pages(mut self, num_pages: u32) -> Self {
        self.config.num_pages = num_pages;
        self
    }

    /// Override the pause between page requests, in seconds
    pub fn with_delay(mut self, seconds: f64) -> Self {
        self.config.delay = seconds;
        self
    }

    /// Skip logo embedding when the template already has one
    pub fn with_template_has_logo(mut self, has_logo: bool) -> Self {
        self.config.template_has_logo = has_logo;
        self
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Scrape over HTTP and fill the template
    pub async fn generate(
        &self,
        progress: &mut dyn ProgressSink,
    ) -> Result<ReportSummary, ReportError> {
        self.config.validate()?;
        let fetcher = HttpFetcher::new(&self.config.headers, self.config.request_timeout())?;
        self.run(&fetcher, progress).await
    }

    /// Run the whole pipeline against any page source.
    ///
    /// Fails with [`ReportError::EmptyResult`] before touching the template when
    /// no record was collected. Logo problems never fail the run.
    pub async fn generate_with<F: PageFetcher>(
        &self,
        fetcher: &F,
        progress: &mut dyn ProgressSink,
    ) -> Result<ReportSummary, ReportError> {
        self.config.validate()?;
        self.run(fetcher, progress).await
    }

    /// Pipeline body; the configuration has already been validated
    async fn run<F: PageFetcher>(
        &self,
        fetcher: &F,
        progress: &mut dyn ProgressSink,
    ) -> Result<ReportSummary, ReportError> {
        let config = &self.config;
        let mut stage = RunStage::Init.enter();

        let extractor = RecordExtractor::new(&config.markers)?;
        let base_url =
            Url::parse(&config.base_url).map_err(|e| ReportError::config("base_url", e.to_string()))?;
        let plan = PagePlan {
            base_url,
            num_pages: config.num_pages,
            delay: config.delay(),
        };

        stage = stage_after(stage, RunStage::Fetching);
        let pagination = collect_alerts(fetcher, &extractor, &plan, progress).await;

        if pagination.records.is_empty() {
            stage_after(stage, RunStage::FailedNoData);
            progress.emit("No alerts were extracted.");
            ::log::error!(
                "No records after {} page(s), stop reason {:?}",
                pagination.pages_attempted,
                pagination.stop
            );
            return Err(ReportError::EmptyResult {
                pages_attempted: pagination.pages_attempted,
            });
        }
        stage = stage_after(stage, RunStage::ExtractingDone);

        stage = stage_after(stage, RunStage::WritingTemplate);
        progress.emit(&format!(
            "Loading template '{}'...",
            config.template_path.display()
        ));
        let mut template = match Template::open(&config.template_path) {
            Ok(template) => template,
            Err(e @ ReportError::TemplateNotFound { .. }) => {
                progress.emit(&format!(
                    "ERROR: template file '{}' not found.",
                    config.template_path.display()
                ));
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let written = template.write_records(
            &pagination.records,
            config.layout(),
            &config.fixed_fields(),
            progress,
        );

        let logo = if config.template_has_logo {
            ::log::debug!("Template already has a logo; not embedding one");
            None
        } else {
            stage = stage_after(stage, RunStage::EmbeddingImage);
            let template_dir = template_dir(template.source()).map(Path::to_path_buf);
            Some(sheet::embed_logo(
                template.sheet_mut(),
                &config.image_settings(),
                template_dir.as_deref(),
                progress,
            ))
        };

        stage = stage_after(stage, RunStage::Saving);
        template.save(&config.output_path)?;
        progress.emit(&format!(
            "Report saved to: {}",
            config.output_path.display()
        ));
        stage_after(stage, RunStage::Done);

        Ok(ReportSummary {
            output_path: config.output_path.clone(),
            records_fetched: written.fetched,
            rows_written: written.written,
            pages_attempted: pagination.pages_attempted,
            stop: pagination.stop,
            logo,
        })
    }
}

/// Scrape, fill the template, and return the path of the saved report.
///
/// Two concurrent runs with the same output path overwrite each other.
pub async fn run_report(
    config: ScrapeConfig,
    progress: &mut dyn ProgressSink,
) -> Result<PathBuf, ReportError> {
    let summary = Report::new(config).generate(progress).await?;
    Ok(summary.output_path)
}

fn stage_after(from: RunStage, to: RunStage) -> RunStage {
    ::log::trace!("{:?} -> {:?}", from, to);
    to.enter()
}

fn template_dir(template: &Path) -> Option<&Path> {
    template.parent().filter(|dir| !dir.as_os_str().is_empty())
}
