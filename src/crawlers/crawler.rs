use crate::errors::FetchError;

/// Source of listing pages.
///
/// The HTTP implementation lives in [`crate::crawlers::web`]; tests substitute
/// scripted pages.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Fetch one page and return its body as text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
