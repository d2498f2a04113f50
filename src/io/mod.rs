mod http;
mod local;

pub use http::HttpFetcher;
pub use local::{read_source_file, zip_path};

use anyhow::Result;
use async_trait::async_trait;

/// Trait for retrieving remote content by URL
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch the full body at `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
