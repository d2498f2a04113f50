//! # htmlzip
//!
//! Package generated HTML and downloaded assets into a zip archive for
//! offline viewing.
//!
//! The archive is built by [`HtmlWriter`]: open it, write strings, local files
//! or remote URLs under internal paths, then close it. Each internal path is
//! written at most once, and every entry is stored uncompressed with the same
//! fixed metadata, so identical inputs always produce a byte-identical archive.
//!
//! ## Features
//!
//! - Deduplication by internal path (repeated writes return the same path)
//! - Fixed entry metadata for reproducible output
//! - Main entry point at `index.html`
//! - Remote assets through the [`Fetch`] trait, with [`HttpFetcher`] as the
//!   default HTTP implementation
//!
//! ## Example
//!
//! ```no_run
//! use htmlzip::{HtmlWriter, HttpFetcher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut writer = HtmlWriter::new("page.zip", HttpFetcher::new()?);
//!     writer.open()?;
//!
//!     let script = writer.write_url("https://example.com/app.js", "app.js").await?;
//!     writer.write_main_file(format!("<script src=\"{script}\"></script>"))?;
//!
//!     writer.close()?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod html;
pub mod io;
pub mod zip;

pub use error::{ArchiveError, Result};
pub use html::{DEFAULT_DIRECTORY, HtmlWriter, MAIN_FILE_NAME};
pub use io::{Fetch, HttpFetcher};
pub use crate::zip::{EntryMetadata, ZipWriter};
