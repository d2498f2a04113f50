//! Packaging of HTML output into an offline archive.
//!
//! [`HtmlWriter`] owns one destination zip file. Content is added under
//! internal paths, each path at most once: writing a path that already exists
//! is a no-op that still returns the path, so callers can link to it either
//! way.
//!
//! ```no_run
//! use htmlzip::{HtmlWriter, HttpFetcher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut writer = HtmlWriter::create("out.zip", HttpFetcher::new()?)?;
//!
//!     let css = writer.write_contents("style.css", "body { margin: 0 }")?;
//!     let logo = writer.write_url("https://example.com/logo.png", "logo.png").await?;
//!     writer.write_main_file(format!(
//!         "<link rel=\"stylesheet\" href=\"{css}\"><img src=\"{logo}\">"
//!     ))?;
//!
//!     writer.close()?;
//!     Ok(())
//! }
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::{ArchiveError, Result};
use crate::io::{self, Fetch, HttpFetcher};
use crate::zip::{EntryMetadata, ZipWriter};

/// Directory used by `write_contents` and `write_url`
pub const DEFAULT_DIRECTORY: &str = "src";

/// Internal path of the main entry
pub const MAIN_FILE_NAME: &str = "index.html";

type Archive = ZipWriter<BufWriter<File>>;

/// Writer for one HTML zip archive.
///
/// Construction does no I/O. [`open`](Self::open) creates the destination and
/// [`close`](Self::close) finalizes it. An archive still open when the writer
/// is dropped is finalized by `Drop`, so it is closed on every exit path once
/// `open` succeeded.
pub struct HtmlWriter<F: Fetch = HttpFetcher> {
    path: PathBuf,
    fetcher: F,
    archive: Option<Archive>,
}

impl<F: Fetch> HtmlWriter<F> {
    /// Create a writer for `path`. The file is not touched until `open`.
    pub fn new(path: impl Into<PathBuf>, fetcher: F) -> Self {
        Self {
            path: path.into(),
            fetcher,
            archive: None,
        }
    }

    /// Create a writer and open it.
    pub fn create(path: impl Into<PathBuf>, fetcher: F) -> Result<Self> {
        let mut writer = Self::new(path, fetcher);
        writer.open()?;
        Ok(writer)
    }

    /// Destination path of the archive
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.archive.is_some()
    }

    /// Create (or truncate) the destination file.
    pub fn open(&mut self) -> Result<()> {
        if self.archive.is_some() {
            return Err(ArchiveError::AlreadyOpen);
        }

        let file = File::create(&self.path).map_err(|source| ArchiveError::Create {
            path: self.path.clone(),
            source,
        })?;
        self.archive = Some(ZipWriter::new(BufWriter::new(file)));

        tracing::debug!(path = %self.path.display(), "opened archive");
        Ok(())
    }

    /// Write the central directory and release the file.
    pub fn close(&mut self) -> Result<()> {
        let archive = self.archive.take().ok_or(ArchiveError::NotOpen)?;
        let entries = archive.len();
        archive.finish()?;

        tracing::debug!(path = %self.path.display(), entries, "closed archive");
        Ok(())
    }

    /// Whether `name` is already an entry of the open archive
    pub fn contains(&self, name: &str) -> bool {
        self.archive.as_ref().is_some_and(|a| a.contains(name))
    }

    /// Names of the entries written so far, in order
    pub fn entry_names(&self) -> Vec<String> {
        self.archive
            .as_ref()
            .map(|a| a.names().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Write `contents` to `src/<filename>`. Returns the internal path.
    pub fn write_contents(&mut self, filename: &str, contents: impl AsRef<[u8]>) -> Result<String> {
        self.write_contents_in(filename, contents, DEFAULT_DIRECTORY)
    }

    /// Write `contents` to `<directory>/<filename>`. Returns the internal path,
    /// also when the entry already existed and nothing was written.
    pub fn write_contents_in(
        &mut self,
        filename: &str,
        contents: impl AsRef<[u8]>,
        directory: &str,
    ) -> Result<String> {
        let internal_path = format!("{directory}/{filename}");
        self.write_entry(&internal_path, contents.as_ref())?;
        Ok(internal_path)
    }

    /// Copy the local file at `filepath` into the archive under the same path.
    ///
    /// The stored name is the zip form of `filepath` (see [`io::zip_path`]);
    /// the return value is `filepath` as given.
    pub async fn write_file(&mut self, filepath: &str) -> Result<String> {
        let name = io::zip_path(filepath);
        if self.archive()?.contains(&name) {
            tracing::debug!(entry = %name, "entry exists, skipping");
            return Ok(filepath.to_string());
        }

        let data = io::read_source_file(Path::new(filepath)).await?;
        self.write_entry(&name, &data)?;
        Ok(filepath.to_string())
    }

    /// Fetch `url` and write the body to `src/<filename>`.
    pub async fn write_url(&mut self, url: &str, filename: &str) -> Result<String> {
        self.write_url_in(url, filename, DEFAULT_DIRECTORY).await
    }

    /// Fetch `url` and write the body to `<directory>/<filename>`.
    ///
    /// The fetch happens even when the entry already exists, so fetch errors
    /// are always reported.
    pub async fn write_url_in(&mut self, url: &str, filename: &str, directory: &str) -> Result<String> {
        if !self.is_open() {
            return Err(ArchiveError::NotOpen);
        }

        let contents = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| ArchiveError::fetch(url, e))?;
        self.write_contents_in(filename, contents, directory)
    }

    /// Write the archive's entry point at `index.html`.
    pub fn write_main_file(&mut self, contents: impl AsRef<[u8]>) -> Result<()> {
        self.write_entry(MAIN_FILE_NAME, contents.as_ref())
    }

    fn archive(&mut self) -> Result<&mut Archive> {
        self.archive.as_mut().ok_or(ArchiveError::NotOpen)
    }

    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let archive = self.archive()?;
        if archive.contains(name) {
            tracing::debug!(entry = %name, "entry exists, skipping");
            return Ok(());
        }

        archive.add_entry(name, data, &EntryMetadata::HTML)?;
        tracing::debug!(entry = %name, len = data.len(), "wrote entry");
        Ok(())
    }
}

impl<F: Fetch> Drop for HtmlWriter<F> {
    fn drop(&mut self) {
        if self.archive.is_some() {
            if let Err(e) = self.close() {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to close archive");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;

    struct NoFetch;

    #[async_trait]
    impl Fetch for NoFetch {
        async fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
            bail!("unexpected fetch of {url}")
        }
    }

    #[test]
    fn new_does_no_io() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.zip");

        let writer = HtmlWriter::new(&path, NoFetch);
        assert!(!writer.is_open());
        assert_eq!(writer.path(), path);
        drop(writer);

        assert!(!path.exists());
    }

    #[test]
    fn writes_require_an_open_archive() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = HtmlWriter::new(dir.path().join("out.zip"), NoFetch);

        assert!(matches!(
            writer.write_contents("a.html", "x"),
            Err(ArchiveError::NotOpen)
        ));
        assert!(matches!(writer.write_main_file("x"), Err(ArchiveError::NotOpen)));
        assert!(matches!(writer.close(), Err(ArchiveError::NotOpen)));
    }

    #[test]
    fn open_twice_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = HtmlWriter::create(dir.path().join("out.zip"), NoFetch).unwrap();
        assert!(matches!(writer.open(), Err(ArchiveError::AlreadyOpen)));
        writer.close().unwrap();
        assert!(matches!(writer.close(), Err(ArchiveError::NotOpen)));
    }

    #[test]
    fn unwritable_destination_fails_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = HtmlWriter::new(dir.path().join("missing/dir/out.zip"), NoFetch);

        let err = writer.open().unwrap_err();
        assert!(matches!(err, ArchiveError::Create { .. }));
        assert!(!writer.is_open());
    }

    #[test]
    fn duplicate_paths_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = HtmlWriter::create(dir.path().join("out.zip"), NoFetch).unwrap();

        let first = writer.write_contents("a.css", "first").unwrap();
        let second = writer.write_contents("a.css", "second").unwrap();
        let other = writer.write_contents_in("a.css", "third", "assets").unwrap();

        assert_eq!(first, "src/a.css");
        assert_eq!(first, second);
        assert_eq!(other, "assets/a.css");
        assert_eq!(writer.entry_names(), ["src/a.css", "assets/a.css"]);
        assert!(writer.contains("src/a.css"));
    }

    #[test]
    fn main_file_ignores_directory_and_is_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = HtmlWriter::create(dir.path().join("out.zip"), NoFetch).unwrap();

        writer.write_contents("index.html", "nested").unwrap();
        writer.write_main_file("<h1>main</h1>").unwrap();
        writer.write_main_file("<h1>again</h1>").unwrap();

        assert_eq!(writer.entry_names(), ["src/index.html", "index.html"]);
    }

    #[test]
    fn drop_finalizes_open_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.zip");
        {
            let mut writer = HtmlWriter::create(&path, NoFetch).unwrap();
            writer.write_main_file("x").unwrap();
        }

        let bytes = std::fs::read(&path).unwrap();
        let eocd = &bytes[bytes.len() - crate::zip::EndOfCentralDirectory::SIZE..];
        assert_eq!(&eocd[0..4], crate::zip::EndOfCentralDirectory::SIGNATURE);
    }
}
