//! ZIP archive encoding.
//!
//! This module writes the small subset of the ZIP format needed to package
//! HTML output: STORED (uncompressed) entries with fixed metadata.
//!
//! ## Architecture
//!
//! - [`structures`]: Binary layout of the records this crate emits
//! - [`writer`]: Sequential encoder that appends entries and finishes the archive
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! The writer emits (1) as entries arrive and keeps the records for (2) in
//! memory; those records double as the archive's listing for membership
//! checks. (2) and (3) are written when the archive is finished.
//!
//! ## Limitations
//!
//! - No compression, encryption, or multi-disk archives
//! - No ZIP64: entries and archives must stay below 4 GiB, and at most
//!   65535 entries

mod structures;
mod writer;

pub use structures::*;
pub use writer::ZipWriter;
