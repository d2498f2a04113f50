use flate2::Crc;
use std::io::Write;

use crate::error::{ArchiveError, Result};

use super::structures::{
    CentralDirectoryHeader, EndOfCentralDirectory, EntryMetadata, LocalFileHeader,
};

/// Sequential STORED-only zip encoder.
///
/// Entries are written to the sink as they are added; the central directory
/// is held in memory and emitted by [`finish`](Self::finish). Offsets are
/// tracked by counting bytes written, so the sink does not need `Seek`.
pub struct ZipWriter<W: Write> {
    inner: W,
    /// Bytes written so far, i.e. the offset of the next local header
    offset: u64,
    entries: Vec<CentralDirectoryHeader>,
}

impl<W: Write> ZipWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            offset: 0,
            entries: Vec::new(),
        }
    }

    /// Whether an entry named `name` is in the archive's directory
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.file_name == name)
    }

    /// Entry names in the order they were written
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.file_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry. Names are not deduplicated here; callers check
    /// [`contains`](Self::contains) first.
    pub fn add_entry(&mut self, name: &str, data: &[u8], meta: &EntryMetadata) -> Result<()> {
        if name.len() > u16::MAX as usize {
            return Err(ArchiveError::TooLarge { what: "entry name" });
        }
        if self.entries.len() >= u16::MAX as usize {
            return Err(ArchiveError::TooLarge { what: "entry count" });
        }
        let size = u32::try_from(data.len()).map_err(|_| ArchiveError::TooLarge { what: "entry size" })?;
        let lfh_offset =
            u32::try_from(self.offset).map_err(|_| ArchiveError::TooLarge { what: "archive size" })?;

        let mut crc = Crc::new();
        crc.update(data);
        let crc32 = crc.sum();

        let header = LocalFileHeader::new(name, meta, crc32, size);
        header.write_to(&mut self.inner)?;
        self.inner.write_all(data)?;
        self.offset += (header.encoded_len() + data.len()) as u64;

        self.entries.push(CentralDirectoryHeader::new(
            name.to_string(),
            meta,
            crc32,
            size,
            lfh_offset,
        ));
        Ok(())
    }

    /// Write the central directory and end record, flush, and hand back the sink.
    pub fn finish(mut self) -> Result<W> {
        let cd_offset =
            u32::try_from(self.offset).map_err(|_| ArchiveError::TooLarge { what: "archive size" })?;

        let mut cd_size = 0u64;
        for entry in &self.entries {
            entry.write_to(&mut self.inner)?;
            cd_size += entry.encoded_len() as u64;
        }

        let eocd = EndOfCentralDirectory {
            // add_entry caps the count at u16::MAX
            total_entries: self.entries.len() as u16,
            cd_size: u32::try_from(cd_size)
                .map_err(|_| ArchiveError::TooLarge { what: "central directory" })?,
            cd_offset,
        };
        eocd.write_to(&mut self.inner)?;
        self.inner.flush()?;

        Ok(self.inner)
    }
}
