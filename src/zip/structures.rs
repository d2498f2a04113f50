use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

/// STORED (no compression) method id
pub const METHOD_STORED: u16 = 0;

/// Minimum version needed to extract a STORED entry (2.0)
pub const VERSION_NEEDED: u16 = 20;

/// General purpose flag: file name and comment are UTF-8
pub const FLAG_UTF8: u16 = 0x0800;

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";
pub const CDFH_MIN_SIZE: usize = 46;

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// MS-DOS packed date and time as stored in zip headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosDateTime {
    pub date: u16,
    pub time: u16,
}

impl DosDateTime {
    /// Pack a calendar timestamp. Seconds are stored with 2-second resolution.
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        let date = ((year - 1980) << 9) | ((month as u16) << 5) | day as u16;
        let time = ((hour as u16) << 11) | ((minute as u16) << 5) | (second as u16 / 2);
        Self { date, time }
    }

    /// Unpack the date to (year, month, day)
    pub fn ymd(&self) -> (u16, u8, u8) {
        let day = (self.date & 0x1F) as u8;
        let month = ((self.date >> 5) & 0x0F) as u8;
        let year = ((self.date >> 9) & 0x7F) + 1980;
        (year, month, day)
    }

    /// Unpack the time to (hour, minute, second)
    pub fn hms(&self) -> (u8, u8, u8) {
        let second = ((self.time & 0x1F) * 2) as u8;
        let minute = ((self.time >> 5) & 0x3F) as u8;
        let hour = ((self.time >> 11) & 0x1F) as u8;
        (hour, minute, second)
    }
}

/// Per-entry metadata written into both headers of an entry.
///
/// Every field is a constant so that the same logical content always encodes
/// to the same bytes, whatever the host OS or wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    pub modified: DosDateTime,
    pub comment: &'static str,
    /// Host system id stored in the high byte of "version made by" (0 = MS-DOS)
    pub create_system: u8,
}

impl EntryMetadata {
    /// Metadata used for every entry of a packaged HTML archive.
    pub const HTML: Self = Self {
        modified: DosDateTime::new(2013, 3, 14, 1, 59, 26),
        comment: "HTML FILE",
        create_system: 0,
    };

    pub fn version_made_by(&self) -> u16 {
        (u16::from(self.create_system) << 8) | VERSION_NEEDED
    }
}

fn name_flags(name: &str, comment: &str) -> u16 {
    if name.is_ascii() && comment.is_ascii() {
        0
    } else {
        FLAG_UTF8
    }
}

/// Local File Header preceding each entry's data
pub struct LocalFileHeader<'a> {
    pub file_name: &'a str,
    pub flags: u16,
    pub modified: DosDateTime,
    pub crc32: u32,
    pub size: u32,
}

impl<'a> LocalFileHeader<'a> {
    pub fn new(file_name: &'a str, meta: &EntryMetadata, crc32: u32, size: u32) -> Self {
        Self {
            file_name,
            flags: name_flags(file_name, meta.comment),
            modified: meta.modified,
            crc32,
            size,
        }
    }

    /// Encoded length including the file name
    pub fn encoded_len(&self) -> usize {
        LFH_SIZE + self.file_name.len()
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(LFH_SIGNATURE)?;
        w.write_u16::<LittleEndian>(VERSION_NEEDED)?;
        w.write_u16::<LittleEndian>(self.flags)?;
        w.write_u16::<LittleEndian>(METHOD_STORED)?;
        w.write_u16::<LittleEndian>(self.modified.time)?;
        w.write_u16::<LittleEndian>(self.modified.date)?;
        w.write_u32::<LittleEndian>(self.crc32)?;
        // STORED: compressed and uncompressed sizes are equal
        w.write_u32::<LittleEndian>(self.size)?;
        w.write_u32::<LittleEndian>(self.size)?;
        w.write_u16::<LittleEndian>(self.file_name.len() as u16)?;
        w.write_u16::<LittleEndian>(0)?;
        w.write_all(self.file_name.as_bytes())
    }
}

/// Central Directory record kept for every entry written so far.
///
/// The list of these records is the archive's directory listing; it is
/// emitted after the entry data when the archive is finished.
#[derive(Debug, Clone)]
pub struct CentralDirectoryHeader {
    pub file_name: String,
    pub comment: &'static str,
    pub flags: u16,
    pub version_made_by: u16,
    pub modified: DosDateTime,
    pub crc32: u32,
    pub size: u32,
    pub lfh_offset: u32,
}

impl CentralDirectoryHeader {
    pub fn new(file_name: String, meta: &EntryMetadata, crc32: u32, size: u32, lfh_offset: u32) -> Self {
        Self {
            flags: name_flags(&file_name, meta.comment),
            file_name,
            comment: meta.comment,
            version_made_by: meta.version_made_by(),
            modified: meta.modified,
            crc32,
            size,
            lfh_offset,
        }
    }

    /// Encoded length including the file name and comment
    pub fn encoded_len(&self) -> usize {
        CDFH_MIN_SIZE + self.file_name.len() + self.comment.len()
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(CDFH_SIGNATURE)?;
        w.write_u16::<LittleEndian>(self.version_made_by)?;
        w.write_u16::<LittleEndian>(VERSION_NEEDED)?;
        w.write_u16::<LittleEndian>(self.flags)?;
        w.write_u16::<LittleEndian>(METHOD_STORED)?;
        w.write_u16::<LittleEndian>(self.modified.time)?;
        w.write_u16::<LittleEndian>(self.modified.date)?;
        w.write_u32::<LittleEndian>(self.crc32)?;
        w.write_u32::<LittleEndian>(self.size)?;
        w.write_u32::<LittleEndian>(self.size)?;
        w.write_u16::<LittleEndian>(self.file_name.len() as u16)?;
        w.write_u16::<LittleEndian>(0)?; // extra field length
        w.write_u16::<LittleEndian>(self.comment.len() as u16)?;
        w.write_u16::<LittleEndian>(0)?; // disk number start
        w.write_u16::<LittleEndian>(0)?; // internal attributes
        w.write_u32::<LittleEndian>(0)?; // external attributes
        w.write_u32::<LittleEndian>(self.lfh_offset)?;
        w.write_all(self.file_name.as_bytes())?;
        w.write_all(self.comment.as_bytes())
    }
}

/// End of Central Directory (EOCD) - 22 bytes minimum
pub struct EndOfCentralDirectory {
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    /// Single-disk record with no archive comment
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(Self::SIGNATURE)?;
        w.write_u16::<LittleEndian>(0)?; // this disk
        w.write_u16::<LittleEndian>(0)?; // disk with central directory
        w.write_u16::<LittleEndian>(self.total_entries)?;
        w.write_u16::<LittleEndian>(self.total_entries)?;
        w.write_u32::<LittleEndian>(self.cd_size)?;
        w.write_u32::<LittleEndian>(self.cd_offset)?;
        w.write_u16::<LittleEndian>(0) // comment length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_timestamp_packs_to_dos_fields() {
        let modified = EntryMetadata::HTML.modified;
        assert_eq!(modified.date, 0x426E);
        assert_eq!(modified.time, 0x0F6D);
        assert_eq!(modified.ymd(), (2013, 3, 14));
        assert_eq!(modified.hms(), (1, 59, 26));
    }

    #[test]
    fn version_made_by_carries_create_system() {
        assert_eq!(EntryMetadata::HTML.version_made_by(), 20);

        let unix = EntryMetadata {
            create_system: 3,
            ..EntryMetadata::HTML
        };
        assert_eq!(unix.version_made_by(), 0x0314);
    }

    #[test]
    fn local_header_layout() {
        let header = LocalFileHeader::new("src/a.html", &EntryMetadata::HTML, 0xDEADBEEF, 9);
        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();

        assert_eq!(buf.len(), header.encoded_len());
        assert_eq!(&buf[0..4], LFH_SIGNATURE);
        assert_eq!(&buf[8..10], &[0, 0]); // stored
        assert_eq!(&buf[10..12], &0x0F6Du16.to_le_bytes());
        assert_eq!(&buf[12..14], &0x426Eu16.to_le_bytes());
        assert_eq!(&buf[14..18], &0xDEADBEEFu32.to_le_bytes());
        assert_eq!(&buf[18..22], &9u32.to_le_bytes());
        assert_eq!(&buf[22..26], &9u32.to_le_bytes());
        assert_eq!(&buf[26..28], &10u16.to_le_bytes());
        assert_eq!(&buf[30..], b"src/a.html");
    }

    #[test]
    fn central_header_carries_comment() {
        let header = CentralDirectoryHeader::new("index.html".into(), &EntryMetadata::HTML, 1, 2, 3);
        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();

        assert_eq!(buf.len(), header.encoded_len());
        assert_eq!(&buf[0..4], CDFH_SIGNATURE);
        assert_eq!(&buf[32..34], &9u16.to_le_bytes());
        assert_eq!(&buf[42..46], &3u32.to_le_bytes());
        assert!(buf.ends_with(b"index.htmlHTML FILE"));
    }

    #[test]
    fn non_ascii_names_set_utf8_flag() {
        let header = LocalFileHeader::new("src/caf\u{e9}.html", &EntryMetadata::HTML, 0, 0);
        assert_eq!(header.flags, FLAG_UTF8);

        let header = LocalFileHeader::new("src/cafe.html", &EntryMetadata::HTML, 0, 0);
        assert_eq!(header.flags, 0);
    }
}
