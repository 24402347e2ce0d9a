//! Minimal Zip32 writer for download bundles.
//!
//! Every entry is deflated and stamped with a fixed DOS timestamp
//! (1980-01-01 00:00) so identical datasets produce identical archives.

use super::ExportError;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::Write;

const LOCAL_HEADER: u32 = 0x0403_4b50;
const CENTRAL_HEADER: u32 = 0x0201_4b50;
const END_OF_DIRECTORY: u32 = 0x0605_4b50;
const VERSION: u16 = 20;
const METHOD_DEFLATE: u16 = 8;
const DOS_TIME: u16 = 0;
const DOS_DATE: u16 = (1 << 5) | 1;

pub(crate) struct ZipEntry<'a> {
    pub name: String,
    pub payload: &'a [u8],
}

pub(crate) fn build_zip(entries: &[ZipEntry<'_>]) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    let mut directory = Vec::new();

    let entry_count = u16::try_from(entries.len())
        .map_err(|_| ExportError::ArchiveTooLarge("too many entries".to_string()))?;

    for entry in entries {
        let name = entry.name.as_bytes();
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(entry.payload)?;
        let data = encoder.finish()?;

        let crc = crc32fast::hash(entry.payload);
        let compressed = zip32(data.len(), &entry.name)?;
        let uncompressed = zip32(entry.payload.len(), &entry.name)?;
        let name_len = u16::try_from(name.len())
            .map_err(|_| ExportError::ArchiveTooLarge(entry.name.clone()))?;
        let local_offset = zip32(out.len(), &entry.name)?;

        put_u32(&mut out, LOCAL_HEADER);
        put_u16(&mut out, VERSION);
        put_u16(&mut out, 0);
        put_u16(&mut out, METHOD_DEFLATE);
        put_u16(&mut out, DOS_TIME);
        put_u16(&mut out, DOS_DATE);
        put_u32(&mut out, crc);
        put_u32(&mut out, compressed);
        put_u32(&mut out, uncompressed);
        put_u16(&mut out, name_len);
        put_u16(&mut out, 0);
        out.extend_from_slice(name);
        out.extend_from_slice(&data);

        put_u32(&mut directory, CENTRAL_HEADER);
        put_u16(&mut directory, VERSION);
        put_u16(&mut directory, VERSION);
        put_u16(&mut directory, 0);
        put_u16(&mut directory, METHOD_DEFLATE);
        put_u16(&mut directory, DOS_TIME);
        put_u16(&mut directory, DOS_DATE);
        put_u32(&mut directory, crc);
        put_u32(&mut directory, compressed);
        put_u32(&mut directory, uncompressed);
        put_u16(&mut directory, name_len);
        put_u16(&mut directory, 0);
        put_u16(&mut directory, 0);
        put_u16(&mut directory, 0);
        put_u16(&mut directory, 0);
        put_u32(&mut directory, 0);
        put_u32(&mut directory, local_offset);
        directory.extend_from_slice(name);
    }

    let directory_start = zip32(out.len(), "central directory")?;
    let directory_size = zip32(directory.len(), "central directory")?;
    out.extend_from_slice(&directory);

    put_u32(&mut out, END_OF_DIRECTORY);
    put_u16(&mut out, 0);
    put_u16(&mut out, 0);
    put_u16(&mut out, entry_count);
    put_u16(&mut out, entry_count);
    put_u32(&mut out, directory_size);
    put_u32(&mut out, directory_start);
    put_u16(&mut out, 0);

    Ok(out)
}

fn zip32(value: usize, what: &str) -> Result<u32, ExportError> {
    u32::try_from(value).map_err(|_| ExportError::ArchiveTooLarge(what.to_string()))
}

fn put_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flate2::read::DeflateDecoder;
    use std::io::Read;

    fn u16_at(bytes: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([bytes[at], bytes[at + 1]])
    }

    fn u32_at(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    /// Walk local headers and return `(name, inflated payload)` per entry,
    /// checking each CRC on the way.
    pub(crate) fn read_entries(archive: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut entries = Vec::new();
        let mut at = 0;
        while u32_at(archive, at) == LOCAL_HEADER {
            let crc = u32_at(archive, at + 14);
            let compressed = u32_at(archive, at + 18) as usize;
            let name_len = u16_at(archive, at + 26) as usize;
            let extra_len = u16_at(archive, at + 28) as usize;
            let name_start = at + 30;
            let data_start = name_start + name_len + extra_len;

            let name = String::from_utf8(archive[name_start..name_start + name_len].to_vec())
                .expect("utf-8 entry name");
            let mut payload = Vec::new();
            DeflateDecoder::new(&archive[data_start..data_start + compressed])
                .read_to_end(&mut payload)
                .expect("entry inflates");
            assert_eq!(crc32fast::hash(&payload), crc, "crc mismatch for {name}");

            entries.push((name, payload));
            at = data_start + compressed;
        }
        entries
    }

    #[test]
    fn entries_inflate_back_to_their_payloads() {
        let archive = build_zip(&[
            ZipEntry {
                name: "employee.csv".to_string(),
                payload: b"employee_id,first_name\nE000001,Ada\n",
            },
            ZipEntry {
                name: "location.csv".to_string(),
                payload: b"",
            },
        ])
        .expect("archive builds");

        let entries = read_entries(&archive);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "employee.csv");
        assert_eq!(entries[0].1, b"employee_id,first_name\nE000001,Ada\n");
        assert!(entries[1].1.is_empty());

        let end = archive.len() - 22;
        assert_eq!(u32_at(&archive, end), END_OF_DIRECTORY);
        assert_eq!(u16_at(&archive, end + 10), 2);
    }

    #[test]
    fn identical_input_yields_identical_bytes() {
        let entries = [ZipEntry {
            name: "job_role.csv".to_string(),
            payload: b"job_id\nJOB11\n",
        }];
        assert_eq!(
            build_zip(&entries).expect("first"),
            build_zip(&entries).expect("second")
        );
    }
}
