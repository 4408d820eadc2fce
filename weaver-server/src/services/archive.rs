//! ZIP archive reading
//!
//! Archives arrive as in-memory request bodies, so everything reads from a
//! byte slice.

use std::io::{Cursor, Read};
use weaver_common::stems::{canonical_name, is_stem_entry};
use weaver_common::Result;
use zip::ZipArchive;

/// Archive opened over a borrowed request body
pub type MemoryArchive<'a> = ZipArchive<Cursor<&'a [u8]>>;

/// Open an archive held in memory
pub fn open_archive(bytes: &[u8]) -> Result<MemoryArchive<'_>> {
    Ok(ZipArchive::new(Cursor::new(bytes))?)
}

/// Raw names of all stem files in the archive, in archive order
///
/// Directories and `__MACOSX` metadata are skipped.
pub fn list_stems(bytes: &[u8]) -> Result<Vec<String>> {
    let mut archive = open_archive(bytes)?;
    let mut stems = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        if entry.is_dir() || !is_stem_entry(entry.name()) {
            continue;
        }
        stems.push(entry.name().to_string());
    }

    tracing::debug!(entries = archive.len(), stems = stems.len(), "Listed archive");
    Ok(stems)
}

/// First stem entry whose canonical name is `stem_name`
///
/// Returns the entry's raw name and its decompressed bytes.
pub fn read_stem(
    archive: &mut MemoryArchive<'_>,
    stem_name: &str,
) -> Result<Option<(String, Vec<u8>)>> {
    let mut found = None;
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        if entry.is_dir() || !is_stem_entry(entry.name()) {
            continue;
        }
        if canonical_name(entry.name()) == stem_name {
            found = Some(index);
            break;
        }
    }

    let Some(index) = found else {
        return Ok(None);
    };

    let mut entry = archive.by_index(index)?;
    let name = entry.name().to_string();
    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut bytes)?;
    Ok(Some((name, bytes)))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Build a ZIP in memory; names ending in '/' become directories
    pub fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
        }
        zip.finish().unwrap().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::build_zip;
    use super::*;

    #[test]
    fn test_list_skips_directories_and_macos_metadata() {
        let bytes = build_zip(&[
            ("Stems/", ""),
            ("Stems/kick.wav", "k"),
            ("__MACOSX/Stems/._kick.wav", "junk"),
            ("snare.wav", "s"),
        ]);

        let stems = list_stems(&bytes).unwrap();
        assert_eq!(stems, vec!["Stems/kick.wav", "snare.wav"]);
    }

    #[test]
    fn test_list_rejects_non_zip() {
        assert!(list_stems(b"definitely not a zip").is_err());
    }

    #[test]
    fn test_read_stem_by_canonical_name() {
        let bytes = build_zip(&[("Drums/kick.wav", "kick-bytes"), ("snare.wav", "s")]);
        let mut archive = open_archive(&bytes).unwrap();

        let (name, content) = read_stem(&mut archive, "kick").unwrap().unwrap();
        assert_eq!(name, "Drums/kick.wav");
        assert_eq!(content, b"kick-bytes");
    }

    #[test]
    fn test_read_stem_first_match_wins() {
        let bytes = build_zip(&[("a/kick.wav", "first"), ("b/kick.flac", "second")]);
        let mut archive = open_archive(&bytes).unwrap();

        let (_, content) = read_stem(&mut archive, "kick").unwrap().unwrap();
        assert_eq!(content, b"first");
    }

    #[test]
    fn test_read_stem_missing() {
        let bytes = build_zip(&[("snare.wav", "s")]);
        let mut archive = open_archive(&bytes).unwrap();

        assert!(read_stem(&mut archive, "kick").unwrap().is_none());
    }
}
