//! Mix assembly
//!
//! For each selection, the chosen archive's first stem entry with a matching
//! canonical name is copied into the output archive under its base filename.
//! Unmatched selections are skipped. When two selections land on the same
//! base filename the later one wins.

use std::io::{Cursor, Write};
use weaver_common::api::MixSelection;
use weaver_common::stems::{base_filename, Version};
use weaver_common::Result;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::archive::{open_archive, read_stem};

/// Assembled mix archive plus what went into it
#[derive(Debug, Clone)]
pub struct MixOutput {
    /// The ZIP blob
    pub bytes: Vec<u8>,
    /// Entry names written, in order
    pub entries: Vec<String>,
    /// Selections with no matching entry in their chosen archive
    pub skipped: Vec<String>,
}

/// Build the mixed archive from the two source archives
///
/// Both sources must be readable ZIPs even if every selection points at one
/// of them.
pub fn create_mix<'a>(
    archive_a: &'a [u8],
    archive_b: &'a [u8],
    selections: &[MixSelection],
) -> Result<MixOutput> {
    let mut source_a = open_archive(archive_a)?;
    let mut source_b = open_archive(archive_b)?;

    let mut files: Vec<(String, Vec<u8>)> = Vec::with_capacity(selections.len());
    let mut skipped = Vec::new();

    for selection in selections {
        let source = match selection.selected_version {
            Version::A => &mut source_a,
            Version::B => &mut source_b,
        };

        let Some((entry_name, content)) = read_stem(source, &selection.name)? else {
            tracing::debug!(
                stem = %selection.name,
                version = %selection.selected_version,
                "No matching entry, skipping"
            );
            skipped.push(selection.name.clone());
            continue;
        };

        let file_name = base_filename(&entry_name).to_string();
        match files.iter_mut().find(|(name, _)| *name == file_name) {
            Some(existing) => existing.1 = content,
            None => files.push((file_name, content)),
        }
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in &files {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(content)?;
    }
    let bytes = zip.finish()?.into_inner();

    Ok(MixOutput {
        bytes,
        entries: files.into_iter().map(|(name, _)| name).collect(),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::super::archive::test_support::build_zip;
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_entry(zip_bytes: &[u8], name: &str) -> Vec<u8> {
        let mut archive = ZipArchive::new(Cursor::new(zip_bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_chosen_version_bytes_are_used() {
        let a = build_zip(&[("kick.wav", "b1")]);
        let b = build_zip(&[("kick.wav", "b2")]);

        let mix = create_mix(&a, &b, &[MixSelection::new("kick", Version::A)]).unwrap();
        assert_eq!(mix.entries, vec!["kick.wav"]);
        assert_eq!(read_entry(&mix.bytes, "kick.wav"), b"b1");

        let mix = create_mix(&a, &b, &[MixSelection::new("kick", Version::B)]).unwrap();
        assert_eq!(read_entry(&mix.bytes, "kick.wav"), b"b2");
    }

    #[test]
    fn test_directory_path_is_dropped() {
        let a = build_zip(&[("Song/Stems/", ""), ("Song/Stems/bass.flac", "low")]);
        let b = build_zip(&[("bass.wav", "other")]);

        let mix = create_mix(&a, &b, &[MixSelection::new("bass", Version::A)]).unwrap();
        assert_eq!(mix.entries, vec!["bass.flac"]);
        assert_eq!(read_entry(&mix.bytes, "bass.flac"), b"low");
    }

    #[test]
    fn test_each_selection_uses_its_own_source() {
        let a = build_zip(&[("kick.wav", "kick-a"), ("snare.wav", "snare-a")]);
        let b = build_zip(&[("kick.mp3", "kick-b"), ("snare.mp3", "snare-b")]);

        let mix = create_mix(
            &a,
            &b,
            &[
                MixSelection::new("kick", Version::A),
                MixSelection::new("snare", Version::B),
            ],
        )
        .unwrap();

        assert_eq!(mix.entries, vec!["kick.wav", "snare.mp3"]);
        assert_eq!(read_entry(&mix.bytes, "snare.mp3"), b"snare-b");
    }

    #[test]
    fn test_unmatched_selection_skipped() {
        let a = build_zip(&[("kick.wav", "k")]);
        let b = build_zip(&[("kick.wav", "k")]);

        let mix = create_mix(
            &a,
            &b,
            &[
                MixSelection::new("vocals", Version::B),
                MixSelection::new("kick", Version::B),
            ],
        )
        .unwrap();

        assert_eq!(mix.entries, vec!["kick.wav"]);
        assert_eq!(mix.skipped, vec!["vocals"]);
    }

    #[test]
    fn test_duplicate_output_name_later_wins() {
        let a = build_zip(&[("kick.wav", "from-a")]);
        let b = build_zip(&[("kick.wav", "from-b")]);

        let mix = create_mix(
            &a,
            &b,
            &[
                MixSelection::new("kick", Version::A),
                MixSelection::new("kick", Version::B),
            ],
        )
        .unwrap();

        assert_eq!(mix.entries.len(), 1);
        assert_eq!(read_entry(&mix.bytes, "kick.wav"), b"from-b");
    }

    #[test]
    fn test_empty_selection_gives_empty_archive() {
        let a = build_zip(&[("kick.wav", "k")]);
        let mix = create_mix(&a, &a, &[]).unwrap();

        let archive = ZipArchive::new(Cursor::new(mix.bytes.as_slice())).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn test_unreadable_source_is_error() {
        let a = build_zip(&[("kick.wav", "k")]);
        assert!(create_mix(&a, b"garbage", &[MixSelection::new("kick", Version::A)]).is_err());
    }
}
