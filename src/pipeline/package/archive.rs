//! Zip archive creation with folder exclusion.

use crate::pipeline::error::{ErrorExt, Result};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Whether `entry_name` contains any excluded marker.
///
/// This is a substring test on the whole relative path, so a marker matches
/// wherever it occurs, including inside a longer file or folder name.
pub fn is_excluded(entry_name: &str, markers: &[String]) -> bool {
    markers.iter().any(|marker| entry_name.contains(marker.as_str()))
}

/// Writes every regular file under `source_dir` into a new zip at
/// `destination`, skipping excluded entries.
///
/// Entry names are relative to `source_dir` and always use `/` separators.
/// Returns the number of entries written. Blocking; call from
/// `spawn_blocking`.
pub fn write_zip(source_dir: &Path, destination: &Path, markers: &[String]) -> Result<usize> {
    let file = File::create(destination).fs_context("creating archive", destination)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(true);

    // Sorted traversal keeps entry order stable across re-runs
    let mut written = 0;
    for entry in walkdir::WalkDir::new(source_dir)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel_path = entry.path().strip_prefix(source_dir)?;
        let entry_name = rel_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if is_excluded(&entry_name, markers) {
            log::debug!("Excluding {}", entry_name);
            continue;
        }

        writer.start_file(entry_name.as_str(), options)?;
        let mut input = File::open(entry.path()).fs_context("opening file for archiving", entry.path())?;
        io::copy(&mut input, &mut writer).fs_context("archiving file", entry.path())?;
        written += 1;
    }

    let mut inner = writer.finish()?;
    io::Write::flush(&mut inner).fs_context("flushing archive", destination)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Vec<String> {
        vec![
            "Grib_BackUpThisFolder_ButDontShipItWithYourGame".to_string(),
            "Grib_BurstDebugInformation_DoNotShip".to_string(),
        ]
    }

    #[test]
    fn substring_match_anywhere_in_path() {
        let m = markers();
        assert!(is_excluded("Grib_BackUpThisFolder_ButDontShipItWithYourGame/a.txt", &m));
        assert!(is_excluded("deep/x/Grib_BurstDebugInformation_DoNotShip/lib.pdb", &m));
        assert!(is_excluded("prefixGrib_BurstDebugInformation_DoNotShip_suffix.log", &m));
        assert!(!is_excluded("Grib_Data/level0", &m));
        assert!(!is_excluded("Other_BurstDebugInformation_DoNotShip/lib.pdb", &m));
    }
}
