//! Archive boundary: expand a package to a working directory and collapse a
//! working directory back into a package file.
//!
//! Unpack and pack are inverses over the file set; pack writes entries in a
//! fixed order so the same tree always produces the same archive layout.

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Expand a package file into a directory, creating it if needed.
///
/// Returns the number of entries written. Entry paths are validated against
/// traversal outside the destination.
pub fn unpack(package: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(package).map_err(|_| Error::NotFound(package.display().to_string()))?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;
    fs::create_dir_all(dest)?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(rel) = entry.enclosed_name() else {
            tracing::warn!(name = entry.name(), "skipping unsafe archive entry");
            continue;
        };
        let out_path = dest.join(rel);
        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(File::create(&out_path)?);
        io::copy(&mut entry, &mut out)?;
        written += 1;
    }

    tracing::debug!(entries = written, dest = %dest.display(), "unpacked");
    Ok(written)
}

/// Collapse a working directory into a package file.
///
/// `[Content_Types].xml` is written first, then relationship parts, then the
/// rest in sorted path order. Directory entries are not emitted.
pub fn pack(dir: &Path, package: &Path) -> Result<usize> {
    if !dir.is_dir() {
        return Err(Error::NotFound(dir.display().to_string()));
    }

    let mut files = Vec::new();
    collect_files(dir, dir, &mut files)?;
    files.sort_by(|a, b| entry_rank(a).cmp(&entry_rank(b)).then(a.cmp(b)));

    if let Some(parent) = package.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = ZipWriter::new(BufWriter::new(File::create(package)?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for name in &files {
        writer.start_file(name.as_str(), options)?;
        let mut input = BufReader::new(File::open(dir.join(name))?);
        io::copy(&mut input, &mut writer)?;
    }
    writer.finish()?;

    tracing::debug!(entries = files.len(), package = %package.display(), "packed");
    Ok(files.len())
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(root, &path, out)?;
        } else {
            out.push(archive_name(root, &path));
        }
    }
    Ok(())
}

/// Archive entry name: the path relative to the root with forward slashes.
fn archive_name(root: &Path, path: &Path) -> String {
    let rel: PathBuf = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Ordering class for an entry: content types first, relationship parts
/// second, everything else after.
fn entry_rank(name: &str) -> u8 {
    if name == "[Content_Types].xml" {
        0
    } else if name.starts_with("_rels/") || name.contains("/_rels/") {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_rank_ordering() {
        assert_eq!(entry_rank("[Content_Types].xml"), 0);
        assert_eq!(entry_rank("_rels/.rels"), 1);
        assert_eq!(entry_rank("ppt/_rels/presentation.xml.rels"), 1);
        assert_eq!(entry_rank("ppt/presentation.xml"), 2);
    }

    #[test]
    fn test_pack_unpack_round_trip() {
        let src = tempfile::tempdir().unwrap();
        fs::write(src.path().join("[Content_Types].xml"), "<Types/>").unwrap();
        fs::create_dir_all(src.path().join("ppt/slides")).unwrap();
        fs::write(src.path().join("ppt/slides/slide1.xml"), "<p:sld/>").unwrap();
        fs::create_dir_all(src.path().join("_rels")).unwrap();
        fs::write(src.path().join("_rels/.rels"), "<Relationships/>").unwrap();

        let out = tempfile::tempdir().unwrap();
        let package = out.path().join("deck.pptx");
        let packed = pack(src.path(), &package).unwrap();
        assert_eq!(packed, 3);

        let dest = out.path().join("unpacked");
        let unpacked = unpack(&package, &dest).unwrap();
        assert_eq!(unpacked, 3);
        assert_eq!(
            fs::read_to_string(dest.join("ppt/slides/slide1.xml")).unwrap(),
            "<p:sld/>"
        );
    }

    #[test]
    fn test_pack_missing_dir() {
        let out = tempfile::tempdir().unwrap();
        let err = pack(&out.path().join("absent"), &out.path().join("x.pptx")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
