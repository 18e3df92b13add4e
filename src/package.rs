//! Explicit handle to an unpacked package working directory.
//!
//! The working directory is the sole source of truth between invocations; a
//! `Package` is opened per operation and carries only path conventions plus
//! read/write helpers. Paths are computed by convention
//! (`ppt/slides/slide{N}.xml`, `ppt/slides/_rels/slide{N}.xml.rels`, ...);
//! a file under any other name in its class is invisible to this system.

use crate::error::{Error, Result};
use crate::opc::{ContentTypes, Relationships};
use std::fs;
use std::path::{Path, PathBuf};

/// An opened, unpacked presentation package.
#[derive(Debug, Clone)]
pub struct Package {
    root: PathBuf,
}

impl Package {
    /// Open a working directory, validating the top-level package structure.
    ///
    /// Fails with [`Error::PackageStructure`] naming the missing part when
    /// `[Content_Types].xml` or `ppt/presentation.xml` is absent.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let pkg = Self { root: root.into() };
        for required in [pkg.content_types_path(), pkg.presentation_path()] {
            if !required.is_file() {
                return Err(Error::PackageStructure(required));
            }
        }
        Ok(pkg)
    }

    /// Wrap a directory without structure validation. Used while scaffolding
    /// a fresh package, before its parts exist.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The working directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn content_types_path(&self) -> PathBuf {
        self.root.join("[Content_Types].xml")
    }

    pub fn root_rels_path(&self) -> PathBuf {
        self.root.join("_rels").join(".rels")
    }

    pub fn presentation_path(&self) -> PathBuf {
        self.root.join("ppt").join("presentation.xml")
    }

    pub fn presentation_rels_path(&self) -> PathBuf {
        self.root.join("ppt").join("_rels").join("presentation.xml.rels")
    }

    pub fn slides_dir(&self) -> PathBuf {
        self.root.join("ppt").join("slides")
    }

    pub fn slide_rels_dir(&self) -> PathBuf {
        self.slides_dir().join("_rels")
    }

    pub fn slide_path(&self, slide_num: u32) -> PathBuf {
        self.slides_dir().join(format!("slide{}.xml", slide_num))
    }

    pub fn slide_rels_path(&self, slide_num: u32) -> PathBuf {
        self.slide_rels_dir()
            .join(format!("slide{}.xml.rels", slide_num))
    }

    pub fn layouts_dir(&self) -> PathBuf {
        self.root.join("ppt").join("slideLayouts")
    }

    pub fn layout_path(&self, layout_num: u32) -> PathBuf {
        self.layouts_dir()
            .join(format!("slideLayout{}.xml", layout_num))
    }

    pub fn masters_dir(&self) -> PathBuf {
        self.root.join("ppt").join("slideMasters")
    }

    pub fn theme_dir(&self) -> PathBuf {
        self.root.join("ppt").join("theme")
    }

    pub fn media_dir(&self) -> PathBuf {
        self.root.join("ppt").join("media")
    }

    /// Read a part to a string; missing parts surface as [`Error::NotFound`].
    pub fn read_part(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        Ok(fs::read_to_string(path)?)
    }

    /// Write a part, creating parent directories as needed.
    pub fn write_part(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    /// Parse the presentation-level relationship table.
    pub fn presentation_rels(&self) -> Result<Relationships> {
        Relationships::parse(&self.read_part(&self.presentation_rels_path())?)
    }

    /// Persist the presentation-level relationship table.
    pub fn write_presentation_rels(&self, rels: &Relationships) -> Result<()> {
        self.write_part(&self.presentation_rels_path(), &rels.to_xml())
    }

    /// Parse one slide's relationship table; an absent file yields an empty
    /// table.
    pub fn slide_rels(&self, slide_num: u32) -> Result<Relationships> {
        let path = self.slide_rels_path(slide_num);
        if !path.is_file() {
            return Ok(Relationships::new());
        }
        Relationships::parse(&self.read_part(&path)?)
    }

    /// Persist one slide's relationship table.
    pub fn write_slide_rels(&self, slide_num: u32, rels: &Relationships) -> Result<()> {
        self.write_part(&self.slide_rels_path(slide_num), &rels.to_xml())
    }

    /// Parse the content-type registry.
    pub fn content_types(&self) -> Result<ContentTypes> {
        ContentTypes::parse(&self.read_part(&self.content_types_path())?)
    }

    /// Persist the content-type registry.
    pub fn write_content_types(&self, ct: &ContentTypes) -> Result<()> {
        self.write_part(&self.content_types_path(), &ct.to_xml())
    }
}

/// Extract the numeric suffix of a part filename such as `slide12.xml` or
/// `slideLayout3.xml`.
pub fn part_number(file_name: &str) -> Option<u32> {
    let stem = file_name.strip_suffix(".xml")?;
    let digits: String = stem.chars().rev().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.chars().rev().collect::<String>().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_number() {
        assert_eq!(part_number("slide12.xml"), Some(12));
        assert_eq!(part_number("slideLayout3.xml"), Some(3));
        assert_eq!(part_number("presentation.xml"), None);
        assert_eq!(part_number("theme1.png"), None);
    }

    #[test]
    fn test_open_rejects_non_package() {
        let dir = tempfile::tempdir().unwrap();
        let err = Package::open(dir.path()).unwrap_err();
        assert!(matches!(err, Error::PackageStructure(_)));
    }
}
