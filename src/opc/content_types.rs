//! Package content-type registry backing `[Content_Types].xml`.
//!
//! Every non-generic XML part and every media file must be declared here,
//! either through a `Default` for its extension or an `Override` for its
//! exact part path.

use crate::error::Result;
use crate::opc::constants::{content_type, namespace};
use crate::xml::escape_xml;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

/// Parsed `[Content_Types].xml`.
///
/// Defaults keep insertion order; overrides serialize sorted by part path so
/// repeated edits produce deterministic, diff-friendly output.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: BTreeMap<String, String>,
}

impl ContentTypes {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `[Content_Types].xml` document.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut registry = Self::new();
        let mut reader = Reader::from_str(xml);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => match e.local_name().as_ref()
                {
                    b"Default" => {
                        let mut extension = None;
                        let mut ct = None;
                        for attr in e.attributes() {
                            let attr = attr?;
                            match attr.key.as_ref() {
                                b"Extension" => {
                                    extension = Some(attr.unescape_value()?.to_string());
                                },
                                b"ContentType" => ct = Some(attr.unescape_value()?.to_string()),
                                _ => {},
                            }
                        }
                        if let (Some(ext), Some(ct)) = (extension, ct) {
                            registry.set_default(&ext, &ct);
                        }
                    },
                    b"Override" => {
                        let mut part_name = None;
                        let mut ct = None;
                        for attr in e.attributes() {
                            let attr = attr?;
                            match attr.key.as_ref() {
                                b"PartName" => {
                                    part_name = Some(attr.unescape_value()?.to_string());
                                },
                                b"ContentType" => ct = Some(attr.unescape_value()?.to_string()),
                                _ => {},
                            }
                        }
                        if let (Some(part), Some(ct)) = (part_name, ct) {
                            registry.set_override(&part, &ct);
                        }
                    },
                    _ => {},
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(crate::error::Error::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(registry)
    }

    /// Serialize; defaults in insertion order, overrides sorted by part path.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        let _ = write!(xml, r#"<Types xmlns="{}">"#, namespace::OPC_CONTENT_TYPES);
        xml.push('\n');

        for (ext, ct) in &self.defaults {
            let _ = write!(
                xml,
                "  <Default Extension=\"{}\" ContentType=\"{}\"/>\n",
                escape_xml(ext),
                escape_xml(ct)
            );
        }
        for (part, ct) in &self.overrides {
            let _ = write!(
                xml,
                "  <Override PartName=\"{}\" ContentType=\"{}\"/>\n",
                escape_xml(part),
                escape_xml(ct)
            );
        }

        xml.push_str("</Types>");
        xml
    }

    /// Get the `Default` content type for an extension (no dot).
    pub fn default_for(&self, extension: &str) -> Option<&str> {
        let ext = extension.to_ascii_lowercase();
        self.defaults
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, ct)| ct.as_str())
    }

    /// Set a `Default`, replacing an existing mapping for the extension.
    pub fn set_default(&mut self, extension: &str, ct: &str) {
        let ext = extension.to_ascii_lowercase();
        match self.defaults.iter_mut().find(|(e, _)| *e == ext) {
            Some(slot) => slot.1 = ct.to_string(),
            None => self.defaults.push((ext, ct.to_string())),
        }
    }

    /// Set an `Override`; the part path is normalized to a leading slash.
    pub fn set_override(&mut self, part_name: &str, ct: &str) {
        self.overrides
            .insert(normalize_part_name(part_name), ct.to_string());
    }

    /// Remove an `Override`; no-op if absent.
    pub fn remove_override(&mut self, part_name: &str) {
        self.overrides.remove(&normalize_part_name(part_name));
    }

    /// Get an `Override` content type by part path.
    pub fn override_for(&self, part_name: &str) -> Option<&str> {
        self.overrides
            .get(&normalize_part_name(part_name))
            .map(String::as_str)
    }

    /// Remove every override whose part path satisfies the predicate.
    pub fn remove_overrides_where(&mut self, pred: impl Fn(&str) -> bool) {
        self.overrides.retain(|part, _| !pred(part));
    }

    /// Ensure a `Default` exists for an image extension.
    ///
    /// The extension is lowercased and stripped of a leading dot. Known
    /// extensions map through a fixed table; unknown extensions are left
    /// undeclared (best effort, a consumer may still reject the package).
    /// Idempotent: an existing mapping is never replaced.
    pub fn ensure_image_default(&mut self, extension: &str) {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        if self.default_for(&ext).is_some() {
            return;
        }
        let ct = match ext.as_str() {
            "png" => content_type::PNG,
            "jpg" | "jpeg" => content_type::JPEG,
            "gif" => content_type::GIF,
            "bmp" => content_type::BMP,
            "svg" => content_type::SVG,
            _ => return,
        };
        self.defaults.push((ext, ct.to_string()));
    }

    /// Declare the `Override` for `/ppt/slides/slide{n}.xml`.
    pub fn add_slide_override(&mut self, slide_num: u32) {
        self.set_override(&slide_part_name(slide_num), content_type::PML_SLIDE);
    }

    /// Remove the `Override` for `/ppt/slides/slide{n}.xml`; no-op if absent.
    pub fn remove_slide_override(&mut self, slide_num: u32) {
        self.remove_override(&slide_part_name(slide_num));
    }
}

fn slide_part_name(slide_num: u32) -> String {
    format!("/ppt/slides/slide{}.xml", slide_num)
}

fn normalize_part_name(part_name: &str) -> String {
    if part_name.starts_with('/') {
        part_name.to_string()
    } else {
        format!("/{}", part_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
  <Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>
</Types>"#;

    #[test]
    fn test_parse() {
        let ct = ContentTypes::parse(SAMPLE).unwrap();
        assert_eq!(ct.default_for("xml"), Some(content_type::XML));
        assert_eq!(
            ct.override_for("/ppt/slides/slide1.xml"),
            Some(content_type::PML_SLIDE)
        );
    }

    #[test]
    fn test_slide_override_add_remove() {
        let mut ct = ContentTypes::parse(SAMPLE).unwrap();
        ct.add_slide_override(2);
        assert_eq!(
            ct.override_for("/ppt/slides/slide2.xml"),
            Some(content_type::PML_SLIDE)
        );
        ct.remove_slide_override(2);
        assert!(ct.override_for("/ppt/slides/slide2.xml").is_none());
        // Removing again is a no-op.
        ct.remove_slide_override(2);
    }

    #[test]
    fn test_ensure_image_default_idempotent() {
        let mut ct = ContentTypes::new();
        ct.ensure_image_default(".PNG");
        assert_eq!(ct.default_for("png"), Some(content_type::PNG));
        let before = ct.to_xml();
        ct.ensure_image_default("png");
        assert_eq!(ct.to_xml(), before);
    }

    #[test]
    fn test_unknown_extension_left_undeclared() {
        let mut ct = ContentTypes::new();
        ct.ensure_image_default("webp");
        assert!(ct.default_for("webp").is_none());
    }

    #[test]
    fn test_overrides_serialize_sorted() {
        let mut ct = ContentTypes::new();
        ct.add_slide_override(10);
        ct.add_slide_override(2);
        ct.set_override("/ppt/presentation.xml", content_type::PML_PRESENTATION_MAIN);
        let xml = ct.to_xml();
        let pres = xml.find("/ppt/presentation.xml").unwrap();
        let slide10 = xml.find("/ppt/slides/slide10.xml").unwrap();
        let slide2 = xml.find("/ppt/slides/slide2.xml").unwrap();
        assert!(pres < slide10 && slide10 < slide2); // lexicographic part order
    }
}
