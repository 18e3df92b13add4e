//! Relationship table for a single part's `.rels` file.
//!
//! Relationship IDs are unique within one `.rels` file only; different parts
//! may reuse the same `rId` values. The table preserves insertion order so a
//! serialize round trip does not shuffle unrelated entries.

use crate::error::Result;
use crate::opc::constants::namespace;
use crate::xml::escape_xml;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fmt::Write as FmtWrite;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    pub id: String,

    /// Relationship type URI
    pub rel_type: String,

    /// Target reference, relative to the owning part's directory
    pub target: String,

    /// Target mode; `Some("External")` for external targets
    pub target_mode: Option<String>,
}

/// Ordered collection of relationships from a single source part.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Create an empty relationship table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `.rels` document.
    ///
    /// Every `<Relationship>` element with Id, Type, and Target is collected
    /// in document order; elements missing any of the three are skipped, not
    /// an error.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut entries = Vec::new();
        let mut reader = Reader::from_str(xml);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    if e.local_name().as_ref() == b"Relationship" {
                        let mut id = None;
                        let mut rel_type = None;
                        let mut target = None;
                        let mut target_mode = None;

                        for attr in e.attributes() {
                            let attr = attr?;
                            match attr.key.as_ref() {
                                b"Id" => id = Some(attr.unescape_value()?.to_string()),
                                b"Type" => rel_type = Some(attr.unescape_value()?.to_string()),
                                b"Target" => target = Some(attr.unescape_value()?.to_string()),
                                b"TargetMode" => {
                                    target_mode = Some(attr.unescape_value()?.to_string());
                                },
                                _ => {},
                            }
                        }

                        if let (Some(id), Some(rel_type), Some(target)) = (id, rel_type, target) {
                            entries.push(Relationship {
                                id,
                                rel_type,
                                target,
                                target_mode,
                            });
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(crate::error::Error::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(Self { entries })
    }

    /// Serialize to a well-formed `.rels` document in insertion order.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(512);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        let _ = write!(xml, r#"<Relationships xmlns="{}">"#, namespace::OPC_RELATIONSHIPS);
        xml.push('\n');

        for rel in &self.entries {
            let _ = write!(
                xml,
                r#"  <Relationship Id="{}" Type="{}" Target="{}""#,
                escape_xml(&rel.id),
                escape_xml(&rel.rel_type),
                escape_xml(&rel.target),
            );
            if let Some(mode) = &rel.target_mode {
                let _ = write!(xml, r#" TargetMode="{}""#, escape_xml(mode));
            }
            xml.push_str("/>\n");
        }

        xml.push_str("</Relationships>");
        xml
    }

    /// Get the next free relationship ID.
    ///
    /// Scans ids matching the `rIdN` pattern and returns `rId(max+1)`, or
    /// `rId1` for an empty table. Never fills gaps: an id freed by an earlier
    /// removal must not be handed out again within the same session.
    pub fn allocate_id(&self) -> String {
        let max = self
            .entries
            .iter()
            .filter_map(|rel| rel.id.strip_prefix("rId"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("rId{}", max + 1)
    }

    /// Append a new relationship with a freshly allocated id. Returns the id;
    /// the caller must persist the table for the change to take effect.
    pub fn add(&mut self, rel_type: &str, target: &str, target_mode: Option<&str>) -> String {
        let id = self.allocate_id();
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: target_mode.map(str::to_string),
        });
        id
    }

    /// Remove the first entry with the given id; no-op if absent.
    pub fn remove(&mut self, id: &str) {
        if let Some(idx) = self.entries.iter().position(|rel| rel.id == id) {
            self.entries.remove(idx);
        }
    }

    /// Remove every entry of the given relationship type.
    pub fn remove_by_type(&mut self, rel_type: &str) {
        self.entries.retain(|rel| rel.rel_type != rel_type);
    }

    /// Look up a relationship by id.
    pub fn by_id(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|rel| rel.id == id)
    }

    /// All relationships of the given type, in insertion order.
    pub fn by_type<'a>(&'a self, rel_type: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.entries.iter().filter(move |rel| rel.rel_type == rel_type)
    }

    /// First relationship whose target ends with the given suffix.
    pub fn by_target_suffix(&self, suffix: &str) -> Option<&Relationship> {
        self.entries
            .iter()
            .find(|rel| rel.target == suffix || rel.target.ends_with(suffix))
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Mutable iteration, for target rewrites.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Relationship> {
        self.entries.iter_mut()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opc::constants::relationship_type;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/>
  <Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_parse_preserves_order_and_mode() {
        let rels = Relationships::parse(SAMPLE).unwrap();
        assert_eq!(rels.len(), 3);
        assert_eq!(rels.iter().next().unwrap().id, "rId1");
        assert_eq!(
            rels.by_id("rId9").unwrap().target_mode.as_deref(),
            Some("External")
        );
    }

    #[test]
    fn test_allocate_id_is_max_plus_one() {
        let rels = Relationships::parse(SAMPLE).unwrap();
        // rId9 is the highest; gaps (rId3..rId8) are never reused.
        assert_eq!(rels.allocate_id(), "rId10");
        assert_eq!(Relationships::new().allocate_id(), "rId1");
    }

    #[test]
    fn test_add_and_remove() {
        let mut rels = Relationships::new();
        let id = rels.add(relationship_type::SLIDE, "slides/slide1.xml", None);
        assert_eq!(id, "rId1");
        let id2 = rels.add(relationship_type::SLIDE, "slides/slide2.xml", None);
        assert_eq!(id2, "rId2");

        rels.remove("rId1");
        assert_eq!(rels.len(), 1);
        // Removing an absent id is a no-op, not an error.
        rels.remove("rId1");
        assert_eq!(rels.len(), 1);
        // max+1 still avoids collision with the surviving entry.
        assert_eq!(rels.allocate_id(), "rId3");
    }

    #[test]
    fn test_serialize_round_trip() {
        let rels = Relationships::parse(SAMPLE).unwrap();
        let xml = rels.to_xml();
        let again = Relationships::parse(&xml).unwrap();
        assert_eq!(
            rels.iter().collect::<Vec<_>>(),
            again.iter().collect::<Vec<_>>()
        );
        assert!(xml.contains(r#"TargetMode="External""#));
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let xml = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Target="slides/slide1.xml"/>
  <Relationship Id="rId2" Type="t" Target="slides/slide2.xml"/>
</Relationships>"#;
        let rels = Relationships::parse(xml).unwrap();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels.iter().next().unwrap().id, "rId2");
    }
}
