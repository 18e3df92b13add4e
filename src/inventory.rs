//! Read-side views over the package: the presentation order walk behind
//! `list-slides` and the layout inventory behind `list-layouts`.

use crate::error::Result;
use crate::opc::constants::relationship_type;
use crate::package::{Package, part_number};
use crate::xml::{Document, Element};
use std::fs;

/// One slide as seen through the presentation order list.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideEntry {
    /// 1-based position in presentation order
    pub position: usize,

    /// Slide file number (the `N` in `slide{N}.xml`)
    pub slide_num: u32,

    /// Slide id from the `p:sldId` entry
    pub slide_id: u32,

    /// Relationship id linking the presentation to the slide part
    pub r_id: String,

    /// Display title, or `(no title)` when the slide has no text
    pub title: String,

    /// Layout file number the slide's own rels point at, if any
    pub layout_num: Option<u32>,
}

/// One slide layout part on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEntry {
    /// Layout file number (the `N` in `slideLayout{N}.xml`)
    pub layout_num: u32,

    /// Layout display name from `p:cSld@name`, if declared
    pub name: Option<String>,

    /// Placeholder types declared on the layout, in document order
    pub placeholders: Vec<String>,
}

/// Walk the presentation order list and resolve each entry through the
/// relationship chain.
///
/// Entries whose `r:id` has no relationship are skipped rather than failing
/// the listing. An entry whose part file is missing on disk is retained with
/// the `(no title)` fallback so positions stay stable. Slides not in the
/// order list are invisible here by design.
pub fn list_slides(pkg: &Package) -> Result<Vec<SlideEntry>> {
    let presentation = Document::parse(&pkg.read_part(&pkg.presentation_path())?)?;
    let rels = pkg.presentation_rels()?;

    let mut entries = Vec::new();
    let Some(list) = presentation.root.child("p:sldIdLst") else {
        return Ok(entries);
    };

    for sld_id in list.elements_named("p:sldId") {
        let (Some(id), Some(r_id)) = (sld_id.attr("id"), sld_id.attr("r:id")) else {
            continue;
        };
        let Ok(slide_id) = id.parse::<u32>() else {
            continue;
        };
        let Some(rel) = rels.by_id(r_id) else {
            tracing::warn!(r_id, "order entry has no relationship, skipping");
            continue;
        };
        let Some(file_name) = rel.target.rsplit('/').next() else {
            continue;
        };
        let Some(slide_num) = part_number(file_name) else {
            continue;
        };

        let slide_path = pkg.slide_path(slide_num);
        if !slide_path.is_file() {
            tracing::warn!(target = %rel.target, "order entry targets a missing part");
            entries.push(SlideEntry {
                position: entries.len() + 1,
                slide_num,
                slide_id,
                r_id: r_id.to_string(),
                title: "(no title)".to_string(),
                layout_num: None,
            });
            continue;
        }

        let slide = Document::parse(&pkg.read_part(&slide_path)?)?;
        entries.push(SlideEntry {
            position: entries.len() + 1,
            slide_num,
            slide_id,
            r_id: r_id.to_string(),
            title: slide_title(&slide),
            layout_num: slide_layout_num(pkg, slide_num)?,
        });
    }

    Ok(entries)
}

/// Resolve a 1-based presentation position to its slide entry.
pub fn slide_at_position(pkg: &Package, position: usize) -> Result<SlideEntry> {
    list_slides(pkg)?
        .into_iter()
        .find(|entry| entry.position == position)
        .ok_or_else(|| crate::error::Error::NotFound(format!("slide at position {}", position)))
}

/// Layout file number a slide's own rels point at.
pub fn slide_layout_num(pkg: &Package, slide_num: u32) -> Result<Option<u32>> {
    let rels = pkg.slide_rels(slide_num)?;
    Ok(rels
        .by_type(relationship_type::SLIDE_LAYOUT)
        .next()
        .and_then(|rel| rel.target.rsplit('/').next())
        .and_then(part_number))
}

/// Inventory of the layout parts on disk, ordered by file number.
pub fn list_layouts(pkg: &Package) -> Result<Vec<LayoutEntry>> {
    let dir = pkg.layouts_dir();
    let mut nums = Vec::new();
    if dir.is_dir() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with("slideLayout")
                && let Some(num) = part_number(name)
            {
                nums.push(num);
            }
        }
    }
    nums.sort_unstable();

    let mut layouts = Vec::new();
    for layout_num in nums {
        let layout = Document::parse(&pkg.read_part(&pkg.layout_path(layout_num))?)?;
        layouts.push(LayoutEntry {
            layout_num,
            name: layout
                .root
                .child("p:cSld")
                .and_then(|c| c.attr("name"))
                .map(str::to_string),
            placeholders: placeholder_types(&layout.root),
        });
    }
    Ok(layouts)
}

/// Placeholder type names under an element, in document order. A `p:ph`
/// without an explicit type is a body placeholder.
pub fn placeholder_types(root: &Element) -> Vec<String> {
    let mut types = Vec::new();
    root.visit(&mut |el| {
        if el.name == "p:ph" {
            types.push(el.attr("type").unwrap_or("body").to_string());
        }
    });
    types
}

/// Display title of a slide document.
///
/// Prefers the text of a title or centered-title placeholder; otherwise the
/// first text run in the document, truncated to 50 characters; otherwise
/// `(no title)`.
pub fn slide_title(slide: &Document) -> String {
    for sp in shapes(&slide.root) {
        if matches!(placeholder_type(sp), Some("title") | Some("ctrTitle")) {
            let mut runs = Vec::new();
            sp.gather_text(&mut runs);
            let text = runs.concat();
            if !text.trim().is_empty() {
                return text;
            }
        }
    }

    let mut runs = Vec::new();
    slide.root.gather_text(&mut runs);
    match runs.iter().find(|run| !run.trim().is_empty()) {
        Some(run) => {
            let truncated: String = run.chars().take(50).collect();
            truncated
        },
        None => "(no title)".to_string(),
    }
}

/// Every `p:sp` under an element, in document order.
pub fn shapes(root: &Element) -> Vec<&Element> {
    let mut found = Vec::new();
    root.visit(&mut |el| {
        if el.name == "p:sp" {
            found.push(el);
        }
    });
    found
}

/// Placeholder type of a shape, if its non-visual properties declare one.
/// A `p:ph` with no explicit type defaults to `body`.
pub fn placeholder_type(sp: &Element) -> Option<&str> {
    sp.child("p:nvSpPr")
        .and_then(|nv| nv.child("p:nvPr"))
        .and_then(|nv| nv.child("p:ph"))
        .map(|ph| ph.attr("type").unwrap_or("body"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide_doc(body: &str) -> Document {
        Document::parse(&format!(
            r#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>"#,
            body
        ))
        .unwrap()
    }

    #[test]
    fn test_title_from_placeholder() {
        let slide = slide_doc(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="t"/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:txBody><a:p><a:r><a:t>Quarterly Review</a:t></a:r></a:p></p:txBody></p:sp>"#,
        );
        assert_eq!(slide_title(&slide), "Quarterly Review");
    }

    #[test]
    fn test_title_falls_back_to_first_run() {
        let slide = slide_doc(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="b"/><p:nvPr><p:ph type="body"/></p:nvPr></p:nvSpPr><p:txBody><a:p><a:r><a:t>Some body text</a:t></a:r></a:p></p:txBody></p:sp>"#,
        );
        assert_eq!(slide_title(&slide), "Some body text");
    }

    #[test]
    fn test_title_placeholder_without_text_falls_through() {
        let slide = slide_doc(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="t"/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:txBody><a:p/></p:txBody></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="x"/></p:nvSpPr><p:txBody><a:p><a:r><a:t>fallback</a:t></a:r></a:p></p:txBody></p:sp>"#,
        );
        assert_eq!(slide_title(&slide), "fallback");
    }

    #[test]
    fn test_title_empty_slide() {
        let slide = slide_doc("");
        assert_eq!(slide_title(&slide), "(no title)");
    }

    #[test]
    fn test_fallback_truncates_to_50_chars() {
        let long = "x".repeat(80);
        let slide = slide_doc(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="b"/></p:nvSpPr><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>"#,
            long
        ));
        assert_eq!(slide_title(&slide).len(), 50);
    }

    #[test]
    fn test_missing_part_entry_is_retained() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = crate::scaffold::scaffold(dir.path()).unwrap();
        crate::ops::add_slide(&pkg, 2, None).unwrap();
        fs::remove_file(pkg.slide_path(1)).unwrap();

        let slides = list_slides(&pkg).unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].slide_num, 1);
        assert_eq!(slides[0].title, "(no title)");
        assert_eq!(slides[0].layout_num, None);
        assert_eq!(slides[1].position, 2);
        assert_eq!(slides[1].slide_num, 2);
    }

    #[test]
    fn test_placeholder_type_default_is_body() {
        let slide = slide_doc(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="b"/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr></p:sp>"#,
        );
        let sps = shapes(&slide.root);
        assert_eq!(placeholder_type(sps[0]), Some("body"));
    }
}
