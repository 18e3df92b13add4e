//! Fresh-value allocation for the package's independent ID spaces.
//!
//! Slide file numbers, shape ids, and slide ids live in separate spaces with
//! separate floors; none may be inferred from another. Every allocator scans
//! its own space and returns max+1, so values freed by deletion are never
//! reissued while larger values exist.

use crate::error::Result;
use crate::package::{Package, part_number};
use crate::xml::{Document, Element};
use std::fs;

/// Next free slide file number (the `N` in `slide{N}.xml`), floor 1.
///
/// Scans the filenames under `ppt/slides/`; the presentation order list and
/// relationship targets are not consulted.
pub fn next_slide_num(pkg: &Package) -> Result<u32> {
    let dir = pkg.slides_dir();
    let mut max = 0;
    if dir.is_dir() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with("slide")
                && let Some(num) = part_number(name)
            {
                max = max.max(num);
            }
        }
    }
    Ok(max + 1)
}

/// Next free shape id within one slide document, floor 2.
///
/// Office reserves id 1 for the group holding the slide's shape tree, so a
/// slide with no shapes still starts new shapes at 2. Scans every numeric
/// `id` attribute in the document; non-numeric ids are ignored.
pub fn next_shape_id(slide: &Document) -> u32 {
    let mut max = 1;
    slide.root.visit(&mut |el: &Element| {
        if let Some(id) = el.attr("id")
            && let Ok(id) = id.parse::<u32>()
        {
            max = max.max(id);
        }
    });
    max + 1
}

/// Next free slide id for the presentation order list, floor 256.
///
/// Slide ids below 256 are reserved by the file format. Scans the `id`
/// attributes of the `p:sldId` children of `p:sldIdLst`.
pub fn next_slide_id(presentation: &Document) -> u32 {
    let mut max = 255;
    if let Some(list) = presentation.root.child("p:sldIdLst") {
        for entry in list.elements_named("p:sldId") {
            if let Some(id) = entry.attr("id")
                && let Ok(id) = id.parse::<u32>()
            {
                max = max.max(id);
            }
        }
    }
    max + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_next_slide_num_scans_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = Package::at(dir.path());
        assert_eq!(next_slide_num(&pkg).unwrap(), 1);

        fs::create_dir_all(pkg.slides_dir()).unwrap();
        fs::write(pkg.slide_path(1), "<p:sld/>").unwrap();
        fs::write(pkg.slide_path(7), "<p:sld/>").unwrap();
        // Gaps below the max are never refilled.
        assert_eq!(next_slide_num(&pkg).unwrap(), 8);
    }

    #[test]
    fn test_next_shape_id_floor_is_two() {
        let slide = Document::parse(
            r#"<p:sld><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/></p:nvGrpSpPr></p:spTree></p:cSld></p:sld>"#,
        )
        .unwrap();
        assert_eq!(next_shape_id(&slide), 2);

        let slide = Document::parse(
            r#"<p:sld><p:spTree><p:sp><p:nvSpPr><p:cNvPr id="9" name="x"/></p:nvSpPr></p:sp></p:spTree></p:sld>"#,
        )
        .unwrap();
        assert_eq!(next_shape_id(&slide), 10);
    }

    #[test]
    fn test_next_slide_id_floor_is_256() {
        let pres = Document::parse(r#"<p:presentation><p:sldIdLst/></p:presentation>"#).unwrap();
        assert_eq!(next_slide_id(&pres), 256);

        let pres = Document::parse(
            r#"<p:presentation><p:sldIdLst><p:sldId id="256" r:id="rId2"/><p:sldId id="302" r:id="rId5"/></p:sldIdLst></p:presentation>"#,
        )
        .unwrap();
        assert_eq!(next_slide_id(&pres), 303);
    }
}
