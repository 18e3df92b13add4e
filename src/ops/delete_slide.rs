//! Remove a slide and every registration that points at it.

use crate::error::Result;
use crate::inventory;
use crate::package::Package;
use crate::xml::Document;
use std::fs;

/// Identity of the slide removed by [`delete_slide`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedSlide {
    pub slide_num: u32,
    pub position: usize,
}

/// Delete the slide at the given 1-based presentation position.
///
/// Removes the slide part, its relationship file, the presentation
/// relationship, the order-list entry (matched by `r:id`, not by position),
/// and the content-type override. A piece already missing is skipped, not an
/// error; only an unresolvable position fails.
pub fn delete_slide(pkg: &Package, position: usize) -> Result<DeletedSlide> {
    let entry = inventory::slide_at_position(pkg, position)?;

    let slide_path = pkg.slide_path(entry.slide_num);
    if slide_path.is_file() {
        fs::remove_file(&slide_path)?;
    }
    let rels_path = pkg.slide_rels_path(entry.slide_num);
    if rels_path.is_file() {
        fs::remove_file(&rels_path)?;
    }

    let mut rels = pkg.presentation_rels()?;
    rels.remove(&entry.r_id);
    pkg.write_presentation_rels(&rels)?;

    let mut presentation = Document::parse(&pkg.read_part(&pkg.presentation_path())?)?;
    if let Some(list) = presentation.root.child_mut("p:sldIdLst") {
        list.remove_elements_where(&|el| {
            el.name == "p:sldId" && el.attr("r:id") == Some(entry.r_id.as_str())
        });
    }
    pkg.write_part(&pkg.presentation_path(), &presentation.to_xml())?;

    let mut ct = pkg.content_types()?;
    ct.remove_slide_override(entry.slide_num);
    pkg.write_content_types(&ct)?;

    tracing::info!(slide_num = entry.slide_num, position, "deleted slide");
    Ok(DeletedSlide {
        slide_num: entry.slide_num,
        position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ops::add_slide;
    use crate::scaffold::scaffold;

    #[test]
    fn test_delete_removes_every_registration() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path()).unwrap();
        add_slide(&pkg, 2, None).unwrap();

        let deleted = delete_slide(&pkg, 1).unwrap();
        assert_eq!(deleted.slide_num, 1);
        assert!(!pkg.slide_path(1).exists());
        assert!(!pkg.slide_rels_path(1).exists());

        let slides = inventory::list_slides(&pkg).unwrap();
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].slide_num, 2);

        let ct = pkg.content_types().unwrap();
        assert!(ct.override_for("/ppt/slides/slide1.xml").is_none());
        let rels = pkg.presentation_rels().unwrap();
        assert!(rels.by_id("rId2").is_none());
    }

    #[test]
    fn test_delete_matches_by_r_id_not_position() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path()).unwrap();
        // Insert a second slide at the head so positions and file numbers
        // disagree.
        add_slide(&pkg, 2, Some(1)).unwrap();

        delete_slide(&pkg, 2).unwrap();
        let slides = inventory::list_slides(&pkg).unwrap();
        assert_eq!(slides.len(), 1);
        // The head insert (slide2) survives; the original slide1 is gone.
        assert_eq!(slides[0].slide_num, 2);
    }

    #[test]
    fn test_delete_unknown_position() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path()).unwrap();
        let err = delete_slide(&pkg, 5).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
