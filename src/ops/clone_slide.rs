//! Duplicate an existing slide under a fresh file number and slide id.

use super::add_slide::AddedSlide;
use crate::error::Result;
use crate::ids;
use crate::inventory;
use crate::package::Package;
use crate::xml::Document;
use std::fs;

/// Clone the slide at `source_position` (1-based presentation order) into a
/// new slide inserted at `position` (appended when `None`).
///
/// The slide body is copied with every numeric `id` attribute offset by
/// `1000 + new_num * 100`, keeping shape ids unique without tracking which
/// elements carry them. The slide's relationship file is copied unchanged,
/// so the clone shares its layout and any embedded media with the source.
pub fn clone_slide(
    pkg: &Package,
    source_position: usize,
    position: Option<usize>,
) -> Result<AddedSlide> {
    let source = inventory::slide_at_position(pkg, source_position)?;
    let new_num = ids::next_slide_num(pkg)?;
    let offset = 1000 + new_num * 100;

    let mut slide = Document::parse(&pkg.read_part(&pkg.slide_path(source.slide_num))?)?;
    slide.root.visit_mut(&mut |el| {
        if let Some(id) = el.attr("id")
            && let Ok(id) = id.parse::<u32>()
        {
            el.set_attr("id", (id + offset).to_string());
        }
    });
    pkg.write_part(&pkg.slide_path(new_num), &slide.to_xml())?;

    let source_rels = pkg.slide_rels_path(source.slide_num);
    if source_rels.is_file() {
        let dest_rels = pkg.slide_rels_path(new_num);
        if let Some(parent) = dest_rels.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&source_rels, &dest_rels)?;
    }

    let (slide_id, r_id) = super::register_slide(pkg, new_num, position)?;

    tracing::info!(
        source = source.slide_num,
        slide_num = new_num,
        slide_id,
        "cloned slide"
    );
    Ok(AddedSlide {
        slide_num: new_num,
        slide_id,
        r_id,
    })
}
