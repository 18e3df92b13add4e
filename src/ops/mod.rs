//! Package mutators, one module per operation.
//!
//! Every mutator validates its primary precondition before the first write.
//! Writes already performed are never rolled back; the working directory is
//! plain files and the caller can always re-unpack.

pub mod add_image;
pub mod add_shape;
pub mod add_slide;
pub mod apply_template;
pub mod clone_slide;
pub mod delete_slide;
pub mod edit_text;

pub use add_image::{AddedImage, ImagePlacement, add_image};
pub use add_shape::{Align, ShapeKind, ShapeSpec, add_shape};
pub use add_slide::{AddedSlide, add_slide};
pub use apply_template::apply_template;
pub use clone_slide::clone_slide;
pub use delete_slide::{DeletedSlide, delete_slide};
pub use edit_text::{EditOutcome, MatchStrategy, TextTarget, edit_text};

use crate::error::Result;
use crate::ids;
use crate::opc::constants::relationship_type;
use crate::package::Package;
use crate::xml::{Document, Element};

/// Register an already-written slide part with the presentation: a fresh
/// relationship, a fresh slide id in the order list, and the content-type
/// override. Returns the slide id and relationship id.
///
/// `position` is 1-based presentation order; values at or below 1 insert at
/// the head, values past the end append, `None` appends.
fn register_slide(pkg: &Package, slide_num: u32, position: Option<usize>) -> Result<(u32, String)> {
    let mut rels = pkg.presentation_rels()?;
    let r_id = rels.add(
        relationship_type::SLIDE,
        &format!("slides/slide{}.xml", slide_num),
        None,
    );
    pkg.write_presentation_rels(&rels)?;

    let mut presentation = Document::parse(&pkg.read_part(&pkg.presentation_path())?)?;
    let slide_id = ids::next_slide_id(&presentation);

    let mut entry = Element::new("p:sldId");
    entry.set_attr("id", slide_id.to_string());
    entry.set_attr("r:id", r_id.clone());

    if presentation.root.child("p:sldIdLst").is_none() {
        // A template-derived presentation may lack the order list; it
        // belongs right after the master list.
        let index = presentation
            .root
            .elements()
            .position(|el| el.name == "p:sldMasterIdLst")
            .map(|i| i + 1)
            .unwrap_or(0);
        presentation
            .root
            .insert_element_before(index, Element::new("p:sldIdLst"));
    }
    let list = presentation
        .root
        .child_mut("p:sldIdLst")
        .ok_or_else(|| crate::error::Error::Xml("presentation has no p:sldIdLst".to_string()))?;
    match position {
        Some(pos) => list.insert_element_before(pos.saturating_sub(1), entry),
        None => list.push_element(entry),
    }
    pkg.write_part(&pkg.presentation_path(), &presentation.to_xml())?;

    let mut ct = pkg.content_types()?;
    ct.add_slide_override(slide_num);
    pkg.write_content_types(&ct)?;

    Ok((slide_id, r_id))
}
