//! Insert a fresh slide built from a layout's placeholder scheme.

use crate::error::{Error, Result};
use crate::ids;
use crate::package::Package;
use crate::xml::{Document, XML_DECLARATION, escape_xml};
use crate::opc::constants::{namespace, relationship_type};
use std::fmt::Write as FmtWrite;

/// Identity of a slide created by [`add_slide`] or
/// [`clone_slide`](super::clone_slide).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedSlide {
    pub slide_num: u32,
    pub slide_id: u32,
    pub r_id: String,
}

struct Placeholder {
    kind: Option<String>,
    idx: Option<String>,
    sz: Option<String>,
}

/// Add a slide using `slideLayout{layout_num}.xml`, inserted at the given
/// 1-based presentation position (appended when `None`).
///
/// Content placeholders from the layout are carried onto the slide with
/// sample text; date, footer, and slide-number placeholders are dropped.
pub fn add_slide(pkg: &Package, layout_num: u32, position: Option<usize>) -> Result<AddedSlide> {
    let layout_path = pkg.layout_path(layout_num);
    if !layout_path.is_file() {
        return Err(Error::NotFound(format!(
            "layout {}: {}",
            layout_num,
            layout_path.display()
        )));
    }

    let layout = Document::parse(&pkg.read_part(&layout_path)?)?;
    let layout_name = layout
        .root
        .child("p:cSld")
        .and_then(|c| c.attr("name"))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Layout {}", layout_num));
    let placeholders = harvest_placeholders(&layout);

    let slide_num = ids::next_slide_num(pkg)?;
    pkg.write_part(
        &pkg.slide_path(slide_num),
        &slide_xml(&placeholders, &layout_name),
    )?;
    pkg.write_part(&pkg.slide_rels_path(slide_num), &slide_rels_xml(layout_num))?;

    let (slide_id, r_id) = super::register_slide(pkg, slide_num, position)?;

    tracing::info!(slide_num, slide_id, layout_num, "added slide");
    Ok(AddedSlide {
        slide_num,
        slide_id,
        r_id,
    })
}

fn harvest_placeholders(layout: &Document) -> Vec<Placeholder> {
    let mut found = Vec::new();
    for sp in crate::inventory::shapes(&layout.root) {
        if let Some(ph) = sp.descendant("p:ph") {
            found.push(Placeholder {
                kind: ph.attr("type").map(str::to_string),
                idx: ph.attr("idx").map(str::to_string),
                sz: ph.attr("sz").map(str::to_string),
            });
        }
    }
    found
}

/// Sample text seeded into a placeholder so the slide is visibly editable.
/// Auto-filled placeholder kinds get no text and are omitted entirely.
fn sample_text<'a>(kind: Option<&str>, layout_name: &'a str) -> &'a str {
    match kind {
        Some("title") | Some("ctrTitle") => layout_name,
        Some("subTitle") => "Subtitle",
        Some("body") => "Body text",
        Some("dt") | Some("ftr") | Some("sldNum") | Some("pic") => "",
        _ => "Content",
    }
}

fn slide_xml(placeholders: &[Placeholder], layout_name: &str) -> String {
    let mut shapes = String::new();
    let mut shape_id = 2u32;

    for ph in placeholders {
        let kind = ph.kind.as_deref();
        if matches!(kind, Some("dt") | Some("ftr") | Some("sldNum")) {
            continue;
        }
        let text = sample_text(kind, layout_name);
        if text.is_empty() {
            continue;
        }

        let name = match kind {
            Some(kind) => format!("{} {}", kind, shape_id - 1),
            None => format!("Shape {}", shape_id - 1),
        };
        let mut ph_attrs = String::new();
        if let Some(kind) = kind {
            let _ = write!(ph_attrs, " type=\"{}\"", kind);
        }
        if let Some(sz) = &ph.sz {
            let _ = write!(ph_attrs, " sz=\"{}\"", sz);
        }
        if let Some(idx) = &ph.idx {
            let _ = write!(ph_attrs, " idx=\"{}\"", idx);
        }

        let _ = write!(
            shapes,
            "      <p:sp>\n\
             \x20       <p:nvSpPr>\n\
             \x20         <p:cNvPr id=\"{id}\" name=\"{name}\"/>\n\
             \x20         <p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr>\n\
             \x20         <p:nvPr><p:ph{ph_attrs}/></p:nvPr>\n\
             \x20       </p:nvSpPr>\n\
             \x20       <p:spPr/>\n\
             \x20       <p:txBody>\n\
             \x20         <a:bodyPr/><a:lstStyle/>\n\
             \x20         <a:p><a:r><a:rPr lang=\"en-US\" dirty=\"0\"/><a:t>{text}</a:t></a:r></a:p>\n\
             \x20       </p:txBody>\n\
             \x20     </p:sp>\n",
            id = shape_id,
            name = escape_xml(&name),
            ph_attrs = ph_attrs,
            text = escape_xml(text),
        );
        shape_id += 1;
    }

    format!(
        "{}<p:sld xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\">\n\
         \x20 <p:cSld>\n\
         \x20   <p:spTree>\n\
         \x20     <p:nvGrpSpPr>\n\
         \x20       <p:cNvPr id=\"1\" name=\"\"/>\n\
         \x20       <p:cNvGrpSpPr/>\n\
         \x20       <p:nvPr/>\n\
         \x20     </p:nvGrpSpPr>\n\
         \x20     <p:grpSpPr>\n\
         \x20       <a:xfrm>\n\
         \x20         <a:off x=\"0\" y=\"0\"/>\n\
         \x20         <a:ext cx=\"0\" cy=\"0\"/>\n\
         \x20         <a:chOff x=\"0\" y=\"0\"/>\n\
         \x20         <a:chExt cx=\"0\" cy=\"0\"/>\n\
         \x20       </a:xfrm>\n\
         \x20     </p:grpSpPr>\n\
         {shapes}    </p:spTree>\n\
         \x20 </p:cSld>\n\
         \x20 <p:clrMapOvr>\n\
         \x20   <a:masterClrMapping/>\n\
         \x20 </p:clrMapOvr>\n\
         </p:sld>",
        XML_DECLARATION,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN,
        shapes = shapes,
    )
}

fn slide_rels_xml(layout_num: u32) -> String {
    format!(
        "{}<Relationships xmlns=\"{}\">\n\
         \x20 <Relationship Id=\"rId1\" Type=\"{}\" Target=\"../slideLayouts/slideLayout{}.xml\"/>\n\
         </Relationships>",
        XML_DECLARATION,
        namespace::OPC_RELATIONSHIPS,
        relationship_type::SLIDE_LAYOUT,
        layout_num
    )
}
