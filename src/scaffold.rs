//! Minimal presentation scaffold: a full package tree with one blank slide
//! and the eleven standard layouts, written in unpacked form.

use crate::error::Result;
use crate::package::Package;
use crate::xml::XML_DECLARATION;
use crate::opc::constants::{content_type, namespace, relationship_type};
use chrono::{SecondsFormat, Utc};
use std::fmt::Write as FmtWrite;
use std::path::Path;

struct PlaceholderDef {
    kind: &'static str,
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
    idx: Option<u32>,
    vertical: bool,
}

struct LayoutDef {
    name: &'static str,
    kind: &'static str,
    placeholders: &'static [PlaceholderDef],
}

const fn ph(kind: &'static str, x: i64, y: i64, cx: i64, cy: i64) -> PlaceholderDef {
    PlaceholderDef {
        kind,
        x,
        y,
        cx,
        cy,
        idx: None,
        vertical: false,
    }
}

const fn ph_idx(kind: &'static str, x: i64, y: i64, cx: i64, cy: i64, idx: u32) -> PlaceholderDef {
    PlaceholderDef {
        idx: Some(idx),
        ..ph(kind, x, y, cx, cy)
    }
}

const fn ph_vert(
    kind: &'static str,
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
    idx: Option<u32>,
) -> PlaceholderDef {
    PlaceholderDef {
        idx,
        vertical: true,
        ..ph(kind, x, y, cx, cy)
    }
}

/// The eleven standard layouts, in their conventional order.
const LAYOUTS: &[LayoutDef] = &[
    LayoutDef {
        name: "Title Slide",
        kind: "title",
        placeholders: &[
            ph("ctrTitle", 685800, 2130425, 7772400, 1470025),
            ph_idx("subTitle", 1371600, 3886200, 6400800, 1752600, 1),
        ],
    },
    LayoutDef {
        name: "Title and Content",
        kind: "obj",
        placeholders: &[
            ph("title", 457200, 274638, 8229600, 1143000),
            ph_idx("body", 457200, 1600200, 8229600, 4525963, 1),
        ],
    },
    LayoutDef {
        name: "Section Header",
        kind: "secHead",
        placeholders: &[
            ph("title", 722313, 4406900, 7772400, 1362075),
            ph_idx("body", 722313, 2906713, 7772400, 1500187, 1),
        ],
    },
    LayoutDef {
        name: "Two Content",
        kind: "twoObj",
        placeholders: &[
            ph("title", 457200, 274638, 8229600, 1143000),
            ph_idx("body", 457200, 1600200, 4038600, 4525963, 1),
            ph_idx("body", 4648200, 1600200, 4038600, 4525963, 2),
        ],
    },
    LayoutDef {
        name: "Comparison",
        kind: "twoTxTwoObj",
        placeholders: &[
            ph("title", 457200, 274638, 8229600, 1143000),
            ph_idx("body", 457200, 1535113, 4040188, 639762, 1),
            ph_idx("body", 457200, 2174875, 4040188, 3951288, 2),
            ph_idx("body", 4645025, 1535113, 4041775, 639762, 3),
            ph_idx("body", 4645025, 2174875, 4041775, 3951288, 4),
        ],
    },
    LayoutDef {
        name: "Title Only",
        kind: "titleOnly",
        placeholders: &[ph("title", 457200, 274638, 8229600, 1143000)],
    },
    LayoutDef {
        name: "Blank",
        kind: "blank",
        placeholders: &[],
    },
    LayoutDef {
        name: "Content with Caption",
        kind: "objTx",
        placeholders: &[
            ph("title", 457200, 273050, 3008313, 1162050),
            ph_idx("body", 3575050, 273050, 5111750, 5853113, 1),
            ph_idx("body", 457200, 1435100, 3008313, 4691063, 2),
        ],
    },
    LayoutDef {
        name: "Picture with Caption",
        kind: "picTx",
        placeholders: &[
            ph("title", 1792288, 4800600, 5486400, 566738),
            ph_idx("body", 1792288, 5367338, 5486400, 804862, 1),
            ph_idx("pic", 1792288, 612775, 5486400, 4114800, 2),
        ],
    },
    LayoutDef {
        name: "Title and Vertical Text",
        kind: "vertTx",
        placeholders: &[
            ph("title", 457200, 274638, 8229600, 1143000),
            ph_vert("body", 457200, 1600200, 8229600, 4525963, Some(1)),
        ],
    },
    LayoutDef {
        name: "Vertical Title and Text",
        kind: "vertTitleAndTx",
        placeholders: &[
            ph_vert("title", 6629400, 274638, 2057400, 5851525, None),
            ph_vert("body", 457200, 274638, 6019800, 5851525, Some(1)),
        ],
    },
];

/// Write a complete minimal presentation tree under `dest` and return the
/// opened package. The tree carries one blank slide on the Title Slide
/// layout and a 4:3 slide size.
pub fn scaffold(dest: &Path) -> Result<Package> {
    let pkg = Package::at(dest);

    pkg.write_part(&pkg.content_types_path(), &content_types())?;
    pkg.write_part(&pkg.root_rels_path(), &root_rels())?;
    pkg.write_part(&pkg.presentation_path(), &presentation())?;
    pkg.write_part(&pkg.presentation_rels_path(), &presentation_rels())?;
    pkg.write_part(&pkg.root().join("ppt").join("presProps.xml"), &pres_props())?;
    pkg.write_part(&pkg.root().join("ppt").join("viewProps.xml"), &view_props())?;
    pkg.write_part(
        &pkg.root().join("ppt").join("tableStyles.xml"),
        &table_styles(),
    )?;
    pkg.write_part(&pkg.theme_dir().join("theme1.xml"), &theme())?;
    pkg.write_part(&pkg.masters_dir().join("slideMaster1.xml"), &slide_master())?;
    pkg.write_part(
        &pkg.masters_dir().join("_rels").join("slideMaster1.xml.rels"),
        &slide_master_rels(),
    )?;

    for (i, layout) in LAYOUTS.iter().enumerate() {
        let num = i as u32 + 1;
        pkg.write_part(&pkg.layout_path(num), &slide_layout(layout))?;
        pkg.write_part(
            &pkg.layouts_dir()
                .join("_rels")
                .join(format!("slideLayout{}.xml.rels", num)),
            &slide_layout_rels(),
        )?;
    }

    pkg.write_part(&pkg.slide_path(1), &blank_slide())?;
    pkg.write_part(&pkg.slide_rels_path(1), &first_slide_rels())?;

    pkg.write_part(&pkg.root().join("docProps").join("core.xml"), &core_props())?;
    pkg.write_part(&pkg.root().join("docProps").join("app.xml"), &app_props())?;

    tracing::debug!(dest = %dest.display(), layouts = LAYOUTS.len(), "scaffolded presentation");
    Package::open(dest)
}

fn content_types() -> String {
    let mut xml = String::from(XML_DECLARATION);
    let _ = writeln!(xml, r#"<Types xmlns="{}">"#, namespace::OPC_CONTENT_TYPES);
    for (ext, ct) in [
        ("rels", content_type::OPC_RELATIONSHIPS),
        ("xml", content_type::XML),
    ] {
        let _ = writeln!(
            xml,
            "  <Default Extension=\"{}\" ContentType=\"{}\"/>",
            ext, ct
        );
    }
    for (part, ct) in [
        ("/ppt/presentation.xml", content_type::PML_PRESENTATION_MAIN),
        ("/ppt/presProps.xml", content_type::PML_PRES_PROPS),
        ("/ppt/viewProps.xml", content_type::PML_VIEW_PROPS),
        ("/ppt/tableStyles.xml", content_type::PML_TABLE_STYLES),
        (
            "/ppt/slideMasters/slideMaster1.xml",
            content_type::PML_SLIDE_MASTER,
        ),
    ] {
        let _ = writeln!(
            xml,
            "  <Override PartName=\"{}\" ContentType=\"{}\"/>",
            part, ct
        );
    }
    for i in 1..=LAYOUTS.len() {
        let _ = writeln!(
            xml,
            "  <Override PartName=\"/ppt/slideLayouts/slideLayout{}.xml\" ContentType=\"{}\"/>",
            i,
            content_type::PML_SLIDE_LAYOUT
        );
    }
    for (part, ct) in [
        ("/ppt/theme/theme1.xml", content_type::OFC_THEME),
        ("/ppt/slides/slide1.xml", content_type::PML_SLIDE),
        ("/docProps/core.xml", content_type::OPC_CORE_PROPERTIES),
        ("/docProps/app.xml", content_type::OFC_EXTENDED_PROPERTIES),
    ] {
        let _ = writeln!(
            xml,
            "  <Override PartName=\"{}\" ContentType=\"{}\"/>",
            part, ct
        );
    }
    xml.push_str("</Types>");
    xml
}

fn root_rels() -> String {
    rels_xml(&[
        (relationship_type::OFFICE_DOCUMENT, "ppt/presentation.xml"),
        (relationship_type::CORE_PROPERTIES, "docProps/core.xml"),
        (relationship_type::EXTENDED_PROPERTIES, "docProps/app.xml"),
    ])
}

/// Serialize a relationship table with sequential ids starting at `rId1`.
fn rels_xml(entries: &[(&str, &str)]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    let _ = writeln!(
        xml,
        r#"<Relationships xmlns="{}">"#,
        namespace::OPC_RELATIONSHIPS
    );
    for (i, (rel_type, target)) in entries.iter().enumerate() {
        let _ = writeln!(
            xml,
            "  <Relationship Id=\"rId{}\" Type=\"{}\" Target=\"{}\"/>",
            i + 1,
            rel_type,
            target
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn presentation() -> String {
    format!(
        "{}<p:presentation xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\" saveSubsetFonts=\"1\">\n\
         \x20 <p:sldMasterIdLst>\n\
         \x20   <p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/>\n\
         \x20 </p:sldMasterIdLst>\n\
         \x20 <p:sldIdLst>\n\
         \x20   <p:sldId id=\"256\" r:id=\"rId2\"/>\n\
         \x20 </p:sldIdLst>\n\
         \x20 <p:sldSz cx=\"9144000\" cy=\"6858000\" type=\"screen4x3\"/>\n\
         \x20 <p:notesSz cx=\"6858000\" cy=\"9144000\"/>\n\
         </p:presentation>",
        XML_DECLARATION,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN
    )
}

fn presentation_rels() -> String {
    rels_xml(&[
        (
            relationship_type::SLIDE_MASTER,
            "slideMasters/slideMaster1.xml",
        ),
        (relationship_type::SLIDE, "slides/slide1.xml"),
        (relationship_type::PRES_PROPS, "presProps.xml"),
        (relationship_type::VIEW_PROPS, "viewProps.xml"),
        (relationship_type::THEME, "theme/theme1.xml"),
        (relationship_type::TABLE_STYLES, "tableStyles.xml"),
    ])
}

fn pres_props() -> String {
    format!(
        "{}<p:presentationPr xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\"/>",
        XML_DECLARATION,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN
    )
}

fn view_props() -> String {
    format!(
        "{}<p:viewPr xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\"><p:normalViewPr><p:restoredLeft sz=\"15620\"/><p:restoredTop sz=\"94660\"/></p:normalViewPr><p:slideViewPr><p:cSldViewPr><p:cViewPr varScale=\"1\"><p:scale><a:sx n=\"68\" d=\"100\"/><a:sy n=\"68\" d=\"100\"/></p:scale><p:origin x=\"-1392\" y=\"-96\"/></p:cViewPr><p:guideLst><p:guide orient=\"horz\" pos=\"2160\"/><p:guide pos=\"2880\"/></p:guideLst></p:cSldViewPr></p:slideViewPr><p:notesTextViewPr><p:cViewPr><p:scale><a:sx n=\"100\" d=\"100\"/><a:sy n=\"100\" d=\"100\"/></p:scale><p:origin x=\"0\" y=\"0\"/></p:cViewPr></p:notesTextViewPr><p:gridSpacing cx=\"72008\" cy=\"72008\"/></p:viewPr>",
        XML_DECLARATION,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN
    )
}

fn table_styles() -> String {
    format!(
        "{}<a:tblStyleLst xmlns:a=\"{}\" def=\"{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}\"/>",
        XML_DECLARATION,
        namespace::DML_MAIN
    )
}

fn theme() -> String {
    let mut xml = String::from(XML_DECLARATION);
    let _ = writeln!(xml, r#"<a:theme xmlns:a="{}" name="Office Theme">"#, namespace::DML_MAIN);
    xml.push_str(
        "  <a:themeElements>\n\
         \x20   <a:clrScheme name=\"Office\">\n\
         \x20     <a:dk1><a:sysClr val=\"windowText\" lastClr=\"000000\"/></a:dk1>\n\
         \x20     <a:lt1><a:sysClr val=\"window\" lastClr=\"FFFFFF\"/></a:lt1>\n\
         \x20     <a:dk2><a:srgbClr val=\"44546A\"/></a:dk2>\n\
         \x20     <a:lt2><a:srgbClr val=\"E7E6E6\"/></a:lt2>\n\
         \x20     <a:accent1><a:srgbClr val=\"4472C4\"/></a:accent1>\n\
         \x20     <a:accent2><a:srgbClr val=\"ED7D31\"/></a:accent2>\n\
         \x20     <a:accent3><a:srgbClr val=\"A5A5A5\"/></a:accent3>\n\
         \x20     <a:accent4><a:srgbClr val=\"FFC000\"/></a:accent4>\n\
         \x20     <a:accent5><a:srgbClr val=\"5B9BD5\"/></a:accent5>\n\
         \x20     <a:accent6><a:srgbClr val=\"70AD47\"/></a:accent6>\n\
         \x20     <a:hlink><a:srgbClr val=\"0563C1\"/></a:hlink>\n\
         \x20     <a:folHlink><a:srgbClr val=\"954F72\"/></a:folHlink>\n\
         \x20   </a:clrScheme>\n\
         \x20   <a:fontScheme name=\"Office\">\n\
         \x20     <a:majorFont><a:latin typeface=\"Calibri Light\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:majorFont>\n\
         \x20     <a:minorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:minorFont>\n\
         \x20   </a:fontScheme>\n\
         \x20   <a:fmtScheme name=\"Office\">\n\
         \x20     <a:fillStyleLst>\n\
         \x20       <a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\n\
         \x20       <a:gradFill rotWithShape=\"1\"><a:gsLst><a:gs pos=\"0\"><a:schemeClr val=\"phClr\"><a:tint val=\"50000\"/><a:satMod val=\"300000\"/></a:schemeClr></a:gs><a:gs pos=\"35000\"><a:schemeClr val=\"phClr\"><a:tint val=\"37000\"/><a:satMod val=\"300000\"/></a:schemeClr></a:gs><a:gs pos=\"100000\"><a:schemeClr val=\"phClr\"><a:tint val=\"15000\"/><a:satMod val=\"350000\"/></a:schemeClr></a:gs></a:gsLst><a:lin ang=\"16200000\" scaled=\"1\"/></a:gradFill>\n\
         \x20       <a:gradFill rotWithShape=\"1\"><a:gsLst><a:gs pos=\"0\"><a:schemeClr val=\"phClr\"><a:shade val=\"51000\"/><a:satMod val=\"130000\"/></a:schemeClr></a:gs><a:gs pos=\"80000\"><a:schemeClr val=\"phClr\"><a:shade val=\"93000\"/><a:satMod val=\"130000\"/></a:schemeClr></a:gs><a:gs pos=\"100000\"><a:schemeClr val=\"phClr\"><a:shade val=\"94000\"/><a:satMod val=\"135000\"/></a:schemeClr></a:gs></a:gsLst><a:lin ang=\"16200000\" scaled=\"0\"/></a:gradFill>\n\
         \x20     </a:fillStyleLst>\n\
         \x20     <a:lnStyleLst>\n\
         \x20       <a:ln w=\"6350\" cap=\"flat\" cmpd=\"sng\" algn=\"ctr\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill><a:prstDash val=\"solid\"/><a:miter lim=\"800000\"/></a:ln>\n\
         \x20       <a:ln w=\"12700\" cap=\"flat\" cmpd=\"sng\" algn=\"ctr\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill><a:prstDash val=\"solid\"/><a:miter lim=\"800000\"/></a:ln>\n\
         \x20       <a:ln w=\"19050\" cap=\"flat\" cmpd=\"sng\" algn=\"ctr\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill><a:prstDash val=\"solid\"/><a:miter lim=\"800000\"/></a:ln>\n\
         \x20     </a:lnStyleLst>\n\
         \x20     <a:effectStyleLst>\n\
         \x20       <a:effectStyle><a:effectLst/></a:effectStyle>\n\
         \x20       <a:effectStyle><a:effectLst/></a:effectStyle>\n\
         \x20       <a:effectStyle><a:effectLst><a:outerShdw blurRad=\"57150\" dist=\"19050\" dir=\"5400000\" algn=\"ctr\" rotWithShape=\"0\"><a:srgbClr val=\"000000\"><a:alpha val=\"63000\"/></a:srgbClr></a:outerShdw></a:effectLst></a:effectStyle>\n\
         \x20     </a:effectStyleLst>\n\
         \x20     <a:bgFillStyleLst>\n\
         \x20       <a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\n\
         \x20       <a:solidFill><a:schemeClr val=\"phClr\"><a:tint val=\"95000\"/><a:satMod val=\"170000\"/></a:schemeClr></a:solidFill>\n\
         \x20       <a:gradFill rotWithShape=\"1\"><a:gsLst><a:gs pos=\"0\"><a:schemeClr val=\"phClr\"><a:tint val=\"93000\"/><a:satMod val=\"150000\"/><a:shade val=\"98000\"/><a:lumMod val=\"102000\"/></a:schemeClr></a:gs><a:gs pos=\"50000\"><a:schemeClr val=\"phClr\"><a:tint val=\"98000\"/><a:satMod val=\"130000\"/><a:shade val=\"90000\"/><a:lumMod val=\"103000\"/></a:schemeClr></a:gs><a:gs pos=\"100000\"><a:schemeClr val=\"phClr\"><a:shade val=\"63000\"/><a:satMod val=\"120000\"/></a:schemeClr></a:gs></a:gsLst><a:lin ang=\"5400000\" scaled=\"0\"/></a:gradFill>\n\
         \x20     </a:bgFillStyleLst>\n\
         \x20   </a:fmtScheme>\n\
         \x20 </a:themeElements>\n\
         \x20 <a:objectDefaults/>\n\
         \x20 <a:extraClrSchemeLst/>\n\
         </a:theme>",
    );
    xml
}

fn slide_master() -> String {
    let mut xml = String::from(XML_DECLARATION);
    let _ = writeln!(
        xml,
        r#"<p:sldMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN
    );
    xml.push_str(
        "  <p:cSld>\n\
         \x20   <p:bg><p:bgRef idx=\"1001\"><a:schemeClr val=\"bg1\"/></p:bgRef></p:bg>\n\
         \x20   <p:spTree>\n\
         \x20     <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\n\
         \x20     <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/><a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>\n\
         \x20   </p:spTree>\n\
         \x20 </p:cSld>\n\
         \x20 <p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" accent2=\"accent2\" accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>\n\
         \x20 <p:sldLayoutIdLst>\n",
    );
    for i in 1..=LAYOUTS.len() as u64 {
        let _ = writeln!(
            xml,
            "    <p:sldLayoutId id=\"{}\" r:id=\"rId{}\"/>",
            2147483649 + i,
            i
        );
    }
    xml.push_str(
        "  </p:sldLayoutIdLst>\n\
         \x20 <p:txStyles>\n\
         \x20   <p:titleStyle>\n\
         \x20     <a:lvl1pPr algn=\"ctr\" defTabSz=\"914400\" rtl=\"0\" eaLnBrk=\"1\" latinLnBrk=\"0\" hangingPunct=\"1\"><a:spcBef><a:spcPct val=\"0\"/></a:spcBef><a:buNone/><a:defRPr sz=\"4400\" kern=\"1200\"><a:solidFill><a:schemeClr val=\"tx1\"/></a:solidFill><a:latin typeface=\"+mj-lt\"/><a:ea typeface=\"+mj-ea\"/><a:cs typeface=\"+mj-cs\"/></a:defRPr></a:lvl1pPr>\n\
         \x20   </p:titleStyle>\n\
         \x20   <p:bodyStyle>\n\
         \x20     <a:lvl1pPr marL=\"342900\" indent=\"-342900\" algn=\"l\" defTabSz=\"914400\" rtl=\"0\" eaLnBrk=\"1\" latinLnBrk=\"0\" hangingPunct=\"1\"><a:spcBef><a:spcPct val=\"20000\"/></a:spcBef><a:buFont typeface=\"Arial\"/><a:buChar char=\"\u{2022}\"/><a:defRPr sz=\"3200\" kern=\"1200\"><a:solidFill><a:schemeClr val=\"tx1\"/></a:solidFill><a:latin typeface=\"+mn-lt\"/><a:ea typeface=\"+mn-ea\"/><a:cs typeface=\"+mn-cs\"/></a:defRPr></a:lvl1pPr>\n\
         \x20     <a:lvl2pPr marL=\"742950\" indent=\"-285750\" algn=\"l\" defTabSz=\"914400\" rtl=\"0\" eaLnBrk=\"1\" latinLnBrk=\"0\" hangingPunct=\"1\"><a:spcBef><a:spcPct val=\"20000\"/></a:spcBef><a:buFont typeface=\"Arial\"/><a:buChar char=\"\u{2013}\"/><a:defRPr sz=\"2800\" kern=\"1200\"><a:solidFill><a:schemeClr val=\"tx1\"/></a:solidFill><a:latin typeface=\"+mn-lt\"/><a:ea typeface=\"+mn-ea\"/><a:cs typeface=\"+mn-cs\"/></a:defRPr></a:lvl2pPr>\n\
         \x20     <a:lvl3pPr marL=\"1143000\" indent=\"-228600\" algn=\"l\" defTabSz=\"914400\" rtl=\"0\" eaLnBrk=\"1\" latinLnBrk=\"0\" hangingPunct=\"1\"><a:spcBef><a:spcPct val=\"20000\"/></a:spcBef><a:buFont typeface=\"Arial\"/><a:buChar char=\"\u{2022}\"/><a:defRPr sz=\"2400\" kern=\"1200\"><a:solidFill><a:schemeClr val=\"tx1\"/></a:solidFill><a:latin typeface=\"+mn-lt\"/><a:ea typeface=\"+mn-ea\"/><a:cs typeface=\"+mn-cs\"/></a:defRPr></a:lvl3pPr>\n\
         \x20     <a:lvl4pPr marL=\"1600200\" indent=\"-228600\" algn=\"l\" defTabSz=\"914400\" rtl=\"0\" eaLnBrk=\"1\" latinLnBrk=\"0\" hangingPunct=\"1\"><a:spcBef><a:spcPct val=\"20000\"/></a:spcBef><a:buFont typeface=\"Arial\"/><a:buChar char=\"\u{2013}\"/><a:defRPr sz=\"2000\" kern=\"1200\"><a:solidFill><a:schemeClr val=\"tx1\"/></a:solidFill><a:latin typeface=\"+mn-lt\"/><a:ea typeface=\"+mn-ea\"/><a:cs typeface=\"+mn-cs\"/></a:defRPr></a:lvl4pPr>\n\
         \x20     <a:lvl5pPr marL=\"2057400\" indent=\"-228600\" algn=\"l\" defTabSz=\"914400\" rtl=\"0\" eaLnBrk=\"1\" latinLnBrk=\"0\" hangingPunct=\"1\"><a:spcBef><a:spcPct val=\"20000\"/></a:spcBef><a:buFont typeface=\"Arial\"/><a:buChar char=\"\u{00bb}\"/><a:defRPr sz=\"2000\" kern=\"1200\"><a:solidFill><a:schemeClr val=\"tx1\"/></a:solidFill><a:latin typeface=\"+mn-lt\"/><a:ea typeface=\"+mn-ea\"/><a:cs typeface=\"+mn-cs\"/></a:defRPr></a:lvl5pPr>\n\
         \x20   </p:bodyStyle>\n\
         \x20   <p:otherStyle>\n\
         \x20     <a:defPPr><a:defRPr lang=\"en-US\"/></a:defPPr>\n\
         \x20   </p:otherStyle>\n\
         \x20 </p:txStyles>\n\
         </p:sldMaster>",
    );
    xml
}

fn slide_master_rels() -> String {
    let mut xml = String::from(XML_DECLARATION);
    let _ = writeln!(xml, r#"<Relationships xmlns="{}">"#, namespace::OPC_RELATIONSHIPS);
    for i in 1..=LAYOUTS.len() {
        let _ = writeln!(
            xml,
            "  <Relationship Id=\"rId{}\" Type=\"{}\" Target=\"../slideLayouts/slideLayout{}.xml\"/>",
            i,
            relationship_type::SLIDE_LAYOUT,
            i
        );
    }
    let _ = writeln!(
        xml,
        "  <Relationship Id=\"rId{}\" Type=\"{}\" Target=\"../theme/theme1.xml\"/>",
        LAYOUTS.len() + 1,
        relationship_type::THEME
    );
    xml.push_str("</Relationships>");
    xml
}

fn placeholder_shape(ph: &PlaceholderDef, shape_id: u32) -> String {
    let vert = if ph.vertical { " vert=\"eaVert\"" } else { "" };
    let idx = match ph.idx {
        Some(idx) => format!(" idx=\"{}\"", idx),
        None => String::new(),
    };
    format!(
        "    <p:sp>\n\
         \x20     <p:nvSpPr>\n\
         \x20       <p:cNvPr id=\"{id}\" name=\"{kind} {id}\"/>\n\
         \x20       <p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr>\n\
         \x20       <p:nvPr><p:ph type=\"{kind}\"{idx}/></p:nvPr>\n\
         \x20     </p:nvSpPr>\n\
         \x20     <p:spPr>\n\
         \x20       <a:xfrm>\n\
         \x20         <a:off x=\"{x}\" y=\"{y}\"/>\n\
         \x20         <a:ext cx=\"{cx}\" cy=\"{cy}\"/>\n\
         \x20       </a:xfrm>\n\
         \x20       <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom>\n\
         \x20     </p:spPr>\n\
         \x20     <p:txBody>\n\
         \x20       <a:bodyPr{vert}/>\n\
         \x20       <a:lstStyle/>\n\
         \x20       <a:p><a:endParaRPr lang=\"en-US\"/></a:p>\n\
         \x20     </p:txBody>\n\
         \x20   </p:sp>\n",
        id = shape_id,
        kind = ph.kind,
        idx = idx,
        x = ph.x,
        y = ph.y,
        cx = ph.cx,
        cy = ph.cy,
        vert = vert,
    )
}

fn slide_layout(layout: &LayoutDef) -> String {
    let mut xml = String::from(XML_DECLARATION);
    let _ = writeln!(
        xml,
        r#"<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" type="{}" preserve="1">"#,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN,
        layout.kind
    );
    let _ = writeln!(xml, "  <p:cSld name=\"{}\">", layout.name);
    xml.push_str(
        "    <p:spTree>\n\
         \x20     <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\n\
         \x20     <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/><a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>\n",
    );
    // Shape id 1 belongs to the group above; placeholders start at 2.
    for (i, ph) in layout.placeholders.iter().enumerate() {
        xml.push_str(&placeholder_shape(ph, i as u32 + 2));
    }
    xml.push_str(
        "    </p:spTree>\n\
         \x20 </p:cSld>\n\
         \x20 <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\n\
         </p:sldLayout>",
    );
    xml
}

fn slide_layout_rels() -> String {
    rels_xml(&[(
        relationship_type::SLIDE_MASTER,
        "../slideMasters/slideMaster1.xml",
    )])
}

/// An empty slide body. Also used by the slide insertion path, which only
/// needs to retarget the layout relationship.
pub fn blank_slide() -> String {
    format!(
        "{}<p:sld xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\">\n\
         \x20 <p:cSld>\n\
         \x20   <p:spTree>\n\
         \x20     <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\n\
         \x20     <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/><a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>\n\
         \x20   </p:spTree>\n\
         \x20 </p:cSld>\n\
         \x20 <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\n\
         </p:sld>",
        XML_DECLARATION,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN
    )
}

fn first_slide_rels() -> String {
    rels_xml(&[(
        relationship_type::SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml",
    )])
}

fn core_props() -> String {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    format!(
        "{}<cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" xmlns:dcmitype=\"http://purl.org/dc/dcmitype/\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\n\
         \x20 <dc:title>Presentation</dc:title>\n\
         \x20 <dc:creator>slidedeck</dc:creator>\n\
         \x20 <dcterms:created xsi:type=\"dcterms:W3CDTF\">{now}</dcterms:created>\n\
         \x20 <dcterms:modified xsi:type=\"dcterms:W3CDTF\">{now}</dcterms:modified>\n\
         </cp:coreProperties>",
        XML_DECLARATION,
        now = now
    )
}

fn app_props() -> String {
    format!(
        "{}<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\" xmlns:vt=\"http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes\">\n\
         \x20 <TotalTime>0</TotalTime>\n\
         \x20 <Words>0</Words>\n\
         \x20 <Application>slidedeck</Application>\n\
         \x20 <PresentationFormat>On-screen Show (4:3)</PresentationFormat>\n\
         \x20 <Paragraphs>0</Paragraphs>\n\
         \x20 <Slides>1</Slides>\n\
         \x20 <Notes>0</Notes>\n\
         \x20 <HiddenSlides>0</HiddenSlides>\n\
         \x20 <MMClips>0</MMClips>\n\
         \x20 <ScaleCrop>false</ScaleCrop>\n\
         \x20 <LinksUpToDate>false</LinksUpToDate>\n\
         \x20 <SharedDoc>false</SharedDoc>\n\
         \x20 <HyperlinksChanged>false</HyperlinksChanged>\n\
         \x20 <AppVersion>16.0000</AppVersion>\n\
         </Properties>",
        XML_DECLARATION
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory;

    #[test]
    fn test_scaffold_is_a_valid_package() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path()).unwrap();

        let slides = inventory::list_slides(&pkg).unwrap();
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].slide_num, 1);
        assert_eq!(slides[0].slide_id, 256);
        assert_eq!(slides[0].layout_num, Some(1));
        assert_eq!(slides[0].title, "(no title)");

        let layouts = inventory::list_layouts(&pkg).unwrap();
        assert_eq!(layouts.len(), 11);
        assert_eq!(layouts[0].name.as_deref(), Some("Title Slide"));
        assert_eq!(layouts[6].name.as_deref(), Some("Blank"));
        assert!(layouts[6].placeholders.is_empty());
        assert_eq!(layouts[0].placeholders, ["ctrTitle", "subTitle"]);
    }

    #[test]
    fn test_master_links_every_layout() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path()).unwrap();
        let rels = crate::opc::Relationships::parse(
            &std::fs::read_to_string(
                pkg.masters_dir().join("_rels").join("slideMaster1.xml.rels"),
            )
            .unwrap(),
        )
        .unwrap();
        // 11 layouts plus the theme.
        assert_eq!(rels.len(), 12);
    }

    #[test]
    fn test_presentation_rels_resolve_by_relationship_type() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path()).unwrap();
        let rels = pkg.presentation_rels().unwrap();
        for rel_type in [
            relationship_type::SLIDE_MASTER,
            relationship_type::SLIDE,
            relationship_type::PRES_PROPS,
            relationship_type::VIEW_PROPS,
            relationship_type::THEME,
            relationship_type::TABLE_STYLES,
        ] {
            assert!(rels.by_type(rel_type).next().is_some(), "{}", rel_type);
        }
    }
}
