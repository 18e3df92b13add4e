//! Add a text box or rectangle to a slide at an explicit EMU position.

use crate::emu;
use crate::error::{Error, Result};
use crate::ids;
use crate::inventory;
use crate::package::Package;
use crate::xml::{Document, Element, Node};

/// Theme color slot names; anything else is treated as an RGB hex value.
const THEME_COLORS: &[&str] = &[
    "dk1", "dk2", "lt1", "lt2", "accent1", "accent2", "accent3", "accent4", "accent5", "accent6",
    "hlink", "folHlink",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    TextBox,
    Rectangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    fn as_ooxml(self) -> &'static str {
        match self {
            Align::Left => "l",
            Align::Center => "ctr",
            Align::Right => "r",
        }
    }
}

/// Geometry and styling for a new shape. Positions and sizes are in EMU.
#[derive(Debug, Clone)]
pub struct ShapeSpec {
    pub kind: ShapeKind,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub text: Option<String>,
    /// Text color: theme slot name or RGB hex. Defaults to `dk1`.
    pub color: Option<String>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width_pt: f64,
    pub font_size_pt: u32,
    pub bold: bool,
    pub italic: bool,
    pub align: Align,
}

impl ShapeSpec {
    /// Defaults: one inch from the top-left corner, four by one inches.
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            x: emu::PER_INCH,
            y: emu::PER_INCH,
            width: 4 * emu::PER_INCH,
            height: emu::PER_INCH,
            text: None,
            color: None,
            fill: None,
            stroke: None,
            stroke_width_pt: 1.0,
            font_size_pt: 18,
            bold: false,
            italic: false,
            align: Align::default(),
        }
    }
}

/// Add a shape to the slide at the given 1-based presentation position.
/// Returns the fresh shape id.
pub fn add_shape(pkg: &Package, position: usize, spec: &ShapeSpec) -> Result<u32> {
    let entry = inventory::slide_at_position(pkg, position)?;
    let slide_path = pkg.slide_path(entry.slide_num);
    let mut slide = Document::parse(&pkg.read_part(&slide_path)?)?;
    let shape_id = ids::next_shape_id(&slide);

    let shape = match spec.kind {
        ShapeKind::TextBox => text_box(shape_id, spec),
        ShapeKind::Rectangle => rectangle(shape_id, spec),
    };

    let tree = slide
        .root
        .descendant_mut("p:spTree")
        .ok_or_else(|| Error::Xml("slide has no p:spTree".to_string()))?;
    tree.push_element(shape);
    pkg.write_part(&slide_path, &slide.to_xml())?;

    tracing::info!(slide_num = entry.slide_num, shape_id, kind = ?spec.kind, "added shape");
    Ok(shape_id)
}

/// `<a:solidFill>` around a theme or RGB color.
fn solid_fill(color: &str) -> Element {
    let mut fill = Element::new("a:solidFill");
    let clr = if THEME_COLORS.contains(&color) {
        let mut el = Element::new("a:schemeClr");
        el.set_attr("val", color);
        el
    } else {
        let mut el = Element::new("a:srgbClr");
        el.set_attr("val", color.trim_start_matches('#'));
        el
    };
    fill.push_element(clr);
    fill
}

fn no_fill_line() -> Element {
    let mut ln = Element::new("a:ln");
    ln.push_element(Element::new("a:noFill"));
    ln
}

fn xfrm(spec: &ShapeSpec) -> Element {
    let mut xfrm = Element::new("a:xfrm");
    let mut off = Element::new("a:off");
    off.set_attr("x", spec.x.to_string());
    off.set_attr("y", spec.y.to_string());
    let mut ext = Element::new("a:ext");
    ext.set_attr("cx", spec.width.to_string());
    ext.set_attr("cy", spec.height.to_string());
    xfrm.push_element(off);
    xfrm.push_element(ext);
    xfrm
}

fn rect_geometry() -> Element {
    let mut geom = Element::new("a:prstGeom");
    geom.set_attr("prst", "rect");
    geom.push_element(Element::new("a:avLst"));
    geom
}

fn non_visual(shape_id: u32, name: &str, text_box: bool) -> Element {
    let mut nv = Element::new("p:nvSpPr");
    let mut cnvpr = Element::new("p:cNvPr");
    cnvpr.set_attr("id", shape_id.to_string());
    cnvpr.set_attr("name", name);
    nv.push_element(cnvpr);
    let mut cnvsppr = Element::new("p:cNvSpPr");
    if text_box {
        cnvsppr.set_attr("txBox", "1");
    }
    nv.push_element(cnvsppr);
    nv.push_element(Element::new("p:nvPr"));
    nv
}

fn text_box(shape_id: u32, spec: &ShapeSpec) -> Element {
    let mut sp = Element::new("p:sp");
    sp.push_element(non_visual(shape_id, &format!("TextBox {}", shape_id), true));

    let mut sppr = Element::new("p:spPr");
    sppr.push_element(xfrm(spec));
    sppr.push_element(rect_geometry());
    match &spec.fill {
        Some(fill) => sppr.push_element(solid_fill(fill)),
        None => sppr.push_element(Element::new("a:noFill")),
    }
    sppr.push_element(no_fill_line());
    sp.push_element(sppr);

    let mut body = Element::new("p:txBody");
    let mut bodypr = Element::new("a:bodyPr");
    bodypr.set_attr("wrap", "square");
    bodypr.set_attr("rtlCol", "0");
    body.push_element(bodypr);
    body.push_element(Element::new("a:lstStyle"));

    let mut para = Element::new("a:p");
    let mut ppr = Element::new("a:pPr");
    ppr.set_attr("algn", spec.align.as_ooxml());
    para.push_element(ppr);

    let mut run = Element::new("a:r");
    let mut rpr = Element::new("a:rPr");
    rpr.set_attr("lang", "en-US");
    rpr.set_attr("sz", (spec.font_size_pt * 100).to_string());
    if spec.bold {
        rpr.set_attr("b", "1");
    }
    if spec.italic {
        rpr.set_attr("i", "1");
    }
    rpr.set_attr("dirty", "0");
    rpr.push_element(solid_fill(spec.color.as_deref().unwrap_or("dk1")));
    run.push_element(rpr);

    let mut t = Element::new("a:t");
    t.children
        .push(Node::Text(spec.text.clone().unwrap_or_default()));
    run.push_element(t);
    para.push_element(run);
    body.push_element(para);
    sp.push_element(body);
    sp
}

fn rectangle(shape_id: u32, spec: &ShapeSpec) -> Element {
    let mut sp = Element::new("p:sp");
    sp.push_element(non_visual(
        shape_id,
        &format!("Rectangle {}", shape_id),
        false,
    ));

    let mut sppr = Element::new("p:spPr");
    sppr.push_element(xfrm(spec));
    sppr.push_element(rect_geometry());
    let fill = spec.fill.as_deref().unwrap_or("accent1");
    sppr.push_element(solid_fill(fill));
    match &spec.stroke {
        Some(stroke) => {
            let mut ln = Element::new("a:ln");
            ln.set_attr("w", emu::from_points(spec.stroke_width_pt).to_string());
            ln.push_element(solid_fill(stroke));
            sppr.push_element(ln);
        },
        None => sppr.push_element(no_fill_line()),
    }
    sp.push_element(sppr);
    sp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold::scaffold;

    #[test]
    fn test_add_text_box() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path()).unwrap();

        let spec = ShapeSpec {
            text: Some("Hello & welcome".to_string()),
            color: Some("accent2".to_string()),
            bold: true,
            align: Align::Center,
            ..ShapeSpec::new(ShapeKind::TextBox)
        };
        let id = add_shape(&pkg, 1, &spec).unwrap();
        assert_eq!(id, 2);

        let slide = Document::parse(&pkg.read_part(&pkg.slide_path(1)).unwrap()).unwrap();
        let sp = slide.root.descendant("p:sp").unwrap();
        let rpr = sp.descendant("a:rPr").unwrap();
        assert_eq!(rpr.attr("sz"), Some("1800"));
        assert_eq!(rpr.attr("b"), Some("1"));
        assert_eq!(
            rpr.descendant("a:schemeClr").unwrap().attr("val"),
            Some("accent2")
        );
        let mut runs = Vec::new();
        sp.gather_text(&mut runs);
        assert_eq!(runs, ["Hello & welcome"]);
    }

    #[test]
    fn test_add_rectangle_with_stroke() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path()).unwrap();

        let spec = ShapeSpec {
            fill: Some("FF0000".to_string()),
            stroke: Some("accent1".to_string()),
            stroke_width_pt: 2.0,
            ..ShapeSpec::new(ShapeKind::Rectangle)
        };
        add_shape(&pkg, 1, &spec).unwrap();

        let slide = Document::parse(&pkg.read_part(&pkg.slide_path(1)).unwrap()).unwrap();
        let sp = slide.root.descendant("p:sp").unwrap();
        assert_eq!(
            sp.descendant("a:srgbClr").unwrap().attr("val"),
            Some("FF0000")
        );
        // 2pt stroke is 25400 EMU.
        assert_eq!(sp.descendant("a:ln").unwrap().attr("w"), Some("25400"));
    }

    #[test]
    fn test_shape_ids_increment() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path()).unwrap();
        let spec = ShapeSpec::new(ShapeKind::TextBox);
        assert_eq!(add_shape(&pkg, 1, &spec).unwrap(), 2);
        assert_eq!(add_shape(&pkg, 1, &spec).unwrap(), 3);
    }
}
