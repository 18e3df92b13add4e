//! Replace the text body of one shape on a slide.

use crate::error::{Error, Result};
use crate::inventory;
use crate::package::Package;
use crate::xml::{Document, Element, Node};

/// Which shape to edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextTarget {
    /// Placeholder type (`title`, `ctrTitle`, `subTitle`, `body`, ...)
    Placeholder(String),

    /// Explicit shape id from `p:cNvPr`
    ShapeId(u32),
}

/// How the edited shape was located. Matchers are tried in a fixed order and
/// the first hit wins; the outcome records which one fired so callers can
/// tell a canonical placeholder from a loosely structured one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Placeholder declared in the shape's non-visual properties
    PlaceholderCanonical,

    /// Placeholder found anywhere under the shape
    PlaceholderLoose,

    /// Shape id match
    ShapeId,
}

impl MatchStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStrategy::PlaceholderCanonical => "ph-nvsppr",
            MatchStrategy::PlaceholderLoose => "ph-any",
            MatchStrategy::ShapeId => "shape-id",
        }
    }
}

/// Result of [`edit_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub strategy: MatchStrategy,
    pub slide_num: u32,
}

/// Replace the entire text body of the targeted shape on the slide at the
/// given 1-based presentation position. Each line of `text` becomes one
/// paragraph. Only `p:sp` shapes are considered; a picture or group never
/// matches.
pub fn edit_text(
    pkg: &Package,
    position: usize,
    target: &TextTarget,
    text: &str,
) -> Result<EditOutcome> {
    let entry = inventory::slide_at_position(pkg, position)?;
    let slide_path = pkg.slide_path(entry.slide_num);
    let mut slide = Document::parse(&pkg.read_part(&slide_path)?)?;

    let strategy = match target {
        TextTarget::Placeholder(kind) => {
            if find_shape(&mut slide.root, &|sp| {
                inventory::placeholder_type(sp) == Some(kind.as_str())
            })
            .is_some()
            {
                MatchStrategy::PlaceholderCanonical
            } else if find_shape(&mut slide.root, &|sp| {
                sp.find(&|el| el.name == "p:ph" && el.attr("type") == Some(kind.as_str()))
                    .is_some()
            })
            .is_some()
            {
                MatchStrategy::PlaceholderLoose
            } else {
                return Err(Error::NotFound(format!(
                    "placeholder '{}' on slide {}",
                    kind, entry.slide_num
                )));
            }
        },
        TextTarget::ShapeId(id) => {
            let id_str = id.to_string();
            if find_shape(&mut slide.root, &|sp| {
                sp.find(&|el| el.name == "p:cNvPr" && el.attr("id") == Some(id_str.as_str()))
                    .is_some()
            })
            .is_some()
            {
                MatchStrategy::ShapeId
            } else {
                return Err(Error::NotFound(format!(
                    "shape id {} on slide {}",
                    id, entry.slide_num
                )));
            }
        },
    };

    // Re-locate mutably and rewrite the body.
    let sp = match (target, strategy) {
        (TextTarget::Placeholder(kind), MatchStrategy::PlaceholderCanonical) => {
            find_shape(&mut slide.root, &|sp| {
                inventory::placeholder_type(sp) == Some(kind.as_str())
            })
        },
        (TextTarget::Placeholder(kind), _) => find_shape(&mut slide.root, &|sp| {
            sp.find(&|el| el.name == "p:ph" && el.attr("type") == Some(kind.as_str()))
                .is_some()
        }),
        (TextTarget::ShapeId(id), _) => {
            let id_str = id.to_string();
            find_shape(&mut slide.root, &move |sp| {
                sp.find(&|el| el.name == "p:cNvPr" && el.attr("id") == Some(id_str.as_str()))
                    .is_some()
            })
        },
    }
    .ok_or_else(|| Error::Xml("matched shape vanished during rewrite".to_string()))?;

    let body = match sp.child_mut("p:txBody") {
        Some(body) => body,
        None => {
            sp.push_element(Element::new("p:txBody"));
            sp.child_mut("p:txBody")
                .ok_or_else(|| Error::Xml("text body just inserted".to_string()))?
        },
    };
    body.children = text_body_children(text);

    pkg.write_part(&slide_path, &slide.to_xml())?;
    tracing::info!(slide_num = entry.slide_num, strategy = strategy.as_str(), "edited text");
    Ok(EditOutcome {
        strategy,
        slide_num: entry.slide_num,
    })
}

/// First `p:sp` (with a text body eligible for rewrite) satisfying the
/// predicate, in document order.
fn find_shape<'a>(
    root: &'a mut Element,
    pred: &dyn Fn(&Element) -> bool,
) -> Option<&'a mut Element> {
    root.find_mut(&|el| el.name == "p:sp" && pred(el))
}

/// Fresh body content: formatting reset, one paragraph per line.
fn text_body_children(text: &str) -> Vec<Node> {
    let mut children = vec![
        Node::Element(Element::new("a:bodyPr")),
        Node::Element(Element::new("a:lstStyle")),
    ];
    for line in text.split('\n') {
        let mut para = Element::new("a:p");
        let mut run = Element::new("a:r");
        let mut rpr = Element::new("a:rPr");
        rpr.set_attr("lang", "en-US");
        rpr.set_attr("dirty", "0");
        run.push_element(rpr);
        let mut t = Element::new("a:t");
        t.children.push(Node::Text(line.to_string()));
        run.push_element(t);
        para.push_element(run);
        children.push(Node::Element(para));
    }
    children
}
