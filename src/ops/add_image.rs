//! Embed a raster image on a slide: media copy, relationship, content-type
//! default, and the `<p:pic>` element.

use crate::emu;
use crate::error::{Error, Result};
use crate::ids;
use crate::image;
use crate::inventory;
use crate::opc::constants::relationship_type;
use crate::package::Package;
use crate::xml::{Document, Element};
use std::fs;
use std::path::Path;

/// Result of [`add_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedImage {
    /// File name under `ppt/media/`
    pub media_name: String,

    /// Image relationship id within the slide's rels
    pub r_id: String,

    /// Shape id of the `<p:pic>` element
    pub shape_id: u32,
}

/// Placement of the image on the slide, in EMU. Unset extents fall back to
/// the image's natural pixel size at 96 DPI.
#[derive(Debug, Clone, Copy)]
pub struct ImagePlacement {
    pub x: i64,
    pub y: i64,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl Default for ImagePlacement {
    fn default() -> Self {
        Self {
            x: emu::PER_INCH,
            y: emu::PER_INCH,
            width: None,
            height: None,
        }
    }
}

/// Add an image to the slide at the given 1-based presentation position.
///
/// The file is copied into `ppt/media/` as `image{n}.{ext}`, where `n` is
/// one more than the count of files already named with an `image` prefix.
/// Interleaved deletions can therefore produce a name collision; callers
/// that delete media must repack through a fresh directory first.
pub fn add_image(
    pkg: &Package,
    position: usize,
    source: &Path,
    placement: ImagePlacement,
) -> Result<AddedImage> {
    if !source.is_file() {
        return Err(Error::NotFound(source.display().to_string()));
    }
    let entry = inventory::slide_at_position(pkg, position)?;

    let data = fs::read(source)?;
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin")
        .to_string();

    let media_dir = pkg.media_dir();
    fs::create_dir_all(&media_dir)?;
    let existing = fs::read_dir(&media_dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("image"))
        .count();
    let media_name = format!("image{}.{}", existing + 1, ext);
    fs::write(media_dir.join(&media_name), &data)?;

    let dims = image::probe(&data);
    let width = placement
        .width
        .unwrap_or(dims.width as i64 * emu::PER_PX);
    let height = placement
        .height
        .unwrap_or(dims.height as i64 * emu::PER_PX);

    let mut rels = pkg.slide_rels(entry.slide_num)?;
    let r_id = rels.add(
        relationship_type::IMAGE,
        &format!("../media/{}", media_name),
        None,
    );
    pkg.write_slide_rels(entry.slide_num, &rels)?;

    let slide_path = pkg.slide_path(entry.slide_num);
    let mut slide = Document::parse(&pkg.read_part(&slide_path)?)?;
    let shape_id = ids::next_shape_id(&slide);
    let pic = pic_element(&r_id, shape_id, placement.x, placement.y, width, height);
    let tree = slide
        .root
        .descendant_mut("p:spTree")
        .ok_or_else(|| Error::Xml("slide has no p:spTree".to_string()))?;
    tree.push_element(pic);
    pkg.write_part(&slide_path, &slide.to_xml())?;

    let mut ct = pkg.content_types()?;
    ct.ensure_image_default(&ext);
    pkg.write_content_types(&ct)?;

    tracing::info!(slide_num = entry.slide_num, media = %media_name, shape_id, "added image");
    Ok(AddedImage {
        media_name,
        r_id,
        shape_id,
    })
}

fn pic_element(r_id: &str, shape_id: u32, x: i64, y: i64, cx: i64, cy: i64) -> Element {
    let mut pic = Element::new("p:pic");

    let mut nv = Element::new("p:nvPicPr");
    let mut cnvpr = Element::new("p:cNvPr");
    cnvpr.set_attr("id", shape_id.to_string());
    cnvpr.set_attr("name", format!("Picture {}", shape_id));
    nv.push_element(cnvpr);
    let mut cnvpicpr = Element::new("p:cNvPicPr");
    let mut locks = Element::new("a:picLocks");
    locks.set_attr("noChangeAspect", "1");
    cnvpicpr.push_element(locks);
    nv.push_element(cnvpicpr);
    nv.push_element(Element::new("p:nvPr"));
    pic.push_element(nv);

    let mut blip_fill = Element::new("p:blipFill");
    let mut blip = Element::new("a:blip");
    blip.set_attr("r:embed", r_id);
    blip_fill.push_element(blip);
    let mut stretch = Element::new("a:stretch");
    stretch.push_element(Element::new("a:fillRect"));
    blip_fill.push_element(stretch);
    pic.push_element(blip_fill);

    let mut sppr = Element::new("p:spPr");
    let mut xfrm = Element::new("a:xfrm");
    let mut off = Element::new("a:off");
    off.set_attr("x", x.to_string());
    off.set_attr("y", y.to_string());
    let mut ext = Element::new("a:ext");
    ext.set_attr("cx", cx.to_string());
    ext.set_attr("cy", cy.to_string());
    xfrm.push_element(off);
    xfrm.push_element(ext);
    sppr.push_element(xfrm);
    let mut geom = Element::new("a:prstGeom");
    geom.set_attr("prst", "rect");
    geom.push_element(Element::new("a:avLst"));
    sppr.push_element(geom);
    pic.push_element(sppr);

    pic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold::scaffold;

    fn png_fixture(dir: &Path, width: u32, height: u32) -> std::path::PathBuf {
        let mut data = vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        let path = dir.join("fixture.png");
        fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_add_image_natural_size() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path().join("deck").as_path()).unwrap();
        let img = png_fixture(dir.path(), 200, 100);

        let added = add_image(&pkg, 1, &img, ImagePlacement::default()).unwrap();
        assert_eq!(added.media_name, "image1.png");
        // Slide rels already held rId1 for the layout.
        assert_eq!(added.r_id, "rId2");
        assert!(pkg.media_dir().join("image1.png").is_file());

        let slide = Document::parse(&pkg.read_part(&pkg.slide_path(1)).unwrap()).unwrap();
        let pic = slide.root.descendant("p:pic").unwrap();
        assert_eq!(
            pic.descendant("a:blip").unwrap().attr("r:embed"),
            Some("rId2")
        );
        let ext = pic.descendant("a:ext").unwrap();
        assert_eq!(ext.attr("cx"), Some("1905000")); // 200px * 9525
        assert_eq!(ext.attr("cy"), Some("952500"));

        let ct = pkg.content_types().unwrap();
        assert_eq!(ct.default_for("png"), Some("image/png"));
    }

    #[test]
    fn test_media_names_count_image_prefixed_files() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path().join("deck").as_path()).unwrap();
        let img = png_fixture(dir.path(), 16, 16);

        assert_eq!(
            add_image(&pkg, 1, &img, ImagePlacement::default())
                .unwrap()
                .media_name,
            "image1.png"
        );
        assert_eq!(
            add_image(&pkg, 1, &img, ImagePlacement::default())
                .unwrap()
                .media_name,
            "image2.png"
        );
    }

    #[test]
    fn test_missing_image_file() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path().join("deck").as_path()).unwrap();
        let err = add_image(
            &pkg,
            1,
            Path::new("/nonexistent.png"),
            ImagePlacement::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_explicit_size_overrides_probe() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path().join("deck").as_path()).unwrap();
        let img = png_fixture(dir.path(), 200, 100);

        let placement = ImagePlacement {
            width: Some(emu::PER_INCH),
            height: Some(emu::PER_INCH),
            ..ImagePlacement::default()
        };
        add_image(&pkg, 1, &img, placement).unwrap();
        let slide = Document::parse(&pkg.read_part(&pkg.slide_path(1)).unwrap()).unwrap();
        let ext = slide.root.descendant("p:pic").unwrap().descendant("a:ext").unwrap();
        assert_eq!(ext.attr("cx"), Some("914400"));
    }
}
