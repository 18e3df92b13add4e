//! Re-theme a presentation from a template package: theme, masters, and
//! layouts are replaced wholesale and every reference is rewired.

use crate::archive;
use crate::error::{Error, Result};
use crate::opc::constants::{content_type, relationship_type};
use crate::opc::Relationships;
use crate::package::{Package, part_number};
use crate::xml::Document;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Apply a `.potx`/`.pptx` template to the package.
///
/// Slides keep their layout number when the template provides it; a slide
/// whose layout has no counterpart is remapped to layout 1. Returns the
/// old-to-new layout mapping.
pub fn apply_template(pkg: &Package, template: &Path) -> Result<BTreeMap<u32, u32>> {
    if !template.is_file() {
        return Err(Error::NotFound(template.display().to_string()));
    }

    let scratch = tempfile::tempdir()?;
    archive::unpack(template, scratch.path())?;
    let tpl = Package::at(scratch.path());

    let mapping = layout_mapping(pkg, &tpl)?;

    // Replace the three part families.
    for (ours, theirs) in [
        (pkg.theme_dir(), tpl.theme_dir()),
        (pkg.masters_dir(), tpl.masters_dir()),
        (pkg.layouts_dir(), tpl.layouts_dir()),
    ] {
        if ours.is_dir() {
            fs::remove_dir_all(&ours)?;
        }
        if theirs.is_dir() {
            copy_dir(&theirs, &ours)?;
        }
    }

    rewrite_content_types(pkg)?;
    let master_r_id = rewire_presentation_rels(pkg, &tpl)?;
    if let Some(master_r_id) = master_r_id {
        rewrite_master_reference(pkg, &master_r_id)?;
    }
    rewrite_slide_layout_targets(pkg, &mapping)?;

    tracing::info!(template = %template.display(), layouts = mapping.len(), "applied template");
    Ok(mapping)
}

/// Old layout number to new layout number. A number present in both trees
/// maps to itself; one the template lacks falls back to 1.
fn layout_mapping(pkg: &Package, tpl: &Package) -> Result<BTreeMap<u32, u32>> {
    let ours = layout_numbers(&pkg.layouts_dir())?;
    let theirs = layout_numbers(&tpl.layouts_dir())?;
    Ok(ours
        .into_iter()
        .map(|num| (num, if theirs.contains(&num) { num } else { 1 }))
        .collect())
}

fn layout_numbers(dir: &Path) -> Result<Vec<u32>> {
    let mut nums = Vec::new();
    if dir.is_dir() {
        for entry in fs::read_dir(dir)? {
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
    Ok(nums)
}

fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        if from.is_dir() {
            copy_dir(&from, &to)?;
        } else {
            fs::copy(&from, &to)?;
        }
    }
    Ok(())
}

/// Drop overrides for the replaced families and re-declare them from what is
/// now on disk. Relationship parts under `_rels/` are covered by the `rels`
/// default, not overrides.
fn rewrite_content_types(pkg: &Package) -> Result<()> {
    let mut ct = pkg.content_types()?;
    ct.remove_overrides_where(|part| {
        part.contains("/slideLayouts/") || part.contains("/slideMasters/") || part.contains("/theme/")
    });

    for (dir, prefix, part_ct) in [
        (pkg.layouts_dir(), "/ppt/slideLayouts/", content_type::PML_SLIDE_LAYOUT),
        (pkg.masters_dir(), "/ppt/slideMasters/", content_type::PML_SLIDE_MASTER),
        (pkg.theme_dir(), "/ppt/theme/", content_type::OFC_THEME),
    ] {
        if !dir.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.ends_with(".xml") && !name.starts_with('_') {
                ct.set_override(&format!("{}{}", prefix, name), part_ct);
            }
        }
    }

    pkg.write_content_types(&ct)
}

/// Swap the master and theme relationships for the template's, with fresh
/// ids. Returns the new master relationship id, if the template declares one.
fn rewire_presentation_rels(pkg: &Package, tpl: &Package) -> Result<Option<String>> {
    let mut rels = pkg.presentation_rels()?;
    rels.remove_by_type(relationship_type::SLIDE_MASTER);
    rels.remove_by_type(relationship_type::THEME);

    let tpl_rels_path = tpl.presentation_rels_path();
    if tpl_rels_path.is_file() {
        let tpl_rels = Relationships::parse(&fs::read_to_string(&tpl_rels_path)?)?;
        for rel in tpl_rels.iter() {
            if rel.rel_type == relationship_type::SLIDE_MASTER
                || rel.rel_type == relationship_type::THEME
            {
                rels.add(&rel.rel_type, &rel.target, rel.target_mode.as_deref());
            }
        }
    }

    let master_r_id = rels
        .by_type(relationship_type::SLIDE_MASTER)
        .next()
        .map(|rel| rel.id.clone());
    pkg.write_presentation_rels(&rels)?;
    Ok(master_r_id)
}

fn rewrite_master_reference(pkg: &Package, master_r_id: &str) -> Result<()> {
    let mut presentation = Document::parse(&pkg.read_part(&pkg.presentation_path())?)?;
    if let Some(list) = presentation.root.child_mut("p:sldMasterIdLst") {
        for entry in list.elements_mut() {
            if entry.name == "p:sldMasterId" {
                entry.set_attr("id", "2147483648");
                entry.set_attr("r:id", master_r_id);
            }
        }
    }
    pkg.write_part(&pkg.presentation_path(), &presentation.to_xml())
}

/// Point every slide's layout relationship through the remap.
fn rewrite_slide_layout_targets(pkg: &Package, mapping: &BTreeMap<u32, u32>) -> Result<()> {
    let rels_dir = pkg.slide_rels_dir();
    if !rels_dir.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(&rels_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("rels") {
            continue;
        }
        let mut rels = Relationships::parse(&fs::read_to_string(&path)?)?;
        let mut changed = false;
        for rel in rels.iter_mut() {
            if rel.rel_type != relationship_type::SLIDE_LAYOUT {
                continue;
            }
            let Some(num) = rel.target.rsplit('/').next().and_then(part_number) else {
                continue;
            };
            let new_num = mapping.get(&num).copied().unwrap_or(num);
            if new_num != num {
                rel.target = format!("../slideLayouts/slideLayout{}.xml", new_num);
                changed = true;
            }
        }
        if changed {
            fs::write(&path, rels.to_xml())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory;
    use crate::scaffold::scaffold;

    /// Build a template package file holding only the first `keep` layouts.
    fn template_fixture(dir: &Path, keep: u32) -> std::path::PathBuf {
        let tree = dir.join("template-tree");
        let pkg = scaffold(&tree).unwrap();
        for num in (keep + 1)..=11 {
            fs::remove_file(pkg.layout_path(num)).unwrap();
            fs::remove_file(
                pkg.layouts_dir()
                    .join("_rels")
                    .join(format!("slideLayout{}.xml.rels", num)),
            )
            .unwrap();
        }
        let path = dir.join("template.potx");
        archive::pack(&tree, &path).unwrap();
        path
    }

    #[test]
    fn test_layouts_without_counterpart_remap_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path().join("deck").as_path()).unwrap();
        // Slide on layout 5, which the 3-layout template lacks.
        crate::ops::add_slide(&pkg, 5, None).unwrap();
        let template = template_fixture(dir.path(), 3);

        let mapping = apply_template(&pkg, &template).unwrap();
        assert_eq!(mapping.get(&1), Some(&1));
        assert_eq!(mapping.get(&3), Some(&3));
        assert_eq!(mapping.get(&5), Some(&1));

        let slides = inventory::list_slides(&pkg).unwrap();
        assert_eq!(slides[1].layout_num, Some(1));
        // Layout parts the template lacks are gone from disk.
        assert!(!pkg.layout_path(5).exists());
        assert_eq!(inventory::list_layouts(&pkg).unwrap().len(), 3);
    }

    #[test]
    fn test_content_types_and_master_rewired() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path().join("deck").as_path()).unwrap();
        let template = template_fixture(dir.path(), 11);

        apply_template(&pkg, &template).unwrap();

        let ct = pkg.content_types().unwrap();
        assert_eq!(
            ct.override_for("/ppt/slideLayouts/slideLayout11.xml"),
            Some(content_type::PML_SLIDE_LAYOUT)
        );
        assert_eq!(
            ct.override_for("/ppt/theme/theme1.xml"),
            Some(content_type::OFC_THEME)
        );

        let rels = pkg.presentation_rels().unwrap();
        let master = rels.by_type(relationship_type::SLIDE_MASTER).next().unwrap();
        // Old rId1 was removed; the re-added master got a fresh id.
        assert_ne!(master.id, "rId1");

        let presentation =
            Document::parse(&pkg.read_part(&pkg.presentation_path()).unwrap()).unwrap();
        let master_entry = presentation.root.descendant("p:sldMasterId").unwrap();
        assert_eq!(master_entry.attr("r:id"), Some(master.id.as_str()));
    }

    #[test]
    fn test_missing_template_file() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path().join("deck").as_path()).unwrap();
        let err = apply_template(&pkg, Path::new("/nonexistent.potx")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
