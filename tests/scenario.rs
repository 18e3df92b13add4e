//! End-to-end flows across several operations on one package.

use slidedeck::ops::{
    self, ImagePlacement, ShapeKind, ShapeSpec, TextTarget,
};
use slidedeck::{Package, archive, inventory, scaffold};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

fn fresh_deck(dir: &Path) -> Package {
    scaffold::scaffold(&dir.join("deck")).unwrap()
}

/// Minimal PNG: signature, IHDR length/tag, then width and height.
fn png_fixture(dir: &Path, width: u32, height: u32) -> PathBuf {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 2, 0, 0, 0]);
    let path = dir.join("fixture.png");
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_authoring_flow_survives_pack_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let pkg = fresh_deck(dir.path());

    ops::add_slide(&pkg, 2, None).unwrap();
    ops::edit_text(
        &pkg,
        2,
        &TextTarget::Placeholder("title".to_string()),
        "Quarterly results",
    )
    .unwrap();
    ops::add_shape(
        &pkg,
        1,
        &ShapeSpec {
            text: Some("Draft".to_string()),
            ..ShapeSpec::new(ShapeKind::TextBox)
        },
    )
    .unwrap();
    let image = png_fixture(dir.path(), 64, 64);
    ops::add_image(&pkg, 1, &image, ImagePlacement::default()).unwrap();

    let pptx = dir.path().join("deck.pptx");
    archive::pack(pkg.root(), &pptx).unwrap();
    let unpacked = dir.path().join("unpacked");
    archive::unpack(&pptx, &unpacked).unwrap();

    let reopened = Package::open(&unpacked).unwrap();
    let slides = inventory::list_slides(&reopened).unwrap();
    assert_eq!(slides.len(), 2);
    assert_eq!(slides[1].title, "Quarterly results");
    assert!(reopened.media_dir().join("image1.png").is_file());

    // Packing the re-expanded tree reproduces the archive byte for byte.
    let repacked = dir.path().join("deck2.pptx");
    archive::pack(&unpacked, &repacked).unwrap();
    assert_eq!(fs::read(&pptx).unwrap(), fs::read(&repacked).unwrap());
}

#[test]
fn test_ids_stay_unique_across_mutations() {
    let dir = tempfile::tempdir().unwrap();
    let pkg = fresh_deck(dir.path());

    ops::add_slide(&pkg, 2, None).unwrap();
    ops::add_slide(&pkg, 3, Some(1)).unwrap();
    ops::clone_slide(&pkg, 2, Some(2)).unwrap();
    ops::clone_slide(&pkg, 4, None).unwrap();

    let slides = inventory::list_slides(&pkg).unwrap();
    assert_eq!(slides.len(), 5);

    let slide_ids: HashSet<u32> = slides.iter().map(|s| s.slide_id).collect();
    let r_ids: HashSet<&str> = slides.iter().map(|s| s.r_id.as_str()).collect();
    let file_nums: HashSet<u32> = slides.iter().map(|s| s.slide_num).collect();
    assert_eq!(slide_ids.len(), 5);
    assert_eq!(r_ids.len(), 5);
    assert_eq!(file_nums.len(), 5);
    assert!(slide_ids.iter().all(|id| *id >= 256));
}

#[test]
fn test_relationship_ids_are_never_reused() {
    let dir = tempfile::tempdir().unwrap();
    let pkg = fresh_deck(dir.path());

    // Scaffold rels end at rId6, so the two slides take rId7 and rId8.
    let a = ops::add_slide(&pkg, 2, None).unwrap();
    let b = ops::add_slide(&pkg, 2, None).unwrap();
    assert_eq!(a.r_id, "rId7");
    assert_eq!(b.r_id, "rId8");

    // Freeing rId7 leaves a gap; the next allocation still goes past rId8.
    let slides = inventory::list_slides(&pkg).unwrap();
    let gap_position = slides.iter().find(|s| s.r_id == "rId7").unwrap().position;
    ops::delete_slide(&pkg, gap_position).unwrap();
    let c = ops::add_slide(&pkg, 2, None).unwrap();
    assert_eq!(c.r_id, "rId9");
}

#[test]
fn test_clone_is_independent_of_its_source() {
    let dir = tempfile::tempdir().unwrap();
    let pkg = fresh_deck(dir.path());

    ops::add_slide(&pkg, 2, None).unwrap();
    ops::edit_text(
        &pkg,
        2,
        &TextTarget::Placeholder("title".to_string()),
        "Original",
    )
    .unwrap();
    let clone = ops::clone_slide(&pkg, 2, None).unwrap();
    ops::delete_slide(&pkg, 2).unwrap();

    let slides = inventory::list_slides(&pkg).unwrap();
    assert_eq!(slides.len(), 2);
    assert_eq!(slides[1].slide_num, clone.slide_num);
    assert_eq!(slides[1].title, "Original");
    assert_eq!(slides[1].layout_num, Some(2));

    // Editing the clone afterwards still resolves its own part.
    ops::edit_text(
        &pkg,
        2,
        &TextTarget::Placeholder("title".to_string()),
        "Clone",
    )
    .unwrap();
    assert_eq!(inventory::list_slides(&pkg).unwrap()[1].title, "Clone");
}

#[test]
fn test_insert_positions_control_presentation_order() {
    let dir = tempfile::tempdir().unwrap();
    let pkg = fresh_deck(dir.path());

    let head = ops::add_slide(&pkg, 2, Some(1)).unwrap();
    let middle = ops::add_slide(&pkg, 3, Some(2)).unwrap();
    let tail = ops::add_slide(&pkg, 4, None).unwrap();

    let order: Vec<u32> = inventory::list_slides(&pkg)
        .unwrap()
        .iter()
        .map(|s| s.slide_num)
        .collect();
    assert_eq!(
        order,
        [head.slide_num, middle.slide_num, 1, tail.slide_num]
    );
}

#[test]
fn test_delete_removes_every_trace() {
    let dir = tempfile::tempdir().unwrap();
    let pkg = fresh_deck(dir.path());
    let added = ops::add_slide(&pkg, 2, None).unwrap();

    let deleted = ops::delete_slide(&pkg, 2).unwrap();
    assert_eq!(deleted.slide_num, added.slide_num);

    assert!(!pkg.slide_path(added.slide_num).exists());
    assert!(!pkg.slide_rels_path(added.slide_num).exists());
    let rels = pkg.presentation_rels().unwrap();
    assert!(rels.by_id(&added.r_id).is_none());
    let raw = pkg.read_part(&pkg.content_types_path()).unwrap();
    assert!(!raw.contains(&format!("slide{}.xml", added.slide_num)));
}

#[test]
fn test_media_names_stay_sequential_per_package() {
    let dir = tempfile::tempdir().unwrap();
    let pkg = fresh_deck(dir.path());
    let image = png_fixture(dir.path(), 32, 16);

    let first = ops::add_image(&pkg, 1, &image, ImagePlacement::default()).unwrap();
    let second = ops::add_image(&pkg, 1, &image, ImagePlacement::default()).unwrap();
    assert_eq!(first.media_name, "image1.png");
    assert_eq!(second.media_name, "image2.png");
    assert_ne!(first.r_id, second.r_id);
    assert_ne!(first.shape_id, second.shape_id);
}
