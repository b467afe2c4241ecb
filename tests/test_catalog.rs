//! Integration tests for building and filtering the image dictionary.
//!
//! Tests cover:
//! - Loading every image in a folder, sorted by path
//! - Grayscale conversion on load
//! - Fatal errors for missing folders and undecodable files
//! - Case-insensitive keyword filtering that leaves the source untouched

mod common;

use common::*;
use image::DynamicImage;
use std::path::Path;

#[test]
fn test_load_builds_entry_per_file() -> anyhow::Result<()> {
    let dir = image_folder(&[
        ("b.png", marked_image(2)),
        ("a.png", marked_image(1)),
        ("c.png", marked_image(3)),
    ]);

    let dictionary = ImageDictionary::load(dir.path(), true)?;

    assert_eq!(dictionary.len(), 3);
    let names: Vec<_> = dictionary
        .paths()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.png", "b.png", "c.png"]);

    let a = dictionary.get(&dir.path().join("a.png")).unwrap();
    assert_eq!(a.to_luma8(), marked_image(1));

    Ok(())
}

#[test]
fn test_load_converts_color_images_to_grayscale() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let rgb = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 10, 10]));
    rgb.save(dir.path().join("red.png"))?;

    let gray = ImageDictionary::load(dir.path(), true)?;
    let color = ImageDictionary::load(dir.path(), false)?;

    let path = dir.path().join("red.png");
    assert!(matches!(gray.get(&path), Some(DynamicImage::ImageLuma8(_))));
    assert!(matches!(color.get(&path), Some(DynamicImage::ImageRgb8(_))));

    Ok(())
}

#[test]
fn test_load_skips_subdirectories() -> anyhow::Result<()> {
    let dir = image_folder(&[("a.png", marked_image(1))]);
    std::fs::create_dir(dir.path().join("nested"))?;

    let dictionary = ImageDictionary::load(dir.path(), true)?;

    assert_eq!(dictionary.len(), 1);
    Ok(())
}

#[test]
fn test_missing_folder_is_io_error() {
    let err = ImageDictionary::load(Path::new("/definitely/not/here"), true).unwrap_err();

    match err.downcast_ref::<FacegridError>() {
        Some(FacegridError::Io { path, .. }) => assert_eq!(path, Path::new("/definitely/not/here")),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_undecodable_file_aborts_load() -> anyhow::Result<()> {
    let dir = image_folder(&[("a.png", marked_image(1))]);
    let broken = dir.path().join("notes.png");
    std::fs::write(&broken, b"this is not an image")?;

    let err = ImageDictionary::load(dir.path(), true).unwrap_err();

    match err.downcast_ref::<FacegridError>() {
        Some(FacegridError::Decode { path, .. }) => assert_eq!(path, &broken),
        other => panic!("expected Decode error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_filter_keeps_images_mentioning_keyword() -> anyhow::Result<()> {
    let mut dictionary = ImageDictionary::new();
    dictionary.insert("small_img/a-0.png", DynamicImage::ImageLuma8(marked_image(7)));
    let recognizer = ScriptedRecognizer::new().with_text(7, "Snyder is here");

    let kept = dictionary.filter_by_keyword(&recognizer, "Snyder")?;
    assert_eq!(kept, dictionary);

    let removed = dictionary.filter_by_keyword(&recognizer, "Pokemon")?;
    assert!(removed.is_empty());

    // The source dictionary is not consumed
    assert_eq!(dictionary.len(), 1);
    Ok(())
}

#[test]
fn test_filter_ignores_case_on_both_sides() -> anyhow::Result<()> {
    let mut dictionary = ImageDictionary::new();
    dictionary.insert("a.png", DynamicImage::ImageLuma8(marked_image(1)));
    dictionary.insert("b.png", DynamicImage::ImageLuma8(marked_image(2)));
    dictionary.insert("c.png", DynamicImage::ImageLuma8(marked_image(3)));
    let recognizer = ScriptedRecognizer::new()
        .with_text(1, "MAYOR SNYDER SPEAKS")
        .with_text(2, "weather report")
        .with_text(3, "snyderville");

    let kept = dictionary.filter_by_keyword(&recognizer, "sNyDeR")?;

    let names: Vec<_> = kept.paths().map(|p| p.to_string_lossy().into_owned()).collect();
    assert_eq!(names, vec!["a.png", "c.png"]);
    Ok(())
}

#[test]
fn test_insert_replaces_existing_key() {
    let mut dictionary = ImageDictionary::new();
    dictionary.insert("a.png", DynamicImage::ImageLuma8(marked_image(1)));
    dictionary.insert("a.png", DynamicImage::ImageLuma8(marked_image(9)));

    assert_eq!(dictionary.len(), 1);
    let image = dictionary.get(Path::new("a.png")).unwrap();
    assert_eq!(image.to_luma8().get_pixel(0, 0)[0], 9);
}
