use facegrid::detection::{ocr, redact};
use facegrid::{OcrsRecognizer, TextRecognizer};
use image::ImageReader;
use std::env;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <image_path> <output.png>", args[0]);
        std::process::exit(1);
    }

    let img = ImageReader::open(&args[1])?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    println!("Loaded image: {}x{}", img.width(), img.height());

    let recognizer = OcrsRecognizer::new(ocr::default_models_dir()?);
    let words = recognizer.recognize_words(&img)?;

    println!("\n=== Word Regions ===");
    for (i, word) in words.iter().enumerate() {
        let text = if word.has_word() { word.text.as_str() } else { "<none>" };
        println!(
            "  {}: '{}' at ({}, {}) {}x{}",
            i + 1,
            text,
            word.bbox.x,
            word.bbox.y,
            word.bbox.width,
            word.bbox.height
        );
    }

    let mut gray = img.to_luma8();
    let painted = redact::blank_text(&mut gray, &words);
    gray.save(&args[2])?;
    println!("\nBlanked {} words, saved to {}", painted, args[2]);

    Ok(())
}
