use facegrid::ImageDictionary;
use facegrid::mosaic::{self, MosaicLayout};
use std::env;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <image_folder> <output.png>", args[0]);
        std::process::exit(1);
    }

    let dictionary = ImageDictionary::load(Path::new(&args[1]), true)?;
    println!("Loaded {} images", dictionary.len());

    let tiles: Vec<_> = dictionary.iter().map(|(_, img)| img.to_luma8()).collect();
    let (tile_width, tile_height) = mosaic::resize::base_dimensions(&tiles)?;
    let layout = MosaicLayout::for_tiles(tiles.len() as u32, tile_width, tile_height)?;
    println!(
        "Grid: {} columns x {} rows of {}x{} tiles",
        layout.columns, layout.rows, tile_width, tile_height
    );

    let canvas = mosaic::compose(&tiles)?;
    canvas.save(&args[2])?;
    println!("Saved {}x{} mosaic to {}", canvas.width(), canvas.height(), args[2]);

    Ok(())
}
