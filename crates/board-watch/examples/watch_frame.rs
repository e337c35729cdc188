//! Analyze a single frame from disk.
//!
//! Usage: `cargo run --example watch_frame -- path/to/frame.png`

use std::time::Instant;

use board_watch::core::{init_with_level, RgbFrameView};
use board_watch::{BoardWatcher, WatcherParams};
use log::LevelFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_with_level(LevelFilter::Info)?;

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: watch_frame <image-path>")?;
    let rgb = image::open(&path)?.to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    let frame = RgbFrameView::new(width, height, rgb.as_raw())?;

    let mut watcher = BoardWatcher::new(WatcherParams {
        annotate: true,
        ..WatcherParams::default()
    });

    let analysis = watcher.analyze(&frame, Instant::now());
    println!("status: {:?}", analysis.status);

    if let Some(snapshot) = &analysis.snapshot {
        println!("occupied squares: {}", snapshot.occupied_count());
        print!("{snapshot}");
    }
    for event in &analysis.moves {
        println!("move event: {:?} {} ({})", event.kind, event.square, event.occupant);
    }

    if let Some(annotated) = analysis.annotated {
        let out = image::RgbImage::from_raw(
            annotated.width as u32,
            annotated.height as u32,
            annotated.data,
        )
        .ok_or("annotated frame has invalid dimensions")?;
        out.save("annotated.png")?;
        println!("annotated frame written to annotated.png");
    }

    Ok(())
}
