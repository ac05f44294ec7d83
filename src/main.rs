use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use handsign::{
    hand::tracking::GestureTracker,
    image::{Mask, Rect},
};

/// Classifies the hand gesture in each of a sequence of binary skin masks.
#[derive(Parser)]
struct Args {
    /// Mask of the fully spread hand to calibrate with before processing the frames.
    #[arg(long, value_name = "SPREAD.png")]
    calibrate: Option<PathBuf>,

    /// Face rectangle (`X,Y,W,H`) to exclude from hand detection, applied to every frame.
    #[arg(long, value_name = "X,Y,W,H", value_parser = parse_rect)]
    face: Vec<Rect>,

    /// Mask images, processed in order as consecutive frames.
    #[arg(value_name = "FRAME.png", required = true)]
    frames: Vec<PathBuf>,

    /// Print the full hand summary for every frame.
    #[arg(long, short)]
    verbose: bool,
}

fn parse_rect(s: &str) -> anyhow::Result<Rect> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid rectangle '{s}'"))?;
    match parts[..] {
        [x, y, w, h] if w >= 0 && h >= 0 => Ok(Rect::from_top_left(
            x.try_into()?,
            y.try_into()?,
            w.try_into()?,
            h.try_into()?,
        )),
        _ => bail!("invalid rectangle '{s}', expected X,Y,W,H"),
    }
}

fn load_mask(path: &Path) -> anyhow::Result<Mask> {
    let image = image::open(path).with_context(|| format!("failed to load {}", path.display()))?;
    Ok(Mask::from_gray(image.to_luma8()))
}

fn main() -> anyhow::Result<()> {
    handsign::init_logger!();

    let args = Args::parse();
    let mut tracker = GestureTracker::new();

    if let Some(path) = &args.calibrate {
        let mask = load_mask(path)?;
        let profile = tracker
            .calibrate(&mask, &args.face)
            .with_context(|| format!("failed to calibrate with {}", path.display()))?;
        log::info!(
            "calibrated {:?} hand from {}",
            profile.handedness(),
            path.display()
        );
    }

    for path in &args.frames {
        let mask = load_mask(path)?;
        let frame = tracker.track(&mask, &args.face)?;
        println!("{}: {}", path.display(), frame.gesture());
        if let (true, Some(hand)) = (args.verbose, frame.hand()) {
            println!("{hand}");
            for finger in hand.fingers() {
                println!(
                    "  {} finger, tip at {}, {:.1}°",
                    finger.identity(),
                    finger.tip(),
                    finger.angle().to_degrees()
                );
            }
        }
    }

    Ok(())
}
