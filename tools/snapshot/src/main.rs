/// Offline frame harness: renders one or more frames for a given settings
/// record and prints them as plain text or JSON, for eyeballing output and
/// diffing frames across changes without a terminal loop.
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use swell_core::{WaveConfig, WaveRenderer};

/// Matches the interactive front-end's tick.
const FRAME_DT: f32 = 0.045;

#[derive(Parser, Debug)]
#[command(name = "snapshot", about = "Render wave frames offline as text or JSON")]
struct Args {
    /// Path to a JSON settings record; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output grid width in cells.
    #[arg(long, default_value = "90")]
    columns: usize,

    /// Output grid height in cells.
    #[arg(long, default_value = "32")]
    rows: usize,

    /// Number of consecutive frames to render.
    #[arg(short, long, default_value = "1")]
    frames: usize,

    /// First frame index; time starts at index * 0.045 s.
    #[arg(long, default_value = "0")]
    start: usize,

    /// Emit frames as JSON span lists instead of plain text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let cfg: WaveConfig = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading settings file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing settings file {}", path.display()))?
        }
        None => WaveConfig::default(),
    };

    let mut renderer = WaveRenderer::new();
    for i in args.start..args.start + args.frames.max(1) {
        let t = i as f32 * FRAME_DT;
        let frame = renderer.render(&cfg, t, args.columns, args.rows);
        if args.json {
            println!("{}", serde_json::to_string(&frame)?);
        } else {
            if args.frames > 1 {
                eprintln!("frame {i} (t = {t:.3})");
            }
            print!("{}", frame.to_text());
        }
    }

    Ok(())
}
