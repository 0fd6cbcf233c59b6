// flyup-replay - Run a scripted session headless and save the last frame
//
// Drives the same World the browser does at a fixed 60 fps, feeding taps
// at chosen frames, then rasterizes the final draw list to PNG.
//
// Usage: cargo run --bin flyup-replay -- --tap 400,300 --tap 400,300@30 --frames 600 --out flyup.png

mod raster;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use flyup_engine::input::Point;
use flyup_engine::render::Encoder;
use flyup_engine::sim::{FoldKind, PointerDown, World};
use flyup_engine::skin::Skins;
use flyup_engine::{Config, Mode, Result};

const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Parser, Debug)]
#[command(version, about = "Replay a scripted flyup session and save the final frame")]
struct Args {
    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Frames to simulate
    #[arg(long, default_value_t = 300)]
    frames: u32,

    #[arg(long, default_value_t = 0xDEADBEEF)]
    seed: u32,

    /// single or multi
    #[arg(long, default_value = "multi")]
    mode: Mode,

    /// X,Y[@FRAME] - tap (press and release) at a canvas point
    #[arg(long = "tap", value_parser = parse_tap)]
    taps: Vec<Tap>,

    #[arg(long, default_value = "flyup.png")]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Tap {
    at: Point,
    frame: u32,
}

fn parse_tap(s: &str) -> std::result::Result<Tap, String> {
    let (xy, frame) = match s.split_once('@') {
        Some((xy, f)) => (xy, f.trim().parse().map_err(|_| format!("bad frame in `{s}`"))?),
        None => (s, 0),
    };
    let (x, y) = xy.split_once(',').ok_or_else(|| format!("expected X,Y in `{s}`"))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("bad x in `{s}`"))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("bad y in `{s}`"))?;
    Ok(Tap { at: Point::new(x, y), frame })
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match replay(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn replay(args: &Args) -> Result<()> {
    let config = Config { mode: args.mode, seed: Some(args.seed), ..Config::default() };
    let mut world = World::new(config, args.width as f64, args.height as f64);

    log::info!(
        "replaying {} frames on {}x{} ({:?}, {} taps)",
        args.frames, args.width, args.height, args.mode, args.taps.len()
    );

    for frame in 0..args.frames {
        let now = frame as f64 * FRAME_MS;
        for tap in args.taps.iter().filter(|t| t.frame == frame) {
            let outcome = world.pointer_down(tap.at, now);
            if outcome != PointerDown::Reset {
                world.pointer_up(now + 1.0);
            }
            log::debug!("frame {frame}: tap at ({}, {}) -> {outcome:?}", tap.at.x, tap.at.y);
        }
        world.frame(now);
    }

    summarize(&world);

    let mut skins: Skins<()> = Skins::new();
    let mut encoder = Encoder::new();
    let img = raster::rasterize(encoder.encode(&mut world, &mut skins));
    img.save(&args.out)?;

    log::info!(
        "wrote {} ({} skins referenced)",
        args.out.display(),
        skins.take_requests().len()
    );
    Ok(())
}

fn summarize(world: &World) {
    let count = |kind: FoldKind| world.planes().iter().filter(|p| p.kind() == kind).count();
    log::info!(
        "{} planes: {} blank, {} paper, {} crumpled{}",
        world.planes().len(),
        count(FoldKind::Blank),
        count(FoldKind::Paper),
        count(FoldKind::Crumpled),
        if world.splash_visible() { " (splash showing)" } else { "" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_parsing() {
        assert_eq!(parse_tap("10,20").unwrap(), Tap { at: Point::new(10.0, 20.0), frame: 0 });
        assert_eq!(parse_tap("1.5, 2 @ 30").unwrap(), Tap { at: Point::new(1.5, 2.0), frame: 30 });
        assert!(parse_tap("10").is_err());
        assert!(parse_tap("a,1").is_err());
        assert!(parse_tap("1,1@x").is_err());
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from(["flyup-replay", "--mode", "single", "--tap", "5,6@2"]).unwrap();
        assert_eq!(args.mode, Mode::Single);
        assert_eq!(args.taps, vec![Tap { at: Point::new(5.0, 6.0), frame: 2 }]);
        assert_eq!(args.frames, 300);
    }
}
