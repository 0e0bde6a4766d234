//! Prism Run headless driver
//!
//! Runs a gameplay session at the fixed tick rate with a scripted
//! input sequence and logs the outcome. Useful for balance passes and
//! replay debugging; rendering backends drive the same `GameplayScreen`
//! lifecycle from their own loops.
//!
//! Usage: `prism-run [map.png] [--seed N] [--frames N]`

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use image::{Rgba, RgbaImage};

use prism_run::platform::HeadlessTextures;
use prism_run::sim::level::{decode_map, HAZARD_PIXEL, PLATFORM_PIXEL};
use prism_run::sim::tick::FrameInput;
use prism_run::{GameplayScreen, Tuning};

struct Args {
    map: Option<PathBuf>,
    seed: u64,
    frames: u64,
}

fn parse_args() -> Args {
    let mut args = Args {
        map: None,
        seed: 42,
        frames: 3600,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                args.seed = iter
                    .next()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(args.seed)
            }
            "--frames" => {
                args.frames = iter
                    .next()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(args.frames)
            }
            path => args.map = Some(PathBuf::from(path)),
        }
    }
    args
}

/// A small built-in course for runs without a map file: a few floor
/// hazards and a stepped platform section.
fn demo_map_image() -> RgbaImage {
    let mut img = RgbaImage::new(64, 8);
    for col in [10, 18, 19, 34, 50] {
        img.put_pixel(col, 7, Rgba(HAZARD_PIXEL));
    }
    for col in 24..28 {
        img.put_pixel(col, 6, Rgba(PLATFORM_PIXEL));
    }
    for col in 40..43 {
        img.put_pixel(col, 5, Rgba(PLATFORM_PIXEL));
    }
    img
}

fn main() -> ExitCode {
    env_logger::init();
    let args = parse_args();

    let tuning = Tuning::load(Path::new("assets/tuning.json"));
    let mut store = HeadlessTextures::new();

    let screen = match &args.map {
        Some(path) => GameplayScreen::init(path, Path::new("assets"), args.seed, tuning, &mut store),
        None => decode_map(&demo_map_image())
            .map_err(Into::into)
            .and_then(|map| {
                GameplayScreen::with_map(map, Path::new("assets"), args.seed, tuning, &mut store)
            }),
    };
    let mut screen = match screen {
        Ok(screen) => screen,
        Err(e) => {
            log::error!("could not start session: {e}");
            return ExitCode::FAILURE;
        }
    };

    for frame in 0..args.frames {
        // Simple survival script: hop on a short cycle
        let input = FrameInput {
            jump_pressed: frame % 45 == 0,
            ..Default::default()
        };
        screen.update(&input);

        if frame % 60 == 0 {
            let state = screen.state();
            log::info!(
                "t={:>4} attempt={} progress={:>5.1}% phase={:?}",
                frame,
                state.attempts,
                state.progress * 100.0,
                state.phase
            );
        }
        if screen.finish().is_some() {
            break;
        }
    }

    let state = screen.state();
    let outcome = screen.finish();
    log::info!(
        "done: outcome={outcome:?} attempts={} frames={} progress={:.1}%",
        state.attempts,
        state.frames,
        state.progress * 100.0
    );

    screen.unload(&mut store);
    ExitCode::SUCCESS
}
